// src/error.rs

//! # 에러 타입
//!
//! 모든 검사는 배열을 순회하기 전에 수행됩니다. 포화(saturation)는 하드웨어 동작이므로
//! 에러가 아니며 여기에 나타나지 않습니다.

use thiserror::Error;

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TraceError {
    /// 정밀도 필드가 잘못됨 (sign 비트가 0/1이 아님, 총 비트 수 0 등)
    #[error("Invalid format: {0}")]
    InvalidFormat(String),

    /// 비트 폭이 1 미만
    #[error("Invalid width for {name}: {width} (must be >= 1)")]
    InvalidWidth { name: &'static str, width: u32 },

    /// 워드 폭이 u128 저장 범위를 초과
    #[error("Width of {bits} bits exceeds the {max}-bit limit")]
    WidthOverflow { bits: u32, max: u32 },

    /// 제어 신호(valid/SOP/EOP)나 결합 대상의 길이가 데이터와 다름
    #[error("Length mismatch: '{signal}' has {got} samples, expected {expected}")]
    LengthMismatch {
        signal: String,
        expected: usize,
        got: usize,
    },

    /// 알 수 없는 combine / packet / 연산 모드
    #[error("Unknown mode: {0}")]
    UnknownMode(String),

    #[error("Filter coefficient list is empty")]
    EmptyCoefficients,

    /// 16진수로 해석할 수 없는 원시 토큰
    #[error("Invalid raw token: '{0}'")]
    InvalidToken(String),

    /// 현재 설정에서 지원하지 않는 조합
    #[error("Unsupported: {0}")]
    Unsupported(String),
}

pub type Result<T> = std::result::Result<T, TraceError>;
