// src/codec/mod.rs

//! # 비트필드 코덱
//!
//! 원시 정수 워드와 숫자 샘플 사이의 비트 단위 변환을 담당합니다.
//! 고정소수점 2의 보수 워드와 I/Q 공유 지수 부동소수점 워드를 지원합니다.
//! 모든 함수는 상태가 없으며 같은 입력에 같은 비트 패턴을 돌려줍니다.

pub mod bits;
pub mod block_float;
pub mod decoder;
pub mod encoder;
pub mod types;

pub use block_float::{exp_calc, fix_to_float, hdl_round, pack_block_float, BlockFloatOptions};
pub use decoder::{
    decode_complex_fixed, decode_fixed, decode_fixed_exact, decode_float, decode_float_fields,
    FloatFields,
};
pub use encoder::{encode_fixed, encode_fixed_batch, encode_fixed_fmt, encode_fixed_word};
pub use types::{FixedFormat, FloatFormat, RawToken, RawWord, Sample, MAX_SAMPLE_BITS, MAX_WORD_BITS};

/// 트레이스 워드의 데이터 타입
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DataType {
    /// 고정소수점 `s.int.frac`
    Fixed(FixedFormat),
    /// 공유 지수 I/Q 부동소수점 (항상 복소수)
    Float(FloatFormat),
    /// 변환하지 않고 원시 토큰 그대로
    AsIs,
}

impl DataType {
    /// 한 레인이 차지하는 비트 수. `AsIs`는 `None`.
    pub fn sample_bits(&self, is_complex: bool) -> Option<u32> {
        match self {
            DataType::Fixed(fmt) => Some(fmt.total_bits() * if is_complex { 2 } else { 1 }),
            DataType::Float(fmt) => Some(fmt.total_bits()),
            DataType::AsIs => None,
        }
    }
}
