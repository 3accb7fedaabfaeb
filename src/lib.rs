//! # ila_codec
//!
//! 하드웨어 디버그 프로브(ILA / SignalTap) 트레이스의 비트 정확한 코덱.
//!
//! - [`codec`]: 고정소수점 / 공유 지수 부동소수점 워드 디코딩과 인코딩
//! - [`requant`]: 하드웨어와 같은 반올림, 포화
//! - [`lanes`]: 한 워드에 묶인 여러 레인의 역다중화
//! - [`packet`]: valid / SOP / EOP 게이팅
//! - [`pipeline`]: 신호 표 변환과 결합
//! - [`dsp`]: FFT, 주파수 이동, FIR 등 후처리

pub mod codec;
pub mod dsp;
pub mod error;
pub mod lanes;
pub mod packet;
pub mod pipeline;
pub mod requant;

#[cfg(feature = "python")]
mod bindings;

pub use codec::{
    decode_complex_fixed, decode_fixed, decode_float, encode_fixed, fix_to_float, DataType,
    FixedFormat, FloatFormat, RawToken, RawWord, Sample,
};
pub use error::{Result, TraceError};
pub use lanes::{LaneLayout, LaneMode};
pub use packet::{find_packet_ranges, PacketRange};
pub use requant::{round_fixed, saturate_fixed};
