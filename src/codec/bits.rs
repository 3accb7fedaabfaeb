// src/codec/bits.rs

//! 폭이 정해진 2의 보수 비트 조작 헬퍼.

use super::types::{RawWord, MAX_WORD_BITS};
use crate::error::{Result, TraceError};

/// 하위 `width` 비트 마스크
#[inline(always)]
pub fn mask(width: u32) -> RawWord {
    if width >= MAX_WORD_BITS {
        RawWord::MAX
    } else {
        (1u128 << width) - 1
    }
}

/// `width` 비트 패턴을 부호 있는 정수로 해석합니다.
#[inline(always)]
pub fn to_signed(bits: RawWord, width: u32) -> i128 {
    let x = bits & mask(width);
    if width >= MAX_WORD_BITS {
        return x as i128;
    }
    if (x >> (width - 1)) & 1 == 1 {
        // 2^width 를 직접 만들면 width == 127 에서 넘치므로 부호 확장으로 처리
        (x | !mask(width)) as i128
    } else {
        x as i128
    }
}

/// 부호 있는 값을 `width` 비트 패턴으로 자릅니다.
#[inline(always)]
pub fn from_signed(value: i128, width: u32) -> RawWord {
    (value as u128) & mask(width)
}

/// `1 <= width <= 128` 검사
pub fn check_width(name: &'static str, width: u32) -> Result<()> {
    if width < 1 {
        return Err(TraceError::InvalidWidth { name, width });
    }
    if width > MAX_WORD_BITS {
        return Err(TraceError::WidthOverflow {
            bits: width,
            max: MAX_WORD_BITS,
        });
    }
    Ok(())
}
