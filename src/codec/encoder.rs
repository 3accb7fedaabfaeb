// src/codec/encoder.rs

use super::bits::from_signed;
use super::types::{FixedFormat, RawWord, Sample};
use crate::error::Result;

/// 실수 하나를 스케일, 반올림 후 `[min, max]`로 포화시킵니다.
///
/// 반올림은 최근접 짝수(ties-to-even)이며 NaN은 0으로 취급합니다.
#[inline(always)]
fn quantize(x: f64, scale: f64, min: i128, max: i128) -> i128 {
    let scaled = (x * scale).round_ties_even();
    if scaled.is_nan() {
        return 0.clamp(min, max);
    }
    if scaled >= max as f64 {
        max
    } else if scaled <= min as f64 {
        min
    } else {
        scaled as i128
    }
}

/// 포맷이 이미 검증된 경우의 [`encode_fixed`]
pub fn encode_fixed_fmt(value: Sample, fmt: &FixedFormat) -> (i128, i128) {
    let scale = 2f64.powi(fmt.frac_bits() as i32);
    let (min, max) = fmt.code_range();
    (
        quantize(value.re(), scale, min, max),
        quantize(value.im(), scale, min, max),
    )
}

/// 값을 `s.int.frac` 정수 코드 쌍 `(real, imag)`로 변환합니다.
///
/// 실수부와 허수부는 독립적으로 포화됩니다. 범위를 벗어난 값은 가장 가까운
/// 경계로 조용히 잘립니다.
pub fn encode_fixed(
    value: Sample,
    sign_bit: u32,
    int_bits: u32,
    frac_bits: u32,
) -> Result<(i128, i128)> {
    let fmt = FixedFormat::new(sign_bit, int_bits, frac_bits)?;
    Ok(encode_fixed_fmt(value, &fmt))
}

/// 샘플 배열 전체를 정수 코드 쌍으로 변환합니다.
pub fn encode_fixed_batch(samples: &[Sample], fmt: &FixedFormat) -> Vec<(i128, i128)> {
    samples.iter().map(|&s| encode_fixed_fmt(s, fmt)).collect()
}

/// 값을 하드웨어 워드로 패킹합니다. 복소수이면 `{Q, I}`, I가 하위 절반.
pub fn encode_fixed_word(value: Sample, fmt: &FixedFormat, is_complex: bool) -> RawWord {
    let total = fmt.total_bits();
    let (re, im) = encode_fixed_fmt(value, fmt);
    let word_i = from_signed(re, total);
    if !is_complex {
        return word_i;
    }
    (from_signed(im, total) << total) | word_i
}
