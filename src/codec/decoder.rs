// src/codec/decoder.rs

//! # 원시 워드 디코딩
//!
//! 고정소수점 워드와 공유 지수 부동소수점 워드를 숫자 샘플로 풉니다.
//! 입력 워드는 해당 포맷의 폭으로 마스킹된 후 해석됩니다.

use super::bits::{mask, to_signed};
use super::types::{FixedFormat, FloatFormat, RawWord, Sample};
use num_rational::Ratio;
use rustfft::num_complex::Complex64;

/// 포맷 폭만큼 잘라 부호를 반영한 정수 코드
#[inline(always)]
fn signed_code(raw: RawWord, fmt: &FixedFormat) -> i128 {
    let total = fmt.total_bits();
    let bits = raw & mask(total);
    if fmt.is_signed() {
        to_signed(bits, total)
    } else {
        bits as i128
    }
}

/// `raw`를 `s.int.frac` 값으로 해석합니다. 결과는 `code / 2^frac`.
pub fn decode_fixed(raw: RawWord, fmt: &FixedFormat) -> f64 {
    signed_code(raw, fmt) as f64 / 2f64.powi(fmt.frac_bits() as i32)
}

/// [`decode_fixed`]의 정확한 유리수 버전
pub fn decode_fixed_exact(raw: RawWord, fmt: &FixedFormat) -> Ratio<i128> {
    Ratio::new(signed_code(raw, fmt), 1i128 << fmt.frac_bits())
}

/// 복소수 워드는 `2 * total_bits` 폭이며 하위 절반이 I, 상위 절반이 Q입니다.
pub fn decode_complex_fixed(raw: RawWord, fmt: &FixedFormat, is_complex: bool) -> Sample {
    let total = fmt.total_bits();
    let val_i = decode_fixed(raw & mask(total), fmt);
    if !is_complex {
        return Sample::Real(val_i);
    }
    let val_q = decode_fixed((raw >> total) & mask(total), fmt);
    Sample::Complex(Complex64::new(val_i, val_q))
}

/// 부동소수점 워드의 원시 필드
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatFields {
    pub exp: u32,
    pub man_i: i128,
    pub man_q: i128,
    pub man_bits: u32,
}

impl FloatFields {
    /// 가수만으로 만든 복소수 (지수 미적용)
    pub fn mantissas(&self) -> Complex64 {
        Complex64::new(self.man_i as f64, self.man_q as f64)
    }

    /// 가수에 `2^exp`를 곱한 값
    pub fn scaled(&self) -> Complex64 {
        self.mantissas() * 2f64.powi(self.exp as i32)
    }

    /// 가수를 `[-1, 1)`로 정규화한 값 (`s.0.(man-1)` 해석)
    pub fn normalized(&self) -> Complex64 {
        self.mantissas() / 2f64.powi(self.man_bits as i32 - 1)
    }
}

/// 워드를 `exp | Q | I` 필드로 분해합니다.
pub fn decode_float_fields(raw: RawWord, fmt: &FloatFormat) -> FloatFields {
    let m = fmt.man_bits();
    let man_mask = mask(m);
    let sample = raw & mask(fmt.total_bits());

    let man_i_raw = sample & man_mask;
    let man_q_raw = (sample >> m) & man_mask;
    let exp_raw = if fmt.exp_bits() == 0 {
        0
    } else {
        (sample >> (2 * m)) & mask(fmt.exp_bits())
    };

    FloatFields {
        exp: exp_raw as u32,
        man_i: to_signed(man_i_raw, m),
        man_q: to_signed(man_q_raw, m),
        man_bits: m,
    }
}

/// 부동소수점 워드를 `complex(man_I, man_Q)`로 디코딩합니다.
///
/// 공유 지수는 곱하지 않습니다. 지수가 필요한 소비자는
/// [`decode_float_fields`]와 [`FloatFields::scaled`]를 사용합니다.
pub fn decode_float(raw: RawWord, fmt: &FloatFormat) -> Complex64 {
    decode_float_fields(raw, fmt).mantissas()
}
