// src/codec/block_float.rs

//! # 고정소수점 → 공유 지수 부동소수점 변환
//!
//! 복소 샘플 하나의 I/Q 가 지수 하나를 공유합니다.
//!
//! | 비트                  | 필드         |
//! |-----------------------|--------------|
//! | `2m+e-1 ..= 2m`       | `exp`        |
//! | `2m-1 ..= m`          | `Q` 가수     |
//! | `m-1 ..= 0`           | `I` 가수     |
//!
//! 기본 포맷은 `m = 13`, `e = 6` 입니다.

use super::bits::mask;
use super::encoder::encode_fixed_fmt;
use super::types::{FixedFormat, FloatFormat, RawWord, Sample};
use rayon::prelude::*;

/// 병렬 처리로 전환하는 최소 샘플 수
const PAR_THRESHOLD: usize = 4096;

/// 블록 부동소수점 인코딩 설정
#[derive(Debug, Clone)]
pub struct BlockFloatOptions {
    /// 출력 부동소수점 포맷
    pub format: FloatFormat,

    /// 양자화 전에 입력에 곱하는 `2^input_bias`
    pub input_bias: i32,

    /// 패킹 직전에 지수에 더하는 값
    pub exp_bias: i32,

    /// 병렬 처리 활성화
    pub enable_parallel: bool,
}

impl Default for BlockFloatOptions {
    fn default() -> Self {
        Self {
            format: FloatFormat::FLOAT_ENUM,
            input_bias: 0,
            exp_bias: 0,
            enable_parallel: true,
        }
    }
}

/// `ceil(log2(magnitude))`. 양수이면서 정확히 2의 거듭제곱이면 1을 더합니다.
pub fn exp_calc(magnitude: f64, sign: f64) -> i32 {
    let l2 = magnitude.log2();
    let l2_up = l2.ceil();
    if l2 == l2_up && sign > 0.0 {
        l2_up as i32 + 1
    } else {
        l2_up as i32
    }
}

/// 하드웨어 반올림: 최근접, 동률이면 위로 (`-2.5 -> -2`, `2.5 -> 3`).
pub fn hdl_round(num: f64) -> f64 {
    let rounded = num.round();
    if rounded - num == -0.5 {
        rounded + 1.0
    } else {
        rounded
    }
}

/// 정수 코드에 대한 [`exp_calc`]. 0 이 아닌 코드만 받습니다.
#[inline(always)]
fn exp_calc_code(code: i128) -> i32 {
    let mag = code.unsigned_abs();
    let bit_len = (128 - mag.leading_zeros()) as i32;
    if mag.is_power_of_two() && code < 0 {
        bit_len - 1
    } else {
        bit_len
    }
}

/// `hdl_round(code / 2^shift)`, `shift >= 1`
#[inline(always)]
fn hdl_round_shift(code: i128, shift: u32) -> i128 {
    (code + (1i128 << (shift - 1))) >> shift
}

/// 양자화된 I/Q 코드 쌍 하나를 부동소수점 워드로 패킹합니다.
///
/// 두 번째 반환값은 양수 가수가 포화되었는지 여부입니다.
pub fn pack_block_float(code_i: i128, code_q: i128, fmt: &FloatFormat, exp_bias: i32) -> (RawWord, bool) {
    let m = fmt.man_bits();

    let exp_i = if code_i != 0 { exp_calc_code(code_i) } else { 0 };
    let exp_q = if code_q != 0 { exp_calc_code(code_q) } else { 0 };
    let mut exp = (exp_i.max(exp_q) - m as i32 + 1).max(0);

    let (mut man_i, mut man_q) = (code_i, code_q);
    if exp > 0 {
        man_i = hdl_round_shift(man_i, exp as u32);
        man_q = hdl_round_shift(man_q, exp as u32);
    }

    let pos_max = (1i128 << (m - 1)) - 1;
    let mut saturated = false;
    let mut to_field = |man: i128| -> i128 {
        if man > pos_max {
            saturated = true;
            pos_max
        } else if man < 0 {
            man + (1i128 << m)
        } else {
            man
        }
    };
    let field_i = to_field(man_i);
    let field_q = to_field(man_q);

    exp = (exp + exp_bias).max(0);
    if field_i == 0 && field_q == 0 {
        // 영 샘플은 바이어스와 무관하게 지수 0
        exp = 0;
    }

    let mut word = ((field_q as u128 & mask(m)) << m) | (field_i as u128 & mask(m));
    if fmt.exp_bits() > 0 {
        word |= (exp as u128 & mask(fmt.exp_bits())) << (2 * m);
    }
    (word, saturated)
}

/// 복소 샘플 배열을 공유 지수 부동소수점 워드로 변환합니다.
///
/// 각 샘플은 먼저 `in_prec`으로 양자화(스케일 `2^frac`, 반올림, 포화)된 뒤
/// [`pack_block_float`]로 패킹됩니다.
pub fn fix_to_float(samples: &[Sample], in_prec: &FixedFormat, options: &BlockFloatOptions) -> Vec<RawWord> {
    let bias = 2f64.powi(options.input_bias);
    let encode_one = |s: &Sample| {
        let biased = Sample::Complex(s.to_complex() * bias);
        let (code_i, code_q) = encode_fixed_fmt(biased, in_prec);
        pack_block_float(code_i, code_q, &options.format, options.exp_bias)
    };

    let packed: Vec<(RawWord, bool)> = if options.enable_parallel && samples.len() >= PAR_THRESHOLD {
        samples.par_iter().map(encode_one).collect()
    } else {
        samples.iter().map(encode_one).collect()
    };

    let saturated = packed.iter().filter(|(_, sat)| *sat).count();
    if saturated > 0 {
        tracing::debug!(saturated, total = samples.len(), "block-float mantissas saturated");
    }

    packed.into_iter().map(|(word, _)| word).collect()
}
