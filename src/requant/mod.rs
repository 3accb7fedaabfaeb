// src/requant/mod.rs

//! # 하드웨어 재양자화
//!
//! 2의 보수 값의 비트 폭을 줄일 때 쓰는 반올림(`round`)과 포화(`saturate`)를
//! 하드웨어 참조 구현과 비트 단위로 동일하게 재현합니다.
//! 입력은 `in_width`로 마스킹되고 결과는 `out_width` 비트 패턴입니다.

use crate::codec::bits::{check_width, from_signed, mask, to_signed};
use crate::error::Result;

/// 반올림 동작 설정
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RoundOptions {
    /// 음수의 정확한 절반(.5)을 올림할지 여부. `false`면 내림.
    pub round_negative_up: bool,

    /// 양수 올림이 최대값을 넘을 때 포화할지 여부. `false`면 랩어라운드.
    pub saturate: bool,
}

impl Default for RoundOptions {
    fn default() -> Self {
        Self {
            round_negative_up: true,
            saturate: true,
        }
    }
}

/// `in_width` 비트 값을 `out_width` 비트로 반올림합니다.
///
/// `in_width <= out_width`이면 부호 확장만 합니다. 그렇지 않으면 상위
/// `out_width` 비트를 남기고 바로 아래 비트(round bit)를 보고 1을 더할지 결정합니다.
pub fn round_fixed(
    value: i128,
    in_width: u32,
    out_width: u32,
    round_negative_up: bool,
    saturate: bool,
) -> Result<u128> {
    round_fixed_with(
        value,
        in_width,
        out_width,
        &RoundOptions {
            round_negative_up,
            saturate,
        },
    )
}

pub fn round_fixed_with(value: i128, in_width: u32, out_width: u32, opts: &RoundOptions) -> Result<u128> {
    check_width("input_width", in_width)?;
    check_width("output_width", out_width)?;

    let out_mask = mask(out_width);
    let x = (value as u128) & mask(in_width);
    let sign_bit = (x >> (in_width - 1)) & 1;

    if in_width <= out_width {
        return Ok(from_signed(to_signed(x, in_width), out_width));
    }

    let drop = in_width - out_width;
    let v = (x >> drop) & out_mask;

    let round_bit = (x >> (drop - 1)) & 1;
    if round_bit == 0 {
        return Ok(v);
    }

    // 양수
    if sign_bit == 0 {
        if !opts.saturate {
            return Ok(v.wrapping_add(1) & out_mask);
        }
        if out_width == 1 {
            // 1비트에서 올리면 부호가 뒤집힘
            return Ok(v);
        }
        let max_mag = mask(out_width - 1);
        if v & max_mag != max_mag {
            return Ok((v + 1) & out_mask);
        }
        return Ok(v);
    }

    // 음수
    if !opts.round_negative_up {
        let lower = if drop > 1 { x & mask(drop - 1) } else { 0 };
        if lower == 0 {
            // 정확히 절반
            return Ok(v);
        }
    }
    Ok(v.wrapping_add(1) & out_mask)
}

/// `in_width` 비트 값을 `out_width` 비트로 포화시킵니다.
///
/// 버려지는 상위 비트와 새 부호 비트가 원래 부호 비트와 모두 같으면 하위 비트만
/// 남기고, 아니면 `0111..1` 또는 `1000..0`으로 고정합니다.
pub fn saturate_fixed(value: i128, in_width: u32, out_width: u32) -> Result<u128> {
    check_width("input_width", in_width)?;
    check_width("output_width", out_width)?;

    let x = (value as u128) & mask(in_width);
    let sign_bit = (x >> (in_width - 1)) & 1;

    if in_width <= out_width {
        return Ok(from_signed(to_signed(x, in_width), out_width));
    }

    // bits[out_width-1 ..= in_width-2]
    let span = in_width - out_width;
    let region = (x >> (out_width - 1)) & mask(span);

    let overflow = if sign_bit == 0 {
        region != 0
    } else {
        region != mask(span)
    };

    if overflow {
        return Ok(if sign_bit == 0 {
            mask(out_width - 1)
        } else {
            1u128 << (out_width - 1)
        });
    }

    Ok(x & mask(out_width))
}

/// 반올림 후 포화. 누산기 출력 경로(예: 36 → 19 → 18비트)에 쓰입니다.
pub fn round_saturate(value: i128, in_width: u32, round_width: u32, out_width: u32) -> Result<u128> {
    let rounded = round_fixed_with(value, in_width, round_width, &RoundOptions::default())?;
    saturate_fixed(to_signed(rounded, round_width), round_width, out_width)
}
