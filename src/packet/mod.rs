// src/packet/mod.rs

//! # 패킷 프레이밍
//!
//! valid / SOP / EOP 제어 신호로 원시 샘플 스트림을 패킷 구간으로 나눕니다.
//! 제어 신호는 데이터와 같은 길이여야 하며, 빈 신호는 "주어지지 않음"과 같습니다.

use crate::codec::types::RawToken;
use crate::error::{Result, TraceError};

/// 반열린 구간 `[start, end)`
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PacketRange {
    pub start: usize,
    pub end: usize,
}

impl PacketRange {
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }
}

/// 제어 신호 토큰. 숫자 1 과 같으면 assert 된 것으로 봅니다.
pub trait ControlToken {
    fn is_asserted(&self) -> bool;
}

/// `"1"`, `"0x1"`, `"0b1"`, `"0o1"`, `"1'b1"`, `"1b1"` 은 참, 나머지(빈 문자열 포함)는 거짓.
pub fn is_asserted(token: &str) -> bool {
    let s = token.trim();
    if s.is_empty() {
        return false;
    }
    if let Some(v) = parse_auto_radix(s) {
        return v == 1;
    }
    matches!(s, "1'b1" | "1b1")
}

/// 접두사로 진법을 고르는 정수 파싱 (`0x`, `0b`, `0o`, 10진수)
///
/// 10진수는 `0` 으로 시작할 수 없고(`"0"`, `"00"` 제외), `_` 는 숫자 사이에 하나씩만
/// 올 수 있습니다. 접두사 바로 뒤의 `_` 하나는 허용됩니다.
fn parse_auto_radix(s: &str) -> Option<i128> {
    let (neg, body) = match s.strip_prefix('-') {
        Some(rest) => (true, rest),
        None => (false, s.strip_prefix('+').unwrap_or(s)),
    };
    let lower = body.to_ascii_lowercase();
    let (radix, digits) = match lower.get(..2) {
        Some("0x") => (16, &lower[2..]),
        Some("0b") => (2, &lower[2..]),
        Some("0o") => (8, &lower[2..]),
        _ => (10, lower.as_str()),
    };
    let digits = if radix == 10 {
        digits
    } else {
        digits.strip_prefix('_').unwrap_or(digits)
    };
    if digits.is_empty() || digits.starts_with('_') || digits.ends_with('_') || digits.contains("__") {
        return None;
    }

    let clean = digits.replace('_', "");
    if !clean.bytes().all(|b| b.is_ascii_alphanumeric()) {
        return None;
    }
    if radix == 10 && clean.starts_with('0') && clean.bytes().any(|b| b != b'0') {
        return None;
    }
    let v = i128::from_str_radix(&clean, radix).ok()?;
    Some(if neg { -v } else { v })
}

impl ControlToken for str {
    fn is_asserted(&self) -> bool {
        is_asserted(self)
    }
}

impl ControlToken for &str {
    fn is_asserted(&self) -> bool {
        is_asserted(self)
    }
}

impl ControlToken for String {
    fn is_asserted(&self) -> bool {
        is_asserted(self)
    }
}

impl ControlToken for RawToken {
    fn is_asserted(&self) -> bool {
        match self {
            RawToken::Int(v) => *v == 1,
            RawToken::Text(s) => is_asserted(s),
        }
    }
}

macro_rules! impl_control_int {
    ($($t:ty),*) => {
        $(impl ControlToken for $t {
            fn is_asserted(&self) -> bool {
                *self == 1
            }
        })*
    };
}

impl_control_int!(u8, u16, u32, u64, u128, usize, i32, i64);

impl ControlToken for bool {
    fn is_asserted(&self) -> bool {
        *self
    }
}

/// 제어 신호를 주지 않을 때 타입 추론용으로 쓰는 값
pub const NO_CONTROL: Option<&'static [bool]> = None;

/// 빈 신호는 주어지지 않은 것으로 취급
fn supplied<C>(sig: Option<&[C]>) -> Option<&[C]> {
    sig.filter(|s| !s.is_empty())
}

fn check_len<C>(name: &str, sig: Option<&[C]>, n: usize) -> Result<()> {
    if let Some(s) = sig {
        if s.len() != n {
            return Err(TraceError::LengthMismatch {
                signal: name.to_string(),
                expected: n,
                got: s.len(),
            });
        }
    }
    Ok(())
}

fn first_asserted<C: ControlToken>(sig: &[C], from: usize) -> Option<usize> {
    sig[from..].iter().position(|t| t.is_asserted()).map(|k| from + k)
}

/// 길이 `n` 스트림을 SOP/EOP 로 패킷 구간들로 나눕니다.
///
/// SOP 가 있으면 다음 SOP 부터 시작하고 더 없으면 멈춥니다. EOP 가 있으면 그 샘플까지
/// 포함해 끝나고, 없으면 `n` 까지 갑니다. 둘 다 없으면 `[0, n)` 하나입니다.
pub fn find_packet_ranges<S, E>(n: usize, sop: Option<&[S]>, eop: Option<&[E]>) -> Result<Vec<PacketRange>>
where
    S: ControlToken,
    E: ControlToken,
{
    let sop = supplied(sop);
    let eop = supplied(eop);
    check_len("sop", sop, n)?;
    check_len("eop", eop, n)?;

    let mut ranges = Vec::new();
    let mut i = 0;
    while i < n {
        let mut start = i;
        if let Some(sop) = sop {
            match first_asserted(sop, i) {
                Some(k) => start = k,
                None => break,
            }
        }

        let mut end = n;
        if let Some(eop) = eop {
            if let Some(k) = first_asserted(eop, start) {
                end = k + 1;
            }
        }

        if end <= start {
            end = start + 1;
        }

        ranges.push(PacketRange { start, end });
        i = end;

        if sop.is_none() && eop.is_none() {
            break;
        }
    }

    tracing::debug!(n, packets = ranges.len(), "packet ranges computed");
    Ok(ranges)
}

/// 구간 안에서 valid 가 assert 된 샘플만 복사합니다.
fn collect_range<T: Clone, V: ControlToken>(samples: &[T], valid: Option<&[V]>, r: PacketRange) -> Vec<T> {
    match valid {
        Some(valid) => (r.start..r.end)
            .filter(|&i| valid[i].is_asserted())
            .map(|i| samples[i].clone())
            .collect(),
        None => samples[r.start..r.end].to_vec(),
    }
}

/// 데이터 길이와 모든 제어 신호를 검사한 뒤 패킷 구간을 계산합니다.
fn gated_ranges<T, V, S, E>(
    samples: &[T],
    valid: Option<&[V]>,
    sop: Option<&[S]>,
    eop: Option<&[E]>,
) -> Result<Vec<PacketRange>>
where
    V: ControlToken,
    S: ControlToken,
    E: ControlToken,
{
    let n = samples.len();
    check_len("valid", supplied(valid), n)?;
    find_packet_ranges(n, sop, eop)
}

/// 모든 패킷의 (valid 필터링된) 샘플을 순서대로 이어붙입니다.
pub fn filter_data_all_packets<T, V, S, E>(
    samples: &[T],
    valid: Option<&[V]>,
    sop: Option<&[S]>,
    eop: Option<&[E]>,
) -> Result<Vec<T>>
where
    T: Clone,
    V: ControlToken,
    S: ControlToken,
    E: ControlToken,
{
    let ranges = gated_ranges(samples, valid, sop, eop)?;
    let valid = supplied(valid);
    Ok(ranges
        .into_iter()
        .flat_map(|r| collect_range(samples, valid, r))
        .collect())
}

/// 패킷별 샘플 목록. 필터링 후 비어 있는 패킷은 버립니다.
pub fn filter_data_packets_list<T, V, S, E>(
    samples: &[T],
    valid: Option<&[V]>,
    sop: Option<&[S]>,
    eop: Option<&[E]>,
) -> Result<Vec<Vec<T>>>
where
    T: Clone,
    V: ControlToken,
    S: ControlToken,
    E: ControlToken,
{
    let ranges = gated_ranges(samples, valid, sop, eop)?;
    let valid = supplied(valid);
    Ok(ranges
        .into_iter()
        .map(|r| collect_range(samples, valid, r))
        .filter(|pkt| !pkt.is_empty())
        .collect())
}

/// 단일 패킷 버전: 첫 번째 패킷만 (valid 필터링 후) 돌려줍니다.
pub fn filter_data<T, V, S, E>(
    samples: &[T],
    valid: Option<&[V]>,
    sop: Option<&[S]>,
    eop: Option<&[E]>,
) -> Result<Vec<T>>
where
    T: Clone,
    V: ControlToken,
    S: ControlToken,
    E: ControlToken,
{
    let ranges = gated_ranges(samples, valid, sop, eop)?;
    Ok(ranges
        .first()
        .map(|&r| collect_range(samples, supplied(valid), r))
        .unwrap_or_default())
}

/// 알 수 없는 값(`X`, 빈 토큰)에서 열을 연속 구간들로 자릅니다. 빈 구간은 버립니다.
pub fn split_on_unknown<T: AsRef<str> + Clone>(tokens: &[T]) -> Vec<Vec<T>> {
    tokens
        .split(|t| {
            let s = t.as_ref().trim();
            s.is_empty() || s.eq_ignore_ascii_case("x")
        })
        .filter(|seg| !seg.is_empty())
        .map(|seg| seg.to_vec())
        .collect()
}

#[cfg(test)]
mod __test__;
