// src/lanes/mod.rs

//! # 레인 다중화 / 역다중화
//!
//! `N`개의 샘플을 워드 하나에 `{lane_{N-1}, ..., lane_1, lane_0}` 순서로
//! 담습니다. 레인 0 이 최하위 비트입니다.

use crate::codec::bits::mask;
use crate::codec::types::{RawWord, MAX_WORD_BITS};
use crate::error::{Result, TraceError};
use rayon::prelude::*;
use std::str::FromStr;

/// 레인 출력 순서
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LaneMode {
    /// 워드마다 레인 0..N 을 하나의 스트림에 이어붙임
    #[default]
    Serial,
    /// 레인마다 별도의 채널
    Parallel,
}

impl FromStr for LaneMode {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "serial" => Ok(LaneMode::Serial),
            "parallel" => Ok(LaneMode::Parallel),
            other => Err(TraceError::UnknownMode(other.to_string())),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct LaneLayout {
    parallelism: usize,
    mode: LaneMode,
}

impl LaneLayout {
    pub fn new(parallelism: usize, mode: LaneMode) -> Result<Self> {
        if parallelism < 1 {
            return Err(TraceError::InvalidFormat(
                "parallelism must be at least 1".to_string(),
            ));
        }
        Ok(Self { parallelism, mode })
    }

    pub fn serial(parallelism: usize) -> Result<Self> {
        Self::new(parallelism, LaneMode::Serial)
    }

    pub fn parallel(parallelism: usize) -> Result<Self> {
        Self::new(parallelism, LaneMode::Parallel)
    }

    pub fn parallelism(&self) -> usize {
        self.parallelism
    }

    pub fn mode(&self) -> LaneMode {
        self.mode
    }

    /// 레인 폭과 레인 수가 워드 한계 안에 들어가는지 확인합니다.
    pub fn check_fits(&self, sample_bits: u32) -> Result<()> {
        check_lane_bits(sample_bits, self.parallelism)
    }
}

impl Default for LaneLayout {
    fn default() -> Self {
        Self {
            parallelism: 1,
            mode: LaneMode::Serial,
        }
    }
}

fn check_lane_bits(sample_bits: u32, parallelism: usize) -> Result<()> {
    if sample_bits < 1 {
        return Err(TraceError::InvalidWidth {
            name: "sample_bits",
            width: sample_bits,
        });
    }
    let total = (sample_bits as u64).checked_mul(parallelism as u64);
    match total {
        Some(t) if t <= MAX_WORD_BITS as u64 => {}
        _ => {
            return Err(TraceError::WidthOverflow {
                bits: total.map_or(u32::MAX, |t| t.min(u32::MAX as u64) as u32),
                max: MAX_WORD_BITS,
            })
        }
    }
    Ok(())
}

/// 역다중화 결과
#[derive(Debug, Clone, PartialEq)]
pub enum Demuxed<T> {
    Serial(Vec<T>),
    Parallel(Vec<Vec<T>>),
}

impl<T> Demuxed<T> {
    /// 채널 목록으로 펼칩니다. `Serial`은 채널 하나.
    pub fn into_channels(self) -> Vec<Vec<T>> {
        match self {
            Demuxed::Serial(v) => vec![v],
            Demuxed::Parallel(chs) => chs,
        }
    }

    pub fn map<U>(self, mut f: impl FnMut(T) -> U) -> Demuxed<U> {
        match self {
            Demuxed::Serial(v) => Demuxed::Serial(v.into_iter().map(&mut f).collect()),
            Demuxed::Parallel(chs) => Demuxed::Parallel(
                chs.into_iter()
                    .map(|ch| ch.into_iter().map(&mut f).collect())
                    .collect(),
            ),
        }
    }
}

/// `lane_i = (word >> i*sample_bits) & mask`. 호출자가 폭을 검증했다고 가정합니다.
#[inline(always)]
fn extract_lanes(word: RawWord, sample_bits: u32, parallelism: usize) -> impl Iterator<Item = RawWord> {
    let lane_mask = mask(sample_bits);
    (0..parallelism).map(move |i| {
        let shift = i as u32 * sample_bits;
        if shift >= MAX_WORD_BITS {
            0
        } else {
            (word >> shift) & lane_mask
        }
    })
}

/// 워드 하나를 레인 값들로 나눕니다.
pub fn demux_word(word: RawWord, sample_bits: u32, parallelism: usize) -> Result<Vec<RawWord>> {
    check_lane_bits(sample_bits, parallelism)?;
    Ok(extract_lanes(word, sample_bits, parallelism).collect())
}

/// 레인 값들을 워드 하나로 합칩니다 (레인 0 이 최하위). 각 레인은 마스킹됩니다.
pub fn mux_lanes(lanes: &[RawWord], sample_bits: u32) -> Result<RawWord> {
    check_lane_bits(sample_bits, lanes.len().max(1))?;
    let lane_mask = mask(sample_bits);
    Ok(lanes
        .iter()
        .enumerate()
        .fold(0u128, |word, (i, &lane)| word | ((lane & lane_mask) << (i as u32 * sample_bits))))
}

/// 워드 스트림을 레이아웃에 따라 역다중화하고 각 레인을 `decode`로 변환합니다.
pub fn demux_stream<T, F>(words: &[RawWord], sample_bits: u32, layout: &LaneLayout, decode: F) -> Result<Demuxed<T>>
where
    T: Send,
    F: Fn(RawWord) -> T + Sync,
{
    layout.check_fits(sample_bits)?;
    let n = layout.parallelism();

    match layout.mode() {
        LaneMode::Serial => Ok(Demuxed::Serial(
            words
                .iter()
                .flat_map(|&w| extract_lanes(w, sample_bits, n))
                .map(&decode)
                .collect(),
        )),
        LaneMode::Parallel => {
            // 레인마다 독립적이므로 채널 단위로 병렬 처리
            let channels = (0..n)
                .into_par_iter()
                .map(|lane| {
                    let shift = lane as u32 * sample_bits;
                    let lane_mask = mask(sample_bits);
                    words
                        .iter()
                        .map(|&w| decode((w >> shift) & lane_mask))
                        .collect::<Vec<T>>()
                })
                .collect();
            Ok(Demuxed::Parallel(channels))
        }
    }
}

/// 레인 묶음 목록을 워드 스트림으로 다중화합니다.
pub fn mux_stream(lanes_per_word: &[Vec<RawWord>], sample_bits: u32) -> Result<Vec<RawWord>> {
    lanes_per_word
        .iter()
        .map(|lanes| mux_lanes(lanes, sample_bits))
        .collect()
}
