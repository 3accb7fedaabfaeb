// src/pipeline/mod.rs

//! # 변환 파이프라인
//!
//! 이름 붙은 원시 신호들을 게이팅(valid/SOP/EOP) → 레인 역다중화 → 디코딩 순서로
//! 처리하고, 두 신호를 실수/허수 또는 짝/홀 인터리브로 결합합니다.
//! 설정은 처리 전에 모두 검증되며 실패 시 부분 결과를 만들지 않습니다.

use crate::codec::{
    decode_complex_fixed, decode_float, encode_fixed_batch, DataType, FixedFormat, RawToken, Sample,
};
use crate::error::{Result, TraceError};
use crate::lanes::{demux_stream, Demuxed, LaneLayout, LaneMode};
use crate::packet::{filter_data_all_packets, filter_data_packets_list};
use rustfft::num_complex::Complex64;
use std::str::FromStr;

/// 패킷 출력 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PacketOutput {
    /// 모든 패킷을 하나로 이어붙임
    #[default]
    Single,
    /// 패킷마다 `{name}__pkt{k}` 신호
    Multi,
}

impl FromStr for PacketOutput {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "single" => Ok(PacketOutput::Single),
            "multi" => Ok(PacketOutput::Multi),
            other => Err(TraceError::UnknownMode(other.to_string())),
        }
    }
}

/// 두 신호 결합 방식
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CombineMode {
    /// 첫 신호를 실수부, 둘째를 허수부로
    RealImag,
    /// `a0 b0 a1 b1 ...` 인터리브
    EvenOdd,
}

impl CombineMode {
    fn label(&self) -> &'static str {
        match self {
            CombineMode::RealImag => "ReIm",
            CombineMode::EvenOdd => "EvenOdd",
        }
    }
}

impl FromStr for CombineMode {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "ri" | "reim" | "real_imag" => Ok(CombineMode::RealImag),
            "eo" | "evenodd" | "even_odd" => Ok(CombineMode::EvenOdd),
            other => Err(TraceError::UnknownMode(other.to_string())),
        }
    }
}

/// 변환 설정
#[derive(Debug, Clone)]
pub struct ConvertConfig {
    /// 워드 해석 방식
    pub data_type: DataType,

    /// 고정소수점 I/Q 복소수 여부 (`Float`는 항상 복소수)
    pub complex: bool,

    /// 레인 수와 출력 순서
    pub layout: LaneLayout,

    /// 패킷 출력 방식
    pub packet_output: PacketOutput,
}

impl Default for ConvertConfig {
    fn default() -> Self {
        Self {
            data_type: DataType::Fixed(FixedFormat::default()),
            complex: false,
            layout: LaneLayout::default(),
            packet_output: PacketOutput::Single,
        }
    }
}

impl ConvertConfig {
    pub fn validate(&self) -> Result<()> {
        if let Some(bits) = self.data_type.sample_bits(self.complex) {
            self.layout.check_fits(bits)?;
        }
        Ok(())
    }
}

/// 이름 붙은 원시 신호 열
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Signal {
    pub name: String,
    pub samples: Vec<RawToken>,
}

impl Signal {
    pub fn new(name: impl Into<String>, samples: Vec<RawToken>) -> Self {
        Self {
            name: name.into(),
            samples,
        }
    }
}

/// valid / SOP / EOP 게이팅 신호. 모두 `None`이면 게이팅하지 않습니다.
#[derive(Debug, Clone, Default)]
pub struct Gating {
    pub valid: Option<Vec<RawToken>>,
    pub sop: Option<Vec<RawToken>>,
    pub eop: Option<Vec<RawToken>>,
}

impl Gating {
    /// 빈 열은 주어지지 않은 것과 같음
    pub fn is_empty(&self) -> bool {
        [&self.valid, &self.sop, &self.eop]
            .iter()
            .all(|c| c.as_ref().map_or(true, Vec::is_empty))
    }

    fn flat(&self, samples: &[RawToken]) -> Result<Vec<RawToken>> {
        filter_data_all_packets(samples, self.valid.as_deref(), self.sop.as_deref(), self.eop.as_deref())
    }

    fn packets(&self, samples: &[RawToken]) -> Result<Vec<Vec<RawToken>>> {
        filter_data_packets_list(samples, self.valid.as_deref(), self.sop.as_deref(), self.eop.as_deref())
    }
}

/// 변환 결과 샘플
#[derive(Debug, Clone, PartialEq)]
pub enum Converted {
    Decoded(Vec<Sample>),
    AsIs(Vec<RawToken>),
}

impl Converted {
    pub fn len(&self) -> usize {
        match self {
            Converted::Decoded(v) => v.len(),
            Converted::AsIs(v) => v.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct ConvertedSignal {
    pub name: String,
    pub samples: Converted,
}

/// 토큰 열을 디코딩합니다. `AsIs`는 지원하지 않습니다.
pub fn convert_samples(tokens: &[RawToken], config: &ConvertConfig) -> Result<Demuxed<Sample>> {
    config.validate()?;
    let sample_bits = config
        .data_type
        .sample_bits(config.complex)
        .ok_or_else(|| TraceError::Unsupported("as-is data has no lane decoding".to_string()))?;

    let words = tokens
        .iter()
        .map(RawToken::parse_word)
        .collect::<Result<Vec<_>>>()?;

    let complex = config.complex;
    match config.data_type {
        DataType::Fixed(fmt) => demux_stream(&words, sample_bits, &config.layout, move |raw| {
            decode_complex_fixed(raw, &fmt, complex)
        }),
        DataType::Float(fmt) => demux_stream(&words, sample_bits, &config.layout, move |raw| {
            Sample::Complex(decode_float(raw, &fmt))
        }),
        DataType::AsIs => Err(TraceError::Unsupported("as-is data has no lane decoding".to_string())),
    }
}

/// 신호 하나를 변환합니다. 병렬 레이아웃이면 `{name}_{lane}` 채널들이 나옵니다.
pub fn convert_signal(signal: &Signal, config: &ConvertConfig) -> Result<Vec<ConvertedSignal>> {
    if config.data_type == DataType::AsIs {
        return Ok(vec![ConvertedSignal {
            name: signal.name.clone(),
            samples: Converted::AsIs(signal.samples.clone()),
        }]);
    }

    Ok(match convert_samples(&signal.samples, config)? {
        Demuxed::Serial(samples) => vec![ConvertedSignal {
            name: signal.name.clone(),
            samples: Converted::Decoded(samples),
        }],
        Demuxed::Parallel(channels) => channels
            .into_iter()
            .enumerate()
            .map(|(lane, samples)| ConvertedSignal {
                name: format!("{}_{}", signal.name, lane),
                samples: Converted::Decoded(samples),
            })
            .collect(),
    })
}

/// 신호 표 전체를 변환합니다.
pub fn convert_table(signals: &[Signal], config: &ConvertConfig) -> Result<Vec<ConvertedSignal>> {
    config.validate()?;
    let mut out = Vec::with_capacity(signals.len() * config.layout.parallelism());
    for signal in signals {
        out.extend(convert_signal(signal, config)?);
    }
    tracing::debug!(inputs = signals.len(), outputs = out.len(), "converted signal table");
    Ok(out)
}

/// 게이팅을 적용합니다. `Multi`이면 패킷마다 `{name}__pkt{k}` 신호가 됩니다.
pub fn gate_signals(signals: &[Signal], gating: &Gating, output: PacketOutput) -> Result<Vec<Signal>> {
    if gating.is_empty() {
        return Ok(signals.to_vec());
    }

    let mut out = Vec::new();
    for signal in signals {
        match output {
            PacketOutput::Single => out.push(Signal::new(signal.name.clone(), gating.flat(&signal.samples)?)),
            PacketOutput::Multi => {
                for (k, pkt) in gating.packets(&signal.samples)?.into_iter().enumerate() {
                    out.push(Signal::new(format!("{}__pkt{}", signal.name, k), pkt));
                }
            }
        }
    }
    Ok(out)
}

/// 두 디코딩된 샘플 열을 결합합니다.
pub fn combine(a: &[Sample], b: &[Sample], mode: CombineMode) -> Result<Vec<Sample>> {
    if a.len() != b.len() {
        return Err(TraceError::LengthMismatch {
            signal: "combine".to_string(),
            expected: a.len(),
            got: b.len(),
        });
    }

    match mode {
        CombineMode::RealImag => {
            if a.iter().chain(b.iter()).any(Sample::is_complex) {
                return Err(TraceError::Unsupported(
                    "real/imag combine needs two real signals".to_string(),
                ));
            }
            Ok(a.iter()
                .zip(b)
                .map(|(x, y)| Sample::Complex(Complex64::new(x.re(), y.re())))
                .collect())
        }
        CombineMode::EvenOdd => Ok(a.iter().zip(b).flat_map(|(&x, &y)| [x, y]).collect()),
    }
}

/// 두 원시 신호를 게이팅, 변환 후 결합합니다.
///
/// `swap`이면 변환 뒤 두 신호의 역할(이름 포함)을 바꿉니다.
pub fn combine_signals(
    first: &Signal,
    second: &Signal,
    config: &ConvertConfig,
    gating: &Gating,
    mode: CombineMode,
    swap: bool,
) -> Result<Vec<ConvertedSignal>> {
    config.validate()?;
    if config.layout.mode() == LaneMode::Parallel {
        return Err(TraceError::Unsupported(
            "cannot combine parallel-lane signals; use serial mode".to_string(),
        ));
    }
    match (config.data_type, mode) {
        (DataType::AsIs, _) => {
            return Err(TraceError::Unsupported(
                "combine needs fixed or float data".to_string(),
            ))
        }
        (DataType::Float(_), CombineMode::RealImag) => {
            return Err(TraceError::Unsupported(
                "float words are already I/Q; real/imag combine is for scalar fixed data".to_string(),
            ))
        }
        (DataType::Fixed(_), CombineMode::RealImag) if config.complex => {
            return Err(TraceError::Unsupported(
                "cannot combine two complex signals into one complex signal".to_string(),
            ))
        }
        _ => {}
    }
    if first.samples.len() != second.samples.len() {
        return Err(TraceError::LengthMismatch {
            signal: second.name.clone(),
            expected: first.samples.len(),
            got: second.samples.len(),
        });
    }

    let (name_a, name_b) = if swap {
        (&second.name, &first.name)
    } else {
        (&first.name, &second.name)
    };
    let base = format!("{}_{}_{}", name_a, mode.label(), name_b);

    let combine_pair = |a: &[RawToken], b: &[RawToken]| -> Result<Vec<Sample>> {
        let mut xa = decoded_serial(a, config)?;
        let mut xb = decoded_serial(b, config)?;
        if swap {
            std::mem::swap(&mut xa, &mut xb);
        }
        combine(&xa, &xb, mode)
    };

    // 게이팅이 없으면 패킷 모드와 관계없이 신호 하나
    let pairs: Vec<(String, Vec<RawToken>, Vec<RawToken>)> = match config.packet_output {
        _ if gating.is_empty() => vec![(base, first.samples.clone(), second.samples.clone())],
        PacketOutput::Single => vec![(base, gating.flat(&first.samples)?, gating.flat(&second.samples)?)],
        PacketOutput::Multi => {
            let pa = gating.packets(&first.samples)?;
            let pb = gating.packets(&second.samples)?;
            pa.into_iter()
                .zip(pb)
                .enumerate()
                .map(|(k, (a, b))| (format!("{}__pkt{}", base, k), a, b))
                .collect()
        }
    };

    if pairs.iter().all(|(_, a, b)| a.is_empty() || b.is_empty()) {
        tracing::warn!(first = %first.name, second = %second.name, "no samples remain to combine after gating");
        return Ok(Vec::new());
    }

    pairs
        .into_iter()
        .map(|(name, a, b)| {
            Ok(ConvertedSignal {
                name,
                samples: Converted::Decoded(combine_pair(&a, &b)?),
            })
        })
        .collect()
}

fn decoded_serial(tokens: &[RawToken], config: &ConvertConfig) -> Result<Vec<Sample>> {
    Ok(convert_samples(tokens, config)?
        .into_channels()
        .into_iter()
        .flatten()
        .collect())
}

/// 변환된 신호를 고정소수점 정수 쌍 `(real, imag)`으로 내보냅니다.
///
/// `AsIs` 토큰은 10진 실수로 해석되며, 숫자가 아니면 에러입니다.
pub fn export_fixed(samples: &Converted, fmt: &FixedFormat) -> Result<Vec<(i128, i128)>> {
    match samples {
        Converted::Decoded(v) => Ok(encode_fixed_batch(v, fmt)),
        Converted::AsIs(tokens) => {
            let values = tokens
                .iter()
                .map(|t| match t {
                    RawToken::Int(v) => Ok(Sample::Real(*v as f64)),
                    RawToken::Text(s) => s
                        .trim()
                        .parse::<f64>()
                        .map(Sample::Real)
                        .map_err(|_| TraceError::InvalidToken(s.clone())),
                })
                .collect::<Result<Vec<_>>>()?;
            Ok(encode_fixed_batch(&values, fmt))
        }
    }
}

#[cfg(test)]
mod __test__;
