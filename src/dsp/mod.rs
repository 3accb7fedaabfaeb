// src/dsp/mod.rs

//! # DSP 연산 체인
//!
//! 디코딩된 복소수 샘플 버퍼에 적용하는 순수 변환들입니다.
//! 연산 종류는 열거형으로 고정되어 있고 각 변형이 자기 파라미터를 가집니다.
//! 결과 신호 이름은 입력 이름에 [`DspOp::suffix`]를 붙여 만듭니다.

use crate::error::{Result, TraceError};
use ndarray::{s, Array1, ArrayView1};
use num_traits::Zero;
use rustfft::num_complex::Complex64;
use rustfft::FftPlanner;
use std::f64::consts::PI;
use std::str::FromStr;

/// 컨볼루션 출력 길이 규칙
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConvMode {
    /// 입력 중 긴 쪽 길이, 가운데 정렬
    #[default]
    Same,
    /// `n + m - 1`
    Full,
}

impl FromStr for ConvMode {
    type Err = TraceError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "same" => Ok(ConvMode::Same),
            "full" => Ok(ConvMode::Full),
            other => Err(TraceError::UnknownMode(other.to_string())),
        }
    }
}

/// 주파수 이동 파라미터
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FreqShiftParams {
    pub freq: f64,
    pub fs: f64,
}

/// FIR 필터 파라미터. `interp`배 제로 삽입 → 컨볼루션 → `decim`배 솎아내기.
#[derive(Debug, Clone, PartialEq)]
pub struct FirParams {
    pub coeffs: Vec<f64>,
    pub interp: usize,
    pub decim: usize,
    pub mode: ConvMode,
}

impl FirParams {
    pub fn new(coeffs: Vec<f64>) -> Self {
        Self {
            coeffs,
            interp: 1,
            decim: 1,
            mode: ConvMode::Same,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub enum DspOp {
    Fft,
    /// FFT 후 0 Hz 를 가운데로
    FftShift,
    FreqShift(FreqShiftParams),
    Fir(FirParams),
    /// 최대 크기로 나눔. 모두 0 이면 그대로.
    Normalize,
}

impl DspOp {
    /// 파라미터를 검사합니다. [`DspOp::apply`]도 먼저 호출합니다.
    pub fn validate(&self) -> Result<()> {
        match self {
            DspOp::FreqShift(p) => {
                if p.fs.is_nan() || p.fs <= 0.0 {
                    return Err(TraceError::InvalidFormat(format!(
                        "sample rate must be positive, got {}",
                        p.fs
                    )));
                }
            }
            DspOp::Fir(p) => {
                if p.coeffs.is_empty() {
                    return Err(TraceError::EmptyCoefficients);
                }
                if p.interp == 0 {
                    return Err(TraceError::InvalidWidth {
                        name: "interp",
                        width: 0,
                    });
                }
                if p.decim == 0 {
                    return Err(TraceError::InvalidWidth {
                        name: "decim",
                        width: 0,
                    });
                }
            }
            DspOp::Fft | DspOp::FftShift | DspOp::Normalize => {}
        }
        Ok(())
    }

    /// 결과 신호 이름에 붙는 접미사
    pub fn suffix(&self) -> String {
        match self {
            DspOp::Fft => "_fft".to_string(),
            DspOp::FftShift => "_fftshift".to_string(),
            DspOp::FreqShift(_) => "_fshift".to_string(),
            DspOp::Normalize => "_norm".to_string(),
            DspOp::Fir(p) => {
                let mut name = "_filt".to_string();
                if p.interp != 1 {
                    name.push_str(&format!("_L{}", p.interp));
                }
                if p.decim != 1 {
                    name.push_str(&format!("_M{}", p.decim));
                }
                name
            }
        }
    }

    /// 연산을 적용합니다. 빈 입력은 빈 출력이 됩니다.
    pub fn apply(&self, x: ArrayView1<Complex64>) -> Result<Array1<Complex64>> {
        self.validate()?;
        if x.is_empty() {
            return Ok(Array1::zeros(0));
        }

        let y = match self {
            DspOp::Fft => fft(x),
            DspOp::FftShift => {
                let mut spec = fft(x);
                fftshift(&mut spec);
                spec
            }
            DspOp::FreqShift(p) => freq_shift(x, p),
            DspOp::Fir(p) => fir(x, p),
            DspOp::Normalize => normalize(x),
        };
        tracing::debug!(op = %self.suffix(), n_in = x.len(), n_out = y.len(), "dsp op applied");
        Ok(y)
    }
}

/// 연산들을 차례로 적용하고 접미사를 이어붙인 이름과 함께 돌려줍니다.
pub fn apply_chain(
    name: &str,
    x: ArrayView1<Complex64>,
    ops: &[DspOp],
) -> Result<(String, Array1<Complex64>)> {
    for op in ops {
        op.validate()?;
    }
    let mut name = name.to_string();
    let mut y = x.to_owned();
    for op in ops {
        y = op.apply(y.view())?;
        name.push_str(&op.suffix());
    }
    Ok((name, y))
}

fn fft(x: ArrayView1<Complex64>) -> Array1<Complex64> {
    let mut buf = x.to_vec();
    let plan = FftPlanner::new().plan_fft_forward(buf.len());
    plan.process(&mut buf);
    Array1::from_vec(buf)
}

/// `numpy.fft.fftshift`와 같이 `n/2` 만큼 오른쪽으로 회전
pub fn fftshift(spec: &mut Array1<Complex64>) {
    let n = spec.len();
    if let Some(buf) = spec.as_slice_mut() {
        buf.rotate_right(n / 2);
    }
}

fn freq_shift(x: ArrayView1<Complex64>, p: &FreqShiftParams) -> Array1<Complex64> {
    let step = 2.0 * PI * p.freq / p.fs;
    Array1::from_iter(
        x.iter()
            .enumerate()
            .map(|(n, &v)| v * Complex64::from_polar(1.0, step * n as f64)),
    )
}

fn fir(x: ArrayView1<Complex64>, p: &FirParams) -> Array1<Complex64> {
    let up = if p.interp > 1 {
        let mut up = Array1::<Complex64>::zeros(x.len() * p.interp);
        up.slice_mut(s![..;p.interp]).assign(&x);
        up
    } else {
        x.to_owned()
    };

    let y = convolve(up.view(), &p.coeffs, p.mode);
    if p.decim > 1 {
        y.slice(s![..;p.decim]).to_owned()
    } else {
        y
    }
}

/// `numpy.convolve`와 같은 길이 규칙의 직접 컨볼루션. 한쪽이 비어 있으면 빈 결과.
pub fn convolve(x: ArrayView1<Complex64>, h: &[f64], mode: ConvMode) -> Array1<Complex64> {
    let (n, m) = (x.len(), h.len());
    if n == 0 || m == 0 {
        return Array1::zeros(0);
    }
    let mut full = Array1::<Complex64>::zeros(n + m - 1);
    for (i, &xi) in x.iter().enumerate() {
        if xi.is_zero() {
            continue;
        }
        for (j, &hj) in h.iter().enumerate() {
            full[i + j] += xi * hj;
        }
    }

    match mode {
        ConvMode::Full => full,
        ConvMode::Same => {
            let len = n.max(m);
            let start = (n.min(m) - 1) / 2;
            full.slice(s![start..start + len]).to_owned()
        }
    }
}

fn normalize(x: ArrayView1<Complex64>) -> Array1<Complex64> {
    let peak = x.iter().map(|c| c.norm()).fold(0.0, f64::max);
    if peak == 0.0 {
        return x.to_owned();
    }
    x.mapv(|c| c / peak)
}
