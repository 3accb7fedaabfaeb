// src/codec/types.rs

use crate::error::{Result, TraceError};
use rustfft::num_complex::Complex64;

/// 트레이스에서 읽거나 쓰는 원자 단위 워드
pub type RawWord = u128;

/// 한 워드(모든 레인 포함)의 최대 비트 수
pub const MAX_WORD_BITS: u32 = 128;
/// 한 샘플(I 또는 Q 한쪽)의 최대 비트 수
pub const MAX_SAMPLE_BITS: u32 = 64;

/// 상위 수집기에서 넘어오는 원시 토큰. 텍스트는 16진수로 해석합니다.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RawToken {
    Int(u128),
    Text(String),
}

impl RawToken {
    /// 토큰을 워드로 변환합니다. `0x` 접두사와 앞뒤 공백은 허용됩니다.
    pub fn parse_word(&self) -> Result<RawWord> {
        match self {
            RawToken::Int(v) => Ok(*v),
            RawToken::Text(s) => {
                let t = s.trim();
                let digits = t
                    .strip_prefix("0x")
                    .or_else(|| t.strip_prefix("0X"))
                    .unwrap_or(t);
                if digits.is_empty() {
                    return Err(TraceError::InvalidToken(s.clone()));
                }
                u128::from_str_radix(digits, 16).map_err(|_| TraceError::InvalidToken(s.clone()))
            }
        }
    }
}

impl From<u128> for RawToken {
    fn from(v: u128) -> Self {
        RawToken::Int(v)
    }
}

impl From<&str> for RawToken {
    fn from(s: &str) -> Self {
        RawToken::Text(s.to_string())
    }
}

impl From<String> for RawToken {
    fn from(s: String) -> Self {
        RawToken::Text(s)
    }
}

/// 고정소수점 포맷 `s.int.frac`
///
/// | 비트                               | 필드   |
/// |------------------------------------|--------|
/// | `total-1` (sign_bits == 1일 때)     | 부호   |
/// | `frac+int-1 ..= frac`              | 정수부 |
/// | `frac-1 ..= 0`                     | 소수부 |
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FixedFormat {
    sign_bits: u32,
    int_bits: u32,
    frac_bits: u32,
}

impl FixedFormat {
    /// `s.0.15`
    pub const DEFAULT: FixedFormat = FixedFormat {
        sign_bits: 1,
        int_bits: 0,
        frac_bits: 15,
    };

    pub fn new(sign_bits: u32, int_bits: u32, frac_bits: u32) -> Result<Self> {
        if sign_bits > 1 {
            return Err(TraceError::InvalidFormat(format!(
                "sign_bits must be 0 or 1, got {sign_bits}"
            )));
        }
        let total = sign_bits
            .checked_add(int_bits)
            .and_then(|t| t.checked_add(frac_bits))
            .ok_or(TraceError::WidthOverflow {
                bits: u32::MAX,
                max: MAX_SAMPLE_BITS,
            })?;
        if total < 1 {
            return Err(TraceError::InvalidWidth {
                name: "fixed total_bits",
                width: total,
            });
        }
        if total > MAX_SAMPLE_BITS {
            return Err(TraceError::WidthOverflow {
                bits: total,
                max: MAX_SAMPLE_BITS,
            });
        }
        Ok(Self {
            sign_bits,
            int_bits,
            frac_bits,
        })
    }

    pub fn sign_bits(&self) -> u32 {
        self.sign_bits
    }

    pub fn int_bits(&self) -> u32 {
        self.int_bits
    }

    pub fn frac_bits(&self) -> u32 {
        self.frac_bits
    }

    pub fn is_signed(&self) -> bool {
        self.sign_bits == 1
    }

    pub fn total_bits(&self) -> u32 {
        self.sign_bits + self.int_bits + self.frac_bits
    }

    /// 부호를 제외한 크기 비트 수
    pub fn magnitude_bits(&self) -> u32 {
        self.int_bits + self.frac_bits
    }

    /// 표현 가능한 코드 범위 `[min, max]`
    pub fn code_range(&self) -> (i128, i128) {
        let m = self.magnitude_bits();
        let max = (1i128 << m) - 1;
        if self.is_signed() {
            (-(1i128 << m), max)
        } else {
            (0, max)
        }
    }
}

impl Default for FixedFormat {
    fn default() -> Self {
        Self::DEFAULT
    }
}

/// 공유 지수 I/Q 부동소수점 포맷. 워드 배치는 MSB부터 `exp | Q | I`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FloatFormat {
    exp_bits: u32,
    man_bits: u32,
}

impl FloatFormat {
    /// 하드웨어 고정값 (`MAN = 13`, `EXP = 6`)
    pub const FLOAT_ENUM: FloatFormat = FloatFormat {
        exp_bits: 6,
        man_bits: 13,
    };

    pub fn new(exp_bits: u32, man_bits: u32) -> Result<Self> {
        if man_bits < 1 {
            return Err(TraceError::InvalidWidth {
                name: "man_bits",
                width: man_bits,
            });
        }
        if man_bits > MAX_SAMPLE_BITS {
            return Err(TraceError::WidthOverflow {
                bits: man_bits,
                max: MAX_SAMPLE_BITS,
            });
        }
        // man_bits <= 64 이므로 2 * man_bits 는 넘치지 않음
        let total = exp_bits.checked_add(2 * man_bits).unwrap_or(u32::MAX);
        if total > MAX_WORD_BITS {
            return Err(TraceError::WidthOverflow {
                bits: total,
                max: MAX_WORD_BITS,
            });
        }
        Ok(Self { exp_bits, man_bits })
    }

    pub fn exp_bits(&self) -> u32 {
        self.exp_bits
    }

    pub fn man_bits(&self) -> u32 {
        self.man_bits
    }

    pub fn total_bits(&self) -> u32 {
        self.exp_bits + 2 * self.man_bits
    }
}

impl Default for FloatFormat {
    fn default() -> Self {
        Self::FLOAT_ENUM
    }
}

/// 단계 사이를 오가는 샘플 값
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Sample {
    Real(f64),
    Complex(Complex64),
}

impl Sample {
    pub fn re(&self) -> f64 {
        match self {
            Sample::Real(v) => *v,
            Sample::Complex(c) => c.re,
        }
    }

    pub fn im(&self) -> f64 {
        match self {
            Sample::Real(_) => 0.0,
            Sample::Complex(c) => c.im,
        }
    }

    pub fn is_complex(&self) -> bool {
        matches!(self, Sample::Complex(_))
    }

    pub fn to_complex(&self) -> Complex64 {
        Complex64::new(self.re(), self.im())
    }
}

impl From<f64> for Sample {
    fn from(v: f64) -> Self {
        Sample::Real(v)
    }
}

impl From<Complex64> for Sample {
    fn from(c: Complex64) -> Self {
        Sample::Complex(c)
    }
}
