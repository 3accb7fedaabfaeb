// src/bindings/codec.rs

use numpy::{Complex64, IntoPyArray, PyArray1, PyReadonlyArray1};
use pyo3::prelude::*;

use crate::codec::{self, BlockFloatOptions, FixedFormat, FloatFormat, RawWord, Sample};

fn to_samples(values: &PyReadonlyArray1<Complex64>, complex: bool) -> Vec<Sample> {
    values
        .as_array()
        .iter()
        .map(|&c| if complex { Sample::Complex(c) } else { Sample::Real(c.re) })
        .collect()
}

#[pyfunction]
#[pyo3(signature = (raw, sign_bits, int_bits, frac_bits))]
pub fn decode_fixed<'py>(
    py: Python<'py>,
    raw: Vec<RawWord>,
    sign_bits: u32,
    int_bits: u32,
    frac_bits: u32,
) -> PyResult<&'py PyArray1<f64>> {
    let fmt = FixedFormat::new(sign_bits, int_bits, frac_bits)?;
    let out: Vec<f64> = raw.iter().map(|&w| codec::decode_fixed(w, &fmt)).collect();
    Ok(out.into_pyarray(py))
}

/// 하위 절반 I, 상위 절반 Q
#[pyfunction]
#[pyo3(signature = (raw, sign_bits, int_bits, frac_bits))]
pub fn decode_complex_fixed<'py>(
    py: Python<'py>,
    raw: Vec<RawWord>,
    sign_bits: u32,
    int_bits: u32,
    frac_bits: u32,
) -> PyResult<&'py PyArray1<Complex64>> {
    let fmt = FixedFormat::new(sign_bits, int_bits, frac_bits)?;
    let out: Vec<Complex64> = raw
        .iter()
        .map(|&w| codec::decode_complex_fixed(w, &fmt, true).to_complex())
        .collect();
    Ok(out.into_pyarray(py))
}

#[pyfunction]
#[pyo3(signature = (values, sign_bits, int_bits, frac_bits))]
pub fn encode_fixed(
    values: PyReadonlyArray1<Complex64>,
    sign_bits: u32,
    int_bits: u32,
    frac_bits: u32,
) -> PyResult<Vec<(i128, i128)>> {
    let fmt = FixedFormat::new(sign_bits, int_bits, frac_bits)?;
    Ok(codec::encode_fixed_batch(&to_samples(&values, true), &fmt))
}

#[pyfunction]
#[pyo3(signature = (raw, exp_bits=6, man_bits=13))]
pub fn decode_float<'py>(
    py: Python<'py>,
    raw: Vec<RawWord>,
    exp_bits: u32,
    man_bits: u32,
) -> PyResult<&'py PyArray1<Complex64>> {
    let fmt = FloatFormat::new(exp_bits, man_bits)?;
    let out: Vec<Complex64> = raw.iter().map(|&w| codec::decode_float(w, &fmt)).collect();
    Ok(out.into_pyarray(py))
}

#[pyfunction]
#[pyo3(signature = (values, sign_bits, int_bits, frac_bits, exp_bias=0, input_bias=0))]
pub fn fix_to_float(
    py: Python<'_>,
    values: PyReadonlyArray1<Complex64>,
    sign_bits: u32,
    int_bits: u32,
    frac_bits: u32,
    exp_bias: i32,
    input_bias: i32,
) -> PyResult<Vec<RawWord>> {
    let fmt = FixedFormat::new(sign_bits, int_bits, frac_bits)?;
    let opts = BlockFloatOptions {
        exp_bias,
        input_bias,
        ..BlockFloatOptions::default()
    };
    let samples = to_samples(&values, true);
    // 큰 배열은 rayon 스레드에서 돌기 때문에 GIL 을 놓음
    Ok(py.allow_threads(|| codec::fix_to_float(&samples, &fmt, &opts)))
}

pub fn register(m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(decode_fixed, m)?)?;
    m.add_function(wrap_pyfunction!(decode_complex_fixed, m)?)?;
    m.add_function(wrap_pyfunction!(encode_fixed, m)?)?;
    m.add_function(wrap_pyfunction!(decode_float, m)?)?;
    m.add_function(wrap_pyfunction!(fix_to_float, m)?)?;
    Ok(())
}
