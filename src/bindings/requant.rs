// src/bindings/requant.rs

use pyo3::prelude::*;

use crate::requant;

#[pyfunction]
#[pyo3(signature = (value, input_width, output_width, round_negative_up=true, saturate=true))]
pub fn round_fixed(
    value: i128,
    input_width: u32,
    output_width: u32,
    round_negative_up: bool,
    saturate: bool,
) -> PyResult<u128> {
    Ok(requant::round_fixed(
        value,
        input_width,
        output_width,
        round_negative_up,
        saturate,
    )?)
}

#[pyfunction]
pub fn saturate_fixed(value: i128, input_width: u32, output_width: u32) -> PyResult<u128> {
    Ok(requant::saturate_fixed(value, input_width, output_width)?)
}

#[pyfunction]
pub fn round_saturate(value: i128, input_width: u32, round_width: u32, output_width: u32) -> PyResult<u128> {
    Ok(requant::round_saturate(value, input_width, round_width, output_width)?)
}

pub fn register(m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(round_fixed, m)?)?;
    m.add_function(wrap_pyfunction!(saturate_fixed, m)?)?;
    m.add_function(wrap_pyfunction!(round_saturate, m)?)?;
    Ok(())
}
