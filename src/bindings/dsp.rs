// src/bindings/dsp.rs

use numpy::{Complex64, IntoPyArray, PyArray1, PyReadonlyArray1};
use pyo3::prelude::*;

use crate::dsp::{ConvMode, DspOp, FirParams, FreqShiftParams};

fn run<'py>(py: Python<'py>, op: DspOp, x: PyReadonlyArray1<Complex64>) -> PyResult<&'py PyArray1<Complex64>> {
    Ok(op.apply(x.as_array())?.into_pyarray(py))
}

#[pyfunction]
#[pyo3(signature = (x, shift=false))]
pub fn fft<'py>(py: Python<'py>, x: PyReadonlyArray1<Complex64>, shift: bool) -> PyResult<&'py PyArray1<Complex64>> {
    run(py, if shift { DspOp::FftShift } else { DspOp::Fft }, x)
}

#[pyfunction]
pub fn freq_shift<'py>(
    py: Python<'py>,
    x: PyReadonlyArray1<Complex64>,
    freq: f64,
    fs: f64,
) -> PyResult<&'py PyArray1<Complex64>> {
    run(py, DspOp::FreqShift(FreqShiftParams { freq, fs }), x)
}

#[pyfunction]
#[pyo3(signature = (x, coeffs, interp=1, decim=1, mode="same"))]
pub fn fir<'py>(
    py: Python<'py>,
    x: PyReadonlyArray1<Complex64>,
    coeffs: Vec<f64>,
    interp: usize,
    decim: usize,
    mode: &str,
) -> PyResult<&'py PyArray1<Complex64>> {
    let params = FirParams {
        coeffs,
        interp,
        decim,
        mode: mode.parse::<ConvMode>()?,
    };
    run(py, DspOp::Fir(params), x)
}

#[pyfunction]
pub fn normalize<'py>(py: Python<'py>, x: PyReadonlyArray1<Complex64>) -> PyResult<&'py PyArray1<Complex64>> {
    run(py, DspOp::Normalize, x)
}

pub fn register_dsp_module(py: Python, parent_module: &PyModule) -> PyResult<()> {
    let dsp_module = PyModule::new(py, "dsp")?;
    dsp_module.add_function(wrap_pyfunction!(fft, dsp_module)?)?;
    dsp_module.add_function(wrap_pyfunction!(freq_shift, dsp_module)?)?;
    dsp_module.add_function(wrap_pyfunction!(fir, dsp_module)?)?;
    dsp_module.add_function(wrap_pyfunction!(normalize, dsp_module)?)?;
    parent_module.add_submodule(dsp_module)?;
    Ok(())
}
