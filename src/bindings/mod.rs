mod codec;
mod dsp;
mod packet;
mod requant;

use pyo3::exceptions::PyValueError;
use pyo3::prelude::*;
use pyo3::types::PyModule;

use crate::error::TraceError;

impl From<TraceError> for PyErr {
    fn from(err: TraceError) -> Self {
        PyValueError::new_err(err.to_string())
    }
}

/// ILA Codec - 트레이스 워드 디코딩/인코딩
#[pymodule]
pub fn ila_codec(py: Python, m: &PyModule) -> PyResult<()> {
    m.add("__version__", env!("CARGO_PKG_VERSION"))?;
    // 고정소수점 / 블록 부동소수점
    codec::register(m)?;
    // 하드웨어 반올림과 포화
    requant::register(m)?;
    // valid / SOP / EOP
    packet::register(m)?;
    // DSP 서브모듈
    dsp::register_dsp_module(py, m)?;
    Ok(())
}
