// src/bindings/packet.rs

//! 제어 신호는 CSV 에서 읽은 문자열 그대로 받습니다.

use pyo3::prelude::*;

use crate::packet;

#[pyfunction]
#[pyo3(signature = (n, sop=None, eop=None))]
pub fn find_packet_ranges(
    n: usize,
    sop: Option<Vec<String>>,
    eop: Option<Vec<String>>,
) -> PyResult<Vec<(usize, usize)>> {
    let ranges = packet::find_packet_ranges(n, sop.as_deref(), eop.as_deref())?;
    Ok(ranges.into_iter().map(|r| (r.start, r.end)).collect())
}

#[pyfunction]
#[pyo3(signature = (samples, valid=None, sop=None, eop=None))]
pub fn filter_data_all_packets(
    samples: Vec<String>,
    valid: Option<Vec<String>>,
    sop: Option<Vec<String>>,
    eop: Option<Vec<String>>,
) -> PyResult<Vec<String>> {
    Ok(packet::filter_data_all_packets(
        &samples,
        valid.as_deref(),
        sop.as_deref(),
        eop.as_deref(),
    )?)
}

#[pyfunction]
#[pyo3(signature = (samples, valid=None, sop=None, eop=None))]
pub fn filter_data_packets_list(
    samples: Vec<String>,
    valid: Option<Vec<String>>,
    sop: Option<Vec<String>>,
    eop: Option<Vec<String>>,
) -> PyResult<Vec<Vec<String>>> {
    Ok(packet::filter_data_packets_list(
        &samples,
        valid.as_deref(),
        sop.as_deref(),
        eop.as_deref(),
    )?)
}

pub fn register(m: &PyModule) -> PyResult<()> {
    m.add_function(wrap_pyfunction!(find_packet_ranges, m)?)?;
    m.add_function(wrap_pyfunction!(filter_data_all_packets, m)?)?;
    m.add_function(wrap_pyfunction!(filter_data_packets_list, m)?)?;
    Ok(())
}
