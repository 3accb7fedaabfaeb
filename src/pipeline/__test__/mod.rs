use crate::codec::{DataType, FixedFormat, FloatFormat, RawToken, Sample};
use crate::error::TraceError;
use crate::lanes::LaneLayout;
use crate::pipeline::{
    combine, combine_signals, convert_signal, convert_table, export_fixed, gate_signals, CombineMode,
    ConvertConfig, Converted, Gating, PacketOutput, Signal,
};
use rustfft::num_complex::Complex64;

fn tokens(v: &[&str]) -> Vec<RawToken> {
    v.iter().map(|&s| RawToken::from(s)).collect()
}

fn q7() -> ConvertConfig {
    ConvertConfig {
        data_type: DataType::Fixed(FixedFormat::new(1, 0, 7).unwrap()),
        ..ConvertConfig::default()
    }
}

fn decoded(c: &Converted) -> &[Sample] {
    match c {
        Converted::Decoded(v) => v,
        Converted::AsIs(_) => panic!("expected decoded samples"),
    }
}

#[test]
fn test_convert_fixed_real() {
    let sig = Signal::new("adc", tokens(&["40", "C0", "0x00", "7F"]));
    let out = convert_signal(&sig, &q7()).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].name, "adc");
    assert_eq!(
        decoded(&out[0].samples),
        &[
            Sample::Real(0.5),
            Sample::Real(-0.5),
            Sample::Real(0.0),
            Sample::Real(127.0 / 128.0)
        ]
    );
}

#[test]
fn test_convert_fixed_complex_halves() {
    let config = ConvertConfig {
        complex: true,
        ..q7()
    };
    // 하위 바이트 I, 상위 바이트 Q
    let sig = Signal::new("iq", tokens(&["C040"]));
    let out = convert_signal(&sig, &config).unwrap();
    assert_eq!(
        decoded(&out[0].samples),
        &[Sample::Complex(Complex64::new(0.5, -0.5))]
    );
}

#[test]
fn test_convert_float_mantissas() {
    let config = ConvertConfig {
        data_type: DataType::Float(FloatFormat::FLOAT_ENUM),
        ..ConvertConfig::default()
    };
    let word: u128 = (5 << 26) | (1024 << 13) | 2048;
    let sig = Signal::new("f", vec![RawToken::Int(word)]);
    let out = convert_signal(&sig, &config).unwrap();
    assert_eq!(
        decoded(&out[0].samples),
        &[Sample::Complex(Complex64::new(2048.0, 1024.0))]
    );
}

#[test]
fn test_convert_serial_and_parallel_lanes() {
    println!("\n--- Test: Lane Layouts ---");
    let sig = Signal::new("sig", tokens(&["C040", "2010"]));

    let serial = ConvertConfig {
        layout: LaneLayout::serial(2).unwrap(),
        ..q7()
    };
    let out = convert_signal(&sig, &serial).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(
        decoded(&out[0].samples),
        &[
            Sample::Real(0.5),
            Sample::Real(-0.5),
            Sample::Real(0.125),
            Sample::Real(0.25)
        ]
    );

    let parallel = ConvertConfig {
        layout: LaneLayout::parallel(2).unwrap(),
        ..q7()
    };
    let out = convert_signal(&sig, &parallel).unwrap();
    let names: Vec<_> = out.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["sig_0", "sig_1"]);
    assert_eq!(decoded(&out[0].samples), &[Sample::Real(0.5), Sample::Real(0.125)]);
    assert_eq!(decoded(&out[1].samples), &[Sample::Real(-0.5), Sample::Real(0.25)]);
    println!("  [PASSED] serial interleaves, parallel splits channels.");
}

#[test]
fn test_convert_as_is_passthrough() {
    let config = ConvertConfig {
        data_type: DataType::AsIs,
        layout: LaneLayout::parallel(4).unwrap(),
        ..ConvertConfig::default()
    };
    let sig = Signal::new("raw", tokens(&["dead", "beef"]));
    let out = convert_signal(&sig, &config).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].samples, Converted::AsIs(tokens(&["dead", "beef"])));
}

#[test]
fn test_convert_rejects_bad_config_before_work() {
    let config = ConvertConfig {
        data_type: DataType::Fixed(FixedFormat::new(1, 31, 32).unwrap()),
        layout: LaneLayout::parallel(3).unwrap(),
        ..ConvertConfig::default()
    };
    let table = vec![Signal::new("a", tokens(&["0"]))];
    assert!(matches!(
        convert_table(&table, &config),
        Err(TraceError::WidthOverflow { .. })
    ));

    let bad_token = vec![Signal::new("a", tokens(&["zz"]))];
    assert!(matches!(
        convert_table(&bad_token, &q7()),
        Err(TraceError::InvalidToken(_))
    ));
}

#[test]
fn test_gate_single_and_multi() {
    let gating = Gating {
        valid: None,
        sop: Some(tokens(&["1", "0", "0", "1", "0"])),
        eop: Some(tokens(&["0", "1", "0", "0", "1"])),
    };
    let sigs = vec![Signal::new("x", tokens(&["a", "b", "c", "d", "e"]))];

    let single = gate_signals(&sigs, &gating, PacketOutput::Single).unwrap();
    assert_eq!(single, vec![Signal::new("x", tokens(&["a", "b", "d", "e"]))]);

    let multi = gate_signals(&sigs, &gating, PacketOutput::Multi).unwrap();
    assert_eq!(
        multi,
        vec![
            Signal::new("x__pkt0", tokens(&["a", "b"])),
            Signal::new("x__pkt1", tokens(&["d", "e"])),
        ]
    );

    let ungated = gate_signals(&sigs, &Gating::default(), PacketOutput::Multi).unwrap();
    assert_eq!(ungated, sigs);

    let empty_cols = Gating {
        valid: Some(vec![]),
        sop: Some(vec![]),
        eop: None,
    };
    assert!(empty_cols.is_empty());
    assert_eq!(gate_signals(&sigs, &empty_cols, PacketOutput::Multi).unwrap(), sigs);
}

#[test]
fn test_combine_modes() {
    let a = [Sample::Real(1.0), Sample::Real(2.0)];
    let b = [Sample::Real(-1.0), Sample::Real(-2.0)];

    let ri = combine(&a, &b, CombineMode::RealImag).unwrap();
    assert_eq!(
        ri,
        vec![
            Sample::Complex(Complex64::new(1.0, -1.0)),
            Sample::Complex(Complex64::new(2.0, -2.0))
        ]
    );

    let eo = combine(&a, &b, CombineMode::EvenOdd).unwrap();
    assert_eq!(
        eo,
        vec![
            Sample::Real(1.0),
            Sample::Real(-1.0),
            Sample::Real(2.0),
            Sample::Real(-2.0)
        ]
    );

    assert!(matches!(
        combine(&a, &b[..1], CombineMode::EvenOdd),
        Err(TraceError::LengthMismatch { .. })
    ));
}

#[test]
fn test_combine_mode_parse() {
    assert_eq!("ri".parse::<CombineMode>().unwrap(), CombineMode::RealImag);
    assert_eq!(" EO ".parse::<CombineMode>().unwrap(), CombineMode::EvenOdd);
    assert_eq!(
        "zz".parse::<CombineMode>(),
        Err(TraceError::UnknownMode("zz".to_string()))
    );
    assert_eq!("Multi".parse::<PacketOutput>().unwrap(), PacketOutput::Multi);
}

#[test]
fn test_combine_signals_naming_and_swap() {
    let i = Signal::new("i", tokens(&["40", "20"]));
    let q = Signal::new("q", tokens(&["C0", "00"]));

    let out = combine_signals(&i, &q, &q7(), &Gating::default(), CombineMode::RealImag, false).unwrap();
    assert_eq!(out.len(), 1);
    assert_eq!(out[0].name, "i_ReIm_q");
    assert_eq!(
        decoded(&out[0].samples),
        &[
            Sample::Complex(Complex64::new(0.5, -0.5)),
            Sample::Complex(Complex64::new(0.25, 0.0))
        ]
    );

    let swapped = combine_signals(&i, &q, &q7(), &Gating::default(), CombineMode::EvenOdd, true).unwrap();
    assert_eq!(swapped[0].name, "q_EvenOdd_i");
    assert_eq!(
        decoded(&swapped[0].samples),
        &[
            Sample::Real(-0.5),
            Sample::Real(0.5),
            Sample::Real(0.0),
            Sample::Real(0.25)
        ]
    );
}

#[test]
fn test_combine_signals_multi_packets() {
    let config = ConvertConfig {
        packet_output: PacketOutput::Multi,
        ..q7()
    };
    let gating = Gating {
        valid: None,
        sop: None,
        eop: Some(tokens(&["1", "0", "1"])),
    };
    let a = Signal::new("a", tokens(&["40", "20", "10"]));
    let b = Signal::new("b", tokens(&["00", "00", "40"]));
    let out = combine_signals(&a, &b, &config, &gating, CombineMode::RealImag, false).unwrap();
    let names: Vec<_> = out.iter().map(|s| s.name.as_str()).collect();
    assert_eq!(names, vec!["a_ReIm_b__pkt0", "a_ReIm_b__pkt1"]);
    assert_eq!(out[1].samples.len(), 2);

    // 게이팅 신호가 없으면 패킷 접미사 없이 하나로
    let ungated = combine_signals(&a, &b, &config, &Gating::default(), CombineMode::RealImag, false).unwrap();
    assert_eq!(ungated.len(), 1);
    assert_eq!(ungated[0].name, "a_ReIm_b");
    assert_eq!(ungated[0].samples.len(), 3);
}

#[test]
fn test_combine_signals_rejections() {
    let a = Signal::new("a", tokens(&["1", "2"]));
    let b = Signal::new("b", tokens(&["3", "4"]));
    let none = Gating::default();

    let parallel = ConvertConfig {
        layout: LaneLayout::parallel(2).unwrap(),
        ..q7()
    };
    assert!(matches!(
        combine_signals(&a, &b, &parallel, &none, CombineMode::EvenOdd, false),
        Err(TraceError::Unsupported(_))
    ));

    let complex = ConvertConfig {
        complex: true,
        ..q7()
    };
    assert!(matches!(
        combine_signals(&a, &b, &complex, &none, CombineMode::RealImag, false),
        Err(TraceError::Unsupported(_))
    ));
    // 복소수끼리 짝/홀 인터리브는 허용
    assert!(combine_signals(&a, &b, &complex, &none, CombineMode::EvenOdd, false).is_ok());

    let float = ConvertConfig {
        data_type: DataType::Float(FloatFormat::FLOAT_ENUM),
        ..ConvertConfig::default()
    };
    assert!(matches!(
        combine_signals(&a, &b, &float, &none, CombineMode::RealImag, false),
        Err(TraceError::Unsupported(_))
    ));

    let short = Signal::new("b", tokens(&["3"]));
    assert!(matches!(
        combine_signals(&a, &short, &q7(), &none, CombineMode::EvenOdd, false),
        Err(TraceError::LengthMismatch { .. })
    ));
}

#[test]
fn test_combine_signals_empty_after_gating() {
    let a = Signal::new("a", tokens(&["1", "2"]));
    let b = Signal::new("b", tokens(&["3", "4"]));
    let gating = Gating {
        valid: Some(tokens(&["0", "0"])),
        ..Gating::default()
    };
    let out = combine_signals(&a, &b, &q7(), &gating, CombineMode::EvenOdd, false).unwrap();
    assert!(out.is_empty());
}

#[test]
fn test_export_fixed() {
    let fmt = FixedFormat::new(1, 0, 7).unwrap();
    let decoded = Converted::Decoded(vec![Sample::Real(0.5), Sample::Complex(Complex64::new(-1.0, 2.0))]);
    assert_eq!(export_fixed(&decoded, &fmt).unwrap(), vec![(64, 0), (-128, 127)]);

    let raw = Converted::AsIs(vec![RawToken::from(" 0.25 "), RawToken::Int(1)]);
    assert_eq!(export_fixed(&raw, &fmt).unwrap(), vec![(32, 0), (127, 0)]);

    let bad = Converted::AsIs(tokens(&["X"]));
    assert!(matches!(export_fixed(&bad, &fmt), Err(TraceError::InvalidToken(_))));
}
