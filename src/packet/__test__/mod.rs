use crate::codec::RawToken;
use crate::error::TraceError;
use crate::packet::{
    filter_data, filter_data_all_packets, filter_data_packets_list, find_packet_ranges, is_asserted,
    split_on_unknown, ControlToken, PacketRange, NO_CONTROL,
};

fn bits(v: &[u8]) -> Vec<u8> {
    v.to_vec()
}

#[test]
fn test_token_predicate() {
    for t in ["1", " 1 ", "0x1", "0X01", "0b1", "0b0001", "1'b1", "1b1"] {
        assert!(is_asserted(t), "'{t}' should be asserted");
    }
    for t in ["", "0", "0x0", "2", "X", "x", "1'b0", "true", "0b"] {
        assert!(!is_asserted(t), "'{t}' should not be asserted");
    }
    // 0 으로 채운 10진수와 잘못된 위치의 `_` 는 정수로 읽히지 않음
    for t in ["01", "001", "1_", "_1", "0_1", "0x1_", "0x__1", "--1", "+-1"] {
        assert!(!is_asserted(t), "'{t}' should not be asserted");
    }
    for t in ["+1", "0x_1", "0b0_1", "0o1", "0X1"] {
        assert!(is_asserted(t), "'{t}' should be asserted");
    }
    assert!(!is_asserted("0_0"));
    assert!(!RawToken::from("01").is_asserted());
    assert!(RawToken::Int(1).is_asserted());
    assert!(!RawToken::Int(3).is_asserted());
    assert!(RawToken::from("1'b1").is_asserted());
}

#[test]
fn test_packet_ranges_sop_eop() {
    println!("\n--- Test: Packet Ranges ---");
    let sop = bits(&[0, 0, 1, 0, 0, 0, 1, 0, 0, 0]);
    let eop = bits(&[0, 0, 0, 0, 1, 0, 0, 0, 0, 1]);
    let ranges = find_packet_ranges(10, Some(&sop[..]), Some(&eop[..])).unwrap();
    assert_eq!(
        ranges,
        vec![PacketRange { start: 2, end: 5 }, PacketRange { start: 6, end: 10 }]
    );
    println!("  [PASSED] ranges are [2,5), [6,10).");
}

#[test]
fn test_packet_ranges_without_controls() {
    let ranges = find_packet_ranges(4, NO_CONTROL, NO_CONTROL).unwrap();
    assert_eq!(ranges, vec![PacketRange { start: 0, end: 4 }]);

    // 빈 신호는 주어지지 않은 것과 같음
    let empty: Vec<u8> = Vec::new();
    let ranges = find_packet_ranges(4, Some(&empty[..]), Some(&empty[..])).unwrap();
    assert_eq!(ranges.len(), 1);

    assert!(find_packet_ranges(0, NO_CONTROL, NO_CONTROL).unwrap().is_empty());
}

#[test]
fn test_packet_ranges_eop_only() {
    let eop = bits(&[0, 1, 0, 1, 0, 0]);
    let ranges = find_packet_ranges(6, NO_CONTROL, Some(&eop[..])).unwrap();
    assert_eq!(
        ranges,
        vec![
            PacketRange { start: 0, end: 2 },
            PacketRange { start: 2, end: 4 },
            PacketRange { start: 4, end: 6 },
        ]
    );
}

#[test]
fn test_packet_ranges_sop_only_and_missing_sop() {
    let sop = bits(&[0, 1, 0, 1]);
    let ranges = find_packet_ranges(4, Some(&sop[..]), NO_CONTROL).unwrap();
    assert_eq!(ranges, vec![PacketRange { start: 1, end: 4 }]);

    let none = bits(&[0, 0, 0, 0]);
    assert!(find_packet_ranges(4, Some(&none[..]), NO_CONTROL).unwrap().is_empty());
}

#[test]
fn test_packet_ranges_are_ordered_and_disjoint() {
    let sop = bits(&[1, 1, 0, 1, 0, 1, 1, 0]);
    let eop = bits(&[1, 0, 1, 0, 0, 1, 0, 1]);
    let ranges = find_packet_ranges(8, Some(&sop[..]), Some(&eop[..])).unwrap();
    for r in &ranges {
        assert!(r.end > r.start);
    }
    for w in ranges.windows(2) {
        assert!(w[0].end <= w[1].start);
    }
    assert_eq!(ranges[0], PacketRange { start: 0, end: 1 });
}

#[test]
fn test_validity_filter() {
    let samples = ['a', 'b', 'c', 'd'];
    let valid = bits(&[1, 0, 1, 1]);
    let out = filter_data_all_packets(&samples, Some(&valid[..]), NO_CONTROL, NO_CONTROL).unwrap();
    assert_eq!(out, vec!['a', 'c', 'd']);
}

#[test]
fn test_filter_all_packets_and_list() {
    let samples: Vec<u32> = (0..10).collect();
    let valid = ["1", "1", "1", "0", "1", "1", "1", "1", "1", "1"];
    let sop = ["0", "0", "1", "0", "0", "0", "1", "0", "0", "0"];
    let eop = ["0", "0", "0", "0", "1", "0", "0", "0", "0", "1"];

    let flat = filter_data_all_packets(&samples, Some(&valid[..]), Some(&sop[..]), Some(&eop[..])).unwrap();
    assert_eq!(flat, vec![2, 4, 6, 7, 8, 9]);

    let list = filter_data_packets_list(&samples, Some(&valid[..]), Some(&sop[..]), Some(&eop[..])).unwrap();
    assert_eq!(list, vec![vec![2, 4], vec![6, 7, 8, 9]]);

    let first = filter_data(&samples, Some(&valid[..]), Some(&sop[..]), Some(&eop[..])).unwrap();
    assert_eq!(first, vec![2, 4]);
}

#[test]
fn test_empty_packets_are_dropped() {
    let samples = [10, 11, 12, 13];
    let valid = bits(&[0, 0, 1, 1]);
    let eop = bits(&[0, 1, 0, 1]);
    let list = filter_data_packets_list(&samples, Some(&valid[..]), NO_CONTROL, Some(&eop[..])).unwrap();
    assert_eq!(list, vec![vec![12, 13]]);
}

#[test]
fn test_length_mismatch_fails_fast() {
    let samples = [1, 2, 3];
    let valid = bits(&[1, 1]);
    let err = filter_data_all_packets(&samples, Some(&valid[..]), NO_CONTROL, NO_CONTROL).unwrap_err();
    assert_eq!(
        err,
        TraceError::LengthMismatch {
            signal: "valid".to_string(),
            expected: 3,
            got: 2
        }
    );

    let sop = bits(&[1, 0, 0, 0]);
    assert!(matches!(
        filter_data_packets_list(&samples, NO_CONTROL, Some(&sop[..]), NO_CONTROL),
        Err(TraceError::LengthMismatch { .. })
    ));
}

#[test]
fn test_split_on_unknown() {
    let col = ["1", "2", "X", "x", "3", "", "4", "X"];
    assert_eq!(
        split_on_unknown(&col),
        vec![vec!["1", "2"], vec!["3"], vec!["4"]]
    );
    let none: [&str; 2] = ["X", ""];
    assert!(split_on_unknown(&none).is_empty());
}
