use super::*;

#[test]
fn first_sample_is_taken_as_is_then_smoothed() {
    let mut p = PerfCounter::new();
    p.add_measurement("draw", Duration::from_millis(10));
    assert!((p.millis("draw").unwrap() - 10.0).abs() < 1e-9);
    p.add_measurement("draw", Duration::from_millis(30));
    assert!((p.millis("draw").unwrap() - 11.0).abs() < 1e-9);
}

#[test]
fn summary_keeps_first_seen_order() {
    let mut p = PerfCounter::new();
    p.add_measurement("shadow", Duration::from_micros(1230));
    p.add_measurement("main", Duration::from_micros(450));
    p.add_measurement("shadow", Duration::from_micros(1230));
    assert_eq!(p.summary(), "shadow: 1.23 main: 0.45");
}

#[test]
fn end_without_begin_is_none() {
    let mut p = PerfCounter::new();
    assert!(p.end("nope").is_none());
    assert_eq!(p.summary(), "");
}

#[test]
fn measure_records_name() {
    let mut p = PerfCounter::new();
    let v = p.measure("work", || 41 + 1);
    assert_eq!(v, 42);
    assert!(p.millis("work").is_some());
    p.clear();
    assert!(p.millis("work").is_none());
}
