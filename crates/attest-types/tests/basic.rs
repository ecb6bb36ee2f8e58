use attest_types::prelude::*;

#[test]
fn timestamp_plus_seconds_advances() {
    let issued = Timestamp(1_700_000_000);
    let exp = issued.plus_seconds(60);
    assert_eq!(exp.0, 1_700_000_060);
}

#[test]
fn timestamp_is_past() {
    let exp = Timestamp(1_700_000_060);
    assert!(!exp.is_past(Timestamp(1_700_000_059)));
    assert!(exp.is_past(Timestamp(1_700_000_060)));
    assert!(exp.is_past(Timestamp(1_700_000_061)));
}

#[test]
fn id_and_correlation_id_round_trip_json() {
    let id = Id("agent-1".into());
    let json = serde_json::to_string(&id).unwrap();
    let back: Id = serde_json::from_str(&json).unwrap();
    assert_eq!(id, back);

    let corr = CorrelationId::new_random();
    assert!(corr.0.starts_with("corr_"));
}

#[test]
fn trace_context_defaults_baggage() {
    let json = serde_json::json!({ "trace_id": "t1", "span_id": null });
    let trace: TraceContext = serde_json::from_value(json).unwrap();
    assert_eq!(trace.trace_id.as_deref(), Some("t1"));
    assert!(trace.baggage.is_empty());
}
