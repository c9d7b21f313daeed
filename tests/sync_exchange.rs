//! Tests for eager-buffering result consumption

use pretty_assertions::assert_eq;
use zero_bolt::constant::FIELDS_KEY;
use zero_bolt::error::Error;
use zero_bolt::summary::{ServerInfo, Statement, SummaryCollector};
use zero_bolt::sync::BufferedMode;
use zero_bolt::{Event, ExchangeOutcome, Metadata, Opts, ResultCollector, Value};

fn fields(names: &[&str]) -> Metadata {
    let mut meta = Metadata::new();
    meta.insert(
        FIELDS_KEY.to_string(),
        names.iter().map(|name| Value::from(*name)).collect(),
    );
    meta
}

fn buffered(events: Vec<Event>) -> ResultCollector<BufferedMode<std::vec::IntoIter<Event>>> {
    let _ = tracing_subscriber::fmt()
        .with_max_level(tracing::Level::TRACE)
        .with_test_writer()
        .try_init();
    ResultCollector::new(
        BufferedMode::new(events.into_iter()),
        Statement::new("UNWIND range(1, 3) AS n RETURN n, n * n AS sq"),
        ServerInfo {
            address: "localhost:7687".to_string(),
            version: Some("Neo4j/3.2.0".to_string()),
        },
    )
}

fn rows(n: i64) -> Vec<Event> {
    let mut events = vec![Event::Fields(Some(fields(&["n", "sq"])))];
    for i in 1..=n {
        events.push(Event::Record(vec![Value::Integer(i), Value::Integer(i * i)]));
    }
    events
}

#[test]
fn test_keys_before_records() {
    let mut events = rows(3);
    events.push(Event::Summary(Some(Metadata::new())));
    events.push(Event::Success);
    let mut collector = buffered(events);

    let keys = collector.keys().unwrap().clone();
    assert_eq!(keys.as_slice(), ["n".to_string(), "sq".to_string()]);
    // only the fields event has been pulled
    assert_eq!(collector.mode().buffered(), 0);
    assert_eq!(collector.outcome(), None);

    let records = collector.fetch_all().unwrap();
    assert_eq!(records.len(), 3);
    assert_eq!(records[2].get("sq"), Some(&Value::Integer(9)));
    assert!(records.iter().all(|record| record.keys() == &keys));
    assert_eq!(collector.outcome(), Some(ExchangeOutcome::Success));
}

#[test]
fn test_next_record_pulls_on_demand() {
    let mut events = rows(2);
    events.push(Event::Summary(None));
    events.push(Event::Success);
    let mut collector = buffered(events);

    let first = collector.next_record().unwrap().unwrap();
    assert_eq!(first.get("n"), Some(&Value::Integer(1)));
    let second = collector.next_record().unwrap().unwrap();
    assert_eq!(second.get("n"), Some(&Value::Integer(2)));
    assert!(collector.next_record().unwrap().is_none());
    assert!(collector.mode().is_closed());

    // the summary closed the stream, the outcome is still on the wire
    assert_eq!(collector.outcome(), None);
    assert_eq!(collector.consume().unwrap(), ExchangeOutcome::Success);
}

#[test]
fn test_failure_ends_the_stream() {
    let mut events = rows(1);
    events.push(Event::Failure);
    let mut collector = buffered(events);

    let records = collector.fetch_all().unwrap();
    assert_eq!(records.len(), 1);
    assert_eq!(collector.outcome(), Some(ExchangeOutcome::Failure));
    assert!(collector.exchange().records_closed());
}

#[test]
fn test_ignored_without_fields() {
    let mut collector = buffered(vec![Event::Ignored]);

    assert!(collector.keys().unwrap().is_empty());
    assert_eq!(collector.outcome(), Some(ExchangeOutcome::Ignored));
    assert!(collector.next_record().unwrap().is_none());
}

#[test]
fn test_consume_discards_records() {
    let mut events = rows(5);
    events.push(Event::Summary(None));
    events.push(Event::Success);
    let mut collector = buffered(events);

    assert_eq!(collector.consume().unwrap(), ExchangeOutcome::Success);
    assert_eq!(collector.mode().buffered(), 0);
    assert!(collector.next_record().unwrap().is_none());
}

#[test]
fn test_truncated_exchange() {
    let mut collector = buffered(rows(1));

    let record = collector.next_record().unwrap();
    assert!(record.is_some());
    let err = collector.next_record().unwrap_err();
    assert!(matches!(err, Error::IncompleteExchange));

    let mut collector = buffered(Vec::new());
    let err = collector.keys().unwrap_err();
    assert!(matches!(err, Error::IncompleteExchange));
}

#[test]
fn test_malformed_record_surfaces_from_pull() {
    let events = vec![
        Event::Fields(Some(fields(&["x"]))),
        Event::Record(vec![Value::Integer(1), Value::Integer(2)]),
        Event::Record(vec![Value::Integer(3)]),
        Event::Failure,
    ];
    let mut collector = buffered(events);

    let err = collector.next_record().unwrap_err();
    assert!(matches!(
        err,
        Error::MalformedRecord {
            expected: 1,
            actual: 2
        }
    ));
    assert!(collector.exchange().is_broken());
    let err = collector.next_record().unwrap_err();
    assert!(matches!(err, Error::BrokenExchange));
}

#[test]
fn test_buffered_mode_built_with_opts() {
    let opts = Opts {
        buffer_capacity: 2,
        ..Default::default()
    };
    let mut events = rows(4);
    events.push(Event::Summary(None));
    events.push(Event::Success);
    let mode = BufferedMode::with_opts(events.into_iter(), &opts);
    let mut collector = ResultCollector::with_summary(mode, SummaryCollector::default(), opts);

    assert_eq!(collector.fetch_all().unwrap().len(), 4);
    assert_eq!(collector.outcome(), Some(ExchangeOutcome::Success));
}
