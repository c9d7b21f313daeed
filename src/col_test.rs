use pretty_assertions::assert_eq;

use crate::col::ColumnKeys;
use crate::constant::FIELDS_KEY;
use crate::error::Error;
use crate::value::{Metadata, Value};

#[test]
fn test_keys_from_fields_entry() {
    let mut meta = Metadata::new();
    meta.insert(
        FIELDS_KEY.to_string(),
        Value::List(vec![Value::from("name"), Value::from("age")]),
    );

    let keys = ColumnKeys::from_metadata(&meta).unwrap();
    assert_eq!(keys.as_slice(), ["name".to_string(), "age".to_string()]);
    assert_eq!(keys.index_of("age"), Some(1));
    assert_eq!(keys.index_of("email"), None);
}

#[test]
fn test_missing_fields_entry_is_empty() {
    let keys = ColumnKeys::from_metadata(&Metadata::new()).unwrap();
    assert!(keys.is_empty());
    assert_eq!(keys, ColumnKeys::default());
}

#[test]
fn test_fields_entry_must_be_list_of_strings() {
    let mut meta = Metadata::new();
    meta.insert(FIELDS_KEY.to_string(), Value::from("name"));
    let err = ColumnKeys::from_metadata(&meta).unwrap_err();
    assert!(matches!(err, Error::MalformedMetadata(_)));

    meta.insert(
        FIELDS_KEY.to_string(),
        Value::List(vec![Value::from("name"), Value::Integer(1)]),
    );
    let err = ColumnKeys::from_metadata(&meta).unwrap_err();
    assert!(matches!(err, Error::MalformedMetadata(ref msg) if msg.contains("Integer")));
}

#[test]
fn test_duplicate_keys_resolve_to_first() {
    let keys: ColumnKeys = ["a", "b", "a"].into_iter().collect();
    assert_eq!(keys.len(), 3);
    assert_eq!(keys.index_of("a"), Some(0));
}

#[test]
fn test_clones_share_storage() {
    let keys: ColumnKeys = ["a"].into_iter().collect();
    let other = keys.clone();
    assert!(std::ptr::eq(keys.as_slice(), other.as_slice()));
}

#[test]
fn test_duplicate_fields_are_kept_in_order() {
    let mut meta = Metadata::new();
    meta.insert(
        FIELDS_KEY.to_string(),
        Value::List(vec![Value::from("n"), Value::from("m"), Value::from("n")]),
    );

    let keys = ColumnKeys::from_metadata(&meta).unwrap();
    assert_eq!(keys.len(), 3);
    assert_eq!(keys.first_duplicate(), Some("n"));
    assert_eq!(keys.index_of("n"), Some(0));

    let unique: ColumnKeys = ["a", "b"].into_iter().collect();
    assert_eq!(unique.first_duplicate(), None);
}
