use rstest::rstest;

use super::{accept, parse};
use crate::{FormReader, LimitExceeded, ReaderOptions};

fn small_limits() -> ReaderOptions {
    ReaderOptions {
        max_fields: 4,
        max_key_bytes: 8,
        max_value_bytes: 8,
        fill_buffer_len: 16,
    }
}

#[rstest]
#[case(8, true)]
#[case(9, false)]
fn key_length_limit(#[case] len: usize, #[case] ok: bool) {
    let key = "k".repeat(len);
    let body = format!("{key}=1");
    let mut reader = FormReader::new(small_limits());
    let result = reader.read_form(body.as_bytes(), &accept(&[&key])).unwrap();
    assert_eq!(result.is_some(), ok);
    if !ok {
        assert_eq!(reader.failure(), Some(LimitExceeded::KeyLength));
    }
}

#[rstest]
#[case(8, true)]
#[case(9, false)]
fn value_length_limit(#[case] len: usize, #[case] ok: bool) {
    let body = format!("a={}", "v".repeat(len));
    let mut reader = FormReader::new(small_limits());
    let result = reader.read_form(body.as_bytes(), &accept(&["a"])).unwrap();
    assert_eq!(result.is_some(), ok);
    if !ok {
        assert_eq!(reader.failure(), Some(LimitExceeded::ValueLength));
    }
}

#[test]
fn skipped_values_still_count_against_the_limit() {
    // The filter drops `b`, but its value bytes are still consumed and
    // still bounded.
    let body = format!("b={}&a=1", "v".repeat(9));
    let mut reader = FormReader::new(small_limits());
    let result = reader.read_form(body.as_bytes(), &accept(&["a"])).unwrap();
    assert_eq!(result, None);
    assert_eq!(reader.failure(), Some(LimitExceeded::ValueLength));
}

#[test]
fn default_key_limit_is_512_bytes() {
    let key = "k".repeat(513);
    let body = format!("{key}=1");
    assert_eq!(parse(&body, &[&key]), None);

    let key = "k".repeat(512);
    let body = format!("{key}=1");
    assert!(parse(&body, &[&key]).is_some());
}

fn distinct_pairs(count: usize) -> (String, Vec<String>) {
    let keys: Vec<String> = (0..count).map(|i| format!("k{i}")).collect();
    let body = keys
        .iter()
        .map(|key| format!("{key}=v"))
        .collect::<Vec<_>>()
        .join("&");
    (body, keys)
}

#[test]
fn one_hundred_fields_fit() {
    let (body, keys) = distinct_pairs(100);
    let names: Vec<&str> = keys.iter().map(String::as_str).collect();
    let fields = parse(&body, &names).unwrap();
    assert_eq!(fields.len(), 100);
}

#[test]
fn one_hundred_and_one_fields_abort() {
    let (body, keys) = distinct_pairs(101);
    let names: Vec<&str> = keys.iter().map(String::as_str).collect();
    assert_eq!(parse(&body, &names), None);

    let mut reader = FormReader::new(ReaderOptions::default());
    let result = reader.read_form(body.as_bytes(), &accept(&names)).unwrap();
    assert_eq!(result, None);
    assert_eq!(reader.failure(), Some(LimitExceeded::FieldCount));
}

#[test]
fn duplicates_do_not_count_toward_the_field_limit() {
    let body = (0..150).map(|_| "a=1").collect::<Vec<_>>().join("&");
    let fields = parse(&body, &["a"]).unwrap();
    assert_eq!(fields.len(), 1);
}

#[test]
fn failure_clears_on_the_next_parse() {
    let mut reader = FormReader::new(small_limits());
    let body = format!("a={}", "v".repeat(9));
    assert_eq!(
        reader.read_form(body.as_bytes(), &accept(&["a"])).unwrap(),
        None
    );
    assert_eq!(reader.failure(), Some(LimitExceeded::ValueLength));

    reader.reset();
    assert_eq!(reader.failure(), None);
    let fields = reader
        .read_form("a=1".as_bytes(), &accept(&["a"]))
        .unwrap()
        .unwrap();
    assert_eq!(fields.len(), 1);
}
