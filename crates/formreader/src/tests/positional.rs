use super::accept;
use crate::{
    FormReader, LimitExceeded, PositionalFormReader, PositionalKeys, ReaderOptions,
};

fn values(body: &str, capacity: usize) -> Option<Vec<Option<String>>> {
    let mut reader = FormReader::positional();
    reader
        .read_positional(body.as_bytes(), capacity)
        .expect("in-memory reads cannot fail")
}

fn decoded(body: &str, capacity: usize) -> Vec<String> {
    values(body, capacity)
        .unwrap()
        .into_iter()
        .map(Option::unwrap)
        .collect()
}

#[test]
fn values_in_arrival_order() {
    assert_eq!(decoded("x=v0&x=v1&x=v2", 3), ["v0", "v1", "v2"]);
}

#[test]
fn literal_key_text_is_irrelevant() {
    assert_eq!(decoded("a=v0&b=v1&z=v2", 3), ["v0", "v1", "v2"]);
}

#[test]
fn overflow_truncates_instead_of_failing() {
    // Unlike mapping mode, running out of capacity is not a parse failure.
    assert_eq!(decoded("x=v0&x=v1&x=v2&x=v3", 3), ["v0", "v1", "v2"]);
}

#[test]
fn fewer_pairs_than_capacity() {
    assert_eq!(decoded("x=v0&x=v1", 5), ["v0", "v1"]);
}

#[test]
fn zero_capacity_reads_nothing() {
    assert_eq!(values("x=v0", 0).unwrap(), Vec::<Option<String>>::new());
}

#[test]
fn values_are_decoded() {
    assert_eq!(decoded("x=a+b%21", 1), ["a b!"]);
}

#[test]
fn incomplete_trailing_pair_is_dropped() {
    assert_eq!(decoded("x=v0&x", 3), ["v0"]);
}

#[test]
fn two_byte_literal_key_fails() {
    let mut reader = FormReader::positional();
    let result = reader.read_positional("xy=1".as_bytes(), 3).unwrap();
    assert_eq!(result, None);
    assert_eq!(reader.failure(), Some(LimitExceeded::KeyLength));
}

#[test]
fn value_length_limit_still_aborts() {
    let mut reader = FormReader::with_strategy(
        ReaderOptions {
            max_value_bytes: 4,
            ..ReaderOptions::positional()
        },
        PositionalKeys::default(),
    );
    assert_eq!(reader.read_positional("x=12345".as_bytes(), 3).unwrap(), None);
    assert_eq!(reader.failure(), Some(LimitExceeded::ValueLength));
}

#[test]
fn synthetic_keys_feed_mapping_mode() {
    // A positional reader can also fill a mapping: the keys are the arrival
    // labels, `"0"` through `"9"` and formatted numbers beyond.
    let options = ReaderOptions {
        max_fields: 100,
        ..ReaderOptions::positional()
    };
    let mut reader = FormReader::with_strategy(options, PositionalKeys::default());
    let body = (0..11).map(|_| "x=v").collect::<Vec<_>>().join("&");
    let fields = reader
        .read_form(body.as_bytes(), &accept(&["0", "3", "10"]))
        .unwrap()
        .unwrap();
    assert_eq!(fields.len(), 3);
    assert!(fields.contains_key("0"));
    assert!(fields.contains_key("3"));
    assert!(fields.contains_key("10"));
}

#[test]
fn counter_restarts_after_reset() {
    let mut reader = FormReader::positional();
    assert_eq!(decoded_with(&mut reader, "x=first"), ["first"]);
    reader.reset();
    assert_eq!(decoded_with(&mut reader, "x=second"), ["second"]);
}

fn decoded_with(reader: &mut PositionalFormReader, body: &str) -> Vec<String> {
    reader
        .read_positional(body.as_bytes(), 4)
        .unwrap()
        .unwrap()
        .into_iter()
        .map(Option::unwrap)
        .collect()
}
