use std::collections::HashSet;

use crate::{FormFields, FormReader, ReaderOptions};

mod parse_bad;
mod positional;

pub(crate) fn accept(names: &[&str]) -> HashSet<String> {
    names.iter().map(|name| (*name).to_string()).collect()
}

/// One-shot mapping-mode parse with default options.
pub(crate) fn parse(body: &str, names: &[&str]) -> Option<FormFields> {
    let mut reader = FormReader::new(ReaderOptions::default());
    reader
        .read_form(body.as_bytes(), &accept(names))
        .expect("in-memory reads cannot fail")
}

pub(crate) fn field<'a>(fields: &'a FormFields, name: &str) -> Option<&'a str> {
    fields.get(name).and_then(|value| value.as_deref())
}
