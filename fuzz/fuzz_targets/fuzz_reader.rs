#![no_main]
use std::collections::HashSet;
use std::io::{self, Read};

use formreader::{FormReader, ReaderOptions};
use libfuzzer_sys::fuzz_target;

const HEADER: usize = 3; // 1 flag byte + 2-byte chunk step

/// Hands out at most `step` bytes per read, so refills land at arbitrary
/// points in the body.
struct ChunkedReader<'a> {
    data: &'a [u8],
    pos: usize,
    step: usize,
}

impl Read for ChunkedReader<'_> {
    fn read(&mut self, buf: &mut [u8]) -> io::Result<usize> {
        let n = self.step.min(buf.len()).min(self.data.len() - self.pos);
        buf[..n].copy_from_slice(&self.data[self.pos..self.pos + n]);
        self.pos += n;
        Ok(n)
    }
}

fn run(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let step = usize::from(u16::from_le_bytes([data[1], data[2]])) % 64 + 1;
    let body = &data[HEADER..];

    // Small limits so the fuzzer reaches the abort paths quickly.
    let options = ReaderOptions {
        max_fields: 8,
        max_key_bytes: 16,
        max_value_bytes: 1 << 12,
        fill_buffer_len: 32,
    };

    if flags & 1 == 0 {
        let accepted: HashSet<String> =
            ["a", "b", "key", "0"].iter().map(|s| (*s).to_string()).collect();
        let mut reader = FormReader::new(options);
        let chunked = ChunkedReader { data: body, pos: 0, step };
        if let Ok(Some(fields)) = reader.read_form(chunked, &accepted) {
            assert!(fields.len() <= 8);
            assert!(fields.keys().all(|key| accepted.contains(key)));
        }
        reader.reset();
    } else {
        let capacity = usize::from(flags >> 1) % 8;
        let mut reader = FormReader::positional();
        let chunked = ChunkedReader { data: body, pos: 0, step };
        if let Ok(Some(values)) = reader.read_positional(chunked, capacity) {
            assert!(values.len() <= capacity);
        }
        reader.reset();
    }
}

fuzz_target!(|data: &[u8]| run(data));
