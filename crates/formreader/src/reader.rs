//! The streaming form reader.
//!
//! A [`FormReader`] scans a body one byte at a time, splitting it into
//! key/value tokens on `=` and `&`, decoding tokens as they close, and
//! collecting them into either a filtered mapping or a positional sequence.
//! Input arrives through a pooled fill buffer, tokens accumulate in a pooled
//! scratch buffer, and both go back to their pools on [`reset`], so a reader
//! kept in a [`ReaderPool`](crate::ReaderPool) parses request after request
//! without per-request allocation.
//!
//! # Examples
//!
//! ```rust
//! use std::collections::HashSet;
//!
//! use formreader::{FormReader, ReaderOptions};
//!
//! let accepted: HashSet<String> = ["user"].iter().map(|s| (*s).to_string()).collect();
//! let mut reader = FormReader::new(ReaderOptions::default());
//! let fields = reader
//!     .read_form("user=ada&junk=1".as_bytes(), &accepted)?
//!     .expect("no limit tripped");
//! assert_eq!(fields["user"].as_deref(), Some("ada"));
//! reader.reset();
//! # Ok::<(), std::io::Error>(())
//! ```

use std::collections::{HashMap, HashSet};
use std::io::{self, Read};
use std::sync::Arc;

use bstr::ByteSlice;
use tracing::{debug, trace};

use crate::buffer::FillBuffer;
use crate::decoder::decode_word;
use crate::error::LimitExceeded;
use crate::keys::{KeyStrategy, LiteralKeys, PositionalKeys};
use crate::options::ReaderOptions;
use crate::pool::{FormPools, Pool};

/// The mapping-mode result container.
pub type FormFields = HashMap<String, Option<String>>;

/// A [`FormReader`] that derives keys from pair arrival order.
pub type PositionalFormReader = FormReader<PositionalKeys>;

const KEY_SEPARATOR: u8 = b'=';
const PAIR_SEPARATOR: u8 = b'&';

/// Where the current pair stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum PairState {
    AwaitKey,
    /// A synthetic key was issued; the literal placeholder key and its `=`
    /// are still unread.
    AwaitKeySeparator,
    AwaitValue,
    Complete,
}

/// Outcome of one scanning step (and of a full token scan).
#[derive(Debug)]
enum Scan {
    /// More input is needed before the token can close.
    More,
    /// Token closed: the decoded word, or `None` for a skipped pair.
    Word(Option<String>),
    /// The key strategy substituted a synthetic key; the literal key
    /// separator has not been consumed.
    Synthetic(String),
    /// A length limit tripped; the parse is abandoned.
    Overflow,
}

/// The streaming `application/x-www-form-urlencoded` reader.
///
/// One instance serves one parse at a time and is not meant to be shared;
/// concurrency comes from drawing distinct instances out of a
/// [`ReaderPool`](crate::ReaderPool). Call [`reset`](FormReader::reset)
/// after each parse to hand the scratch buffers back to their pools.
#[derive(Debug)]
pub struct FormReader<K: KeyStrategy = LiteralKeys> {
    options: ReaderOptions,
    pools: Arc<FormPools>,
    strategy: K,
    fill: FillBuffer,
    scratch: Vec<u8>,
    state: PairState,
    key: Option<String>,
    value: Option<String>,
    skip: bool,
    discarded: usize,
    failure: Option<LimitExceeded>,
}

impl FormReader {
    /// Creates a reader with plain literal keys and private pools.
    #[must_use]
    pub fn new(options: ReaderOptions) -> Self {
        Self::with_strategy(options, LiteralKeys)
    }
}

impl FormReader<PositionalKeys> {
    /// Creates a positional reader with the positional defaults.
    #[must_use]
    pub fn positional() -> Self {
        Self::with_strategy(ReaderOptions::positional(), PositionalKeys::default())
    }
}

impl<K: KeyStrategy> FormReader<K> {
    /// Creates a reader with the given key strategy and private pools.
    #[must_use]
    pub fn with_strategy(options: ReaderOptions, strategy: K) -> Self {
        Self::with_pools(options, strategy, Arc::new(FormPools::default()))
    }

    /// Creates a reader borrowing its buffers and tables from shared pools.
    #[must_use]
    pub fn with_pools(options: ReaderOptions, strategy: K, pools: Arc<FormPools>) -> Self {
        Self {
            options,
            pools,
            strategy,
            fill: FillBuffer::new(),
            scratch: Vec::new(),
            state: PairState::AwaitKey,
            key: None,
            value: None,
            skip: false,
            discarded: 0,
            failure: None,
        }
    }

    /// Parses the stream into a mapping restricted to `accepted` keys.
    ///
    /// Later duplicates overwrite earlier ones; pairs whose key is empty or
    /// not accepted are consumed and dropped. Returns `Ok(None)` when a
    /// length limit or the field-count limit was exceeded — never a partial
    /// mapping, since a caller must not act on a truncated filtered form as
    /// if it were complete.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the stream.
    pub fn read_form<R: Read>(
        &mut self,
        mut stream: R,
        accepted: &HashSet<String>,
    ) -> io::Result<Option<FormFields>> {
        self.begin();
        let mut fields = self.pools.tables.acquire();
        while !self.fill.end_of_stream() {
            self.next_pair(&mut stream, Some(accepted))?;
            if self.failure.is_some() {
                self.pools.tables.release(fields);
                return Ok(None);
            }
            if self.state == PairState::Complete && !self.skip {
                if let Some(key) = self.key.take() {
                    if !key.is_empty() && self.value.is_some() {
                        fields.insert(key, self.value.take());
                        if fields.len() > self.options.max_fields {
                            self.fail(LimitExceeded::FieldCount);
                            self.pools.tables.release(fields);
                            return Ok(None);
                        }
                    }
                }
            }
        }
        Ok(Some(fields))
    }

    /// Parses the stream into at most `capacity` values in arrival order,
    /// ignoring literal key text.
    ///
    /// Once the sequence is full, remaining pairs are left unread and the
    /// sequence gathered so far is returned as success; only length-limit
    /// violations make this return `Ok(None)`. The asymmetry with
    /// [`read_form`](FormReader::read_form)'s hard abort is deliberate.
    ///
    /// # Errors
    ///
    /// Propagates I/O errors from the stream.
    pub fn read_positional<R: Read>(
        &mut self,
        mut stream: R,
        capacity: usize,
    ) -> io::Result<Option<Vec<Option<String>>>> {
        self.begin();
        let mut values = Vec::with_capacity(capacity);
        while !self.fill.end_of_stream() && values.len() < capacity {
            self.next_pair(&mut stream, None)?;
            if self.failure.is_some() {
                return Ok(None);
            }
            if self.state == PairState::Complete {
                values.push(self.value.take());
            }
        }
        Ok(Some(values))
    }

    /// Returns the scratch buffers to their pools and clears all parse
    /// state. Required before the instance goes back on a shelf for an
    /// unrelated request.
    pub fn reset(&mut self) {
        if self.fill.is_attached() {
            self.pools.buffers.release(self.fill.detach());
        }
        if self.scratch.capacity() != 0 {
            self.pools.buffers.release(std::mem::take(&mut self.scratch));
        }
        self.failure = None;
        self.strategy.begin_parse();
        self.begin_pair();
    }

    /// Which limit abandoned the last parse, if any.
    #[must_use]
    pub fn failure(&self) -> Option<LimitExceeded> {
        self.failure
    }

    /// Readies the instance for a parse: borrows buffers if none are held
    /// and clears every per-parse flag, so a skipped [`reset`] costs
    /// retained buffers rather than corrupt results.
    fn begin(&mut self) {
        if self.fill.is_attached() {
            self.fill.rewind();
        } else {
            self.fill
                .attach(self.pools.buffers.acquire(), self.options.fill_buffer_len);
        }
        if self.scratch.capacity() == 0 {
            self.scratch = self.pools.buffers.acquire();
        }
        self.scratch.clear();
        self.failure = None;
        self.strategy.begin_parse();
        self.begin_pair();
    }

    fn begin_pair(&mut self) {
        self.state = PairState::AwaitKey;
        self.key = None;
        self.value = None;
        self.skip = false;
        self.discarded = 0;
    }

    fn fail(&mut self, cause: LimitExceeded) {
        debug!(%cause, "form parse abandoned");
        self.failure = Some(cause);
    }

    /// Drives one pair to completion, refilling the input buffer as it
    /// drains, until the pair closes, a limit trips, or the stream ends.
    fn next_pair<R: Read>(
        &mut self,
        stream: &mut R,
        accepted: Option<&HashSet<String>>,
    ) -> io::Result<()> {
        self.begin_pair();
        while !self.fill.end_of_stream() {
            if self.fill.is_empty() {
                self.fill.refill(stream)?;
            }
            if self.step_pair(accepted) {
                break;
            }
            if self.failure.is_some() {
                break;
            }
        }
        Ok(())
    }

    /// Advances the pair state machine as far as the buffered input allows.
    /// Returns `true` when the pair is complete or the parse failed, `false`
    /// when more input is needed.
    fn step_pair(&mut self, accepted: Option<&HashSet<String>>) -> bool {
        if self.state == PairState::AwaitKey {
            match self.scan_word(
                KEY_SEPARATOR,
                self.options.max_key_bytes,
                LimitExceeded::KeyLength,
            ) {
                Scan::More => return false,
                Scan::Word(word) => {
                    self.key = word;
                    self.state = PairState::AwaitValue;
                }
                Scan::Synthetic(key) => {
                    self.key = Some(key);
                    self.state = PairState::AwaitKeySeparator;
                }
                Scan::Overflow => return true,
            }
            if self.state == PairState::AwaitValue && self.fill.is_empty() {
                // The value needs either data or an end-of-stream refill.
                return false;
            }
        }

        if self.state == PairState::AwaitKeySeparator {
            while !self.fill.is_empty() {
                if self.discard_char() {
                    self.state = PairState::AwaitValue;
                    break;
                }
                // The strategy already claimed one byte of the literal key;
                // every further byte before `=` counts against the limit.
                self.discarded += 1;
                if self.discarded >= self.options.max_key_bytes {
                    self.fail(LimitExceeded::KeyLength);
                    return true;
                }
            }
            if self.state != PairState::AwaitValue || self.fill.is_empty() {
                return false;
            }
        }

        if self.state == PairState::AwaitValue {
            if !self.skip {
                if let (Some(accepted), Some(key)) = (accepted, self.key.as_ref()) {
                    if !key.is_empty() && !accepted.contains(key) {
                        self.skip = true;
                    }
                }
            }
            match self.scan_word(
                PAIR_SEPARATOR,
                self.options.max_value_bytes,
                LimitExceeded::ValueLength,
            ) {
                Scan::More => return false,
                Scan::Word(word) => {
                    self.value = word;
                    self.state = PairState::Complete;
                }
                // Only overflow can land here; `&` never reaches the
                // key strategy.
                Scan::Synthetic(_) | Scan::Overflow => return true,
            }
        }

        true
    }

    /// Drives [`read_char`](Self::read_char) until the token closes, the
    /// buffer drains, or a limit trips.
    fn scan_word(&mut self, separator: u8, limit: usize, overflow: LimitExceeded) -> Scan {
        loop {
            match self.read_char(separator, limit) {
                Scan::More => {
                    if self.fill.is_empty() {
                        return Scan::More;
                    }
                }
                Scan::Overflow => {
                    self.fail(overflow);
                    return Scan::Overflow;
                }
                done => return done,
            }
        }
    }

    /// One step of token scanning: consume a byte, or finalize the token at
    /// the end of the stream. The key strategy is offered the first byte of
    /// a key token before ordinary separator comparison.
    fn read_char(&mut self, separator: u8, limit: usize) -> Scan {
        if self.fill.is_empty() {
            // Only reachable once the stream is exhausted: finalize whatever
            // accumulated.
            return Scan::Word(self.finish_word());
        }

        let byte = self.fill.take_byte();

        if separator == KEY_SEPARATOR && self.scratch.is_empty() {
            if let Some(key) = self.strategy.derive_key(byte) {
                return Scan::Synthetic(key);
            }
        }

        if byte == separator {
            return Scan::Word(self.finish_word());
        }

        if self.scratch.len() >= limit {
            let head = &self.scratch[..self.scratch.len().min(32)];
            trace!(limit, token_head = %head.as_bstr(), "token length limit reached");
            return Scan::Overflow;
        }

        self.scratch.push(byte);
        Scan::More
    }

    /// Consumes one byte without touching the accumulator and reports
    /// whether it was the key separator.
    fn discard_char(&mut self) -> bool {
        self.fill.take_byte() == KEY_SEPARATOR
    }

    fn finish_word(&mut self) -> Option<String> {
        if self.skip {
            self.scratch.clear();
            return None;
        }
        Some(decode_word(&mut self.scratch))
    }
}
