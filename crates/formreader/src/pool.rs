//! Acquire/release pooling for the pieces a parse churns through.
//!
//! Readers borrow their input buffer and token accumulator from a
//! [`BufferPool`] and their result mapping from a [`TablePool`] for the
//! duration of one parse. Releasing always clears content first, so nothing
//! from one request can leak into the next, and each shelf is bounded so a
//! burst of traffic cannot pin memory forever.

use std::sync::{Arc, Mutex};

use tracing::trace;

use crate::keys::{KeyStrategy, LiteralKeys};
use crate::options::ReaderOptions;
use crate::reader::{FormFields, FormReader};

/// The acquire/release contract the reader consumes.
///
/// `release` must leave the value empty of request data; implementations
/// here clear buffers and tables before shelving them.
pub trait Pool<T> {
    fn acquire(&self) -> T;
    fn release(&self, value: T);
}

const DEFAULT_MAX_IDLE: usize = 64;

/// A bounded free-list of byte buffers.
#[derive(Debug)]
pub struct BufferPool {
    shelf: Mutex<Vec<Vec<u8>>>,
    max_idle: usize,
}

impl BufferPool {
    #[must_use]
    pub fn new(max_idle: usize) -> Self {
        Self {
            shelf: Mutex::new(Vec::new()),
            max_idle,
        }
    }
}

impl Default for BufferPool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IDLE)
    }
}

impl Pool<Vec<u8>> for BufferPool {
    fn acquire(&self) -> Vec<u8> {
        match self.shelf.lock() {
            Ok(mut shelf) => shelf.pop().unwrap_or_default(),
            // A poisoned shelf degrades to plain allocation.
            Err(_) => Vec::new(),
        }
    }

    fn release(&self, mut value: Vec<u8>) {
        value.clear();
        if let Ok(mut shelf) = self.shelf.lock() {
            if shelf.len() < self.max_idle {
                shelf.push(value);
            }
        }
    }
}

/// A bounded free-list of result mappings.
#[derive(Debug)]
pub struct TablePool {
    shelf: Mutex<Vec<FormFields>>,
    max_idle: usize,
}

impl TablePool {
    #[must_use]
    pub fn new(max_idle: usize) -> Self {
        Self {
            shelf: Mutex::new(Vec::new()),
            max_idle,
        }
    }
}

impl Default for TablePool {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_IDLE)
    }
}

impl Pool<FormFields> for TablePool {
    fn acquire(&self) -> FormFields {
        match self.shelf.lock() {
            Ok(mut shelf) => shelf.pop().unwrap_or_default(),
            Err(_) => FormFields::default(),
        }
    }

    fn release(&self, mut value: FormFields) {
        value.clear();
        if let Ok(mut shelf) = self.shelf.lock() {
            if shelf.len() < self.max_idle {
                shelf.push(value);
            }
        }
    }
}

/// The scratch pools one family of readers shares.
#[derive(Debug, Default)]
pub struct FormPools {
    pub buffers: BufferPool,
    pub tables: TablePool,
}

/// A bounded free-list of reader instances, one handed out per in-flight
/// parse. All readers from one pool share the same [`FormPools`].
#[derive(Debug)]
pub struct ReaderPool<K: KeyStrategy + Default = LiteralKeys> {
    shelf: Mutex<Vec<FormReader<K>>>,
    options: ReaderOptions,
    pools: Arc<FormPools>,
    max_idle: usize,
}

impl<K: KeyStrategy + Default> ReaderPool<K> {
    #[must_use]
    pub fn new(options: ReaderOptions, max_idle: usize) -> Self {
        Self {
            shelf: Mutex::new(Vec::new()),
            options,
            pools: Arc::new(FormPools::default()),
            max_idle,
        }
    }
}

impl<K: KeyStrategy + Default> Pool<FormReader<K>> for ReaderPool<K> {
    fn acquire(&self) -> FormReader<K> {
        if let Ok(mut shelf) = self.shelf.lock() {
            if let Some(reader) = shelf.pop() {
                trace!("reusing pooled form reader");
                return reader;
            }
        }
        FormReader::with_pools(self.options, K::default(), Arc::clone(&self.pools))
    }

    /// Resets the reader (returning its scratch buffers to the shared pools)
    /// before shelving it.
    fn release(&self, mut reader: FormReader<K>) {
        reader.reset();
        if let Ok(mut shelf) = self.shelf.lock() {
            if shelf.len() < self.max_idle {
                shelf.push(reader);
            }
        }
    }
}
