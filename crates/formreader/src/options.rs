/// Configuration limits for a form reader.
///
/// Every limit bounds raw (still encoded) bytes, which is also what the
/// buffers hold, so an adversarial body cannot force large allocations by
/// hiding behind percent escapes.
///
/// # Examples
///
/// ```rust
/// use formreader::ReaderOptions;
///
/// let options = ReaderOptions {
///     max_fields: 16,
///     ..ReaderOptions::default()
/// };
/// assert_eq!(options.max_key_bytes, 512);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct ReaderOptions {
    /// Maximum number of retained fields in mapping mode.
    ///
    /// Exceeding it abandons the whole parse. Overwriting a duplicate key
    /// does not grow the mapping and therefore does not count.
    ///
    /// # Default
    ///
    /// `100` (`10` for [`positional`](ReaderOptions::positional) readers,
    /// where it is the conventional capacity rather than an abort threshold).
    pub max_fields: usize,

    /// Maximum raw length of a key token, in bytes.
    ///
    /// # Default
    ///
    /// `512` (`1` for [`positional`](ReaderOptions::positional) readers,
    /// whose literal keys are single placeholder characters).
    pub max_key_bytes: usize,

    /// Maximum raw length of a value token, in bytes.
    ///
    /// Enforced even for values that will be discarded by the key filter;
    /// their bytes are consumed either way.
    ///
    /// # Default
    ///
    /// `4 MiB`
    pub max_value_bytes: usize,

    /// Size of the pooled input buffer, i.e. how many bytes one refill asks
    /// the stream for.
    ///
    /// # Default
    ///
    /// `2048`
    pub fill_buffer_len: usize,
}

impl Default for ReaderOptions {
    fn default() -> Self {
        Self {
            max_fields: 100,
            max_key_bytes: 512,
            max_value_bytes: 4 * 1024 * 1024,
            fill_buffer_len: 2048,
        }
    }
}

impl ReaderOptions {
    /// The defaults for positional readers: ten values at most, single-byte
    /// placeholder keys.
    #[must_use]
    pub fn positional() -> Self {
        Self {
            max_fields: 10,
            max_key_bytes: 1,
            ..Self::default()
        }
    }
}
