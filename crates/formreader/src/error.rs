use thiserror::Error;

/// Why a parse was abandoned.
///
/// Limits protect the server from adversarial bodies; tripping any of them
/// abandons the whole parse, and the top-level operations report that as an
/// absent result rather than an error value. The cause stays queryable on the
/// reader via [`FormReader::failure`](crate::FormReader::failure).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
pub enum LimitExceeded {
    /// A key token outgrew [`ReaderOptions::max_key_bytes`](crate::ReaderOptions::max_key_bytes).
    #[error("form key length limit exceeded")]
    KeyLength,
    /// A value token outgrew [`ReaderOptions::max_value_bytes`](crate::ReaderOptions::max_value_bytes).
    #[error("form value length limit exceeded")]
    ValueLength,
    /// The mapping grew past [`ReaderOptions::max_fields`](crate::ReaderOptions::max_fields).
    #[error("form field count limit exceeded")]
    FieldCount,
}
