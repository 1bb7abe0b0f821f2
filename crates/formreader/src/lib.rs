//! A pooled, low-allocation streaming parser for
//! `application/x-www-form-urlencoded` request bodies.
//!
//! Bodies are consumed from any [`std::io::Read`] one buffer refill at a
//! time and come out as either a filtered mapping of accepted field names to
//! decoded values ([`FormReader::read_form`]) or a capacity-bounded sequence
//! of values in arrival order ([`FormReader::read_positional`]). Input
//! buffers, token accumulators, result tables, and the readers themselves
//! are all reusable through acquire/release pools, so a busy server parses
//! form bodies without per-request heap churn.
//!
//! # Examples
//!
//! ```rust
//! use std::collections::HashSet;
//!
//! use formreader::{FormReader, ReaderOptions};
//!
//! let accepted: HashSet<String> =
//!     ["user", "token"].iter().map(|s| (*s).to_string()).collect();
//!
//! let mut reader = FormReader::new(ReaderOptions::default());
//! let fields = reader
//!     .read_form("user=ada+l&token=s3cr%2Bt&junk=1".as_bytes(), &accepted)?
//!     .expect("no limit tripped");
//!
//! assert_eq!(fields["user"].as_deref(), Some("ada l"));
//! assert_eq!(fields["token"].as_deref(), Some("s3cr+t"));
//! assert!(!fields.contains_key("junk"));
//!
//! reader.reset();
//! # Ok::<(), std::io::Error>(())
//! ```

mod buffer;
mod decoder;
mod error;
mod keys;
mod options;
mod pool;
mod reader;

#[cfg(test)]
mod tests;

pub use error::LimitExceeded;
pub use keys::{KeyStrategy, LiteralKeys, PositionalKeys};
pub use options::ReaderOptions;
pub use pool::{BufferPool, FormPools, Pool, ReaderPool, TablePool};
pub use reader::{FormFields, FormReader, PositionalFormReader};
