//! Key derivation strategies.
//!
//! The word scanner offers the first byte of every key token to a strategy
//! before it applies its ordinary separator logic. The default strategy never
//! claims anything, leaving plain delimiter scanning. The positional strategy
//! claims every key token and substitutes a counter-derived label, which is
//! how a body like `x=a&x=b` is read as an ordered list of values.

/// How key words are derived from the input.
pub trait KeyStrategy {
    /// Offered the first byte of each key token, before separator handling.
    ///
    /// Returning `Some` substitutes the synthetic word for the literal key
    /// and ends the token immediately; the offered byte is consumed but
    /// never examined further, and the literal key separator is left in the
    /// input.
    fn derive_key(&mut self, first: u8) -> Option<String>;

    /// Called once at the start of every parse.
    fn begin_parse(&mut self) {}
}

/// Plain delimiter scanning; keys are whatever the body spells out.
#[derive(Debug, Clone, Copy, Default)]
pub struct LiteralKeys;

impl KeyStrategy for LiteralKeys {
    fn derive_key(&mut self, _first: u8) -> Option<String> {
        None
    }
}

/// Labels for the first ten positions, so the common short bodies never hit
/// the formatting path.
const POSITION_LABELS: [&str; 10] = ["0", "1", "2", "3", "4", "5", "6", "7", "8", "9"];

/// Ignores literal key text and derives keys from the arrival order of
/// pairs: `"0"`, `"1"`, … within one parse.
#[derive(Debug, Clone, Copy, Default)]
pub struct PositionalKeys {
    position: usize,
}

impl KeyStrategy for PositionalKeys {
    fn derive_key(&mut self, _first: u8) -> Option<String> {
        let label = POSITION_LABELS
            .get(self.position)
            .map_or_else(|| self.position.to_string(), |&label| label.to_owned());
        self.position += 1;
        Some(label)
    }

    fn begin_parse(&mut self) {
        self.position = 0;
    }
}
