//! Character ramps for luminance mapping.

use std::fmt;
use std::str::FromStr;

/// Default ramp, ordered from darkest to brightest.
pub const DEFAULT_RAMP: &str = "...',;:clodxkO0KXNWM";

/// Block ramp (5 levels) using Unicode shade characters.
pub const BLOCKS_RAMP: &str = " ░▒▓█";

/// Upper half block, used for stacked two-row cells.
pub const UPPER_HALF_BLOCK: char = '▀';

/// Lower half block, used when the bottom row is brighter.
pub const LOWER_HALF_BLOCK: char = '▄';

/// Error returned when parsing an empty ramp.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("character ramp must contain at least one character")]
pub struct EmptyRampError;

/// Ordered, non-empty sequence of glyphs from darkest to brightest.
///
/// The highest index is the brightest glyph unless the ramp has been
/// [`inverted`](Ramp::inverted).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ramp(Vec<char>);

impl Ramp {
    /// Build a ramp from its characters.
    pub fn new(chars: Vec<char>) -> Result<Self, EmptyRampError> {
        if chars.is_empty() {
            Err(EmptyRampError)
        } else {
            Ok(Self(chars))
        }
    }

    /// Parse a ramp from a string, one glyph per `char`.
    pub fn parse(s: &str) -> Result<Self, EmptyRampError> {
        Self::new(s.chars().collect())
    }

    /// Reversed copy of this ramp.
    pub fn inverted(&self) -> Self {
        Self(self.0.iter().rev().copied().collect())
    }

    pub fn chars(&self) -> &[char] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Always false; kept for API symmetry with `len`.
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Brightest glyph.
    pub fn last(&self) -> char {
        self.0[self.0.len() - 1]
    }
}

impl Default for Ramp {
    fn default() -> Self {
        Self(DEFAULT_RAMP.chars().collect())
    }
}

impl FromStr for Ramp {
    type Err = EmptyRampError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for Ramp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for c in &self.0 {
            write!(f, "{}", c)?;
        }
        Ok(())
    }
}
