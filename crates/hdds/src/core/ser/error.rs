// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Serializer error taxonomy (§7 ERROR HANDLING DESIGN).
//!
//! Three of the four error kinds are recoverable and returned from the
//! public `write`/`read`/`normalize`/`key`/`size` entry points; the fourth
//! (`programmer-error`) is an assertion-level condition — malformed
//! bytecode is a compiler bug, not a runtime input, so it panics rather
//! than returning a `CdrError` (see §6.2).

use std::fmt;

/// Recoverable serializer failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CdrError {
    /// A length read from the wire exceeds the remaining buffer, or a
    /// declared bound (bounded string/sequence/wide-string).
    Bounds { offset: usize, reason: String },
    /// A bitmask value sets a forbidden bit, an enum exceeds its max, a
    /// wide string has odd byte length or malformed surrogate pairing, or a
    /// must-understand member is absent/unknown.
    Invalid { offset: usize, reason: String },
    /// The allocator returned null.
    Allocation { reason: String },
    /// A buffer was too small to hold the requested write/read. Not one of
    /// the spec's four named kinds on its own — folded into `Bounds` at the
    /// call site, kept distinct here because it is the overwhelmingly most
    /// common cursor failure and carries no separate `reason` text budget.
    BufferTooSmall { offset: usize, needed: usize },
}

impl fmt::Display for CdrError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CdrError::Bounds { offset, reason } => write!(f, "bounds violation at offset {offset}: {reason}"),
            CdrError::Invalid { offset, reason } => write!(f, "invalid data at offset {offset}: {reason}"),
            CdrError::Allocation { reason } => write!(f, "allocation failed: {reason}"),
            CdrError::BufferTooSmall { offset, needed } => {
                write!(f, "buffer too small at offset {offset}: need {needed} more bytes")
            }
        }
    }
}

impl std::error::Error for CdrError {}

pub type CdrResult<T> = Result<T, CdrError>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_variants() {
        let err = CdrError::Bounds {
            offset: 4,
            reason: "length exceeds remaining buffer".into(),
        };
        assert_eq!(
            crate::core::string_utils::format_string(format_args!("{err}")),
            "bounds violation at offset 4: length exceeds remaining buffer"
        );

        let err = CdrError::Invalid {
            offset: 8,
            reason: "bitmask has forbidden bit set".into(),
        };
        assert_eq!(
            crate::core::string_utils::format_string(format_args!("{err}")),
            "invalid data at offset 8: bitmask has forbidden bit set"
        );
    }
}
