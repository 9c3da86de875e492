// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Normalize: validate a received buffer before trusting it (§4.4).
//!
//! A received buffer comes from the network, not from this process's own
//! `write`, so every bound, string terminator, wide-string surrogate pair,
//! enum/bitmask range, and must-understand marker has to be checked before
//! the bytes are handed to application code. [`super::read`] already
//! performs every one of these checks inline as it walks the buffer (see
//! its module docs), so `normalize` is a thin validating wrapper: it runs
//! `read` to completion and discards the resulting sample, surfacing only
//! success/failure.
//!
//! Per this crate's chosen behavior for the open question of trailing
//! bytes: a buffer with extra bytes past the last decoded member is
//! accepted (permissive) rather than rejected, matching the tolerance the
//! delimited-type "extra members ignored" rule already extends to appendable
//! bodies — this crate does not insist the whole transport-level buffer was
//! consumed exactly, only that what it did read was valid.

use crate::core::cdr::{Endianness, XcdrVersion};
use crate::core::descriptor::TypeDescriptor;

use super::error::CdrResult;
use super::read::read;

/// Validate `bytes` against `descriptor` without keeping the decoded sample.
pub fn normalize<E: Endianness>(descriptor: &TypeDescriptor, bytes: &[u8], xcdr_version: XcdrVersion) -> CdrResult<()> {
    read::<E>(descriptor, bytes, xcdr_version).map(|_| ())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bytecode::{AdrFlags, Instruction, ValueType};
    use crate::core::cdr::LittleEndian;

    fn s1_descriptor() -> TypeDescriptor {
        TypeDescriptor::new(
            "S1",
            8,
            &[
                Instruction::Adr {
                    offset: 0,
                    value_type: ValueType::Int32,
                    flags: AdrFlags::empty(),
                },
                Instruction::Adr {
                    offset: 1,
                    value_type: ValueType::Str,
                    flags: AdrFlags::empty(),
                },
                Instruction::Rts,
            ],
            &[],
        )
    }

    #[test]
    fn accepts_well_formed_buffer() {
        let descriptor = s1_descriptor();
        let bytes = [0x2A, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00, b'h', b'i', 0x00];
        assert!(normalize::<LittleEndian>(&descriptor, &bytes, XcdrVersion::Xcdr2).is_ok());
    }

    #[test]
    fn trailing_bytes_past_the_last_member_are_tolerated() {
        let descriptor = s1_descriptor();
        let mut bytes = vec![0x2A, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00, b'h', b'i', 0x00];
        bytes.extend_from_slice(&[0xFF, 0xFF, 0xFF, 0xFF]);
        assert!(normalize::<LittleEndian>(&descriptor, &bytes, XcdrVersion::Xcdr2).is_ok());
    }

    #[test]
    fn truncated_buffer_is_rejected() {
        let descriptor = s1_descriptor();
        let bytes = [0x2A, 0x00, 0x00, 0x00];
        assert!(normalize::<LittleEndian>(&descriptor, &bytes, XcdrVersion::Xcdr2).is_err());
    }
}
