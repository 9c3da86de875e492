// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Fuzz target for the CDR deserialization path.
//!
//! Feeds arbitrary bytes to [`hdds::read`]/[`hdds::normalize`] against a
//! handful of representative descriptors, and to the low-level
//! [`hdds::CdrInput`] primitive reads and [`hdds::core::ser::cursor::Cursor`].
//! None of these should panic on any input; `read`/`normalize` must either
//! return a sample or a `CdrError`, never index out of bounds.

#![no_main]

use hdds::core::bytecode::{AdrFlags, Instruction, Program, ValueType};
use hdds::core::descriptor::TypeDescriptor;
use hdds::core::ser::cursor::Cursor;
use hdds::{normalize, read, CdrInput, LittleEndian, XcdrVersion};
use libfuzzer_sys::fuzz_target;

fn flat_descriptor() -> TypeDescriptor {
    TypeDescriptor::new(
        "Flat",
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

fn sequence_descriptor() -> TypeDescriptor {
    TypeDescriptor::new(
        "Seq",
        0,
        &[
            Instruction::Adr {
                offset: 0,
                value_type: ValueType::Sequence {
                    element: Box::new(ValueType::UInt8),
                    program: None,
                },
                flags: AdrFlags::empty(),
            },
            Instruction::Rts,
        ],
        &[],
    )
}

fn appendable_descriptor() -> TypeDescriptor {
    let mut descriptor = TypeDescriptor::new("Appendable", 4, &[Instruction::Rts], &[]);
    descriptor.program = Program::with_extensibility(
        vec![
            Instruction::Adr {
                offset: 0,
                value_type: ValueType::Int32,
                flags: AdrFlags::empty(),
            },
            Instruction::Rts,
        ],
        hdds::core::bytecode::Extensibility::Appendable,
    );
    descriptor
}

fuzz_target!(|data: &[u8]| {
    for descriptor in [flat_descriptor(), sequence_descriptor(), appendable_descriptor()] {
        for xcdr_version in [XcdrVersion::Xcdr1, XcdrVersion::Xcdr2] {
            let _ = read::<LittleEndian>(&descriptor, data, xcdr_version);
            let _ = normalize::<LittleEndian>(&descriptor, data, xcdr_version);
        }
    }

    if let Ok(mut input) = CdrInput::<LittleEndian>::new(data, XcdrVersion::Xcdr2) {
        let _ = input.read_bool();
        let _ = input.read_u8();
        let _ = input.read_u16();
        let _ = input.read_u32();
        let _ = input.read_u64();
        let _ = input.read_i32();
        let _ = input.read_f64();
        let _ = input.read_bytes(4);
        let _ = input.peek_u32();
    }

    {
        let mut cursor = Cursor::new(data);
        let _ = cursor.read_u8();
        let _ = cursor.read_u16_le();
        let _ = cursor.read_u32_le();
        let _ = cursor.read_u64_le();
        let _ = cursor.read_i32_le();
        let _ = cursor.read_f64_le();
        let _ = cursor.read_bytes(4);
    }

    {
        let mut cursor = Cursor::new(data);
        while cursor.remaining() > 0 {
            if cursor.read_u8().is_err() {
                break;
            }
        }
    }
});
