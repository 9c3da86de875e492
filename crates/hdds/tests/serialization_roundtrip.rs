// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)]
#![allow(clippy::missing_panics_doc)]
#![allow(clippy::missing_errors_doc)]
#![allow(clippy::items_after_statements)]
#![allow(clippy::module_name_repetitions)]
#![allow(clippy::too_many_lines)]
#![allow(clippy::wildcard_imports)]
#![allow(clippy::similar_names)]

//! Cross-module round-trip tests exercising the bytecode-driven serializer
//! end to end (write → read, write → normalize, write → size) against the
//! concrete scenarios of the specification's testable properties: §8 S1-S4.

use hdds::core::bytecode::{AdrFlags, Extensibility, Instruction, Program, ValueType};
use hdds::core::descriptor::{MemberIdEntry, MemberIdTable, TypeDescriptor};
use hdds::core::value::Value;
use hdds::{BigEndian, LittleEndian, XcdrVersion};

/// S1: `struct { int32 x; string y; }`, sample `{42, "hi"}`, XCDR2 LE.
#[test]
fn s1_struct_int_and_string_matches_expected_wire_bytes_and_round_trips() {
    let descriptor = TypeDescriptor::new(
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
    );
    let sample = Value::Struct(vec![Some(Value::I32(42)), Some(Value::Str("hi".into()))]);

    let bytes = hdds::write::<LittleEndian>(&descriptor, &sample, XcdrVersion::Xcdr2).unwrap();
    assert_eq!(
        bytes,
        vec![0x2A, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00, b'h', b'i', 0x00]
    );

    let decoded = hdds::read::<LittleEndian>(&descriptor, &bytes, XcdrVersion::Xcdr2).unwrap();
    assert_eq!(decoded, sample);

    let predicted_size = hdds::size(&descriptor, &sample, XcdrVersion::Xcdr2).unwrap();
    assert_eq!(predicted_size, bytes.len());

    assert!(hdds::normalize::<LittleEndian>(&descriptor, &bytes, XcdrVersion::Xcdr2).is_ok());
}

/// S2: `@appendable struct { int32 a; int32 b; }`, sender adds `int32 c`;
/// a receiver with the original (shorter) type still reads `{a, b}` and
/// discards the trailing bytes of `c`.
#[test]
fn s2_appendable_reader_with_fewer_members_discards_trailing_bytes() {
    fn descriptor(members: usize) -> TypeDescriptor {
        let mut instructions: Vec<Instruction> = (0..members)
            .map(|i| Instruction::Adr {
                offset: i as u32,
                value_type: ValueType::Int32,
                flags: AdrFlags::empty(),
            })
            .collect();
        instructions.push(Instruction::Rts);
        let mut d = TypeDescriptor::new("Appendable", 4 * members as u32, &[Instruction::Rts], &[]);
        d.program = Program::with_extensibility(instructions, Extensibility::Appendable);
        d
    }

    let writer_descriptor = descriptor(3);
    let writer_sample = Value::Struct(vec![Some(Value::I32(1)), Some(Value::I32(2)), Some(Value::I32(3))]);
    let bytes = hdds::write::<LittleEndian>(&writer_descriptor, &writer_sample, XcdrVersion::Xcdr2).unwrap();

    let reader_descriptor = descriptor(2);
    let decoded = hdds::read::<LittleEndian>(&reader_descriptor, &bytes, XcdrVersion::Xcdr2).unwrap();
    assert_eq!(decoded, Value::Struct(vec![Some(Value::I32(1)), Some(Value::I32(2))]));

    // A reader with MORE members than the sender fills the missing tail with `None`.
    let wider_descriptor = descriptor(4);
    let wider_sample = Value::Struct(vec![Some(Value::I32(1)), Some(Value::I32(2))]);
    let short_bytes = hdds::write::<LittleEndian>(&descriptor(2), &wider_sample, XcdrVersion::Xcdr2).unwrap();
    let decoded_wider = hdds::read::<LittleEndian>(&wider_descriptor, &short_bytes, XcdrVersion::Xcdr2).unwrap();
    assert_eq!(
        decoded_wider,
        Value::Struct(vec![Some(Value::I32(1)), Some(Value::I32(2)), None, None])
    );
}

/// S3: `@mutable struct { @id(17) int32 x; @id(42) @must_understand string y; }`;
/// sender omits member 42; receiver rejects with an `invalid` error.
#[test]
fn s3_mutable_reader_rejects_missing_must_understand_member() {
    let sub_x = Program::new(vec![
        Instruction::Adr {
            offset: 0,
            value_type: ValueType::Int32,
            flags: AdrFlags::empty(),
        },
        Instruction::Rts,
    ]);
    let sub_y = Program::new(vec![
        Instruction::Adr {
            offset: 1,
            value_type: ValueType::Str,
            flags: AdrFlags::MUST_UNDERSTAND,
        },
        Instruction::Rts,
    ]);

    let mut descriptor = TypeDescriptor::new("Mutable", 0, &[Instruction::Rts], &[sub_x, sub_y]);
    descriptor.program = Program::with_extensibility(
        vec![
            Instruction::Plm {
                program: 0,
                member_id: 17,
                is_base: false,
            },
            Instruction::Plm {
                program: 1,
                member_id: 42,
                is_base: false,
            },
            Instruction::Rts,
        ],
        Extensibility::Mutable,
    );

    // Sender writes only member 17, omitting the must-understand member 42.
    let sender_only_x = Program::with_extensibility(
        vec![
            Instruction::Plm {
                program: 0,
                member_id: 17,
                is_base: false,
            },
            Instruction::Rts,
        ],
        Extensibility::Mutable,
    );
    let mut sender_descriptor = descriptor.clone();
    sender_descriptor.program = sender_only_x;
    let sample = Value::Struct(vec![Some(Value::I32(5))]);
    let bytes = hdds::write::<LittleEndian>(&sender_descriptor, &sample, XcdrVersion::Xcdr2).unwrap();

    let err = hdds::read::<LittleEndian>(&descriptor, &bytes, XcdrVersion::Xcdr2).unwrap_err();
    assert!(matches!(err, hdds::CdrError::Invalid { .. }));
    assert!(hdds::normalize::<LittleEndian>(&descriptor, &bytes, XcdrVersion::Xcdr2).is_err());
}

/// S4: sequence of `bounded-string<7>`, sample `["abc", "defghij"]`. Write
/// succeeds; mutating the first element to 8 bytes makes normalize reject it.
#[test]
fn s4_bounded_string_sequence_write_succeeds_then_normalize_rejects_mutated_buffer() {
    let descriptor = TypeDescriptor::new(
        "BoundedStrSeq",
        0,
        &[
            Instruction::Adr {
                offset: 0,
                value_type: ValueType::Sequence {
                    element: Box::new(ValueType::BoundedStr { bound: 7 }),
                    program: None,
                },
                flags: AdrFlags::empty(),
            },
            Instruction::Rts,
        ],
        &[],
    );
    let sample = Value::Struct(vec![Some(Value::Sequence(vec![
        Value::Str("abc".into()),
        Value::Str("defghij".into()),
    ]))]);

    let mut bytes = hdds::write::<LittleEndian>(&descriptor, &sample, XcdrVersion::Xcdr2).unwrap();
    let decoded = hdds::read::<LittleEndian>(&descriptor, &bytes, XcdrVersion::Xcdr2).unwrap();
    assert_eq!(decoded, sample);

    // A sequence of a non-primitive element type (bounded strings) is
    // DHEADER-wrapped under XCDR2: [DHEADER:u32][count:u32][len0:u32]
    // ["abc\0"][len1:u32]["defghij\0"]. Locate the first element's length
    // prefix past the DHEADER and count, and bump its declared length from
    // 4 ("abc\0") to 9, growing the string past the bound of 7 once
    // normalize tries to read the extra bytes.
    let len0_pos = 8;
    let mut len0 = u32::from_le_bytes(bytes[len0_pos..len0_pos + 4].try_into().unwrap());
    len0 += 5; // "abc" (3) + NUL -> claim a string 5 bytes longer than the bound allows.
    bytes[len0_pos..len0_pos + 4].copy_from_slice(&len0.to_le_bytes());
    bytes.splice(len0_pos + 4..len0_pos + 4, std::iter::repeat(b'z').take(5));

    let err = hdds::normalize::<LittleEndian>(&descriptor, &bytes, XcdrVersion::Xcdr2).unwrap_err();
    assert!(matches!(err, hdds::CdrError::Bounds { .. } | hdds::CdrError::Invalid { .. }));
}

/// Property 1 (round-trip) exercised across both XCDR versions and both
/// explicit endiannesses for one representative nested/appendable/mutable
/// shape, since the per-module unit tests already cover the individual
/// wrapper kinds in isolation.
#[test]
fn round_trip_holds_across_xcdr_versions_and_endiannesses() {
    let descriptor = TypeDescriptor::new(
        "Versioned",
        8,
        &[
            Instruction::Adr {
                offset: 0,
                value_type: ValueType::Int32,
                flags: AdrFlags::empty(),
            },
            Instruction::Adr {
                offset: 1,
                value_type: ValueType::Bitmask {
                    width: 4,
                    valid_bits: 0b1111,
                },
                flags: AdrFlags::empty(),
            },
            Instruction::Rts,
        ],
        &[],
    );
    let sample = Value::Struct(vec![Some(Value::I32(-7)), Some(Value::Bitmask(0b1010))]);

    for xcdr in [XcdrVersion::Xcdr1, XcdrVersion::Xcdr2] {
        let le = hdds::write::<LittleEndian>(&descriptor, &sample, xcdr).unwrap();
        assert_eq!(hdds::read::<LittleEndian>(&descriptor, &le, xcdr).unwrap(), sample);

        let be = hdds::write::<BigEndian>(&descriptor, &sample, xcdr).unwrap();
        assert_eq!(hdds::read::<BigEndian>(&descriptor, &be, xcdr).unwrap(), sample);
    }
}

/// XCDR1 optional members round-trip through the extended-parameter-header
/// path using the member-ID table, for both the present and absent case.
#[test]
fn xcdr1_optional_member_round_trips_via_member_id_table() {
    let mut descriptor = TypeDescriptor::new(
        "Optional",
        8,
        &[
            Instruction::Adr {
                offset: 0,
                value_type: ValueType::Int32,
                flags: AdrFlags::empty(),
            },
            Instruction::Adr {
                offset: 1,
                value_type: ValueType::Int32,
                flags: AdrFlags::OPTIONAL,
            },
            Instruction::Rts,
        ],
        &[],
    );
    descriptor.member_id_table = MemberIdTable::build(&[
        MemberIdEntry { adr_index: 0, member_id: 0 },
        MemberIdEntry { adr_index: 1, member_id: 9 },
    ]);

    for sample in [
        Value::Struct(vec![Some(Value::I32(1)), Some(Value::I32(99))]),
        Value::Struct(vec![Some(Value::I32(1)), None]),
    ] {
        let bytes = hdds::write::<LittleEndian>(&descriptor, &sample, XcdrVersion::Xcdr1).unwrap();
        assert_eq!(hdds::read::<LittleEndian>(&descriptor, &bytes, XcdrVersion::Xcdr1).unwrap(), sample);
        assert_eq!(hdds::size(&descriptor, &sample, XcdrVersion::Xcdr1).unwrap(), bytes.len());
    }
}
