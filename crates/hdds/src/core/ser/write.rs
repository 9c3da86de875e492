// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Write: sample → bytes (§4.3).
//!
//! Dispatches on the top-level program's extensibility (final / appendable
//! `DLC` / mutable `PLC`), then walks each `ADR` emitting aligned primitive
//! writes at the leaves and recursing through sub-programs for structured
//! subfields, exactly mirroring [`crate::core::ser::read`]'s walk in the
//! opposite direction.

use crate::core::bytecode::{AdrFlags, Extensibility, Instruction, Program, ValueType};
use crate::core::cdr::{CdrOutput, Endianness, XcdrVersion};
use crate::core::descriptor::TypeDescriptor;
use crate::core::value::Value;

use super::error::{CdrError, CdrResult};
use super::pl::{
    emheader, extended_parameter_header_short_word, length_code_for_fixed, short_parameter_header, LengthCode,
    EXTENDED_HEADER_TRAILER_LEN, PID_SENTINEL_LIST_END,
};
use super::size::size_of_value;

/// Serialize `sample` against `descriptor` into a freshly allocated buffer.
pub fn write<E: Endianness>(
    descriptor: &TypeDescriptor,
    sample: &Value,
    xcdr_version: XcdrVersion,
) -> CdrResult<Vec<u8>> {
    let mut out = CdrOutput::<E>::new(xcdr_version);
    write_aggregate(&mut out, descriptor, &descriptor.program, sample)?;
    Ok(out.into_bytes())
}

fn write_aggregate<E: Endianness>(
    out: &mut CdrOutput<E>,
    descriptor: &TypeDescriptor,
    program: &Program,
    sample: &Value,
) -> CdrResult<()> {
    let members = sample.as_struct().ok_or_else(|| CdrError::Invalid {
        offset: out.position(),
        reason: "expected a struct-shaped sample".into(),
    })?;

    match program.extensibility {
        Extensibility::Final => write_final(out, descriptor, program, members),
        Extensibility::Appendable => write_appendable(out, descriptor, program, members),
        Extensibility::Mutable => write_mutable(out, descriptor, program, members),
    }
}

fn write_final<E: Endianness>(
    out: &mut CdrOutput<E>,
    descriptor: &TypeDescriptor,
    program: &Program,
    members: &[Option<Value>],
) -> CdrResult<()> {
    for (instr, member) in program.members().zip(members.iter()) {
        write_adr(out, descriptor, instr, member)?;
    }
    Ok(())
}

fn write_appendable<E: Endianness>(
    out: &mut CdrOutput<E>,
    descriptor: &TypeDescriptor,
    program: &Program,
    members: &[Option<Value>],
) -> CdrResult<()> {
    // XCDR1 never delimits appendable types (no DHEADER); only XCDR2 does (§4.2).
    if out.xcdr_version() == XcdrVersion::Xcdr1 {
        return write_final(out, descriptor, program, members);
    }
    let dheader_pos = out.reserve_u32();
    let start = out.position();
    write_final(out, descriptor, program, members)?;
    let len = (out.position() - start) as u32;
    out.patch_u32(dheader_pos, len)?;
    Ok(())
}

fn write_mutable<E: Endianness>(
    out: &mut CdrOutput<E>,
    descriptor: &TypeDescriptor,
    program: &Program,
    members: &[Option<Value>],
) -> CdrResult<()> {
    if out.xcdr_version() == XcdrVersion::Xcdr1 {
        return write_mutable_xcdr1(out, descriptor, program, members);
    }

    let dheader_pos = out.reserve_u32();
    let start = out.position();
    for (instr, member) in program.instructions.iter().zip(members.iter()) {
        let Instruction::Plm {
            program: sub_idx,
            member_id,
            is_base: _,
        } = instr
        else {
            continue;
        };
        let Some(value) = member else { continue };
        let sub = descriptor.subprogram(*sub_idx);
        let Some(Instruction::Adr {
            value_type, flags, ..
        }) = sub.instructions.first()
        else {
            return Err(CdrError::Invalid {
                offset: out.position(),
                reason: "PLM sub-program must start with an ADR".into(),
            });
        };
        write_plm_member(out, descriptor, *member_id, value_type, *flags, value)?;
    }
    let len = (out.position() - start) as u32;
    out.patch_u32(dheader_pos, len)?;
    Ok(())
}

/// §4.2/§4.3: XCDR1 mutable types use PID parameter-list framing instead of
/// XCDR2's DHEADER+EMHEADER — each present member gets a short or extended
/// parameter header (picked by [`write_xcdr1_plm_member`]), and the list is
/// terminated by the `0x3F01` list-end sentinel rather than a length prefix.
fn write_mutable_xcdr1<E: Endianness>(
    out: &mut CdrOutput<E>,
    descriptor: &TypeDescriptor,
    program: &Program,
    members: &[Option<Value>],
) -> CdrResult<()> {
    for (instr, member) in program.instructions.iter().zip(members.iter()) {
        let Instruction::Plm {
            program: sub_idx,
            member_id,
            is_base: _,
        } = instr
        else {
            continue;
        };
        let Some(value) = member else { continue };
        let sub = descriptor.subprogram(*sub_idx);
        let Some(Instruction::Adr {
            value_type, flags, ..
        }) = sub.instructions.first()
        else {
            return Err(CdrError::Invalid {
                offset: out.position(),
                reason: "PLM sub-program must start with an ADR".into(),
            });
        };
        write_xcdr1_plm_member(
            out,
            descriptor,
            *member_id,
            value_type,
            flags.contains(AdrFlags::MUST_UNDERSTAND),
            value,
        )?;
    }
    out.align_for_primitive(4);
    out.write_u16(PID_SENTINEL_LIST_END);
    out.write_u16(0); // trailing word is unused for the sentinel
    Ok(())
}

/// One XCDR1 `PLC` member: a short parameter header when `member_id` fits 14
/// bits and the value's encoded length fits the short form's 16-bit length
/// field, otherwise the extended form (full 32-bit member-ID, 32-bit
/// length) already used for XCDR1 optional members.
fn write_xcdr1_plm_member<E: Endianness>(
    out: &mut CdrOutput<E>,
    descriptor: &TypeDescriptor,
    member_id: u32,
    value_type: &ValueType,
    must_understand: bool,
    value: &Value,
) -> CdrResult<()> {
    out.align_for_primitive(4);
    let predicted_len = size_of_value(descriptor, value_type, value, XcdrVersion::Xcdr1)?;

    match short_parameter_header(member_id, must_understand).filter(|_| predicted_len <= u16::MAX as usize) {
        Some(short_word) => {
            out.write_u16(short_word);
            let length_pos = out.reserve_u16();
            let prev_origin = out.set_align_origin(out.position());
            let start = out.position();
            write_value(out, descriptor, value_type, value)?;
            let len = (out.position() - start) as u16;
            out.set_align_origin(prev_origin);
            out.patch_u16(length_pos, len)
        }
        None => {
            out.write_u16(extended_parameter_header_short_word(must_understand));
            out.write_u16(EXTENDED_HEADER_TRAILER_LEN);
            out.write_u32(member_id);
            let length_pos = out.reserve_u32();
            let prev_origin = out.set_align_origin(out.position());
            let start = out.position();
            write_value(out, descriptor, value_type, value)?;
            let len = (out.position() - start) as u32;
            out.set_align_origin(prev_origin);
            out.patch_u32(length_pos, len)
        }
    }
}

fn write_plm_member<E: Endianness>(
    out: &mut CdrOutput<E>,
    descriptor: &TypeDescriptor,
    member_id: u32,
    value_type: &ValueType,
    flags: AdrFlags,
    value: &Value,
) -> CdrResult<()> {
    let must_understand = flags.contains(AdrFlags::MUST_UNDERSTAND);
    match value_type.primitive_size() {
        Some(size) => {
            let lc = length_code_for_fixed(size)?;
            out.write_u32(emheader(member_id, lc, must_understand));
            write_value(out, descriptor, value_type, value)?;
        }
        None => {
            out.write_u32(emheader(member_id, LengthCode::NextIntBytes, must_understand));
            let nextint_pos = out.reserve_u32();
            let value_start = out.position();
            write_value(out, descriptor, value_type, value)?;
            let len = (out.position() - value_start) as u32;
            out.patch_u32(nextint_pos, len)?;
        }
    }
    Ok(())
}

fn write_adr<E: Endianness>(
    out: &mut CdrOutput<E>,
    descriptor: &TypeDescriptor,
    instr: &Instruction,
    member: &Option<Value>,
) -> CdrResult<()> {
    let Instruction::Adr {
        offset,
        value_type,
        flags,
    } = instr
    else {
        return Err(CdrError::Invalid {
            offset: out.position(),
            reason: "expected an ADR instruction".into(),
        });
    };

    if flags.contains(AdrFlags::OPTIONAL) {
        if out.xcdr_version() == XcdrVersion::Xcdr1 {
            // §4.3 step 2: a non-mutable XCDR1 aggregate encodes an
            // optional member with an extended parameter header (looked up
            // by declared position in the descriptor's member-ID table) when
            // present, and nothing at all when absent.
            match member {
                Some(value) => write_xcdr1_optional_member(
                    out,
                    descriptor,
                    *offset,
                    flags.contains(AdrFlags::MUST_UNDERSTAND),
                    value_type,
                    value,
                ),
                None => Ok(()),
            }
        } else {
            match member {
                Some(value) => {
                    out.write_bool(true);
                    write_value(out, descriptor, value_type, value)
                }
                None => {
                    out.write_bool(false);
                    Ok(())
                }
            }
        }
    } else {
        let value = member.as_ref().ok_or_else(|| CdrError::Invalid {
            offset: out.position(),
            reason: "non-optional member is absent".into(),
        })?;
        write_value(out, descriptor, value_type, value)
    }
}

/// Extended parameter header (§4.2) + value, with the alignment origin
/// relocated so the value region is locally aligned to 0, exactly as a
/// `PLC` member's value would be.
fn write_xcdr1_optional_member<E: Endianness>(
    out: &mut CdrOutput<E>,
    descriptor: &TypeDescriptor,
    adr_index: u32,
    must_understand: bool,
    value_type: &ValueType,
    value: &Value,
) -> CdrResult<()> {
    let member_id = descriptor
        .member_id_table
        .member_id_for_adr_index(adr_index)
        .ok_or_else(|| CdrError::Invalid {
            offset: out.position(),
            reason: "optional member has no member-ID table entry".into(),
        })?;

    out.align_for_primitive(4);
    out.write_u16(extended_parameter_header_short_word(must_understand));
    out.write_u16(EXTENDED_HEADER_TRAILER_LEN);
    out.write_u32(member_id);
    let length_pos = out.reserve_u32();

    let prev_origin = out.set_align_origin(out.position());
    let start = out.position();
    write_value(out, descriptor, value_type, value)?;
    let len = (out.position() - start) as u32;
    out.set_align_origin(prev_origin);
    out.patch_u32(length_pos, len)
}

/// Exposed `pub(crate)` so [`super::key`]'s fast path can serialize an
/// individual key member without going through a whole-sample `write`.
pub(crate) fn write_value<E: Endianness>(
    out: &mut CdrOutput<E>,
    descriptor: &TypeDescriptor,
    value_type: &ValueType,
    value: &Value,
) -> CdrResult<()> {
    match (value_type, value) {
        (ValueType::Bool, Value::Bool(v)) => out.write_bool(*v),
        (ValueType::Int8, Value::I8(v)) => out.write_u8(*v as u8),
        (ValueType::UInt8, Value::U8(v)) => out.write_u8(*v),
        (ValueType::Int16, Value::I16(v)) => out.write_i16(*v),
        (ValueType::UInt16, Value::U16(v)) => out.write_u16(*v),
        (ValueType::WChar, Value::WChar(v)) => out.write_u16(*v),
        (ValueType::Int32, Value::I32(v)) => out.write_i32(*v),
        (ValueType::UInt32, Value::U32(v)) => out.write_u32(*v),
        (ValueType::Float32, Value::F32(v)) => out.write_f32(*v),
        (ValueType::Int64, Value::I64(v)) => out.write_i64(*v),
        (ValueType::UInt64, Value::U64(v)) => out.write_u64(*v),
        (ValueType::Float64, Value::F64(v)) => out.write_f64(*v),
        (ValueType::Enum { width, max }, Value::Enum(v)) => {
            if *v < 0 || (*v as u32) > *max {
                return Err(CdrError::Invalid {
                    offset: out.position(),
                    reason: format!("enum value {v} exceeds declared max {max}"),
                });
            }
            write_sized_int(out, *width, *v as u64);
        }
        (ValueType::Bitmask { width, valid_bits }, Value::Bitmask(v)) => {
            if v & !*valid_bits != 0 {
                return Err(CdrError::Invalid {
                    offset: out.position(),
                    reason: "bitmask sets a bit outside the valid-bits mask".into(),
                });
            }
            write_sized_int(out, *width, *v);
        }
        (ValueType::Str, Value::Str(s)) => write_string(out, s, None)?,
        (ValueType::BoundedStr { bound }, Value::Str(s)) => write_string(out, s, Some(*bound))?,
        (ValueType::WStr, Value::WStr(s)) => write_wstring(out, s, None)?,
        (ValueType::BoundedWStr { bound }, Value::WStr(s)) => write_wstring(out, s, Some(*bound))?,
        (
            ValueType::Sequence { element, program },
            Value::Sequence(items),
        ) => write_sequence(out, descriptor, element, *program, items, None)?,
        (
            ValueType::BoundedSequence {
                element,
                bound,
                program,
            },
            Value::Sequence(items),
        ) => write_sequence(out, descriptor, element, *program, items, Some(*bound))?,
        (ValueType::Array { element, count, program }, Value::Array(items)) => {
            if items.len() != *count as usize {
                return Err(CdrError::Invalid {
                    offset: out.position(),
                    reason: format!("array expects {count} elements, got {}", items.len()),
                });
            }
            write_array(out, descriptor, element, *program, items)?
        }
        (ValueType::Struct { program }, _) => {
            write_aggregate(out, descriptor, descriptor.subprogram(*program), value)?
        }
        (ValueType::Union { program }, Value::Union { discriminant, value }) => {
            write_union(out, descriptor, *program, *discriminant, value)?
        }
        (ValueType::External { program, .. }, Value::External(inner)) => match inner.as_ref() {
            Some(v) => write_aggregate(out, descriptor, descriptor.subprogram(*program), v)?,
            None => {
                return Err(CdrError::Invalid {
                    offset: out.position(),
                    reason: "external member is null".into(),
                })
            }
        },
        _ => {
            return Err(CdrError::Invalid {
                offset: out.position(),
                reason: "sample value does not match descriptor value type".into(),
            })
        }
    }
    Ok(())
}

fn write_sized_int<E: Endianness>(out: &mut CdrOutput<E>, width: u8, value: u64) {
    match width {
        1 => out.write_u8(value as u8),
        2 => out.write_u16(value as u16),
        4 => out.write_u32(value as u32),
        8 => out.write_u64(value),
        _ => unreachable!("programmer error: enum/bitmask width must be 1, 2, 4 or 8"),
    }
}

fn write_string<E: Endianness>(out: &mut CdrOutput<E>, s: &str, bound: Option<u32>) -> CdrResult<()> {
    let len_with_nul = s.len() + 1;
    if let Some(bound) = bound {
        if s.len() > bound as usize {
            return Err(CdrError::Bounds {
                offset: out.position(),
                reason: format!("string of {} bytes exceeds bound {bound}", s.len()),
            });
        }
    }
    out.write_u32(len_with_nul as u32);
    out.write_bytes(s.as_bytes());
    out.write_u8(0);
    Ok(())
}

fn write_wstring<E: Endianness>(out: &mut CdrOutput<E>, s: &str, bound: Option<u32>) -> CdrResult<()> {
    let units: Vec<u16> = s.encode_utf16().collect();
    if let Some(bound) = bound {
        if units.len() > bound as usize {
            return Err(CdrError::Bounds {
                offset: out.position(),
                reason: format!("wide string of {} units exceeds bound {bound}", units.len()),
            });
        }
    }
    out.write_u32((units.len() * 2) as u32);
    for unit in units {
        out.write_u16(unit);
    }
    Ok(())
}

fn write_sequence<E: Endianness>(
    out: &mut CdrOutput<E>,
    descriptor: &TypeDescriptor,
    element: &ValueType,
    program: Option<usize>,
    items: &[Value],
    bound: Option<u32>,
) -> CdrResult<()> {
    if let Some(bound) = bound {
        if items.len() > bound as usize {
            return Err(CdrError::Bounds {
                offset: out.position(),
                reason: format!("sequence of {} elements exceeds bound {bound}", items.len()),
            });
        }
    }

    let non_primitive = element.is_non_primitive();
    if non_primitive && out.xcdr_version() == XcdrVersion::Xcdr2 {
        let dheader_pos = out.reserve_u32();
        let start = out.position();
        write_sequence_body(out, descriptor, element, program, items)?;
        let len = (out.position() - start) as u32;
        out.patch_u32(dheader_pos, len)?;
    } else {
        write_sequence_body(out, descriptor, element, program, items)?;
    }
    Ok(())
}

fn write_sequence_body<E: Endianness>(
    out: &mut CdrOutput<E>,
    descriptor: &TypeDescriptor,
    element: &ValueType,
    program: Option<usize>,
    items: &[Value],
) -> CdrResult<()> {
    out.write_u32(items.len() as u32);
    for item in items {
        write_element(out, descriptor, element, program, item)?;
    }
    Ok(())
}

fn write_array<E: Endianness>(
    out: &mut CdrOutput<E>,
    descriptor: &TypeDescriptor,
    element: &ValueType,
    program: Option<usize>,
    items: &[Value],
) -> CdrResult<()> {
    if element.is_non_primitive() && out.xcdr_version() == XcdrVersion::Xcdr2 {
        let dheader_pos = out.reserve_u32();
        let start = out.position();
        for item in items {
            write_element(out, descriptor, element, program, item)?;
        }
        let len = (out.position() - start) as u32;
        out.patch_u32(dheader_pos, len)?;
    } else {
        for item in items {
            write_element(out, descriptor, element, program, item)?;
        }
    }
    Ok(())
}

fn write_element<E: Endianness>(
    out: &mut CdrOutput<E>,
    descriptor: &TypeDescriptor,
    element: &ValueType,
    program: Option<usize>,
    item: &Value,
) -> CdrResult<()> {
    match element {
        ValueType::Struct { .. } | ValueType::Union { .. } => {
            let idx = program.ok_or_else(|| CdrError::Invalid {
                offset: out.position(),
                reason: "complex sequence element missing its sub-program".into(),
            })?;
            write_aggregate(out, descriptor, descriptor.subprogram(idx), item)
        }
        other => write_value(out, descriptor, other, item),
    }
}

fn write_union<E: Endianness>(
    out: &mut CdrOutput<E>,
    descriptor: &TypeDescriptor,
    case_program: usize,
    discriminant: i64,
    value: &Option<Value>,
) -> CdrResult<()> {
    out.write_i32(discriminant as i32);
    let cases = descriptor.subprogram(case_program);
    let case = cases.instructions.iter().find(|i| match i {
        Instruction::Jeq { discriminant: d, .. } | Instruction::Jeq4 { discriminant: d, .. } => *d == discriminant,
        _ => false,
    });
    match (case, value) {
        (Some(Instruction::Jeq { program, .. } | Instruction::Jeq4 { program, .. }), Some(v)) => {
            write_aggregate(out, descriptor, descriptor.subprogram(*program), v)
        }
        (None, None) => Ok(()),
        _ => Err(CdrError::Invalid {
            offset: out.position(),
            reason: "union discriminant does not match a known case".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bytecode::{AdrFlags, Extensibility, Instruction, Program};
    use crate::core::cdr::LittleEndian;
    use crate::core::descriptor::TypeDescriptor;

    /// `struct { int32 x; string y; }`, matching scenario S1 of the spec
    /// this crate implements: sample `{42, "hi"}` under XCDR2 LE encodes to
    /// `2A 00 00 00  03 00 00 00  68 69 00`.
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
    fn s1_scenario_matches_expected_bytes() {
        let descriptor = s1_descriptor();
        let sample = Value::Struct(vec![Some(Value::I32(42)), Some(Value::Str("hi".into()))]);
        let bytes = write::<LittleEndian>(&descriptor, &sample, XcdrVersion::Xcdr2).unwrap();
        assert_eq!(
            bytes,
            vec![0x2A, 0x00, 0x00, 0x00, 0x03, 0x00, 0x00, 0x00, b'h', b'i', 0x00]
        );
    }

    #[test]
    fn bounded_string_write_rejects_oversize() {
        let descriptor = TypeDescriptor::new(
            "BoundedStr",
            0,
            &[
                Instruction::Adr {
                    offset: 0,
                    value_type: ValueType::BoundedStr { bound: 3 },
                    flags: AdrFlags::empty(),
                },
                Instruction::Rts,
            ],
            &[],
        );
        let sample = Value::Struct(vec![Some(Value::Str("toolong".into()))]);
        let err = write::<LittleEndian>(&descriptor, &sample, XcdrVersion::Xcdr2).unwrap_err();
        assert!(matches!(err, CdrError::Bounds { .. }));
    }

    #[test]
    fn appendable_struct_is_dheader_wrapped_under_xcdr2() {
        let program = Program::with_extensibility(
            vec![
                Instruction::Adr {
                    offset: 0,
                    value_type: ValueType::Int32,
                    flags: AdrFlags::empty(),
                },
                Instruction::Adr {
                    offset: 1,
                    value_type: ValueType::Int32,
                    flags: AdrFlags::empty(),
                },
                Instruction::Rts,
            ],
            Extensibility::Appendable,
        );
        let mut descriptor = TypeDescriptor::new("Appendable", 8, &[Instruction::Rts], &[]);
        descriptor.program = program;
        let sample = Value::Struct(vec![Some(Value::I32(1)), Some(Value::I32(2))]);
        let bytes = write::<LittleEndian>(&descriptor, &sample, XcdrVersion::Xcdr2).unwrap();
        // DHEADER(4) + two i32s(8) = 12 total, DHEADER value is 8.
        assert_eq!(bytes.len(), 12);
        assert_eq!(&bytes[0..4], &8u32.to_le_bytes());
    }

    /// `struct { int32 id; @optional int32 tag; }`, a `Final` aggregate under
    /// XCDR1 — exercises the extended-parameter-header path of §4.3 step 2
    /// for both the present and absent case.
    fn xcdr1_optional_descriptor() -> TypeDescriptor {
        use crate::core::descriptor::{MemberIdEntry, MemberIdTable};

        let mut descriptor = TypeDescriptor::new(
            "XcdrOptional",
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
            MemberIdEntry { adr_index: 1, member_id: 5 },
        ]);
        descriptor
    }

    #[test]
    fn xcdr1_optional_member_present_round_trips() {
        let descriptor = xcdr1_optional_descriptor();
        let sample = Value::Struct(vec![Some(Value::I32(1)), Some(Value::I32(99))]);
        let bytes = write::<LittleEndian>(&descriptor, &sample, XcdrVersion::Xcdr1).unwrap();
        let read_back = super::super::read::read::<LittleEndian>(&descriptor, &bytes, XcdrVersion::Xcdr1).unwrap();
        assert_eq!(read_back, sample);
    }

    #[test]
    fn xcdr1_optional_member_absent_round_trips() {
        let descriptor = xcdr1_optional_descriptor();
        let sample = Value::Struct(vec![Some(Value::I32(1)), None]);
        let bytes = write::<LittleEndian>(&descriptor, &sample, XcdrVersion::Xcdr1).unwrap();
        // No extended header at all: just the one required int32.
        assert_eq!(bytes.len(), 4);
        let read_back = super::super::read::read::<LittleEndian>(&descriptor, &bytes, XcdrVersion::Xcdr1).unwrap();
        assert_eq!(read_back, sample);
    }

    #[test]
    fn xcdr1_optional_member_size_matches_write() {
        let descriptor = xcdr1_optional_descriptor();
        for sample in [
            Value::Struct(vec![Some(Value::I32(1)), Some(Value::I32(99))]),
            Value::Struct(vec![Some(Value::I32(1)), None]),
        ] {
            let bytes = write::<LittleEndian>(&descriptor, &sample, XcdrVersion::Xcdr1).unwrap();
            let predicted = super::super::size::size(&descriptor, &sample, XcdrVersion::Xcdr1).unwrap();
            assert_eq!(bytes.len(), predicted);
        }
    }
}
