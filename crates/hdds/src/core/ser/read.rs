// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read: bytes → sample (§4.5). The mirror image of [`super::write`]: walks
//! the same bytecode in the same order, but pulls values from a
//! [`CdrInput`] instead of pushing them into a [`crate::core::cdr::CdrOutput`].
//!
//! Members not present on the wire (a missing mutable-type `PLM`, a
//! delimited aggregate whose body ends before every known member was read)
//! are left `None` rather than defaulted to a zero value — the caller
//! decides what "missing" means for its type.

use crate::core::bytecode::{AdrFlags, Extensibility, Instruction, Program, ValueType};
use crate::core::cdr::{CdrInput, Endianness, XcdrVersion};
use crate::core::descriptor::TypeDescriptor;
use crate::core::value::{Member, Value};

use super::error::{CdrError, CdrResult};
use super::pl::{decode_emheader, decode_short_parameter_header, LengthCode, PID_SENTINEL_EXTENDED, PID_SENTINEL_LIST_END};

/// Deserialize a sample from `bytes` against `descriptor`.
pub fn read<E: Endianness>(
    descriptor: &TypeDescriptor,
    bytes: &[u8],
    xcdr_version: XcdrVersion,
) -> CdrResult<Value> {
    let mut input = CdrInput::<E>::new(bytes, xcdr_version)?;
    read_aggregate(&mut input, descriptor, &descriptor.program)
}

fn read_aggregate<E: Endianness>(
    input: &mut CdrInput<E>,
    descriptor: &TypeDescriptor,
    program: &Program,
) -> CdrResult<Value> {
    match program.extensibility {
        Extensibility::Final => read_final(input, descriptor, program),
        Extensibility::Appendable => read_appendable(input, descriptor, program),
        Extensibility::Mutable => read_mutable(input, descriptor, program),
    }
}

fn read_final<E: Endianness>(
    input: &mut CdrInput<E>,
    descriptor: &TypeDescriptor,
    program: &Program,
) -> CdrResult<Value> {
    let mut members = Vec::new();
    for instr in program.members() {
        members.push(read_adr(input, descriptor, instr)?);
    }
    Ok(Value::Struct(members))
}

fn read_appendable<E: Endianness>(
    input: &mut CdrInput<E>,
    descriptor: &TypeDescriptor,
    program: &Program,
) -> CdrResult<Value> {
    if input.xcdr_version() == XcdrVersion::Xcdr1 {
        return read_final(input, descriptor, program);
    }
    let len = input.read_u32()? as usize;
    let start = input.position();
    let end = start + len;

    let mut members = Vec::new();
    for instr in program.members() {
        if input.position() >= end {
            // Known member missing from an older sender's payload.
            members.push(None);
            continue;
        }
        members.push(read_adr(input, descriptor, instr)?);
    }
    // Trailing members the reader doesn't know about: skip them.
    if input.position() > end {
        return Err(CdrError::Invalid {
            offset: input.position(),
            reason: "appendable body overran its DHEADER length".into(),
        });
    }
    input.seek(end)?;
    Ok(Value::Struct(members))
}

/// `Plm` entries of `program`, in declaration order, alongside the slot each
/// occupies in the returned `Value::Struct`'s member vector.
fn plm_entries(program: &Program) -> Vec<(u32, &Instruction)> {
    program
        .instructions
        .iter()
        .filter_map(|i| match i {
            Instruction::Plm { member_id, .. } => Some((*member_id, i)),
            _ => None,
        })
        .collect()
}

/// A member the reader's own type marks must-understand is required even
/// when it never appears on the wire at all, not only when an unknown ID
/// with the bit set is present; an older/short writer omitting it is
/// exactly the incompatible-evolution case the flag exists to catch.
fn check_missing_must_understand(
    descriptor: &TypeDescriptor,
    plms: &[(u32, &Instruction)],
    members: &[Member],
    offset: usize,
) -> CdrResult<()> {
    for (slot, (member_id, plm)) in plms.iter().enumerate() {
        if members[slot].is_some() {
            continue;
        }
        let Instruction::Plm { program: sub_idx, .. } = plm else {
            unreachable!("filter guarantees Plm");
        };
        let sub = descriptor.subprogram(*sub_idx);
        if let Some(Instruction::Adr { flags, .. }) = sub.instructions.first() {
            if flags.contains(AdrFlags::MUST_UNDERSTAND) {
                return Err(CdrError::Invalid {
                    offset,
                    reason: format!("must-understand member {member_id} absent from wire"),
                });
            }
        }
    }
    Ok(())
}

fn read_mutable<E: Endianness>(
    input: &mut CdrInput<E>,
    descriptor: &TypeDescriptor,
    program: &Program,
) -> CdrResult<Value> {
    if input.xcdr_version() == XcdrVersion::Xcdr1 {
        return read_mutable_xcdr1(input, descriptor, program);
    }

    let len = input.read_u32()? as usize;
    let start = input.position();
    let end = start + len;

    let plms = plm_entries(program);
    let mut members: Vec<Member> = vec![None; plms.len()];

    while input.position() < end {
        let (member_id, lc, must_understand) = decode_emheader(input.read_u32()?);
        let found = plms.iter().position(|(id, _)| *id == member_id);
        match found {
            Some(slot) => {
                let Instruction::Plm { program: sub_idx, .. } = plms[slot].1 else {
                    unreachable!("filter guarantees Plm");
                };
                let sub = descriptor.subprogram(*sub_idx);
                let Some(Instruction::Adr { value_type, .. }) = sub.instructions.first() else {
                    return Err(CdrError::Invalid {
                        offset: input.position(),
                        reason: "PLM sub-program must start with an ADR".into(),
                    });
                };
                members[slot] = Some(read_value(input, descriptor, value_type)?);
            }
            None => {
                if must_understand {
                    return Err(CdrError::Invalid {
                        offset: input.position(),
                        reason: format!("unknown must-understand member {member_id}"),
                    });
                }
                skip_by_length_code(input, lc)?;
            }
        }
    }
    input.seek(end)?;

    check_missing_must_understand(descriptor, &plms, &members, end)?;
    Ok(Value::Struct(members))
}

/// §4.2/§4.3: XCDR1 mutable types are framed with PID parameter headers
/// (short or extended form) terminated by the `0x3F01` list-end sentinel,
/// the mirror of [`super::write::write_mutable_xcdr1`].
fn read_mutable_xcdr1<E: Endianness>(
    input: &mut CdrInput<E>,
    descriptor: &TypeDescriptor,
    program: &Program,
) -> CdrResult<Value> {
    let plms = plm_entries(program);
    let mut members: Vec<Member> = vec![None; plms.len()];

    loop {
        input.align_for_primitive(4)?;
        let short_word = input.read_u16()?;
        let (short_id, must_understand, _impl_extension) = decode_short_parameter_header(short_word);

        if short_id == PID_SENTINEL_LIST_END {
            let _ = input.read_u16()?; // unused trailing word
            break;
        }

        let member_id = if short_id == PID_SENTINEL_EXTENDED {
            let _trailer_len = input.read_u16()?;
            input.read_u32()?
        } else {
            u32::from(short_id)
        };
        let declared_len = if short_id == PID_SENTINEL_EXTENDED {
            input.read_u32()? as usize
        } else {
            input.read_u16()? as usize
        };

        let found = plms.iter().position(|(id, _)| *id == member_id);
        match found {
            Some(slot) => {
                let Instruction::Plm { program: sub_idx, .. } = plms[slot].1 else {
                    unreachable!("filter guarantees Plm");
                };
                let sub = descriptor.subprogram(*sub_idx);
                let Some(Instruction::Adr { value_type, .. }) = sub.instructions.first() else {
                    return Err(CdrError::Invalid {
                        offset: input.position(),
                        reason: "PLM sub-program must start with an ADR".into(),
                    });
                };
                let prev_origin = input.set_align_origin(input.position());
                let start = input.position();
                let value = read_value(input, descriptor, value_type)?;
                input.set_align_origin(prev_origin);
                let consumed = input.position() - start;
                if consumed > declared_len {
                    return Err(CdrError::Invalid {
                        offset: input.position(),
                        reason: "parameter value overran its declared length".into(),
                    });
                }
                input.seek(start + declared_len)?;
                members[slot] = Some(value);
            }
            None => {
                if must_understand {
                    return Err(CdrError::Invalid {
                        offset: input.position(),
                        reason: format!("unknown must-understand member {member_id}"),
                    });
                }
                input.read_bytes(declared_len)?;
            }
        }
    }

    let offset = input.position();
    check_missing_must_understand(descriptor, &plms, &members, offset)?;
    Ok(Value::Struct(members))
}

fn skip_by_length_code<E: Endianness>(input: &mut CdrInput<E>, lc: LengthCode) -> CdrResult<()> {
    let skip_len = match lc {
        LengthCode::Lc1 => 1,
        LengthCode::Lc2 => 2,
        LengthCode::Lc4 => 4,
        LengthCode::Lc8 => 8,
        LengthCode::NextIntBytes => input.read_u32()? as usize,
        LengthCode::NextIntLenUnits1 => input.read_u32()? as usize,
        LengthCode::NextIntLenUnits4 => input.read_u32()? as usize * 4,
        LengthCode::NextIntLenUnits8 => input.read_u32()? as usize * 8,
    };
    input.read_bytes(skip_len)?;
    Ok(())
}

fn read_adr<E: Endianness>(
    input: &mut CdrInput<E>,
    descriptor: &TypeDescriptor,
    instr: &Instruction,
) -> CdrResult<Member> {
    let Instruction::Adr { offset, value_type, flags } = instr else {
        return Err(CdrError::Invalid {
            offset: input.position(),
            reason: "expected an ADR instruction".into(),
        });
    };

    if flags.contains(AdrFlags::OPTIONAL) {
        if input.xcdr_version() == XcdrVersion::Xcdr1 {
            read_xcdr1_optional_member(input, descriptor, *offset, value_type)
        } else if input.read_bool()? {
            Ok(Some(read_value(input, descriptor, value_type)?))
        } else {
            Ok(None)
        }
    } else {
        Ok(Some(read_value(input, descriptor, value_type)?))
    }
}

/// Mirror of [`super::write::write_xcdr1_optional_member`]: the member is
/// present iff an extended parameter header naming this declared position's
/// member-ID immediately follows. A header present but addressed to a
/// different (later) optional member leaves the cursor untouched so that
/// field's own `read_adr` call parses it instead (§4.3 step 2 / §4.2).
fn read_xcdr1_optional_member<E: Endianness>(
    input: &mut CdrInput<E>,
    descriptor: &TypeDescriptor,
    adr_index: u32,
    value_type: &ValueType,
) -> CdrResult<Member> {
    let Some(expected_member_id) = descriptor.member_id_table.member_id_for_adr_index(adr_index) else {
        return Err(CdrError::Invalid {
            offset: input.position(),
            reason: "optional member has no member-ID table entry".into(),
        });
    };

    // Absence means nothing at all was written, which at the last optional
    // field of a type may mean there is no more buffer left to read at all
    // — a short read while probing for the header is "absent", not a hard
    // failure, exactly like a header present but addressed elsewhere.
    let checkpoint = input.position();
    let present = try_read_extended_header_for(input, expected_member_id).unwrap_or(false);
    if !present {
        input.seek(checkpoint)?;
        return Ok(None);
    }

    let declared_len = input.read_u32()? as usize;
    let prev_origin = input.set_align_origin(input.position());
    let start = input.position();
    let value = read_value(input, descriptor, value_type)?;
    input.set_align_origin(prev_origin);
    let consumed = input.position() - start;
    if consumed != declared_len {
        return Err(CdrError::Invalid {
            offset: input.position(),
            reason: "optional member value length did not match its declared length".into(),
        });
    }
    Ok(Some(value))
}

/// Attempt to parse an extended parameter header (short sentinel word,
/// trailer-length word, full member-ID word) at the current position.
/// Returns `true` (cursor left just past the header, at the length word)
/// only when a well-formed extended header addressed to `expected_member_id`
/// was found; otherwise the cursor is left wherever parsing stopped — the
/// caller always rolls back to its own checkpoint on `false`.
fn try_read_extended_header_for<E: Endianness>(input: &mut CdrInput<E>, expected_member_id: u32) -> CdrResult<bool> {
    input.align_for_primitive(4)?;
    let short_word = input.read_u16()?;
    if short_word & 0x3FFF != PID_SENTINEL_EXTENDED {
        return Ok(false);
    }
    let _trailer_len = input.read_u16()?;
    let member_id = input.read_u32()?;
    Ok(member_id == expected_member_id)
}

fn read_value<E: Endianness>(
    input: &mut CdrInput<E>,
    descriptor: &TypeDescriptor,
    value_type: &ValueType,
) -> CdrResult<Value> {
    Ok(match value_type {
        ValueType::Bool => Value::Bool(input.read_bool()?),
        ValueType::Int8 => Value::I8(input.read_u8()? as i8),
        ValueType::UInt8 => Value::U8(input.read_u8()?),
        ValueType::Int16 => Value::I16(input.read_i16()?),
        ValueType::UInt16 => Value::U16(input.read_u16()?),
        ValueType::WChar => Value::WChar(input.read_u16()?),
        ValueType::Int32 => Value::I32(input.read_i32()?),
        ValueType::UInt32 => Value::U32(input.read_u32()?),
        ValueType::Float32 => Value::F32(input.read_f32()?),
        ValueType::Int64 => Value::I64(input.read_i64()?),
        ValueType::UInt64 => Value::U64(input.read_u64()?),
        ValueType::Float64 => Value::F64(input.read_f64()?),
        ValueType::Enum { width, max } => {
            let v = read_sized_int(input, *width)? as i32;
            if v < 0 || (v as u32) > *max {
                return Err(CdrError::Invalid {
                    offset: input.position(),
                    reason: format!("enum value {v} exceeds declared max {max}"),
                });
            }
            Value::Enum(v)
        }
        ValueType::Bitmask { width, valid_bits } => {
            let v = read_sized_int(input, *width)?;
            if v & !*valid_bits != 0 {
                return Err(CdrError::Invalid {
                    offset: input.position(),
                    reason: "bitmask sets a bit outside the valid-bits mask".into(),
                });
            }
            Value::Bitmask(v)
        }
        ValueType::Str => Value::Str(read_string(input)?),
        ValueType::BoundedStr { bound } => {
            let s = read_string(input)?;
            if s.len() > *bound as usize {
                return Err(CdrError::Bounds {
                    offset: input.position(),
                    reason: format!("string of {} bytes exceeds bound {bound}", s.len()),
                });
            }
            Value::Str(s)
        }
        ValueType::WStr => Value::WStr(read_wstring(input)?),
        ValueType::BoundedWStr { bound } => {
            let s = read_wstring(input)?;
            if s.encode_utf16().count() > *bound as usize {
                return Err(CdrError::Bounds {
                    offset: input.position(),
                    reason: "wide string exceeds declared bound".into(),
                });
            }
            Value::WStr(s)
        }
        ValueType::Sequence { element, program } => {
            Value::Sequence(read_sequence(input, descriptor, element, *program, None)?)
        }
        ValueType::BoundedSequence { element, bound, program } => {
            Value::Sequence(read_sequence(input, descriptor, element, *program, Some(*bound))?)
        }
        ValueType::Array { element, count, program } => {
            Value::Array(read_array(input, descriptor, element, *count, *program)?)
        }
        ValueType::Struct { program } => read_aggregate(input, descriptor, descriptor.subprogram(*program))?,
        ValueType::Union { program } => read_union(input, descriptor, *program)?,
        ValueType::External { program, .. } => {
            Value::External(Box::new(Some(read_aggregate(input, descriptor, descriptor.subprogram(*program))?)))
        }
    })
}

fn read_sized_int<E: Endianness>(input: &mut CdrInput<E>, width: u8) -> CdrResult<u64> {
    Ok(match width {
        1 => input.read_u8()? as u64,
        2 => input.read_u16()? as u64,
        4 => input.read_u32()? as u64,
        8 => input.read_u64()?,
        _ => unreachable!("programmer error: enum/bitmask width must be 1, 2, 4 or 8"),
    })
}

fn read_string<E: Endianness>(input: &mut CdrInput<E>) -> CdrResult<String> {
    let len = input.read_u32()? as usize;
    if len == 0 {
        return Err(CdrError::Invalid {
            offset: input.position(),
            reason: "string length must include the NUL terminator".into(),
        });
    }
    let bytes = input.read_bytes(len)?;
    let (body, nul) = bytes.split_at(len - 1);
    if nul != [0] {
        return Err(CdrError::Invalid {
            offset: input.position(),
            reason: "string is not NUL-terminated".into(),
        });
    }
    String::from_utf8(body.to_vec()).map_err(|_| CdrError::Invalid {
        offset: input.position(),
        reason: "string is not valid UTF-8".into(),
    })
}

fn read_wstring<E: Endianness>(input: &mut CdrInput<E>) -> CdrResult<String> {
    let byte_len = input.read_u32()? as usize;
    if byte_len % 2 != 0 {
        return Err(CdrError::Invalid {
            offset: input.position(),
            reason: "wide string byte length must be even".into(),
        });
    }
    let bytes = input.read_bytes(byte_len)?;
    // Wide-string code units are stored byte-swapped with the rest of the
    // stream's endianness, consistent with every other multi-byte leaf.
    let units: Vec<u16> = bytes
        .chunks_exact(2)
        .map(|pair| E::read_u16(pair))
        .collect();
    String::from_utf16(&units).map_err(|_| CdrError::Invalid {
        offset: input.position(),
        reason: "wide string is not valid UTF-16 (malformed surrogate pair)".into(),
    })
}

fn read_sequence<E: Endianness>(
    input: &mut CdrInput<E>,
    descriptor: &TypeDescriptor,
    element: &ValueType,
    program: Option<usize>,
    bound: Option<u32>,
) -> CdrResult<Vec<Value>> {
    let non_primitive = element.is_non_primitive();
    if non_primitive && input.xcdr_version() == XcdrVersion::Xcdr2 {
        let len = input.read_u32()? as usize;
        let start = input.position();
        let end = start + len;
        let items = read_sequence_body(input, descriptor, element, program, bound)?;
        input.seek(end)?;
        Ok(items)
    } else {
        read_sequence_body(input, descriptor, element, program, bound)
    }
}

fn read_sequence_body<E: Endianness>(
    input: &mut CdrInput<E>,
    descriptor: &TypeDescriptor,
    element: &ValueType,
    program: Option<usize>,
    bound: Option<u32>,
) -> CdrResult<Vec<Value>> {
    let count = input.read_u32()? as usize;
    if let Some(bound) = bound {
        if count > bound as usize {
            return Err(CdrError::Bounds {
                offset: input.position(),
                reason: format!("sequence of {count} elements exceeds bound {bound}"),
            });
        }
    }
    let mut items = Vec::with_capacity(count.min(1 << 16));
    for _ in 0..count {
        items.push(read_element(input, descriptor, element, program)?);
    }
    Ok(items)
}

fn read_array<E: Endianness>(
    input: &mut CdrInput<E>,
    descriptor: &TypeDescriptor,
    element: &ValueType,
    count: u32,
    program: Option<usize>,
) -> CdrResult<Vec<Value>> {
    if element.is_non_primitive() && input.xcdr_version() == XcdrVersion::Xcdr2 {
        let len = input.read_u32()? as usize;
        let start = input.position();
        let end = start + len;
        let mut items = Vec::with_capacity(count as usize);
        for _ in 0..count {
            items.push(read_element(input, descriptor, element, program)?);
        }
        input.seek(end)?;
        Ok(items)
    } else {
        let mut items = Vec::with_capacity(count as usize);
        for _ in 0..count {
            items.push(read_element(input, descriptor, element, program)?);
        }
        Ok(items)
    }
}

fn read_element<E: Endianness>(
    input: &mut CdrInput<E>,
    descriptor: &TypeDescriptor,
    element: &ValueType,
    program: Option<usize>,
) -> CdrResult<Value> {
    match element {
        ValueType::Struct { .. } | ValueType::Union { .. } => {
            let idx = program.ok_or_else(|| CdrError::Invalid {
                offset: input.position(),
                reason: "complex sequence element missing its sub-program".into(),
            })?;
            read_aggregate(input, descriptor, descriptor.subprogram(idx))
        }
        other => read_value(input, descriptor, other),
    }
}

fn read_union<E: Endianness>(
    input: &mut CdrInput<E>,
    descriptor: &TypeDescriptor,
    case_program: usize,
) -> CdrResult<Value> {
    let discriminant = input.read_i32()? as i64;
    let cases = descriptor.subprogram(case_program);
    let case = cases.instructions.iter().find(|i| match i {
        Instruction::Jeq { discriminant: d, .. } | Instruction::Jeq4 { discriminant: d, .. } => *d == discriminant,
        _ => false,
    });
    let value = match case {
        Some(Instruction::Jeq { program, .. } | Instruction::Jeq4 { program, .. }) => {
            Some(read_aggregate(input, descriptor, descriptor.subprogram(*program))?)
        }
        _ => None,
    };
    Ok(Value::Union {
        discriminant,
        value: Box::new(value),
    })
}
