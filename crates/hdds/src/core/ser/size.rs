// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Size: compute a sample's encoded length without writing it (§4.7).
//!
//! Mirrors [`super::write`]'s alignment and framing arithmetic exactly, but
//! against a running byte counter instead of a buffer — used by transports
//! that need to allocate the wire buffer before calling `write`.

use crate::core::bytecode::{AdrFlags, Extensibility, Instruction, Program, ValueType};
use crate::core::cdr::XcdrVersion;
use crate::core::descriptor::TypeDescriptor;
use crate::core::value::Value;

use super::error::{CdrError, CdrResult};
use super::pl::short_parameter_header;

/// Running write position, tracked the same way [`crate::core::cdr::CdrOutput`]
/// tracks it, without owning a buffer.
struct SizeCounter {
    position: usize,
    align_origin: usize,
    xcdr_version: XcdrVersion,
}

impl SizeCounter {
    fn align_for_primitive(&mut self, size: usize) {
        let alignment = self.xcdr_version.alignment_for(size);
        if alignment <= 1 {
            return;
        }
        let relative = self.position.saturating_sub(self.align_origin);
        let aligned = (relative + alignment - 1) & !(alignment - 1);
        self.position += aligned - relative;
    }

    fn add_bool(&mut self) {
        self.position += 1;
    }
    fn add_u8(&mut self) {
        self.position += 1;
    }
    fn add_u16(&mut self) {
        self.align_for_primitive(2);
        self.position += 2;
    }
    fn add_u32(&mut self) {
        self.align_for_primitive(4);
        self.position += 4;
    }
    fn add_u64(&mut self) {
        self.align_for_primitive(8);
        self.position += 8;
    }
    fn add_sized(&mut self, width: u8) {
        match width {
            1 => self.add_u8(),
            2 => self.add_u16(),
            4 => self.add_u32(),
            8 => self.add_u64(),
            _ => unreachable!("programmer error: enum/bitmask width must be 1, 2, 4 or 8"),
        }
    }
    fn add_bytes(&mut self, n: usize) {
        self.position += n;
    }
}

/// Compute the encoded size in bytes of `sample` against `descriptor`.
pub fn size(descriptor: &TypeDescriptor, sample: &Value, xcdr_version: XcdrVersion) -> CdrResult<usize> {
    let mut counter = SizeCounter {
        position: 0,
        align_origin: 0,
        xcdr_version,
    };
    size_aggregate(&mut counter, descriptor, &descriptor.program, sample)?;
    Ok(counter.position)
}

/// Size of a single value in isolation, measured from a fresh origin.
/// Used by [`super::write`]'s XCDR1 `PLC` encoder to decide ahead of time
/// whether a member's length fits the short parameter header's 16-bit
/// length field before committing to that form.
pub(crate) fn size_of_value(
    descriptor: &TypeDescriptor,
    value_type: &ValueType,
    value: &Value,
    xcdr_version: XcdrVersion,
) -> CdrResult<usize> {
    let mut counter = SizeCounter {
        position: 0,
        align_origin: 0,
        xcdr_version,
    };
    size_value(&mut counter, descriptor, value_type, value)?;
    Ok(counter.position)
}

fn size_aggregate(
    counter: &mut SizeCounter,
    descriptor: &TypeDescriptor,
    program: &Program,
    sample: &Value,
) -> CdrResult<()> {
    let members = sample.as_struct().ok_or_else(|| CdrError::Invalid {
        offset: counter.position,
        reason: "expected a struct-shaped sample".into(),
    })?;

    match program.extensibility {
        Extensibility::Final => size_final(counter, descriptor, program, members),
        Extensibility::Appendable => {
            if counter.xcdr_version == XcdrVersion::Xcdr1 {
                size_final(counter, descriptor, program, members)
            } else {
                counter.add_u32(); // DHEADER
                size_final(counter, descriptor, program, members)
            }
        }
        Extensibility::Mutable => size_mutable(counter, descriptor, program, members),
    }
}

fn size_final(
    counter: &mut SizeCounter,
    descriptor: &TypeDescriptor,
    program: &Program,
    members: &[Option<Value>],
) -> CdrResult<()> {
    for (instr, member) in program.members().zip(members.iter()) {
        let Instruction::Adr { value_type, flags, .. } = instr else {
            continue;
        };
        if flags.contains(AdrFlags::OPTIONAL) {
            if counter.xcdr_version == XcdrVersion::Xcdr1 {
                // §4.3 step 2: extended parameter header (2+2+4+4 bytes) + value, or nothing when absent.
                if let Some(value) = member {
                    counter.align_for_primitive(4);
                    counter.add_u16();
                    counter.add_u16();
                    counter.add_u32();
                    counter.add_u32();
                    size_value(counter, descriptor, value_type, value)?;
                }
            } else {
                counter.add_bool();
                if let Some(value) = member {
                    size_value(counter, descriptor, value_type, value)?;
                }
            }
        } else if let Some(value) = member {
            size_value(counter, descriptor, value_type, value)?;
        }
    }
    Ok(())
}

fn size_mutable(
    counter: &mut SizeCounter,
    descriptor: &TypeDescriptor,
    program: &Program,
    members: &[Option<Value>],
) -> CdrResult<()> {
    if counter.xcdr_version == XcdrVersion::Xcdr1 {
        return size_mutable_xcdr1(counter, descriptor, program, members);
    }

    counter.add_u32(); // DHEADER
    for (instr, member) in program.instructions.iter().zip(members.iter()) {
        let Instruction::Plm { program: sub_idx, .. } = instr else {
            continue;
        };
        let Some(value) = member else { continue };
        let sub = descriptor.subprogram(*sub_idx);
        let Some(Instruction::Adr { value_type, .. }) = sub.instructions.first() else {
            return Err(CdrError::Invalid {
                offset: counter.position,
                reason: "PLM sub-program must start with an ADR".into(),
            });
        };
        counter.add_u32(); // EMHEADER
        match value_type.primitive_size() {
            Some(_) => size_value(counter, descriptor, value_type, value)?,
            None => {
                counter.add_u32(); // NEXTINT
                size_value(counter, descriptor, value_type, value)?;
            }
        }
    }
    Ok(())
}

/// §4.2/§4.3: XCDR1 mutable types use PID parameter headers (short form when
/// the member-ID fits 14 bits and the value's length fits 16 bits, extended
/// form otherwise) terminated by the `0x3F01` list-end sentinel, not the
/// DHEADER+EMHEADER framing XCDR2 uses.
fn size_mutable_xcdr1(
    counter: &mut SizeCounter,
    descriptor: &TypeDescriptor,
    program: &Program,
    members: &[Option<Value>],
) -> CdrResult<()> {
    for (instr, member) in program.instructions.iter().zip(members.iter()) {
        let Instruction::Plm {
            program: sub_idx,
            member_id,
            ..
        } = instr
        else {
            continue;
        };
        let Some(value) = member else { continue };
        let sub = descriptor.subprogram(*sub_idx);
        let Some(Instruction::Adr { value_type, flags, .. }) = sub.instructions.first() else {
            return Err(CdrError::Invalid {
                offset: counter.position,
                reason: "PLM sub-program must start with an ADR".into(),
            });
        };

        counter.align_for_primitive(4);
        let must_understand = flags.contains(AdrFlags::MUST_UNDERSTAND);
        let predicted_len = size_of_value(descriptor, value_type, value, XcdrVersion::Xcdr1)?;
        match short_parameter_header(*member_id, must_understand).filter(|_| predicted_len <= u16::MAX as usize) {
            Some(_) => {
                counter.add_u16(); // short PID header
                counter.add_u16(); // length
            }
            None => {
                counter.add_u16(); // extended-form sentinel word
                counter.add_u16(); // trailer length word
                counter.add_u32(); // full member-ID
                counter.add_u32(); // length
            }
        }
        size_value(counter, descriptor, value_type, value)?;
    }
    counter.align_for_primitive(4);
    counter.add_u16(); // PID_SENTINEL_LIST_END
    counter.add_u16(); // unused trailing word
    Ok(())
}

fn size_value(
    counter: &mut SizeCounter,
    descriptor: &TypeDescriptor,
    value_type: &ValueType,
    value: &Value,
) -> CdrResult<()> {
    match (value_type, value) {
        (ValueType::Bool, _) => counter.add_bool(),
        (ValueType::Int8 | ValueType::UInt8, _) => counter.add_u8(),
        (ValueType::Int16 | ValueType::UInt16 | ValueType::WChar, _) => counter.add_u16(),
        (ValueType::Int32 | ValueType::UInt32 | ValueType::Float32, _) => counter.add_u32(),
        (ValueType::Int64 | ValueType::UInt64 | ValueType::Float64, _) => counter.add_u64(),
        (ValueType::Enum { width, .. }, _) => counter.add_sized(*width),
        (ValueType::Bitmask { width, .. }, _) => counter.add_sized(*width),
        (ValueType::Str | ValueType::BoundedStr { .. }, Value::Str(s)) => {
            counter.add_u32();
            counter.add_bytes(s.len() + 1);
        }
        (ValueType::WStr | ValueType::BoundedWStr { .. }, Value::WStr(s)) => {
            counter.add_u32();
            counter.add_bytes(s.encode_utf16().count() * 2);
        }
        (ValueType::Sequence { element, program } | ValueType::BoundedSequence { element, program, .. }, Value::Sequence(items)) => {
            size_sequence(counter, descriptor, element, *program, items)?;
        }
        (ValueType::Array { element, program, .. }, Value::Array(items)) => {
            size_sequence_elements(counter, descriptor, element, *program, items)?;
        }
        (ValueType::Struct { program }, _) => {
            size_aggregate(counter, descriptor, descriptor.subprogram(*program), value)?;
        }
        (ValueType::Union { program }, Value::Union { .. }) => {
            size_union(counter, descriptor, *program, value)?;
        }
        (ValueType::External { program, .. }, Value::External(inner)) => match inner.as_ref() {
            Some(v) => size_aggregate(counter, descriptor, descriptor.subprogram(*program), v)?,
            None => {
                return Err(CdrError::Invalid {
                    offset: counter.position,
                    reason: "external member is null".into(),
                })
            }
        },
        _ => {
            return Err(CdrError::Invalid {
                offset: counter.position,
                reason: "sample value does not match descriptor value type".into(),
            })
        }
    }
    Ok(())
}

fn size_sequence(
    counter: &mut SizeCounter,
    descriptor: &TypeDescriptor,
    element: &ValueType,
    program: Option<usize>,
    items: &[Value],
) -> CdrResult<()> {
    if element.is_non_primitive() && counter.xcdr_version == XcdrVersion::Xcdr2 {
        counter.add_u32(); // DHEADER
    }
    counter.add_u32(); // element count
    size_sequence_elements(counter, descriptor, element, program, items)
}

fn size_sequence_elements(
    counter: &mut SizeCounter,
    descriptor: &TypeDescriptor,
    element: &ValueType,
    program: Option<usize>,
    items: &[Value],
) -> CdrResult<()> {
    for item in items {
        match element {
            ValueType::Struct { .. } | ValueType::Union { .. } => {
                let idx = program.ok_or_else(|| CdrError::Invalid {
                    offset: counter.position,
                    reason: "complex sequence element missing its sub-program".into(),
                })?;
                size_aggregate(counter, descriptor, descriptor.subprogram(idx), item)?;
            }
            other => size_value(counter, descriptor, other, item)?,
        }
    }
    Ok(())
}

fn size_union(counter: &mut SizeCounter, descriptor: &TypeDescriptor, case_program: usize, value: &Value) -> CdrResult<()> {
    let Value::Union { discriminant, value } = value else {
        return Err(CdrError::Invalid {
            offset: counter.position,
            reason: "expected a union value".into(),
        });
    };
    counter.add_u32();
    let cases = descriptor.subprogram(case_program);
    let case = cases.instructions.iter().find(|i| match i {
        Instruction::Jeq { discriminant: d, .. } | Instruction::Jeq4 { discriminant: d, .. } => d == discriminant,
        _ => false,
    });
    match (case, value.as_ref()) {
        (Some(Instruction::Jeq { program, .. } | Instruction::Jeq4 { program, .. }), Some(v)) => {
            size_aggregate(counter, descriptor, descriptor.subprogram(*program), v)
        }
        (None, None) => Ok(()),
        _ => Err(CdrError::Invalid {
            offset: counter.position,
            reason: "union discriminant does not match a known case".into(),
        }),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bytecode::{AdrFlags, Instruction};
    use crate::core::descriptor::TypeDescriptor;

    #[test]
    fn matches_write_for_s1_scenario() {
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
        assert_eq!(size(&descriptor, &sample, XcdrVersion::Xcdr2).unwrap(), 11);
    }
}
