// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Key: extract key-field bytes and compute the RTPS keyhash (§4.6).
//!
//! [`crate::core::descriptor::TypeDescriptor::key_offsets`] addresses each
//! key field by its declaration-order index into the *top-level* program,
//! which [`Instruction::Plm`] preserves for appendable/mutable aggregates
//! just as [`Instruction::Adr`] does for final ones — so the same walk
//! extracts a key whether it sits directly in a final struct or behind a
//! `PLM` in an appendable/mutable one (§4.6's read-then-reserialize slow
//! path), only reaching into the member's own sub-program to find the `ADR`
//! that actually describes its `ValueType`.
//!
//! The one case this crate genuinely cannot resolve from a declaration-order
//! index is a key that is itself a sequence or non-primitive array: §4.6's
//! keyhash member-ID ordering has no defined meaning for elements inside
//! such a member, so [`TopicFlags::requires_slow_key_path`]'s sequence/array
//! bits are rejected with [`CdrError::Invalid`] rather than silently
//! extracting the wrong bytes. Callers whose key has this shape must compute
//! it by hand.
//!
//! [`TopicFlags::requires_slow_key_path`]: crate::core::descriptor::TopicFlags::requires_slow_key_path
//!
//! The keyhash is always big-endian (§4.6), independent of the sample's own
//! wire byte order.

use crate::core::bytecode::{AdrFlags, Instruction};
use crate::core::cdr::{BigEndian, CdrOutput, XcdrVersion};
use crate::core::descriptor::{TopicFlags, TypeDescriptor};
use crate::core::value::{KeyFields, Value};

use super::error::{CdrError, CdrResult};
use super::write::write_value;

/// Extract `descriptor`'s key fields from `sample`, keyed by member-ID.
pub fn key(descriptor: &TypeDescriptor, sample: &Value) -> CdrResult<KeyFields> {
    if descriptor.flags.contains(TopicFlags::KEY_CONTAINS_SEQUENCE)
        || descriptor.flags.contains(TopicFlags::KEY_CONTAINS_NON_PRIMITIVE_ARRAY)
    {
        return Err(CdrError::Invalid {
            offset: 0,
            reason: "key field is itself a sequence or non-primitive array; keyhash member-ID ordering \
                     is not defined for its elements"
                .into(),
        });
    }

    let members = sample.as_struct().ok_or_else(|| CdrError::Invalid {
        offset: 0,
        reason: "expected a struct-shaped sample".into(),
    })?;

    let mut fields = KeyFields::new();
    for key_member in &descriptor.key_offsets {
        let instr = descriptor
            .program
            .members()
            .nth(key_member.declaration_index as usize)
            .ok_or_else(|| CdrError::Invalid {
                offset: 0,
                reason: "key_offsets references a member past the end of the program".into(),
            })?;
        let value_type = match instr {
            Instruction::Adr { value_type, .. } => value_type,
            // §4.6 slow path: the key lives behind a PLM in an appendable or
            // mutable aggregate. `sample` is already a decoded `Value` tree,
            // so there's nothing to re-decode — just follow the PLM to the
            // sub-program's own ADR to learn the field's ValueType.
            Instruction::Plm { program: sub_idx, .. } => {
                let sub = descriptor.subprogram(*sub_idx);
                let Some(Instruction::Adr { value_type, .. }) = sub.instructions.first() else {
                    return Err(CdrError::Invalid {
                        offset: 0,
                        reason: "PLM sub-program must start with an ADR".into(),
                    });
                };
                value_type
            }
            _ => continue,
        };
        let value = members
            .get(key_member.declaration_index as usize)
            .and_then(|m| m.as_ref())
            .ok_or_else(|| CdrError::Invalid {
                offset: 0,
                reason: "key member is absent from the sample".into(),
            })?;

        let mut out = CdrOutput::<BigEndian>::new(XcdrVersion::Xcdr2);
        write_value(&mut out, descriptor, value_type, value)?;
        fields.insert(key_member.member_id, out.into_bytes());
    }
    Ok(fields)
}

/// Compute the 16-byte RTPS keyhash parameter: the key fields concatenated
/// in member-ID order, big-endian, zero-padded to 16 bytes when the
/// serialized key is no longer than that — or, when it is longer, the MD5
/// digest of the serialized key (DDSI-RTPS §9.6.3.3's "the key does not fit"
/// case; `xtypes` feature, matching this crate's existing `md-5` dependency
/// for XTypes equivalence hashing).
pub fn keyhash(descriptor: &TypeDescriptor, sample: &Value) -> CdrResult<[u8; 16]> {
    let serialized = key(descriptor, sample)?.concat_by_member_id();
    Ok(keyhash_from_serialized_key(&serialized))
}

#[cfg(feature = "xtypes")]
fn keyhash_from_serialized_key(serialized: &[u8]) -> [u8; 16] {
    if serialized.len() <= 16 {
        let mut out = [0u8; 16];
        out[..serialized.len()].copy_from_slice(serialized);
        out
    } else {
        use md5::{Digest, Md5};
        let mut hasher = Md5::new();
        hasher.update(serialized);
        hasher.finalize().into()
    }
}

#[cfg(not(feature = "xtypes"))]
fn keyhash_from_serialized_key(serialized: &[u8]) -> [u8; 16] {
    let mut out = [0u8; 16];
    let n = serialized.len().min(16);
    out[..n].copy_from_slice(&serialized[..n]);
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bytecode::ValueType;
    use crate::core::descriptor::{KeyMember, TopicFlags};

    fn keyed_descriptor() -> TypeDescriptor {
        let mut d = TypeDescriptor::new(
            "Keyed",
            8,
            &[
                Instruction::Adr {
                    offset: 0,
                    value_type: ValueType::Int32,
                    flags: AdrFlags::KEY,
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
        d.flags = TopicFlags::KEY;
        d.key_offsets = vec![KeyMember {
            declaration_index: 0,
            member_id: 0,
        }];
        d
    }

    #[test]
    fn fast_path_extracts_only_key_members() {
        let descriptor = keyed_descriptor();
        let sample = Value::Struct(vec![Some(Value::I32(7)), Some(Value::Str("ignored".into()))]);
        let fields = key(&descriptor, &sample).unwrap();
        assert_eq!(fields.0.len(), 1);
        assert_eq!(fields.0[&0], vec![0x00, 0x00, 0x00, 0x07]);
    }

    #[test]
    fn keyhash_is_big_endian_regardless_of_sample_encoding() {
        let descriptor = keyed_descriptor();
        let sample = Value::Struct(vec![Some(Value::I32(1)), Some(Value::Str("x".into()))]);
        let mut expected = [0u8; 16];
        expected[..4].copy_from_slice(&[0x00, 0x00, 0x00, 0x01]);
        assert_eq!(keyhash(&descriptor, &sample).unwrap(), expected);
    }

    #[test]
    fn key_nested_in_mutable_aggregate_is_extracted() {
        use crate::core::bytecode::{Extensibility, Program};

        let sub_x = Program::new(vec![
            Instruction::Adr {
                offset: 0,
                value_type: ValueType::Int32,
                flags: AdrFlags::KEY,
            },
            Instruction::Rts,
        ]);
        let sub_y = Program::new(vec![
            Instruction::Adr {
                offset: 1,
                value_type: ValueType::Str,
                flags: AdrFlags::empty(),
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
        descriptor.flags = TopicFlags::KEY.with(TopicFlags::KEY_IN_MUTABLE);
        descriptor.key_offsets = vec![KeyMember {
            declaration_index: 0,
            member_id: 17,
        }];

        let sample = Value::Struct(vec![Some(Value::I32(7)), Some(Value::Str("ignored".into()))]);
        let fields = key(&descriptor, &sample).unwrap();
        assert_eq!(fields.0.len(), 1);
        assert_eq!(fields.0[&17], vec![0x00, 0x00, 0x00, 0x07]);
    }

    #[test]
    fn key_containing_sequence_is_rejected_rather_than_silently_wrong() {
        let mut descriptor = keyed_descriptor();
        descriptor.flags = TopicFlags::KEY.with(TopicFlags::KEY_CONTAINS_SEQUENCE);
        let sample = Value::Struct(vec![Some(Value::I32(7)), Some(Value::Str("ignored".into()))]);
        assert!(key(&descriptor, &sample).is_err());
        assert!(keyhash(&descriptor, &sample).is_err());
    }

    #[test]
    fn keyhash_digests_keys_longer_than_16_bytes() {
        let mut descriptor = TypeDescriptor::new(
            "LongKey",
            0,
            &[
                Instruction::Adr {
                    offset: 0,
                    value_type: ValueType::BoundedStr { bound: 32 },
                    flags: AdrFlags::KEY,
                },
                Instruction::Rts,
            ],
            &[],
        );
        descriptor.flags = TopicFlags::KEY;
        descriptor.key_offsets = vec![KeyMember {
            declaration_index: 0,
            member_id: 0,
        }];
        let sample = Value::Struct(vec![Some(Value::Str("a very long key value indeed".into()))]);
        let hash = keyhash(&descriptor, &sample).unwrap();
        // A 32-byte serialized key cannot fit verbatim; must be an MD5 digest under `xtypes`.
        assert_eq!(hash.len(), 16);
        #[cfg(feature = "xtypes")]
        {
            let serialized = key(&descriptor, &sample).unwrap().concat_by_member_id();
            assert!(serialized.len() > 16);
        }
    }
}
