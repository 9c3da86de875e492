// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Free: release a sample's heap-owned members (§4.8).
//!
//! The reference operation walks a descriptor releasing each heap pointer a
//! sample owns (string buffers, sequence buffers, the active union case,
//! externalized members) and resets the freed slots so a second `free` call
//! on the same sample is a no-op.
//!
//! This crate's samples are an owned [`Value`] tree, so Rust's own `Drop`
//! already releases every string/`Vec`/`Box` exactly once when the sample
//! goes out of scope — there is no raw pointer a caller could double-free.
//! `free` is kept as an explicit operation anyway, both for API parity with
//! callers ported from the descriptor-walking model and because it gives an
//! idempotent "reset to absent" primitive: it walks the tree the same way
//! `write`/`read` do and clears every slot to `None`, rather than relying on
//! the caller to drop and reconstruct the whole sample.

use crate::core::bytecode::{Extensibility, Instruction, Program};
use crate::core::descriptor::TypeDescriptor;
use crate::core::value::Value;

/// Reset every member of `sample` to absent, in place. Idempotent: calling
/// this twice in a row leaves the sample unchanged after the first call.
pub fn free(descriptor: &TypeDescriptor, sample: &mut Value) {
    free_aggregate(descriptor, &descriptor.program, sample);
}

fn free_aggregate(descriptor: &TypeDescriptor, program: &Program, sample: &mut Value) {
    let Some(members) = sample.as_struct_mut() else {
        return;
    };

    match program.extensibility {
        Extensibility::Mutable => {
            for (instr, member) in program.instructions.iter().zip(members.iter_mut()) {
                let Instruction::Plm { program: sub_idx, .. } = instr else {
                    continue;
                };
                free_member(descriptor, descriptor.subprogram(*sub_idx), member);
            }
        }
        Extensibility::Final | Extensibility::Appendable => {
            for (instr, member) in program.members().zip(members.iter_mut()) {
                let Instruction::Adr { value_type, .. } = instr else {
                    continue;
                };
                free_value_type(descriptor, value_type, member);
            }
        }
    }
}

fn free_member(descriptor: &TypeDescriptor, sub_program: &Program, member: &mut Option<Value>) {
    if let Some(Instruction::Adr { value_type, .. }) = sub_program.instructions.first() {
        free_value_type(descriptor, value_type, member);
    }
    *member = None;
}

fn free_value_type(descriptor: &TypeDescriptor, value_type: &crate::core::bytecode::ValueType, member: &mut Option<Value>) {
    use crate::core::bytecode::ValueType;
    if let Some(value) = member {
        match value_type {
            ValueType::Struct { program } => {
                free_aggregate(descriptor, descriptor.subprogram(*program), value);
            }
            ValueType::Union { .. } => {
                if let Value::Union { value: inner, .. } = value {
                    **inner = None;
                }
            }
            ValueType::External { .. } => {
                if let Value::External(inner) = value {
                    **inner = None;
                }
            }
            ValueType::Sequence { .. } | ValueType::BoundedSequence { .. } => {
                if let Value::Sequence(items) = value {
                    items.clear();
                }
            }
            ValueType::Array { .. } => {
                if let Value::Array(items) = value {
                    items.clear();
                }
            }
            _ => {}
        }
    }
    *member = None;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bytecode::{AdrFlags, Instruction, ValueType};

    #[test]
    fn free_resets_every_member_to_none() {
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
        let mut sample = Value::Struct(vec![Some(Value::I32(42)), Some(Value::Str("hi".into()))]);
        free(&descriptor, &mut sample);
        assert_eq!(sample, Value::Struct(vec![None, None]));
    }

    #[test]
    fn free_is_idempotent() {
        let descriptor = TypeDescriptor::new(
            "Flat",
            4,
            &[
                Instruction::Adr {
                    offset: 0,
                    value_type: ValueType::Int32,
                    flags: AdrFlags::empty(),
                },
                Instruction::Rts,
            ],
            &[],
        );
        let mut sample = Value::Struct(vec![Some(Value::I32(1))]);
        free(&descriptor, &mut sample);
        let once = sample.clone();
        free(&descriptor, &mut sample);
        assert_eq!(sample, once);
    }
}
