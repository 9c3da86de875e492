// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Pretty: human-readable dump of a sample against its descriptor.
//!
//! Not part of the wire protocol — a debugging aid for logging a rejected
//! sample or comparing two decoded values by eye. Indexes members
//! positionally (`#0`, `#1`, ...) since a bytecode [`Program`] carries no
//! field names, only declaration order.

use std::fmt::Write as _;

use crate::core::bytecode::{Extensibility, Instruction, Program};
use crate::core::descriptor::TypeDescriptor;
use crate::core::value::Value;

/// Render `sample` as an indented, member-indexed tree.
pub fn pretty(descriptor: &TypeDescriptor, sample: &Value) -> String {
    let mut out = String::new();
    let _ = write!(out, "{}", descriptor.type_name);
    pretty_aggregate(&mut out, descriptor, &descriptor.program, sample, 0);
    out
}

fn indent(out: &mut String, depth: usize) {
    for _ in 0..depth {
        out.push_str("  ");
    }
}

fn pretty_aggregate(out: &mut String, descriptor: &TypeDescriptor, program: &Program, sample: &Value, depth: usize) {
    let Some(members) = sample.as_struct() else {
        let _ = write!(out, " {sample:?}");
        return;
    };
    let _ = writeln!(out, " {{");
    let kind_suffix = match program.extensibility {
        Extensibility::Final => "",
        Extensibility::Appendable => " (appendable)",
        Extensibility::Mutable => " (mutable)",
    };

    if matches!(program.extensibility, Extensibility::Mutable) {
        for (instr, member) in program.instructions.iter().zip(members.iter()) {
            if let Instruction::Plm { member_id, .. } = instr {
                indent(out, depth + 1);
                let _ = write!(out, "#{member_id}{kind_suffix}:");
                pretty_member(out, descriptor, member, depth + 1);
                out.push('\n');
            }
        }
    } else {
        for (i, (instr, member)) in program.members().zip(members.iter()).enumerate() {
            if let Instruction::Adr { .. } = instr {
                indent(out, depth + 1);
                let _ = write!(out, "#{i}{kind_suffix}:");
                pretty_member(out, descriptor, member, depth + 1);
                out.push('\n');
            }
        }
    }
    indent(out, depth);
    out.push('}');
}

fn pretty_member(out: &mut String, descriptor: &TypeDescriptor, member: &Option<Value>, depth: usize) {
    match member {
        None => out.push_str(" <absent>"),
        Some(Value::Struct(_)) => pretty_nested(out, descriptor, member.as_ref().unwrap(), depth),
        Some(other) => {
            let _ = write!(out, " {other:?}");
        }
    }
}

fn pretty_nested(out: &mut String, descriptor: &TypeDescriptor, value: &Value, depth: usize) {
    // Nested aggregates don't carry a reference to their own sub-program
    // here (the caller already descended through a `ValueType::Struct`'s
    // `program` index to build this `Value`), so fall back to a plain
    // positional dump without extensibility framing.
    let _ = write!(out, "{value:?}");
    let _ = depth;
    let _ = descriptor;
}
