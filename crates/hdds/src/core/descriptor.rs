// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Topic descriptor: the immutable, per-type metadata the serializer core
//! interprets a [`crate::core::bytecode::Program`] against.
//!
//! Built once at topic-registration time (in this crate, typically by the
//! `hdds-codegen` derive macro or by hand for tests) and shared read-only
//! for the descriptor's entire lifetime — see §3 "Topic descriptor" and its
//! invariants.

use std::sync::Arc;

use crate::core::bytecode::{Extensibility, Program};
use crate::core::rt::hash::ConcurrentHashTable;

/// Flag set describing key-handling and default-encoding properties of a
/// topic type. Mirrors §3's flag list; `opt_size_xcdr{1,2}` (memcpy-safety)
/// are kept as separate fields on [`TypeDescriptor`] rather than bits here
/// since they carry a size, not a boolean.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct TopicFlags(pub u32);

impl TopicFlags {
    pub const KEY: TopicFlags = TopicFlags(1 << 0);
    pub const FIXED_KEY_XCDR1: TopicFlags = TopicFlags(1 << 1);
    pub const FIXED_KEY_XCDR2: TopicFlags = TopicFlags(1 << 2);
    pub const KEY_IN_APPENDABLE: TopicFlags = TopicFlags(1 << 3);
    pub const KEY_IN_MUTABLE: TopicFlags = TopicFlags(1 << 4);
    pub const KEY_CONTAINS_SEQUENCE: TopicFlags = TopicFlags(1 << 5);
    pub const KEY_CONTAINS_NON_PRIMITIVE_ARRAY: TopicFlags = TopicFlags(1 << 6);
    pub const DEFAULT_XCDR2: TopicFlags = TopicFlags(1 << 7);

    pub const fn empty() -> Self {
        TopicFlags(0)
    }

    pub const fn contains(self, other: Self) -> bool {
        (self.0 & other.0) == other.0
    }

    pub const fn with(self, other: Self) -> Self {
        TopicFlags(self.0 | other.0)
    }

    /// True when a key field lives behind appendable/mutable `PLM` framing,
    /// or is itself a sequence/non-primitive array. The former still walks
    /// declaration-order key offsets (see [`crate::core::ser::key::key`]);
    /// only the latter is actually unsupported. See §4.6.
    pub const fn requires_slow_key_path(self) -> bool {
        self.contains(Self::KEY_IN_APPENDABLE)
            || self.contains(Self::KEY_IN_MUTABLE)
            || self.contains(Self::KEY_CONTAINS_SEQUENCE)
            || self.contains(Self::KEY_CONTAINS_NON_PRIMITIVE_ARRAY)
    }
}

/// One entry of the key-offset list: a key field's position, given both in
/// declaration order and in member-ID order (the two coincide for types
/// with no explicit `@id` reordering).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyMember {
    /// Index into the top-level program's member list (declaration order).
    pub declaration_index: u32,
    /// Declared member-ID (member-ID order key is this list sorted by this field).
    pub member_id: u32,
}

/// Member-ID table entry: maps a top-level `ADR`'s position to its declared
/// member-ID. See §3 "Member-ID table entry".
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemberIdEntry {
    pub adr_index: u32,
    pub member_id: u32,
}

/// Bidirectional index from a top-level `ADR`'s position to its declared
/// member-ID and back, built once from the trailing `MID` instructions
/// (§3, §4.2 step 6 "Finally, the `MID` instructions"). XCDR1 needs both
/// directions: `write_adr` looks up a member-ID to emit when an optional
/// member is present (§4.3 step 2), `read_adr` looks up the ADR position an
/// incoming wire member-ID belongs to.
///
/// Backed by [`ConcurrentHashTable`] per §3 ("hashed with a multiply-shift
/// hash") rather than a linear scan — built once at topic-registration time
/// and read afterward for the descriptor's entire lifetime, which is
/// exactly the single-writer/many-reader shape that table is for. Wrapped
/// in an `Arc` so [`TypeDescriptor`] stays cheaply `Clone` without cloning
/// the table's contents.
#[derive(Clone)]
pub struct MemberIdTable {
    by_adr_index: Arc<ConcurrentHashTable<u32, u32>>,
    by_member_id: Arc<ConcurrentHashTable<u32, u32>>,
    len: usize,
}

impl std::fmt::Debug for MemberIdTable {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("MemberIdTable").field("len", &self.len).finish()
    }
}

impl MemberIdTable {
    pub fn build(entries: &[MemberIdEntry]) -> Self {
        let by_adr_index = ConcurrentHashTable::with_capacity(entries.len().max(1));
        let by_member_id = ConcurrentHashTable::with_capacity(entries.len().max(1));
        for entry in entries {
            by_adr_index.insert(entry.adr_index, entry.member_id);
            by_member_id.insert(entry.member_id, entry.adr_index);
        }
        Self {
            by_adr_index: Arc::new(by_adr_index),
            by_member_id: Arc::new(by_member_id),
            len: entries.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    pub fn len(&self) -> usize {
        self.len
    }

    /// Member-ID declared for the `ADR` at `adr_index`, for encoding an
    /// optional member under XCDR1 (§4.3 step 2).
    pub fn member_id_for_adr_index(&self, adr_index: u32) -> Option<u32> {
        self.by_adr_index.get(&adr_index)
    }

    /// `ADR` position that declared `member_id`, for decoding an XCDR1
    /// extended parameter header back to its in-memory slot.
    pub fn adr_index_for_member_id(&self, member_id: u32) -> Option<u32> {
        self.by_member_id.get(&member_id)
    }
}

impl Default for MemberIdTable {
    fn default() -> Self {
        Self::build(&[])
    }
}

/// Describes one IDL-level type for the serializer core.
///
/// Per §3: immutable after construction; the key-offset list is consistent
/// with `flags`; an absent `member_id_table` means "no optional members".
#[derive(Debug, Clone)]
pub struct TypeDescriptor {
    pub type_name: &'static str,
    /// Native-layout size hint (informational here — this crate's sample
    /// representation is the dynamic [`crate::core::value::Value`] tree,
    /// not a raw memory layout; see module docs on `Non-goals`).
    pub native_size: u32,
    /// The top-level aggregate's member program.
    pub program: Program,
    /// Sub-programs referenced by index from `Jsr`/`Jeq`/`Jeq4`/`Plm`/nested
    /// `ValueType` variants in `program` (and transitively from each other).
    pub subprograms: Vec<Program>,
    pub flags: TopicFlags,
    pub key_offsets: Vec<KeyMember>,
    pub member_id_table: MemberIdTable,
    /// Non-zero iff the type is entirely memcpy-safe at XCDR1 (no padding
    /// differences, no indirections, no booleans, no variable-length parts).
    pub opt_size_xcdr1: u32,
    /// Same as `opt_size_xcdr1` but for XCDR2.
    pub opt_size_xcdr2: u32,
}

impl TypeDescriptor {
    /// Construct a final (non-appendable, non-mutable), non-keyed descriptor
    /// with no sub-programs. Convenience for simple flat structs and tests;
    /// use the struct literal directly for anything with keys, nesting, or
    /// a non-final extensibility.
    pub fn new(type_name: &'static str, native_size: u32, program: &[crate::core::bytecode::Instruction], subprograms: &[Program]) -> Self {
        Self {
            type_name,
            native_size,
            program: Program::new(program.to_vec()),
            subprograms: subprograms.to_vec(),
            flags: TopicFlags::empty(),
            key_offsets: Vec::new(),
            member_id_table: MemberIdTable::default(),
            opt_size_xcdr1: 0,
            opt_size_xcdr2: 0,
        }
    }

    pub fn has_key(&self) -> bool {
        self.flags.contains(TopicFlags::KEY)
    }

    pub fn extensibility(&self) -> Extensibility {
        self.program.extensibility
    }

    pub fn is_memcpy_safe(&self, version: crate::core::cdr::XcdrVersion) -> bool {
        match version {
            crate::core::cdr::XcdrVersion::Xcdr1 => self.opt_size_xcdr1 != 0,
            crate::core::cdr::XcdrVersion::Xcdr2 => self.opt_size_xcdr2 != 0,
        }
    }

    pub fn subprogram(&self, index: usize) -> &Program {
        &self.subprograms[index]
    }
}

/// Alias used by callers that think in terms of "the descriptor for a
/// topic" rather than "the descriptor for a type" — the two coincide in
/// this crate since a topic has exactly one associated sample type.
pub type TopicDescriptor = TypeDescriptor;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::bytecode::{AdrFlags, Instruction, ValueType};

    fn flat_u32_descriptor() -> TypeDescriptor {
        TypeDescriptor::new(
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
        )
    }

    #[test]
    fn new_descriptor_defaults_to_final_unkeyed() {
        let d = flat_u32_descriptor();
        assert_eq!(d.extensibility(), Extensibility::Final);
        assert!(!d.has_key());
        assert!(d.key_offsets.is_empty());
    }

    #[test]
    fn topic_flags_compose() {
        let flags = TopicFlags::KEY.with(TopicFlags::KEY_IN_MUTABLE);
        assert!(flags.requires_slow_key_path());
        assert!(!TopicFlags::KEY.requires_slow_key_path());
    }

    #[test]
    fn new_descriptor_has_no_member_id_table() {
        let d = flat_u32_descriptor();
        assert!(d.member_id_table.is_empty());
    }

    #[test]
    fn member_id_table_resolves_both_directions() {
        let table = MemberIdTable::build(&[
            MemberIdEntry { adr_index: 0, member_id: 10 },
            MemberIdEntry { adr_index: 1, member_id: 20 },
        ]);
        assert_eq!(table.member_id_for_adr_index(0), Some(10));
        assert_eq!(table.member_id_for_adr_index(1), Some(20));
        assert_eq!(table.adr_index_for_member_id(20), Some(1));
        assert_eq!(table.member_id_for_adr_index(2), None);
    }
}
