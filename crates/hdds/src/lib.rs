// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # HDDS core — XCDR serialization engine
//!
//! A pure Rust implementation of the DDS-XTypes wire encoding (XCDR1/XCDR2),
//! a bytecode interpreter that drives write/read/normalize/key-extraction
//! over it, a concurrent hopscotch hash table for the member-ID lookup
//! tables the interpreter needs, and the atomics/PRNG substrate both of
//! those are built on.
//!
//! This crate does not implement RTPS transport, discovery, the public DDS
//! entity API, QoS negotiation, or security — it is the serialization and
//! concurrent-data-structure core those layers would be built on top of.
//!
//! ## Quick start
//!
//! ```
//! use hdds::core::bytecode::{Instruction, Op};
//! use hdds::core::descriptor::TypeDescriptor;
//!
//! // A struct { u32 a; } described as a bytecode program.
//! let program = [
//!     Instruction::adr(Op::Adr, 0, 0),
//!     Instruction::rts(),
//! ];
//! let _descriptor = TypeDescriptor::new("Example", 1, &program, &[]);
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |  core::ser::{write,read,normalize,key,size,free,pretty}             |
//! |      interpret a core::bytecode::Program against a sample           |
//! +---------------------------------------------------------------------+
//! |  core::cdr (endianness-polymorphic streams)                         |
//! +---------------------------------------------------------------------+
//! |  core::rt::{atomics, rng, hash}    runtime substrate                |
//! +---------------------------------------------------------------------+
//! ```
//!
//! ## Modules
//!
//! - [`core`] - bytecode engine, CDR streams, serializer core, runtime substrate
//! - [`logging`] - compile-time-gated logging facade

// Clippy: No blanket suppressions. Fix issues properly or use inline #[allow] with justification.

// Allow the derive macro to work inside this crate's tests
extern crate self as hdds;

/// Core: bytecode engine, CDR streams, serializer core, runtime substrate.
pub mod core;
/// Compile-time configurable logging system (zero-cost when disabled).
pub mod logging;

pub use core::bytecode::{Instruction, Op};
pub use core::cdr::{CdrInput, CdrOutput, Endianness, NativeEndian, BigEndian, LittleEndian, XcdrVersion};
pub use core::descriptor::{KeyMember, MemberIdEntry, TopicDescriptor, TopicFlags, TypeDescriptor};
pub use core::rt::hash::{ConcurrentHashTable, HashTable};
pub use core::rt::rng::{Mt19937, PrngInstance};
pub use core::ser::error::CdrError;
pub use core::ser::{free, key, normalize, pretty, read, size, write};
pub use core::types::FixedLayoutCodec;

/// Re-export the `#[derive(DDS)]` macro for the legacy fixed-layout descriptor shape.
pub use hdds_codegen::DDS;

/// Crate version string.
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
