// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Legacy fixed-layout field metadata.
//!
//! [`descriptor::TypeDescriptor`] here is the simple, `const fn`-constructible
//! shape `hdds-codegen`'s derive macro emits directly for plain-old-data
//! structs. The richer, bytecode-program-carrying descriptor used by the
//! general serializer core lives in [`crate::core::descriptor`].

pub mod descriptor;

pub use descriptor::{FieldLayout, FieldType, PrimitiveKind, TypeDescriptor};

use crate::core::ser::error::CdrResult;

/// Implemented by `#[derive(DDS)]` for plain, flat structs of primitives,
/// `String`, and `Vec<u8>` fields: a fixed/variable-layout CDR2 encoding via
/// [`crate::core::ser::cursor`] rather than the bytecode-interpreted path
/// [`crate::core::ser::write`]/[`crate::core::ser::read`] walk for general
/// aggregates.
pub trait FixedLayoutCodec: Sized {
    /// The static descriptor the derive macro generates for this type.
    fn type_descriptor() -> &'static TypeDescriptor;

    /// Encode `self` into `buf`, returning the number of bytes written.
    fn encode_cdr2(&self, buf: &mut [u8]) -> CdrResult<usize>;

    /// Decode an instance of `Self` from `buf`.
    fn decode_cdr2(buf: &[u8]) -> CdrResult<Self>;
}
