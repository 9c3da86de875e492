// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read/write cursors for CDR2 buffer manipulation.
//!

use super::error::{CdrError, CdrResult};

/// Generate write methods for primitive types (eliminates code duplication)
///
/// Each generated method:
/// 1. Checks buffer bounds (returns `CdrError::BufferTooSmall` if overflow)
/// 2. Converts value to little-endian bytes via `to_le_bytes()`
/// 3. Copies bytes to buffer
/// 4. Advances offset
macro_rules! impl_write_le {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self, value: $type) -> CdrResult<()> {
            if self.offset + $size > self.buffer.len() {
                return Err(CdrError::BufferTooSmall {
                    offset: self.offset,
                    needed: $size,
                });
            }
            let bytes = value.to_le_bytes();
            self.buffer[self.offset..self.offset + $size].copy_from_slice(&bytes);
            self.offset += $size;
            Ok(())
        }
    };
}

/// Generate read methods for primitive types (eliminates code duplication)
///
/// Each generated method:
/// 1. Checks buffer bounds (returns `CdrError::BufferTooSmall` if overflow)
/// 2. Reads N bytes from buffer
/// 3. Converts bytes to value via `from_le_bytes()`
/// 4. Advances offset
macro_rules! impl_read_le {
    ($name:ident, $type:ty, $size:expr) => {
        pub fn $name(&mut self) -> CdrResult<$type> {
            if self.offset + $size > self.buffer.len() {
                return Err(CdrError::BufferTooSmall {
                    offset: self.offset,
                    needed: $size,
                });
            }
            let mut bytes = [0u8; $size];
            bytes.copy_from_slice(&self.buffer[self.offset..self.offset + $size]);
            self.offset += $size;
            Ok(<$type>::from_le_bytes(bytes))
        }
    };
}

/// Generate common cursor methods (offset, remaining, align)
///
/// Eliminates duplication between CursorMut and Cursor by generating identical methods.
macro_rules! impl_cursor_common {
    () => {
        pub fn offset(&self) -> usize {
            self.offset
        }

        pub fn remaining(&self) -> usize {
            self.buffer.len().saturating_sub(self.offset)
        }

        pub fn align(&mut self, alignment: u8) -> CdrResult<()> {
            if alignment <= 1 {
                return Ok(());
            }
            let mask = (alignment as usize) - 1;
            self.offset = (self.offset + mask) & !mask;
            if self.offset > self.buffer.len() {
                return Err(CdrError::BufferTooSmall {
                    offset: self.offset,
                    needed: self.offset - self.buffer.len(),
                });
            }
            Ok(())
        }
    };
}

/// Mutable cursor for writing (bounds-checked, zero-copy)
pub struct CursorMut<'a> {
    buffer: &'a mut [u8],
    offset: usize,
}

impl<'a> CursorMut<'a> {
    pub fn new(buffer: &'a mut [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    // Generate write methods via macro (DRY principle)
    impl_write_le!(write_u8, u8, 1);
    impl_write_le!(write_u16_le, u16, 2);
    impl_write_le!(write_u32_le, u32, 4);
    impl_write_le!(write_u64_le, u64, 8);

    pub fn write_i32_le(&mut self, value: i32) -> CdrResult<()> {
        self.write_bytes(&value.to_le_bytes())
    }

    pub fn write_f64_le(&mut self, value: f64) -> CdrResult<()> {
        self.write_u64_le(value.to_bits())
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> CdrResult<()> {
        if self.offset + data.len() > self.buffer.len() {
            return Err(CdrError::BufferTooSmall {
                offset: self.offset,
                needed: data.len(),
            });
        }
        self.buffer[self.offset..self.offset + data.len()].copy_from_slice(data);
        self.offset += data.len();
        Ok(())
    }

    // Generate common cursor methods (offset, remaining, align) via macro
    impl_cursor_common!();
}

/// Immutable cursor for reading (bounds-checked, zero-copy)
pub struct Cursor<'a> {
    buffer: &'a [u8],
    offset: usize,
}

impl<'a> Cursor<'a> {
    pub fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, offset: 0 }
    }

    // Generate read methods via macro (DRY principle)
    impl_read_le!(read_u8, u8, 1);
    impl_read_le!(read_u16_le, u16, 2);
    impl_read_le!(read_u32_le, u32, 4);
    impl_read_le!(read_u64_le, u64, 8);

    pub fn read_i32_le(&mut self) -> CdrResult<i32> {
        let mut buf = [0u8; 4];
        buf.copy_from_slice(self.read_bytes(4)?);
        Ok(i32::from_le_bytes(buf))
    }

    pub fn read_f64_le(&mut self) -> CdrResult<f64> {
        Ok(f64::from_bits(self.read_u64_le()?))
    }

    pub fn read_bytes(&mut self, len: usize) -> CdrResult<&'a [u8]> {
        if self.offset + len > self.buffer.len() {
            return Err(CdrError::BufferTooSmall {
                offset: self.offset,
                needed: len,
            });
        }
        let slice = &self.buffer[self.offset..self.offset + len];
        self.offset += len;
        Ok(slice)
    }

    // Generate common cursor methods (offset, remaining, align) via macro
    impl_cursor_common!();

    pub fn is_eof(&self) -> bool {
        self.offset >= self.buffer.len()
    }
}
