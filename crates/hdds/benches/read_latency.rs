// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Read latency benchmark.
//!
//! Measures `core::ser::read`'s cost against pre-encoded buffers of varying
//! payload size, under both XCDR1 and XCDR2.

#![allow(clippy::uninlined_format_args)]

use criterion::{criterion_group, criterion_main, BenchmarkId, Criterion};
use hdds::core::bytecode::{AdrFlags, Instruction, ValueType};
use hdds::core::descriptor::TypeDescriptor;
use hdds::core::value::Value;
use hdds::{read, write, LittleEndian, XcdrVersion};
use std::hint::black_box as bb;

fn bench_message_descriptor() -> TypeDescriptor {
    TypeDescriptor::new(
        "BenchMessage",
        16,
        &[
            Instruction::Adr {
                offset: 0,
                value_type: ValueType::UInt64,
                flags: AdrFlags::empty(),
            },
            Instruction::Adr {
                offset: 1,
                value_type: ValueType::Sequence {
                    element: Box::new(ValueType::UInt8),
                    program: None,
                },
                flags: AdrFlags::empty(),
            },
            Instruction::Rts,
        ],
        &[],
    )
}

fn bench_sample(seq: u64, size: usize) -> Value {
    Value::Struct(vec![
        Some(Value::U64(seq)),
        Some(Value::Sequence(vec![Value::U8(0xCD); size])),
    ])
}

fn bench_read_payload_sizes(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_latency_by_size");
    let descriptor = bench_message_descriptor();

    for size in [64, 256, 1024, 4096, 16384, 65536] {
        let bytes = write::<LittleEndian>(&descriptor, &bench_sample(7, size), XcdrVersion::Xcdr2).expect("encode fixture");
        group.bench_with_input(BenchmarkId::from_parameter(size), &bytes, |b, bytes| {
            b.iter(|| read::<LittleEndian>(bb(&descriptor), bb(bytes), XcdrVersion::Xcdr2).expect("read should succeed"));
        });
    }

    group.finish();
}

fn bench_read_xcdr_version_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("read_latency_by_xcdr_version");
    let descriptor = bench_message_descriptor();
    let sample = bench_sample(7, 256);

    let xcdr1_bytes = write::<LittleEndian>(&descriptor, &sample, XcdrVersion::Xcdr1).expect("encode fixture");
    let xcdr2_bytes = write::<LittleEndian>(&descriptor, &sample, XcdrVersion::Xcdr2).expect("encode fixture");

    group.bench_function("xcdr1", |b| {
        b.iter(|| read::<LittleEndian>(bb(&descriptor), bb(&xcdr1_bytes), XcdrVersion::Xcdr1).expect("read should succeed"));
    });

    group.bench_function("xcdr2", |b| {
        b.iter(|| read::<LittleEndian>(bb(&descriptor), bb(&xcdr2_bytes), XcdrVersion::Xcdr2).expect("read should succeed"));
    });

    group.finish();
}

criterion_group!(read_benches, bench_read_payload_sizes, bench_read_xcdr_version_comparison);
criterion_main!(read_benches);
