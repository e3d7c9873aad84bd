//! Benchmarks for converter resolution and conversion.
//!
//! - cached lookups for exact, hierarchy-inherited and global strategies
//! - cold lookups right after a registration cleared the cache
//! - end-to-end conversions through the default converters
//!
//! ```bash
//! cargo bench --bench conversion_benchmarks
//! ```

#![allow(clippy::unwrap_used)]

use criterion::{Criterion, criterion_group, criterion_main};
use std::hint::black_box;
use typeconv::prelude::*;

struct Fixture {
    service: ConversionService,
    deep: TypeHash,
    color: TypeHash,
}

/// Service with the default converters and a ten-level class chain whose root
/// converts to `string`.
fn fixture() -> Fixture {
    let mut universe = TypeUniverse::with_builtins();
    let mut parent = universe.register(TypeEntry::class("Level0")).unwrap();
    let root = parent;
    for depth in 1..10 {
        parent = universe
            .register(TypeEntry::class(format!("Level{depth}")).with_base(parent))
            .unwrap();
    }
    let color = universe
        .register(TypeEntry::enumeration("Color").with_member("Red").with_member("Green"))
        .unwrap();

    let service = ConversionService::builder()
        .universe(universe)
        .with_defaults()
        .build()
        .unwrap();
    service
        .add_converter_for(root, builtins::STRING, |_: &Value| -> Result<Option<Value>, BoxError> {
            Ok(Some(Value::new(String::from("level"))))
        })
        .unwrap();

    Fixture {
        service,
        deep: parent,
        color,
    }
}

fn bench_resolution(c: &mut Criterion) {
    let Fixture {
        service,
        deep,
        color,
    } = fixture();
    let mut group = c.benchmark_group("resolution");

    group.bench_function("exact_cached", |b| {
        b.iter(|| service.can_convert(black_box(Some(builtins::BOOL)), builtins::STRING))
    });
    group.bench_function("hierarchy_cached", |b| {
        b.iter(|| service.can_convert(black_box(Some(deep)), builtins::STRING))
    });
    group.bench_function("global_cached", |b| {
        b.iter(|| service.can_convert(black_box(Some(color)), builtins::INT32))
    });
    group.bench_function("hierarchy_cold", |b| {
        b.iter(|| {
            service.remove_convertible(builtins::CHAR, builtins::CHAR);
            service.can_convert(black_box(Some(deep)), builtins::STRING)
        })
    });

    group.finish();
}

fn bench_conversion(c: &mut Criterion) {
    let Fixture { service, deep, .. } = fixture();
    let mut group = c.benchmark_group("conversion");

    group.bench_function("string_to_int", |b| {
        b.iter(|| {
            service
                .convert_into::<i32>(Some(Value::new(String::from(black_box("12345")))))
                .unwrap()
        })
    });
    group.bench_function("int_to_double", |b| {
        b.iter(|| service.convert_into::<f64>(Some(Value::new(black_box(7i32)))).unwrap())
    });
    group.bench_function("bypass", |b| {
        b.iter(|| {
            service
                .convert(Some(Value::with_type(deep, black_box(1u8))), builtins::OBJECT)
                .unwrap()
        })
    });
    group.bench_function("hierarchy_to_string", |b| {
        b.iter(|| {
            service
                .convert(Some(Value::with_type(deep, black_box(1u8))), builtins::STRING)
                .unwrap()
        })
    });

    group.finish();
}

criterion_group!(benches, bench_resolution, bench_conversion);
criterion_main!(benches);
