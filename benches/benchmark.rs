use std::sync::Arc;

use criterion::{black_box, criterion_group, criterion_main, Criterion};

use versemap::loader::MappingSource;
use versemap::mapping::MappingTable;
use versemap::system;

pub fn criterion_benchmark(c: &mut Criterion) {
    // shift the opening of every early Psalm down one verse, the shape the
    // title-counting traditions take
    let mut text = String::new();
    for chapter in 3..=41 {
        text.push_str(&format!("Ps.{0}.0-Ps.{0}.2=-1\n", chapter));
    }
    let source = MappingSource::from_text(&text);

    c.bench_function("build 39 entries", |b| {
        b.iter(|| {
            MappingTable::new(
                Arc::new(system::kjv()),
                Arc::new(system::kjv()),
                black_box(source.entries()),
            )
        })
    });

    let table = MappingTable::new(Arc::new(system::kjv()), Arc::new(system::kjv()), source.entries());
    c.bench_function("map hit", |b| b.iter(|| table.map_str(black_box("Ps.20.1"))));
    c.bench_function("map miss", |b| b.iter(|| table.map_str(black_box("Gen.4.1"))));
    c.bench_function("unmap hit", |b| b.iter(|| table.unmap_str(black_box("Ps.20.0"))));
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
