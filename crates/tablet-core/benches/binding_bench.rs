//! Criterion benchmarks for the binding codec.
//!
//! The codec runs once per binding slot on every settings apply, so it is
//! nowhere near the hot path, but the bench keeps parse/format regressions
//! visible.
//!
//! Run with:
//! ```bash
//! cargo bench --package tablet-core --bench binding_bench
//! ```

use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use tablet_core::binding::{self, Binding, MouseButton};

// ── Fixtures ──────────────────────────────────────────────────────────────────

const STRINGS: &[&str] = &["Key:A", "Key:Escape", "Mouse:Left", "Mouse:Forward", ""];

fn make_bindings() -> Vec<Option<Binding>> {
    vec![
        Some(Binding::Key("A".to_string())),
        Some(Binding::Key("F13".to_string())),
        Some(Binding::Mouse(MouseButton::Middle)),
        None,
    ]
}

// ── Benches ───────────────────────────────────────────────────────────────────

fn bench_parse(c: &mut Criterion) {
    let mut group = c.benchmark_group("binding_parse");
    for text in STRINGS {
        let label = if text.is_empty() { "<empty>" } else { text };
        group.bench_with_input(BenchmarkId::from_parameter(label), text, |b, text| {
            b.iter(|| binding::parse(black_box(text)));
        });
    }
    group.finish();
}

fn bench_format(c: &mut Criterion) {
    let bindings = make_bindings();
    c.bench_function("binding_format", |b| {
        b.iter(|| {
            for binding in &bindings {
                black_box(binding::format(black_box(binding.as_ref())));
            }
        });
    });
}

criterion_group!(benches, bench_parse, bench_format);
criterion_main!(benches);
