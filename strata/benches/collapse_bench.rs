use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion};
use std::fmt::Write as _;
use std::fs;
use std::path::Path;
use strata::config::{CollapsedConfig, ConfigMerger, ConfigSerializer, FragmentLoader, MergePolicy};
use strata::operations::collapse;
use tempfile::TempDir;

fn set_fragment(index: usize, keys: usize, items: usize) -> String {
    let mut text = String::new();
    for key in 0..keys {
        let _ = writeln!(text, "key_{key}: !!set");
        for item in 0..items {
            let _ = writeln!(text, "  item_{}: null", (index * 7 + item) % (items * 2));
        }
    }
    text
}

fn write_fragments(dir: &Path, count: usize, keys: usize, items: usize) {
    fs::create_dir_all(dir).unwrap();
    for index in 0..count {
        fs::write(
            dir.join(format!("{index:03}.yaml")),
            set_fragment(index, keys, items),
        )
        .unwrap();
    }
}

fn bench_load(c: &mut Criterion) {
    let mut group = c.benchmark_group("load");

    let text = set_fragment(0, 10, 20);
    group.bench_function("set_fragment", |b| {
        b.iter(|| FragmentLoader::load_str(Path::new("a.yaml"), black_box(&text)));
    });

    let list = "rgba:\n  - red\n  - green\n  - blue\n  - alpha\n";
    group.bench_function("list_fragment", |b| {
        b.iter(|| FragmentLoader::load_str(Path::new("a.yaml"), black_box(&list)));
    });

    group.finish();
}

fn bench_merge(c: &mut Criterion) {
    let mut group = c.benchmark_group("merge");

    for count in [1, 10, 50] {
        let fragments: Vec<_> = (0..count)
            .filter_map(|i| {
                FragmentLoader::load_str(Path::new("f.yaml"), &set_fragment(i, 10, 20)).unwrap()
            })
            .collect();

        for policy in [MergePolicy::Sorted, MergePolicy::PreserveOrder] {
            group.bench_with_input(
                BenchmarkId::new(policy.to_string(), count),
                &fragments,
                |b, fragments| {
                    b.iter(|| ConfigMerger::merge(black_box(fragments.clone()), policy));
                },
            );
        }
    }

    group.finish();
}

fn bench_serialize(c: &mut Criterion) {
    let mut group = c.benchmark_group("serialize");

    let config: CollapsedConfig = (0..50)
        .map(|key| {
            (
                format!("key_{key}"),
                (0..20).map(|item| format!("item_{item}")).collect(),
            )
        })
        .collect();
    group.bench_function("50_keys", |b| {
        b.iter(|| ConfigSerializer::to_string(black_box(&config)));
    });

    group.finish();
}

fn bench_collapse(c: &mut Criterion) {
    let mut group = c.benchmark_group("collapse");

    for count in [5, 25] {
        let temp_dir = TempDir::new().unwrap();
        let dir = temp_dir.path().join("layers");
        write_fragments(&dir, count, 10, 20);
        let output = temp_dir.path().join("layers.yaml");

        group.bench_with_input(BenchmarkId::new("layers", count), &dir, |b, dir| {
            b.iter(|| collapse(black_box(dir), &output).unwrap());
        });
    }

    group.finish();
}

criterion_group!(benches, bench_load, bench_merge, bench_serialize, bench_collapse);
criterion_main!(benches);
