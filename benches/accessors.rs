use criterion::{black_box, criterion_group, criterion_main, BenchmarkId, Criterion, Throughput};
use sofa::builder::SofaBuilder;
use sofa::file::OpenConfig;
use sofa::layout::FlatBuffer;
use sofa::schema::Convention;
use sofa::SofaFile;
use tempfile::TempDir;

/// Write an HRIR snapshot with `measurements` directions of `samples`-tap responses
fn create_hrir_file(path: &std::path::Path, measurements: usize, samples: usize) {
    SofaBuilder::new(Convention::SimpleFreeFieldHrir)
        .measurements(measurements)
        .samples(samples)
        .build()
        .unwrap()
        .save(path)
        .unwrap();

    let mut file = SofaFile::open_with_config(path, OpenConfig::append()).unwrap();
    let values = (0..measurements * 2 * samples)
        .map(|i| (i as f64 * 0.01).sin())
        .collect();
    let ir = FlatBuffer::from_shape_vec(vec![measurements, 2, samples], values).unwrap();
    file.set_data_ir(&ir).unwrap();
    file.close().unwrap();
}

/// Benchmark open + validate against the declared convention
fn bench_open_and_validate(c: &mut Criterion) {
    let mut group = c.benchmark_group("open_validate");

    for measurements in [100, 1000] {
        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("hrir.json");
        create_hrir_file(&file_path, measurements, 256);

        group.bench_with_input(
            BenchmarkId::from_parameter(format!("{}measurements", measurements)),
            &file_path,
            |b, path| {
                b.iter(|| {
                    let file = SofaFile::open(path).unwrap();
                    black_box(file.is_valid_convention("SimpleFreeFieldHRIR"))
                });
            },
        );
    }

    group.finish();
}

/// Benchmark reading the full impulse response array from an open handle
fn bench_data_ir(c: &mut Criterion) {
    let mut group = c.benchmark_group("data_ir");

    for (measurements, samples) in [(100, 256), (1000, 256), (1000, 1024)] {
        group.throughput(Throughput::Elements((measurements * 2 * samples) as u64));

        let temp_dir = TempDir::new().unwrap();
        let file_path = temp_dir.path().join("hrir.json");
        create_hrir_file(&file_path, measurements, samples);
        let file = SofaFile::open(&file_path).unwrap();
        // resolve once outside the timed loop
        file.dimensions().unwrap();

        group.bench_function(
            BenchmarkId::from_parameter(format!("{}x{}", measurements, samples)),
            |b| {
                b.iter(|| black_box(file.data_ir().unwrap()));
            },
        );
    }

    group.finish();
}

/// Benchmark dimension resolution on a fresh handle
fn bench_dimension_resolution(c: &mut Criterion) {
    let temp_dir = TempDir::new().unwrap();
    let file_path = temp_dir.path().join("hrir.json");
    create_hrir_file(&file_path, 500, 128);
    let store = sofa::store::MemoryStore::load(&file_path).unwrap();

    c.bench_function("resolve_dimensions", |b| {
        b.iter(|| {
            black_box(
                sofa::dimensions::DimensionRegistry::resolve(
                    &store,
                    sofa::schema::known_signatures,
                )
                .unwrap(),
            )
        });
    });
}

criterion_group!(
    benches,
    bench_open_and_validate,
    bench_data_ir,
    bench_dimension_resolution
);
criterion_main!(benches);
