use std::hint::black_box;

use corset::{Bitmap32, CompressedBitmap, Dense, Raster, RowCodec, Sparse, SparseBitmap};
use criterion::{BenchmarkGroup, Criterion, Throughput, measurement::WallTime};

// === Row content ===

const W: usize = 1920;
const H: usize = 1080;

fn solid_row() -> Vec<u32> {
    vec![0xFF20_4060; W]
}

/// Flat areas with short hard edges, like UI chrome.
fn banded_row() -> Vec<u32> {
    (0..W).map(|x| 0xFF00_0000 | ((x / 64) as u32 * 0x0011_1111)).collect()
}

/// Constant colour under an alpha ramp.
fn fade_row() -> Vec<u32> {
    (0..W).map(|x| ((x % 256) as u32) << 24 | 0x0033_6699).collect()
}

fn noise_row() -> Vec<u32> {
    let mut s = 0x9E37_79B9u32;
    (0..W)
        .map(|_| {
            s ^= s << 13;
            s ^= s >> 17;
            s ^= s << 5;
            s
        })
        .collect()
}

fn rows() -> [(&'static str, Vec<u32>); 4] {
    [
        ("solid", solid_row()),
        ("banded", banded_row()),
        ("fade", fade_row()),
        ("noise", noise_row()),
    ]
}

fn print_ratios() {
    eprintln!("=== Compressed bytes per {W}-pixel row ===");
    for (name, row) in rows() {
        let mut dense = Vec::new();
        Dense::encode(&row, &mut dense);
        let mut sparse = Vec::new();
        Sparse::encode(&row, &mut sparse);
        eprintln!(
            "  {name:<8} dense {:>6}  sparse {:>6}  raw {:>6}",
            dense.len(),
            sparse.len(),
            W * 4
        );
    }
    eprintln!("==========================================");
}

// === Benchmark helpers ===

fn bench_codec<C: RowCodec<u32>>(group: &mut BenchmarkGroup<WallTime>, label: &str, row: &[u32]) {
    group.bench_function(format!("{label}_encode"), |b| {
        let mut out = Vec::with_capacity(row.len() * 8);
        b.iter(|| {
            out.clear();
            C::encode(black_box(row), &mut out);
        });
    });

    let mut encoded = Vec::new();
    C::encode(row, &mut encoded);
    group.bench_function(format!("{label}_decode"), |b| {
        let mut dst = vec![0u32; row.len()];
        b.iter(|| C::decode(black_box(&encoded), &mut dst).unwrap());
    });
}

// === Benchmark groups ===

fn bench_rows(c: &mut Criterion) {
    for (name, row) in rows() {
        let mut group = c.benchmark_group(format!("row_{name}"));
        group.throughput(Throughput::Bytes((W * 4) as u64));
        bench_codec::<Dense>(&mut group, "dense", &row);
        bench_codec::<Sparse>(&mut group, "sparse", &row);
        group.bench_function("naive_copy", |b| {
            let mut dst = vec![0u32; W];
            b.iter(|| dst.copy_from_slice(black_box(&row)));
        });
        group.finish();
    }
}

fn bench_row_switch(c: &mut Criterion) {
    let mut group = c.benchmark_group("row_switch");
    group.throughput(Throughput::Elements(H as u64));
    let banded = banded_row();

    group.bench_function("dense_read", |b| {
        let mut bmp = Bitmap32::new(W, H, 0).unwrap();
        for y in 0..H {
            bmp.write_span_unclipped(0, y, &banded).unwrap();
        }
        b.iter(|| {
            for y in 0..H as i64 {
                black_box(bmp.get_pixel(7, y).unwrap());
            }
        });
    });

    group.bench_function("dense_write", |b| {
        let mut bmp = Bitmap32::new(W, H, 0).unwrap();
        let mut color = 0u32;
        b.iter(|| {
            color = color.wrapping_add(1);
            for y in 0..H as i64 {
                bmp.set_pixel(y, y, color).unwrap();
            }
        });
    });

    group.bench_function("sparse_list_write", |b| {
        let mut bmp: CompressedBitmap<u32, Sparse> = CompressedBitmap::new(W, H, 0).unwrap();
        let mut color = 0u32;
        b.iter(|| {
            color = color.wrapping_add(1);
            for y in 0..H as i64 {
                bmp.set_pixel(y, y, color).unwrap();
            }
        });
    });

    group.bench_function("sparse_splice_write", |b| {
        let mut bmp = SparseBitmap::new(W, H, 0u32).unwrap();
        let mut color = 0u32;
        b.iter(|| {
            color = color.wrapping_add(1);
            for y in 0..H as i64 {
                bmp.set_pixel(y, y, color).unwrap();
            }
        });
    });
    group.finish();
}

fn bench_optimize(c: &mut Criterion) {
    let mut group = c.benchmark_group("optimize");
    let noise = noise_row();
    let mut bmp = Bitmap32::new(W, 256, 0).unwrap();
    for y in 0..256 {
        bmp.write_span_unclipped(0, y, &noise).unwrap();
    }
    bmp.flush().unwrap();
    group.throughput(Throughput::Bytes(bmp.compressed_size_used() as u64));
    group.bench_function("full", |b| b.iter(|| bmp.optimize(true).unwrap()));
    group.finish();
}

fn main() {
    print_ratios();

    let mut criterion = Criterion::default().configure_from_args();
    bench_rows(&mut criterion);
    bench_row_switch(&mut criterion);
    bench_optimize(&mut criterion);
    criterion.final_summary();
}
