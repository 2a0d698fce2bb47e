//! Benchmark suite for the container codecs
//!
//! Run with: cargo bench --manifest-path benches/Cargo.toml
//!
//! For flamegraph profiling:
//! cargo bench --manifest-path benches/Cargo.toml -- --profile-time=5

use std::hint::black_box;
use std::io::{Cursor, Read, Seek, SeekFrom};

use criterion::{BenchmarkId, Criterion, Throughput, criterion_group, criterion_main};
use cvn_benches::{generate_bitmap, generate_palette, generate_plaintext, generate_raw_audio};
use cvn_types::file::{BitmapFile, Container, VirtualWavStream, xor};

/// Benchmark the XOR key schedule over buffers of increasing size
fn bench_xor(c: &mut Criterion) {
	let mut group = c.benchmark_group("xor");

	for size in [1024usize, 64 * 1024, 1024 * 1024] {
		let data = generate_plaintext(size);
		group.throughput(Throughput::Bytes(size as u64));
		group.bench_with_input(BenchmarkId::new("apply", size), &data, |b, data| {
			b.iter(|| black_box(xor::apply(black_box(data))));
		});
		group.bench_with_input(BenchmarkId::new("reader", size), &data, |b, data| {
			b.iter(|| {
				let mut out = Vec::with_capacity(data.len());
				xor::XorReader::new(black_box(data.as_slice())).read_to_end(&mut out).unwrap();
				black_box(out)
			});
		});
	}

	group.finish();
}

/// Benchmark bitmap decode and encode for both pixel formats
fn bench_bitmap(c: &mut Criterion) {
	let mut group = c.benchmark_group("bitmap");
	let palette = generate_palette();

	for (name, raw_format) in [("indexed", 0x08u8), ("truecolor", 0x20)] {
		let data = generate_bitmap(raw_format, 640, 480, 16);
		group.throughput(Throughput::Elements(640 * 480));

		group.bench_with_input(BenchmarkId::new("decode", name), &data, |b, data| {
			b.iter(|| {
				let result = BitmapFile::from_bytes(black_box(data), Some(palette.as_slice()));
				black_box(result)
			});
		});

		let mut bitmap = BitmapFile::from_bytes(&data, Some(palette.as_slice())).unwrap();
		group.bench_function(BenchmarkId::new("encode", name), |b| {
			b.iter(|| black_box(bitmap.to_bytes()));
		});

		group.bench_function(BenchmarkId::new("to_rgba", name), |b| {
			b.iter(|| black_box(bitmap.to_rgba_image()));
		});
	}

	group.finish();
}

/// Benchmark random-access reads through the virtual WAV view
fn bench_virtual_wav(c: &mut Criterion) {
	let mut group = c.benchmark_group("virtual_wav");
	let raw = generate_raw_audio(256 * 1024);

	group.throughput(Throughput::Bytes(raw.len() as u64));
	group.bench_function("read_all", |b| {
		let mut stream = VirtualWavStream::new(Cursor::new(raw.clone())).unwrap();
		b.iter(|| {
			let mut out = Vec::with_capacity(raw.len() + 0x1C);
			stream.seek(SeekFrom::Start(0)).unwrap();
			stream.read_to_end(&mut out).unwrap();
			black_box(out)
		});
	});

	group.bench_function("seek_read_4k", |b| {
		let mut stream = VirtualWavStream::new(Cursor::new(raw.clone())).unwrap();
		let mut buf = [0u8; 4096];
		b.iter(|| {
			for offset in (0..stream.len()).step_by(64 * 1024) {
				stream.seek(SeekFrom::Start(black_box(offset))).unwrap();
				black_box(stream.read(&mut buf).unwrap());
			}
		});
	});

	group.finish();
}

criterion_group!(benches, bench_xor, bench_bitmap, bench_virtual_wav);
criterion_main!(benches);
