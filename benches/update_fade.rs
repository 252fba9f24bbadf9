// Run with:  cargo bench --bench update_fade

use charlieplex_clock::clock_buffers::{ClockFrameBuffers, Region};
use charlieplex_clock::display::ClockDisplay;
use charlieplex_clock::sim::{NoDelay, ScanRecorder};
use charlieplex_clock::LED_COUNT;
use criterion::{criterion_group, criterion_main, Criterion, Throughput};
use std::hint::black_box;

fn update_fade(c: &mut Criterion) {
    let mut group = c.benchmark_group("update_fade");
    group.throughput(Throughput::Elements(LED_COUNT as u64));

    group.bench_function("all_regions_fading", |b| {
        let mut display = ClockDisplay::new(ScanRecorder::new(), NoDelay);
        let mut buffers = ClockFrameBuffers::new(&display);
        let fb = display.frame_buffer_mut();
        for region in Region::ALL {
            buffers.bind(region, fb).initialize_fade(1, 1_000);
        }

        let mut now = 0u32;
        b.iter(|| {
            // keep every view busy so each iteration does real work
            for region in Region::ALL {
                buffers.bind(region, fb).set_all_values(200);
            }
            now = now.wrapping_add(1_000);
            buffers.update_fade(black_box(&mut *fb), black_box(now));
        });
    });

    group.bench_function("idle", |b| {
        let mut display = ClockDisplay::new(ScanRecorder::new(), NoDelay);
        let mut buffers = ClockFrameBuffers::new(&display);
        let fb = display.frame_buffer_mut();

        let mut now = 0u32;
        b.iter(|| {
            now = now.wrapping_add(1_000);
            buffers.update_fade(black_box(&mut *fb), black_box(now));
        });
    });

    group.finish();
}

criterion_group!(benches, update_fade);
criterion_main!(benches);
