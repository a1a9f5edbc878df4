use bvh_motion::{load_bvh_from_string, Skeleton};
use criterion::{black_box, criterion_group, criterion_main, Criterion};

/// A humanoid-sized file: a root plus `chains` chains of `links` joints, `frames` frames.
fn synthetic_bvh(chains: usize, links: usize, frames: usize) -> String {
    let mut text = String::from("HIERARCHY\nROOT Hips\n{\n  OFFSET 0 0 0\n");
    text.push_str("  CHANNELS 6 Xposition Yposition Zposition Zrotation Xrotation Yrotation\n");
    let mut channels = 6;
    for c in 0..chains {
        for l in 0..links {
            text.push_str(&format!(
                "JOINT chain{}_{}\n{{\n  OFFSET 0 {} 0\n  CHANNELS 3 Zrotation Xrotation Yrotation\n",
                c, l, l + 1
            ));
            channels += 3;
        }
        text.push_str("End Site\n{\n  OFFSET 0 1 0\n}\n");
        for _ in 0..links {
            text.push_str("}\n");
        }
    }
    text.push_str(&format!("}}\nMOTION\nFrames: {}\nFrame Time: 0.008333\n", frames));
    for f in 0..frames {
        let line: Vec<String> = (0..channels)
            .map(|i| format!("{:.4}", (f * channels + i) as f64 * 0.01))
            .collect();
        text.push_str(&line.join(" "));
        text.push('\n');
    }
    text
}

pub fn criterion_benchmark(c: &mut Criterion) {
    let text = synthetic_bvh(5, 4, 1000);

    let mut group = c.benchmark_group("sample-size-example");
    group.sample_size(10);
    group.bench_function("parse 1000 frames", |b| {
        b.iter(|| load_bvh_from_string(black_box(&text)).unwrap())
    });
    group.finish();

    let mut skeleton: Skeleton = load_bvh_from_string(&text).unwrap();
    c.bench_function("evaluate every frame", |b| {
        b.iter(|| {
            for pos in 0..skeleton.num_frames() {
                black_box(skeleton.evaluate_at(pos));
            }
        })
    });
}

criterion_group!(benches, criterion_benchmark);
criterion_main!(benches);
