use criterion::{black_box, criterion_group, criterion_main, Criterion};
use stratum_animation_core::{
    evaluate_animation, evaluate_animation_result, Animation, DataBlock, EvalContext,
    KeyframeSettings, MixMode, OutputIndex, StripType,
};

const LAYERS: usize = 4;
const COMPONENTS: i32 = 3;
const KEYS: usize = 120;

fn build_animation(object: &DataBlock) -> (Animation, OutputIndex) {
    let mut anim = Animation::new();
    let out = anim.output_add_for(object);
    let settings = KeyframeSettings::default();

    for l in 0..LAYERS {
        let layer = anim.layer_add(&format!("layer{l}"));
        layer.mix_mode = if l % 2 == 0 { MixMode::Add } else { MixMode::Combine };
        layer.set_influence(0.75);
        let strip = layer.strip_add(StripType::Keyframe);
        for path in ["location", "rotation_euler", "scale"] {
            for idx in 0..COMPONENTS {
                for k in 0..KEYS {
                    let t = k as f32 * 2.0;
                    let v = (t * 0.1 + idx as f32 + l as f32).sin();
                    strip
                        .keyframe_insert(out, path, idx, (t, v), &settings)
                        .expect("finite key");
                }
            }
        }
    }
    (anim, out)
}

fn bench_evaluate(c: &mut Criterion) {
    let mut object = DataBlock::new("OBBench")
        .with_property("location", &[0.0; 3])
        .with_property("rotation_euler", &[0.0; 3])
        .with_property("scale", &[1.0; 3]);
    let (anim, out) = build_animation(&object);

    c.bench_function("evaluate_animation_result", |b| {
        let mut t = 0.0f32;
        b.iter(|| {
            t = (t + 0.37) % (KEYS as f32 * 2.0);
            let result =
                evaluate_animation_result(&object, &anim, out, &EvalContext::new(black_box(t)));
            black_box(result.len())
        })
    });

    c.bench_function("evaluate_animation_apply", |b| {
        let mut t = 0.0f32;
        b.iter(|| {
            t = (t + 0.37) % (KEYS as f32 * 2.0);
            let result =
                evaluate_animation(&mut object, &anim, out, &EvalContext::new(black_box(t)), false);
            black_box(result.len())
        })
    });
}

criterion_group!(benches, bench_evaluate);
criterion_main!(benches);
