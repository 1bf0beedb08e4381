use stratum_animation_core::{
    apply_evaluation_result, assign_animation, evaluate_animation, evaluate_animation_result,
    evaluate_assigned, Animation, AnimationLibrary, Config, DataBlock, EvalContext, Interpolation,
    KeyframeSettings, MixMode, OutputIndex, StripType,
};

fn approx(a: f32, b: f32, eps: f32) {
    assert!((a - b).abs() <= eps, "left={a} right={b} eps={eps}");
}

fn linear() -> KeyframeSettings {
    KeyframeSettings {
        interpolation: Interpolation::Linear,
        ..Default::default()
    }
}

/// Add a layer with one keyframe strip holding a constant `location[0]` key.
fn add_constant_layer(anim: &mut Animation, out: OutputIndex, name: &str, value: f32) {
    anim.layer_add(name)
        .strip_add(StripType::Keyframe)
        .keyframe_insert(out, "location", 0, (1.0, value), &linear())
        .expect("insert");
}

fn two_layer_blend(mix_mode: MixMode) -> f32 {
    let mut anim = Animation::new();
    let out = anim.output_add().stable_index();
    add_constant_layer(&mut anim, out, "base", 10.0);
    add_constant_layer(&mut anim, out, "top", 4.0);
    let top = anim.layer_mut(1).expect("layer");
    top.set_influence(0.5);
    top.mix_mode = mix_mode;

    let object = DataBlock::new("OBCube").with_property("location", &[0.0, 0.0, 0.0]);
    let result = evaluate_animation_result(&object, &anim, out, &EvalContext::new(1.0));
    result.value("location", 0).expect("location[0]")
}

#[test]
fn blend_arithmetic_per_mix_mode() {
    approx(two_layer_blend(MixMode::Add), 12.0, 1e-6);
    approx(two_layer_blend(MixMode::Override), 2.0, 1e-6);
    approx(two_layer_blend(MixMode::Combine), 7.0, 1e-6);
    approx(two_layer_blend(MixMode::Subtract), 8.0, 1e-6);
    approx(two_layer_blend(MixMode::Multiply), 20.0, 1e-6);
}

#[test]
fn first_contributing_layer_ignores_influence_and_mode() {
    let mut anim = Animation::new();
    let out = anim.output_add().stable_index();
    add_constant_layer(&mut anim, out, "base", 10.0);
    let base = anim.layer_mut(0).expect("layer");
    base.set_influence(0.25);
    base.mix_mode = MixMode::Multiply;

    let object = DataBlock::new("OBCube").with_property("location", &[0.0]);
    let result = evaluate_animation_result(&object, &anim, out, &EvalContext::new(1.0));
    assert_eq!(result.value("location", 0), Some(10.0));
}

#[test]
fn zero_influence_layers_are_skipped() {
    let mut anim = Animation::new();
    let out = anim.output_add().stable_index();
    add_constant_layer(&mut anim, out, "muted", 100.0);
    add_constant_layer(&mut anim, out, "base", 10.0);
    anim.layer_mut(0).expect("layer").set_influence(0.0);
    anim.layer_mut(1).expect("layer").mix_mode = MixMode::Add;

    let object = DataBlock::new("OBCube").with_property("location", &[0.0]);
    let result = evaluate_animation_result(&object, &anim, out, &EvalContext::new(1.0));
    assert_eq!(result.value("location", 0), Some(10.0));
}

#[test]
fn end_to_end_midpoint() {
    let mut anim = Animation::new();
    let mut cube = DataBlock::new("OBCube").with_property("location", &[-3.0, 0.0, 0.0]);
    let out = anim.output_add_for(&cube);

    let strip = anim.layer_add("L").strip_add(StripType::Keyframe);
    strip
        .keyframe_insert(out, "location", 0, (1.0, 47.0), &linear())
        .expect("insert");
    strip
        .keyframe_insert(out, "location", 0, (5.0, 47.1), &linear())
        .expect("insert");

    let result = evaluate_animation_result(&cube, &anim, out, &EvalContext::new(3.0));
    approx(result.value("location", 0).expect("value"), 47.05, 1e-4);
    assert_eq!(cube.property_value("location", 0), Some(-3.0));

    apply_evaluation_result(&mut cube, &result, false);
    approx(cube.property_value("location", 0).expect("value"), 47.05, 1e-4);
}

#[test]
fn evaluation_only_writes_blended_properties() {
    let mut anim = Animation::new();
    let out = anim.output_add().stable_index();
    add_constant_layer(&mut anim, out, "base", 10.0);

    let mut cube = DataBlock::new("OBCube")
        .with_property("location", &[1.0, 2.0, 3.0])
        .with_property("scale", &[1.0, 1.0, 1.0]);
    let before = cube.clone();

    let result = evaluate_animation_result(&cube, &anim, out, &EvalContext::new(1.0));
    assert_eq!(cube, before);
    assert_eq!(result.len(), 1);

    evaluate_animation(&mut cube, &anim, out, &EvalContext::new(1.0), false);
    assert_eq!(cube.property("location"), Some(&[10.0, 2.0, 3.0][..]));
    assert_eq!(cube.property("scale"), before.property("scale"));
}

#[test]
fn nothing_resolves_means_nothing_changes() {
    let mut anim = Animation::new();
    let out = anim.output_add().stable_index();
    add_constant_layer(&mut anim, out, "base", 10.0);

    let mut empty = DataBlock::new("OBEmpty").with_property("scale", &[1.0]);
    let before = empty.clone();
    let result = evaluate_animation(&mut empty, &anim, out, &EvalContext::new(1.0), true);
    assert!(result.is_empty());
    assert_eq!(empty, before);

    // Unknown outputs contribute nothing either.
    let result = evaluate_animation(&mut empty, &anim, OutputIndex(99), &EvalContext::new(1.0), false);
    assert!(result.is_empty());
}

#[test]
fn flush_writes_the_original_too() {
    let mut anim = Animation::new();
    let out = anim.output_add().stable_index();
    add_constant_layer(&mut anim, out, "base", 10.0);

    // The original lays properties out differently; handles must be re-resolved.
    let original = DataBlock::new("OBCube")
        .with_property("scale", &[1.0])
        .with_property("location", &[0.0, 0.0]);
    let mut evaluated = DataBlock::new("OBCube").with_property("location", &[0.0, 0.0]);
    evaluated.set_original(original);

    evaluate_animation(&mut evaluated, &anim, out, &EvalContext::new(1.0), false);
    assert_eq!(evaluated.property_value("location", 0), Some(10.0));
    assert_eq!(
        evaluated.original().and_then(|o| o.property_value("location", 0)),
        Some(0.0)
    );

    evaluate_animation(&mut evaluated, &anim, out, &EvalContext::new(1.0), true);
    let original = evaluated.original().expect("original");
    assert_eq!(original.property_value("location", 0), Some(10.0));
    assert_eq!(original.property("scale"), Some(&[1.0][..]));
}

#[test]
fn evaluate_assigned_uses_the_side_table() {
    let mut lib = AnimationLibrary::new();
    let mut anim = Animation::new();
    let out = anim.output_add().stable_index();
    anim.output_name_set(out, "OBCube");
    add_constant_layer(&mut anim, out, "base", 10.0);
    let anim_id = lib.add(anim);

    let mut cube = DataBlock::new("OBCube").with_property("location", &[0.0]);
    let ctx = EvalContext::new(1.0);
    assert!(evaluate_assigned(&lib, &mut cube, &ctx, false).is_none());

    assign_animation(&mut lib, anim_id, &mut cube).expect("assign");
    let result = evaluate_assigned(&lib, &mut cube, &ctx, false).expect("assigned");
    assert_eq!(result.value("location", 0), Some(10.0));
    assert_eq!(cube.property_value("location", 0), Some(10.0));

    let batch = result.to_write_batch();
    assert_eq!(batch.len(), 1);
    assert_eq!(batch.value_of("location", 0), Some(10.0));
}

#[test]
fn bezier_keys_use_user_preferences() {
    let cfg = Config::default();
    let settings = cfg.keyframe_settings(true);

    let mut anim = Animation::new();
    let out = anim.output_add().stable_index();
    let strip = anim.layer_add("L").strip_add(StripType::Keyframe);
    for (t, v) in [(0.0, 0.0), (10.0, 10.0), (20.0, 0.0)] {
        strip
            .keyframe_insert(out, "location", 0, (t, v), &settings)
            .expect("insert");
    }

    let object = DataBlock::new("OBCube").with_property("location", &[0.0]);
    let at_peak = evaluate_animation_result(&object, &anim, out, &EvalContext::new(10.0));
    approx(at_peak.value("location", 0).expect("value"), 10.0, 1e-5);

    // Auto-clamped handles keep the curve from overshooting the peak.
    for t in [9.0, 11.0] {
        let r = evaluate_animation_result(&object, &anim, out, &EvalContext::new(t));
        assert!(r.value("location", 0).expect("value") <= 10.0 + 1e-5);
    }
}
