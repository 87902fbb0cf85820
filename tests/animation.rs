//! Keyframe curve evaluation tests: clamping, easing and unresolved values.

use glam::{Vec2, Vec4};
use std::cell::Cell;
use vitrine_engine::animation::{Curve, Easing, KeyValue, Keyframe};

fn scalar(value: Option<KeyValue>) -> f32 {
    match value {
        Some(KeyValue::Scalar(v)) => v,
        other => panic!("expected scalar, got {:?}", other),
    }
}

fn two_point_curve(easing: Easing) -> Curve {
    Curve::new(vec![
        Keyframe::new(0.2, 1.0, easing),
        Keyframe::new(0.8, 5.0, Easing::Linear),
    ])
}

#[test]
fn evaluation_clamps_to_endpoints() {
    let curve = two_point_curve(Easing::Linear);

    assert_eq!(scalar(curve.evaluate(0.0, None)), 1.0, "before first keyframe");
    assert_eq!(scalar(curve.evaluate(0.2, None)), 1.0, "at first keyframe");
    assert_eq!(scalar(curve.evaluate(0.8, None)), 5.0, "at last keyframe");
    assert_eq!(scalar(curve.evaluate(1.0, None)), 5.0, "past last keyframe");
}

#[test]
fn easing_endpoints_are_exact() {
    for easing in [Easing::Linear, Easing::Exponential, Easing::InvExponential] {
        let curve = Curve::new(vec![
            Keyframe::new(0.0, 2.0, easing),
            Keyframe::new(1.0, 7.0, Easing::Linear),
        ]);
        assert_eq!(
            scalar(curve.evaluate(0.0, None)),
            2.0,
            "{easing:?} must start exactly at the start value"
        );
        assert_eq!(
            scalar(curve.evaluate(1.0, None)),
            7.0,
            "{easing:?} must end exactly at the end value"
        );
    }
}

#[test]
fn easing_shapes_midpoint() {
    let linear = two_point_curve(Easing::Linear);
    let ease_in = two_point_curve(Easing::Exponential);
    let ease_out = two_point_curve(Easing::InvExponential);

    // Halfway between the keyframes (ratio 0.5 -> local r = 0.5).
    let mid_linear = scalar(linear.evaluate(0.5, None));
    let mid_in = scalar(ease_in.evaluate(0.5, None));
    let mid_out = scalar(ease_out.evaluate(0.5, None));

    assert!((mid_linear - 3.0).abs() < 1e-5, "linear midpoint, got {mid_linear}");
    // r' = 0.25 -> 1 + 0.25 * 4
    assert!((mid_in - 2.0).abs() < 1e-5, "exponential midpoint, got {mid_in}");
    // r' = 0.75 -> 1 + 0.75 * 4
    assert!((mid_out - 4.0).abs() < 1e-5, "inv-exponential midpoint, got {mid_out}");
}

#[test]
fn unresolved_start_uses_accessor_value() {
    let curve = Curve::new(vec![
        Keyframe::unresolved(0.0, Easing::Linear),
        Keyframe::new(1.0, 10.0, Easing::Linear),
    ]);

    let mut accessor = || KeyValue::Scalar(4.0);
    assert_eq!(
        scalar(curve.evaluate(0.0, Some(&mut accessor))),
        4.0,
        "ratio 0 must return exactly the live value"
    );

    let mut accessor = || KeyValue::Scalar(4.0);
    let mid = scalar(curve.evaluate(0.5, Some(&mut accessor)));
    assert!((mid - 7.0).abs() < 1e-5, "lerp from live value, got {mid}");
}

#[test]
fn accessor_is_not_called_for_literal_endpoints() {
    let curve = Curve::new(vec![
        Keyframe::new(0.0, 1.0, Easing::Linear),
        Keyframe::new(1.0, 3.0, Easing::Linear),
    ]);

    let calls = Cell::new(0u32);
    let mut accessor = || {
        calls.set(calls.get() + 1);
        KeyValue::Scalar(99.0)
    };

    for ratio in [0.0, 0.25, 0.5, 1.0] {
        curve.evaluate(ratio, Some(&mut accessor));
    }
    assert_eq!(calls.get(), 0, "literal endpoints must not consult the accessor");
}

#[test]
fn unresolved_without_accessor_yields_nothing() {
    let curve = Curve::new(vec![
        Keyframe::unresolved(0.0, Easing::Linear),
        Keyframe::new(1.0, 3.0, Easing::Linear),
    ]);
    assert!(
        curve.evaluate(0.5, None).is_none(),
        "an unresolved endpoint with no accessor is skipped, not a panic"
    );
}

#[test]
fn vector_values_interpolate_component_wise() {
    let curve = Curve::new(vec![
        Keyframe::new(0.0, Vec4::new(0.0, 10.0, -2.0, 1.0), Easing::Linear),
        Keyframe::new(1.0, Vec4::new(4.0, 0.0, 2.0, 1.0), Easing::Linear),
    ]);

    match curve.evaluate(0.5, None) {
        Some(KeyValue::Vector4(v)) => {
            assert!((v - Vec4::new(2.0, 5.0, 0.0, 1.0)).abs().max_element() < 1e-5);
        }
        other => panic!("expected Vector4, got {:?}", other),
    }

    let v2 = KeyValue::lerp(
        &KeyValue::Vector2(Vec2::ZERO),
        &KeyValue::Vector2(Vec2::new(2.0, 6.0)),
        0.25,
    );
    assert_eq!(v2, KeyValue::Vector2(Vec2::new(0.5, 1.5)));
}

#[test]
fn multi_segment_curve_picks_the_bracketing_pair() {
    let curve = Curve::new(vec![
        Keyframe::new(0.0, 0.0, Easing::Linear),
        Keyframe::new(0.5, 10.0, Easing::Linear),
        Keyframe::new(1.0, 0.0, Easing::Linear),
    ]);

    assert!((scalar(curve.evaluate(0.25, None)) - 5.0).abs() < 1e-5);
    assert!((scalar(curve.evaluate(0.75, None)) - 5.0).abs() < 1e-5);
    assert_eq!(scalar(curve.evaluate(0.5, None)), 10.0);
}
