//! Animator playback tests: completion semantics, duration resolution and
//! binding behaviour.

use vitrine_engine::animation::{
    AnimationTracks, Curve, Easing, KeyValue, Keyframe, Track, TracksHandle,
};
use vitrine_engine::animator::{Animator, BindingTable};
use vitrine_engine::types::Range;

#[derive(Clone, Debug, Default)]
struct Props {
    value: f32,
    other: f32,
}

fn bindings() -> BindingTable<Props> {
    BindingTable::new()
        .bind_with_accessor(
            "value",
            |props: &mut Props, value: KeyValue| {
                if let Some(v) = value.as_scalar() {
                    props.value = v;
                }
            },
            |props| KeyValue::Scalar(props.value),
        )
        .bind("other", |props, value| {
            if let Some(v) = value.as_scalar() {
                props.other = v;
            }
        })
}

fn ramp_track(from: f32, to: f32, duration: impl Into<vitrine_engine::animation::TrackDuration>) -> Track {
    Track::new(
        Curve::new(vec![
            Keyframe::new(0.0, from, Easing::Linear),
            Keyframe::new(1.0, to, Easing::Linear),
        ]),
        duration,
    )
}

fn ramp_tracks(name: &str, from: f32, to: f32, seconds: f32) -> TracksHandle {
    AnimationTracks::new()
        .with_track(name, ramp_track(from, to, seconds))
        .into_handle()
}

#[test]
fn linear_ramp_scenario() {
    // Track 0 -> 10 over 2 seconds: halfway after 1s, done after 2s, with the
    // completion event delivered exactly once.
    let tracks = ramp_tracks("value", 0.0, 10.0, 2.0);
    let mut animator = Animator::new(bindings());
    let mut props = Props::default();

    animator.play(&tracks);
    assert!(animator.is_animating());

    assert!(animator.update(1.0, &mut props).is_none());
    assert!((props.value - 5.0).abs() < 1e-5, "halfway, got {}", props.value);

    let finished = animator.update(1.0, &mut props);
    assert!((props.value - 10.0).abs() < 1e-5, "end value, got {}", props.value);
    assert!(
        finished.is_some_and(|done| vitrine_engine::animation::same_tracks(&done, &tracks)),
        "completion fires once, with the played tracks"
    );
    assert!(!animator.is_animating());

    assert!(
        animator.update(1.0, &mut props).is_none(),
        "no second completion event"
    );
}

#[test]
fn completion_never_fires_from_play_or_seek() {
    let tracks = ramp_tracks("value", 0.0, 1.0, 1.0);
    let mut animator = Animator::new(bindings());
    let mut props = Props::default();

    animator.play(&tracks);
    animator.set_time(animator.length());
    assert!(
        animator.is_animating(),
        "seeking to the end must not finish by itself"
    );

    let finished = animator.update(0.0, &mut props);
    assert!(finished.is_some(), "the next update delivers completion");
    assert!((props.value - 1.0).abs() < 1e-5);
}

#[test]
fn negative_seek_implements_a_start_delay() {
    let tracks = ramp_tracks("value", 0.0, 1.0, 1.0);
    let mut animator = Animator::new(bindings());
    let mut props = Props { value: 0.5, other: 0.0 };

    animator.play(&tracks);
    animator.set_time(-1.0);

    animator.update(0.5, &mut props);
    assert_eq!(props.value, 0.0, "still clamped to the start during the delay");
    assert!(animator.is_animating());

    animator.update(1.0, &mut props);
    assert!((props.value - 0.5).abs() < 1e-5, "halfway after the delay elapsed");
}

#[test]
fn zero_duration_track_resolves_on_first_update() {
    let tracks = ramp_tracks("value", 0.0, 3.0, 0.0);
    let mut animator = Animator::new(bindings());
    let mut props = Props::default();

    animator.play(&tracks);
    let finished = animator.update(0.0, &mut props);

    assert_eq!(props.value, 3.0, "zero-length tracks evaluate at ratio 1");
    assert!(finished.is_some());
}

#[test]
fn range_durations_sample_once_per_play_and_stay_in_bounds() {
    let range = Range::new(0.5, 1.5);
    let tracks = AnimationTracks::new()
        .with_track("value", ramp_track(0.0, 1.0, range))
        .into_handle();

    let mut animator = Animator::new(bindings());
    let mut props = Props::default();
    let mut seen = Vec::new();

    for _ in 0..200 {
        animator.play(&tracks);
        let length = animator.length();
        assert!(
            range.contains(length),
            "sampled duration {length} outside [{}, {}]",
            range.min,
            range.max
        );

        // The sampled duration must hold for the whole playback.
        animator.update(0.1, &mut props);
        assert_eq!(animator.length(), length, "duration re-sampled mid-playback");
        animator.update(length, &mut props);

        seen.push(length);
    }

    let spread = seen.iter().cloned().fold(f32::NEG_INFINITY, f32::max)
        - seen.iter().cloned().fold(f32::INFINITY, f32::min);
    assert!(
        spread > 0.2,
        "200 samples from a 1s-wide range should spread out, got {spread}"
    );
}

#[test]
fn unbound_tracks_are_silently_skipped() {
    let tracks = AnimationTracks::new()
        .with_track("value", ramp_track(0.0, 1.0, 0.5))
        .with_track("missing_property", ramp_track(0.0, 9.0, 2.0))
        .into_handle();

    let mut animator = Animator::new(bindings());
    let mut props = Props::default();

    animator.play(&tracks);
    animator.update(0.25, &mut props);
    assert!((props.value - 0.5).abs() < 1e-5);
    assert_eq!(props.other, 0.0, "unrelated binding untouched");

    // The unbound 2s track still paces nothing: only bound tracks gate
    // completion, so the 0.5s bound track finishing ends the playback.
    let finished = animator.update(0.25, &mut props);
    assert!(finished.is_some(), "unbound tracks must not block completion");
}

#[test]
fn replaying_different_tracks_abandons_the_previous_playback() {
    let first = ramp_tracks("value", 0.0, 10.0, 1.0);
    let second = ramp_tracks("value", 0.0, -4.0, 1.0);

    let mut animator = Animator::new(bindings());
    let mut props = Props::default();

    animator.play(&first);
    animator.update(0.5, &mut props);

    animator.play(&second);
    let mut completions = 0;
    for _ in 0..20 {
        if let Some(done) = animator.update(0.1, &mut props) {
            completions += 1;
            assert!(
                vitrine_engine::animation::same_tracks(&done, &second),
                "only the replacing tracks may complete"
            );
        }
    }
    assert_eq!(completions, 1);
    assert!((props.value + 4.0).abs() < 1e-5);
}

#[test]
fn slowest_track_gates_completion() {
    let tracks = AnimationTracks::new()
        .with_track("value", ramp_track(0.0, 1.0, 0.2))
        .with_track("other", ramp_track(0.0, 2.0, 1.0))
        .into_handle();

    let mut animator = Animator::new(bindings());
    let mut props = Props::default();

    animator.play(&tracks);
    assert!(animator.update(0.5, &mut props).is_none());
    assert_eq!(props.value, 1.0, "fast track clamped at its end value");

    let finished = animator.update(0.5, &mut props);
    assert!(finished.is_some());
    assert_eq!(props.other, 2.0);
}

#[test]
fn unresolved_keyframes_read_the_live_property() {
    // Animate from "wherever the value sits" to 2.0.
    let tracks = AnimationTracks::new()
        .with_track(
            "value",
            Track::new(
                Curve::new(vec![
                    Keyframe::unresolved(0.0, Easing::Linear),
                    Keyframe::new(1.0, 2.0, Easing::Linear),
                ]),
                1.0,
            ),
        )
        .into_handle();

    let mut animator = Animator::new(bindings());
    let mut props = Props { value: 1.0, other: 0.0 };

    animator.play(&tracks);
    animator.update(0.5, &mut props);
    // Live value feedback: start resolves to the current value each frame,
    // so the property converges on the target.
    assert!(props.value > 1.0 && props.value < 2.0, "got {}", props.value);

    animator.update(0.5, &mut props);
    assert!((props.value - 2.0).abs() < 1e-5);
}
