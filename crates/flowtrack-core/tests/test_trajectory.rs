mod common;

use common::{
    textured_frame, uniform_frame, FailingTracker, ScriptedTracker, ShiftTracker, ShortTracker,
};
use flowtrack_core::error::FlowTrackError;
use flowtrack_core::flow::build_trajectories;
use flowtrack_core::frame::Frame;
use flowtrack_core::pipeline::config::{FlowConfig, TrackerConfig};
use flowtrack_core::point::Point2D;
use flowtrack_core::track::PyramidalLk;

fn blank_sequence(count: usize, width: usize, height: usize) -> Vec<Frame> {
    (0..count).map(|_| uniform_frame(width, height, 0.5)).collect()
}

// ---------------------------------------------------------------------------
// Completeness
// ---------------------------------------------------------------------------

#[test]
fn test_shift_keeps_only_points_clear_of_border() {
    // Seeds (0,0) (0,25) (25,0) (25,25); only (25,25) stays inside the
    // 10 px band for both transitions.
    let frames = blank_sequence(3, 50, 50);
    let result =
        build_trajectories(&frames, &FlowConfig::with_step(25), &ShiftTracker::new(5.0, 5.0))
            .unwrap();

    assert_eq!(result.seeded, 4);
    assert_eq!(result.trajectories.len(), 1);
    assert_eq!(
        result.trajectories[0].points,
        vec![
            Point2D::new(25.0, 25.0),
            Point2D::new(30.0, 30.0),
            Point2D::new(35.0, 35.0),
        ]
    );
}

#[test]
fn test_every_trajectory_has_one_point_per_frame() {
    let frames = blank_sequence(5, 100, 100);
    let result =
        build_trajectories(&frames, &FlowConfig::with_step(20), &ShiftTracker::new(1.0, 0.0))
            .unwrap();

    assert!(!result.trajectories.is_empty());
    for t in &result.trajectories {
        assert!(t.is_complete(5));
    }
}

#[test]
fn test_invalid_point_is_dropped() {
    let frames = blank_sequence(3, 100, 100);
    // Point 3 is (50, 50); lose it on the first transition only.
    let tracker = ScriptedTracker::new(|transition, index, p| {
        let valid = !(transition == 0 && index == 3);
        (Point2D::new(p.x + 1.0, p.y), valid)
    });
    let result = build_trajectories(&frames, &FlowConfig::with_step(50), &tracker).unwrap();

    assert_eq!(tracker.calls(), 2);
    assert!(result
        .trajectories
        .iter()
        .all(|t| t.first() != Some(&Point2D::new(50.0, 50.0))));
}

#[test]
fn test_invalid_point_keeps_previous_position() {
    let frames = blank_sequence(3, 100, 100);
    let tracker = ScriptedTracker::new(|transition, index, p| {
        if index == 3 && transition == 1 {
            // Second transition sees the position kept from the first.
            assert_eq!(p, Point2D::new(50.0, 50.0));
        }
        let valid = !(transition == 0 && index == 3);
        (Point2D::new(p.x + 2.0, p.y), valid)
    });
    build_trajectories(&frames, &FlowConfig::with_step(50), &tracker).unwrap();
    assert_eq!(tracker.calls(), 2);
}

#[test]
fn test_border_exit_on_last_transition_excludes_point() {
    let frames = blank_sequence(3, 100, 100);
    // Point 3 (50, 50) jumps to the right edge on the final transition.
    let tracker = ScriptedTracker::new(|transition, index, p| match (transition, index) {
        (1, 3) => (Point2D::new(95.0, p.y), true),
        _ => (p, true),
    });
    let result = build_trajectories(&frames, &FlowConfig::with_step(50), &tracker).unwrap();

    assert!(result.trajectories.is_empty());
    let v = result.field.get(50, 50).unwrap();
    assert_eq!((v.dx, v.dy), (45.0, 0.0));
}

#[test]
fn test_single_frame_yields_seed_trajectories() {
    let frames = blank_sequence(1, 40, 40);
    let tracker = ScriptedTracker::new(|_, _, p| (p, true));
    let result = build_trajectories(&frames, &FlowConfig::with_step(10), &tracker).unwrap();

    assert_eq!(tracker.calls(), 0);
    assert_eq!(result.trajectories.len(), 16);
    assert!(result.trajectories.iter().all(|t| t.len() == 1));
    assert_eq!(result.field.populated_count(), 0);
}

// ---------------------------------------------------------------------------
// Final-transition field
// ---------------------------------------------------------------------------

#[test]
fn test_field_distinguishes_lost_stationary_and_moving() {
    let frames = blank_sequence(2, 100, 100);
    let tracker = ScriptedTracker::new(|_, index, p| match index {
        0 => (p, false),
        1 => (Point2D::new(p.x + 0.5, p.y - 0.5), true),
        _ => (Point2D::new(p.x + 3.0, p.y), true),
    });
    let result = build_trajectories(&frames, &FlowConfig::with_step(50), &tracker).unwrap();

    // (0,0) lost, (0,50) stationary, (50,0) and (50,50) moving.
    assert!(result.field.get(0, 0).unwrap().is_lost());
    let stationary = result.field.get(50, 0).unwrap();
    assert!(!stationary.is_lost() && stationary.is_zero());
    assert_eq!(result.field.get(0, 50).unwrap().dx, 3.0);
    assert_eq!(result.significant_vectors, 2);
    assert_eq!(result.field.populated_count(), 4);
}

#[test]
fn test_field_threshold_is_strict() {
    let frames = blank_sequence(2, 20, 20);
    let tracker = ScriptedTracker::new(|_, _, p| (Point2D::new(p.x + 1.0, p.y - 1.0), true));
    let result = build_trajectories(&frames, &FlowConfig::with_step(10), &tracker).unwrap();

    assert_eq!(result.significant_vectors, 0);
    assert!(result.field.iter_populated().all(|(_, _, v)| v.is_zero()));
}

#[test]
fn test_field_records_at_carried_positions() {
    let frames = blank_sequence(3, 50, 50);
    let result =
        build_trajectories(&frames, &FlowConfig::with_step(25), &ShiftTracker::new(5.0, 5.0))
            .unwrap();

    assert_eq!(result.significant_vectors, 4);
    for (x, y) in [(5, 5), (5, 30), (30, 5), (30, 30)] {
        let v = result.field.get(y, x).unwrap();
        assert_eq!((v.dx, v.dy), (5.0, 5.0));
    }
}

// ---------------------------------------------------------------------------
// Errors
// ---------------------------------------------------------------------------

#[test]
fn test_empty_sequence_rejected() {
    let result = build_trajectories(&[], &FlowConfig::default(), &ShiftTracker::new(0.0, 0.0));
    assert!(matches!(result, Err(FlowTrackError::EmptySequence)));
}

#[test]
fn test_mismatched_frame_rejected() {
    let frames = vec![
        uniform_frame(30, 30, 0.5),
        uniform_frame(30, 30, 0.5),
        uniform_frame(31, 30, 0.5),
    ];
    let result = build_trajectories(&frames, &FlowConfig::default(), &ShiftTracker::new(0.0, 0.0));
    assert!(matches!(
        result,
        Err(FlowTrackError::DimensionMismatch { index: 2, .. })
    ));
}

#[test]
fn test_tracker_failure_propagates() {
    let frames = blank_sequence(2, 30, 30);
    let result = build_trajectories(&frames, &FlowConfig::default(), &FailingTracker);
    assert!(matches!(result, Err(FlowTrackError::TrackerFailure(_))));
}

#[test]
fn test_short_tracker_output_rejected() {
    let frames = blank_sequence(2, 30, 30);
    let result = build_trajectories(&frames, &FlowConfig::default(), &ShortTracker);
    assert!(matches!(result, Err(FlowTrackError::TrackerFailure(_))));
}

#[test]
fn test_zero_step_rejected() {
    let frames = blank_sequence(2, 30, 30);
    let config = FlowConfig {
        pixel_step: 0,
        ..Default::default()
    };
    assert!(build_trajectories(&frames, &config, &ShiftTracker::new(0.0, 0.0)).is_err());
}

// ---------------------------------------------------------------------------
// With the real tracker
// ---------------------------------------------------------------------------

#[test]
fn test_lucas_kanade_trajectories_are_deterministic() {
    let frames: Vec<Frame> = (0..3)
        .map(|i| textured_frame(80, 80, i as f32, 0.5 * i as f32))
        .collect();
    let tracker = PyramidalLk::new(TrackerConfig {
        window_size: 11,
        max_level: 2,
        ..Default::default()
    })
    .unwrap();
    let config = FlowConfig::with_step(16);

    let a = build_trajectories(&frames, &config, &tracker).unwrap();
    let b = build_trajectories(&frames, &config, &tracker).unwrap();
    assert_eq!(a.trajectories, b.trajectories);
    assert_eq!(a.significant_vectors, b.significant_vectors);
}

#[test]
fn test_trajectories_serialize_as_point_lists() {
    let frames = blank_sequence(2, 50, 50);
    let result =
        build_trajectories(&frames, &FlowConfig::with_step(25), &ShiftTracker::new(2.0, 0.0))
            .unwrap();

    let json = serde_json::to_value(&result.trajectories).unwrap();
    assert_eq!(json[0]["points"][0]["x"], 25.0);
    assert_eq!(json[0]["points"][1]["x"], 27.0);
}
