//! End-to-end pipeline run over synthetic frames.

use darttrack_rs::{DartPipeline, TrackEvent, TrackPhase};
use image::{Rgb, RgbImage};

const WIDTH: u32 = 640;
const HEIGHT: u32 = 480;
const BEACON_CENTER: (u32, u32) = (320, 400);

fn draw_blob(frame: &mut RgbImage, center: (u32, u32), half: u32, color: Rgb<u8>) {
    for y in center.1 - half..center.1 + half {
        for x in center.0 - half..center.0 + half {
            frame.put_pixel(x, y, color);
        }
    }
}

/// A black frame with the green beacon (unless occluded) and, optionally,
/// a red dart head.
fn synthetic_frame(dart_center: Option<(u32, u32)>, beacon_visible: bool) -> RgbImage {
    let mut frame = RgbImage::new(WIDTH, HEIGHT);
    if beacon_visible {
        draw_blob(&mut frame, BEACON_CENTER, 12, Rgb([0, 255, 0]));
    }
    if let Some(center) = dart_center {
        draw_blob(&mut frame, center, 20, Rgb([255, 0, 0]));
    }
    frame
}

#[test]
fn test_beacon_only_frame() {
    let mut pipeline = DartPipeline::with_default_config();
    let report = pipeline
        .process_frame(&synthetic_frame(None, true))
        .unwrap();

    assert!(report.beacon_visible);
    let (bx, by) = report.beacon_position.expect("beacon should be located");
    assert!((bx - BEACON_CENTER.0 as f32).abs() <= 4.0, "bx = {bx}");
    assert!((by - BEACON_CENTER.1 as f32).abs() <= 4.0, "by = {by}");

    assert!(report.candidates.is_empty());
    assert_eq!(report.phase, TrackPhase::Idle);
    assert!(report.event.is_none());
}

#[test]
fn test_dart_candidate_geometry() {
    let mut pipeline = DartPipeline::with_default_config();
    let report = pipeline
        .process_frame(&synthetic_frame(Some((300, 120)), true))
        .unwrap();

    assert_eq!(report.candidates.len(), 1);
    let dart = &report.candidates[0];
    assert!((dart.center.0 - 300.0).abs() <= 4.0);
    assert!((dart.center.1 - 120.0).abs() <= 4.0);
    // 40x40 blob, reported in original-frame units despite the downscale.
    assert!(
        dart.area > 1000.0 && dart.area < 2000.0,
        "area = {}",
        dart.area
    );
    assert!(dart.aspect_ratio < 1.5);
    assert!(dart.circularity > 0.5, "circularity = {}", dart.circularity);
}

#[test]
fn test_full_flight_with_occlusion() {
    let mut pipeline = DartPipeline::with_default_config();

    // Dart enters the upper-half zone: tracking starts.
    let report = pipeline
        .process_frame(&synthetic_frame(Some((300, 120)), true))
        .unwrap();
    assert!(matches!(
        report.event,
        Some(TrackEvent::TrackingStarted { .. })
    ));
    assert_eq!(report.phase, TrackPhase::Active);
    assert_eq!(report.active_trajectory.len(), 1);

    // Descent, with the beacon occluded for a few frames.
    for (i, y) in [200u32, 260, 320].into_iter().enumerate() {
        let report = pipeline
            .process_frame(&synthetic_frame(Some((302, y)), false))
            .unwrap();
        assert!(!report.beacon_visible);
        // Cached reference keeps the landing line available.
        assert!(report.beacon_reference.is_some());
        assert_eq!(report.phase, TrackPhase::Active);
        assert_eq!(report.active_trajectory.len(), i + 2);
    }

    // Reaches the beacon row while still occluded: lands on the cache.
    let report = pipeline
        .process_frame(&synthetic_frame(Some((306, 410)), false))
        .unwrap();
    assert!(matches!(report.event, Some(TrackEvent::Landed { .. })));
    assert_eq!(report.phase, TrackPhase::Idle);
    assert_eq!(report.completed_tracks.len(), 1);
    let landing = report.completed_tracks[0].landing_point;
    assert!((landing.0 - 306.0).abs() <= 4.0);
    assert!((landing.1 - 410.0).abs() <= 4.0);
}

#[test]
fn test_reset_clears_session() {
    let mut pipeline = DartPipeline::with_default_config();

    pipeline
        .process_frame(&synthetic_frame(Some((300, 120)), true))
        .unwrap();
    pipeline
        .process_frame(&synthetic_frame(Some((306, 410)), true))
        .unwrap();
    assert_eq!(pipeline.tracker().completed_tracks().len(), 1);

    pipeline.reset(false);
    let report = pipeline.process_frame(&synthetic_frame(None, true)).unwrap();
    assert_eq!(report.phase, TrackPhase::Idle);
    assert!(report.active_trajectory.is_empty());
    assert!(report.completed_tracks.is_empty());
    // The beacon cache is scene state and survives the reset.
    assert!(report.beacon_reference.is_some());
}
