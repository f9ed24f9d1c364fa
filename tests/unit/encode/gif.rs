use image::AnimationDecoder;

use super::*;
use crate::{
    chart::PedigreeChart,
    pedigree::{record::HorseRecord, store::PedigreeRecordStore},
    render::settings::ChartSettings,
};

fn circle() -> CircularChart {
    let store = PedigreeRecordStore::from_records([
        HorseRecord::new("A", Some("B"), Some("C")),
        HorseRecord::new("B", None, None),
        HorseRecord::new("C", None, None),
    ]);
    let chart = PedigreeChart::prepare(&store, "A", 1).unwrap();
    let settings = ChartSettings {
        image_size_px: 64,
        ..ChartSettings::default()
    };
    CircularChart::new(&chart, &settings).unwrap()
}

fn config(max_bytes: usize) -> GifConfig {
    GifConfig {
        delay_ms: 50,
        max_bytes,
        threads: Some(2),
    }
}

fn decoded_frames(bytes: &[u8]) -> Vec<image::Frame> {
    image::codecs::gif::GifDecoder::new(std::io::Cursor::new(bytes))
        .unwrap()
        .into_frames()
        .collect_frames()
        .unwrap()
}

#[test]
fn config_follows_animation_settings() {
    let cfg = GifConfig::from_settings(&AnimationSettings::default());
    assert_eq!(cfg.delay_ms, 41);
    assert_eq!(cfg.max_bytes, 15 * 1024 * 1024);
    cfg.validate().unwrap();
    assert!(config(0).validate().is_err());
    assert!(
        GifConfig {
            threads: Some(0),
            ..config(10)
        }
        .validate()
        .is_err()
    );
}

#[test]
fn encode_gif_keeps_every_frame() {
    let chart = circle();
    let frames: Vec<_> = [0.0, -120.0, -240.0]
        .iter()
        .map(|a| chart.render_disc(*a).unwrap())
        .collect();
    let bytes = encode_gif(&frames, 50).unwrap();
    assert_eq!(&bytes[..6], b"GIF89a");
    let back = decoded_frames(&bytes);
    assert_eq!(back.len(), 3);
    assert_eq!(back[0].buffer().dimensions(), (64, 64));
    assert!(matches!(encode_gif(&[], 50), Err(BloodlineError::Encode(_))));
}

#[test]
fn rotating_gif_fits_the_budget_without_thinning() {
    let seq = RotationSequence::from_timing(0.5, 8).unwrap();
    let out = render_rotating_gif(&circle(), seq, &config(usize::MAX)).unwrap();
    assert_eq!((out.frames, out.step), (4, 1));
    assert_eq!(decoded_frames(&out.bytes).len(), 4);
}

#[test]
fn oversized_gif_is_thinned_down_to_two_frames() {
    let seq = RotationSequence::from_timing(0.5, 8).unwrap();
    let out = render_rotating_gif(&circle(), seq, &config(1)).unwrap();
    assert_eq!((out.frames, out.step), (2, 2));
}

#[test]
fn single_frame_sequence_is_a_still_gif() {
    let seq = RotationSequence::from_timing(0.0, 24).unwrap();
    let out = render_rotating_gif(&circle(), seq, &config(1)).unwrap();
    assert_eq!((out.frames, out.step), (1, 1));
}

#[test]
fn worker_parse_failures_keep_the_cause() {
    let chart = circle();
    let pool = build_thread_pool(Some(2)).unwrap();
    let err = render_chunk(&chart, "<not-svg", &[0.0, 90.0], &pool).unwrap_err();
    assert!(matches!(err, BloodlineError::Render(_)));
    let msg = err.to_string();
    assert!(msg.contains("worker failed to parse chart svg: parse chart svg"), "{msg}");
}
