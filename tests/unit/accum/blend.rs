use super::*;

fn img(v: f32) -> ImageF32 {
    ImageF32::new(3, 2, [v, v * 0.5, 1.0 - v, 1.0])
}

#[test]
fn frame_zero_is_exact_replacement() {
    let new = img(0.3);
    let out = blend(&new, &img(0.9), AccumFrame::Index(0)).unwrap();
    assert_eq!(out, new);
}

#[test]
fn later_frames_average() {
    let (h, n) = (img(0.8), img(0.2));
    for k in [1u32, 2, 7, 100] {
        let out = blend(&n, &h, AccumFrame::Index(k)).unwrap();
        let kf = k as f32;
        let expected = 0.8 * kf / (kf + 1.0) + 0.2 / (kf + 1.0);
        for px in &out.data {
            assert!((px[0] - expected).abs() < 1e-6, "k={k}");
            assert!((px[3] - 1.0).abs() < 1e-6);
        }
    }
}

#[test]
fn converged_keeps_history() {
    let h = img(0.6);
    assert_eq!(blend(&img(0.1), &h, AccumFrame::Converged).unwrap(), h);
    assert_eq!(blend_weights(AccumFrame::Converged), (1.0, 0.0));
}

#[test]
fn size_mismatch_is_rejected() {
    let other = ImageF32::new(1, 1, [0.0; 4]);
    let err = blend(&img(0.1), &other, AccumFrame::Index(1)).unwrap_err();
    assert!(err.to_string().contains("validation error:"));
}

#[test]
fn buffer_converges_to_mean() {
    let mut buf = AccumulationBuffer::new();
    let samples = [0.0f32, 1.0, 0.5, 0.25];
    for (k, &v) in samples.iter().enumerate() {
        buf.accumulate(&img(v), AccumFrame::Index(k as u32));
    }
    let mean = samples.iter().sum::<f32>() / samples.len() as f32;
    let h = buf.history().unwrap();
    assert!((h.data[0][0] - mean).abs() < 1e-6);
}

#[test]
fn buffer_frame_zero_discards_history() {
    let mut buf = AccumulationBuffer::new();
    buf.accumulate(&img(0.9), AccumFrame::Index(0));
    buf.accumulate(&img(0.1), AccumFrame::Index(1));
    let out = buf.accumulate(&img(0.4), AccumFrame::Index(0)).clone();
    assert_eq!(out, img(0.4));
}

#[test]
fn buffer_replaces_on_resize_and_freezes_when_converged() {
    let mut buf = AccumulationBuffer::new();
    buf.accumulate(&img(0.9), AccumFrame::Index(0));
    let small = ImageF32::new(1, 1, [0.2; 4]);
    assert_eq!(buf.accumulate(&small, AccumFrame::Index(5)), &small);
    let frozen = buf.accumulate(&ImageF32::new(1, 1, [0.8; 4]), AccumFrame::Converged).clone();
    assert_eq!(frozen, small);
    buf.clear();
    assert!(buf.history().is_none());
}
