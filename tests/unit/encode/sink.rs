use super::*;

fn frame(v: u8) -> FrameRGBA {
    FrameRGBA {
        width: 1,
        height: 1,
        data: vec![v, v, v, 255],
    }
}

fn cfg() -> SinkConfig {
    SinkConfig {
        width: 1,
        height: 1,
        frame_count: 2,
    }
}

#[test]
fn captures_frames_in_order() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame(1)).unwrap();
    sink.push_frame(FrameIndex(1), &frame(2)).unwrap();
    sink.end().unwrap();

    assert!(sink.is_finished());
    assert_eq!(sink.config(), Some(cfg()));
    let frames = sink.into_frames();
    assert_eq!(frames, vec![frame(1), frame(2)]);
}

#[test]
fn rejects_push_before_begin_and_after_end() {
    let mut sink = InMemorySink::new();
    assert!(matches!(
        sink.push_frame(FrameIndex(0), &frame(0)),
        Err(CountdownError::Encode(_))
    ));

    sink.begin(cfg()).unwrap();
    sink.end().unwrap();
    assert!(sink.push_frame(FrameIndex(0), &frame(0)).is_err());
    assert!(sink.end().is_err());
}

#[test]
fn rejects_out_of_order_frames() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(3), &frame(0)).unwrap();
    assert!(sink.push_frame(FrameIndex(3), &frame(0)).is_err());
    assert!(sink.push_frame(FrameIndex(2), &frame(0)).is_err());
}

#[test]
fn begin_resets_previous_capture() {
    let mut sink = InMemorySink::new();
    sink.begin(cfg()).unwrap();
    sink.push_frame(FrameIndex(0), &frame(9)).unwrap();
    sink.end().unwrap();

    sink.begin(cfg()).unwrap();
    assert!(sink.frames().is_empty());
    assert!(!sink.is_finished());
}
