use std::io::BufReader;
use std::time::Duration;

use image::AnimationDecoder;

use super::*;

fn solid(w: u32, h: u32, rgba: [u8; 4]) -> FrameRGBA {
    FrameRGBA {
        width: w,
        height: h,
        data: rgba.repeat((w * h) as usize),
    }
}

fn cfg(w: u32, h: u32, n: u32) -> SinkConfig {
    SinkConfig {
        width: w,
        height: h,
        frame_count: n,
    }
}

fn decode(path: &Path) -> Vec<image::Frame> {
    let file = BufReader::new(File::open(path).unwrap());
    image::codecs::gif::GifDecoder::new(file)
        .unwrap()
        .into_frames()
        .collect_frames()
        .unwrap()
}

fn has_infinite_loop(bytes: &[u8]) -> bool {
    bytes
        .windows(15)
        .any(|w| &w[..11] == b"NETSCAPE2.0" && w[11..] == [3, 1, 0, 0])
}

#[test]
fn writes_looping_gif_with_one_second_frames() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("nested").join("count.gif");
    let mut sink = GifSink::new(GifSinkOpts::new(&out));

    sink.begin(cfg(16, 8, 3)).unwrap();
    for (i, c) in [[255, 0, 0, 255], [0, 255, 0, 255], [0, 0, 255, 255]]
        .into_iter()
        .enumerate()
    {
        sink.push_frame(FrameIndex(i as u64), &solid(16, 8, c)).unwrap();
    }
    sink.end().unwrap();

    let bytes = std::fs::read(&out).unwrap();
    assert!(bytes.starts_with(b"GIF89a"));
    assert_eq!(bytes.last(), Some(&0x3B));
    assert!(has_infinite_loop(&bytes));
    assert_eq!(sink.bytes_written(), Some(bytes.len() as u64));
    assert_eq!(sink.frames_written(), 3);

    let frames = decode(&out);
    assert_eq!(frames.len(), 3);
    for f in &frames {
        assert_eq!(Duration::from(f.delay()), Duration::from_secs(1));
        assert_eq!(f.buffer().dimensions(), (16, 8));
    }
    assert_eq!(frames[0].buffer().get_pixel(3, 3).0, [255, 0, 0, 255]);
    assert_eq!(frames[2].buffer().get_pixel(3, 3).0, [0, 0, 255, 255]);
}

#[test]
fn replaces_existing_file() {
    let dir = tempfile::tempdir().unwrap();
    let out = dir.path().join("x.gif");
    std::fs::write(&out, vec![0u8; 100_000]).unwrap();

    let mut sink = GifSink::new(GifSinkOpts::new(&out));
    sink.begin(cfg(4, 4, 1)).unwrap();
    sink.push_frame(FrameIndex(0), &solid(4, 4, [9, 9, 9, 255])).unwrap();
    sink.end().unwrap();

    assert_eq!(decode(&out).len(), 1);
    assert!(std::fs::metadata(&out).unwrap().len() < 100_000);
}

#[test]
fn unopenable_destination_is_an_encode_error() {
    let dir = tempfile::tempdir().unwrap();
    // A directory cannot be opened as the output file.
    let mut sink = GifSink::new(GifSinkOpts::new(dir.path()));
    let err = sink.begin(cfg(4, 4, 1)).unwrap_err();
    assert!(matches!(err, CountdownError::Encode(_)), "{err}");
}

#[test]
fn misuse_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut sink = GifSink::new(GifSinkOpts::new(dir.path().join("m.gif")));

    assert!(sink.push_frame(FrameIndex(0), &solid(4, 4, [0; 4])).is_err());
    assert!(sink.end().is_err());

    sink.begin(cfg(4, 4, 2)).unwrap();
    assert!(sink.begin(cfg(4, 4, 2)).is_err());
    assert!(sink.push_frame(FrameIndex(0), &solid(5, 4, [0; 4])).is_err());
    sink.push_frame(FrameIndex(1), &solid(4, 4, [0, 0, 0, 255])).unwrap();
    assert!(sink.push_frame(FrameIndex(1), &solid(4, 4, [0, 0, 0, 255])).is_err());
    sink.end().unwrap();
    assert!(sink.end().is_err());
}

#[test]
fn settings_are_validated() {
    let dir = tempfile::tempdir().unwrap();
    let mut opts = GifSinkOpts::new(dir.path().join("q.gif"));
    opts.settings.quality = 0;
    let mut sink = GifSink::new(opts);
    assert!(matches!(
        sink.begin(cfg(4, 4, 1)),
        Err(CountdownError::Validation(_))
    ));
    assert!(!dir.path().join("q.gif").exists());
}

#[test]
fn default_settings_match_countdown_output() {
    let s = GifSettings::default();
    assert_eq!(s.repeat, GifRepeat::Infinite);
    assert_eq!(s.delay_ms, 1000);
    assert_eq!(s.quality, 10);
}
