use super::*;

fn two_by_one() -> FrameRGBA {
    FrameRGBA {
        width: 2,
        height: 1,
        data: vec![255, 0, 0, 255, 0, 0, 255, 255],
    }
}

#[test]
fn pixel_reads_row_major_and_rejects_out_of_bounds() {
    let f = two_by_one();
    assert_eq!(f.pixel(0, 0), Some([255, 0, 0, 255]));
    assert_eq!(f.pixel(1, 0), Some([0, 0, 255, 255]));
    assert_eq!(f.pixel(2, 0), None);
    assert_eq!(f.pixel(0, 1), None);
}

#[test]
fn rgba_image_keeps_dimensions_and_pixels() {
    let img = two_by_one().to_rgba_image().unwrap();
    assert_eq!(img.dimensions(), (2, 1));
    assert_eq!(img.get_pixel(1, 0).0, [0, 0, 255, 255]);
}

#[test]
fn short_buffer_has_no_rgba_image() {
    let mut f = two_by_one();
    f.data.truncate(4);
    assert!(f.to_rgba_image().is_none());
}
