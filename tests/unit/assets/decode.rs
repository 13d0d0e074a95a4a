use std::io::Cursor;

use super::*;

fn png_bytes(img: &image::RgbaImage) -> Vec<u8> {
    let mut out = Cursor::new(Vec::new());
    img.write_to(&mut out, image::ImageFormat::Png).unwrap();
    out.into_inner()
}

fn px(img: &PreparedImage, x: u32, y: u32) -> [u8; 4] {
    let i = ((y * img.width + x) * 4) as usize;
    let d = &img.rgba8_premul;
    [d[i], d[i + 1], d[i + 2], d[i + 3]]
}

#[test]
fn raster_is_scaled_to_exactly_fill_canvas() {
    let src = image::RgbaImage::from_pixel(7, 3, image::Rgba([200, 10, 10, 255]));
    let canvas = Canvas::new(160, 150).unwrap();
    let prepared = decode_background(&png_bytes(&src), canvas).unwrap();

    assert_eq!((prepared.width, prepared.height), (160, 150));
    assert_eq!(prepared.rgba8_premul.len(), canvas.rgba8_len());
    assert_eq!(px(&prepared, 0, 0), [200, 10, 10, 255]);
    assert_eq!(px(&prepared, 159, 149), [200, 10, 10, 255]);
}

#[test]
fn raster_scaling_keeps_left_right_halves() {
    let mut src = image::RgbaImage::new(2, 1);
    src.put_pixel(0, 0, image::Rgba([255, 0, 0, 255]));
    src.put_pixel(1, 0, image::Rgba([0, 0, 255, 255]));
    let canvas = Canvas::new(200, 150).unwrap();
    let prepared = decode_background(&png_bytes(&src), canvas).unwrap();

    assert_eq!(px(&prepared, 0, 75), [255, 0, 0, 255]);
    assert_eq!(px(&prepared, 199, 75), [0, 0, 255, 255]);
}

#[test]
fn translucent_raster_is_premultiplied() {
    let src = image::RgbaImage::from_pixel(4, 4, image::Rgba([255, 255, 255, 128]));
    let canvas = Canvas::new(4, 4).unwrap();
    let prepared = decode_background(&png_bytes(&src), canvas).unwrap();
    assert_eq!(px(&prepared, 1, 1), [128, 128, 128, 128]);
}

#[test]
fn svg_is_rasterized_at_canvas_size() {
    let svg = br##"<svg xmlns="http://www.w3.org/2000/svg" width="10" height="10">
        <rect width="10" height="10" fill="#00ff00"/>
    </svg>"##;
    let canvas = Canvas::new(150, 180).unwrap();
    let prepared = decode_background(svg, canvas).unwrap();

    assert_eq!((prepared.width, prepared.height), (150, 180));
    assert_eq!(px(&prepared, 75, 90), [0, 255, 0, 255]);
}

#[test]
fn svg_sniffing_tolerates_prolog_and_whitespace() {
    assert!(looks_like_svg(b"  \n<svg/>"));
    assert!(looks_like_svg(b"<?xml version=\"1.0\"?>\n<svg/>"));
    assert!(looks_like_svg(b"\xEF\xBB\xBF<svg/>"));
    assert!(!looks_like_svg(b"\x89PNG\r\n\x1a\n"));
    assert!(!looks_like_svg(b""));
}

#[test]
fn undecodable_bytes_are_asset_errors() {
    let canvas = Canvas::new(150, 150).unwrap();
    let err = decode_background(b"definitely not an image", canvas).unwrap_err();
    assert!(matches!(err, CountdownError::Asset(_)));

    let err = decode_background(b"<svg <<", canvas).unwrap_err();
    assert!(matches!(err, CountdownError::Asset(_)));
}
