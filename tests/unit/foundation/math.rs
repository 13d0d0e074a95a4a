use super::*;

#[test]
fn mul_div255_variants_align() {
    for x in [0u16, 1, 127, 255] {
        for y in [0u16, 1, 127, 255] {
            assert_eq!(u16::from(mul_div255_u8(x, y)), mul_div255_u16(x, y));
        }
    }
}

#[test]
fn premultiply_leaves_opaque_pixels_alone() {
    let mut px = vec![10u8, 20, 30, 255];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![10, 20, 30, 255]);
}

#[test]
fn premultiply_then_unpremultiply_half_alpha() {
    let mut px = vec![255u8, 0, 128, 128];
    premultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![128, 0, 64, 128]);
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px[0], 255);
    assert_eq!(px[1], 0);
    assert!((i32::from(px[2]) - 128).abs() <= 1);
}

#[test]
fn unpremultiply_zero_alpha_is_transparent_black() {
    let mut px = vec![9u8, 9, 9, 0];
    unpremultiply_rgba8_in_place(&mut px);
    assert_eq!(px, vec![0, 0, 0, 0]);
}
