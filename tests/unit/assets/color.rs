use super::*;

#[test]
fn parses_prefixless_and_prefixed_triplets() {
    assert_eq!(Rgba8::from_hex("ff0000").unwrap(), Rgba8::opaque(255, 0, 0));
    assert_eq!(Rgba8::from_hex("#00FF7f").unwrap(), Rgba8::opaque(0, 255, 127));
    assert_eq!("000000".parse::<Rgba8>().unwrap(), Rgba8::BLACK);
}

#[test]
fn parses_shorthand_and_alpha() {
    assert_eq!(Rgba8::from_hex("fff").unwrap(), Rgba8::WHITE);
    assert_eq!(Rgba8::from_hex("#1a2").unwrap(), Rgba8::opaque(0x11, 0xaa, 0x22));

    let c = Rgba8::from_hex("0000ff80").unwrap();
    assert_eq!(c.to_array(), [0, 0, 255, 128]);
}

#[test]
fn rejects_malformed_values() {
    for s in ["", "#", "ff00", "gg0000", "ff00000", "ééé", "12345z"] {
        assert!(Rgba8::from_hex(s).is_err(), "input {s:?}");
    }
}

#[test]
fn malformed_values_fall_back_to_default() {
    assert_eq!(Rgba8::from_hex_or("nope", Rgba8::WHITE), Rgba8::WHITE);
    assert_eq!(
        Rgba8::from_hex_or("336699", Rgba8::WHITE),
        Rgba8::opaque(0x33, 0x66, 0x99)
    );
}

#[test]
fn display_is_prefixless_lowercase() {
    assert_eq!(Rgba8::opaque(255, 0, 170).to_string(), "ff00aa");
    assert_eq!(
        Rgba8 {
            r: 1,
            g: 2,
            b: 3,
            a: 4
        }
        .to_string(),
        "01020304"
    );
}
