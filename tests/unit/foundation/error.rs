use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(CountdownError::time("x").to_string().contains("time error:"));
    assert!(
        CountdownError::asset("x")
            .to_string()
            .contains("asset error:")
    );
    assert!(
        CountdownError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        CountdownError::encode("x")
            .to_string()
            .contains("encode error:")
    );
    assert!(
        CountdownError::validation("x")
            .to_string()
            .contains("validation error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("disk full");
    let err = CountdownError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("disk full"));
}

#[test]
fn anyhow_context_converts_with_question_mark() {
    fn read_missing() -> CountdownResult<Vec<u8>> {
        use anyhow::Context as _;
        let bytes = std::fs::read("definitely/not/here.png").context("read background")?;
        Ok(bytes)
    }

    let err = read_missing().unwrap_err();
    assert!(matches!(err, CountdownError::Other(_)));
    assert!(err.to_string().contains("read background"));
}
