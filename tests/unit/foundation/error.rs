use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        BloodlineError::invalid_argument("x")
            .to_string()
            .contains("invalid argument:")
    );
    assert!(BloodlineError::data("x").to_string().contains("data error:"));
    assert!(
        BloodlineError::layout("x")
            .to_string()
            .contains("layout error:")
    );
    assert!(
        BloodlineError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(
        BloodlineError::encode("x")
            .to_string()
            .contains("encode error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = BloodlineError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn anyhow_context_converts_with_question_mark() {
    fn read_missing() -> BloodlineResult<Vec<u8>> {
        use anyhow::Context as _;
        let bytes = std::fs::read("target/definitely/not/here.csv").context("read fixture")?;
        Ok(bytes)
    }

    let err = read_missing().unwrap_err();
    assert!(matches!(err, BloodlineError::Other(_)));
    assert!(err.to_string().contains("read fixture"));
}
