use super::*;

#[test]
fn display_prefixes_are_stable() {
    assert!(
        CardSkinError::validation("x")
            .to_string()
            .contains("validation error:")
    );
    assert!(
        CardSkinError::precondition("x")
            .to_string()
            .contains("precondition failed:")
    );
    assert!(
        CardSkinError::render("x")
            .to_string()
            .contains("render error:")
    );
    assert!(CardSkinError::asset("x").to_string().contains("asset error:"));
    assert!(
        CardSkinError::snapshot("x")
            .to_string()
            .contains("snapshot error:")
    );
    assert!(
        CardSkinError::serde("x")
            .to_string()
            .contains("serialization error:")
    );
}

#[test]
fn other_preserves_source() {
    let base = std::io::Error::other("boom");
    let err = CardSkinError::Other(anyhow::Error::new(base));
    assert!(err.to_string().contains("boom"));
}

#[test]
fn only_preconditions_are_fatal() {
    assert!(CardSkinError::precondition("no renderer").is_fatal());
    assert!(!CardSkinError::asset("404").is_fatal());
    assert!(!CardSkinError::snapshot("blank").is_fatal());
}

#[test]
fn serde_json_errors_convert() {
    let err: CardSkinError = serde_json::from_str::<u32>("nope").unwrap_err().into();
    assert!(matches!(err, CardSkinError::Serde(_)));
}
