//! Property tests for task field validation.
//!
//! Exercises the validation rules over generated input rather than a
//! hand-picked grid: any string's verdict must depend only on its trimmed
//! character count (title) or its character count (description).

use proptest::prelude::*;

use taskdeck_core::{
    DESCRIPTION_MAX_CHARS, TITLE_MAX_CHARS, TaskError, validate_description, validate_title,
};

proptest! {
    #[test]
    fn titles_within_limit_validate_to_trimmed(raw in "[ ]{0,3}[a-zA-Z0-9é日]{1,200}[ ]{0,3}") {
        let trimmed = raw.trim().to_string();
        let validated = validate_title(&raw);
        prop_assert_eq!(validated, Ok(trimmed));
    }

    #[test]
    fn overlong_titles_rejected(extra in 1usize..200) {
        let raw = "x".repeat(TITLE_MAX_CHARS + extra);
        prop_assert!(matches!(
            validate_title(&raw),
            Err(TaskError::InvalidTitle(_))
        ));
    }

    #[test]
    fn whitespace_only_titles_rejected(raw in "[ \t\r\n]{0,64}") {
        prop_assert!(matches!(
            validate_title(&raw),
            Err(TaskError::InvalidTitle(_))
        ));
    }

    /// The verdict is a total function of the trimmed character count:
    /// 1..=200 succeeds with the trimmed form, anything else fails with
    /// `InvalidTitle`.
    #[test]
    fn title_verdict_depends_only_on_trimmed_char_count(raw in "\\PC{0,300}") {
        let trimmed_len = raw.trim().chars().count();
        match validate_title(&raw) {
            Ok(title) => {
                prop_assert_eq!(title.as_str(), raw.trim());
                prop_assert!((1..=TITLE_MAX_CHARS).contains(&trimmed_len));
            }
            Err(TaskError::InvalidTitle(_)) => {
                prop_assert!(trimmed_len == 0 || trimmed_len > TITLE_MAX_CHARS);
            }
            Err(e) => prop_assert!(false, "unexpected error kind: {e}"),
        }
    }

    #[test]
    fn descriptions_within_limit_accepted(len in 0usize..=1000) {
        let raw = "d".repeat(len);
        prop_assert!(validate_description(Some(&raw)).is_ok());
    }

    #[test]
    fn overlong_descriptions_rejected(extra in 1usize..200) {
        let raw = "d".repeat(DESCRIPTION_MAX_CHARS + extra);
        prop_assert!(matches!(
            validate_description(Some(&raw)),
            Err(TaskError::InvalidDescription(_))
        ));
    }

    /// Descriptions are measured in characters, not bytes.
    #[test]
    fn multibyte_descriptions_measured_in_chars(len in 900usize..=1000) {
        let raw = "é".repeat(len);
        prop_assert!(validate_description(Some(&raw)).is_ok());
    }
}

#[test]
fn missing_description_always_valid() {
    assert!(validate_description(None).is_ok());
}
