//! Free-text checks for fields that must not carry bare numbers.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::ValidationError;
use crate::value::Value;

const CREDIT_CARD_NUMBER_LENGTH: usize = 16;

static NON_ALPHABETIC: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"[^[:alpha:]]").unwrap());
static NON_DIGIT: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\D").unwrap());

crate::rule! {
    /// Strings must contain at least one ASCII letter, or (for the credit
    /// card variant) must not be a bare 16-digit number. Blank strings pass.
    pub HasAlphabetic { credit_card_check: bool };
    validate(self, value) {
        let text = match value.value() {
            Value::Null => return Ok(()),
            Value::Str(s) => s,
            other => {
                return Err(ValidationError::new(
                    "type",
                    format!("expected string, got {}", other.kind()),
                )
                .into());
            }
        };

        let text = text.trim();
        if text.is_empty() || !NON_ALPHABETIC.replace_all(text, "").is_empty() {
            return Ok(());
        }

        if !self.credit_card_check {
            return Err(ValidationError::new(
                "alphabetic",
                "must contain at least one alphabetic character",
            )
            .into());
        }
        if NON_DIGIT.replace_all(text, "").len() == CREDIT_CARD_NUMBER_LENGTH {
            return Err(ValidationError::new(
                "credit_card_number",
                "must not be a credit card number",
            )
            .into());
        }
        Ok(())
    }
    describe(self, name, acc) {
        // Appended verbatim: the sentence carries its own trailing space.
        acc.property()
            .description
            .push_str("Must contain at least one alphabetic character. ");
        Ok(())
    }
    fn has_alphabetic() { HasAlphabetic { credit_card_check: false } }
}

/// Rejects strings that consist of a 16-digit number, optionally with
/// separators. Strings with letters, and other digit counts, pass.
#[must_use]
pub fn non_credit_card_number() -> HasAlphabetic {
    HasAlphabetic {
        credit_card_check: true,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rule;
    use crate::schema::{Schema, SchemaAccumulator};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    #[rstest]
    #[case("abc", None)]
    #[case("  ", None)]
    #[case("a1", None)]
    #[case("1234", Some("must contain at least one alphabetic character"))]
    #[case("12-34", Some("must contain at least one alphabetic character"))]
    fn test_has_alphabetic(#[case] input: &str, #[case] expected: Option<&str>) {
        let result = has_alphabetic().validate(&input.to_owned());
        assert_eq!(result.err().map(|e| e.to_string()).as_deref(), expected);
    }

    #[rstest]
    #[case("4111 1111 1111 1111", Some("must not be a credit card number"))]
    #[case("4111-1111-1111-1111", Some("must not be a credit card number"))]
    #[case("4111 1111", None)]
    #[case("card 4111 1111 1111 1111", None)]
    fn test_non_credit_card_number(#[case] input: &str, #[case] expected: Option<&str>) {
        let result = non_credit_card_number().validate(&input.to_owned());
        assert_eq!(result.err().map(|e| e.to_string()).as_deref(), expected);
    }

    #[test]
    fn test_non_string_is_rejected() {
        let err = has_alphabetic().validate(&3_i32).unwrap_err();
        assert_eq!(err.to_string(), "expected string, got int64");
    }

    #[test]
    fn test_describe_appends_raw_sentence() {
        let mut required = Vec::new();
        let mut schema = Schema::string();
        schema.description = "Name.".into();
        has_alphabetic()
            .describe("name", &mut SchemaAccumulator::new(&mut required, &mut schema))
            .unwrap();

        assert_eq!(
            schema.description,
            "Name.Must contain at least one alphabetic character. "
        );
    }
}
