//! Length rule for strings (in characters) and collections (in elements).

use crate::error::ValidationError;
use crate::schema::SchemaType;

crate::rule! {
    /// Checks the length of a string, sequence or map.
    ///
    /// A bound of zero is open. `length(0, 0)` only accepts empty values.
    pub Length { min: usize, max: usize };
    validate(self, value) {
        let value = value.value();
        if value.is_empty() {
            return Ok(());
        }
        let Some(len) = value.len() else {
            return Err(ValidationError::new(
                "length_unsupported",
                format!("cannot get the length of {}", value.kind()),
            )
            .into());
        };
        let too_short = self.min > 0 && len < self.min;
        let too_long = self.max > 0 && len > self.max;
        let must_be_empty = self.min == 0 && self.max == 0 && len > 0;
        if too_short || too_long || must_be_empty {
            return Err(self.error().into());
        }
        Ok(())
    }
    describe(self, name, acc) {
        let property = acc.property();
        let min = (self.min > 0).then_some(self.min as u64);
        let max = (self.max > 0).then_some(self.max as u64);
        match property.schema_type {
            Some(SchemaType::String) => {
                property.min_length = min.or(property.min_length);
                property.max_length = max.or(property.max_length);
            }
            Some(SchemaType::Array) => {
                property.min_items = min.or(property.min_items);
                property.max_items = max.or(property.max_items);
            }
            _ => {
                property.minimum = min.map(|n| n as f64).or(property.minimum);
                property.maximum = max.map(|n| n as f64).or(property.maximum);
            }
        }
        Ok(())
    }
    fn length(min: usize, max: usize) { Length { min, max } }
}

impl Length {
    fn error(&self) -> ValidationError {
        let (code, message) = match (self.min, self.max) {
            (0, 0) => ("length_empty_required", "the value must be empty".to_owned()),
            (0, max) => ("length_too_long", format!("the length must be no more than {max}")),
            (min, 0) => ("length_too_short", format!("the length must be no less than {min}")),
            (min, max) if min == max => ("length_invalid", format!("the length must be exactly {min}")),
            (min, max) => (
                "length_out_of_range",
                format!("the length must be between {min} and {max}"),
            ),
        };
        ValidationError::new(code, message)
            .with_param("min", self.min.to_string())
            .with_param("max", self.max.to_string())
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
    #[case(1, 5, "abc", None)]
    #[case(1, 5, "", None)]
    #[case(1, 5, "abcdef", Some("the length must be between 1 and 5"))]
    #[case(0, 3, "abcd", Some("the length must be no more than 3"))]
    #[case(4, 0, "abc", Some("the length must be no less than 4"))]
    #[case(2, 2, "abc", Some("the length must be exactly 2"))]
    #[case(0, 0, "a", Some("the value must be empty"))]
    #[case(2, 3, "héé", None)]
    fn test_string_length(
        #[case] min: usize,
        #[case] max: usize,
        #[case] input: &str,
        #[case] expected: Option<&str>,
    ) {
        let result = length(min, max).validate(&input.to_owned());
        assert_eq!(result.err().map(|e| e.to_string()).as_deref(), expected);
    }

    #[test]
    fn test_collection_length() {
        assert!(length(1, 2).validate(&vec![1, 2]).is_ok());
        assert!(length(1, 2).validate(&vec![1, 2, 3]).is_err());
    }

    #[test]
    fn test_unsupported_kind() {
        let err = length(1, 2).validate(&5_i32).unwrap_err();
        assert_eq!(err.to_string(), "cannot get the length of int64");
    }

    #[test]
    fn test_describe_by_property_type() {
        let mut required = Vec::new();

        let mut string = Schema::string();
        length(1, 5)
            .describe("f", &mut SchemaAccumulator::new(&mut required, &mut string))
            .unwrap();
        assert_eq!((string.min_length, string.max_length), (Some(1), Some(5)));

        let mut array = Schema::array(Schema::string());
        length(0, 3)
            .describe("f", &mut SchemaAccumulator::new(&mut required, &mut array))
            .unwrap();
        assert_eq!((array.min_items, array.max_items), (None, Some(3)));

        let mut untyped = Schema::any();
        length(2, 4)
            .describe("f", &mut SchemaAccumulator::new(&mut required, &mut untyped))
            .unwrap();
        assert_eq!((untyped.minimum, untyped.maximum), (Some(2.0), Some(4.0)));
    }
}
