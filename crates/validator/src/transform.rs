//! String transforms over whole value trees.
//!
//! Each transform reaches every `String` inside the value: struct fields,
//! `Option` and `Box` contents, sequence elements and map values. Handy
//! inside [`Normalize`](crate::Normalize) hooks:
//!
//! ```rust,ignore
//! impl Normalize for Signup {
//!     fn normalize(&mut self) {
//!         apivalid::transform::trim_space(self);
//!     }
//! }
//! ```

use crate::inspect::Inspect;

/// Replaces every reachable string with `f(string)`.
pub fn map_strings(value: &mut dyn Inspect, f: impl Fn(&str) -> String) {
    value.for_each_string(&mut |s: &mut String| {
        let mapped = f(s.as_str());
        if mapped != *s {
            *s = mapped;
        }
    });
}

/// Trims leading and trailing whitespace from every reachable string.
pub fn trim_space(value: &mut dyn Inspect) {
    value.for_each_string(&mut |s: &mut String| {
        let trimmed = s.trim();
        if trimmed.len() != s.len() {
            *s = trimmed.to_owned();
        }
    });
}

/// Lowercases every reachable string.
pub fn to_lower(value: &mut dyn Inspect) {
    map_strings(value, str::to_lowercase);
}

/// Applies several transforms in order.
pub fn multi(value: &mut dyn Inspect, transforms: &[fn(&mut dyn Inspect)]) {
    for transform in transforms {
        transform(value);
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_trim_space_reaches_nested_strings() {
        let mut value: HashMap<String, Vec<Option<String>>> = HashMap::new();
        value.insert(" key ".into(), vec![Some("  a ".into()), None, Some("b".into())]);

        trim_space(&mut value);

        assert_eq!(value[" key "], vec![Some("a".to_owned()), None, Some("b".to_owned())]);
    }

    #[test]
    fn test_multi_applies_in_order() {
        let mut value = vec![String::from("  MiXeD  ")];

        multi(&mut value, &[trim_space, to_lower]);

        assert_eq!(value, vec!["mixed".to_owned()]);
    }

    #[test]
    fn test_map_strings() {
        let mut value = Some(Box::new(String::from("abc")));

        map_strings(&mut value, |s| s.repeat(2));

        assert_eq!(value.as_deref().map(String::as_str), Some("abcabc"));
    }
}
