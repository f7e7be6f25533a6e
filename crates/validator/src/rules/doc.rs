//! Documentation-only rules. They never fail.

crate::rule! {
    /// Appends free text to the property description.
    pub Description { text: String };
    validate(self, value) { Ok(()) }
    describe(self, name, acc) {
        acc.append_description(&self.text);
        Ok(())
    }
    fn describe(text: impl Into<String>) { Description { text: text.into() } }
}

crate::rule! {
    /// Sets the property `default`.
    pub DefaultValue { value: serde_json::Value };
    validate(self, value) { Ok(()) }
    describe(self, name, acc) {
        acc.property().default = Some(self.value.clone());
        Ok(())
    }
    fn default(value: impl Into<serde_json::Value>) { DefaultValue { value: value.into() } }
}

crate::rule! {
    /// Sets the property `example`.
    pub Example { value: serde_json::Value };
    validate(self, value) { Ok(()) }
    describe(self, name, acc) {
        acc.property().example = Some(self.value.clone());
        Ok(())
    }
    fn example(value: impl Into<serde_json::Value>) { Example { value: value.into() } }
}

crate::rule! {
    /// Marks the property `deprecated`.
    pub Deprecate;
    validate(value) { Ok(()) }
    describe(name, acc) {
        acc.property().deprecated = true;
        Ok(())
    }
    fn deprecate();
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Rule;
    use crate::schema::{Schema, SchemaAccumulator};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_documentation_rules() {
        let mut required = Vec::new();
        let mut schema = Schema::string();
        let mut acc = SchemaAccumulator::new(&mut required, &mut schema);

        describe("Customer name.").describe("name", &mut acc).unwrap();
        default("anonymous").describe("name", &mut acc).unwrap();
        example("Ada").describe("name", &mut acc).unwrap();
        deprecate().describe("name", &mut acc).unwrap();

        assert_eq!(schema.description, "Customer name.");
        assert_eq!(schema.default, Some(serde_json::json!("anonymous")));
        assert_eq!(schema.example, Some(serde_json::json!("Ada")));
        assert!(schema.deprecated);
    }

    #[test]
    fn test_documentation_rules_accept_anything() {
        assert!(describe("x").validate(&None::<i32>).is_ok());
        assert!(deprecate().validate(&String::from("y")).is_ok());
    }
}
