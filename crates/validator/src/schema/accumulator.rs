use super::Schema;

/// The property schema a rule describes itself onto, plus the enclosing
/// object's `required` list.
#[derive(Debug)]
pub struct SchemaAccumulator<'a> {
    required: &'a mut Vec<String>,
    property: &'a mut Schema,
}

impl<'a> SchemaAccumulator<'a> {
    pub fn new(required: &'a mut Vec<String>, property: &'a mut Schema) -> Self {
        Self { required, property }
    }

    /// Marks `name` as required on the enclosing object.
    pub fn require(&mut self, name: &str) {
        if !self.required.iter().any(|r| r == name) {
            self.required.push(name.to_owned());
        }
    }

    /// The enclosing object's required list so far.
    #[must_use]
    pub fn required(&self) -> &[String] {
        self.required
    }

    pub fn property(&mut self) -> &mut Schema {
        self.property
    }

    /// Shorthand for [`Schema::append_description`] on the property.
    pub fn append_description(&mut self, text: &str) {
        self.property.append_description(text);
    }
}
