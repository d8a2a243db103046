use std::slice;

/// A single validation failure on an incoming message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationViolation {
    /// The offending property.
    pub property: String,
    pub message: String,
}

impl ValidationViolation {
    pub fn new(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            message: message.into(),
        }
    }
}

/// The validation failures collected on an incoming message.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ValidationViolations(Vec<ValidationViolation>);

impl ValidationViolations {
    pub fn new(violations: Vec<ValidationViolation>) -> Self {
        Self(violations)
    }

    pub fn iter(&self) -> slice::Iter<'_, ValidationViolation> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

impl<'a> IntoIterator for &'a ValidationViolations {
    type Item = &'a ValidationViolation;
    type IntoIter = slice::Iter<'a, ValidationViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

impl IntoIterator for ValidationViolations {
    type Item = ValidationViolation;
    type IntoIter = std::vec::IntoIter<ValidationViolation>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl FromIterator<ValidationViolation> for ValidationViolations {
    fn from_iter<I: IntoIterator<Item = ValidationViolation>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}
