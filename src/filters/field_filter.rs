use std::collections::HashSet;

/// Include/exclude set over effective field names
///
/// - `include = None` means every field is allowed
/// - `exclude` always wins over `include`
///
/// Filtering only removes columns; it never reorders them or changes how a value is coerced.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FieldFilter {
    include: Option<HashSet<String>>,
    exclude: HashSet<String>,
}

impl FieldFilter {
    pub fn new(include: Option<Vec<String>>, exclude: Vec<String>) -> Self {
        Self {
            include: include.map(|fields| fields.into_iter().collect()),
            exclude: exclude.into_iter().collect(),
        }
    }

    /// Filter that allows every field
    pub fn all() -> Self {
        Self::default()
    }

    pub fn allows(&self, name: &str) -> bool {
        if self.exclude.contains(name) {
            return false;
        }
        self.include.as_ref().is_none_or(|include| include.contains(name))
    }

    pub fn is_unrestricted(&self) -> bool {
        self.include.is_none() && self.exclude.is_empty()
    }
}
