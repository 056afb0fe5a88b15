//! Ordered registry of user-visible category names.

use serde::{Deserialize, Serialize};

use crate::{book::BookRecord, types::ALL_CATEGORY};

/// Ordered, duplicate-free category names, always led by `"All"`.
///
/// Names match case-sensitively. Categories are never pruned when their last
/// book goes away; an orphaned name stays selectable.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "Vec<String>", into = "Vec<String>")]
pub struct CategoryRegistry {
    names: Vec<String>,
}

impl Default for CategoryRegistry {
    fn default() -> Self {
        Self {
            names: vec![ALL_CATEGORY.to_string()],
        }
    }
}

impl CategoryRegistry {
    /// Registry holding only the `"All"` sentinel.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a registry from `"All"` plus the distinct categories of
    /// `books`, in first-appearance order.
    pub fn derive_from_books<'a>(books: impl IntoIterator<Item = &'a BookRecord>) -> Self {
        let mut registry = Self::new();
        for book in books {
            registry.ensure(&book.category);
        }
        registry
    }

    /// Category names in display order.
    pub fn names(&self) -> &[String] {
        &self.names
    }

    /// Number of entries, including `"All"`.
    pub fn len(&self) -> usize {
        self.names.len()
    }

    /// Always false; the sentinel is never removed.
    pub fn is_empty(&self) -> bool {
        self.names.is_empty()
    }

    /// Exact, case-sensitive membership test.
    pub fn contains(&self, name: &str) -> bool {
        self.names.iter().any(|n| n == name)
    }

    /// Position of `name` in display order.
    pub fn position(&self, name: &str) -> Option<usize> {
        self.names.iter().position(|n| n == name)
    }

    /// Appends `name` if it is not registered yet. Returns true when added.
    pub fn ensure(&mut self, name: &str) -> bool {
        if self.contains(name) {
            return false;
        }
        self.names.push(name.to_string());
        true
    }

    /// Explicit creation from user input.
    ///
    /// The name is trimmed; blank or already registered names are ignored.
    /// Returns the registered name when added.
    pub fn create(&mut self, name: &str) -> Option<String> {
        let name = name.trim();
        if name.is_empty() || !self.ensure(name) {
            return None;
        }
        Some(name.to_string())
    }

    /// Replaces `old` with `new` in place, keeping its position.
    ///
    /// Ignored when `old` is `"All"` or unregistered, when `new` is blank,
    /// equal to `old`, or already registered. Returns the registered new
    /// name when applied.
    pub fn rename(&mut self, old: &str, new: &str) -> Option<String> {
        let new = new.trim();
        if old == ALL_CATEGORY || new.is_empty() || new == old || self.contains(new) {
            return None;
        }
        let idx = self.position(old)?;
        self.names[idx] = new.to_string();
        Some(new.to_string())
    }
}

impl From<Vec<String>> for CategoryRegistry {
    /// Repairs arbitrary input: `"All"` first, duplicates dropped.
    fn from(names: Vec<String>) -> Self {
        let mut registry = Self::new();
        for name in &names {
            registry.ensure(name);
        }
        registry
    }
}

impl From<CategoryRegistry> for Vec<String> {
    fn from(value: CategoryRegistry) -> Self {
        value.names
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sentinel_is_always_first() {
        let registry = CategoryRegistry::from(vec![
            "p.mo".to_string(),
            "All".to_string(),
            "p.mo".to_string(),
        ]);
        assert_eq!(registry.names(), ["All", "p.mo"]);
    }

    #[test]
    fn create_trims_and_rejects_blank_or_duplicate() {
        let mut registry = CategoryRegistry::new();
        assert_eq!(registry.create("  isekai "), Some("isekai".to_string()));
        assert_eq!(registry.create("isekai"), None);
        assert_eq!(registry.create("   "), None);
        assert_eq!(registry.create("All"), None);
        assert_eq!(registry.names(), ["All", "isekai"]);
    }

    #[test]
    fn names_are_case_sensitive() {
        let mut registry = CategoryRegistry::new();
        registry.create("Isekai");
        assert!(registry.create("isekai").is_some());
        assert_eq!(registry.len(), 3);
    }

    #[test]
    fn rename_keeps_position_and_guards_sentinel() {
        let mut registry = CategoryRegistry::from(vec!["a".to_string(), "b".to_string()]);
        assert_eq!(registry.rename("a", "c"), Some("c".to_string()));
        assert_eq!(registry.names(), ["All", "c", "b"]);

        assert_eq!(registry.rename("All", "Everything"), None);
        assert_eq!(registry.rename("c", "b"), None);
        assert_eq!(registry.rename("c", "c"), None);
        assert_eq!(registry.rename("c", " "), None);
        assert_eq!(registry.rename("missing", "d"), None);
        assert_eq!(registry.names(), ["All", "c", "b"]);
    }
}
