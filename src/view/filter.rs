use crate::types::{ALL_CATEGORY, Status};

/// Selection of the sort control. The control mixes one real sort with
/// status filters, so the modes are mutually exclusive.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum SortMode {
    /// Catalog order.
    #[default]
    None,
    /// Highest rating first, ties in catalog order.
    Rating,
    /// Only books whose status equals this one.
    Status(Status),
}

impl SortMode {
    /// Parses a control value: `"none"`, `"rating"` or `"status:<X>"`.
    /// Anything else is treated as `"none"`.
    pub fn parse(value: &str) -> Self {
        if value == "rating" {
            return SortMode::Rating;
        }
        match value.strip_prefix("status:") {
            Some(status) => SortMode::Status(Status::from(status)),
            None => SortMode::None,
        }
    }

    /// Control value that [`SortMode::parse`] maps back to `self`.
    pub fn control_value(&self) -> String {
        match self {
            SortMode::None => "none".to_string(),
            SortMode::Rating => "rating".to_string(),
            SortMode::Status(status) => format!("status:{status}"),
        }
    }
}

/// Transient view selections. Not persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FilterState {
    /// Active category tab; `"All"` disables category filtering.
    pub category: String,
    /// Case-insensitive title substring; empty disables searching.
    pub search: String,
    /// Sort control selection.
    pub sort: SortMode,
}

impl Default for FilterState {
    fn default() -> Self {
        Self {
            category: ALL_CATEGORY.to_string(),
            search: String::new(),
            sort: SortMode::None,
        }
    }
}

impl FilterState {
    /// Filter state for one category tab, otherwise default.
    pub fn for_category(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            ..Self::default()
        }
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = search.into();
        self
    }

    pub fn with_sort(mut self, sort: SortMode) -> Self {
        self.sort = sort;
        self
    }
}
