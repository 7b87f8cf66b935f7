use serde::{Deserialize, Serialize};

use crate::constants::ALL_CATEGORIES;
use crate::model::PluginRecord;

/// Category half of the filter. `All` is spelled `"all"` wherever it is
/// stored as text.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum CategoryFilter {
    #[default]
    All,
    Only(String),
}

impl CategoryFilter {
    pub fn parse(value: &str) -> Self {
        if value == ALL_CATEGORIES {
            CategoryFilter::All
        } else {
            CategoryFilter::Only(value.to_string())
        }
    }

    pub fn as_str(&self) -> &str {
        match self {
            CategoryFilter::All => ALL_CATEGORIES,
            CategoryFilter::Only(category) => category,
        }
    }

    /// Exact comparison; categories are opaque strings.
    pub fn matches(&self, category: &str) -> bool {
        match self {
            CategoryFilter::All => true,
            CategoryFilter::Only(wanted) => wanted == category,
        }
    }
}

impl From<String> for CategoryFilter {
    fn from(value: String) -> Self {
        CategoryFilter::parse(&value)
    }
}

impl From<CategoryFilter> for String {
    fn from(filter: CategoryFilter) -> Self {
        filter.as_str().to_string()
    }
}

/// Search text plus category selection. Evaluated from scratch over the whole
/// list on every change; there is no index.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PluginFilter {
    pub search: String,
    pub category: CategoryFilter,
}

impl PluginFilter {
    pub fn new(search: impl Into<String>, category: CategoryFilter) -> Self {
        Self {
            search: search.into(),
            category,
        }
    }

    pub fn is_identity(&self) -> bool {
        self.search.is_empty() && self.category == CategoryFilter::All
    }

    pub fn matches(&self, record: &PluginRecord) -> bool {
        self.category.matches(&record.category)
            && record.contains_lowercase(&self.search.to_lowercase())
    }

    /// Visible subset in list order.
    pub fn apply<'a>(&self, records: &'a [PluginRecord]) -> Vec<&'a PluginRecord> {
        let needle = self.search.to_lowercase();
        records
            .iter()
            .filter(|r| self.category.matches(&r.category) && r.contains_lowercase(&needle))
            .collect()
    }
}
