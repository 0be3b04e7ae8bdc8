//! Display grouping of operators by keyword table.
//!
//! A [`CategoryTable`] is an ordered list of `(category, keywords)` rules plus a
//! fallback category. An operator id belongs to the first rule with a keyword
//! that occurs in it (case-insensitive); ids matching no rule go to the
//! fallback. Order is table order, never best-match.

use std::collections::HashSet;
use std::path::Path;

use serde::{Deserialize, Serialize};
use taskops_types::{Operator, Result, TaskOpsError};

/// One named bucket and the id fragments that select it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryRule {
    pub name: String,
    pub keywords: Vec<String>,
}

impl CategoryRule {
    pub fn new(name: impl Into<String>, keywords: &[&str]) -> Self {
        Self {
            name: name.into(),
            keywords: keywords.iter().map(|k| (*k).to_string()).collect(),
        }
    }

    /// `lowered_id` must already be lowercase.
    fn matches(&self, lowered_id: &str) -> bool {
        self.keywords
            .iter()
            .any(|k| lowered_id.contains(&k.to_lowercase()))
    }
}

/// Ordered category rules with a terminal fallback.
///
/// Built through [`CategoryTable::new`], [`CategoryTable::from_json`], or
/// [`Default`], all of which yield a validated table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CategoryTable {
    rules: Vec<CategoryRule>,
    #[serde(default = "default_fallback")]
    fallback: String,
}

fn default_fallback() -> String {
    "Others".to_string()
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self {
            rules: vec![
                CategoryRule::new("Messaging", &["slack", "email", "smtp"]),
                CategoryRule::new("Dial", &["dial"]),
                CategoryRule::new("DNE Core", &["dne"]),
                CategoryRule::new("Data Processing", &["http"]),
                CategoryRule::new("Spark Proxy", &["spark"]),
                CategoryRule::new("Broker", &["kafka"]),
                CategoryRule::new("AWS", &["aws"]),
                CategoryRule::new("3rd Party Connectors", &["plannet"]),
                CategoryRule::new("Database", &["mysql"]),
                CategoryRule::new("Utility Tasks", &["utility", "generic"]),
            ],
            fallback: default_fallback(),
        }
    }
}

impl CategoryTable {
    pub fn new(rules: Vec<CategoryRule>, fallback: impl Into<String>) -> Result<Self> {
        let table = Self {
            rules,
            fallback: fallback.into(),
        };
        table.validate()?;
        Ok(table)
    }

    /// Parse and validate a JSON table.
    pub fn from_json(json: &str) -> Result<Self> {
        let table: Self = serde_json::from_str(json)?;
        table.validate()?;
        Ok(table)
    }

    /// Read a JSON table from `path`.
    pub fn load(path: &Path) -> Result<Self> {
        let data = std::fs::read_to_string(path)?;
        Self::from_json(&data)
    }

    pub fn rules(&self) -> &[CategoryRule] {
        &self.rules
    }

    pub fn fallback(&self) -> &str {
        &self.fallback
    }

    pub fn validate(&self) -> Result<()> {
        if self.fallback.trim().is_empty() {
            return Err(TaskOpsError::InvalidCategoryTable(
                "fallback category name is empty".into(),
            ));
        }
        let mut seen = HashSet::new();
        seen.insert(self.fallback.as_str());
        for rule in &self.rules {
            if rule.name.trim().is_empty() {
                return Err(TaskOpsError::InvalidCategoryTable(
                    "category name is empty".into(),
                ));
            }
            if !seen.insert(rule.name.as_str()) {
                return Err(TaskOpsError::InvalidCategoryTable(format!(
                    "duplicate category '{}'",
                    rule.name
                )));
            }
            if rule.keywords.is_empty() || rule.keywords.iter().any(|k| k.is_empty()) {
                return Err(TaskOpsError::InvalidCategoryTable(format!(
                    "category '{}' needs at least one non-empty keyword",
                    rule.name
                )));
            }
        }
        Ok(())
    }

    /// Position of the first matching rule, or `rules.len()` for the fallback.
    fn index_of(&self, operator_id: &str) -> usize {
        let lowered = operator_id.to_lowercase();
        self.rules
            .iter()
            .position(|rule| rule.matches(&lowered))
            .unwrap_or(self.rules.len())
    }

    /// Category name an operator id lands in.
    pub fn classify(&self, operator_id: &str) -> &str {
        let idx = self.index_of(operator_id);
        self.rules
            .get(idx)
            .map(|rule| rule.name.as_str())
            .unwrap_or(self.fallback.as_str())
    }

    /// Category names in display order, fallback last.
    pub fn category_names(&self) -> Vec<&str> {
        self.rules
            .iter()
            .map(|r| r.name.as_str())
            .chain(std::iter::once(self.fallback.as_str()))
            .collect()
    }
}

/// One non-empty category with its operators in catalog order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OperatorGroup {
    pub category: String,
    pub operators: Vec<Operator>,
}

impl OperatorGroup {
    pub fn ids(&self) -> Vec<&str> {
        self.operators.iter().map(|o| o.id.as_str()).collect()
    }
}

/// Group `operators` by `table`, keeping only those whose id contains `search_term`.
///
/// Empty `search_term` keeps everything. Operators with an empty id are never
/// shown. Categories left without operators are omitted.
pub fn categorize(
    table: &CategoryTable,
    operators: &[Operator],
    search_term: &str,
) -> Vec<OperatorGroup> {
    let needle = search_term.to_lowercase();
    let mut buckets: Vec<Vec<Operator>> = vec![Vec::new(); table.rules.len() + 1];

    for op in operators {
        if op.id.is_empty() {
            continue;
        }
        let idx = table.index_of(&op.id);
        if needle.is_empty() || op.id.to_lowercase().contains(&needle) {
            buckets[idx].push(op.clone());
        }
    }

    table
        .category_names()
        .into_iter()
        .zip(buckets)
        .filter(|(_, ops)| !ops.is_empty())
        .map(|(name, operators)| OperatorGroup {
            category: name.to_string(),
            operators,
        })
        .collect()
}
