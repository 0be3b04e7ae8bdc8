//! The operator catalog and per-element selection state.
//!
//! Each element moves `unbound -> bound to A -> bound to B -> ...` only on an
//! explicit [`OperatorCatalog::select_operator`]. Leaving an operator parks its
//! parameter values in [`RetainedParameters`], so coming back restores them.

use std::collections::HashMap;

use taskops_types::{Operator, Result, Selection, TaskOpsError};

use crate::category::{categorize, CategoryTable, OperatorGroup};
use crate::retained::RetainedParameters;

/// Single owned catalog instance injected into whatever presents it.
#[derive(Debug)]
pub struct OperatorCatalog {
    table: CategoryTable,
    operators: Vec<Operator>,
    selections: HashMap<String, Selection>,
    retained: RetainedParameters,
}

impl OperatorCatalog {
    /// Create an empty catalog grouping with `table`.
    ///
    /// Fails with `InvalidCategoryTable` if `table` does not validate.
    pub fn new(table: CategoryTable) -> Result<Self> {
        table.validate()?;
        Ok(Self::with_table(table))
    }

    fn with_table(table: CategoryTable) -> Self {
        Self {
            table,
            operators: Vec::new(),
            selections: HashMap::new(),
            retained: RetainedParameters::new(),
        }
    }

    /// Replace the operator list wholesale.
    ///
    /// Selections and retained values are untouched, including selections
    /// whose operator is no longer listed.
    pub fn load_catalog(&mut self, operators: Vec<Operator>) {
        tracing::debug!(
            count = operators.len(),
            previous = self.operators.len(),
            "Operator catalog loaded"
        );
        self.operators = operators;
    }

    pub fn operators(&self) -> &[Operator] {
        &self.operators
    }

    pub fn is_empty(&self) -> bool {
        self.operators.is_empty()
    }

    pub fn table(&self) -> &CategoryTable {
        &self.table
    }

    /// First operator with this id. Duplicate ids are not rejected on load.
    pub fn find(&self, operator_id: &str) -> Option<&Operator> {
        self.operators.iter().find(|op| op.id == operator_id)
    }

    /// Categorized options, filtered by `search_term`.
    pub fn categorize(&self, search_term: &str) -> Vec<OperatorGroup> {
        categorize(&self.table, &self.operators, search_term)
    }

    /// Bind `operator_id` to an element.
    ///
    /// Values previously entered for this element and operator are restored;
    /// otherwise every parameter starts empty. Re-selecting the bound operator
    /// changes nothing. On `OperatorNotFound` no state is modified.
    pub fn select_operator(&mut self, element_id: &str, operator_id: &str) -> Result<&Selection> {
        let Some(operator) = self.find(operator_id) else {
            tracing::warn!(element = %element_id, operator = %operator_id, "Could not find operator");
            return Err(TaskOpsError::OperatorNotFound {
                operator_id: operator_id.to_owned(),
            });
        };

        let already_bound = self
            .selections
            .get(element_id)
            .is_some_and(|s| s.operator_id == operator_id);
        if already_bound {
            return Ok(&self.selections[element_id]);
        }

        let restored = self.retained.get(element_id, operator_id).map(<[_]>::to_vec);
        let from_cache = restored.is_some();
        let parameters = restored.unwrap_or_else(|| operator.blank_parameters());

        if let Some(previous) = self.selections.remove(element_id) {
            self.retained
                .store(element_id, &previous.operator_id, previous.parameters);
        }

        tracing::info!(
            element = %element_id,
            operator = %operator_id,
            restored = from_cache,
            "Operator selected"
        );
        self.selections
            .insert(element_id.to_owned(), Selection::new(operator_id, parameters));
        Ok(&self.selections[element_id])
    }

    /// Edit one parameter of the element's current selection.
    ///
    /// The retained cache is only written when the element next switches operator.
    pub fn set_parameter_value(
        &mut self,
        element_id: &str,
        parameter_id: &str,
        value: impl Into<String>,
    ) -> Result<()> {
        let selection = self.selection_mut(element_id)?;
        let param = selection
            .parameters
            .iter_mut()
            .find(|p| p.id == parameter_id)
            .ok_or_else(|| TaskOpsError::UnknownParameter {
                element_id: element_id.to_owned(),
                parameter_id: parameter_id.to_owned(),
            })?;
        param.value = value.into();
        Ok(())
    }

    /// Set the variable that receives the operator response, stored as given.
    /// An empty name clears it.
    pub fn set_result_variable(&mut self, element_id: &str, name: &str) -> Result<()> {
        let selection = self.selection_mut(element_id)?;
        selection.result_variable = (!name.is_empty()).then(|| name.to_owned());
        Ok(())
    }

    /// Number of elements with an operator bound.
    pub fn selection_count(&self) -> usize {
        self.selections.len()
    }

    pub fn selection(&self, element_id: &str) -> Option<&Selection> {
        self.selections.get(element_id)
    }

    fn selection_mut(&mut self, element_id: &str) -> Result<&mut Selection> {
        self.selections
            .get_mut(element_id)
            .ok_or_else(|| TaskOpsError::NoActiveSelection {
                element_id: element_id.to_owned(),
            })
    }

    /// Seed an element's selection from a saved document.
    ///
    /// The operator does not need to be in the catalog yet; discovery may not
    /// have answered.
    pub fn restore_selection(&mut self, element_id: &str, selection: Selection) {
        tracing::debug!(element = %element_id, operator = %selection.operator_id, "Selection restored");
        self.selections.insert(element_id.to_owned(), selection);
    }

    /// The element's operator id if it is still offered by the catalog.
    pub fn option_label(&self, element_id: &str) -> Option<&str> {
        let selection = self.selections.get(element_id)?;
        self.find(&selection.operator_id).map(|op| op.id.as_str())
    }

    pub fn retained(&self) -> &RetainedParameters {
        &self.retained
    }

    /// End the catalog's lifetime, dropping all session state.
    pub fn dispose(self) {
        tracing::debug!(
            operators = self.operators.len(),
            selections = self.selections.len(),
            retained = self.retained.len(),
            "Operator catalog disposed"
        );
    }
}

impl Default for OperatorCatalog {
    fn default() -> Self {
        Self::with_table(CategoryTable::default())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use taskops_types::ParameterSpec;

    fn example_catalog() -> OperatorCatalog {
        let mut catalog = OperatorCatalog::default();
        catalog.load_catalog(vec![
            Operator::new("slack-notify", vec![]),
            Operator::new("http-fetch", vec![ParameterSpec::new("url", "string")]),
        ]);
        catalog
    }

    #[test]
    fn example_scenario() {
        let mut catalog = example_catalog();

        let groups = catalog.categorize("");
        assert_eq!(groups[0].category, "Messaging");
        assert_eq!(groups[1].category, "Data Processing");

        let sel = catalog.select_operator("task1", "http-fetch").unwrap();
        assert_eq!(sel.operator_id, "http-fetch");
        assert_eq!(sel.parameters.len(), 1);
        assert_eq!(sel.parameters[0].id, "url");
        assert_eq!(sel.parameters[0].value, "");

        catalog.set_parameter_value("task1", "url", "https://x").unwrap();
        catalog.select_operator("task1", "slack-notify").unwrap();
        let sel = catalog.select_operator("task1", "http-fetch").unwrap();
        assert_eq!(sel.parameters[0].id, "url");
        assert_eq!(sel.parameters[0].value, "https://x");
    }

    #[test]
    fn fresh_selection_has_blank_values_in_spec_order() {
        let mut catalog = OperatorCatalog::default();
        catalog.load_catalog(vec![Operator::new(
            "mysql-query",
            vec![
                ParameterSpec::new("host", "string"),
                ParameterSpec::new("port", "integer"),
                ParameterSpec::new("query", "string"),
            ],
        )]);
        let sel = catalog.select_operator("task1", "mysql-query").unwrap();
        assert_eq!(sel.parameter_ids(), vec!["host", "port", "query"]);
        assert!(sel.parameters.iter().all(|p| p.value.is_empty()));
    }

    #[test]
    fn unknown_operator_leaves_selection_unchanged() {
        let mut catalog = example_catalog();
        catalog.select_operator("task1", "http-fetch").unwrap();
        catalog.set_parameter_value("task1", "url", "https://x").unwrap();
        let before = catalog.selection("task1").cloned();

        let err = catalog.select_operator("task1", "nope").unwrap_err();
        assert!(matches!(err, TaskOpsError::OperatorNotFound { ref operator_id } if operator_id == "nope"));
        assert_eq!(catalog.selection("task1").cloned(), before);
        assert!(catalog.retained().is_empty());
    }

    #[test]
    fn unknown_operator_on_unbound_element_creates_nothing() {
        let mut catalog = example_catalog();
        assert!(catalog.select_operator("task1", "nope").is_err());
        assert!(catalog.selection("task1").is_none());
    }

    #[test]
    fn set_parameter_without_selection_fails() {
        let mut catalog = example_catalog();
        let err = catalog.set_parameter_value("task1", "url", "x").unwrap_err();
        assert!(matches!(err, TaskOpsError::NoActiveSelection { .. }));
    }

    #[test]
    fn set_unknown_parameter_fails_and_keeps_values() {
        let mut catalog = example_catalog();
        catalog.select_operator("task1", "http-fetch").unwrap();
        catalog.set_parameter_value("task1", "url", "a").unwrap();
        let err = catalog.set_parameter_value("task1", "body", "b").unwrap_err();
        assert!(matches!(err, TaskOpsError::UnknownParameter { ref parameter_id, .. } if parameter_id == "body"));
        assert_eq!(catalog.selection("task1").unwrap().parameters[0].value, "a");
    }

    #[test]
    fn switching_parks_previous_values() {
        let mut catalog = example_catalog();
        catalog.select_operator("task1", "http-fetch").unwrap();
        catalog.set_parameter_value("task1", "url", "a").unwrap();
        assert!(catalog.retained().is_empty());

        catalog.select_operator("task1", "slack-notify").unwrap();
        assert_eq!(
            catalog.retained().get("task1", "http-fetch").unwrap()[0].value,
            "a"
        );
    }

    #[test]
    fn retained_values_are_per_element() {
        let mut catalog = example_catalog();
        catalog.select_operator("task1", "http-fetch").unwrap();
        catalog.set_parameter_value("task1", "url", "a").unwrap();
        catalog.select_operator("task1", "slack-notify").unwrap();

        let sel = catalog.select_operator("task2", "http-fetch").unwrap();
        assert_eq!(sel.parameters[0].value, "");
    }

    #[test]
    fn reselecting_bound_operator_is_a_no_op() {
        let mut catalog = example_catalog();
        catalog.select_operator("task1", "http-fetch").unwrap();
        catalog.set_parameter_value("task1", "url", "a").unwrap();
        catalog.set_result_variable("task1", "response").unwrap();

        let sel = catalog.select_operator("task1", "http-fetch").unwrap();
        assert_eq!(sel.parameters[0].value, "a");
        assert_eq!(sel.result_variable.as_deref(), Some("response"));
        assert!(catalog.retained().is_empty());
    }

    #[test]
    fn switching_operator_clears_result_variable() {
        let mut catalog = example_catalog();
        catalog.select_operator("task1", "http-fetch").unwrap();
        catalog.set_result_variable("task1", "response").unwrap();
        let sel = catalog.select_operator("task1", "slack-notify").unwrap();
        assert!(sel.result_variable.is_none());
    }

    #[test]
    fn empty_result_variable_clears() {
        let mut catalog = example_catalog();
        catalog.select_operator("task1", "slack-notify").unwrap();
        catalog.set_result_variable("task1", "out").unwrap();
        catalog.set_result_variable("task1", "").unwrap();
        assert!(catalog.selection("task1").unwrap().result_variable.is_none());
    }

    #[test]
    fn result_variable_is_stored_verbatim() {
        let mut catalog = example_catalog();
        catalog.select_operator("task1", "slack-notify").unwrap();
        catalog.set_result_variable("task1", " out").unwrap();
        assert_eq!(
            catalog.selection("task1").unwrap().result_variable.as_deref(),
            Some(" out")
        );
    }

    #[test]
    fn result_variable_requires_selection() {
        let mut catalog = example_catalog();
        assert!(catalog.set_result_variable("task1", "out").is_err());
    }

    #[test]
    fn duplicate_ids_first_wins() {
        let mut catalog = OperatorCatalog::default();
        catalog.load_catalog(vec![
            Operator::new("dup", vec![ParameterSpec::new("first", "string")]),
            Operator::new("dup", vec![ParameterSpec::new("second", "string")]),
        ]);
        let sel = catalog.select_operator("task1", "dup").unwrap();
        assert_eq!(sel.parameter_ids(), vec!["first"]);
    }

    #[test]
    fn reload_keeps_stale_selection() {
        let mut catalog = example_catalog();
        catalog.select_operator("task1", "http-fetch").unwrap();
        catalog.load_catalog(vec![Operator::new("slack-notify", vec![])]);

        assert_eq!(catalog.selection("task1").unwrap().operator_id, "http-fetch");
        assert_eq!(catalog.option_label("task1"), None);
        assert!(catalog.select_operator("task1", "http-fetch").is_err());
    }

    #[test]
    fn reload_does_not_clear_retained_values() {
        let mut catalog = example_catalog();
        catalog.select_operator("task1", "http-fetch").unwrap();
        catalog.set_parameter_value("task1", "url", "keep").unwrap();
        catalog.select_operator("task1", "slack-notify").unwrap();

        catalog.load_catalog(vec![
            Operator::new("http-fetch", vec![ParameterSpec::new("url", "string")]),
            Operator::new("slack-notify", vec![]),
        ]);
        let sel = catalog.select_operator("task1", "http-fetch").unwrap();
        assert_eq!(sel.parameters[0].value, "keep");
    }

    #[test]
    fn option_label_for_current_operator() {
        let mut catalog = example_catalog();
        assert_eq!(catalog.option_label("task1"), None);
        catalog.select_operator("task1", "slack-notify").unwrap();
        assert_eq!(catalog.option_label("task1"), Some("slack-notify"));
    }

    #[test]
    fn restore_selection_before_catalog_loads() {
        let mut catalog = OperatorCatalog::default();
        let mut saved = Selection::new("http-fetch", vec![]);
        saved.result_variable = Some("out".into());
        catalog.restore_selection("task1", saved.clone());
        assert_eq!(catalog.selection("task1"), Some(&saved));
        assert_eq!(catalog.option_label("task1"), None);
    }

    #[test]
    fn empty_catalog_rejects_selection() {
        let mut catalog = OperatorCatalog::default();
        assert!(catalog.is_empty());
        assert!(catalog.categorize("").is_empty());
        assert!(catalog.select_operator("task1", "slack-notify").is_err());
    }

    #[test]
    fn dispose_after_session_state_accumulates() {
        let mut catalog = example_catalog();
        assert_eq!(catalog.selection_count(), 0);
        catalog.select_operator("task1", "http-fetch").unwrap();
        catalog.select_operator("task1", "slack-notify").unwrap();
        catalog.select_operator("task2", "slack-notify").unwrap();

        assert_eq!(catalog.selection_count(), 2);
        assert_eq!(catalog.retained().len(), 1);
        assert!(catalog.retained().contains("task1", "http-fetch"));
        catalog.dispose();
    }

    #[test]
    fn new_rejects_unvalidated_table() {
        // Deserializing directly skips the checks in `CategoryTable::from_json`.
        let table: CategoryTable = serde_json::from_str(
            r#"{"rules": [{"name": "Chat", "keywords": [""]}]}"#,
        )
        .unwrap();
        let err = OperatorCatalog::new(table).unwrap_err();
        assert!(matches!(err, TaskOpsError::InvalidCategoryTable(_)));
    }

    #[test]
    fn new_with_valid_table_groups_by_it() {
        let table = CategoryTable::new(
            vec![crate::category::CategoryRule::new("Chat", &["slack"])],
            "Misc",
        )
        .unwrap();
        let mut catalog = OperatorCatalog::new(table).unwrap();
        catalog.load_catalog(vec![
            Operator::new("mysql-q", vec![]),
            Operator::new("slack-post", vec![]),
        ]);
        let groups = catalog.categorize("");
        assert_eq!(groups[0].category, "Chat");
        assert_eq!(groups[1].category, "Misc");
        assert_eq!(groups[1].ids(), vec!["mysql-q"]);
    }
}
