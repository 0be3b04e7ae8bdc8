//! Parameter values remembered per `(element, operator)` for the editing session.
//!
//! When an element switches away from an operator, its values are parked here so
//! switching back restores them. Entries are never evicted.

use std::collections::HashMap;

use taskops_types::ParameterValue;

#[derive(Debug, Default)]
pub struct RetainedParameters {
    entries: HashMap<(String, String), Vec<ParameterValue>>,
}

impl RetainedParameters {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, element_id: &str, operator_id: &str) -> Option<&[ParameterValue]> {
        self.entries
            .get(&(element_id.to_owned(), operator_id.to_owned()))
            .map(Vec::as_slice)
    }

    /// Remember `values`, replacing whatever was stored for the pair.
    pub fn store(&mut self, element_id: &str, operator_id: &str, values: Vec<ParameterValue>) {
        tracing::debug!(
            element = %element_id,
            operator = %operator_id,
            count = values.len(),
            "Retaining parameter values"
        );
        self.entries
            .insert((element_id.to_owned(), operator_id.to_owned()), values);
    }

    pub fn contains(&self, element_id: &str, operator_id: &str) -> bool {
        self.get(element_id, operator_id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
