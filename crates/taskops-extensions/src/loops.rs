//! Loop characteristics of an activity.
//!
//! A loop property holds plain text, a formal expression, or a reference to
//! another element. The form shows expressions by body and references by id.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum LoopValue {
    Text { value: String },
    Expression { body: String },
    Reference { id: String },
}

impl LoopValue {
    pub fn text(value: impl Into<String>) -> Self {
        LoopValue::Text {
            value: value.into(),
        }
    }

    pub fn expression(body: impl Into<String>) -> Self {
        LoopValue::Expression { body: body.into() }
    }

    pub fn reference(id: impl Into<String>) -> Self {
        LoopValue::Reference { id: id.into() }
    }

    /// What the form field displays for this value.
    pub fn display(&self) -> &str {
        match self {
            LoopValue::Text { value } => value,
            LoopValue::Expression { body } => body,
            LoopValue::Reference { id } => id,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoopCharacteristics {
    #[serde(default)]
    pub sequential: bool,
    #[serde(default)]
    properties: BTreeMap<String, LoopValue>,
}

impl LoopCharacteristics {
    pub fn new(sequential: bool) -> Self {
        Self {
            sequential,
            properties: BTreeMap::new(),
        }
    }

    /// Display value of a property; `""` when unset.
    pub fn get_loop_property(&self, name: &str) -> &str {
        self.properties
            .get(name)
            .map(LoopValue::display)
            .unwrap_or("")
    }

    pub fn loop_value(&self, name: &str) -> Option<&LoopValue> {
        self.properties.get(name)
    }

    pub fn set_loop_property(&mut self, name: impl Into<String>, value: LoopValue) {
        self.properties.insert(name.into(), value);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unset_property_is_empty() {
        let lc = LoopCharacteristics::new(false);
        assert_eq!(lc.get_loop_property("loopCardinality"), "");
        assert!(lc.loop_value("loopCardinality").is_none());
    }

    #[test]
    fn display_by_value_kind() {
        let mut lc = LoopCharacteristics::new(true);
        lc.set_loop_property("loopCardinality", LoopValue::expression("len(items)"));
        lc.set_loop_property("loopDataInputRef", LoopValue::reference("items"));
        lc.set_loop_property("completionCondition", LoopValue::text("done"));

        assert_eq!(lc.get_loop_property("loopCardinality"), "len(items)");
        assert_eq!(lc.get_loop_property("loopDataInputRef"), "items");
        assert_eq!(lc.get_loop_property("completionCondition"), "done");
        assert!(lc.sequential);
    }

    #[test]
    fn set_overwrites() {
        let mut lc = LoopCharacteristics::default();
        lc.set_loop_property("loopCardinality", LoopValue::text("3"));
        lc.set_loop_property("loopCardinality", LoopValue::expression("n"));
        assert_eq!(
            lc.loop_value("loopCardinality"),
            Some(&LoopValue::expression("n"))
        );
    }

    #[test]
    fn value_serializes_with_kind_tag() {
        let json = serde_json::to_string(&LoopValue::reference("items")).unwrap();
        assert_eq!(json, r#"{"kind":"reference","id":"items"}"#);
    }
}
