//! Data object and data store references.
//!
//! A reference element points at one data object (or data store) through its
//! `dataObjectRef` (or `dataStoreRef`) property and mirrors the target's name.

use serde::{Deserialize, Serialize};
use taskops_types::{kinds, ExtensionHost, Result, TaskOpsError};

const NAME_PROPERTY: &str = "name";

/// What a reference element points at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DataRefKind {
    Object,
    Store,
}

impl DataRefKind {
    /// Element kind of the reference targets.
    pub fn target_kind(self) -> &'static str {
        match self {
            DataRefKind::Object => kinds::DATA_OBJECT,
            DataRefKind::Store => kinds::DATA_STORE,
        }
    }

    /// Property on the reference element that names the target.
    pub fn ref_property(self) -> &'static str {
        match self {
            DataRefKind::Object => "dataObjectRef",
            DataRefKind::Store => "dataStoreRef",
        }
    }
}

/// Ids of the data objects or data stores a reference may point at.
pub fn available_data(host: &dyn ExtensionHost, kind: DataRefKind) -> Vec<String> {
    host.elements_of_kind(kind.target_kind())
}

/// The target the reference currently points at, if any.
pub fn data_reference(
    host: &dyn ExtensionHost,
    reference_id: &str,
    kind: DataRefKind,
) -> Result<Option<String>> {
    Ok(host
        .element_property(reference_id, kind.ref_property())?
        .filter(|id| !id.is_empty()))
}

/// Point the reference at `target_id` and copy the target's name onto it.
///
/// A target without a name lends its id instead. Fails with `UnknownElement`
/// if `target_id` is not a data object (or data store) in the document.
pub fn select_data_reference(
    host: &mut dyn ExtensionHost,
    reference_id: &str,
    kind: DataRefKind,
    target_id: &str,
) -> Result<()> {
    if !available_data(host, kind).iter().any(|id| id == target_id) {
        return Err(TaskOpsError::UnknownElement {
            element_id: target_id.to_string(),
        });
    }
    let name = host
        .element_property(target_id, NAME_PROPERTY)?
        .filter(|n| !n.is_empty())
        .unwrap_or_else(|| target_id.to_string());

    host.set_element_property(reference_id, kind.ref_property(), target_id)?;
    host.set_element_property(reference_id, NAME_PROPERTY, &name)?;
    tracing::debug!(
        reference = %reference_id,
        target = %target_id,
        ?kind,
        "Data reference selected"
    );
    Ok(())
}
