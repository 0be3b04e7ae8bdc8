//! Shared types, errors, and host capabilities for service-task operator selection.
//!
//! This crate provides the foundational types used across all other taskops crates:
//! - `TaskOpsError` — unified error taxonomy
//! - `Operator` / `ParameterSpec` — what the host's discovery collaborator delivers
//! - `Selection` / `ParameterValue` — the operator bound to one diagram element
//! - `ExtensionHost` — the create-on-demand capability of the hosting document

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error type for all taskops subsystems.
#[derive(Debug, thiserror::Error)]
pub enum TaskOpsError {
    // === Selection Errors ===
    #[error("Operator '{operator_id}' is not in the loaded catalog")]
    OperatorNotFound { operator_id: String },

    #[error("Element '{element_id}' has no operator selected")]
    NoActiveSelection { element_id: String },

    #[error("Parameter '{parameter_id}' is not defined for the operator selected on '{element_id}'")]
    UnknownParameter {
        element_id: String,
        parameter_id: String,
    },

    // === Configuration Errors ===
    #[error("Invalid category table: {0}")]
    InvalidCategoryTable(String),

    // === Host Document Errors ===
    #[error("Element '{element_id}' does not exist in the document")]
    UnknownElement { element_id: String },

    #[error("Extension {handle} does not exist in the document")]
    UnknownExtension { handle: ExtensionHandle },

    // === Generic ===
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl TaskOpsError {
    /// Returns `true` for the failures a selection form reports to the user.
    ///
    /// These never affect catalog consistency; the failed operation changed nothing.
    pub fn is_selection_error(&self) -> bool {
        matches!(
            self,
            TaskOpsError::OperatorNotFound { .. }
                | TaskOpsError::NoActiveSelection { .. }
                | TaskOpsError::UnknownParameter { .. }
        )
    }

    /// Returns `true` if the error comes from bad configuration and retrying will not help.
    pub fn is_terminal(&self) -> bool {
        matches!(
            self,
            TaskOpsError::InvalidCategoryTable(_) | TaskOpsError::Json(_)
        )
    }
}

/// A convenience alias for `Result<T, TaskOpsError>`.
pub type Result<T> = std::result::Result<T, TaskOpsError>;

// ---------------------------------------------------------------------------
// Operator catalog entries
// ---------------------------------------------------------------------------

/// Declared input slot of an operator.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterSpec {
    pub id: String,
    /// Free-form value type tag such as `string` or `integer`.
    #[serde(rename = "type", default)]
    pub type_name: String,
}

impl ParameterSpec {
    pub fn new(id: impl Into<String>, type_name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            type_name: type_name.into(),
        }
    }
}

/// One invokable integration. The id doubles as its display name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Operator {
    pub id: String,
    #[serde(default)]
    pub parameters: Vec<ParameterSpec>,
}

impl Operator {
    pub fn new(id: impl Into<String>, parameters: Vec<ParameterSpec>) -> Self {
        Self {
            id: id.into(),
            parameters,
        }
    }

    /// Fresh parameter values for this operator, all empty, in declaration order.
    pub fn blank_parameters(&self) -> Vec<ParameterValue> {
        self.parameters.iter().map(ParameterValue::blank).collect()
    }
}

// ---------------------------------------------------------------------------
// Selection — the operator bound to one diagram element
// ---------------------------------------------------------------------------

/// A parameter bound to a concrete operator selection.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ParameterValue {
    pub id: String,
    #[serde(rename = "type", default)]
    pub type_name: String,
    #[serde(default)]
    pub value: String,
}

impl ParameterValue {
    /// Instantiate `spec` with an empty value.
    pub fn blank(spec: &ParameterSpec) -> Self {
        Self {
            id: spec.id.clone(),
            type_name: spec.type_name.clone(),
            value: String::new(),
        }
    }
}

/// Which operator a diagram element uses, with its parameter values.
///
/// The parameter list always mirrors the operator's `parameters` (same length,
/// same id order) as they were when the operator was selected.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Selection {
    pub operator_id: String,
    /// Variable the operator response is stored in. `None` discards the response.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result_variable: Option<String>,
    #[serde(default)]
    pub parameters: Vec<ParameterValue>,
}

impl Selection {
    pub fn new(operator_id: impl Into<String>, parameters: Vec<ParameterValue>) -> Self {
        Self {
            operator_id: operator_id.into(),
            result_variable: None,
            parameters,
        }
    }

    /// Look up a parameter value by id.
    pub fn parameter(&self, id: &str) -> Option<&ParameterValue> {
        self.parameters.iter().find(|p| p.id == id)
    }

    /// Parameter ids in order.
    pub fn parameter_ids(&self) -> Vec<&str> {
        self.parameters.iter().map(|p| p.id.as_str()).collect()
    }
}

// ---------------------------------------------------------------------------
// ExtensionHost — create-on-demand access to the hosting document
// ---------------------------------------------------------------------------

/// Extension element kinds written into the hosting document.
pub mod kinds {
    pub const SERVICE_TASK_OPERATOR: &str = "spiffworkflow:ServiceTaskOperator";
    pub const PARAMETERS: &str = "spiffworkflow:Parameters";
    pub const PARAMETER: &str = "spiffworkflow:Parameter";
    pub const UNIT_TESTS: &str = "spiffworkflow:unitTests";
    pub const UNIT_TEST: &str = "spiffworkflow:unitTest";
    pub const INPUT_JSON: &str = "spiffworkflow:inputJson";
    pub const EXPECTED_OUTPUT_JSON: &str = "spiffworkflow:expectedOutputJson";
    pub const MESSAGE_PAYLOAD: &str = "spiffworkflow:messagePayload";
    pub const PRE_SCRIPT: &str = "spiffworkflow:preScript";
    pub const POST_SCRIPT: &str = "spiffworkflow:postScript";

    // Diagram element kinds that data references point at.
    pub const DATA_OBJECT: &str = "bpmn:DataObject";
    pub const DATA_STORE: &str = "bpmn:DataStore";
}

/// Opaque reference to an extension element owned by the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct ExtensionHandle(pub u64);

impl fmt::Display for ExtensionHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// Capability the hosting document exposes for reading and building extension elements.
///
/// Extensions hang off diagram elements; each extension has string properties
/// and ordered typed children. Diagram elements carry a kind and their own
/// string properties.
pub trait ExtensionHost {
    /// Ids of the diagram elements of `kind`, in document order.
    fn elements_of_kind(&self, kind: &str) -> Vec<String>;

    fn element_property(&self, element_id: &str, name: &str) -> Result<Option<String>>;

    fn set_element_property(&mut self, element_id: &str, name: &str, value: &str) -> Result<()>;

    /// Extensions of `kind` attached to an element, in document order.
    /// Unknown elements have none.
    fn extensions(&self, element_id: &str, kind: &str) -> Vec<ExtensionHandle>;

    /// Append a new, empty extension of `kind` to an element.
    fn create_extension(&mut self, element_id: &str, kind: &str) -> Result<ExtensionHandle>;

    /// Detach an extension from an element. Returns `false` if it was not attached.
    fn remove_extension(&mut self, element_id: &str, handle: ExtensionHandle) -> Result<bool>;

    /// Append a new, empty child of `kind` under `parent`.
    fn create_child(&mut self, parent: ExtensionHandle, kind: &str) -> Result<ExtensionHandle>;

    /// Children of `kind` under `parent`, in document order.
    fn children(&self, parent: ExtensionHandle, kind: &str) -> Result<Vec<ExtensionHandle>>;

    /// Detach a child. Returns `false` if it was not a child of `parent`.
    fn remove_child(&mut self, parent: ExtensionHandle, child: ExtensionHandle) -> Result<bool>;

    fn property(&self, handle: ExtensionHandle, name: &str) -> Result<Option<String>>;

    fn set_property(&mut self, handle: ExtensionHandle, name: &str, value: &str) -> Result<()>;

    /// Next unused identifier starting with `prefix`.
    fn next_id(&mut self, prefix: &str) -> String;
}
