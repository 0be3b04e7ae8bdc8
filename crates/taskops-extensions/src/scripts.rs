//! Script bodies attached to tasks.
//!
//! A script task keeps its body in the element's own `script` property. Any
//! task can also carry pre- and post-scripts, stored as `preScript` /
//! `postScript` extensions whose `value` property holds the code.

use serde::{Deserialize, Serialize};
use taskops_types::{kinds, ExtensionHost, Result};

const SCRIPT_PROPERTY: &str = "script";
const VALUE_PROPERTY: &str = "value";

/// Which of a task's scripts to read or write.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScriptType {
    /// The body of a script task.
    Bpmn,
    /// Runs before the task.
    Pre,
    /// Runs after the task.
    Post,
}

impl ScriptType {
    /// Extension kind holding this script, or `None` for a script task body.
    pub fn extension_kind(self) -> Option<&'static str> {
        match self {
            ScriptType::Bpmn => None,
            ScriptType::Pre => Some(kinds::PRE_SCRIPT),
            ScriptType::Post => Some(kinds::POST_SCRIPT),
        }
    }
}

/// The script's code, or `""` when none has been written.
///
/// Script task bodies require the element to exist; pre/post scripts of an
/// unknown element read as empty.
pub fn script(
    host: &dyn ExtensionHost,
    element_id: &str,
    script_type: ScriptType,
) -> Result<String> {
    let Some(kind) = script_type.extension_kind() else {
        return Ok(host
            .element_property(element_id, SCRIPT_PROPERTY)?
            .unwrap_or_default());
    };
    match host.extensions(element_id, kind).first() {
        Some(&block) => Ok(host.property(block, VALUE_PROPERTY)?.unwrap_or_default()),
        None => Ok(String::new()),
    }
}

/// Write the script's code. Pre/post script extensions are created on first write.
pub fn set_script(
    host: &mut dyn ExtensionHost,
    element_id: &str,
    script_type: ScriptType,
    code: &str,
) -> Result<()> {
    let Some(kind) = script_type.extension_kind() else {
        return host.set_element_property(element_id, SCRIPT_PROPERTY, code);
    };
    let block = match host.extensions(element_id, kind).first() {
        Some(&block) => block,
        None => {
            tracing::debug!(element = %element_id, kind, "Creating script block");
            host.create_extension(element_id, kind)?
        }
    };
    host.set_property(block, VALUE_PROPERTY, code)
}
