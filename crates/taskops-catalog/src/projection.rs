//! Writing a [`Selection`] into the hosting document and reading it back.
//!
//! ```text
//! <spiffworkflow:ServiceTaskOperator id="http-fetch" resultVariable="response">
//!   <spiffworkflow:Parameters>
//!     <spiffworkflow:Parameter id="url" type="string" value="https://x"/>
//!   </spiffworkflow:Parameters>
//! </spiffworkflow:ServiceTaskOperator>
//! ```

use taskops_types::{kinds, ExtensionHost, ParameterValue, Result, Selection};

/// Replace the element's operator block with one describing `selection`.
pub fn project_selection(
    host: &mut dyn ExtensionHost,
    element_id: &str,
    selection: &Selection,
) -> Result<()> {
    for existing in host.extensions(element_id, kinds::SERVICE_TASK_OPERATOR) {
        host.remove_extension(element_id, existing)?;
    }

    let block = host.create_extension(element_id, kinds::SERVICE_TASK_OPERATOR)?;
    host.set_property(block, "id", &selection.operator_id)?;
    if let Some(result_variable) = &selection.result_variable {
        host.set_property(block, "resultVariable", result_variable)?;
    }

    let list = host.create_child(block, kinds::PARAMETERS)?;
    for param in &selection.parameters {
        let node = host.create_child(list, kinds::PARAMETER)?;
        host.set_property(node, "id", &param.id)?;
        host.set_property(node, "type", &param.type_name)?;
        host.set_property(node, "value", &param.value)?;
    }

    tracing::debug!(
        element = %element_id,
        operator = %selection.operator_id,
        parameters = selection.parameters.len(),
        "Selection written to document"
    );
    Ok(())
}

/// Read the element's operator block, if it has one.
///
/// Only the first block counts; a block without an `id` is treated as absent.
pub fn read_projection(host: &dyn ExtensionHost, element_id: &str) -> Result<Option<Selection>> {
    let Some(block) = host
        .extensions(element_id, kinds::SERVICE_TASK_OPERATOR)
        .into_iter()
        .next()
    else {
        return Ok(None);
    };
    let Some(operator_id) = host.property(block, "id")? else {
        return Ok(None);
    };

    let mut parameters = Vec::new();
    for list in host.children(block, kinds::PARAMETERS)? {
        for node in host.children(list, kinds::PARAMETER)? {
            parameters.push(ParameterValue {
                id: host.property(node, "id")?.unwrap_or_default(),
                type_name: host.property(node, "type")?.unwrap_or_default(),
                value: host.property(node, "value")?.unwrap_or_default(),
            });
        }
    }

    let mut selection = Selection::new(operator_id, parameters);
    selection.result_variable = host
        .property(block, "resultVariable")?
        .filter(|v| !v.is_empty());
    Ok(Some(selection))
}
