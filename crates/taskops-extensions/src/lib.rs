//! Extension-element editing for service, script, send, and looping tasks.
//!
//! Provides `ExtensionDocument` (an in-memory `ExtensionHost`), create-on-demand
//! editors for scripts, script unit tests and message payloads, data object and
//! data store reference selection, and the loop characteristics model.

pub mod data_refs;
pub mod document;
pub mod loops;
pub mod message_payload;
pub mod scripts;

pub use data_refs::{available_data, data_reference, select_data_reference, DataRefKind};
pub use document::{ExtensionDocument, ExtensionNode};
pub use loops::{LoopCharacteristics, LoopValue};
pub use message_payload::{message_payload, set_message_payload};
pub use scripts::{script, set_script, ScriptType};
pub use unit_tests::{
    add_unit_test, list_unit_tests, remove_unit_test, set_unit_test_expected_output,
    set_unit_test_id, set_unit_test_input, ScriptUnitTest,
};
