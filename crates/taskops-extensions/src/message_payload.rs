//! Payload expression of a message, stored as a `messagePayload` extension on the message.

use taskops_types::{kinds, ExtensionHost, Result};

const PAYLOAD_PROPERTY: &str = "messagePayload";

/// The message's payload, or `""` when none has been written.
pub fn message_payload(host: &dyn ExtensionHost, message_id: &str) -> Result<String> {
    match host.extensions(message_id, kinds::MESSAGE_PAYLOAD).first() {
        Some(&block) => Ok(host.property(block, PAYLOAD_PROPERTY)?.unwrap_or_default()),
        None => Ok(String::new()),
    }
}

/// Write the payload, creating the extension block on first write.
pub fn set_message_payload(
    host: &mut dyn ExtensionHost,
    message_id: &str,
    payload: &str,
) -> Result<()> {
    let block = match host.extensions(message_id, kinds::MESSAGE_PAYLOAD).first() {
        Some(&block) => block,
        None => {
            tracing::debug!(message = %message_id, "Creating message payload block");
            host.create_extension(message_id, kinds::MESSAGE_PAYLOAD)?
        }
    };
    host.set_property(block, PAYLOAD_PROPERTY, payload)
}
