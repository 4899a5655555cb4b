use crate::message::Message;

const IM_START: &str = "<|im_start|>";
const IM_END: &str = "<|im_end|>";

/// Render a conversation as ChatML text:
/// `<|im_start|>role\ncontent<|im_end|>` per turn, joined with newlines.
///
/// Turns whose role is not system/user/assistant are dropped.
pub fn to_chatml(messages: &[Message]) -> String {
    let mut parts = Vec::with_capacity(messages.len());

    for msg in messages {
        match msg.role() {
            Some(role) => {
                parts.push(format!("{}{}\n{}{}", IM_START, role.as_str(), msg.content, IM_END));
            }
            None => {
                log::debug!("Skipping message with unsupported role {:?}", msg.role);
            }
        }
    }

    parts.join("\n")
}
