//! Recognises tool requests in model replies.
//!
//! The only accepted shape is `CALL:<name>(<anything>)`. Whatever sits
//! between the parentheses is ignored and the tool is always invoked with no
//! arguments.

use crate::tools::ToolInvocation;

/// Marks a reply as a tool request. Must be the very first characters.
pub const CALL_PREFIX: &str = "CALL:";

/// Extract the tool invocation from a model reply, if it asks for one.
///
/// Never fails: a reply without `(` uses the whole remainder as the name.
pub fn parse_tool_call(reply: &str) -> Option<ToolInvocation> {
    let rest = reply.strip_prefix(CALL_PREFIX)?;
    let name = rest.split_once('(').map_or(rest, |(name, _)| name).trim();
    Some(ToolInvocation::new(name))
}
