//! Prompt text sent to the model.

use crate::parser::CALL_PREFIX;
use crate::tools::ToolDescriptor;

/// Ask the model to either answer or request exactly one tool.
pub fn decision_prompt(tools: &[ToolDescriptor], user_text: &str) -> String {
    let tool_list = if tools.is_empty() {
        "(no tools available)".to_string()
    } else {
        tools
            .iter()
            .map(ToString::to_string)
            .collect::<Vec<_>>()
            .join("\n")
    };

    format!(
        "You have access to the following tools:\n\
         {tool_list}\n\
         \n\
         If a tool is needed to answer the question, reply with only this line and nothing else:\n\
         {CALL_PREFIX}tool_name(argument=value)\n\
         \n\
         If no tool is needed, answer the question directly.\n\
         \n\
         Question: {user_text}"
    )
}

/// Hand a tool's output back to the model for the final answer.
pub fn follow_up_prompt(tool_output: &str) -> String {
    format!(
        "The tool returned the following result:\n{tool_output}\n\
         Use this to answer the user."
    )
}
