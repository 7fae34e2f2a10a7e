//! Tool-related types.

use std::collections::BTreeMap;
use std::fmt;

use serde_json::Value;

/// A tool as presented to the model.
#[derive(Debug, Clone, PartialEq)]
pub struct ToolDescriptor {
    pub name: String,
    pub description: String,
    pub parameters: BTreeMap<String, Parameter>,
}

/// One declared parameter of a tool.
#[derive(Debug, Clone, PartialEq)]
pub struct Parameter {
    /// JSON Schema type name, `any` when the schema leaves it open.
    pub kind: String,
    pub description: Option<String>,
    pub required: bool,
    pub default: Option<Value>,
}

impl From<mcp::Tool> for ToolDescriptor {
    fn from(tool: mcp::Tool) -> Self {
        let required: Vec<&str> = tool
            .input_schema
            .get("required")
            .and_then(Value::as_array)
            .map(|names| names.iter().filter_map(Value::as_str).collect())
            .unwrap_or_default();

        let parameters = tool
            .input_schema
            .get("properties")
            .and_then(Value::as_object)
            .map(|properties| {
                properties
                    .iter()
                    .map(|(name, schema)| {
                        let parameter = Parameter {
                            kind: schema
                                .get("type")
                                .and_then(Value::as_str)
                                .unwrap_or("any")
                                .to_string(),
                            description: schema
                                .get("description")
                                .and_then(Value::as_str)
                                .map(str::to_string),
                            required: required.contains(&name.as_str()),
                            default: schema.get("default").cloned(),
                        };
                        (name.clone(), parameter)
                    })
                    .collect()
            })
            .unwrap_or_default();

        Self {
            name: tool.name,
            description: tool.description.unwrap_or_default(),
            parameters,
        }
    }
}

impl fmt::Display for ToolDescriptor {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "- {}", self.name)?;
        if !self.description.is_empty() {
            write!(f, ": {}", self.description)?;
        }
        if self.parameters.is_empty() {
            return write!(f, "\n  parameters: none");
        }
        write!(f, "\n  parameters:")?;
        for (name, parameter) in &self.parameters {
            write!(f, "\n    {name} ({}", parameter.kind)?;
            if !parameter.required {
                write!(f, ", optional")?;
            }
            if let Some(default) = &parameter.default {
                write!(f, ", default {default}")?;
            }
            write!(f, ")")?;
            if let Some(description) = &parameter.description {
                write!(f, ": {description}")?;
            }
        }
        Ok(())
    }
}

/// A request to run one tool, parsed from a model reply.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolInvocation {
    pub tool_name: String,
    pub arguments: BTreeMap<String, String>,
}

impl ToolInvocation {
    /// An invocation with no arguments.
    pub fn new(tool_name: impl Into<String>) -> Self {
        Self {
            tool_name: tool_name.into(),
            arguments: BTreeMap::new(),
        }
    }
}

/// What a tool handed back, as text.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToolResult {
    pub content: String,
}

impl ToolResult {
    pub fn new(content: impl Into<String>) -> Self {
        Self {
            content: content.into(),
        }
    }
}
