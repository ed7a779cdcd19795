//! Pretty-printing of objects and native records.
//!
//! Colors follow jq conventions:
//! - Strings: green
//! - Numbers: cyan
//! - Booleans: yellow
//! - None/null: bright black (dimmed)
//! - Attribute names and keys: blue

use colored::{Color, Colorize};
use spicebridge_core::{Object, Value};

/// Configuration for pretty printing.
#[derive(Debug, Clone, Copy)]
pub struct PrettyConfig {
    /// Enable colored output.
    pub color: bool,
    /// Digits after the decimal point for floats.
    pub precision: usize,
    /// Indent string (usually 2 spaces).
    pub indent: &'static str,
}

impl Default for PrettyConfig {
    fn default() -> Self {
        Self {
            color: true,
            precision: 6,
            indent: "  ",
        }
    }
}

fn colorize(s: &str, color: Color, enabled: bool) -> String {
    if enabled {
        s.color(color).to_string()
    } else {
        s.to_string()
    }
}

/// Render an object as `<Type: attr = value, ...>`.
pub fn pretty_object(obj: &Object, config: &PrettyConfig) -> String {
    let mut output = String::new();
    format_object(obj, config, &mut output);
    output
}

fn format_object(obj: &Object, config: &PrettyConfig, output: &mut String) {
    output.push('<');
    output.push_str(&colorize(&obj.qualified_name(), Color::Magenta, config.color));
    output.push(':');
    for (i, (name, value)) in obj.attrs.iter().enumerate() {
        output.push_str(if i == 0 { " " } else { ", " });
        output.push_str(&colorize(name, Color::Blue, config.color));
        output.push_str(" = ");
        format_value(value, config, output);
    }
    output.push('>');
}

fn format_value(value: &Value, config: &PrettyConfig, output: &mut String) {
    match value {
        Value::None => output.push_str(&colorize("None", Color::BrightBlack, config.color)),
        Value::Bool(b) => {
            let s = if *b { "True" } else { "False" };
            output.push_str(&colorize(s, Color::Yellow, config.color));
        }
        Value::Int(i) => output.push_str(&colorize(&i.to_string(), Color::Cyan, config.color)),
        Value::Float(f) => {
            let s = format!("{:.*}", config.precision, f);
            output.push_str(&colorize(&s, Color::Cyan, config.color));
        }
        Value::Str(s) => output.push_str(&colorize(&format!("{:?}", s), Color::Green, config.color)),
        Value::List(items) => {
            output.push('[');
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    output.push_str(", ");
                }
                format_value(item, config, output);
            }
            output.push(']');
        }
        Value::Object(obj) => format_object(obj, config, output),
    }
}

/// Pretty-print a JSON value (native records) with colors.
pub fn pretty_json(value: &serde_json::Value, config: &PrettyConfig) -> String {
    let mut output = String::new();
    format_json_value(value, config, 0, &mut output);
    output
}

fn format_json_value(
    value: &serde_json::Value,
    config: &PrettyConfig,
    depth: usize,
    output: &mut String,
) {
    match value {
        serde_json::Value::Null => {
            output.push_str(&colorize("null", Color::BrightBlack, config.color));
        }
        serde_json::Value::Bool(b) => {
            let s = if *b { "true" } else { "false" };
            output.push_str(&colorize(s, Color::Yellow, config.color));
        }
        serde_json::Value::Number(n) => {
            let s = match (n.is_f64(), n.as_f64()) {
                (true, Some(f)) => format!("{:.*}", config.precision, f),
                _ => n.to_string(),
            };
            output.push_str(&colorize(&s, Color::Cyan, config.color));
        }
        serde_json::Value::String(s) => {
            output.push_str(&colorize(&format!("{:?}", s), Color::Green, config.color));
        }
        serde_json::Value::Array(arr) => {
            // arrays of scalars stay on one line
            let simple = arr.iter().all(|v| !v.is_array() && !v.is_object());
            if arr.is_empty() || simple {
                output.push('[');
                for (i, item) in arr.iter().enumerate() {
                    if i > 0 {
                        output.push_str(", ");
                    }
                    format_json_value(item, config, depth + 1, output);
                }
                output.push(']');
            } else {
                output.push_str("[\n");
                for (i, item) in arr.iter().enumerate() {
                    output.push_str(&config.indent.repeat(depth + 1));
                    format_json_value(item, config, depth + 1, output);
                    if i < arr.len() - 1 {
                        output.push(',');
                    }
                    output.push('\n');
                }
                output.push_str(&config.indent.repeat(depth));
                output.push(']');
            }
        }
        serde_json::Value::Object(obj) => {
            if obj.is_empty() {
                output.push_str("{}");
                return;
            }
            output.push_str("{\n");
            for (i, (key, value)) in obj.iter().enumerate() {
                output.push_str(&config.indent.repeat(depth + 1));
                output.push_str(&colorize(&format!("\"{}\"", key), Color::Blue, config.color));
                output.push_str(": ");
                format_json_value(value, config, depth + 1, output);
                if i < obj.len() - 1 {
                    output.push(',');
                }
                output.push('\n');
            }
            output.push_str(&config.indent.repeat(depth));
            output.push('}');
        }
    }
}
