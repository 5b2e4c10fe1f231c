//! Helpers available to every template
//!
//! | Name           | Kind     | Usage                                  |
//! |----------------|----------|----------------------------------------|
//! | `indent_block` | function | `{{ indent_block(6, file.content) }}`  |
//! | `quote`        | filter   | `{{ command \| quote }}`               |

use minijinja::{Environment, Error, ErrorKind, Value};

/// Register the helper table on an environment
pub fn register(env: &mut Environment<'_>) {
    env.add_function("indent_block", indent_block);
    env.add_filter("quote", quote);
}

/// Prefix every line of `text`, including the first, with `spaces` blanks
///
/// Lines are split on `\n` only, so the output has exactly as many lines
/// as the input and blank lines become indentation-only lines.
pub fn indent_block(spaces: usize, text: &str) -> String {
    let indent = " ".repeat(spaces);
    text.split('\n')
        .map(|line| format!("{}{}", indent, line))
        .collect::<Vec<_>>()
        .join("\n")
}

/// Render a value as a double-quoted scalar (or flow sequence for lists)
/// that reads the same in JSON and YAML
pub fn quote(value: Value) -> Result<String, Error> {
    serde_json::to_string(&value).map_err(|e| {
        Error::new(
            ErrorKind::InvalidOperation,
            format!("cannot quote value: {}", e),
        )
    })
}
