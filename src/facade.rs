//! Entry points that never fail: compilation errors become `false` or `None`.

use tracing::debug;

use crate::pattern::Pattern;

/// Whether `pattern` compiles.
pub fn is_valid(pattern: &str) -> bool {
    parse(pattern).is_some()
}

/// The compilation error for `pattern`, if there is one.
pub fn syntax_error_message(pattern: &str) -> Option<String> {
    Pattern::compile(pattern).err().map(|err| err.to_string())
}

/// Compile `pattern`, or `None` if it does not compile.
pub fn parse(pattern: &str) -> Option<Pattern> {
    match Pattern::compile(pattern) {
        Ok(compiled) => Some(compiled),
        Err(err) => {
            debug!(pattern, %err, "pattern rejected");
            None
        }
    }
}
