// herald-core/src/services/dispatch/template.rs

use std::collections::HashMap;

/// Substitute `{name}` tokens in a message template.
///
/// One left-to-right pass: every recognized token is replaced with its
/// value, and substituted values are never re-scanned, so a value that
/// itself contains `{...}` comes through literally. Unrecognized tokens and
/// unterminated braces pass through verbatim; malformed templates degrade,
/// they never error.
pub fn interpolate(template: &str, vars: &HashMap<String, String>) -> String {
    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find('{') {
        out.push_str(&rest[..open]);
        let after = &rest[open + 1..];
        match after.find('}') {
            Some(close) => {
                let token = &after[..close];
                match vars.get(token) {
                    Some(value) => out.push_str(value),
                    None => {
                        out.push('{');
                        out.push_str(token);
                        out.push('}');
                    }
                }
                rest = &after[close + 1..];
            }
            None => {
                // Unterminated brace: emit the remainder as-is.
                out.push_str(&rest[open..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}
