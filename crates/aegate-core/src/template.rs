//! Placeholder substitution for query templates
//!
//! Templates carry `{{name}}` placeholders that are replaced with SQL
//! literals rendered from a parameter map. Substitution is textual and
//! single-pass: the template is scanned once, left to right, and rendered
//! literals are never re-scanned for further placeholders.

use once_cell::sync::Lazy;
use regex::Regex;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Pre-formatted interval literals such as `'15' MINUTE` or `'7' DAY` are
/// substituted verbatim; wrapping them in quotes would break the upstream
/// `INTERVAL` syntax.
static INTERVAL_LITERAL_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)^'\d+'\s+(SECOND|MINUTE|HOUR|DAY|WEEK|MONTH|YEAR)$")
        .expect("valid interval literal regex")
});

/// A parameter value supplied for a template placeholder
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ParamValue {
    /// Numbers render via their decimal representation, unquoted
    Number(serde_json::Number),
    /// Strings are quoted unless they are interval literals
    Text(String),
}

impl ParamValue {
    /// Render this value as a SQL literal per the substitution rule
    pub fn render_literal(&self) -> String {
        match self {
            ParamValue::Number(n) => n.to_string(),
            ParamValue::Text(s) => {
                if INTERVAL_LITERAL_RE.is_match(s) {
                    s.clone()
                } else {
                    format!("'{}'", s.replace('\'', "''"))
                }
            }
        }
    }
}

impl From<&str> for ParamValue {
    fn from(value: &str) -> Self {
        ParamValue::Text(value.to_string())
    }
}

impl From<String> for ParamValue {
    fn from(value: String) -> Self {
        ParamValue::Text(value)
    }
}

impl From<i64> for ParamValue {
    fn from(value: i64) -> Self {
        ParamValue::Number(value.into())
    }
}

/// Parameter map for a query template
pub type Params = HashMap<String, ParamValue>;

/// Substitute `{{name}}` placeholders in `template` with literals rendered
/// from `params`.
///
/// A placeholder name is the text between a `{{` and the nearest following
/// `}}`, so names must not contain braces themselves. Rendered literals are
/// never re-scanned, which is what rules out recursive expansion.
///
/// Every occurrence of a placeholder is replaced with the same rendered
/// value. Placeholders with no matching parameter are left verbatim in the
/// output: a known sharp edge. Omitted optional filters pass through to
/// the upstream unmodified, and a typoed name reaches the upstream as
/// literal `{{name}}` text. Parameters with no matching placeholder are
/// silently unused.
pub fn substitute(template: &str, params: &Params) -> String {
    if params.is_empty() {
        return template.to_string();
    }

    let mut out = String::with_capacity(template.len());
    let mut rest = template;

    while let Some(open) = rest.find("{{") {
        out.push_str(&rest[..open]);
        let after_open = &rest[open + 2..];
        match after_open.find("}}") {
            Some(close) if close > 0 => {
                let name = &after_open[..close];
                match params.get(name) {
                    Some(value) => out.push_str(&value.render_literal()),
                    None => {
                        out.push_str("{{");
                        out.push_str(name);
                        out.push_str("}}");
                    }
                }
                rest = &after_open[close + 2..];
            }
            _ => {
                // Unterminated or empty braces are not placeholders
                out.push_str("{{");
                rest = after_open;
            }
        }
    }

    out.push_str(rest);
    out
}
