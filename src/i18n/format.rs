//! Placeholder substitution for message templates.
//!
//! Three placeholder styles are in use across services:
//! - `{}` positional, filled left to right (error-code default messages)
//! - `{0}`, `{1}` indexed (message bundles)
//! - `{name}` named, with configurable delimiters

use regex::{Captures, Regex};
use std::collections::HashMap;
use std::fmt::Display;
use std::sync::OnceLock;

pub const VAR_PREFIX: &str = "{";
pub const VAR_SUFFIX: &str = "}";

static POSITIONAL_REGEX: OnceLock<Regex> = OnceLock::new();
static INDEXED_REGEX: OnceLock<Regex> = OnceLock::new();
static NAMED_REGEX: OnceLock<Regex> = OnceLock::new();

/// Replace `{}` placeholders in order.
///
/// `\{}` is kept as a literal `{}`, while `\\{}` is a literal backslash
/// followed by the next argument. Placeholders without a matching argument
/// are left untouched; surplus arguments are ignored.
pub fn format_positional(template: &str, args: &[&dyn Display]) -> String {
    let regex = POSITIONAL_REGEX.get_or_init(|| Regex::new(r"(\\{1,2})?\{\}").unwrap());

    let mut next = 0;
    regex
        .replace_all(template, |caps: &Captures| {
            let escape = caps.get(1).map_or("", |m| m.as_str());
            if escape.len() == 1 {
                return "{}".to_string();
            }
            let backslash = if escape.is_empty() { "" } else { "\\" };
            match args.get(next) {
                Some(arg) => {
                    next += 1;
                    format!("{}{}", backslash, arg)
                }
                None => caps[0].to_string(),
            }
        })
        .into_owned()
}

/// Replace `{0}`, `{1}`, ... with the argument at that index.
///
/// Out-of-range indexes are left untouched.
pub fn format_indexed(template: &str, args: &[&dyn Display]) -> String {
    let regex = INDEXED_REGEX.get_or_init(|| Regex::new(r"\{(\d+)\}").unwrap());

    regex
        .replace_all(template, |caps: &Captures| {
            caps[1]
                .parse::<usize>()
                .ok()
                .and_then(|idx| args.get(idx))
                .map(|arg| arg.to_string())
                .unwrap_or_else(|| caps[0].to_string())
        })
        .into_owned()
}

/// Replace named variables delimited by `prefix` and `suffix`.
///
/// Unknown names become empty strings. A variable preceded by `\` is emitted
/// literally without the backslash.
///
/// # Example
/// ```
/// use std::collections::HashMap;
/// use service_commons::i18n::replace_named;
///
/// let values = HashMap::from([("max", "1MB".to_string())]);
/// assert_eq!(replace_named("Max = ${max}", &values, "${", "}"), "Max = 1MB");
/// ```
pub fn replace_named(
    template: &str,
    values: &HashMap<&str, String>,
    prefix: &str,
    suffix: &str,
) -> String {
    if prefix.is_empty() || suffix.is_empty() {
        return template.to_string();
    }

    let custom;
    let regex = if prefix == VAR_PREFIX && suffix == VAR_SUFFIX {
        NAMED_REGEX.get_or_init(|| Regex::new(&named_pattern(VAR_PREFIX, VAR_SUFFIX)).unwrap())
    } else {
        let Ok(regex) = Regex::new(&named_pattern(prefix, suffix)) else {
            return template.to_string();
        };
        custom = regex;
        &custom
    };

    regex
        .replace_all(template, |caps: &Captures| {
            let name = &caps[2];
            if caps.get(1).is_some() {
                format!("{}{}{}", prefix, name, suffix)
            } else {
                values.get(name).cloned().unwrap_or_default()
            }
        })
        .into_owned()
}

fn named_pattern(prefix: &str, suffix: &str) -> String {
    format!(
        r"(\\)?{}(.*?){}",
        regex::escape(prefix),
        regex::escape(suffix)
    )
}
