//! Minimal `${name}` substitution.

use once_cell::sync::Lazy;
use regex::Regex;

use crate::errors::{Result, WeftError};

/// Placeholder pattern: `${identifier}`.
static PLACEHOLDER: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").unwrap());

/// Substitutes `${name}` placeholders from `values`.
///
/// A placeholder missing from `values` is an error naming the template slot;
/// values without a matching placeholder are allowed. Everything that is not
/// a placeholder passes through untouched, `$` included.
pub fn substitute(template: &str, slot: &str, values: &[(&str, &str)]) -> Result<String> {
    let mut out = String::with_capacity(template.len());
    let mut last = 0;

    for caps in PLACEHOLDER.captures_iter(template) {
        let whole = caps.get(0).expect("capture 0 always present");
        let key = &caps[1];
        out.push_str(&template[last..whole.start()]);
        match values.iter().find(|(k, _)| *k == key) {
            Some((_, value)) => out.push_str(value),
            None => {
                return Err(WeftError::UndefinedPlaceholder {
                    template: slot.to_string(),
                    placeholder: key.to_string(),
                })
            }
        }
        last = whole.end();
    }

    out.push_str(&template[last..]);
    Ok(out)
}
