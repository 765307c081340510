use super::file::{upsert, RouteFormat};
use super::RouteEntry;
use crate::error::ConfigurationError;
use std::path::Path;

/// `name = pattern` per line.
///
/// `;` and `#` start comment lines, `[section]` headers are accepted and
/// ignored, values may be wrapped in single or double quotes. A repeated name
/// keeps its first position and takes the last value.
pub struct Ini;

impl RouteFormat for Ini {
    const NAME: &'static str = "ini";

    fn parse(content: &str, path: &Path) -> Result<Vec<RouteEntry>, ConfigurationError> {
        let mut entries = Vec::new();

        for (index, raw) in content.lines().enumerate() {
            let line_no = index + 1;
            let line = raw.trim();
            if line.is_empty() || line.starts_with(';') || line.starts_with('#') {
                continue;
            }
            if line.starts_with('[') {
                if !line.ends_with(']') {
                    return Err(ConfigurationError::parse(
                        path,
                        format!("line {line_no}: unterminated section header"),
                    ));
                }
                continue;
            }

            let Some((name, pattern)) = line.split_once('=') else {
                return Err(ConfigurationError::parse(
                    path,
                    format!("line {line_no}: expected `name = pattern`"),
                ));
            };
            let name = name.trim();
            if name.is_empty() {
                return Err(ConfigurationError::parse(
                    path,
                    format!("line {line_no}: missing route name"),
                ));
            }
            upsert(&mut entries, RouteEntry::new(name, unquote(pattern.trim())));
        }

        Ok(entries)
    }
}

fn unquote(value: &str) -> &str {
    for quote in ['"', '\''] {
        if value.len() >= 2 && value.starts_with(quote) && value.ends_with(quote) {
            return &value[1..value.len() - 1];
        }
    }
    value
}
