use crate::error::ConfigurationError;
use regex::Regex;
use std::collections::HashSet;
use std::fmt;
use tracing::debug;

/// Trailing group appended to every compiled pattern: a slash or a `.ext` suffix.
pub const SUFFIX_GROUP: &str = r"(/|\.[a-z]+)?";

/// The "match anything" pattern.
pub const WILDCARD: &str = "*";

const PLACEHOLDER_VALUE: &str = "[^/]+";

/// One token of a parsed pattern.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// Literal text, matched verbatim
    Literal(String),
    /// `:name`
    Placeholder(String),
    /// `*`
    Wildcard,
    /// `(...)`; `leading_slash` is set when a `/` directly preceded the group
    Optional {
        leading_slash: bool,
        segments: Vec<Segment>,
    },
}

/// A named placeholder discovered while compiling.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Placeholder {
    /// Placeholder name, without the leading `:`
    pub name: String,
    /// Whether it sits inside an optional group
    pub optional: bool,
}

/// Result of compiling a token pattern.
///
/// Immutable. Produced once when a route is built and never recomputed;
/// the regex is compiled alongside the text so matching never compiles.
#[derive(Clone)]
pub struct CompiledExpression {
    pattern: String,
    expression: String,
    regex: Regex,
    segments: Vec<Segment>,
    placeholders: Vec<Placeholder>,
    has_suffix: bool,
}

impl CompiledExpression {
    /// The source token pattern.
    #[must_use]
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// The final anchored regex text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.expression
    }

    /// The compiled regex.
    #[must_use]
    pub fn regex(&self) -> &Regex {
        &self.regex
    }

    /// Parsed tokens, used for reverse generation.
    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    /// Named placeholders in pattern order.
    #[must_use]
    pub fn placeholders(&self) -> &[Placeholder] {
        &self.placeholders
    }

    /// Whether the trailing slash/suffix group was appended.
    #[must_use]
    pub fn has_suffix(&self) -> bool {
        self.has_suffix
    }

    /// Whether this is the bare `*` match-anything expression.
    #[must_use]
    pub fn is_wildcard(&self) -> bool {
        self.pattern == WILDCARD
    }

    #[must_use]
    pub fn is_match(&self, subject: &str) -> bool {
        self.regex.is_match(subject)
    }

    /// Render the pattern back into a path.
    ///
    /// `lookup` resolves placeholder values. Optional groups are emitted only when
    /// every placeholder inside them resolves to a non-blank value; wildcards emit
    /// nothing. Required placeholders that do not resolve are left as `:name` and
    /// their names are returned alongside the rendered string.
    pub fn render<'a, F>(&self, lookup: F) -> (String, Vec<String>)
    where
        F: Fn(&str) -> Option<&'a str>,
    {
        let mut out = String::with_capacity(self.pattern.len() + 16);
        let mut unresolved = Vec::new();
        render_into(&self.segments, &lookup, &mut out, &mut unresolved);
        (out, unresolved)
    }
}

impl fmt::Debug for CompiledExpression {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CompiledExpression")
            .field("pattern", &self.pattern)
            .field("expression", &self.expression)
            .field("has_suffix", &self.has_suffix)
            .finish()
    }
}

impl PartialEq for CompiledExpression {
    fn eq(&self, other: &Self) -> bool {
        self.pattern == other.pattern && self.expression == other.expression
    }
}

impl Eq for CompiledExpression {}

/// Compile a token pattern into an anchored expression.
///
/// # Errors
///
/// Returns [`ConfigurationError::Pattern`] for unbalanced, nested or empty optional
/// groups and for placeholder names used twice.
pub fn compile(pattern: &str) -> Result<CompiledExpression, ConfigurationError> {
    if pattern == WILDCARD {
        return finish(pattern, ".*".to_string(), vec![Segment::Wildcard], Vec::new(), false);
    }

    let segments = tokenize(pattern)?;
    let placeholders = collect_placeholders(pattern, &segments)?;

    let mut expression = String::with_capacity(pattern.len() * 2 + 32);
    expression.push('^');
    emit(&segments, &mut expression);
    expression.push_str(SUFFIX_GROUP);
    expression.push('$');

    finish(pattern, expression, segments, placeholders, true)
}

fn finish(
    pattern: &str,
    expression: String,
    segments: Vec<Segment>,
    placeholders: Vec<Placeholder>,
    has_suffix: bool,
) -> Result<CompiledExpression, ConfigurationError> {
    let regex = Regex::new(&expression).map_err(|source| ConfigurationError::Regex {
        expression: expression.clone(),
        source,
    })?;

    debug!(
        pattern = %pattern,
        expression = %expression,
        placeholders = placeholders.len(),
        "Compiled route pattern"
    );

    Ok(CompiledExpression {
        pattern: pattern.to_string(),
        expression,
        regex,
        segments,
        placeholders,
        has_suffix,
    })
}

fn tokenize(pattern: &str) -> Result<Vec<Segment>, ConfigurationError> {
    let mut root: Vec<Segment> = Vec::new();
    let mut group: Option<(bool, Vec<Segment>)> = None;
    let mut chars = pattern.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            ':' if chars.peek().is_some_and(char::is_ascii_alphabetic) => {
                let mut name = String::new();
                while let Some(&n) = chars.peek() {
                    if n.is_ascii_alphanumeric() || n == '_' {
                        name.push(n);
                        chars.next();
                    } else {
                        break;
                    }
                }
                current(&mut root, &mut group).push(Segment::Placeholder(name));
            }
            '(' => {
                if group.is_some() {
                    return Err(ConfigurationError::pattern(
                        pattern,
                        "nested optional groups are not supported",
                    ));
                }
                let leading_slash = take_trailing_slash(&mut root);
                group = Some((leading_slash, Vec::new()));
            }
            ')' => {
                let Some((leading_slash, segments)) = group.take() else {
                    return Err(ConfigurationError::pattern(
                        pattern,
                        "')' without a matching '('",
                    ));
                };
                if segments.is_empty() {
                    return Err(ConfigurationError::pattern(pattern, "empty optional group"));
                }
                root.push(Segment::Optional {
                    leading_slash,
                    segments,
                });
            }
            '*' => current(&mut root, &mut group).push(Segment::Wildcard),
            _ => push_literal(current(&mut root, &mut group), c),
        }
    }

    if group.is_some() {
        return Err(ConfigurationError::pattern(pattern, "unclosed optional group"));
    }
    Ok(root)
}

fn current<'a>(
    root: &'a mut Vec<Segment>,
    group: &'a mut Option<(bool, Vec<Segment>)>,
) -> &'a mut Vec<Segment> {
    match group {
        Some((_, segments)) => segments,
        None => root,
    }
}

fn push_literal(segments: &mut Vec<Segment>, c: char) {
    if let Some(Segment::Literal(text)) = segments.last_mut() {
        text.push(c);
    } else {
        segments.push(Segment::Literal(c.to_string()));
    }
}

fn take_trailing_slash(segments: &mut Vec<Segment>) -> bool {
    let Some(Segment::Literal(text)) = segments.last_mut() else {
        return false;
    };
    if !text.ends_with('/') {
        return false;
    }
    text.pop();
    if text.is_empty() {
        segments.pop();
    }
    true
}

fn collect_placeholders(
    pattern: &str,
    segments: &[Segment],
) -> Result<Vec<Placeholder>, ConfigurationError> {
    let mut placeholders = Vec::new();
    let mut seen = HashSet::new();
    let mut visit = |name: &str, optional: bool| -> Result<(), ConfigurationError> {
        if !seen.insert(name.to_string()) {
            return Err(ConfigurationError::pattern(
                pattern,
                format!("placeholder ':{}' is used more than once", name),
            ));
        }
        placeholders.push(Placeholder {
            name: name.to_string(),
            optional,
        });
        Ok(())
    };

    for segment in segments {
        match segment {
            Segment::Placeholder(name) => visit(name, false)?,
            Segment::Optional { segments, .. } => {
                for inner in segments {
                    if let Segment::Placeholder(name) = inner {
                        visit(name, true)?;
                    }
                }
            }
            Segment::Literal(_) | Segment::Wildcard => {}
        }
    }
    Ok(placeholders)
}

fn emit(segments: &[Segment], out: &mut String) {
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(&regex::escape(text)),
            Segment::Placeholder(name) => push_capture(out, name),
            Segment::Wildcard => out.push_str(".*"),
            Segment::Optional {
                leading_slash,
                segments,
            } => {
                if let [Segment::Placeholder(name)] = segments.as_slice() {
                    // slash and value are optional as one unit
                    out.push_str("(?:/?");
                    push_capture(out, name);
                    out.push_str(")?");
                } else {
                    out.push_str("(?:");
                    if *leading_slash {
                        out.push('/');
                    }
                    emit(segments, out);
                    out.push_str(")?");
                }
            }
        }
    }
}

fn push_capture(out: &mut String, name: &str) {
    out.push_str("(?P<");
    out.push_str(name);
    out.push('>');
    out.push_str(PLACEHOLDER_VALUE);
    out.push(')');
}

fn render_into<'a, F>(segments: &[Segment], lookup: &F, out: &mut String, unresolved: &mut Vec<String>)
where
    F: Fn(&str) -> Option<&'a str>,
{
    for segment in segments {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Placeholder(name) => match lookup(name.as_str()) {
                Some(value) => out.push_str(value),
                None => {
                    out.push(':');
                    out.push_str(name);
                    unresolved.push(name.clone());
                }
            },
            Segment::Wildcard => {}
            Segment::Optional {
                leading_slash,
                segments,
            } => {
                let mut names = segments.iter().filter_map(|s| match s {
                    Segment::Placeholder(name) => Some(name),
                    _ => None,
                });
                let mut any = false;
                let complete = names.all(|name| {
                    any = true;
                    lookup(name.as_str()).is_some_and(|v| !v.trim().is_empty())
                });
                if any && complete {
                    if *leading_slash {
                        out.push('/');
                    }
                    render_into(segments, lookup, out, unresolved);
                }
            }
        }
    }
}
