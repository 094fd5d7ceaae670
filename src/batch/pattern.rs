//! Pattern rules for derived keys
//!
//! A rule recomputes one key from another key's value with a regex
//! substitution that replaces every match. Replacement strings use the
//! backslash group syntax batchfiles have always used (`\1`, `\g<1>`,
//! `\g<name>`); they are translated once, at rule creation, into the
//! `${n}` syntax understood by `regex`.

use regex::Regex;
use thiserror::Error;

/// Errors produced while constructing pattern rules
#[derive(Debug, Error)]
pub enum PatternError {
    /// Regex failed to compile
    #[error("Invalid regex pattern '{pattern}': {reason}")]
    InvalidRegex { pattern: String, reason: String },
    /// Replacement string has a malformed group reference
    #[error("Invalid replacement '{replacement}': {reason}")]
    InvalidReplacement { replacement: String, reason: String },
}

impl PatternError {
    #[must_use]
    pub fn regex_compile(pattern: &str, reason: &str) -> Self {
        Self::InvalidRegex {
            pattern: pattern.to_string(),
            reason: reason.to_string(),
        }
    }

    #[must_use]
    pub fn replacement(replacement: &str, reason: &str) -> Self {
        Self::InvalidReplacement {
            replacement: replacement.to_string(),
            reason: reason.to_string(),
        }
    }
}

/// Lazily evaluated derivation of one key from another
#[derive(Debug, Clone)]
pub struct PatternRule {
    source: String,
    pattern: Regex,
    replacement: String,
    raw_replacement: String,
}

impl PatternRule {
    /// Build a rule, compiling the pattern immediately.
    ///
    /// # Errors
    /// Returns `PatternError::InvalidRegex` if the pattern doesn't compile,
    /// or `PatternError::InvalidReplacement` for a malformed `\g<...>` group
    /// or a reference to a group the pattern doesn't have.
    pub fn new(source: &str, pattern: &str, replacement: &str) -> Result<Self, PatternError> {
        let compiled =
            Regex::new(pattern).map_err(|e| PatternError::regex_compile(pattern, &e.to_string()))?;
        let translated = translate_replacement(replacement, &compiled)?;
        Ok(Self {
            source: source.to_string(),
            pattern: compiled,
            replacement: translated,
            raw_replacement: replacement.to_string(),
        })
    }

    /// Key whose value feeds this rule
    #[must_use]
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Pattern as written
    #[must_use]
    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    /// Replacement as written
    #[must_use]
    pub fn replacement(&self) -> &str {
        &self.raw_replacement
    }

    /// Substitute every match in `input`
    #[must_use]
    pub fn apply(&self, input: &str) -> String {
        self.pattern
            .replace_all(input, self.replacement.as_str())
            .into_owned()
    }
}

/// Translate backslash group references into `regex` replacement syntax.
///
/// `$` is escaped so it stays literal, `\\` becomes a single backslash and
/// any other escaped character is kept as written.
fn translate_replacement(raw: &str, pattern: &Regex) -> Result<String, PatternError> {
    let mut out = String::with_capacity(raw.len());
    let mut chars = raw.chars().peekable();

    while let Some(c) = chars.next() {
        match c {
            '$' => out.push_str("$$"),
            '\\' => match chars.peek().copied() {
                Some(d) if d.is_ascii_digit() => {
                    let mut group = String::new();
                    while let Some(&n) = chars.peek() {
                        if n.is_ascii_digit() && group.len() < 2 {
                            group.push(n);
                            chars.next();
                        } else {
                            break;
                        }
                    }
                    check_group(raw, pattern, &group)?;
                    out.push_str(&format!("${{{group}}}"));
                }
                Some('g') => {
                    chars.next();
                    if chars.next() != Some('<') {
                        return Err(PatternError::replacement(raw, "expected '<' after \\g"));
                    }
                    let mut name = String::new();
                    loop {
                        match chars.next() {
                            Some('>') => break,
                            Some(n) => name.push(n),
                            None => {
                                return Err(PatternError::replacement(raw, "unterminated \\g<...>"));
                            }
                        }
                    }
                    if name.is_empty() {
                        return Err(PatternError::replacement(raw, "empty group name"));
                    }
                    check_group(raw, pattern, &name)?;
                    out.push_str(&format!("${{{name}}}"));
                }
                Some('\\') => {
                    chars.next();
                    out.push('\\');
                }
                Some('n') => {
                    chars.next();
                    out.push('\n');
                }
                Some('t') => {
                    chars.next();
                    out.push('\t');
                }
                _ => out.push('\\'),
            },
            other => out.push(other),
        }
    }
    Ok(out)
}

/// Reject references to groups `pattern` doesn't define
fn check_group(raw: &str, pattern: &Regex, group: &str) -> Result<(), PatternError> {
    let known = match group.parse::<usize>() {
        Ok(index) => index < pattern.captures_len(),
        Err(_) => pattern.capture_names().flatten().any(|n| n == group),
    };
    if known {
        Ok(())
    } else {
        Err(PatternError::replacement(
            raw,
            &format!("unknown group reference '{group}'"),
        ))
    }
}
