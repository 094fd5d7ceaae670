//! printf-style integer templates for incrementing keys
//!
//! A template holds literal text around exactly one integer conversion:
//! `%i` or `%d`, optionally with a `0` flag and a width (`%02i`, `%3d`).
//! `%%` is a literal percent sign. Rendering and parsing are inverse, so a
//! rendered value such as `Disc 07` can be read back as `7` when the key is
//! incremented.

use std::fmt;

/// Default template, renders a bare integer
pub const DEFAULT_FORMAT: &str = "%i";

/// Errors from parsing an increment template
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum FormatError {
    #[error("format '{0}' has no integer conversion (%i or %d)")]
    MissingConversion(String),
    #[error("format '{0}' has more than one integer conversion")]
    MultipleConversions(String),
    #[error("format '{template}' has unsupported conversion '%{spec}'")]
    Unsupported { template: String, spec: String },
}

/// A parsed integer template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IncrementFormat {
    template: String,
    prefix: String,
    suffix: String,
    zero_pad: bool,
    width: usize,
}

impl IncrementFormat {
    /// Parse a printf-style template.
    ///
    /// # Errors
    /// Returns `FormatError` if the template does not contain exactly one
    /// `%i`/`%d` conversion or uses any other conversion.
    pub fn parse(template: &str) -> Result<Self, FormatError> {
        let mut prefix = String::new();
        let mut suffix = String::new();
        let mut conversion: Option<(bool, usize)> = None;
        let mut chars = template.chars().peekable();

        while let Some(c) = chars.next() {
            let target = if conversion.is_some() { &mut suffix } else { &mut prefix };
            if c != '%' {
                target.push(c);
                continue;
            }
            if chars.peek() == Some(&'%') {
                chars.next();
                target.push('%');
                continue;
            }

            let mut spec = String::new();
            while let Some(&d) = chars.peek() {
                if d.is_ascii_digit() {
                    spec.push(d);
                    chars.next();
                } else {
                    break;
                }
            }
            match chars.next() {
                Some('i' | 'd') => {}
                other => {
                    if let Some(o) = other {
                        spec.push(o);
                    }
                    return Err(FormatError::Unsupported {
                        template: template.to_string(),
                        spec,
                    });
                }
            }
            if conversion.is_some() {
                return Err(FormatError::MultipleConversions(template.to_string()));
            }
            let zero_pad = spec.starts_with('0');
            let width = spec.parse().unwrap_or(0);
            conversion = Some((zero_pad, width));
        }

        let (zero_pad, width) =
            conversion.ok_or_else(|| FormatError::MissingConversion(template.to_string()))?;
        Ok(Self {
            template: template.to_string(),
            prefix,
            suffix,
            zero_pad,
            width,
        })
    }

    /// The template as written in the batchfile
    #[must_use]
    pub fn template(&self) -> &str {
        &self.template
    }

    /// Render an integer through the template
    #[must_use]
    pub fn render(&self, value: i64) -> String {
        let number = if self.zero_pad {
            format!("{value:0width$}", width = self.width)
        } else {
            format!("{value:width$}", width = self.width)
        };
        format!("{}{number}{}", self.prefix, self.suffix)
    }

    /// Recover the integer from a rendered value, `None` if it doesn't match
    #[must_use]
    pub fn parse_value(&self, rendered: &str) -> Option<i64> {
        let inner = rendered
            .strip_prefix(self.prefix.as_str())?
            .strip_suffix(self.suffix.as_str())?;
        inner.trim_start().parse().ok()
    }
}

impl Default for IncrementFormat {
    fn default() -> Self {
        Self {
            template: DEFAULT_FORMAT.to_string(),
            prefix: String::new(),
            suffix: String::new(),
            zero_pad: false,
            width: 0,
        }
    }
}

impl fmt::Display for IncrementFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.template)
    }
}
