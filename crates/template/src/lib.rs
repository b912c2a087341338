//! Named-placeholder substitution for ZPL label templates.
//!
//! Supports:
//! - `{name}` placeholders, where `name` is an identifier
//! - `{{` and `}}` escapes for literal braces
//! - strict lookup: every referenced field must be supplied

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// Errors raised while loading or rendering a template.
#[non_exhaustive]
#[derive(Debug, thiserror::Error)]
pub enum TemplateError {
    /// The template file does not exist.
    #[error("template not found: {}", .0.display())]
    NotFound(PathBuf),

    /// The template file exists but could not be read.
    #[error("failed to read template {}: {source}", path.display())]
    Io {
        /// Path of the template that failed to load.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: io::Error,
    },

    /// The template references a field that was not supplied.
    #[error("missing field: {0}")]
    MissingField(String),

    /// The template text is not well-formed.
    #[error("malformed template at byte {offset}: {reason}")]
    Malformed {
        /// Byte offset of the offending character.
        offset: usize,
        /// Human-readable description of the problem.
        reason: &'static str,
    },
}

/// Field values keyed by placeholder name.
pub type Fields<'a> = HashMap<&'a str, String>;

enum Segment<'t> {
    Literal(&'t str),
    Brace(char),
    Field(&'t str),
}

/// Render `template`, replacing each `{name}` with `fields[name]`.
pub fn render(template: &str, fields: &Fields<'_>) -> Result<String, TemplateError> {
    let mut out = String::with_capacity(template.len());
    for segment in scan(template)? {
        match segment {
            Segment::Literal(text) => out.push_str(text),
            Segment::Brace(c) => out.push(c),
            Segment::Field(name) => {
                let value = fields
                    .get(name)
                    .ok_or_else(|| TemplateError::MissingField(name.to_string()))?;
                out.push_str(value);
            }
        }
    }
    Ok(out)
}

/// Read the template at `path` and render it. The file is read on every call.
pub fn render_file(path: &Path, fields: &Fields<'_>) -> Result<String, TemplateError> {
    let template = fs::read_to_string(path).map_err(|e| match e.kind() {
        io::ErrorKind::NotFound => TemplateError::NotFound(path.to_path_buf()),
        _ => TemplateError::Io {
            path: path.to_path_buf(),
            source: e,
        },
    })?;
    render(&template, fields)
}

/// List the distinct placeholder names in `template`, in order of first use.
pub fn placeholders(template: &str) -> Result<Vec<&str>, TemplateError> {
    let mut names: Vec<&str> = Vec::new();
    for segment in scan(template)? {
        if let Segment::Field(name) = segment
            && !names.contains(&name)
        {
            names.push(name);
        }
    }
    Ok(names)
}

fn scan(template: &str) -> Result<Vec<Segment<'_>>, TemplateError> {
    let bytes = template.as_bytes();
    let len = bytes.len();
    let mut segments = Vec::new();
    let mut literal_start = 0usize;
    let mut i = 0usize;

    while i < len {
        let b = bytes[i];
        if b != b'{' && b != b'}' {
            i += 1;
            continue;
        }

        if literal_start < i {
            segments.push(Segment::Literal(&template[literal_start..i]));
        }

        // Doubled brace is an escape.
        if i + 1 < len && bytes[i + 1] == b {
            segments.push(Segment::Brace(b as char));
            i += 2;
            literal_start = i;
            continue;
        }

        if b == b'}' {
            return Err(TemplateError::Malformed {
                offset: i,
                reason: "unmatched '}'",
            });
        }

        let name_start = i + 1;
        let Some(close) = bytes[name_start..].iter().position(|&c| c == b'}') else {
            return Err(TemplateError::Malformed {
                offset: i,
                reason: "unclosed '{'",
            });
        };
        let name = &template[name_start..name_start + close];
        if !is_identifier(name) {
            return Err(TemplateError::Malformed {
                offset: i,
                reason: "placeholder name must be an identifier",
            });
        }
        segments.push(Segment::Field(name));
        i = name_start + close + 1;
        literal_start = i;
    }

    if literal_start < len {
        segments.push(Segment::Literal(&template[literal_start..]));
    }
    Ok(segments)
}

fn is_identifier(name: &str) -> bool {
    let mut chars = name.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}
