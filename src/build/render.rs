//! Template loading and placeholder rendering.
//!
//! Templates are plain HTML containing `{{NAME}}` tokens. Rendering parses a
//! template into literal/placeholder segments and resolves them in a single
//! structured pass: `{{HEADER}}` and `{{FOOTER}}` splice in the shared
//! header/footer templates, and every other token resolves from the
//! replacement map. Values are inserted literally, so `{{...}}`-shaped text
//! inside a value is never expanded again.

use std::collections::{BTreeMap, HashMap};
use std::path::PathBuf;

#[derive(thiserror::Error, Debug)]
pub enum RenderError {
    #[error("failed to read template {path}: {source}")]
    Template {
        path: PathBuf,
        source: std::io::Error,
    },
}

/// Read-through template cache keyed by template name.
///
/// Constructed by the builder and dropped with it; templates are read from
/// disk once per build run and there is no invalidation.
pub struct TemplateCache {
    dir: PathBuf,
    cache: HashMap<String, String>,
}

impl TemplateCache {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self {
            dir: dir.into(),
            cache: HashMap::new(),
        }
    }

    /// Load a template by name, reading `<dir>/<name>.html` on first use.
    pub fn load(&mut self, name: &str) -> Result<&str, RenderError> {
        if !self.cache.contains_key(name) {
            let path = self.dir.join(format!("{name}.html"));
            let content = std::fs::read_to_string(&path).map_err(|e| RenderError::Template {
                path,
                source: e,
            })?;
            self.cache.insert(name.to_string(), content);
        }

        Ok(self.cache.get(name).map(String::as_str).unwrap_or_default())
    }
}

/// Placeholder name → replacement value for one page.
#[derive(Debug, Clone, Default)]
pub struct Replacements(BTreeMap<String, String>);

impl Replacements {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set(&mut self, key: &str, value: impl Into<String>) {
        self.0.insert(key.to_string(), value.into());
    }

    pub fn get(&self, key: &str) -> Option<&str> {
        self.0.get(key).map(String::as_str)
    }
}

enum Segment<'a> {
    Literal(&'a str),
    Placeholder(&'a str),
}

/// Split a template into literal and `{{NAME}}` placeholder segments.
/// An unclosed `{{` is treated as literal text.
fn segments(template: &str) -> Vec<Segment<'_>> {
    let mut out = Vec::new();
    let mut rest = template;

    while let Some(start) = rest.find("{{") {
        let Some(end_rel) = rest[start + 2..].find("}}") else {
            break;
        };
        let end = start + 2 + end_rel;

        if start > 0 {
            out.push(Segment::Literal(&rest[..start]));
        }
        out.push(Segment::Placeholder(&rest[start + 2..end]));
        rest = &rest[end + 2..];
    }

    if !rest.is_empty() {
        out.push(Segment::Literal(rest));
    }

    out
}

fn push_placeholder(out: &mut String, name: &str, replacements: &Replacements) {
    match replacements.get(name) {
        Some(value) => out.push_str(value),
        None => {
            // Unknown token: leave it untouched in the output
            out.push_str("{{");
            out.push_str(name);
            out.push_str("}}");
        }
    }
}

/// Substitute placeholders in a single template fragment.
pub fn substitute(template: &str, replacements: &Replacements) -> String {
    let mut out = String::with_capacity(template.len());

    for segment in segments(template) {
        match segment {
            Segment::Literal(s) => out.push_str(s),
            Segment::Placeholder(name) => push_placeholder(&mut out, name, replacements),
        }
    }

    out
}

/// Render a complete page from a content template.
///
/// `{{HEADER}}` and `{{FOOTER}}` resolve to the shared header/footer
/// templates, whose own placeholders (page title, canonical URL, ...)
/// resolve from the same replacement map.
pub fn render_page(
    cache: &mut TemplateCache,
    template: &str,
    replacements: &Replacements,
) -> Result<String, RenderError> {
    let header = cache.load("header")?.to_string();
    let footer = cache.load("footer")?.to_string();

    let mut out = String::with_capacity(template.len() + header.len() + footer.len());

    for segment in segments(template) {
        match segment {
            Segment::Literal(s) => out.push_str(s),
            Segment::Placeholder("HEADER") => out.push_str(&substitute(&header, replacements)),
            Segment::Placeholder("FOOTER") => out.push_str(&substitute(&footer, replacements)),
            Segment::Placeholder(name) => push_placeholder(&mut out, name, replacements),
        }
    }

    Ok(out)
}
