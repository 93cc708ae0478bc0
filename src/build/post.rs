//! Post parsing: front matter, markdown body, slug, and reading time.

use std::path::{Path, PathBuf};

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Deserialize;
use walkdir::WalkDir;

use super::markdown::render_markdown;

#[derive(thiserror::Error, Debug)]
pub enum PostError {
    #[error("failed to read post {path}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("failed to walk posts directory: {0}")]
    Walk(#[from] walkdir::Error),
}

/// One parsed blog post. Immutable after creation, lives for one run.
#[derive(Debug, Clone)]
pub struct Post {
    /// URL-safe identifier derived from the source filename
    pub slug: String,
    pub title: String,
    pub date: DateTime<Utc>,
    pub description: String,
    pub tags: Vec<String>,
    pub image: String,
    pub image_alt: String,
    /// Rendered HTML body
    pub html: String,
    /// Raw markdown body without front matter
    pub markdown: String,
    /// Estimated reading time in minutes
    pub reading_time: usize,
    pub source_path: PathBuf,
    /// Per-post Nostr publish override from front matter
    pub nostr: Option<bool>,
    /// Per-post Nostr timestamp override from front matter
    pub nostr_date: Option<DateTime<Utc>>,
}

/// Front matter fields as they appear in the YAML block.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FrontMatter {
    pub title: Option<String>,
    pub date: Option<String>,
    pub description: Option<String>,
    #[serde(default)]
    pub tags: Vec<String>,
    pub image: Option<String>,
    #[serde(rename = "imageAlt")]
    pub image_alt: Option<String>,
    pub nostr: Option<bool>,
    #[serde(rename = "nostrDate")]
    pub nostr_date: Option<String>,
}

/// Result of splitting front matter from markdown content.
#[derive(Debug)]
pub struct ParsedContent {
    /// The parsed front matter (defaults if none found)
    pub front_matter: FrontMatter,
    /// The markdown content without the front matter block
    pub content: String,
}

/// Parse front matter from markdown content.
///
/// Front matter is a YAML block delimited by `---` at the start of the file:
///
/// ```markdown
/// ---
/// title: My Post
/// date: 2024-05-01
/// tags:
///   - rust
/// ---
///
/// # Content starts here
/// ```
pub fn parse_front_matter(content: &str) -> ParsedContent {
    let content = content.trim_start();

    // Check if content starts with front matter delimiter
    if !content.starts_with("---") {
        return ParsedContent {
            front_matter: FrontMatter::default(),
            content: content.to_string(),
        };
    }

    // Find the closing delimiter
    let after_opening = &content[3..];
    let closing_pos = after_opening.find("\n---");

    let Some(closing_pos) = closing_pos else {
        // No closing delimiter found, treat entire content as markdown
        return ParsedContent {
            front_matter: FrontMatter::default(),
            content: content.to_string(),
        };
    };

    // Extract the YAML content (skip the opening newline if present)
    let yaml_content = after_opening[..closing_pos].trim_start_matches('\n');

    // Extract the markdown content (skip the closing delimiter and newline)
    let markdown_start = 3 + closing_pos + 4; // "---" + yaml + "\n---"
    let markdown_content = if markdown_start < content.len() {
        content[markdown_start..].trim_start_matches('\n').to_string()
    } else {
        String::new()
    };

    // Parse the YAML
    let front_matter = match serde_yaml::from_str(yaml_content) {
        Ok(fm) => fm,
        Err(e) => {
            // Log warning but continue with default front matter
            eprintln!("Warning: Failed to parse front matter: {}", e);
            FrontMatter::default()
        }
    };

    ParsedContent {
        front_matter,
        content: markdown_content,
    }
}

/// Parse a front-matter date string.
///
/// Accepts RFC 3339, "YYYY-MM-DD HH:MM:SS", or a bare "YYYY-MM-DD"
/// (interpreted as midnight UTC).
pub fn parse_date(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();

    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(dt.and_utc());
    }
    if let Ok(date) = NaiveDate::parse_from_str(raw, "%Y-%m-%d") {
        return date.and_hms_opt(0, 0, 0).map(|dt| dt.and_utc());
    }

    None
}

/// Estimated reading time in minutes, at 200 words per minute.
///
/// Words are whitespace-separated runs in the raw markdown body.
pub fn reading_time(markdown: &str) -> usize {
    markdown.split_whitespace().count().div_ceil(200)
}

impl Post {
    /// Read and parse one markdown post file.
    pub fn parse(path: &Path) -> Result<Self, PostError> {
        let raw = std::fs::read_to_string(path).map_err(|e| PostError::Read {
            path: path.to_path_buf(),
            source: e,
        })?;

        let parsed = parse_front_matter(&raw);
        let fm = parsed.front_matter;

        let date = match &fm.date {
            None => Utc::now(),
            Some(raw_date) => parse_date(raw_date).unwrap_or_else(|| {
                eprintln!(
                    "Warning: unrecognized date '{}' in {}, using current time",
                    raw_date,
                    path.display()
                );
                Utc::now()
            }),
        };

        let slug = path
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or("untitled")
            .to_string();

        Ok(Self {
            slug,
            title: fm.title.unwrap_or_else(|| "Untitled".to_string()),
            date,
            description: fm.description.unwrap_or_default(),
            tags: fm.tags,
            image: fm.image.unwrap_or_default(),
            image_alt: fm.image_alt.unwrap_or_default(),
            html: render_markdown(&parsed.content),
            reading_time: reading_time(&parsed.content),
            markdown: parsed.content,
            source_path: path.to_path_buf(),
            nostr: fm.nostr,
            nostr_date: fm.nostr_date.as_deref().and_then(parse_date),
        })
    }
}

/// Recursively find all markdown files under the posts directory.
///
/// Order is filesystem-dependent; callers sort parsed posts by date.
pub fn discover(root: &Path) -> Result<Vec<PathBuf>, PostError> {
    let mut paths = Vec::new();

    for entry in WalkDir::new(root) {
        let entry = entry?;
        if entry.file_type().is_file()
            && entry.path().extension().is_some_and(|ext| ext == "md")
        {
            paths.push(entry.into_path());
        }
    }

    Ok(paths)
}

/// Discover and parse all posts, sorted by date descending.
///
/// Same-day ties break on slug, ascending, so output order is deterministic.
pub fn load_posts(root: &Path) -> Result<Vec<Post>, PostError> {
    let mut posts = discover(root)?
        .iter()
        .map(|path| Post::parse(path))
        .collect::<Result<Vec<_>, _>>()?;

    posts.sort_by(|a, b| b.date.cmp(&a.date).then_with(|| a.slug.cmp(&b.slug)));

    Ok(posts)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    #[test]
    fn test_parse_front_matter_basic() {
        let content = r#"---
title: My Post
description: A test post
tags:
  - rust
  - blog
---

# Hello World
"#;
        let parsed = parse_front_matter(content);
        assert_eq!(parsed.front_matter.title, Some("My Post".to_string()));
        assert_eq!(
            parsed.front_matter.description,
            Some("A test post".to_string())
        );
        assert_eq!(parsed.front_matter.tags, vec!["rust", "blog"]);
        assert_eq!(parsed.content.trim(), "# Hello World");
    }

    #[test]
    fn test_parse_front_matter_no_front_matter() {
        let content = "# Just Markdown\n\nNo front matter here.";
        let parsed = parse_front_matter(content);
        assert_eq!(parsed.front_matter.title, None);
        assert!(parsed.content.starts_with("# Just Markdown"));
    }

    #[test]
    fn test_parse_front_matter_empty_front_matter() {
        let content = "---\n---\n\n# Content";
        let parsed = parse_front_matter(content);
        assert_eq!(parsed.front_matter.title, None);
        assert!(parsed.content.starts_with("# Content"));
    }

    #[test]
    fn test_parse_front_matter_nostr_overrides() {
        let content = "---\nnostr: true\nnostrDate: 2024-02-01\n---\n\nBody";
        let parsed = parse_front_matter(content);
        assert_eq!(parsed.front_matter.nostr, Some(true));
        assert_eq!(
            parsed.front_matter.nostr_date,
            Some("2024-02-01".to_string())
        );
    }

    #[test]
    fn test_parse_date_formats() {
        let expected = Utc.with_ymd_and_hms(2024, 5, 1, 0, 0, 0).unwrap();
        assert_eq!(parse_date("2024-05-01"), Some(expected));
        assert_eq!(parse_date("2024-05-01 00:00:00"), Some(expected));
        assert_eq!(parse_date("2024-05-01T00:00:00Z"), Some(expected));
        assert_eq!(parse_date("not a date"), None);
    }

    #[test]
    fn test_reading_time_ceiling() {
        assert_eq!(reading_time(""), 0);
        assert_eq!(reading_time("one"), 1);

        let exactly_400 = vec!["word"; 400].join(" ");
        assert_eq!(reading_time(&exactly_400), 2);

        let just_over = vec!["word"; 401].join("\n \t");
        assert_eq!(reading_time(&just_over), 3);
    }

    #[test]
    fn test_parse_applies_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("my-first-post.md");
        std::fs::write(&path, "Just a body, no front matter.").unwrap();

        let post = Post::parse(&path).unwrap();
        assert_eq!(post.slug, "my-first-post");
        assert_eq!(post.title, "Untitled");
        assert_eq!(post.description, "");
        assert!(post.tags.is_empty());
        assert_eq!(post.image, "");
        assert_eq!(post.image_alt, "");
        assert_eq!(post.nostr, None);
        // Date defaulted to roughly now
        assert!((Utc::now() - post.date).num_seconds() < 5);
    }

    #[test]
    fn test_load_posts_sorted_descending_with_slug_tiebreak() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("2023");
        std::fs::create_dir_all(&nested).unwrap();

        std::fs::write(
            dir.path().join("older.md"),
            "---\ntitle: Older\ndate: 2023-01-01\n---\nbody",
        )
        .unwrap();
        std::fs::write(
            nested.join("newest.md"),
            "---\ntitle: Newest\ndate: 2024-06-01\n---\nbody",
        )
        .unwrap();
        std::fs::write(
            dir.path().join("also-old.md"),
            "---\ntitle: Also old\ndate: 2023-01-01\n---\nbody",
        )
        .unwrap();

        let posts = load_posts(dir.path()).unwrap();
        let slugs: Vec<_> = posts.iter().map(|p| p.slug.as_str()).collect();
        assert_eq!(slugs, vec!["newest", "also-old", "older"]);
    }
}
