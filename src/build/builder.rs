//! The site assembler: drives one full build from sources to output tree.

use std::path::{Path, PathBuf};

use walkdir::WalkDir;

use crate::config::RootConfig;

use super::feed::RssFeed;
use super::post::{self, Post, PostError};
use super::render::{render_page, substitute, RenderError, Replacements, TemplateCache};
use super::sitemap::Sitemap;

// Client-side syntax highlighting assets injected into post pages.
const HIGHLIGHT_CSS: &str = "\n  <link rel=\"stylesheet\" href=\"https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/styles/github-dark.min.css\" media=\"(prefers-color-scheme: dark)\">\n  <link rel=\"stylesheet\" href=\"https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/styles/github.min.css\" media=\"(prefers-color-scheme: light)\">";
const HIGHLIGHT_SCRIPTS: &str = "\n  <script src=\"https://cdnjs.cloudflare.com/ajax/libs/highlight.js/11.9.0/highlight.min.js\"></script>\n  <script>hljs.highlightAll();</script>";

#[derive(thiserror::Error, Debug)]
pub enum BuildError {
    #[error("post error: {0}")]
    Post(#[from] PostError),

    #[error("render error: {0}")]
    Render(#[from] RenderError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

pub struct BuildResult {
    pub output_dir: PathBuf,
    pub posts: usize,
    pub static_files: usize,
}

pub struct Builder {
    config: RootConfig,
    /// Base path for resolving relative paths (typically the config file's directory)
    base_path: PathBuf,
}

impl Builder {
    pub fn new(config: RootConfig, base_path: PathBuf) -> Self {
        Self { config, base_path }
    }

    pub async fn build(&self) -> Result<BuildResult, BuildError> {
        // Build pipeline:
        // 1. Wipe and recreate the output directory
        // 2. Copy static files and asset directories
        // 3. Discover and parse posts, newest first
        // 4. Render post pages, blog index, and home page
        // 5. Emit RSS feed and sitemap
        // 6. Write the .nojekyll marker

        let output_dir = self.resolve(&self.config.paths.output);
        if output_dir.exists() {
            std::fs::remove_dir_all(&output_dir)?;
        }
        std::fs::create_dir_all(&output_dir)?;

        println!("Copying static files...");
        let static_files = self.copy_static(&output_dir)?;

        let posts = post::load_posts(&self.resolve(&self.config.paths.posts))?;
        println!("Found {} post(s)", posts.len());

        let mut templates = TemplateCache::new(self.resolve(&self.config.paths.templates));

        let blog_dir = output_dir.join("blog");
        std::fs::create_dir_all(&blog_dir)?;
        for post in &posts {
            let html = self.render_post_page(&mut templates, post)?;
            std::fs::write(blog_dir.join(format!("{}.html", post.slug)), html)?;
            println!("  - {}", post.slug);
        }

        println!("Generating blog index...");
        self.write_blog_index(&output_dir, &posts)?;

        println!("Generating home page...");
        self.write_home_page(&output_dir, &posts)?;

        println!("Generating RSS feed...");
        RssFeed::build(&self.config.site, &posts).write(&output_dir)?;

        println!("Generating sitemap...");
        Sitemap::build(&self.config.site, &posts).write(&output_dir)?;

        // Keeps static hosts like GitHub Pages from running the output
        // through their default Jekyll processing step
        std::fs::write(output_dir.join(".nojekyll"), "")?;

        Ok(BuildResult {
            output_dir,
            posts: posts.len(),
            static_files,
        })
    }

    /// Copy the static parts of the source tree into the output directory.
    ///
    /// Skips the home and blog-index page sources and the templates
    /// directory (all three are rendered, not copied). The About page is
    /// additionally duplicated to `aboutme/index.html` for directory-style
    /// routing. The optional public/ and images/ directories are copied
    /// when present; their absence is logged and skipped.
    fn copy_static(&self, output_dir: &Path) -> Result<usize, BuildError> {
        let src_dir = self.resolve(&self.config.paths.src);
        let templates_dir = self.resolve(&self.config.paths.templates);
        let mut copied = 0;

        for entry in std::fs::read_dir(&src_dir)? {
            let entry = entry?;
            let path = entry.path();
            let name = entry.file_name();

            if path.is_dir() {
                if path == templates_dir {
                    continue;
                }
                copied += copy_dir(&path, &output_dir.join(&name))?;
            } else {
                if name == "index.html" || name == "blog.html" {
                    continue;
                }
                std::fs::copy(&path, output_dir.join(&name))?;
                copied += 1;
            }
        }

        // Duplicate the About page for directory-style routing
        let about = std::fs::read_to_string(src_dir.join("about.html"))?;
        let aboutme_dir = output_dir.join("aboutme");
        std::fs::create_dir_all(&aboutme_dir)?;
        std::fs::write(aboutme_dir.join("index.html"), about)?;

        let public_dir = self.resolve(&self.config.paths.public);
        if public_dir.is_dir() {
            copied += copy_dir(&public_dir, &output_dir.join("assets"))?;
        } else {
            println!("No public directory found, skipping assets copy");
        }

        let images_dir = self.resolve(&self.config.paths.images);
        if images_dir.is_dir() {
            copied += copy_dir(&images_dir, &output_dir.join("images"))?;
        } else {
            println!("No images directory found, skipping images copy");
        }

        Ok(copied)
    }

    fn render_post_page(
        &self,
        templates: &mut TemplateCache,
        post: &Post,
    ) -> Result<String, RenderError> {
        let site = &self.config.site;
        let template = templates.load("post")?.to_string();

        let reading_time_html = if post.reading_time > 0 {
            format!(
                " <span class=\"text-secondary\">· {} min read</span>",
                post.reading_time
            )
        } else {
            String::new()
        };

        let hero_image_html = if post.image.is_empty() {
            String::new()
        } else {
            format!(
                "<div class=\"post-hero-image\">\n  <img src=\"{}\" alt=\"{}\" loading=\"lazy\">\n</div>",
                post.image, post.image_alt
            )
        };

        let mut r = Replacements::new();
        r.set("TITLE", post.title.as_str());
        r.set("DATE", post.date.format("%B %-d, %Y").to_string());
        r.set("TAGS", tags_html(&post.tags));
        r.set("CONTENT", post.html.as_str());
        r.set("DESCRIPTION", post.description.as_str());
        r.set("SLUG", post.slug.as_str());
        r.set("READING_TIME", reading_time_html);
        r.set("HERO_IMAGE", hero_image_html);
        r.set("META_DESCRIPTION", post.description.as_str());
        r.set("META_TITLE", post.title.as_str());
        r.set("PAGE_TITLE", format!("{} - {}", post.title, site.title));
        r.set("PAGE_URL", format!("blog/{}.html", post.slug));
        r.set("OG_TYPE", "article");
        r.set("EXTRA_CSS", HIGHLIGHT_CSS);
        r.set("EXTRA_SCRIPTS", HIGHLIGHT_SCRIPTS);

        render_page(templates, &template, &r)
    }

    /// Render the blog index to both `blog.html` and `blog/index.html`
    /// (dual paths for hosting-path compatibility).
    fn write_blog_index(&self, output_dir: &Path, posts: &[Post]) -> Result<(), BuildError> {
        let src_dir = self.resolve(&self.config.paths.src);
        let template = std::fs::read_to_string(src_dir.join("blog.html"))?;

        let mut r = Replacements::new();
        r.set("POSTS", post_cards(posts));
        let html = substitute(&template, &r);

        std::fs::write(output_dir.join("blog.html"), &html)?;

        let blog_dir = output_dir.join("blog");
        std::fs::create_dir_all(&blog_dir)?;
        std::fs::write(blog_dir.join("index.html"), &html)?;

        Ok(())
    }

    /// Render the home page, embedding only the three most recent posts.
    fn write_home_page(&self, output_dir: &Path, posts: &[Post]) -> Result<(), BuildError> {
        let src_dir = self.resolve(&self.config.paths.src);
        let template = std::fs::read_to_string(src_dir.join("index.html"))?;

        let recent = &posts[..posts.len().min(3)];
        let mut r = Replacements::new();
        r.set("RECENT_POSTS", post_cards(recent));
        let html = substitute(&template, &r);

        std::fs::write(output_dir.join("index.html"), html)?;

        Ok(())
    }

    fn resolve(&self, path: &Path) -> PathBuf {
        if path.is_relative() {
            self.base_path.join(path)
        } else {
            path.to_path_buf()
        }
    }
}

fn tags_html(tags: &[String]) -> String {
    tags.iter()
        .map(|tag| format!("<span class=\"tag\">{tag}</span>"))
        .collect()
}

/// Summary-card markup for a list of posts, used by the blog index and the
/// home page.
fn post_cards(posts: &[Post]) -> String {
    if posts.is_empty() {
        return "<p>No posts yet. Write your first post in the <code>posts/</code> directory!</p>"
            .to_string();
    }

    posts
        .iter()
        .map(|post| {
            let image = if post.image.is_empty() {
                String::new()
            } else {
                format!(
                    "<div class=\"post-card-image\">\n  <img src=\"{}\" alt=\"{}\" loading=\"lazy\">\n</div>",
                    post.image, post.image_alt
                )
            };
            let description = if post.description.is_empty() {
                String::new()
            } else {
                format!("<p class=\"description\">{}</p>", post.description)
            };

            format!(
                "<article class=\"post-card\">\n  {image}\n  <div class=\"post-card-content\">\n    <h2><a href=\"/blog/{slug}.html\">{title}</a></h2>\n    <time datetime=\"{datetime}\">{date}</time> · {reading_time} min read\n    {description}\n    <div class=\"tags\">{tags}</div>\n  </div>\n</article>",
                slug = post.slug,
                title = post.title,
                datetime = post.date.to_rfc3339(),
                date = post.date.format("%B %-d, %Y"),
                reading_time = post.reading_time,
                tags = tags_html(&post.tags),
            )
        })
        .collect::<Vec<_>>()
        .join("\n")
}

/// Copy a directory tree, returning the number of files copied.
fn copy_dir(src: &Path, dest: &Path) -> Result<usize, std::io::Error> {
    let mut copied = 0;

    for entry in WalkDir::new(src) {
        let entry = entry?;
        let rel = entry.path().strip_prefix(src).unwrap_or(entry.path());
        let target = dest.join(rel);

        if entry.file_type().is_dir() {
            std::fs::create_dir_all(&target)?;
        } else {
            if let Some(parent) = target.parent() {
                std::fs::create_dir_all(parent)?;
            }
            std::fs::copy(entry.path(), &target)?;
            copied += 1;
        }
    }

    Ok(copied)
}

/// Get the base path from a config file path (its parent directory).
pub fn base_path_from_config(config_path: &Path) -> PathBuf {
    config_path
        .parent()
        .map(|p| p.to_path_buf())
        .unwrap_or_else(|| PathBuf::from("."))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{PathsConfig, SiteConfig};

    fn write(path: &Path, content: &str) {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent).unwrap();
        }
        std::fs::write(path, content).unwrap();
    }

    fn scaffold_site(root: &Path) {
        write(
            &root.join("src/index.html"),
            "<html><body>{{RECENT_POSTS}}</body></html>",
        );
        write(
            &root.join("src/blog.html"),
            "<html><body>{{POSTS}}</body></html>",
        );
        write(&root.join("src/about.html"), "<p>about me</p>");
        write(&root.join("src/style.css"), "body { margin: 0 }");
        write(
            &root.join("src/templates/header.html"),
            "<head><title>{{PAGE_TITLE}}</title></head>",
        );
        write(&root.join("src/templates/footer.html"), "<footer>fin</footer>");
        write(
            &root.join("src/templates/post.html"),
            "{{HEADER}}<article><h1>{{TITLE}}</h1>{{HERO_IMAGE}}{{CONTENT}}</article>{{FOOTER}}",
        );

        for (i, slug) in ["first", "second", "third", "fourth"].iter().enumerate() {
            write(
                &root.join(format!("posts/{slug}.md")),
                &format!(
                    "---\ntitle: Post {slug}\ndate: 2024-04-0{}\ndescription: About {slug}\n---\n\nBody of {slug}.",
                    i + 1
                ),
            );
        }
    }

    fn config() -> RootConfig {
        RootConfig {
            site: SiteConfig {
                title: "Jane Developer".into(),
                url: "https://jane.github.io".into(),
                description: "Notes".into(),
                language: "en-us".into(),
            },
            paths: PathsConfig::default(),
        }
    }

    #[tokio::test]
    async fn test_build_produces_full_output_tree() {
        let dir = tempfile::tempdir().unwrap();
        scaffold_site(dir.path());

        let builder = Builder::new(config(), dir.path().to_path_buf());
        let result = builder.build().await.unwrap();
        assert_eq!(result.posts, 4);

        let out = dir.path().join("dist");
        for file in [
            "index.html",
            "blog.html",
            "blog/index.html",
            "blog/first.html",
            "blog/fourth.html",
            "rss.xml",
            "sitemap.xml",
            ".nojekyll",
            "aboutme/index.html",
            "style.css",
        ] {
            assert!(out.join(file).exists(), "missing {file}");
        }

        // Templates are rendered, never copied into the output
        assert!(!out.join("templates").exists());
        // The marker file is empty
        assert_eq!(std::fs::read_to_string(out.join(".nojekyll")).unwrap(), "");
    }

    #[tokio::test]
    async fn test_home_page_limits_to_three_newest() {
        let dir = tempfile::tempdir().unwrap();
        scaffold_site(dir.path());

        Builder::new(config(), dir.path().to_path_buf())
            .build()
            .await
            .unwrap();

        let home =
            std::fs::read_to_string(dir.path().join("dist/index.html")).unwrap();
        assert!(home.contains("/blog/fourth.html"));
        assert!(home.contains("/blog/third.html"));
        assert!(home.contains("/blog/second.html"));
        assert!(!home.contains("/blog/first.html"));

        // Newest first
        let fourth = home.find("/blog/fourth.html").unwrap();
        let second = home.find("/blog/second.html").unwrap();
        assert!(fourth < second);

        // Blog index lists everything, same order
        let index = std::fs::read_to_string(dir.path().join("dist/blog.html")).unwrap();
        assert!(index.contains("/blog/first.html"));
        let fourth = index.find("/blog/fourth.html").unwrap();
        let first = index.find("/blog/first.html").unwrap();
        assert!(fourth < first);
    }

    #[tokio::test]
    async fn test_post_page_resolves_header_and_content() {
        let dir = tempfile::tempdir().unwrap();
        scaffold_site(dir.path());

        Builder::new(config(), dir.path().to_path_buf())
            .build()
            .await
            .unwrap();

        let page =
            std::fs::read_to_string(dir.path().join("dist/blog/first.html")).unwrap();
        assert!(page.contains("<title>Post first - Jane Developer</title>"));
        assert!(page.contains("<h1>Post first</h1>"));
        assert!(page.contains("<p>Body of first.</p>"));
        assert!(page.contains("<footer>fin</footer>"));
    }

    #[test]
    fn test_post_cards_empty_placeholder() {
        assert!(post_cards(&[]).contains("No posts yet"));
    }

    #[test]
    fn test_base_path_from_config() {
        assert_eq!(
            base_path_from_config(Path::new("/site/inkpress.yaml")),
            PathBuf::from("/site")
        );
        assert_eq!(
            base_path_from_config(Path::new("inkpress.yaml")),
            PathBuf::from("")
        );
    }
}
