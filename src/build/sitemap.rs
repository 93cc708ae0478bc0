//! Sitemap generation.
//!
//! Generates a sitemap.xml listing the static pages and every post page for
//! search engine indexing.

use std::path::Path;

use crate::config::SiteConfig;
use crate::util::escape_xml;

use super::post::Post;

const SITEMAP_NS: &str = "http://www.sitemaps.org/schemas/sitemap/0.9";

pub struct Sitemap {
    urls: Vec<UrlEntry>,
}

struct UrlEntry {
    loc: String,
    priority: &'static str,
    changefreq: &'static str,
    lastmod: Option<String>,
}

impl Sitemap {
    pub fn build(site: &SiteConfig, posts: &[Post]) -> Self {
        let base_url = site.base_url();

        let static_pages = [
            ("", "1.0", "weekly"),
            ("/about.html", "0.8", "monthly"),
            ("/blog.html", "0.9", "weekly"),
        ];

        let mut urls: Vec<UrlEntry> = static_pages
            .iter()
            .map(|(path, priority, changefreq)| UrlEntry {
                loc: format!("{base_url}{path}"),
                priority,
                changefreq,
                lastmod: None,
            })
            .collect();

        urls.extend(posts.iter().map(|post| UrlEntry {
            loc: site.post_url(&post.slug),
            priority: "0.7",
            changefreq: "monthly",
            lastmod: Some(post.date.format("%Y-%m-%d").to_string()),
        }));

        Self { urls }
    }

    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<urlset xmlns=\"");
        xml.push_str(SITEMAP_NS);
        xml.push_str("\">\n");

        for entry in self.urls {
            xml.push_str("  <url>\n    <loc>");
            xml.push_str(&escape_xml(&entry.loc));
            xml.push_str("</loc>\n");
            if let Some(lastmod) = entry.lastmod {
                xml.push_str("    <lastmod>");
                xml.push_str(&lastmod);
                xml.push_str("</lastmod>\n");
            }
            xml.push_str("    <changefreq>");
            xml.push_str(entry.changefreq);
            xml.push_str("</changefreq>\n    <priority>");
            xml.push_str(entry.priority);
            xml.push_str("</priority>\n  </url>\n");
        }

        xml.push_str("</urlset>\n");
        xml
    }

    pub fn write(self, output_dir: &Path) -> Result<(), std::io::Error> {
        std::fs::write(output_dir.join("sitemap.xml"), self.into_xml())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{TimeZone, Utc};
    use std::path::PathBuf;

    fn site() -> SiteConfig {
        SiteConfig {
            title: "Jane Developer".into(),
            url: "https://jane.github.io/".into(),
            description: String::new(),
            language: "en-us".into(),
        }
    }

    #[test]
    fn test_sitemap_static_and_post_entries() {
        let post = Post {
            slug: "hello".into(),
            title: "Hello".into(),
            date: Utc.with_ymd_and_hms(2024, 5, 1, 9, 30, 0).unwrap(),
            description: String::new(),
            tags: vec![],
            image: String::new(),
            image_alt: String::new(),
            html: String::new(),
            markdown: String::new(),
            reading_time: 1,
            source_path: PathBuf::new(),
            nostr: None,
            nostr_date: None,
        };

        let xml = Sitemap::build(&site(), &[post]).into_xml();
        assert!(xml.contains("<loc>https://jane.github.io</loc>"));
        assert!(xml.contains("<loc>https://jane.github.io/about.html</loc>"));
        assert!(xml.contains("<loc>https://jane.github.io/blog.html</loc>"));
        assert!(xml.contains("<loc>https://jane.github.io/blog/hello.html</loc>"));
        assert!(xml.contains("<lastmod>2024-05-01</lastmod>"));
        assert!(xml.contains("<priority>0.7</priority>"));
        assert!(xml.contains("<changefreq>weekly</changefreq>"));
    }
}
