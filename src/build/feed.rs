//! RSS 2.0 feed generation.

use std::path::Path;

use crate::config::SiteConfig;
use crate::util::escape_xml;

use super::post::Post;

pub struct RssFeed {
    title: String,
    link: String,
    description: String,
    language: String,
    items: Vec<FeedItem>,
}

struct FeedItem {
    title: String,
    link: String,
    pub_date: String,
    description: String,
}

impl RssFeed {
    pub fn build(site: &SiteConfig, posts: &[Post]) -> Self {
        let items = posts
            .iter()
            .map(|post| FeedItem {
                title: post.title.clone(),
                link: site.post_url(&post.slug),
                pub_date: post.date.to_rfc2822(),
                description: post.description.clone(),
            })
            .collect();

        Self {
            title: site.title.clone(),
            link: site.base_url().to_string(),
            description: site.description.clone(),
            language: site.language.clone(),
            items,
        }
    }

    fn into_xml(self) -> String {
        let mut xml = String::with_capacity(4096);

        xml.push_str("<?xml version=\"1.0\" encoding=\"UTF-8\"?>\n");
        xml.push_str("<rss version=\"2.0\" xmlns:atom=\"http://www.w3.org/2005/Atom\">\n");
        xml.push_str("  <channel>\n");
        xml.push_str("    <title>");
        xml.push_str(&escape_xml(&self.title));
        xml.push_str("</title>\n    <link>");
        xml.push_str(&escape_xml(&self.link));
        xml.push_str("</link>\n    <description>");
        xml.push_str(&escape_xml(&self.description));
        xml.push_str("</description>\n    <language>");
        xml.push_str(&escape_xml(&self.language));
        xml.push_str("</language>\n");
        xml.push_str("    <atom:link href=\"");
        xml.push_str(&escape_xml(&self.link));
        xml.push_str("/rss.xml\" rel=\"self\" type=\"application/rss+xml\"/>\n");

        for item in &self.items {
            xml.push_str("    <item>\n      <title>");
            xml.push_str(&escape_xml(&item.title));
            xml.push_str("</title>\n      <link>");
            xml.push_str(&escape_xml(&item.link));
            xml.push_str("</link>\n      <guid>");
            xml.push_str(&escape_xml(&item.link));
            xml.push_str("</guid>\n      <pubDate>");
            xml.push_str(&item.pub_date);
            xml.push_str("</pubDate>\n      <description>");
            xml.push_str(&escape_xml(&item.description));
            xml.push_str("</description>\n    </item>\n");
        }

        xml.push_str("  </channel>\n</rss>\n");
        xml
    }

    pub fn write(self, output_dir: &Path) -> Result<(), std::io::Error> {
        std::fs::write(output_dir.join("rss.xml"), self.into_xml())
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
            url: "https://jane.github.io".into(),
            description: "Notes on building things".into(),
            language: "en-us".into(),
        }
    }

    fn post(title: &str, slug: &str) -> Post {
        Post {
            slug: slug.into(),
            title: title.into(),
            date: Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap(),
            description: "A & B <c>".into(),
            tags: vec![],
            image: String::new(),
            image_alt: String::new(),
            html: String::new(),
            markdown: String::new(),
            reading_time: 1,
            source_path: PathBuf::new(),
            nostr: None,
            nostr_date: None,
        }
    }

    #[test]
    fn test_feed_escapes_special_characters() {
        let xml = RssFeed::build(&site(), &[post(r#"Tom & Jerry's <"best"> post"#, "tj")]).into_xml();
        assert!(xml.contains(
            "<title>Tom &amp; Jerry&apos;s &lt;&quot;best&quot;&gt; post</title>"
        ));
        assert!(xml.contains("<description>A &amp; B &lt;c&gt;</description>"));
    }

    #[test]
    fn test_feed_item_link_and_pub_date() {
        let xml = RssFeed::build(&site(), &[post("Hello", "hello-world")]).into_xml();
        assert!(xml.contains("<link>https://jane.github.io/blog/hello-world.html</link>"));
        assert!(xml.contains("<guid>https://jane.github.io/blog/hello-world.html</guid>"));
        assert!(xml.contains("<pubDate>Wed, 1 May 2024 12:00:00 +0000</pubDate>"));
        assert!(xml.contains(
            "<atom:link href=\"https://jane.github.io/rss.xml\" rel=\"self\" type=\"application/rss+xml\"/>"
        ));
    }
}
