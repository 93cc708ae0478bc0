use std::path::Path;

use crate::{
    config::{PathsConfig, RootConfig, SiteConfig},
    InitArgs,
};

const HEADER_TEMPLATE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <meta name="viewport" content="width=device-width, initial-scale=1">
  <title>{{PAGE_TITLE}}</title>
  <meta name="description" content="{{META_DESCRIPTION}}">
  <meta property="og:title" content="{{META_TITLE}}">
  <meta property="og:type" content="{{OG_TYPE}}">{{EXTRA_CSS}}
</head>
<body>
<header>
  <nav><a href="/">Home</a> <a href="/blog.html">Blog</a> <a href="/about.html">About</a></nav>
</header>
"#;

const FOOTER_TEMPLATE: &str = r#"<footer>
  <p><a href="/rss.xml">RSS</a></p>
</footer>{{EXTRA_SCRIPTS}}
</body>
</html>
"#;

const POST_TEMPLATE: &str = r#"{{HEADER}}
<main>
  <article class="post">
    <h1>{{TITLE}}</h1>
    <p><time>{{DATE}}</time>{{READING_TIME}}</p>
    <div class="tags">{{TAGS}}</div>
    {{HERO_IMAGE}}
    {{CONTENT}}
  </article>
</main>
{{FOOTER}}
"#;

const HOME_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>My Inkpress Site</title>
</head>
<body>
<h1>Welcome</h1>
<section class="recent-posts">
{{RECENT_POSTS}}
</section>
</body>
</html>
"#;

const BLOG_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>Blog</title>
</head>
<body>
<h1>Blog</h1>
<section class="posts">
{{POSTS}}
</section>
</body>
</html>
"#;

const ABOUT_PAGE: &str = r#"<!DOCTYPE html>
<html lang="en">
<head>
  <meta charset="utf-8">
  <title>About</title>
</head>
<body>
<h1>About me</h1>
<p>Say hello here.</p>
</body>
</html>
"#;

const SAMPLE_POST: &str = r#"---
title: Hello World
date: 2024-01-01
description: The first post on this site
tags:
  - meta
---

Welcome to your new blog. Edit or delete this post in `posts/`.
"#;

pub async fn run(args: &InitArgs) -> Result<(), anyhow::Error> {
    let path = if args.path.is_relative() {
        std::env::current_dir()?.join(&args.path)
    } else {
        args.path.clone()
    };

    if !path.exists() {
        if args.create {
            tokio::fs::create_dir_all(&path).await?;
            println!("Created directory {path}", path = path.display());
        } else {
            return Err(anyhow::anyhow!(
                "Directory does not exist: {path}",
                path = path.display()
            ));
        }
    }

    println!("Initializing site in {}", path.display());

    let default_config = RootConfig {
        site: SiteConfig {
            title: "My Inkpress Site".into(),
            url: "https://my-inkpress-site.com".into(),
            description: "A new blog".into(),
            language: "en-us".into(),
        },
        paths: PathsConfig::default(),
    };

    let config_text = serde_yaml::to_string(&default_config)?;
    tokio::fs::write(path.join("inkpress.yaml"), config_text).await?;

    println!(
        "Created config file {config_file}",
        config_file = path.join("inkpress.yaml").display()
    );

    write_new(&path.join("posts/hello-world.md"), SAMPLE_POST).await?;
    write_new(&path.join("src/index.html"), HOME_PAGE).await?;
    write_new(&path.join("src/blog.html"), BLOG_PAGE).await?;
    write_new(&path.join("src/about.html"), ABOUT_PAGE).await?;
    write_new(&path.join("src/templates/header.html"), HEADER_TEMPLATE).await?;
    write_new(&path.join("src/templates/footer.html"), FOOTER_TEMPLATE).await?;
    write_new(&path.join("src/templates/post.html"), POST_TEMPLATE).await?;

    println!("Done. Run `inkpress build` inside {}", path.display());

    Ok(())
}

/// Write a starter file unless it already exists.
async fn write_new(path: &Path, content: &str) -> Result<(), anyhow::Error> {
    if path.exists() {
        println!("Skipping existing file {}", path.display());
        return Ok(());
    }

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(path, content).await?;
    println!("Created {}", path.display());

    Ok(())
}
