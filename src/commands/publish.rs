use crate::{
    build::{base_path_from_config, post},
    config::RootConfig,
    nostr::{PublishOutcome, PublishPolicy, Publisher, PublisherConfig},
    PublishArgs,
};

pub async fn run(args: &PublishArgs) -> Result<(), anyhow::Error> {
    // Determine the config file path
    let config_path = args
        .config_file
        .clone()
        .unwrap_or_else(|| "inkpress.yaml".into());
    let config_path = if config_path.is_relative() {
        std::env::current_dir()?.join(&config_path)
    } else {
        config_path
    };

    let config = RootConfig::load_from_arg(Some(config_path.as_path())).await?;
    let base_path = base_path_from_config(&config_path);

    let posts_dir = if config.paths.posts.is_relative() {
        base_path.join(&config.paths.posts)
    } else {
        config.paths.posts.clone()
    };

    let posts = post::load_posts(&posts_dir)?;
    println!("Found {} post(s)", posts.len());

    match PublisherConfig::from_env().validate() {
        Err(e) => {
            eprintln!("Warning: Nostr publishing disabled: {e}");
            let policy = PublishPolicy::disabled();
            for post in &posts {
                let decision = policy.decide(post);
                println!("  - {}: skipped ({})", post.slug, decision.reason);
            }
        }
        Ok(valid) if args.dry_run => {
            let policy = PublishPolicy {
                enabled: true,
                default_behavior: valid.default_behavior,
            };
            for post in &posts {
                let decision = policy.decide(post);
                let verb = if decision.publish {
                    "would publish"
                } else {
                    "would skip"
                };
                println!("  - {}: {} ({})", post.slug, verb, decision.reason);
            }
        }
        Ok(valid) => {
            println!("Publishing to {} relay(s)...", valid.relays.len());
            let publisher = Publisher::connect(valid, config.site.clone()).await?;
            let outcomes = publisher.publish_all(&posts).await;
            publisher.shutdown().await;

            let mut published = 0;
            let mut skipped = 0;
            let mut failed = 0;
            for outcome in &outcomes {
                match outcome {
                    PublishOutcome::Published {
                        slug,
                        event_id,
                        relays,
                    } => {
                        published += 1;
                        println!(
                            "  - {slug}: published {event_id} ({}/{} relays)",
                            relays.success, relays.total
                        );
                    }
                    PublishOutcome::Skipped { slug, reason } => {
                        skipped += 1;
                        println!("  - {slug}: skipped ({reason})");
                    }
                    PublishOutcome::Failed { slug, error } => {
                        failed += 1;
                        eprintln!("  - {slug}: failed ({error})");
                    }
                }
            }

            println!("Published {published} post(s), skipped {skipped}, failed {failed}");
        }
    }

    Ok(())
}
