//! NIP-23 event construction and relay fan-out.

use std::time::Duration;

use nostr_sdk::prelude::*;

use crate::build::post::Post;
use crate::config::SiteConfig;

use super::policy::{DefaultBehavior, PublishPolicy};

const ENV_ENABLED: &str = "NOSTR_PUBLISH_ENABLED";
pub const ENV_PRIVATE_KEY: &str = "NOSTR_PRIVATE_KEY";
const ENV_RELAYS: &str = "NOSTR_RELAYS";
const ENV_DEFAULT_BEHAVIOR: &str = "NOSTR_DEFAULT_BEHAVIOR";

/// Pause between posts so a batch publish doesn't flood the relays.
const RELAY_COOLDOWN: Duration = Duration::from_millis(100);

#[derive(thiserror::Error, Debug)]
pub enum PublisherConfigError {
    #[error("NOSTR_PUBLISH_ENABLED is not set to 'true'")]
    Disabled,

    #[error("NOSTR_PUBLISH_ENABLED is true but NOSTR_PRIVATE_KEY is not set")]
    MissingKey,

    #[error("invalid NOSTR_PRIVATE_KEY format: {0}")]
    InvalidKey(nostr_sdk::key::Error),

    #[error("NOSTR_PUBLISH_ENABLED is true but no relays configured")]
    NoRelays,
}

#[derive(thiserror::Error, Debug)]
pub enum PublishError {
    #[error("failed to build event: {0}")]
    Event(#[from] nostr_sdk::event::builder::Error),

    #[error("relay error: {0}")]
    Client(#[from] nostr_sdk::client::Error),
}

/// Raw publisher configuration as read from the environment.
#[derive(Debug, Clone, Default)]
pub struct PublisherConfig {
    pub enabled: bool,
    pub private_key: Option<String>,
    pub relays: Vec<String>,
    pub default_behavior: DefaultBehavior,
}

impl PublisherConfig {
    pub fn from_env() -> Self {
        let enabled = std::env::var(ENV_ENABLED).is_ok_and(|v| v == "true");
        let private_key = std::env::var(ENV_PRIVATE_KEY)
            .ok()
            .filter(|key| !key.trim().is_empty());
        let relays = std::env::var(ENV_RELAYS)
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|relay| !relay.is_empty())
            .map(String::from)
            .collect();
        let default_behavior = std::env::var(ENV_DEFAULT_BEHAVIOR)
            .map(|v| DefaultBehavior::parse(&v))
            .unwrap_or_default();

        Self {
            enabled,
            private_key,
            relays,
            default_behavior,
        }
    }

    /// Validate into a configuration the publisher can be built from.
    ///
    /// Callers decide whether a failure is fatal. The publish command
    /// downgrades any error to a warning and skips every post.
    pub fn validate(self) -> Result<ValidConfig, PublisherConfigError> {
        if !self.enabled {
            return Err(PublisherConfigError::Disabled);
        }

        let Some(private_key) = self.private_key else {
            return Err(PublisherConfigError::MissingKey);
        };
        let keys = Keys::parse(&private_key).map_err(PublisherConfigError::InvalidKey)?;

        if self.relays.is_empty() {
            return Err(PublisherConfigError::NoRelays);
        }

        Ok(ValidConfig {
            keys,
            relays: self.relays,
            default_behavior: self.default_behavior,
        })
    }
}

/// A validated configuration with a usable signing key.
#[derive(Debug, Clone)]
pub struct ValidConfig {
    pub keys: Keys,
    pub relays: Vec<String>,
    pub default_behavior: DefaultBehavior,
}

/// Per-relay delivery counts for one published event.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RelayTally {
    pub success: usize,
    pub failed: usize,
    pub total: usize,
}

impl RelayTally {
    pub fn new(success: usize, failed: usize) -> Self {
        Self {
            success,
            failed,
            total: success + failed,
        }
    }
}

/// Result of attempting to publish one post.
#[derive(Debug)]
pub enum PublishOutcome {
    /// The event was accepted by at least one relay
    Published {
        slug: String,
        event_id: EventId,
        relays: RelayTally,
    },
    /// Policy decided against publishing this post
    Skipped { slug: String, reason: &'static str },
    /// Signing or delivery failed; the batch continues
    Failed { slug: String, error: String },
}

/// Builds, signs, and fans out long-form events for eligible posts.
pub struct Publisher {
    keys: Keys,
    client: Client,
    policy: PublishPolicy,
    site: SiteConfig,
}

impl Publisher {
    /// Construct from a validated config and connect to the configured relays.
    pub async fn connect(config: ValidConfig, site: SiteConfig) -> Result<Self, PublishError> {
        let client = Client::new(config.keys.clone());
        for relay in &config.relays {
            client.add_relay(relay.as_str()).await?;
        }
        client.connect().await;

        Ok(Self {
            keys: config.keys,
            client,
            policy: PublishPolicy {
                enabled: true,
                default_behavior: config.default_behavior,
            },
            site,
        })
    }

    /// Build and sign the NIP-23 long-form event for one post.
    pub fn build_event(&self, post: &Post) -> Result<Event, nostr_sdk::event::builder::Error> {
        build_long_form_event(&self.keys, &self.site, post)
    }

    /// Publish one post, if the policy allows it.
    ///
    /// One send fans the signed event out to every configured relay;
    /// individual relay failures are counted, not escalated.
    pub async fn publish(&self, post: &Post) -> PublishOutcome {
        let decision = self.policy.decide(post);
        if !decision.publish {
            return PublishOutcome::Skipped {
                slug: post.slug.clone(),
                reason: decision.reason,
            };
        }

        match self.try_publish(post).await {
            Ok((event_id, relays)) => PublishOutcome::Published {
                slug: post.slug.clone(),
                event_id,
                relays,
            },
            Err(e) => PublishOutcome::Failed {
                slug: post.slug.clone(),
                error: e.to_string(),
            },
        }
    }

    async fn try_publish(&self, post: &Post) -> Result<(EventId, RelayTally), PublishError> {
        let event = self.build_event(post)?;
        let output = self.client.send_event(event).await?;
        let tally = RelayTally::new(output.success.len(), output.failed.len());
        Ok((output.val, tally))
    }

    /// Publish a batch of posts sequentially.
    ///
    /// Published and skipped posts are followed by a short pause to stay
    /// polite to relays; failed posts continue immediately.
    pub async fn publish_all(&self, posts: &[Post]) -> Vec<PublishOutcome> {
        let mut outcomes = Vec::with_capacity(posts.len());

        for post in posts {
            let outcome = self.publish(post).await;
            let pace = !matches!(outcome, PublishOutcome::Failed { .. });
            outcomes.push(outcome);

            if pace {
                tokio::time::sleep(RELAY_COOLDOWN).await;
            }
        }

        outcomes
    }

    /// Close relay connections.
    pub async fn shutdown(self) {
        let _ = self.client.disconnect().await;
    }
}

/// Build and sign a kind-30023 long-form content event from a post.
///
/// The content is the raw markdown body with an attribution footer linking
/// back to the canonical post URL. The event timestamp prefers the per-post
/// `nostrDate` override over the post date.
fn build_long_form_event(
    keys: &Keys,
    site: &SiteConfig,
    post: &Post,
) -> Result<Event, nostr_sdk::event::builder::Error> {
    let published_at = post.nostr_date.unwrap_or(post.date).timestamp().max(0) as u64;
    let canonical_url = site.post_url(&post.slug);

    let content = format!(
        "{}\n\n---\n\n*Originally published at [{}]({})*",
        post.markdown,
        site.host(),
        canonical_url
    );

    let mut tags: Vec<Tag> = vec![
        Tag::identifier(post.slug.clone()),
        Tag::custom(TagKind::custom("title"), [post.title.clone()]),
        Tag::custom(TagKind::custom("published_at"), [published_at.to_string()]),
        Tag::custom(TagKind::custom("summary"), [post.description.clone()]),
        Tag::custom(
            TagKind::custom("client"),
            [env!("CARGO_PKG_NAME").to_string()],
        ),
    ];

    for topic in &post.tags {
        tags.push(Tag::hashtag(topic.clone()));
    }

    if !post.image.is_empty() {
        let image_url = if post.image.starts_with("http") {
            post.image.clone()
        } else {
            format!("{}{}", site.base_url(), post.image)
        };
        tags.push(Tag::custom(TagKind::custom("image"), [image_url]));
    }

    tags.push(Tag::custom(TagKind::custom("r"), [canonical_url]));

    EventBuilder::long_form_text_note(content)
        .tags(tags)
        .custom_created_at(Timestamp::from_secs(published_at))
        .sign_with_keys(keys)
}
