//! Publishing posts to Nostr as NIP-23 long-form content.
//!
//! The publisher is an independent pipeline over the same parsed posts the
//! site builder uses. It is configured entirely through environment
//! variables and fails soft: misconfiguration disables publishing, per-post
//! errors never abort the batch, and partial relay delivery counts as
//! success.

mod policy;
mod publisher;

pub use policy::{Decision, DefaultBehavior, PublishPolicy};
pub use publisher::{
    PublishError, PublishOutcome, Publisher, PublisherConfig, PublisherConfigError, RelayTally,
    ValidConfig, ENV_PRIVATE_KEY,
};
