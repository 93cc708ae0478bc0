//! Per-post publish policy.

use crate::build::post::Post;

/// Global fallback applied when a post has no explicit `nostr` flag in its
/// front matter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum DefaultBehavior {
    /// Posts are skipped unless they opt in with `nostr: true`
    #[default]
    OptIn,
    /// Posts are published unless they opt out with `nostr: false`
    OptOut,
}

impl DefaultBehavior {
    /// Parse the configured value; anything other than "opt-out" is opt-in.
    pub fn parse(raw: &str) -> Self {
        if raw.trim().eq_ignore_ascii_case("opt-out") {
            Self::OptOut
        } else {
            Self::OptIn
        }
    }
}

/// The outcome of a policy check for one post.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    pub publish: bool,
    pub reason: &'static str,
}

/// Decides whether a post should be published.
#[derive(Debug, Clone, Copy)]
pub struct PublishPolicy {
    pub enabled: bool,
    pub default_behavior: DefaultBehavior,
}

impl PublishPolicy {
    /// A policy that skips everything, used when configuration validation
    /// failed and the caller chose to continue anyway.
    pub const fn disabled() -> Self {
        Self {
            enabled: false,
            default_behavior: DefaultBehavior::OptIn,
        }
    }

    /// An explicit front-matter override wins; otherwise the global default
    /// behavior applies.
    pub fn decide(&self, post: &Post) -> Decision {
        if !self.enabled {
            return Decision {
                publish: false,
                reason: "Global publishing disabled",
            };
        }

        match post.nostr {
            Some(true) => Decision {
                publish: true,
                reason: "Explicitly enabled in frontmatter",
            },
            Some(false) => Decision {
                publish: false,
                reason: "Explicitly disabled in frontmatter",
            },
            None => match self.default_behavior {
                DefaultBehavior::OptIn => Decision {
                    publish: false,
                    reason: "Opt-in mode: nostr not set in frontmatter",
                },
                DefaultBehavior::OptOut => Decision {
                    publish: true,
                    reason: "Opt-out mode: nostr not set in frontmatter",
                },
            },
        }
    }
}
