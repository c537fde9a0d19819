#![allow(dead_code)]

use courier::EventArgs;
use std::sync::Once;

// ============================================================================
// Test Event Types
// ============================================================================

/// A decoded gateway object, as a connection layer would hand it over.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Gateway {
    Message { author: String, content: String },
    User(String),
    Emoji(String),
}

pub fn message(author: &str, content: &str) -> Gateway {
    Gateway::Message {
        author: author.to_string(),
        content: content.to_string(),
    }
}

pub fn user(name: &str) -> Gateway {
    Gateway::User(name.to_string())
}

pub fn emoji(name: &str) -> Gateway {
    Gateway::Emoji(name.to_string())
}

/// Predicate helper: the first argument is a message written by `author`.
pub fn authored_by(author: &'static str) -> impl Fn(&EventArgs<Gateway>) -> bool + Send + Sync {
    move |args: &EventArgs<Gateway>| {
        matches!(args.first(), Some(Gateway::Message { author: a, .. }) if a == author)
    }
}

// ============================================================================
// Logging
// ============================================================================

static TRACING: Once = Once::new();

/// Install a test subscriber once per test binary. Honors `RUST_LOG`.
pub fn init_tracing() {
    TRACING.call_once(|| {
        let _ = tracing_subscriber::fmt()
            .with_env_filter(
                tracing_subscriber::EnvFilter::try_from_default_env()
                    .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("courier_std=debug")),
            )
            .with_test_writer()
            .try_init();
    });
}
