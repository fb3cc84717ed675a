//! Display enumeration backend trait and implementations.
//!
//! A backend produces the raw text the display-list parser consumes.
//! The only real implementation shells out to `wlr-randr`; tests
//! substitute mocks through the trait.

mod wlr;

pub use wlr::WlrRandrBackend;

use anyhow::Result;
use async_trait::async_trait;

/// Trait for display enumeration backends.
#[async_trait]
pub trait DisplayBackend: Send + Sync {
    /// Run the enumeration tool and return its standard output as text.
    ///
    /// Failures (missing executable, non-zero exit, timeout) come back
    /// as errors carrying a human-readable message; the session loop
    /// reports them to the caller as error responses instead of
    /// crashing.
    async fn enumerate(&self) -> Result<String>;
}
