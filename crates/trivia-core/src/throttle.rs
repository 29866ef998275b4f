//! Request throttle for the remote service's rate limit.
//!
//! The remote service accepts at most one question request per five seconds.
//! The throttle spaces consecutive requests by a window that adds a one
//! second margin on top of that limit.

use std::time::Duration;

use tokio::time::{Instant, sleep};

/// Minimum spacing the remote service enforces between requests.
pub const SERVICE_LIMIT: Duration = Duration::from_secs(5);

/// Extra spacing added on top of [`SERVICE_LIMIT`].
pub const SAFETY_MARGIN: Duration = Duration::from_secs(1);

/// Spaces sequential requests at least `window` apart.
#[derive(Debug, Clone)]
pub struct Throttle {
    window: Duration,
    last_issued: Option<Instant>,
}

impl Default for Throttle {
    fn default() -> Self {
        Self::new(SERVICE_LIMIT + SAFETY_MARGIN)
    }
}

impl Throttle {
    /// Creates a throttle with a custom window.
    #[must_use]
    pub fn new(window: Duration) -> Self {
        Self {
            window,
            last_issued: None,
        }
    }

    /// The spacing enforced between requests.
    #[must_use]
    pub fn window(&self) -> Duration {
        self.window
    }

    /// Waits until a request may be issued and records it as issued now.
    ///
    /// The first call never waits. Later calls sleep for whatever remains of
    /// the window after the previous request, so time already spent on that
    /// request counts towards the window. Returns how long it slept.
    pub async fn acquire(&mut self) -> Duration {
        let wait = self
            .last_issued
            .map_or(Duration::ZERO, |last| self.window.saturating_sub(last.elapsed()));
        if !wait.is_zero() {
            sleep(wait).await;
        }
        self.last_issued = Some(Instant::now());
        wait
    }
}
