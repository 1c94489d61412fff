//! Headless browser rendering of product pages
//!
//! One [`BrowserRenderer`] owns one Chromium process for a whole run. The
//! runner calls [`BrowserRenderer::shutdown`] once at the end; if that is
//! skipped (early return, panic unwinding) `Drop` aborts the handler task and
//! chromiumoxide kills the child process.

pub mod launch;
mod timeout;

use chromiumoxide::{Browser, Page};
use std::path::PathBuf;
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::task::JoinHandle;
use tracing::{debug, info, warn};

use crate::config::CollectorConfig;

pub use launch::{download_managed_browser, find_browser_executable};
pub use timeout::with_page_timeout;

const READY_POLL_INTERVAL: Duration = Duration::from_millis(100);

/// Why a page produced no markup
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum RenderError {
    #[error("navigation to {url} failed: {reason}")]
    Navigation { url: String, reason: String },

    #[error("{operation} timed out after {secs}s")]
    Timeout { operation: String, secs: u64 },

    #[error("failed to read page content: {0}")]
    Content(String),

    #[error("renderer already shut down")]
    Closed,
}

/// Anything that turns a URL into rendered HTML.
#[allow(async_fn_in_trait)]
pub trait Render {
    async fn render(&self, url: &str) -> Result<String, RenderError>;
}

/// Outcome of releasing the browser
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ShutdownResult {
    Success,
    /// Browser went away but some step reported an error
    PartialFailure(Vec<String>),
    /// `shutdown` had already run
    AlreadyClosed,
}

struct BrowserSession {
    browser: Browser,
    handler: JoinHandle<()>,
    user_data_dir: Option<PathBuf>,
}

impl BrowserSession {
    fn remove_profile(&mut self) -> Option<String> {
        let path = self.user_data_dir.take()?;
        match std::fs::remove_dir_all(&path) {
            Ok(()) => {
                debug!(target: "catalog_scrape::renderer", "Removed browser profile {}", path.display());
                None
            }
            Err(e) => Some(format!("profile cleanup failed for {}: {e}", path.display())),
        }
    }
}

impl Drop for BrowserSession {
    fn drop(&mut self) {
        self.handler.abort();
        if let Some(err) = self.remove_profile() {
            warn!(target: "catalog_scrape::renderer", "{err}");
        }
    }
}

pub struct BrowserRenderer {
    session: Option<BrowserSession>,
    page_load_timeout_secs: u64,
    settle_delay: Duration,
}

impl BrowserRenderer {
    /// Find or download Chromium and start it with the collector's settings.
    pub async fn launch(config: &CollectorConfig) -> anyhow::Result<Self> {
        let launched = launch::launch_browser(
            config.headless(),
            config.chrome_data_dir().cloned(),
            config.user_agent(),
            Duration::from_secs(config.page_load_timeout_secs()),
        )
        .await?;

        info!(
            target: "catalog_scrape::renderer",
            "Browser ready (headless: {}, profile: {})",
            config.headless(),
            launched.user_data_dir.display()
        );

        let user_data_dir = launched
            .owns_user_data_dir
            .then_some(launched.user_data_dir);

        Ok(Self {
            session: Some(BrowserSession {
                browser: launched.browser,
                handler: launched.handler,
                user_data_dir,
            }),
            page_load_timeout_secs: config.page_load_timeout_secs(),
            settle_delay: config.settle_delay(),
        })
    }

    #[must_use]
    pub fn is_open(&self) -> bool {
        self.session.is_some()
    }

    /// Close the browser, wait for the process to exit and remove the
    /// temporary profile. Later calls (and later renders) see it closed.
    pub async fn shutdown(&mut self) -> ShutdownResult {
        let Some(mut session) = self.session.take() else {
            return ShutdownResult::AlreadyClosed;
        };

        let mut errors = Vec::new();

        if let Err(e) = session.browser.close().await {
            errors.push(format!("browser close failed: {e}"));
        }
        if let Err(e) = session.browser.wait().await {
            errors.push(format!("browser wait failed: {e}"));
        }
        session.handler.abort();
        if let Some(err) = session.remove_profile() {
            errors.push(err);
        }

        if errors.is_empty() {
            info!(target: "catalog_scrape::renderer", "Browser shut down");
            ShutdownResult::Success
        } else {
            for err in &errors {
                warn!(target: "catalog_scrape::renderer", "{err}");
            }
            ShutdownResult::PartialFailure(errors)
        }
    }
}

impl Render for BrowserRenderer {
    async fn render(&self, url: &str) -> Result<String, RenderError> {
        let session = self.session.as_ref().ok_or(RenderError::Closed)?;

        // Blank tab first so a timed-out navigation still has a handle to close.
        let page = with_page_timeout(
            async {
                session
                    .browser
                    .new_page("about:blank")
                    .await
                    .map_err(|e| RenderError::Navigation {
                        url: url.to_string(),
                        reason: e.to_string(),
                    })
            },
            self.page_load_timeout_secs,
            "page creation",
        )
        .await?;

        render_in_tab(page, url, self.page_load_timeout_secs, self.settle_delay).await
    }
}

/// The operations a render performs on one browser tab
#[allow(async_fn_in_trait)]
pub(crate) trait Tab {
    async fn navigate(&self, url: &str) -> Result<(), String>;
    async fn settle(&self, window: Duration);
    async fn html(&self) -> Result<String, String>;
    async fn close(self) -> Result<(), String>;
}

impl Tab for Page {
    async fn navigate(&self, url: &str) -> Result<(), String> {
        self.goto(url).await.map(|_| ()).map_err(|e| e.to_string())
    }

    async fn settle(&self, window: Duration) {
        wait_until_ready(self, window).await;
    }

    async fn html(&self) -> Result<String, String> {
        self.content().await.map_err(|e| e.to_string())
    }

    async fn close(self) -> Result<(), String> {
        Page::close(self).await.map_err(|e| e.to_string())
    }
}

/// Navigate `tab` to `url`, read its markup and close it.
///
/// The tab is closed on every path, including a navigation timeout.
pub(crate) async fn render_in_tab<T: Tab>(
    tab: T,
    url: &str,
    timeout_secs: u64,
    settle_window: Duration,
) -> Result<String, RenderError> {
    let navigated = with_page_timeout(
        async {
            tab.navigate(url)
                .await
                .map_err(|reason| RenderError::Navigation {
                    url: url.to_string(),
                    reason,
                })
        },
        timeout_secs,
        "page navigation",
    )
    .await;

    let html = match navigated {
        Ok(()) => {
            tab.settle(settle_window).await;
            tab.html().await.map_err(RenderError::Content)
        }
        Err(e) => Err(e),
    };

    if let Err(e) = tab.close().await {
        debug!(target: "catalog_scrape::renderer", "Failed to close page for {url}: {e}");
    }

    html
}

impl Drop for BrowserRenderer {
    fn drop(&mut self) {
        if self.session.is_some() {
            warn!(
                target: "catalog_scrape::renderer",
                "BrowserRenderer dropped without shutdown, killing browser"
            );
        }
    }
}

/// Poll `document.readyState` until it reports `complete` or `window` elapses.
async fn wait_until_ready(page: &Page, window: Duration) {
    let start = Instant::now();

    loop {
        let state = page
            .evaluate("document.readyState")
            .await
            .ok()
            .and_then(|result| result.into_value::<String>().ok());

        if state.as_deref() == Some("complete") {
            debug!(
                target: "catalog_scrape::renderer",
                "Page ready after {:.2}s",
                start.elapsed().as_secs_f64()
            );
            return;
        }

        if start.elapsed() >= window {
            debug!(
                target: "catalog_scrape::renderer",
                "Readiness window of {}ms elapsed (state: {state:?})",
                window.as_millis()
            );
            return;
        }

        tokio::time::sleep(READY_POLL_INTERVAL).await;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicBool, Ordering};

    struct FakeTab {
        hang: bool,
        closed: Arc<AtomicBool>,
    }

    impl Tab for FakeTab {
        async fn navigate(&self, _url: &str) -> Result<(), String> {
            if self.hang {
                tokio::time::sleep(Duration::from_secs(60)).await;
            }
            Ok(())
        }

        async fn settle(&self, _window: Duration) {}

        async fn html(&self) -> Result<String, String> {
            Ok("<html></html>".to_string())
        }

        async fn close(self) -> Result<(), String> {
            self.closed.store(true, Ordering::SeqCst);
            Ok(())
        }
    }

    #[tokio::test]
    async fn tab_is_closed_after_a_navigation_timeout() {
        let closed = Arc::new(AtomicBool::new(false));
        let tab = FakeTab {
            hang: true,
            closed: Arc::clone(&closed),
        };

        let result = render_in_tab(tab, "https://slow.example/", 1, Duration::ZERO).await;

        assert_eq!(
            result,
            Err(RenderError::Timeout {
                operation: "page navigation".into(),
                secs: 1
            })
        );
        assert!(closed.load(Ordering::SeqCst));
    }

    #[tokio::test]
    async fn tab_is_closed_after_a_successful_read() {
        let closed = Arc::new(AtomicBool::new(false));
        let tab = FakeTab {
            hang: false,
            closed: Arc::clone(&closed),
        };

        let html = render_in_tab(tab, "https://fast.example/", 1, Duration::ZERO).await;

        assert_eq!(html.as_deref(), Ok("<html></html>"));
        assert!(closed.load(Ordering::SeqCst));
    }
}
