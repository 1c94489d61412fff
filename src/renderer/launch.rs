//! Locating, downloading and launching Chromium

use anyhow::{Context, Result};
use chromiumoxide::browser::{Browser, BrowserConfigBuilder, HeadlessMode};
use chromiumoxide::fetcher::{BrowserFetcher, BrowserFetcherOptions};
use futures::StreamExt;
use std::path::PathBuf;
use std::process::Command;
use std::time::Duration;
use tokio::task::{self, JoinHandle};
use tracing::{debug, error, info, trace, warn};

/// Everything `launch_browser` hands back to the renderer.
pub(crate) struct LaunchedBrowser {
    pub browser: Browser,
    pub handler: JoinHandle<()>,
    pub user_data_dir: PathBuf,
    /// The profile directory was created for this run and may be removed.
    pub owns_user_data_dir: bool,
}

/// Find a Chrome/Chromium executable.
///
/// `CHROMIUM_PATH` wins when it points at an existing file, then the usual
/// install locations for the platform, then `which`.
#[must_use]
pub fn find_browser_executable() -> Option<PathBuf> {
    if let Ok(path) = std::env::var("CHROMIUM_PATH") {
        let path = PathBuf::from(path);
        if path.exists() {
            info!(target: "catalog_scrape::renderer", "Using browser from CHROMIUM_PATH: {}", path.display());
            return Some(path);
        }
        warn!(
            target: "catalog_scrape::renderer",
            "CHROMIUM_PATH points to a missing file: {}",
            path.display()
        );
    }

    let candidates: &[&str] = if cfg!(target_os = "windows") {
        &[
            r"C:\Program Files\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files (x86)\Google\Chrome\Application\chrome.exe",
            r"C:\Program Files\Chromium\Application\chrome.exe",
        ]
    } else if cfg!(target_os = "macos") {
        &[
            "/Applications/Google Chrome.app/Contents/MacOS/Google Chrome",
            "/Applications/Chromium.app/Contents/MacOS/Chromium",
            "/opt/homebrew/bin/chromium",
        ]
    } else {
        &[
            "/usr/bin/google-chrome",
            "/usr/bin/google-chrome-stable",
            "/usr/bin/chromium",
            "/usr/bin/chromium-browser",
            "/snap/bin/chromium",
            "/usr/local/bin/chromium",
        ]
    };

    if let Some(path) = candidates.iter().map(PathBuf::from).find(|p| p.exists()) {
        info!(target: "catalog_scrape::renderer", "Found browser at: {}", path.display());
        return Some(path);
    }

    if cfg!(target_os = "windows") {
        return None;
    }

    for name in ["chromium", "chromium-browser", "google-chrome", "chrome"] {
        let Ok(output) = Command::new("which").arg(name).output() else {
            continue;
        };
        if !output.status.success() {
            continue;
        }
        let found = String::from_utf8_lossy(&output.stdout).trim().to_string();
        if !found.is_empty() {
            info!(target: "catalog_scrape::renderer", "Found browser on PATH: {found}");
            return Some(PathBuf::from(found));
        }
    }

    None
}

/// Download a managed Chromium into the user cache directory.
pub async fn download_managed_browser() -> Result<PathBuf> {
    let cache_dir = dirs::cache_dir()
        .unwrap_or_else(std::env::temp_dir)
        .join("catalog_scrape")
        .join("chromium");

    info!(
        target: "catalog_scrape::renderer",
        "No local browser found, downloading Chromium into {}",
        cache_dir.display()
    );
    std::fs::create_dir_all(&cache_dir).context("Failed to create browser cache directory")?;

    let fetcher = BrowserFetcher::new(
        BrowserFetcherOptions::builder()
            .with_path(&cache_dir)
            .build()
            .context("Failed to build fetcher options")?,
    );
    let revision = fetcher.fetch().await.context("Failed to download Chromium")?;

    info!(
        target: "catalog_scrape::renderer",
        "Downloaded Chromium to: {}",
        revision.folder_path.display()
    );
    Ok(revision.executable_path)
}

/// Launch one browser and spawn its CDP event handler.
///
/// Without `chrome_data_dir` a per-process profile under the temp directory
/// is created and marked as owned so shutdown can remove it.
pub(crate) async fn launch_browser(
    headless: bool,
    chrome_data_dir: Option<PathBuf>,
    user_agent: &str,
    request_timeout: Duration,
) -> Result<LaunchedBrowser> {
    let chrome_path = match find_browser_executable() {
        Some(path) => path,
        None => download_managed_browser().await?,
    };

    let owns_user_data_dir = chrome_data_dir.is_none();
    let user_data_dir = chrome_data_dir.unwrap_or_else(|| {
        std::env::temp_dir().join(format!("catalog_scrape_chrome_{}", std::process::id()))
    });
    std::fs::create_dir_all(&user_data_dir).context("Failed to create user data directory")?;

    let mut builder = BrowserConfigBuilder::default()
        .request_timeout(request_timeout)
        .window_size(1920, 1080)
        .user_data_dir(user_data_dir.clone())
        .chrome_executable(chrome_path);

    builder = if headless {
        builder.headless_mode(HeadlessMode::default())
    } else {
        builder.with_head()
    };

    let config = builder
        .arg(format!("--user-agent={user_agent}"))
        .arg("--disable-blink-features=AutomationControlled")
        .arg("--disable-infobars")
        .arg("--disable-notifications")
        .arg("--disable-extensions")
        .arg("--disable-popup-blocking")
        .arg("--disable-background-networking")
        .arg("--no-first-run")
        .arg("--no-default-browser-check")
        .arg("--no-sandbox")
        .arg("--password-store=basic")
        .arg("--use-mock-keychain")
        .arg("--hide-scrollbars")
        .arg("--mute-audio")
        .build()
        .map_err(|e| anyhow::anyhow!("Failed to build browser config: {e}"))?;

    debug!(target: "catalog_scrape::renderer", "Launching browser with config: {config:?}");
    let (browser, mut handler) = Browser::launch(config)
        .await
        .context("Failed to launch browser")?;

    let handler = task::spawn(async move {
        while let Some(event) = handler.next().await {
            if let Err(e) = event {
                let message = e.to_string();
                // chromiumoxide cannot deserialize some newer CDP events
                if message.contains("data did not match any variant of untagged enum Message")
                    || message.contains("Failed to deserialize WS response")
                {
                    trace!(target: "catalog_scrape::renderer", "Ignored CDP message: {message}");
                } else {
                    error!(target: "catalog_scrape::renderer", "Browser handler error: {e:?}");
                }
            }
        }
        debug!(target: "catalog_scrape::renderer", "Browser handler task completed");
    });

    Ok(LaunchedBrowser {
        browser,
        handler,
        user_data_dir,
        owns_user_data_dir,
    })
}
