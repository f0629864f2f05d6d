use std::path::Path;
use std::time::Duration;

use chromiumoxide::{Browser, BrowserConfig, Page};
use futures::StreamExt;
use tokio::task::JoinHandle;
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{HarvestError, Result};

/// A launched browser plus the background task draining its CDP events.
pub struct BrowserHandle {
    browser: Browser,
    handler_task: JoinHandle<()>,
}

impl BrowserHandle {
    /// Launch Chrome and open the given URL in a fresh page.
    pub async fn launch(config: &Config, url: &str) -> Result<(Self, Page)> {
        info!("launching {} browser", if config.headless { "headless" } else { "headful" });
        debug!("initial url: {}", url);

        let mut builder = BrowserConfig::builder().args(vec![
            "--disable-gpu",
            "--no-sandbox",
            "--disable-dev-shm-usage",
            "--remote-debugging-port=0",
            // Images are dead weight for a scraping session.
            "--blink-settings=imagesEnabled=false",
        ]);
        if config.headless {
            builder = builder.new_headless_mode();
        } else {
            builder = builder.with_head();
        }
        if let Some(exe) = &config.chrome_executable {
            builder = builder.chrome_executable(Path::new(exe));
        }
        let browser_config = builder
            .build()
            .map_err(|e| HarvestError::Config(format!("browser config: {}", e)))?;

        let (browser, mut handler) = Browser::launch(browser_config).await?;
        debug!("browser process up");

        let handler_task = tokio::spawn(async move {
            while let Some(event) = handler.next().await {
                if event.is_err() {
                    break;
                }
            }
        });

        // Give the browser a moment to settle before opening a page.
        sleep(Duration::from_millis(300)).await;

        let page = browser.new_page(url).await?;
        info!("navigated to {}", url);

        Ok((
            Self {
                browser,
                handler_task,
            },
            page,
        ))
    }

    /// Close the browser. Called on every exit path, success or failure.
    pub async fn shutdown(mut self) {
        if let Err(e) = self.browser.close().await {
            warn!("browser close failed: {}", e);
        }
        if let Err(e) = self.browser.wait().await {
            warn!("browser did not exit cleanly: {}", e);
        }
        self.handler_task.abort();
        debug!("browser shut down");
    }
}
