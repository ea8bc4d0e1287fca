//! Chromium-backed [`ScreenshotSource`] over the DevTools protocol.
//!
//! The source owns a private current-thread tokio runtime and blocks on every
//! call, so it plugs into the synchronous capture API unchanged.

use crate::driver::{BoundingBox, ElementHandle, ScreenshotSource};
use crate::result::{VerifyError, VerifyResult};
use chromiumoxide::browser::{Browser as CdpBrowser, BrowserConfig as CdpConfig};
use chromiumoxide::cdp::browser_protocol::page::CaptureScreenshotFormat;
use chromiumoxide::page::{Page as CdpPage, ScreenshotParams};
use futures::StreamExt;
use serde::{Deserialize, Serialize};
use std::cell::Cell;
use std::path::PathBuf;
use tokio::runtime::{Builder, Runtime};
use tokio::task::JoinHandle;
use tracing::{debug, info};

/// Launch options for [`ChromiumSource`]
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChromiumConfig {
    /// Run without a visible window
    pub headless: bool,
    /// Viewport width
    pub viewport_width: u32,
    /// Viewport height
    pub viewport_height: u32,
    /// Chromium sandbox (disable in containers)
    pub sandbox: bool,
    /// Explicit chromium binary
    pub chromium_path: Option<PathBuf>,
}

impl Default for ChromiumConfig {
    fn default() -> Self {
        Self {
            headless: true,
            viewport_width: 1280,
            viewport_height: 720,
            sandbox: true,
            chromium_path: None,
        }
    }
}

impl ChromiumConfig {
    /// Set viewport size
    #[must_use]
    pub const fn with_viewport(mut self, width: u32, height: u32) -> Self {
        self.viewport_width = width;
        self.viewport_height = height;
        self
    }

    /// Set headless mode
    #[must_use]
    pub const fn with_headless(mut self, headless: bool) -> Self {
        self.headless = headless;
        self
    }

    /// Disable sandbox
    #[must_use]
    pub const fn with_no_sandbox(mut self) -> Self {
        self.sandbox = false;
        self
    }
}

/// Screenshot source driving one chromium page
#[derive(Debug)]
pub struct ChromiumSource {
    runtime: Runtime,
    browser: CdpBrowser,
    page: CdpPage,
    handler: JoinHandle<()>,
    open: Cell<bool>,
}

fn launch_error(e: impl std::fmt::Display) -> VerifyError {
    VerifyError::capture(format!("browser launch failed: {e}"))
}

fn cdp_error(e: impl std::fmt::Display) -> VerifyError {
    VerifyError::capture(e.to_string())
}

impl ChromiumSource {
    /// Launch chromium and open a blank page
    ///
    /// # Errors
    ///
    /// Returns error if the runtime cannot start or chromium cannot launch
    pub fn launch(config: &ChromiumConfig) -> VerifyResult<Self> {
        let runtime = Builder::new_current_thread().enable_all().build()?;

        let mut builder = CdpConfig::builder().window_size(config.viewport_width, config.viewport_height);
        if !config.headless {
            builder = builder.with_head();
        }
        if !config.sandbox {
            builder = builder.no_sandbox();
        }
        if let Some(ref path) = config.chromium_path {
            builder = builder.chrome_executable(path);
        }
        let cdp_config = builder.build().map_err(launch_error)?;

        let (browser, page, handler) = runtime.block_on(async {
            let (browser, mut handler) = CdpBrowser::launch(cdp_config).await.map_err(launch_error)?;
            let handler = tokio::spawn(async move {
                while let Some(event) = handler.next().await {
                    if event.is_err() {
                        break;
                    }
                }
            });
            let page = browser.new_page("about:blank").await.map_err(cdp_error)?;
            Ok::<_, VerifyError>((browser, page, handler))
        })?;
        info!(
            width = config.viewport_width,
            height = config.viewport_height,
            headless = config.headless,
            "chromium launched"
        );

        Ok(Self {
            runtime,
            browser,
            page,
            handler,
            open: Cell::new(true),
        })
    }

    /// Navigate the page and wait for the load to finish
    ///
    /// # Errors
    ///
    /// Returns error if navigation fails
    pub fn goto(&self, url: &str) -> VerifyResult<()> {
        self.runtime.block_on(async {
            self.page.goto(url).await.map_err(cdp_error)?;
            Ok::<_, VerifyError>(())
        })?;
        debug!(url, "navigated");
        Ok(())
    }

    /// Locate an element and read its bounding box
    ///
    /// # Errors
    ///
    /// Returns error if no element matches `selector`
    pub fn locate(&self, selector: &str) -> VerifyResult<ElementHandle> {
        let bounds = self.runtime.block_on(async {
            let element = self.page.find_element(selector).await.map_err(cdp_error)?;
            let bounds = element.bounding_box().await.ok();
            Ok::<_, VerifyError>(bounds)
        })?;
        let handle = ElementHandle::new(selector);
        Ok(match bounds {
            Some(b) => handle.with_bounding_box(BoundingBox::new(
                b.x as f32,
                b.y as f32,
                b.width as f32,
                b.height as f32,
            )),
            None => handle,
        })
    }

    /// Close the browser; later captures report the source unavailable
    ///
    /// # Errors
    ///
    /// Returns error if chromium does not shut down cleanly
    pub fn close(&mut self) -> VerifyResult<()> {
        if !self.open.replace(false) {
            return Ok(());
        }
        let browser = &mut self.browser;
        self.runtime.block_on(async move {
            browser.close().await.map_err(cdp_error)?;
            browser.wait().await?;
            Ok::<_, VerifyError>(())
        })?;
        self.handler.abort();
        info!("chromium closed");
        Ok(())
    }
}

impl ScreenshotSource for ChromiumSource {
    fn is_available(&self) -> bool {
        self.open.get()
    }

    fn capture_viewport(&self) -> VerifyResult<Vec<u8>> {
        let params = ScreenshotParams::builder()
            .format(CaptureScreenshotFormat::Png)
            .build();
        self.runtime
            .block_on(self.page.screenshot(params))
            .map_err(cdp_error)
    }

    fn capture_element(&self, element: &ElementHandle) -> VerifyResult<Vec<u8>> {
        self.runtime.block_on(async {
            let found = self
                .page
                .find_element(element.selector.as_str())
                .await
                .map_err(cdp_error)?;
            found
                .screenshot(CaptureScreenshotFormat::Png)
                .await
                .map_err(cdp_error)
        })
    }
}

impl Drop for ChromiumSource {
    fn drop(&mut self) {
        if self.open.get() {
            self.handler.abort();
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used, clippy::expect_used)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ChromiumConfig::default();
        assert!(config.headless);
        assert!(config.sandbox);
        assert_eq!((config.viewport_width, config.viewport_height), (1280, 720));
    }

    #[test]
    fn test_config_builders() {
        let config = ChromiumConfig::default()
            .with_viewport(800, 600)
            .with_headless(false)
            .with_no_sandbox();
        assert!(!config.headless);
        assert!(!config.sandbox);
        assert_eq!(config.viewport_width, 800);
    }

    #[test]
    fn test_config_from_yaml() {
        let config: ChromiumConfig = serde_yaml_ng::from_str("viewport_width: 640\n").unwrap();
        assert_eq!(config.viewport_width, 640);
        assert!(config.headless);
    }
}
