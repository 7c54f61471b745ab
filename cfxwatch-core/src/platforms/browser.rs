// File: src/platforms/browser.rs

use std::path::PathBuf;
use std::time::Duration;

use async_trait::async_trait;
use headless_chrome::protocol::cdp::Page::CaptureScreenshotFormatOption;
use headless_chrome::{Browser, LaunchOptions};
use tracing::{debug, info};

use cfxwatch_common::models::config::ScreenshotConfig;
use cfxwatch_common::traits::api::Screenshotter;

use crate::Error;

/// Takes the status page snapshot with a throwaway headless Chromium.
///
/// headless_chrome is synchronous, so the whole capture runs on the blocking
/// pool. A browser is launched per capture and dropped (closed) at the end.
pub struct HeadlessScreenshotter {
    config: ScreenshotConfig,
}

impl HeadlessScreenshotter {
    pub fn new(config: ScreenshotConfig) -> Self {
        Self { config }
    }
}

#[async_trait]
impl Screenshotter for HeadlessScreenshotter {
    async fn capture(&self) -> Result<PathBuf, Error> {
        let config = self.config.clone();
        tokio::task::spawn_blocking(move || capture_blocking(&config))
            .await
            .map_err(|e| Error::Screenshot(format!("capture task failed: {e}")))?
    }
}

/// Script that clicks the first element matching `selector` and reports
/// whether there was one.
pub fn expand_script(selector: &str) -> String {
    // A JSON string literal is also a valid JS string literal.
    let quoted = serde_json::Value::String(selector.to_string()).to_string();
    format!(
        "(() => {{ const el = document.querySelector({quoted}); if (!el) {{ return false; }} el.click(); return true; }})()"
    )
}

fn capture_blocking(config: &ScreenshotConfig) -> Result<PathBuf, Error> {
    let options = LaunchOptions::default_builder()
        .headless(true)
        .window_size(Some((config.viewport_width, config.viewport_height)))
        .build()
        .map_err(|e| Error::Screenshot(format!("invalid launch options: {e}")))?;

    debug!("Launching headless browser for {}", config.status_page_url);
    let browser = Browser::new(options)?;
    let tab = browser.new_tab()?;
    tab.navigate_to(&config.status_page_url)?;
    tab.wait_until_navigated()?;

    let clicked = tab.evaluate(&expand_script(&config.expand_selector), false)?;
    if clicked.value != Some(serde_json::Value::Bool(true)) {
        return Err(Error::Screenshot(format!(
            "selector '{}' not found on {}",
            config.expand_selector, config.status_page_url
        )));
    }

    std::thread::sleep(Duration::from_millis(config.settle_delay_ms));

    let png = tab.capture_screenshot(CaptureScreenshotFormatOption::Png, None, None, true)?;
    let path = PathBuf::from(&config.path);
    std::fs::write(&path, &png)?;
    drop(browser);

    info!("Captured {} ({} bytes)", path.display(), png.len());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn script_quotes_selector() {
        let script = expand_script(".a \"b\" .c");
        assert!(script.contains(r#"document.querySelector(".a \"b\" .c")"#));
        assert!(script.ends_with("})()"));
    }
}
