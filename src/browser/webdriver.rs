use std::collections::HashMap;
use std::time::Duration;

use async_trait::async_trait;
use backon::{ConstantBuilder, Retryable};
use eyre::{Result, WrapErr, bail, eyre};
use fantoccini::{Client, ClientBuilder, Locator};
use log::{debug, info, warn};
use serde_json::json;
use url::Url;

use crate::browser::Browser;
use crate::browser::session::SessionState;
use crate::utils::config::BrowserConfig;

/// Paths that mean the site bounced us to a login wall.
const LOGGED_OUT_MARKERS: [&str; 4] = ["/login", "/authwall", "/checkpoint", "/uas/login"];

fn is_logged_out(url: &Url) -> bool {
    LOGGED_OUT_MARKERS
        .iter()
        .any(|marker| url.path().starts_with(marker))
}

/// A Chrome session driven over WebDriver (chromedriver by default).
pub struct WebDriverBrowser {
    client: Client,
    base_url: Url,
    poll_interval: Duration,
    poll_attempts: usize,
}

impl WebDriverBrowser {
    /// Connects to the WebDriver endpoint without any session state.
    pub async fn launch(config: &BrowserConfig) -> Result<Self> {
        let mut chrome_opts = HashMap::new();
        let mut args = vec![json!("--window-size=1366,900")];
        if config.headless {
            args.push(json!("--headless=new"));
            args.push(json!("--disable-gpu"));
        }
        chrome_opts.insert("args".to_string(), json!(args));

        let mut caps = serde_json::Map::new();
        caps.insert("goog:chromeOptions".to_string(), json!(chrome_opts));

        info!("launching browser via {}", config.webdriver_url);
        let client = ClientBuilder::native()
            .capabilities(caps)
            .connect(&config.webdriver_url)
            .await
            .wrap_err_with(|| format!("failed to connect to webdriver at {}", config.webdriver_url))?;

        Ok(Self {
            client,
            base_url: config.base_url()?,
            poll_interval: config.poll_interval(),
            poll_attempts: config.poll_attempts(),
        })
    }

    /// Launches the browser and restores the saved session, failing if the
    /// session file is unusable or the site no longer accepts it.
    pub async fn with_session(config: &BrowserConfig) -> Result<Self> {
        let session = SessionState::load(&config.session_file)?;
        let browser = Self::launch(config).await?;

        if let Err(e) = browser.restore_session(&session).await {
            if let Err(close_err) = browser.client.close().await {
                warn!("failed to close browser: {}", close_err);
            }
            return Err(e);
        }

        Ok(browser)
    }

    async fn restore_session(&self, session: &SessionState) -> Result<()> {
        // cookies can only be set for the domain currently loaded
        self.client.goto(self.base_url.as_str()).await?;

        for cookie in session.to_cookies() {
            let name = cookie.name().to_string();
            if let Err(e) = self.client.add_cookie(cookie).await {
                warn!("could not restore cookie {}: {}", name, e);
            }
        }

        let feed = self.base_url.join("/feed/")?;
        self.client.goto(feed.as_str()).await?;
        let landed = self.client.current_url().await?;
        if is_logged_out(&landed) {
            bail!("saved session was rejected (landed on {}); run `login` again", landed);
        }

        info!("session restored");
        Ok(())
    }

    /// Lets the user log in by hand, then captures the resulting cookies.
    pub async fn capture_login(
        &self,
        wait_for_user: impl FnOnce() -> Result<()>,
    ) -> Result<SessionState> {
        let login = self.base_url.join("/login")?;
        self.client.goto(login.as_str()).await?;

        wait_for_user()?;

        let cookies = self.client.get_all_cookies().await?;
        if cookies.is_empty() {
            bail!("browser has no cookies; was the login completed?");
        }
        Ok(SessionState::from_cookies(&cookies))
    }

    /// Polls for `selector` until it shows up or the attempt budget is spent.
    async fn wait_ready(&self, selector: &str) -> Result<()> {
        let client = &self.client;

        (|| async move { client.find(Locator::Css(selector)).await.map(|_| ()) })
            .retry(
                ConstantBuilder::default()
                    .with_delay(self.poll_interval)
                    .with_max_times(self.poll_attempts),
            )
            .notify(|_, after| debug!("`{}` not on page yet, polling again in {:?}", selector, after))
            .await
            .map_err(|e| eyre!("page never showed `{}`: {}", selector, e))
    }
}

#[async_trait]
impl Browser for WebDriverBrowser {
    async fn open_page(&mut self, url: &str, ready_selector: &str) -> Result<String> {
        debug!("navigating to {}", url);
        self.client
            .goto(url)
            .await
            .wrap_err_with(|| format!("navigation to {} failed", url))?;

        self.wait_ready(ready_selector).await?;

        Ok(self.client.source().await?)
    }

    async fn close(self: Box<Self>) -> Result<()> {
        self.client.close().await?;
        info!("browser closed");
        Ok(())
    }
}
