//! Browser automation behind a small trait so the pipeline can be driven by
//! a real WebDriver session or by canned pages in tests.

use async_trait::async_trait;
use eyre::Result;

pub mod session;
pub mod webdriver;

pub use webdriver::WebDriverBrowser;

#[async_trait]
pub trait Browser: Send {
    /// Navigates to `url`, waits until `ready_selector` matches an element,
    /// and returns the rendered page source.
    ///
    /// Fails when navigation fails or the page never becomes ready.
    async fn open_page(&mut self, url: &str, ready_selector: &str) -> Result<String>;

    /// Ends the browser session.
    async fn close(self: Box<Self>) -> Result<()>;
}
