//! Browser sessions used by the end-to-end verification.

pub mod http_session;

use crate::domain::error::Result;
use crate::domain::page::SelectorCandidates;
use async_trait::async_trait;

pub use http_session::HttpBrowserSession;

#[async_trait]
pub trait BrowserSession: Send {
    /// Loads `url`, resolved against the current page when relative.
    async fn visit(&mut self, url: &str) -> Result<()>;

    /// Clears the matched field and types `text` into it.
    fn fill(&mut self, selector: &str, text: &str) -> Result<()>;

    /// Activates the matched control and waits for the resulting page.
    async fn click(&mut self, selector: &str) -> Result<()>;

    fn current_url(&self) -> String;

    fn count(&self, selector: &str) -> Result<usize>;

    fn page_contains(&self, text: &str) -> bool;

    /// Visible text of every element matching `selector`.
    fn texts(&self, selector: &str) -> Result<Vec<String>>;

    /// First candidate that matches at least one element on the page.
    fn find_first<'a>(&self, candidates: &'a SelectorCandidates) -> Result<Option<&'a str>> {
        candidates.select_first(|candidate| Ok(self.count(candidate)? > 0))
    }
}
