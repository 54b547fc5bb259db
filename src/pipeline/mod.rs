//! The candidate pipeline: collect profiles through the browser, then
//! analyze and file each one.

use eyre::Result;
use log::warn;
use url::Url;

use crate::browser::Browser;
use crate::chat::analyzer::CandidateAnalyzer;
use crate::chat::client::CompletionClient;
use crate::extract::search::SearchSelectors;
use crate::models::profile::{ProfileResult, RunSummary};
use crate::output::ResultWriter;
use crate::utils::config::ConfigInner;

pub mod collector;
pub mod shortlister;

pub use collector::ProfileCollector;
pub use shortlister::Shortlister;

#[derive(Debug)]
pub struct RunReport {
    pub profiles: Vec<ProfileResult>,
    pub summary: RunSummary,
}

pub struct Pipeline<C> {
    analyzer: CandidateAnalyzer<C>,
    writer: ResultWriter,
    selectors: SearchSelectors,
    base_url: Url,
    search_ready: String,
    profile_ready: String,
}

impl<C: CompletionClient> Pipeline<C> {
    pub fn new(config: &ConfigInner, client: C) -> Result<Self> {
        Ok(Self {
            analyzer: CandidateAnalyzer::new(client),
            writer: ResultWriter::from_config(&config.output),
            selectors: config.search.selectors()?,
            base_url: config.browser.base_url()?,
            search_ready: config.search.results_container.clone(),
            profile_ready: config.browser.profile_ready_selector.clone(),
        })
    }

    /// Collects up to `max_profiles` profiles, closes the browser whatever
    /// happened, then analyzes what was collected.
    pub async fn run(
        &self,
        mut browser: Box<dyn Browser>,
        search_query: &str,
        location: &str,
        max_profiles: usize,
    ) -> Result<RunReport> {
        let collected = ProfileCollector::new(
            browser.as_mut(),
            &self.selectors,
            &self.base_url,
            &self.search_ready,
            &self.profile_ready,
        )
        .collect(search_query, location, max_profiles)
        .await;

        if let Err(e) = browser.close().await {
            warn!("failed to close browser: {:#}", e);
        }

        let profiles = collected?;
        let summary = Shortlister::new(&self.analyzer, &self.writer)
            .process(&profiles, search_query)
            .await;

        Ok(RunReport { profiles, summary })
    }
}
