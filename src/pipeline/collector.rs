use std::collections::HashSet;

use eyre::Result;
use log::{debug, info, warn};
use scraper::Html;
use url::Url;

use crate::browser::Browser;
use crate::extract::experience::{extract_experience, extract_name};
use crate::extract::search::{SearchSelectors, experience_url, parse_search_page, search_url};
use crate::models::profile::{Outcome, ProfileResult};

/// Walks people-search result pages and visits each profile's experience
/// page until enough profiles are collected or the results run out.
pub struct ProfileCollector<'a> {
    browser: &'a mut dyn Browser,
    selectors: &'a SearchSelectors,
    base_url: &'a Url,
    search_ready: &'a str,
    profile_ready: &'a str,
}

impl<'a> ProfileCollector<'a> {
    pub fn new(
        browser: &'a mut dyn Browser,
        selectors: &'a SearchSelectors,
        base_url: &'a Url,
        search_ready: &'a str,
        profile_ready: &'a str,
    ) -> Self {
        Self {
            browser,
            selectors,
            base_url,
            search_ready,
            profile_ready,
        }
    }

    pub async fn collect(
        &mut self,
        query: &str,
        location: &str,
        max_profiles: usize,
    ) -> Result<Vec<ProfileResult>> {
        let mut profiles = Vec::new();
        let mut visited = HashSet::new();
        let mut page_num = 1;

        while profiles.len() < max_profiles {
            let url = search_url(self.base_url, query, location, page_num)?;
            info!("opening people search page {}", page_num);

            let html = match self.browser.open_page(url.as_str(), self.search_ready).await {
                Ok(html) => html,
                Err(e) => {
                    warn!("search page {} has no results: {:#}", page_num, e);
                    break;
                }
            };

            let page = parse_search_page(&html, self.selectors, self.base_url);
            if !page.container_found {
                info!("no search results container on page {}", page_num);
                break;
            }
            info!(
                "found {} profile links on page {}",
                page.profile_links.len(),
                page_num
            );

            for link in &page.profile_links {
                if profiles.len() >= max_profiles {
                    break;
                }
                if !visited.insert(link.url.clone()) {
                    debug!("already visited {}, skipping", link.url);
                    continue;
                }

                info!("visiting profile #{}: {}", profiles.len() + 1, link.url);
                debug!("result link was {}", link.original_url);
                match self.visit_profile(&link.url).await {
                    Outcome::Found(profile) => profiles.push(profile),
                    Outcome::Skipped(reason) => {
                        warn!("skipping profile {}: {}", link.url, reason)
                    }
                }
            }

            if profiles.len() >= max_profiles || page.profile_links.is_empty() {
                break;
            }
            if !page.has_next {
                info!("no more result pages");
                break;
            }
            page_num += 1;
        }

        Ok(profiles)
    }

    async fn visit_profile(&mut self, profile_url: &str) -> Outcome<ProfileResult> {
        let experience_url = experience_url(profile_url);

        let html = match self
            .browser
            .open_page(&experience_url, self.profile_ready)
            .await
        {
            Ok(html) => html,
            Err(e) => return Outcome::Skipped(format!("{:#}", e)),
        };

        let document = Html::parse_document(&html);
        let name = extract_name(&document);
        let experience_entries = extract_experience(&document);
        info!(
            "{}: {} experience entries",
            name,
            experience_entries.len()
        );

        Outcome::Found(ProfileResult {
            name,
            profile_url: profile_url.to_string(),
            experience_url,
            experience_entries,
        })
    }
}
