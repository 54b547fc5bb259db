use std::collections::HashSet;
use std::sync::LazyLock;

use eyre::Result;
use regex::Regex;
use scraper::{Html, Selector};
use url::Url;

use crate::extract::dom::parse_selector;

const EXPERIENCE_SUFFIX: &str = "details/experience/";

static PROFILE_PATH: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^/in/[^/]+").unwrap_or_else(|e| panic!("invalid profile path pattern: {e}"))
});

/// Compiled selectors describing a people-search results page.
#[derive(Debug, Clone)]
pub struct SearchSelectors {
    pub results_container: Selector,
    pub result_item: Selector,
    pub profile_link: Selector,
    pub next_button: Selector,
}

impl SearchSelectors {
    pub fn parse(
        results_container: &str,
        result_item: &str,
        profile_link: &str,
        next_button: &str,
    ) -> Result<Self> {
        Ok(Self {
            results_container: parse_selector(results_container)?,
            result_item: parse_selector(result_item)?,
            profile_link: parse_selector(profile_link)?,
            next_button: parse_selector(next_button)?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileLink {
    /// Canonical `/in/<slug>` URL, used for de-duplication.
    pub url: String,
    pub original_url: String,
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SearchPage {
    pub container_found: bool,
    pub profile_links: Vec<ProfileLink>,
    pub has_next: bool,
}

/// People-search URL for `query` in `location`; the page parameter is only
/// sent from the second page on.
pub fn search_url(base: &Url, query: &str, location: &str, page: u32) -> Result<Url> {
    let mut url = base.join("/search/results/people/")?;
    {
        let mut params = url.query_pairs_mut();
        params.append_pair("keywords", &format!("{} {}", query.trim(), location.trim()));
        if page > 1 {
            params.append_pair("page", &page.to_string());
        }
    }
    Ok(url)
}

/// Resolves `href` against `base` and reduces it to the bare profile URL.
///
/// Returns `None` for anything that is not a `/in/<slug>` profile link.
pub fn normalize_profile_url(href: &str, base: &Url) -> Option<String> {
    let mut url = base.join(href.trim()).ok()?;
    let path = PROFILE_PATH.find(url.path())?.as_str().to_string();

    url.set_path(&path);
    url.set_query(None);
    url.set_fragment(None);
    Some(url.to_string())
}

/// Address of the dedicated experience sub-page for a profile.
pub fn experience_url(profile_url: &str) -> String {
    if profile_url.contains("/details/experience/") {
        return profile_url.to_string();
    }

    let clean = profile_url
        .split(['?', '#'])
        .next()
        .unwrap_or(profile_url)
        .trim_end_matches('/');

    if clean.contains("/in/") {
        format!("{}/{}", clean, EXPERIENCE_SUFFIX)
    } else {
        profile_url.to_string()
    }
}

/// Reads the result list, profile links and pagination state of one search
/// results page. Links are unique within the page and keep page order.
pub fn parse_search_page(html: &str, selectors: &SearchSelectors, base: &Url) -> SearchPage {
    let document = Html::parse_document(html);

    let has_next = document.select(&selectors.next_button).next().is_some();

    let Some(container) = document.select(&selectors.results_container).next() else {
        return SearchPage {
            container_found: false,
            profile_links: Vec::new(),
            has_next,
        };
    };

    let mut seen = HashSet::new();
    let profile_links = container
        .select(&selectors.result_item)
        .filter_map(|item| item.select(&selectors.profile_link).next())
        .filter_map(|link| link.value().attr("href"))
        .filter_map(|href| {
            let url = normalize_profile_url(href, base)?;
            seen.insert(url.clone()).then(|| ProfileLink {
                url,
                original_url: href.to_string(),
            })
        })
        .collect();

    SearchPage {
        container_found: true,
        profile_links,
        has_next,
    }
}
