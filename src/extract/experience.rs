use std::sync::LazyLock;

use log::{debug, info, warn};
use scraper::{ElementRef, Html, Selector};

use crate::extract::dom::{char_len, has_class_list, static_selector, text_of};
use crate::extract::fields::extract_job_entry;
use crate::models::profile::{ExperienceRecord, Outcome};

const ENTRY_CLASSES: &str = "pvs-list__paged-list-item artdeco-list__item pvs-list__item--line-separated pvs-list__item--one-column";

const NAME_SELECTORS: [&str; 3] = ["h1", ".text-heading-xlarge", ".break-words"];

pub const UNKNOWN_NAME: &str = "Unknown";

static LIST_ITEM: LazyLock<Selector> = LazyLock::new(|| static_selector("li"));
static ENTRY_BY_ID: LazyLock<Selector> =
    LazyLock::new(|| static_selector("li[id*='EXPERIENCE-VIEW-DETAILS-profile']"));
static NAME: LazyLock<Vec<Selector>> =
    LazyLock::new(|| NAME_SELECTORS.into_iter().map(static_selector).collect());

/// Finds the experience entry nodes, preferring the paged list items and
/// falling back to items whose id marks them as experience details.
pub fn find_entries(document: &Html) -> Vec<ElementRef<'_>> {
    let entries: Vec<_> = document
        .select(&LIST_ITEM)
        .filter(|item| has_class_list(*item, ENTRY_CLASSES))
        .collect();

    if !entries.is_empty() {
        return entries;
    }

    debug!("no paged list items, falling back to experience id matcher");
    document.select(&ENTRY_BY_ID).collect()
}

/// Extracts every usable experience record on the page, in page order.
pub fn extract_experience(document: &Html) -> Vec<ExperienceRecord> {
    let entries = find_entries(document);
    info!("found {} experience entries", entries.len());

    entries
        .into_iter()
        .enumerate()
        .filter_map(|(index, entry)| match extract_job_entry(entry, index) {
            Outcome::Found(record) => Some(record),
            Outcome::Skipped(reason) => {
                warn!("skipping experience entry: {}", reason);
                None
            }
        })
        .collect()
}

/// Name of the profile owner, or [`UNKNOWN_NAME`].
pub fn extract_name(document: &Html) -> String {
    NAME.iter()
        .filter_map(|selector| document.select(selector).next())
        .map(text_of)
        .find(|name| !name.is_empty() && char_len(name) < 100)
        .unwrap_or_else(|| UNKNOWN_NAME.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn page(entries: &str) -> Html {
        Html::parse_document(&format!(
            r#"<html><body><main>
                 <h1 class="text-heading-xlarge">  Ada   Lovelace </h1>
                 <section><ul>{entries}</ul></section>
               </main></body></html>"#
        ))
    }

    fn entry(title: &str, company: &str) -> String {
        format!(
            r#"<li class="{ENTRY_CLASSES}">
                 <div class="display-flex align-items-center"><span aria-hidden="true">{title}</span></div>
                 <span class="t-14 t-normal">{company}</span>
               </li>"#
        )
    }

    #[test]
    fn keeps_page_order_and_drops_skipped_entries() {
        let html = page(&format!(
            r#"{}<li class="{ENTRY_CLASSES}"></li>{}"#,
            entry("Security Engineer", "Globex · Full-time"),
            entry("Analyst Intern", "Initech · Internship"),
        ));

        let records = extract_experience(&html);

        let titles: Vec<_> = records.iter().map(|r| r.title.as_str()).collect();
        assert_eq!(titles, ["Security Engineer", "Analyst Intern"]);
        assert_eq!(records[1].employment_type.as_deref(), Some("Internship"));
    }

    #[test]
    fn falls_back_to_id_matcher() {
        let html = page(
            r#"<li id="profilePagedListComponent-EXPERIENCE-VIEW-DETAILS-profile-1">
                 <div class="display-flex align-items-center"><span aria-hidden="true">SOC Lead</span></div>
               </li>
               <li id="unrelated"><span aria-hidden="true">Something else entirely</span></li>"#,
        );

        let records = extract_experience(&html);

        assert_eq!(records.len(), 1);
        assert_eq!(records[0].title, "SOC Lead");
    }

    #[test]
    fn page_without_entries_yields_nothing() {
        assert!(extract_experience(&page("")).is_empty());
    }

    #[test]
    fn name_uses_first_usable_heading() {
        assert_eq!(extract_name(&page("")), "Ada Lovelace");
        assert_eq!(
            extract_name(&Html::parse_document("<p>no heading</p>")),
            UNKNOWN_NAME
        );
    }
}
