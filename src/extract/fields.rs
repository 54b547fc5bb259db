//! Field-level heuristics for a single experience entry.
//!
//! Markup on experience pages is inconsistent between entries, so every field
//! is recovered by trying a list of increasingly loose rules and keeping the
//! first answer that passes its text-shape filter.

use std::sync::LazyLock;

use log::debug;
use scraper::{ElementRef, Selector};

use crate::extract::dom::{
    char_len, class_contains, contains_any, has_class_list, static_selector, text_of,
};
use crate::extract::rules::RuleChain;
use crate::models::profile::{ExperienceRecord, Outcome};

pub const NO_DESCRIPTION: &str = "No detailed description provided";

const SEPARATOR: char = '·';

const MONTHS: [&str; 12] = [
    "jan", "feb", "mar", "apr", "may", "jun", "jul", "aug", "sep", "oct", "nov", "dec",
];

const TITLE_SELECTORS: [&str; 4] = [
    "div[data-field='experience-company-name'] span[aria-hidden='true']",
    ".display-flex.align-items-center span[aria-hidden='true']",
    ".mr1.hoverable-link-text span[aria-hidden='true']",
    ".break-words span[aria-hidden='true']",
];

const NON_TITLE_TOKENS: [&str; 3] = ["·", "full-time", "part-time"];

const DATE_TOKENS: [&str; 3] = ["present", "mos", "yr"];

const DURATION_TOKENS: [&str; 5] = ["present", "mos", "yr", "month", "year"];

const EMPLOYMENT_TOKENS: [&str; 4] = ["full-time", "part-time", "contract", "internship"];

const DESCRIPTION_NOISE_TOKENS: [&str; 3] = ["full-time", "part-time", "contract"];

const COMPANY_SUFFIXES: [&str; 9] = [
    "inc",
    "llc",
    "ltd",
    "corp",
    "company",
    "technologies",
    "solutions",
    "systems",
    "software",
];

const GAZETTEER: [&str; 21] = [
    "colombia",
    "bogota",
    "dublin",
    "ireland",
    "india",
    "mumbai",
    "pune",
    "remote",
    "hybrid",
    "on-site",
    "united states",
    "usa",
    "uk",
    "canada",
    "new york",
    "california",
    "texas",
    "florida",
    "london",
    "paris",
    "berlin",
];

const DESCRIPTION_CONTAINERS: [&str; 3] = [
    "pvs-list__outer-container",
    "pvs-entity__sub-components",
    "display-flex",
];

const COMPANY_SPAN_CLASSES: &str = "t-14 t-normal";
const DATE_SPAN_CLASSES: &str = "t-14 t-normal t-black--light";

static HIDDEN_SPAN: LazyLock<Selector> =
    LazyLock::new(|| static_selector("span[aria-hidden='true']"));
static SPAN: LazyLock<Selector> = LazyLock::new(|| static_selector("span"));
static DIV: LazyLock<Selector> = LazyLock::new(|| static_selector("div"));
static LIST: LazyLock<Selector> = LazyLock::new(|| static_selector("ul"));
static LIST_ITEM: LazyLock<Selector> = LazyLock::new(|| static_selector("li"));

static TITLE_RULES: LazyLock<RuleChain<String>> = LazyLock::new(|| {
    let mut chain = RuleChain::new("title");
    for css in TITLE_SELECTORS {
        let selector = static_selector(css);
        chain = chain.rule(css, move |node| {
            node.select(&selector)
                .next()
                .map(text_of)
                .filter(|text| char_len(text) > 2)
        });
    }

    chain.rule("leading aria-hidden spans", |node| {
        node.select(&HIDDEN_SPAN)
            .take(3)
            .map(text_of)
            .find(|text| looks_like_title(text))
    })
});

static COMPANY_RULES: LazyLock<RuleChain<CompanyInfo>> = LazyLock::new(|| {
    RuleChain::new("company")
        .rule("separator-joined company span", |node| {
            spans_with_classes(node, COMPANY_SPAN_CLASSES)
                .map(text_of)
                .find_map(|text| split_company_span(&text))
        })
        .rule("short company name scan", |node| {
            node.select(&HIDDEN_SPAN)
                .map(text_of)
                .find(|text| looks_like_company(text))
                .map(|company| CompanyInfo {
                    company: Some(company),
                    employment_type: None,
                })
        })
});

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompanyInfo {
    pub company: Option<String>,
    pub employment_type: Option<String>,
}

fn spans_with_classes<'a>(
    node: ElementRef<'a>,
    classes: &'static str,
) -> impl Iterator<Item = ElementRef<'a>> {
    node.select(&SPAN)
        .filter(move |span| has_class_list(*span, classes))
}

fn looks_like_title(text: &str) -> bool {
    let len = char_len(text);
    (5..100).contains(&len)
        && !contains_any(text, &NON_TITLE_TOKENS)
        && !contains_any(text, &MONTHS)
}

fn looks_like_company(text: &str) -> bool {
    let len = char_len(text);
    if len <= 3 || len >= 80 {
        return false;
    }
    if contains_any(text, &MONTHS) || contains_any(text, &DATE_TOKENS) {
        return false;
    }
    if contains_any(text, &EMPLOYMENT_TOKENS) {
        return false;
    }

    contains_any(text, &COMPANY_SUFFIXES) || text.split_whitespace().count() <= 4
}

fn split_company_span(text: &str) -> Option<CompanyInfo> {
    let mut parts = text.split(SEPARATOR);
    let company = parts.next()?.trim();
    let employment_type = parts.next()?.trim();

    if char_len(company) <= 1 {
        return None;
    }

    Some(CompanyInfo {
        company: Some(company.to_string()),
        employment_type: Some(employment_type.to_string()),
    })
}

/// True when `text` carries any month abbreviation or duration word.
pub fn contains_duration_token(text: &str) -> bool {
    contains_any(text, &MONTHS) || contains_any(text, &DURATION_TOKENS)
}

pub fn extract_title(node: ElementRef<'_>) -> String {
    TITLE_RULES.first_match(node).unwrap_or_default()
}

pub fn extract_company_info(node: ElementRef<'_>) -> CompanyInfo {
    COMPANY_RULES.first_match(node).unwrap_or_default()
}

pub fn extract_duration(node: ElementRef<'_>) -> String {
    spans_with_classes(node, DATE_SPAN_CLASSES)
        .map(text_of)
        .find(|text| contains_duration_token(text))
        .unwrap_or_default()
}

pub fn extract_location(node: ElementRef<'_>) -> String {
    spans_with_classes(node, DATE_SPAN_CLASSES)
        .map(text_of)
        .find(|text| contains_any(text, &GAZETTEER))
        .unwrap_or_default()
}

fn push_unique(parts: &mut Vec<String>, text: String) {
    if !parts.contains(&text) {
        parts.push(text);
    }
}

pub fn extract_description(node: ElementRef<'_>) -> String {
    let mut parts = Vec::new();

    let containers = node.select(&DIV).filter(|div| {
        DESCRIPTION_CONTAINERS
            .iter()
            .any(|class| class_contains(*div, class))
    });
    for container in containers {
        for text in container.select(&HIDDEN_SPAN).map(text_of) {
            if char_len(&text) > 50 && !contains_any(&text, &DESCRIPTION_NOISE_TOKENS) {
                push_unique(&mut parts, text);
            }
        }
    }

    for list in node.select(&LIST) {
        for text in list.select(&LIST_ITEM).map(text_of) {
            if char_len(&text) > 10 {
                push_unique(&mut parts, format!("• {text}"));
            }
        }
    }

    if parts.is_empty() {
        NO_DESCRIPTION.to_string()
    } else {
        parts.join("\n\n")
    }
}

/// Builds a record from one entry node, or skips it when neither a title nor
/// a company could be recovered (ads and placeholder rows look like that).
pub fn extract_job_entry(node: ElementRef<'_>, index: usize) -> Outcome<ExperienceRecord> {
    let CompanyInfo {
        company,
        employment_type,
    } = extract_company_info(node);

    let record = ExperienceRecord {
        title: extract_title(node),
        company,
        employment_type,
        duration: extract_duration(node),
        location: extract_location(node),
        description: extract_description(node),
    };

    if !record.is_valid() {
        return Outcome::Skipped(format!("entry {} has neither title nor company", index + 1));
    }

    debug!(
        "extracted entry {}: {} at {}",
        index + 1,
        record.title,
        record.company.as_deref().unwrap_or("unknown company")
    );
    Outcome::Found(record)
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    const ENTRY_CLASSES: &str = "pvs-list__paged-list-item artdeco-list__item pvs-list__item--line-separated pvs-list__item--one-column";

    fn entry_doc(inner: &str) -> Html {
        Html::parse_fragment(&format!(r#"<ul><li class="{ENTRY_CLASSES}">{inner}</li></ul>"#))
    }

    fn entry(doc: &Html) -> ElementRef<'_> {
        doc.select(&LIST_ITEM).next().unwrap()
    }

    const SENIOR_ENGINEER: &str = r#"
        <div class="display-flex align-items-center mr1 t-bold">
            <span aria-hidden="true">Senior Engineer</span>
        </div>
        <span class="t-14 t-normal"><span aria-hidden="true">Acme Corp · Full-time</span></span>
        <span class="t-14 t-normal t-black--light">
            <span aria-hidden="true">Jan 2020 - Present · 3 yrs</span>
        </span>
    "#;

    #[test]
    fn extracts_a_complete_entry() {
        let doc = entry_doc(SENIOR_ENGINEER);

        let Outcome::Found(record) = extract_job_entry(entry(&doc), 0) else {
            panic!("entry should not be skipped");
        };

        assert_eq!(
            record,
            ExperienceRecord {
                title: "Senior Engineer".to_string(),
                company: Some("Acme Corp".to_string()),
                employment_type: Some("Full-time".to_string()),
                duration: "Jan 2020 - Present · 3 yrs".to_string(),
                location: String::new(),
                description: NO_DESCRIPTION.to_string(),
            }
        );
    }

    #[test]
    fn extraction_is_idempotent() {
        let doc = entry_doc(SENIOR_ENGINEER);
        let node = entry(&doc);

        assert_eq!(extract_job_entry(node, 0), extract_job_entry(node, 0));
    }

    #[test]
    fn entries_without_title_or_company_are_skipped() {
        for inner in [
            "",
            r#"<span class="t-14 t-normal t-black--light"><span aria-hidden="true">Jan 2020</span></span>"#,
            r#"<span aria-hidden="true">·</span>"#,
        ] {
            let doc = entry_doc(inner);
            assert!(
                matches!(extract_job_entry(entry(&doc), 4), Outcome::Skipped(_)),
                "expected skip for {inner:?}"
            );
        }
    }

    #[test]
    fn company_span_is_split_on_separator() {
        for (text, company, kind) in [
            ("Acme Corp · Full-time", "Acme Corp", "Full-time"),
            ("  Globex  ·  Contract ", "Globex", "Contract"),
            ("Initech · Part-time · 2 yrs", "Initech", "Part-time"),
        ] {
            let doc = entry_doc(&format!(r#"<span class="t-14 t-normal">{text}</span>"#));
            let info = extract_company_info(entry(&doc));
            assert_eq!(info.company.as_deref(), Some(company));
            assert_eq!(info.employment_type.as_deref(), Some(kind));
        }
    }

    #[test]
    fn one_letter_company_falls_through_to_scan() {
        let doc = entry_doc(
            r#"<span class="t-14 t-normal">X · Full-time</span>
               <span aria-hidden="true">Umbrella Software Ltd</span>"#,
        );

        let info = extract_company_info(entry(&doc));

        assert_eq!(info.company.as_deref(), Some("Umbrella Software Ltd"));
        assert_eq!(info.employment_type, None);
    }

    #[test]
    fn company_scan_rejects_dates_and_employment_types() {
        let doc = entry_doc(
            r#"<span aria-hidden="true">Jan 2020 - Present</span>
               <span aria-hidden="true">Full-time</span>
               <span aria-hidden="true">IBM</span>
               <span aria-hidden="true">Globex Technologies</span>"#,
        );

        let info = extract_company_info(entry(&doc));

        assert_eq!(info.company.as_deref(), Some("Globex Technologies"));
    }

    #[test]
    fn title_falls_back_to_leading_spans() {
        let doc = entry_doc(
            r#"<span aria-hidden="true">Full-time</span>
               <span aria-hidden="true">Staff Security Analyst</span>"#,
        );

        assert_eq!(extract_title(entry(&doc)), "Staff Security Analyst");
    }

    #[test]
    fn title_fallback_only_looks_at_first_three_spans() {
        let doc = entry_doc(
            r#"<span aria-hidden="true">Jan 2021</span>
               <span aria-hidden="true">Feb 2022</span>
               <span aria-hidden="true">Mar 2023</span>
               <span aria-hidden="true">Platform Engineer</span>"#,
        );

        assert_eq!(extract_title(entry(&doc)), "");
    }

    #[test]
    fn duration_tokens_decide_acceptance() {
        for (text, expected) in [
            ("Jan 2020 - Present", true),
            ("2019 - 2021 · 2 yrs", true),
            ("6 mos", true),
            ("One year", true),
            ("Dublin, Ireland", false),
            ("2019 - 2021", false),
            ("", false),
        ] {
            assert_eq!(contains_duration_token(text), expected, "{text:?}");

            let doc = entry_doc(&format!(
                r#"<span class="t-14 t-normal t-black--light">{text}</span>"#
            ));
            assert_eq!(!extract_duration(entry(&doc)).is_empty(), expected, "{text:?}");
        }
    }

    #[test]
    fn location_comes_from_gazetteer() {
        let doc = entry_doc(
            r#"<span class="t-14 t-normal t-black--light">Jan 2020 - Present</span>
               <span class="t-14 t-normal t-black--light">Dublin, County Dublin, Ireland · Hybrid</span>"#,
        );

        assert_eq!(
            extract_location(entry(&doc)),
            "Dublin, County Dublin, Ireland · Hybrid"
        );
    }

    #[test]
    fn description_has_no_duplicate_passages() {
        let passage = "Designed and operated the detection pipeline for cloud workloads across regions.";
        let doc = entry_doc(&format!(
            r#"<div class="pvs-list__outer-container">
                 <div class="pvs-entity__sub-components">
                   <span aria-hidden="true">{passage}</span>
                 </div>
                 <span aria-hidden="true">{passage}</span>
               </div>
               <div class="display-flex"><span aria-hidden="true">Full-time role with a long blurb that should be ignored entirely</span></div>
               <ul>
                 <li>Hardened CI runners</li>
                 <li>Hardened CI runners</li>
                 <li>short</li>
               </ul>"#
        ));

        let description = extract_description(entry(&doc));

        assert_eq!(description, format!("{passage}\n\n• Hardened CI runners"));
    }

    #[test]
    fn empty_description_uses_sentinel() {
        let doc = entry_doc(r#"<span aria-hidden="true">Engineer</span>"#);
        assert_eq!(extract_description(entry(&doc)), NO_DESCRIPTION);
    }
}
