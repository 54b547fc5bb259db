use eyre::Result;
use log::{debug, info};

use crate::chat::client::CompletionClient;
use crate::models::profile::ExperienceRecord;

const SYSTEM_PROMPT: &str = include_str!("system_prompt.txt");
const PROMPT_TEMPLATE: &str = include_str!("prompt_template.txt");

const NOT_SPECIFIED: &str = "Not specified";
pub const NO_EXPERIENCE: &str = "No professional experience information found.";

fn or_not_specified(value: &str) -> &str {
    if value.is_empty() { NOT_SPECIFIED } else { value }
}

/// Renders experience records as the plain-text block shown to the model
/// and stored with shortlisted candidates.
pub fn format_experience(entries: &[ExperienceRecord]) -> String {
    if entries.is_empty() {
        return NO_EXPERIENCE.to_string();
    }

    let mut text = String::from("PROFESSIONAL EXPERIENCE:\n\n");

    for (i, job) in entries.iter().enumerate() {
        text.push_str(&format!("--- Position {} ---\n", i + 1));
        text.push_str(&format!("Job Title: {}\n", or_not_specified(&job.title)));
        text.push_str(&format!(
            "Company: {}\n",
            or_not_specified(job.company.as_deref().unwrap_or_default())
        ));
        if let Some(kind) = job.employment_type.as_deref().filter(|k| !k.is_empty()) {
            text.push_str(&format!("Employment Type: {}\n", kind));
        }
        text.push_str(&format!("Duration: {}\n", or_not_specified(&job.duration)));
        if !job.location.is_empty() {
            text.push_str(&format!("Location: {}\n", job.location));
        }
        text.push_str(&format!(
            "Description & Responsibilities:\n{}\n\n",
            job.description
        ));
    }

    text
}

pub fn build_prompt(experience_text: &str, search_query: &str) -> String {
    PROMPT_TEMPLATE
        .replace("{search_query}", search_query)
        .replace("{experience}", experience_text)
}

/// Case-insensitive substring match on `SHORTLIST`.
///
/// This is deliberately loose: a rejection whose reason mentions the word
/// still counts as a shortlist. Output files depend on this behaviour.
pub fn is_shortlisted(analysis: &str) -> bool {
    analysis.to_uppercase().contains("SHORTLIST")
}

pub struct CandidateAnalyzer<C> {
    client: C,
}

impl<C: CompletionClient> CandidateAnalyzer<C> {
    pub fn new(client: C) -> Self {
        Self { client }
    }

    /// Asks the model for a recommendation and returns its raw answer.
    pub async fn analyze(&self, experience_text: &str, search_query: &str) -> Result<String> {
        let prompt = build_prompt(experience_text, search_query);
        info!("asking {} for a recommendation", self.client.model());

        let analysis = self.client.complete(SYSTEM_PROMPT.trim(), &prompt).await?;
        debug!("model answered: {}", analysis);

        Ok(analysis)
    }
}
