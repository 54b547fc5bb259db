use log::{info, warn};

use crate::chat::analyzer::{CandidateAnalyzer, format_experience, is_shortlisted};
use crate::chat::client::CompletionClient;
use crate::models::profile::{ProfileResult, RunSummary};
use crate::output::ResultWriter;

const PREVIEW_CHARS: usize = 500;

fn preview(text: &str) -> String {
    match text.char_indices().nth(PREVIEW_CHARS) {
        Some((cut, _)) => format!("{}...", &text[..cut]),
        None => text.to_string(),
    }
}

/// Runs every collected profile through the analyzer and files the result.
pub struct Shortlister<'a, C> {
    analyzer: &'a CandidateAnalyzer<C>,
    writer: &'a ResultWriter,
}

impl<'a, C: CompletionClient> Shortlister<'a, C> {
    pub fn new(analyzer: &'a CandidateAnalyzer<C>, writer: &'a ResultWriter) -> Self {
        Self { analyzer, writer }
    }

    pub async fn process(&self, profiles: &[ProfileResult], search_query: &str) -> RunSummary {
        let mut summary = RunSummary {
            profiles_visited: profiles.len(),
            ..RunSummary::default()
        };

        for profile in profiles {
            info!("analyzing {}", profile.name);

            let experience_text = format_experience(&profile.experience_entries);
            info!("extracted experience profile:\n{}", preview(&experience_text));

            if profile.experience_entries.is_empty() {
                warn!("no experience data found for {}", profile.name);
                summary.rejected += 1;
                continue;
            }

            let analysis = match self.analyzer.analyze(&experience_text, search_query).await {
                Ok(analysis) => analysis,
                Err(e) => {
                    warn!("could not analyze {}: {:#}", profile.name, e);
                    summary.failed += 1;
                    continue;
                }
            };

            let shortlisted = is_shortlisted(&analysis);
            if let Err(e) = self
                .writer
                .save(profile, &experience_text, &analysis, shortlisted)
            {
                warn!("could not save result for {}: {:#}", profile.name, e);
                summary.failed += 1;
                continue;
            }

            if shortlisted {
                summary.shortlisted += 1;
                info!("shortlisted {}", profile.name);
            } else {
                summary.rejected += 1;
                info!("rejected {}", profile.name);
            }
        }

        summary
    }
}
