use std::fs::OpenOptions;
use std::io::{LineWriter, Write};
use std::path::{Path, PathBuf};

use eyre::{Result, WrapErr};
use log::debug;

use crate::models::profile::ProfileResult;
use crate::utils::config::OutputConfig;

const SEPARATOR_WIDTH: usize = 80;

/// Appends one text block per analyzed candidate to the shortlisted or the
/// rejected file.
#[derive(Debug, Clone)]
pub struct ResultWriter {
    shortlisted: PathBuf,
    rejected: PathBuf,
}

impl ResultWriter {
    pub fn new(shortlisted: impl Into<PathBuf>, rejected: impl Into<PathBuf>) -> Self {
        Self {
            shortlisted: shortlisted.into(),
            rejected: rejected.into(),
        }
    }

    pub fn from_config(config: &OutputConfig) -> Self {
        Self::new(&config.shortlisted, &config.rejected)
    }

    pub fn path_for(&self, shortlisted: bool) -> &Path {
        if shortlisted {
            &self.shortlisted
        } else {
            &self.rejected
        }
    }

    /// Appends the candidate block and returns the file written to. The
    /// experience summary is only kept for shortlisted candidates.
    pub fn save(
        &self,
        profile: &ProfileResult,
        experience_text: &str,
        analysis: &str,
        shortlisted: bool,
    ) -> Result<&Path> {
        let path = self.path_for(shortlisted);

        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(path)
            .wrap_err_with(|| format!("failed to open {}", path.display()))?;
        let mut out = LineWriter::new(file);

        writeln!(out, "Name: {}", profile.name)?;
        writeln!(out, "LinkedIn Profile: {}", profile.profile_url)?;
        writeln!(out, "Experience Page: {}", profile.experience_url)?;
        if shortlisted {
            writeln!(out, "Experience Summary:\n{}", experience_text)?;
        }
        writeln!(out, "Analysis: {}", analysis)?;
        writeln!(out, "{}\n", "-".repeat(SEPARATOR_WIDTH))?;
        out.flush()?;

        debug!("saved {} to {}", profile.name, path.display());
        Ok(path)
    }
}
