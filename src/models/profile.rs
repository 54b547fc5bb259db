/// One work-experience block recovered from an experience page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExperienceRecord {
    pub title: String,
    pub company: Option<String>,
    pub employment_type: Option<String>,
    pub duration: String,
    pub location: String,
    pub description: String,
}

impl ExperienceRecord {
    /// A record is only worth keeping when it names a role or an employer.
    pub fn is_valid(&self) -> bool {
        !self.title.is_empty() || self.company.as_deref().is_some_and(|c| !c.is_empty())
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileResult {
    pub name: String,
    pub profile_url: String,
    pub experience_url: String,
    /// In the order the entries appear on the page.
    pub experience_entries: Vec<ExperienceRecord>,
}

/// Per-item result used where one bad item must not stop its siblings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome<T> {
    Found(T),
    Skipped(String),
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct RunSummary {
    pub profiles_visited: usize,
    pub shortlisted: usize,
    pub rejected: usize,
    pub failed: usize,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(title: &str, company: Option<&str>) -> ExperienceRecord {
        ExperienceRecord {
            title: title.to_string(),
            company: company.map(str::to_string),
            employment_type: None,
            duration: String::new(),
            location: String::new(),
            description: String::new(),
        }
    }

    #[test]
    fn validity_needs_title_or_company() {
        assert!(record("Engineer", None).is_valid());
        assert!(record("", Some("Acme")).is_valid());
        assert!(!record("", Some("")).is_valid());
        assert!(!record("", None).is_valid());
    }
}
