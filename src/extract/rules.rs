use log::debug;
use scraper::ElementRef;

type RuleFn<T> = Box<dyn for<'a> Fn(ElementRef<'a>) -> Option<T> + Send + Sync>;

/// An ordered list of named heuristics; the first one that produces a value
/// wins.
///
/// New heuristics are appended with [`RuleChain::rule`] without touching the
/// ones already in place.
pub struct RuleChain<T> {
    field: &'static str,
    rules: Vec<(&'static str, RuleFn<T>)>,
}

impl<T> RuleChain<T> {
    pub fn new(field: &'static str) -> Self {
        Self {
            field,
            rules: Vec::new(),
        }
    }

    pub fn rule<F>(mut self, name: &'static str, apply: F) -> Self
    where
        F: for<'a> Fn(ElementRef<'a>) -> Option<T> + Send + Sync + 'static,
    {
        self.rules.push((name, Box::new(apply)));
        self
    }

    /// Runs the rules in order and returns the first hit.
    pub fn first_match(&self, node: ElementRef<'_>) -> Option<T> {
        self.rules.iter().find_map(|(name, apply)| {
            let value = apply(node)?;
            debug!("{} found by rule `{}`", self.field, name);
            Some(value)
        })
    }
}
