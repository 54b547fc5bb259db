//! HTML extraction for search result pages and experience pages.
//!
//! Everything in here is a pure function over a parsed [`scraper::Html`]
//! document or one of its elements, so it can be exercised offline against
//! captured markup.

pub mod dom;
pub mod experience;
pub mod fields;
pub mod rules;
pub mod search;
