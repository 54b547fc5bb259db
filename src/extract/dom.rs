use scraper::{ElementRef, Selector};

/// Parses a selector that is known at compile time.
///
/// Only used to build the `LazyLock` selector statics, where a parse failure
/// is a typo in this crate rather than bad input.
pub fn static_selector(css: &str) -> Selector {
    Selector::parse(css).unwrap_or_else(|e| panic!("invalid built-in selector `{css}`: {e:?}"))
}

/// Parses a user supplied selector.
pub fn parse_selector(css: &str) -> eyre::Result<Selector> {
    Selector::parse(css).map_err(|e| eyre::eyre!("invalid CSS selector `{}`: {:?}", css, e))
}

/// Visible text of an element with whitespace collapsed to single spaces.
pub fn text_of(element: ElementRef<'_>) -> String {
    element
        .text()
        .flat_map(str::split_whitespace)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Length in characters; markup is full of `·` and other multi-byte glyphs.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// True when the element's class list is exactly `expected`, in order.
pub fn has_class_list(element: ElementRef<'_>, expected: &str) -> bool {
    element
        .value()
        .attr("class")
        .is_some_and(|classes| classes.split_whitespace().eq(expected.split_whitespace()))
}

/// True when the raw class attribute contains `needle` anywhere.
pub fn class_contains(element: ElementRef<'_>, needle: &str) -> bool {
    element
        .value()
        .attr("class")
        .is_some_and(|classes| classes.contains(needle))
}

/// Case-insensitive substring check against a token list.
pub fn contains_any(text: &str, tokens: &[&str]) -> bool {
    let lower = text.to_lowercase();
    tokens.iter().any(|token| lower.contains(token))
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::Html;

    fn first<'a>(doc: &'a Html, css: &str) -> ElementRef<'a> {
        doc.select(&static_selector(css)).next().unwrap()
    }

    #[test]
    fn text_is_whitespace_collapsed() {
        let doc = Html::parse_fragment("<div>  Senior\n   <b>Engineer</b>  </div>");
        assert_eq!(text_of(first(&doc, "div")), "Senior Engineer");
    }

    #[test]
    fn class_list_must_match_exactly() {
        let doc = Html::parse_fragment(
            r#"<span class="t-14  t-normal">a</span><span class="t-14 t-normal t-black--light">b</span>"#,
        );
        let spans: Vec<_> = doc.select(&static_selector("span")).collect();
        assert!(has_class_list(spans[0], "t-14 t-normal"));
        assert!(!has_class_list(spans[1], "t-14 t-normal"));
        assert!(class_contains(spans[1], "black"));
    }

    #[test]
    fn token_match_ignores_case() {
        assert!(contains_any("Jan 2020 - PRESENT", &["present"]));
        assert!(!contains_any("Engineer", &["jan", "feb"]));
    }

    #[test]
    fn bad_user_selector_is_an_error() {
        assert!(parse_selector("ul[").is_err());
        assert!(parse_selector("ul > li").is_ok());
    }
}
