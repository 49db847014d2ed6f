use std::fmt;

/// A declarative reference to a DOM element. Locators hold no live handle;
/// the action library re-resolves them inside the page on every use, so a
/// re-render between two actions can never leave the harness holding a stale
/// element.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Locator {
    /// Exact element id.
    Id(String),
    /// Arbitrary CSS selector.
    Css(String),
    /// Substring match on the id attribute. The application under test
    /// re-randomizes some ids on every page load (`add-project-btn-4217`),
    /// so the stable prefix is the only dependable part.
    IdContains(String),
    /// First element of `tag` whose text content contains `text`.
    Text { tag: String, text: String },
}

impl Locator {
    pub fn id(value: impl Into<String>) -> Self {
        Locator::Id(value.into())
    }

    pub fn css(value: impl Into<String>) -> Self {
        Locator::Css(value.into())
    }

    pub fn id_contains(value: impl Into<String>) -> Self {
        Locator::IdContains(value.into())
    }

    pub fn button_text(text: impl Into<String>) -> Self {
        Locator::Text {
            tag: "button".to_string(),
            text: text.into(),
        }
    }

    /// CSS selector form, when the strategy has one. Text matching has no
    /// CSS equivalent and is resolved by scanning instead.
    fn css_selector(&self) -> Option<String> {
        match self {
            Locator::Id(id) => Some(format!("[id=\"{id}\"]")),
            Locator::Css(selector) => Some(selector.clone()),
            Locator::IdContains(fragment) => Some(format!("[id*=\"{fragment}\"]")),
            Locator::Text { .. } => None,
        }
    }

    /// JavaScript expression evaluating to the matched element or `null`.
    pub fn js_expression(&self) -> String {
        match self.css_selector() {
            Some(selector) => format!("document.querySelector({})", js_string(&selector)),
            None => match self {
                Locator::Text { tag, text } => format!(
                    "(Array.from(document.querySelectorAll({})).find(el => (el.textContent || '').includes({})) || null)",
                    js_string(tag),
                    js_string(text)
                ),
                _ => unreachable!("non-text locators always have a CSS form"),
            },
        }
    }

    /// JavaScript expression evaluating to the number of matches.
    pub fn js_count_expression(&self) -> String {
        match self.css_selector() {
            Some(selector) => {
                format!("document.querySelectorAll({}).length", js_string(&selector))
            }
            None => match self {
                Locator::Text { tag, text } => format!(
                    "Array.from(document.querySelectorAll({})).filter(el => (el.textContent || '').includes({})).length",
                    js_string(tag),
                    js_string(text)
                ),
                _ => unreachable!("non-text locators always have a CSS form"),
            },
        }
    }
}

impl fmt::Display for Locator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Locator::Id(id) => write!(f, "id={id}"),
            Locator::Css(selector) => write!(f, "css={selector}"),
            Locator::IdContains(fragment) => write!(f, "id*={fragment}"),
            Locator::Text { tag, text } => write!(f, "text={tag}:{text}"),
        }
    }
}

/// Quotes a Rust string as a single-quoted JavaScript string literal.
pub(crate) fn js_string(value: &str) -> String {
    let escaped = value
        .replace('\\', "\\\\")
        .replace('\'', "\\'")
        .replace('\n', "\\n");
    format!("'{escaped}'")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn id_locator_resolves_by_attribute_selector() {
        let js = Locator::id("username").js_expression();
        assert_eq!(js, "document.querySelector('[id=\"username\"]')");
    }

    #[test]
    fn css_locator_passes_selector_through() {
        let js = Locator::css(".ag-row").js_expression();
        assert_eq!(js, "document.querySelector('.ag-row')");
    }

    #[test]
    fn id_contains_uses_substring_match() {
        let js = Locator::id_contains("add-project-btn-").js_expression();
        assert_eq!(js, "document.querySelector('[id*=\"add-project-btn-\"]')");
    }

    #[test]
    fn text_locator_scans_tag_by_content() {
        let js = Locator::button_text("Cancel").js_expression();
        assert!(js.contains("document.querySelectorAll('button')"));
        assert!(js.contains(".includes('Cancel')"));
    }

    #[test]
    fn count_expression_counts_matches() {
        let js = Locator::css(".ag-row").js_count_expression();
        assert_eq!(js, "document.querySelectorAll('.ag-row').length");
    }

    #[test]
    fn js_string_escapes_quotes_and_backslashes() {
        assert_eq!(js_string("a'b\\c"), "'a\\'b\\\\c'");
    }

    #[test]
    fn display_names_the_strategy() {
        assert_eq!(Locator::id("lead").to_string(), "id=lead");
        assert_eq!(
            Locator::id_contains("add-project-btn-").to_string(),
            "id*=add-project-btn-"
        );
    }
}
