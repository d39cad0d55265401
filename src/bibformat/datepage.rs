//! Prints the date and page count of an article.
//!
//! The output has one of three shapes:
//!
//! - `"<date><separator><pages><page_suffix>"` when both are known
//! - `"<pages><page_suffix>"` when only the page count is known
//! - `"<date>"` when only the date is known, `""` when neither is

use super::{EscapeMode, FormatContext, FormatElement};

/// Subfield spec of the page count (300$a).
pub const PAGES_TAG: &str = "300a";

/// Default text between date and pages.
pub const DEFAULT_SEPARATOR: &str = " - ";

/// Default text after the page count.
pub const DEFAULT_PAGE_SUFFIX: &str = " pages";

/// The date/page element with its parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DatePage {
    /// Text placed between date and pages
    pub separator: String,
    /// Text appended to the page count
    pub page_suffix: String,
}

impl Default for DatePage {
    fn default() -> Self {
        DatePage {
            separator: DEFAULT_SEPARATOR.to_string(),
            page_suffix: DEFAULT_PAGE_SUFFIX.to_string(),
        }
    }
}

impl DatePage {
    /// Element with custom separator and suffix.
    #[must_use]
    pub fn new(separator: impl Into<String>, page_suffix: impl Into<String>) -> Self {
        DatePage {
            separator: separator.into(),
            page_suffix: page_suffix.into(),
        }
    }
}

impl FormatElement for DatePage {
    fn name(&self) -> &'static str {
        "INSPIRE_datepage"
    }

    fn format(&self, ctx: &dyn FormatContext) -> String {
        format_date_page(ctx, &self.separator, &self.page_suffix)
    }

    fn escape_values(&self) -> EscapeMode {
        EscapeMode::Raw
    }
}

/// Render the date and the first page count of a record.
#[must_use]
pub fn format_date_page(ctx: &dyn FormatContext, separator: &str, page_suffix: &str) -> String {
    let date = ctx.date();
    let pages = ctx.field_value(PAGES_TAG, 1);
    join_date_and_pages(&date, &pages, separator, page_suffix)
}

fn join_date_and_pages(date: &str, pages: &str, separator: &str, page_suffix: &str) -> String {
    let mut out = String::new();
    if !date.is_empty() {
        out.push_str(date);
        if !pages.is_empty() {
            out.push_str(separator);
            out.push_str(pages);
            out.push_str(page_suffix);
        }
    } else if !pages.is_empty() {
        out.push_str(pages);
        out.push_str(page_suffix);
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct StubContext {
        date: &'static str,
        pages: &'static str,
        requests: RefCell<Vec<(String, usize)>>,
    }

    impl StubContext {
        fn new(date: &'static str, pages: &'static str) -> Self {
            StubContext {
                date,
                pages,
                requests: RefCell::new(Vec::new()),
            }
        }
    }

    impl FormatContext for StubContext {
        fn date(&self) -> String {
            self.date.to_string()
        }

        fn field_value(&self, tag: &str, limit: usize) -> String {
            self.requests.borrow_mut().push((tag.to_string(), limit));
            self.pages.to_string()
        }
    }

    fn format(date: &'static str, pages: &'static str) -> String {
        DatePage::default().format(&StubContext::new(date, pages))
    }

    #[test]
    fn test_date_only() {
        assert_eq!(format("2020", ""), "2020");
    }

    #[test]
    fn test_pages_only() {
        assert_eq!(format("", "12"), "12 pages");
    }

    #[test]
    fn test_date_and_pages() {
        assert_eq!(format("2020", "12"), "2020 - 12 pages");
    }

    #[test]
    fn test_neither() {
        assert_eq!(format("", ""), "");
    }

    #[test]
    fn test_custom_separator_and_suffix() {
        let element = DatePage::new(", ", " p.");
        assert_eq!(element.format(&StubContext::new("Mar 2011", "7")), "Mar 2011, 7 p.");
    }

    #[test]
    fn test_asks_for_first_page_count_only() {
        let ctx = StubContext::new("", "3");
        format_date_page(&ctx, DEFAULT_SEPARATOR, DEFAULT_PAGE_SUFFIX);
        assert_eq!(ctx.requests.borrow().as_slice(), &[("300a".to_string(), 1)]);
    }

    #[test]
    fn test_output_is_not_escaped() {
        let element = DatePage::default();
        assert_eq!(element.escape_values(), EscapeMode::Raw);
        assert_eq!(element.escape_values().code(), 0);
    }
}
