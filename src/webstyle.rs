//! Web page snippets.
//!
//! [`render_jobs_matrix`] renders the table of job offers per field of
//! interest and rank shown on the jobs landing page. Every cell links to the
//! job listing filtered by that rank and field.
//!
//! Category and rank identifiers are inserted into the markup and the link
//! query string as given. Callers must sanitize them beforehand.
//!
//! # Examples
//!
//! ```
//! use inspire_marc::webstyle::{render_jobs_matrix, JobCounts};
//!
//! let mut counts = JobCounts::new();
//! counts.insert("physics", "PhD", 5);
//!
//! let html = render_jobs_matrix(&["physics"], &["PhD"], &counts);
//! assert!(html.contains(r#"<a href="https://labs.inspirehep.net/jobs?rank=PhD&field_of_interest=physics">5</a>"#));
//! ```

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt::Write;

/// Job listing the matrix links into.
pub const DEFAULT_JOBS_URL: &str = "https://labs.inspirehep.net/jobs";

/// Column labels of the matrix header, in column order.
pub const RANK_LABELS: [&str; 7] = ["PhD", "Postdoc", "Junior", "Senior", "Staff", "Visitor", "Other"];

/// Job offer counts, category -> rank -> count.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobCounts(IndexMap<String, IndexMap<String, u64>>);

impl JobCounts {
    /// An empty table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the count for one category and rank.
    pub fn insert(&mut self, category: impl Into<String>, rank: impl Into<String>, count: u64) {
        self.0
            .entry(category.into())
            .or_default()
            .insert(rank.into(), count);
    }

    /// Count for one category and rank; `0` when absent.
    #[must_use]
    pub fn get(&self, category: &str, rank: &str) -> u64 {
        self.0
            .get(category)
            .and_then(|ranks| ranks.get(rank))
            .copied()
            .unwrap_or(0)
    }

    /// Categories in insertion order.
    pub fn categories(&self) -> impl Iterator<Item = &str> {
        self.0.keys().map(String::as_str)
    }
}

impl<C: Into<String>, R: Into<String>> FromIterator<(C, R, u64)> for JobCounts {
    fn from_iter<I: IntoIterator<Item = (C, R, u64)>>(iter: I) -> Self {
        let mut counts = JobCounts::new();
        for (category, rank, count) in iter {
            counts.insert(category, rank, count);
        }
        counts
    }
}

/// Jobs matrix renderer bound to a listing URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobsMatrix {
    /// Listing URL; `rank` and `field_of_interest` are appended as query parameters
    pub base_url: String,
}

impl Default for JobsMatrix {
    fn default() -> Self {
        JobsMatrix {
            base_url: DEFAULT_JOBS_URL.to_string(),
        }
    }
}

impl JobsMatrix {
    /// Renderer linking into `base_url`.
    #[must_use]
    pub fn new(base_url: impl Into<String>) -> Self {
        JobsMatrix {
            base_url: base_url.into(),
        }
    }

    /// Render the matrix as an HTML fragment.
    ///
    /// The header always lists [`RANK_LABELS`]; `ranks` must be given in
    /// that order for the columns to line up.
    #[must_use]
    pub fn render<C: AsRef<str>, R: AsRef<str>>(
        &self,
        categories: &[C],
        ranks: &[R],
        counts: &JobCounts,
    ) -> String {
        let mut out = String::from(
            "<p>We are listing the number of job offers per field.</p>\n\n\
             <h4>\"physics\" refers to jobs that apply to any non-listed field.</h4>\n\n\
             <table cellpadding=\"4\">\n<tr>\n<td></td>\n",
        );
        for label in RANK_LABELS {
            writeln!(out, "<td>{label}</td>").ok();
        }
        out.push_str("</tr>");

        for category in categories {
            let category = category.as_ref();
            write!(out, "<tr><td align=\"center\">{category}</td>").ok();
            for rank in ranks {
                let rank = rank.as_ref();
                write!(
                    out,
                    "\n<td align=\"center\">\n<a href=\"{}?rank={rank}&field_of_interest={category}\">{}</a>\n</td>",
                    self.base_url,
                    counts.get(category, rank)
                )
                .ok();
            }
            out.push_str("\n</tr>");
        }
        out.push_str("</table>");
        out
    }
}

/// Render the jobs matrix linking into [`DEFAULT_JOBS_URL`].
#[must_use]
pub fn render_jobs_matrix<C: AsRef<str>, R: AsRef<str>>(
    categories: &[C],
    ranks: &[R],
    counts: &JobCounts,
) -> String {
    JobsMatrix::default().render(categories, ranks, counts)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn data_rows(html: &str) -> usize {
        html.matches("<tr><td align=\"center\">").count()
    }

    #[test]
    fn test_single_cell_matrix() {
        let counts: JobCounts = [("physics", "PhD", 5u64)].into_iter().collect();
        let html = render_jobs_matrix(&["physics"], &["PhD"], &counts);

        assert_eq!(data_rows(&html), 1);
        assert!(html.contains("rank=PhD&field_of_interest=physics"));
        assert!(html.contains(">5</a>"));
        assert!(html.ends_with("</table>"));
    }

    #[test]
    fn test_header_lists_all_rank_labels_in_order() {
        let html = render_jobs_matrix::<&str, &str>(&[], &[], &JobCounts::new());
        let positions: Vec<usize> = RANK_LABELS
            .iter()
            .map(|label| html.find(&format!("<td>{label}</td>")).unwrap())
            .collect();
        assert!(positions.windows(2).all(|w| w[0] < w[1]));
        assert_eq!(data_rows(&html), 0);
    }

    #[test]
    fn test_rows_follow_category_order() {
        let counts: JobCounts = [
            ("hep-th", "PhD", 1u64),
            ("hep-th", "Postdoc", 2),
            ("astro-ph", "PhD", 3),
            ("astro-ph", "Postdoc", 4),
        ]
        .into_iter()
        .collect();
        let html = render_jobs_matrix(&["astro-ph", "hep-th"], &["PhD", "Postdoc"], &counts);

        assert_eq!(data_rows(&html), 2);
        let astro = html.find(">astro-ph</td>").unwrap();
        let theory = html.find(">hep-th</td>").unwrap();
        assert!(astro < theory);
        assert!(html.contains("rank=Postdoc&field_of_interest=hep-th\">2</a>"));
        assert!(html.contains("rank=PhD&field_of_interest=astro-ph\">3</a>"));
    }

    #[test]
    fn test_missing_count_renders_zero() {
        let html = render_jobs_matrix(&["gr-qc"], &["Staff"], &JobCounts::new());
        assert!(html.contains("rank=Staff&field_of_interest=gr-qc\">0</a>"));
    }

    #[test]
    fn test_identifiers_are_not_escaped() {
        let counts: JobCounts = [("a&b", "PhD", 1u64)].into_iter().collect();
        let html = render_jobs_matrix(&["a&b"], &["PhD"], &counts);
        assert!(html.contains("field_of_interest=a&b\">1</a>"));
        assert!(html.contains("<td align=\"center\">a&b</td>"));
    }

    #[test]
    fn test_custom_base_url() {
        let counts: JobCounts = [("physics", "Other", 9u64)].into_iter().collect();
        let html = JobsMatrix::new("http://localhost/jobs").render(&["physics"], &["Other"], &counts);
        assert!(html.contains("href=\"http://localhost/jobs?rank=Other&field_of_interest=physics\""));
    }

    #[test]
    fn test_counts_from_json() {
        let counts: JobCounts =
            serde_json::from_str(r#"{"physics": {"PhD": 5, "Postdoc": 2}}"#).unwrap();
        assert_eq!(counts.get("physics", "Postdoc"), 2);
        assert_eq!(counts.get("physics", "Staff"), 0);
        assert_eq!(counts.categories().collect::<Vec<_>>(), vec!["physics"]);
    }
}
