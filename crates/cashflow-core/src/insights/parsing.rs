//! Tolerant parsing of free-text insight responses
//!
//! Models ignore formatting instructions often enough that this never fails:
//! the worst case is an empty insight list with the fallback summary.

use std::sync::OnceLock;

use regex::Regex;

/// Summary used when no usable insight lines remain
pub const NO_PATTERNS_SUMMARY: &str = "No significant patterns detected";

/// Longest summary, in characters, before truncation
pub const MAX_SUMMARY_CHARS: usize = 300;

const ELLIPSIS: &str = "...";

/// A line that is only a list number, e.g. `3.`
fn bare_number_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^\d+\.\s*$").expect("valid regex"))
}

/// One leading bullet (`-`, `*`, `•`) or list number (`1.`, `12)`)
///
/// A list number must be followed by whitespace, so text that merely starts
/// with a figure (`12.5% more`, `2024 spending`) is left alone.
fn marker_re() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^(?:[-*•]+|\d+[.)](?:\s|$))\s*").expect("valid regex"))
}

/// Split a response into discrete insight statements, in order
pub fn parse_insights(raw: &str) -> Vec<String> {
    raw.lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .filter(|line| !bare_number_re().is_match(line))
        .map(|line| marker_re().replace(line, "").trim().to_string())
        .filter(|insight| !insight.is_empty())
        .collect()
}

/// One-line summary for a list of insights
pub fn summarize(insights: &[String]) -> String {
    match insights {
        [] => NO_PATTERNS_SUMMARY.to_string(),
        [only] => only.clone(),
        [first, ..] => truncate_summary(first),
    }
}

/// Parse a raw response into `(insights, summary)`
pub fn parse_response(raw: &str) -> (Vec<String>, String) {
    let insights = parse_insights(raw);
    let summary = summarize(&insights);
    (insights, summary)
}

fn truncate_summary(text: &str) -> String {
    if text.chars().count() <= MAX_SUMMARY_CHARS {
        return text.to_string();
    }
    let keep = MAX_SUMMARY_CHARS - ELLIPSIS.len();
    let mut truncated: String = text.chars().take(keep).collect();
    truncated.push_str(ELLIPSIS);
    truncated
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_numbered_and_bulleted_lines() {
        let (insights, summary) = parse_response("1. Spend less\n- Save more\n\n3.\n");
        assert_eq!(insights, vec!["Spend less", "Save more"]);
        assert_eq!(summary, "Spend less");
    }

    #[test]
    fn test_strips_each_marker_style() {
        let raw = "* Dining is up\n• Groceries are flat\n10. Weekends cost more\n-Fuel spiked\n";
        assert_eq!(
            parse_insights(raw),
            vec![
                "Dining is up",
                "Groceries are flat",
                "Weekends cost more",
                "Fuel spiked"
            ]
        );
    }

    #[test]
    fn test_leading_figures_are_not_markers() {
        let raw = "12.5% more on dining than last month\n30% of spending is rent\n2024 spending is up\n";
        assert_eq!(
            parse_insights(raw),
            vec![
                "12.5% more on dining than last month",
                "30% of spending is rent",
                "2024 spending is up"
            ]
        );

        // A real list number in front of a figure is still stripped
        assert_eq!(
            parse_insights("1. 45% of expenses fell on weekends\n2) 3 categories grew"),
            vec!["45% of expenses fell on weekends", "3 categories grew"]
        );
    }

    #[test]
    fn test_plain_lines_kept_verbatim() {
        let raw = "  Your dining spend rose 20%.  \r\nConsider a weekly budget.";
        assert_eq!(
            parse_insights(raw),
            vec!["Your dining spend rose 20%.", "Consider a weekly budget."]
        );
    }

    #[test]
    fn test_no_usable_lines() {
        let (insights, summary) = parse_response("\n  \n1.\n2.  \n-\n");
        assert!(insights.is_empty());
        assert_eq!(summary, NO_PATTERNS_SUMMARY);
    }

    #[test]
    fn test_single_insight_is_summary_verbatim() {
        let long = "x".repeat(400);
        let (insights, summary) = parse_response(&long);
        assert_eq!(insights.len(), 1);
        assert_eq!(summary, long);
    }

    #[test]
    fn test_long_first_insight_truncated() {
        let first = "a".repeat(301);
        let raw = format!("{}\nsecond", first);
        let (_, summary) = parse_response(&raw);
        assert_eq!(summary.chars().count(), MAX_SUMMARY_CHARS);
        assert!(summary.ends_with("..."));
        assert_eq!(&summary[..297], &first[..297]);

        let exact = "b".repeat(300);
        let (_, summary) = parse_response(&format!("{}\nsecond", exact));
        assert_eq!(summary, exact);
    }

    #[test]
    fn test_truncation_respects_multibyte_chars() {
        let first = "é".repeat(350);
        let (_, summary) = parse_response(&format!("{}\nsecond", first));
        assert_eq!(summary.chars().count(), MAX_SUMMARY_CHARS);
    }
}
