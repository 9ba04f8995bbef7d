// IssueTag - core/compose.rs
//
// Assembles the final clipboard text: pretext, tagged issues, posttext.
// Blank segments are omitted; the rest are separated by one blank line.

use crate::util::constants::SEGMENT_SEPARATOR;

/// Join the non-blank segments with a blank line between them.
pub fn compose(pretext: Option<&str>, issues: &str, posttext: Option<&str>) -> String {
    [pretext, Some(issues), posttext]
        .into_iter()
        .flatten()
        .map(str::trim)
        .filter(|segment| !segment.is_empty())
        .collect::<Vec<_>>()
        .join(SEGMENT_SEPARATOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_all_segments() {
        let out = compose(Some("Hi team"), "<issue1>x</issue1>", Some("Thanks"));
        assert_eq!(out, "Hi team\n\n<issue1>x</issue1>\n\nThanks");
    }

    #[test]
    fn test_absent_and_blank_segments_are_omitted() {
        assert_eq!(compose(None, "<issue1>x</issue1>", None), "<issue1>x</issue1>");
        assert_eq!(
            compose(Some("  \n"), "<issue1>x</issue1>", Some("Thanks\n")),
            "<issue1>x</issue1>\n\nThanks"
        );
        assert_eq!(compose(Some("Hi"), "", Some("Bye")), "Hi\n\nBye");
        assert_eq!(compose(None, "", None), "");
    }

    #[test]
    fn test_multiline_pretext_is_kept_intact() {
        let out = compose(Some("Line one\nLine two"), "<issue1>x</issue1>", None);
        assert_eq!(out, "Line one\nLine two\n\n<issue1>x</issue1>");
    }
}
