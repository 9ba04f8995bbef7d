// IssueTag - core/extractor.rs
//
// Line classifier for pasted build output. Each line is checked against an
// ordered list of rules: ignore rules (system paths) come first so they take
// precedence over the issue rules (diagnostic keywords, "path: message").
// Core layer: pure logic, no I/O.

use crate::util::constants;
use regex::Regex;
use std::borrow::Cow;
use std::collections::HashSet;
use std::sync::OnceLock;

/// Outcome of classifying a single line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Verdict {
    /// The line is an actionable diagnostic.
    Issue,
    /// The line is dropped.
    Noise,
}

/// How a rule inspects a line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Matcher {
    /// Line contains any of these fragments (case-sensitive).
    ContainsAny(Vec<String>),
    /// Line contains any of these fragments, ignoring case. Stored lowercase.
    ContainsAnyIgnoreCase(Vec<String>),
    /// Line starts with an absolute path and has a "location: message" separator.
    PathMessage,
}

impl Matcher {
    /// `lowered` must be `line.to_lowercase()`; it is computed once per line.
    fn matches(&self, line: &str, lowered: &str) -> bool {
        match self {
            Self::ContainsAny(fragments) => fragments.iter().any(|f| line.contains(f.as_str())),
            Self::ContainsAnyIgnoreCase(fragments) => {
                fragments.iter().any(|f| lowered.contains(f.as_str()))
            }
            Self::PathMessage => {
                line.starts_with(constants::PATH_PREFIX)
                    && line.contains(constants::PATH_MESSAGE_SEPARATOR)
            }
        }
    }
}

/// A named predicate with the verdict it imposes when it matches.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineRule {
    pub name: &'static str,
    pub verdict: Verdict,
    pub matcher: Matcher,
}

/// Result of running the extractor over a block of text.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Extraction {
    /// Unique issue lines in first-occurrence order, tags stripped.
    pub issues: Vec<String>,
    /// Non-blank lines that no issue rule accepted.
    pub noise_lines: usize,
    /// Issue lines dropped because an identical line came earlier.
    pub duplicate_lines: usize,
}

impl Extraction {
    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    pub fn len(&self) -> usize {
        self.issues.len()
    }

    /// Render the issues as numbered `<issueN>` tags separated by blank lines.
    pub fn render(&self) -> String {
        render_issues(&self.issues)
    }
}

/// Classifies lines and collects unique issues.
#[derive(Debug, Clone)]
pub struct IssueExtractor {
    rules: Vec<LineRule>,
}

impl Default for IssueExtractor {
    fn default() -> Self {
        Self::with_extra_rules(&[], &[])
    }
}

impl IssueExtractor {
    /// Build the default rule set, extended with user-supplied ignore
    /// fragments and keywords. Blank entries are skipped since an empty
    /// fragment would match every line.
    pub fn with_extra_rules(ignore_paths: &[String], keywords: &[String]) -> Self {
        let mut ignored: Vec<String> = constants::DEFAULT_IGNORED_PATH_FRAGMENTS
            .iter()
            .map(|s| s.to_string())
            .collect();
        ignored.extend(
            ignore_paths
                .iter()
                .filter(|s| !s.trim().is_empty())
                .cloned(),
        );

        let mut issue_keywords: Vec<String> = constants::DEFAULT_ISSUE_KEYWORDS
            .iter()
            .map(|s| s.to_string())
            .collect();
        issue_keywords.extend(
            keywords
                .iter()
                .filter(|s| !s.trim().is_empty())
                .map(|s| s.to_lowercase()),
        );

        let rules = vec![
            LineRule {
                name: "system-path",
                verdict: Verdict::Noise,
                matcher: Matcher::ContainsAny(ignored),
            },
            LineRule {
                name: "diagnostic-keyword",
                verdict: Verdict::Issue,
                matcher: Matcher::ContainsAnyIgnoreCase(issue_keywords),
            },
            LineRule {
                name: "path-message",
                verdict: Verdict::Issue,
                matcher: Matcher::PathMessage,
            },
        ];

        Self { rules }
    }

    /// The ordered rule list.
    pub fn rules(&self) -> &[LineRule] {
        &self.rules
    }

    /// First rule matching the (already trimmed) line, if any.
    pub fn matching_rule(&self, line: &str) -> Option<&LineRule> {
        let lowered = line.to_lowercase();
        self.rules
            .iter()
            .find(|rule| rule.matcher.matches(line, &lowered))
    }

    /// Classify a single trimmed line. Lines no rule matches are noise.
    pub fn classify(&self, line: &str) -> Verdict {
        if line.is_empty() {
            return Verdict::Noise;
        }
        self.matching_rule(line)
            .map_or(Verdict::Noise, |rule| rule.verdict)
    }

    /// Run the extractor over pasted text.
    ///
    /// Wrapper tags are removed before a line is classified, so feeding the
    /// rendered output back in yields the same issues in the same order.
    pub fn extract_issues(&self, text: &str) -> Extraction {
        let mut extraction = Extraction::default();
        let mut seen: HashSet<String> = HashSet::new();

        for raw in text.lines() {
            let trimmed = raw.trim();
            if trimmed.is_empty() {
                continue;
            }

            let stripped = strip_issue_tags(trimmed);
            let line = stripped.trim();
            if line.is_empty() {
                continue;
            }

            match self.classify(line) {
                Verdict::Noise => extraction.noise_lines += 1,
                Verdict::Issue => {
                    if seen.insert(line.to_string()) {
                        extraction.issues.push(line.to_string());
                    } else {
                        extraction.duplicate_lines += 1;
                    }
                }
            }
        }

        tracing::debug!(
            issues = extraction.issues.len(),
            noise = extraction.noise_lines,
            duplicates = extraction.duplicate_lines,
            "Extraction complete"
        );

        extraction
    }
}

fn issue_tag_regex() -> &'static Regex {
    static TAG: OnceLock<Regex> = OnceLock::new();
    TAG.get_or_init(|| {
        Regex::new(constants::ISSUE_TAG_PATTERN).expect("ISSUE_TAG_PATTERN is a valid regex")
    })
}

/// Remove `<issueN>` / `</issueN>` wrapper tags left by an earlier conversion.
///
/// Repeats until no tag remains: removing an inner tag can join the text
/// around it into a new one (`<iss<issue>ue>`).
pub fn strip_issue_tags(line: &str) -> Cow<'_, str> {
    let tag = issue_tag_regex();
    let mut stripped = tag.replace_all(line, "");
    while tag.is_match(&stripped) {
        stripped = Cow::Owned(tag.replace_all(&stripped, "").into_owned());
    }
    stripped
}

/// Render issue lines as `<issueN>line</issueN>`, numbered from 1.
pub fn render_issues(issues: &[String]) -> String {
    issues
        .iter()
        .enumerate()
        .map(|(i, issue)| {
            let n = i + 1;
            format!("<issue{n}>{issue}</issue{n}>")
        })
        .collect::<Vec<_>>()
        .join(constants::SEGMENT_SEPARATOR)
}

/// Extract and render issues with the default rule set.
pub fn extract(text: &str) -> String {
    IssueExtractor::default().extract_issues(text).render()
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "/Users/x/Foo.swift:10: error: cannot find type 'Bar'\n\
                          /Applications/Xcode.app/... error: ignored\n\
                          warning: something odd";

    #[test]
    fn test_sample_build_output() {
        let expected = "<issue1>/Users/x/Foo.swift:10: error: cannot find type 'Bar'</issue1>\n\
                        \n\
                        <issue2>warning: something odd</issue2>";
        assert_eq!(extract(SAMPLE), expected);
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert_eq!(extract(""), "");
        assert_eq!(extract("   \n\t\n  "), "");
    }

    #[test]
    fn test_no_matches_gives_empty_output() {
        let text = "Build target App\nCompiling Foo.swift\nLinking";
        assert_eq!(extract(text), "");
        let extraction = IssueExtractor::default().extract_issues(text);
        assert_eq!(extraction.noise_lines, 3);
    }

    #[test]
    fn test_duplicate_keeps_first_occurrence_number() {
        let text = "warning: a\nerror: b\nwarning: a\nerror: b\nwarning: c";
        let extraction = IssueExtractor::default().extract_issues(text);
        assert_eq!(extraction.issues, vec!["warning: a", "error: b", "warning: c"]);
        assert_eq!(extraction.duplicate_lines, 2);
        assert_eq!(
            extraction.render(),
            "<issue1>warning: a</issue1>\n\n<issue2>error: b</issue2>\n\n<issue3>warning: c</issue3>"
        );
    }

    #[test]
    fn test_system_path_beats_keyword() {
        let ex = IssueExtractor::default();
        assert_eq!(
            ex.classify("/Library/Developer/Foo.h:3: error: bad"),
            Verdict::Noise
        );
        assert_eq!(ex.classify("in Xcode.app: fatal error: crash"), Verdict::Noise);
        assert_eq!(
            ex.matching_rule("/Applications/Tool: warning: x").map(|r| r.name),
            Some("system-path")
        );
    }

    #[test]
    fn test_keywords_ignore_case() {
        let ex = IssueExtractor::default();
        assert_eq!(ex.classify("ERROR: upper case"), Verdict::Issue);
        assert_eq!(ex.classify("Command CompileSwift FAILED"), Verdict::Issue);
        assert_eq!(ex.classify("No Such Module 'Alamofire'"), Verdict::Issue);
        assert_eq!(ex.classify("Undefined symbol: _main"), Verdict::Issue);
        assert_eq!(ex.classify("everything fine"), Verdict::Noise);
    }

    #[test]
    fn test_path_message_heuristic() {
        let ex = IssueExtractor::default();
        assert_eq!(
            ex.classify("/Users/me/App/View.swift:42:7: Variable never used"),
            Verdict::Issue
        );
        // Path without a "colon space" separator.
        assert_eq!(ex.classify("/Users/me/App/View.swift"), Verdict::Noise);
        // Separator without a leading path.
        assert_eq!(ex.classify("note: see declaration"), Verdict::Noise);
    }

    #[test]
    fn test_existing_tags_are_stripped() {
        let text = "<issue7>warning: stale</issue7>\n<issue>error: bare tag</issue>";
        let extraction = IssueExtractor::default().extract_issues(text);
        assert_eq!(extraction.issues, vec!["warning: stale", "error: bare tag"]);
    }

    #[test]
    fn test_extract_is_idempotent() {
        let text = "/Users/me/A.swift:1:1: Initialization of 'x' was never used\n\
                    Build step\n\
                    warning: deprecated API\n\
                    /Users/me/A.swift:1:1: Initialization of 'x' was never used\n\
                    ld: error: undefined symbol: _foo";
        let ex = IssueExtractor::default();
        let once = ex.extract_issues(text);
        let twice = ex.extract_issues(&once.render());
        assert_eq!(once.issues, twice.issues);
        assert_eq!(once.render(), twice.render());
        assert_eq!(twice.noise_lines, 0);
    }

    #[test]
    fn test_nested_tags_are_fully_stripped() {
        assert_eq!(strip_issue_tags("error: <iss<issue>ue> x"), "error:  x");
        assert_eq!(strip_issue_tags("<<issue>/issue3>warning: y"), "warning: y");

        let once = extract("error: <iss<issue>ue> dangling");
        assert_eq!(once, "<issue1>error:  dangling</issue1>");
        assert_eq!(extract(&once), once);
    }

    #[test]
    fn test_lines_are_trimmed() {
        let text = "    warning: indented   \n\twarning: indented";
        let extraction = IssueExtractor::default().extract_issues(text);
        assert_eq!(extraction.issues, vec!["warning: indented"]);
        assert_eq!(extraction.duplicate_lines, 1);
    }

    #[test]
    fn test_tag_only_line_is_skipped() {
        let extraction = IssueExtractor::default().extract_issues("<issue1></issue1>");
        assert!(extraction.is_empty());
        assert_eq!(extraction.noise_lines, 0);
    }

    #[test]
    fn test_extra_rules_extend_defaults() {
        let ex = IssueExtractor::with_extra_rules(
            &["/opt/toolchains/".to_string(), "  ".to_string()],
            &["Linker Command".to_string(), String::new()],
        );
        assert_eq!(ex.classify("linker command exited"), Verdict::Issue);
        assert_eq!(
            ex.classify("/opt/toolchains/swift/lib: error: nope"),
            Verdict::Noise
        );
        // Defaults still apply, and blank entries did not turn into match-all.
        assert_eq!(ex.classify("warning: x"), Verdict::Issue);
        assert_eq!(ex.classify("plain text"), Verdict::Noise);
    }

    #[test]
    fn test_rules_are_ordered_ignore_first() {
        let ex = IssueExtractor::default();
        let verdicts: Vec<Verdict> = ex.rules().iter().map(|r| r.verdict).collect();
        assert_eq!(verdicts, vec![Verdict::Noise, Verdict::Issue, Verdict::Issue]);
    }
}
