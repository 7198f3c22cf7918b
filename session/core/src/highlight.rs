//! Output Highlighter
//!
//! Pure classification of captured command output, one line at a time.
//!
//! Each non-empty line goes through two independent passes:
//!
//! 1. **Classification**: an ordered rule list assigns a structural
//!    [`LineTag`] (first match wins), then content scans pick an
//!    [`Emphasis`] (every rule is checked, the last match wins, so error
//!    vocabulary beats success vocabulary).
//! 2. **Token decoration**: the line is split into [`Token`]s so paths and
//!    numbers can be styled. Concatenating the token text always gives back
//!    the original line.
//!
//! The result is structured data, not escape codes; the renderer decides
//! what a tag or token kind looks like.

use std::sync::OnceLock;

use regex::Regex;
use serde::{Deserialize, Serialize};

/// Structural category of a line
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineTag {
    /// `ls -l` entry for a directory
    Directory,
    /// `ls -l` entry with owner execute permission
    Executable,
    /// `ls -l` entry for a regular file
    File,
    /// Anything else
    Plain,
}

/// Visual emphasis picked from the line's vocabulary
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Emphasis {
    /// No status vocabulary
    Normal,
    /// Mentions success, completion or an OK status
    Success,
    /// Mentions an error, failure or denial
    Error,
}

/// Kind of a decorated token
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TokenKind {
    /// Undecorated text
    Text,
    /// Absolute, relative (`./`) or home (`~user`) path
    Path,
    /// Integer or decimal number
    Number,
}

/// A run of text with one decoration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Token {
    /// Decoration
    pub kind: TokenKind,
    /// Exact slice of the source line
    pub text: String,
}

impl Token {
    fn new(kind: TokenKind, text: &str) -> Self {
        Self {
            kind,
            text: text.to_string(),
        }
    }
}

/// One classified and decorated line
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HighlightedLine {
    /// Structural category
    pub tag: LineTag,
    /// Status emphasis
    pub emphasis: Emphasis,
    /// Empty for an empty line
    pub tokens: Vec<Token>,
}

impl HighlightedLine {
    /// The undecorated line text
    #[must_use]
    pub fn text(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    /// Whether this is a pass-through empty line
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }
}

struct LineRule {
    pattern: Regex,
    tag: LineTag,
}

struct EmphasisRule {
    pattern: Regex,
    emphasis: Emphasis,
}

static LINE_RULES: OnceLock<Vec<LineRule>> = OnceLock::new();
static EMPHASIS_RULES: OnceLock<Vec<EmphasisRule>> = OnceLock::new();
static PATH_REGEX: OnceLock<Regex> = OnceLock::new();
static NUMBER_REGEX: OnceLock<Regex> = OnceLock::new();

fn line_rules() -> &'static [LineRule] {
    LINE_RULES.get_or_init(|| {
        // Order matters: `-rwx` must be tried before `-rw`.
        [
            (r"^d[rwx-]{9}", LineTag::Directory),
            (r"^-rwx", LineTag::Executable),
            (r"^-rw", LineTag::File),
        ]
        .into_iter()
        .map(|(pattern, tag)| LineRule {
            pattern: Regex::new(pattern).expect("Invalid line rule regex"),
            tag,
        })
        .collect()
    })
}

fn emphasis_rules() -> &'static [EmphasisRule] {
    EMPHASIS_RULES.get_or_init(|| {
        // Evaluated in order, last match wins.
        [
            (r"(?i)(success|ok|done|complete)", Emphasis::Success),
            (r"(?i)(error|failed|fatal|exception)", Emphasis::Error),
        ]
        .into_iter()
        .map(|(pattern, emphasis)| EmphasisRule {
            pattern: Regex::new(pattern).expect("Invalid emphasis rule regex"),
            emphasis,
        })
        .collect()
    })
}

fn path_regex() -> &'static Regex {
    PATH_REGEX
        .get_or_init(|| Regex::new(r"(/[^\s]+|\./[^\s]+|~\w+)").expect("Invalid path regex"))
}

fn number_regex() -> &'static Regex {
    NUMBER_REGEX.get_or_init(|| Regex::new(r"\b\d+(?:\.\d+)?\b").expect("Invalid number regex"))
}

/// Structural tag of a line
#[must_use]
pub fn classify_line(line: &str) -> LineTag {
    line_rules()
        .iter()
        .find(|rule| rule.pattern.is_match(line))
        .map_or(LineTag::Plain, |rule| rule.tag)
}

/// Emphasis of a line from its vocabulary
#[must_use]
pub fn emphasis_for(line: &str) -> Emphasis {
    emphasis_rules()
        .iter()
        .filter(|rule| rule.pattern.is_match(line))
        .last()
        .map_or(Emphasis::Normal, |rule| rule.emphasis)
}

/// Split a line into text, path and number tokens
///
/// Paths are found first; digits inside a path stay part of it.
#[must_use]
pub fn decorate_tokens(line: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut cursor = 0;

    for path in path_regex().find_iter(line) {
        push_numbers(&line[cursor..path.start()], &mut tokens);
        tokens.push(Token::new(TokenKind::Path, path.as_str()));
        cursor = path.end();
    }
    push_numbers(&line[cursor..], &mut tokens);

    tokens
}

fn push_numbers(segment: &str, tokens: &mut Vec<Token>) {
    let mut cursor = 0;
    for number in number_regex().find_iter(segment) {
        if number.start() > cursor {
            tokens.push(Token::new(TokenKind::Text, &segment[cursor..number.start()]));
        }
        tokens.push(Token::new(TokenKind::Number, number.as_str()));
        cursor = number.end();
    }
    if cursor < segment.len() {
        tokens.push(Token::new(TokenKind::Text, &segment[cursor..]));
    }
}

/// Classify and decorate a single line
#[must_use]
pub fn highlight_line(line: &str) -> HighlightedLine {
    if line.is_empty() {
        return HighlightedLine {
            tag: LineTag::Plain,
            emphasis: Emphasis::Normal,
            tokens: Vec::new(),
        };
    }

    HighlightedLine {
        tag: classify_line(line),
        emphasis: emphasis_for(line),
        tokens: decorate_tokens(line),
    }
}

/// Classify and decorate every line of `text`
#[must_use]
pub fn highlight(text: &str) -> Vec<HighlightedLine> {
    text.split('\n').map(highlight_line).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_classify_directory() {
        assert_eq!(
            classify_line("drwxr-xr-x  8 user user  4096 Jan 15 10:30 ."),
            LineTag::Directory
        );
    }

    #[test]
    fn test_classify_executable_before_file() {
        assert_eq!(classify_line("-rwxr-xr-x 1 u u 10 build.sh"), LineTag::Executable);
        assert_eq!(classify_line("-rw-r--r-- 1 u u 10 notes.txt"), LineTag::File);
    }

    #[test]
    fn test_classify_plain() {
        assert_eq!(classify_line("total 48"), LineTag::Plain);
        assert_eq!(classify_line("  drwxr-xr-x indented"), LineTag::Plain);
        // Short permission strings are not directories
        assert_eq!(classify_line("drwx"), LineTag::Plain);
    }

    #[test]
    fn test_classification_is_idempotent() {
        for line in ["drwxr-xr-x x", "-rwx", "-rw-", "hello", "Error: boom"] {
            assert_eq!(classify_line(line), classify_line(line));
            assert_eq!(emphasis_for(line), emphasis_for(line));
        }
    }

    #[test]
    fn test_emphasis_vocabulary() {
        assert_eq!(emphasis_for("FATAL: disk gone"), Emphasis::Error);
        assert_eq!(emphasis_for("Build Complete"), Emphasis::Success);
        assert_eq!(emphasis_for("nothing to see"), Emphasis::Normal);
    }

    #[test]
    fn test_error_emphasis_wins_over_success() {
        assert_eq!(emphasis_for("done with errors"), Emphasis::Error);
        assert_eq!(emphasis_for("success? no, it failed"), Emphasis::Error);
    }

    #[test]
    fn test_emphasis_independent_of_tag() {
        let line = highlight_line("-rw-r--r-- 1 u u 10 error.log");
        assert_eq!(line.tag, LineTag::File);
        assert_eq!(line.emphasis, Emphasis::Error);
    }

    #[test]
    fn test_decorate_paths_and_numbers() {
        let tokens = decorate_tokens("copied 3 files to /tmp/out2 and ~home");
        assert_eq!(
            tokens,
            vec![
                Token::new(TokenKind::Text, "copied "),
                Token::new(TokenKind::Number, "3"),
                Token::new(TokenKind::Text, " files to "),
                Token::new(TokenKind::Path, "/tmp/out2"),
                Token::new(TokenKind::Text, " and "),
                Token::new(TokenKind::Path, "~home"),
            ]
        );
    }

    #[test]
    fn test_decorate_relative_path() {
        let tokens = decorate_tokens("run ./build.sh now");
        assert_eq!(tokens[1], Token::new(TokenKind::Path, "./build.sh"));
    }

    #[test]
    fn test_decimal_is_one_number() {
        let tokens = decorate_tokens("cpu 2.5");
        assert_eq!(tokens[1], Token::new(TokenKind::Number, "2.5"));
    }

    #[test]
    fn test_digits_inside_words_are_text() {
        let tokens = decorate_tokens("file1.txt");
        assert_eq!(tokens, vec![Token::new(TokenKind::Text, "file1.txt")]);
    }

    #[test]
    fn test_decoration_preserves_text() {
        let samples = [
            "drwxr-xr-x 18 user user 4096 Jan 10 09:15 ..",
            "see /var/log/syslog:42 for 3 errors",
            "~root ./a /b 1 2 3",
            "plain words only",
        ];
        for sample in samples {
            assert_eq!(highlight_line(sample).text(), sample);
        }
    }

    #[test]
    fn test_empty_lines_pass_through() {
        let lines = highlight("one\n\ntwo\n");
        assert_eq!(lines.len(), 4);
        assert!(lines[1].is_empty());
        assert!(lines[3].is_empty());
        assert_eq!(lines[1].tag, LineTag::Plain);
        assert_eq!(lines[1].emphasis, Emphasis::Normal);
    }

    #[test]
    fn test_highlight_listing() {
        let listing = "total 48\ndrwxr-xr-x  8 user user  4096 Jan 15 10:30 .\n-rw-r--r--  1 user user  1024 Jan 15 10:25 file.txt";
        let tags: Vec<LineTag> = highlight(listing).iter().map(|l| l.tag).collect();
        assert_eq!(tags, vec![LineTag::Plain, LineTag::Directory, LineTag::File]);
    }
}
