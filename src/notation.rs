//! Splits an answer into plain-text and math spans for renderers.
//!
//! The answer stored in the history is never rewritten; this is an optional
//! view a front-end can use to render math spans separately from prose.

use std::sync::OnceLock;

use regex::Regex;
use serde::Serialize;

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", content = "text", rename_all = "snake_case")]
pub enum Segment {
    Plain(String),
    /// `$...$` or `\(...\)`
    Inline(String),
    /// `$$...$$` or `\[...\]`
    Display(String),
    /// bare `[...]`, which models sometimes emit instead of `\[...\]`
    Bracket(String),
}

fn math_pattern() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        // Alternation is leftmost-first: `$$` must precede `$`, `\[` precede `[`.
        Regex::new(
            r"(?s)\$\$(?P<display>.*?)\$\$|\\\[(?P<tex_display>.*?)\\\]|\\\((?P<tex_inline>.*?)\\\)|\$(?P<inline>[^$]+?)\$|\[(?P<bracket>.*?)\]",
        )
        .expect("math segment regex should compile")
    })
}

fn clean(text: &str) -> String {
    text.replace("\\ ", " ").replace('\n', " ").trim().to_string()
}

fn push_plain(segments: &mut Vec<Segment>, text: &str) {
    let cleaned = clean(text);
    if !cleaned.is_empty() {
        segments.push(Segment::Plain(cleaned));
    }
}

pub fn segment(text: &str) -> Vec<Segment> {
    let mut segments = Vec::new();
    let mut last = 0;

    for caps in math_pattern().captures_iter(text) {
        let Some(whole) = caps.get(0) else {
            continue;
        };

        let body = |name: &str| caps.name(name).map(|m| clean(m.as_str()));
        let span = if let Some(b) = body("display").or_else(|| body("tex_display")) {
            Segment::Display(b)
        } else if let Some(b) = body("tex_inline").or_else(|| body("inline")) {
            Segment::Inline(b)
        } else if let Some(b) = body("bracket") {
            Segment::Bracket(b)
        } else {
            continue;
        };

        // An empty span stays in the surrounding prose, delimiters included.
        if span.is_empty_math() {
            continue;
        }

        push_plain(&mut segments, &text[last..whole.start()]);
        segments.push(span);
        last = whole.end();
    }

    push_plain(&mut segments, &text[last..]);
    segments
}

impl Segment {
    fn is_empty_math(&self) -> bool {
        match self {
            Segment::Plain(_) => false,
            Segment::Inline(b) | Segment::Display(b) | Segment::Bracket(b) => b.is_empty(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_text_is_a_single_segment() {
        assert_eq!(
            segment("No math here.\nJust prose."),
            vec![Segment::Plain("No math here. Just prose.".to_string())]
        );
    }

    #[test]
    fn inline_and_display_math_are_separated() {
        let segments = segment("The mean is $np$ and\n$$\n\\sigma^2 = np(1-p)\n$$\nfor a binomial.");

        assert_eq!(
            segments,
            vec![
                Segment::Plain("The mean is".to_string()),
                Segment::Inline("np".to_string()),
                Segment::Plain("and".to_string()),
                Segment::Display("\\sigma^2 = np(1-p)".to_string()),
                Segment::Plain("for a binomial.".to_string()),
            ]
        );
    }

    #[test]
    fn latex_bracket_delimiters_are_recognised() {
        let segments = segment("\\[ \\chi^2 = \\frac{(n-1)s^2}{\\sigma_0^2} \\] with \\(n\\) samples");

        assert_eq!(
            segments,
            vec![
                Segment::Display("\\chi^2 = \\frac{(n-1)s^2}{\\sigma_0^2}".to_string()),
                Segment::Plain("with".to_string()),
                Segment::Inline("n".to_string()),
                Segment::Plain("samples".to_string()),
            ]
        );
    }

    #[test]
    fn bare_brackets_are_kept_distinct() {
        assert_eq!(
            segment("p lies in [0, 1]"),
            vec![
                Segment::Plain("p lies in".to_string()),
                Segment::Bracket("0, 1".to_string()),
            ]
        );
    }

    #[test]
    fn escaped_spaces_are_normalised() {
        assert_eq!(
            segment("$a\\ b$"),
            vec![Segment::Inline("a b".to_string())]
        );
    }

    #[test]
    fn unmatched_dollar_stays_plain() {
        assert_eq!(
            segment("costs $5"),
            vec![Segment::Plain("costs $5".to_string())]
        );
    }

    #[test]
    fn segments_serialise_with_kind_tag() {
        let value = serde_json::to_value(Segment::Inline("x".to_string())).unwrap();
        assert_eq!(value, serde_json::json!({ "kind": "inline", "text": "x" }));
    }

    #[test]
    fn unmatched_delimiters_stay_in_prose() {
        assert_eq!(segment("see $$x"), vec![Segment::Plain("see $$x".to_string())]);
        assert_eq!(segment("[ ]"), vec![Segment::Plain("[ ]".to_string())]);
    }

    #[test]
    fn empty_math_spans_are_not_emitted() {
        assert_eq!(
            segment("a $$ $$ b and [] c"),
            vec![Segment::Plain("a $$ $$ b and [] c".to_string())]
        );
        assert_eq!(
            segment("empty $$$$ then $x$"),
            vec![
                Segment::Plain("empty $$$$ then".to_string()),
                Segment::Inline("x".to_string()),
            ]
        );
    }
}
