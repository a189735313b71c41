//! refence: restore fenced code blocks in plain text
//!
//! LLM responses and pasted blog content often arrive with their code
//! fences stripped: listings flattened into prose paragraphs. This crate
//! re-segments such text, deciding line by line whether it reads as
//! prose or source code, and wraps the code runs back into fenced
//! blocks carrying a best-guess language tag.
//!
//! # Design Principles
//! - Line-oriented: per-line signals plus a small context window, no grammar
//! - Conservative: ties resolve to prose, so ambiguous content is never fenced
//! - Total: every input string yields an output string, nothing errors
//! - Idempotent: already-fenced input is repaired, never re-segmented

pub mod classify;
pub mod cleanup;
pub mod rebuild;
pub mod scan;
pub mod segment;

// Re-export primary types
pub use classify::{classify_line, Classification, Lang, LineLabel};
pub use cleanup::repair_fences;
pub use rebuild::reconstruct;
pub use segment::{build_segments, Segment};

/// Format one paragraph of raw text, fencing any code-like runs.
///
/// This is the primary API. Input that already contains a fence marker
/// is passed through the lightweight cleanup pass instead of being
/// re-segmented, so running the formatter twice changes nothing.
///
/// # Example
/// ```
/// let out = refence::format_content("function add(a, b) {\n  return a + b;\n}");
/// assert!(out.starts_with("```javascript"));
/// assert!(out.ends_with("```"));
/// ```
pub fn format_content(input: &str) -> String {
    if input.trim().is_empty() {
        return String::new();
    }

    let lines = scan::split_lines(input);
    if lines.iter().any(|line| scan::is_fence_line(line)) {
        return cleanup::repair_fences(&lines);
    }

    let classifications = classify::classify_lines(&lines);
    let segments = segment::build_segments(&lines, &classifications);
    rebuild::reconstruct(&segments, input.len())
}

/// Format a sequence of paragraphs element-wise.
///
/// Order and count are preserved: the result always has exactly one
/// entry per input paragraph.
pub fn format_paragraphs<S: AsRef<str>>(paragraphs: &[S]) -> Vec<String> {
    paragraphs
        .iter()
        .map(|paragraph| format_content(paragraph.as_ref()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fence_count(text: &str) -> usize {
        scan::split_lines(text)
            .iter()
            .filter(|line| scan::is_fence_line(line))
            .count()
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(format_content(""), "");
    }

    #[test]
    fn test_only_whitespace() {
        assert_eq!(format_content("   \n\n   "), "");
    }

    #[test]
    fn test_single_sentence_unchanged() {
        let input = "This function adds two numbers together.";
        assert_eq!(format_content(input), input);
    }

    #[test]
    fn test_prose_paragraph_gets_no_fences() {
        let input = "The formatter walks every line of the paragraph.\n\
                     It keeps prose untouched and only wraps real code.\n\
                     Nothing here should ever be fenced!";
        let out = format_content(input);
        assert_eq!(fence_count(&out), 0);
        assert_eq!(out, input);
    }

    #[test]
    fn test_single_declaration_is_fenced_as_javascript() {
        assert_eq!(
            format_content("const x = 1;"),
            "```javascript\nconst x = 1;\n```"
        );
    }

    #[test]
    fn test_function_block_is_fenced() {
        let out = format_content("function add(a, b) {\n  return a + b;\n}");
        assert_eq!(
            out,
            "```javascript\nfunction add(a, b) {\n  return a + b;\n}\n```"
        );
    }

    #[test]
    fn test_already_fenced_input_unchanged() {
        let input = "```python\nprint(1)\n```";
        assert_eq!(format_content(input), input);
    }

    #[test]
    fn test_mixed_prose_and_code() {
        let input = "Step one: explain.\n\nconst a = 1;\nconst b = 2;\n\nStep two: explain more.";
        let out = format_content(input);
        assert_eq!(
            out,
            "Step one: explain.\n\n```javascript\nconst a = 1;\nconst b = 2;\n```\n\nStep two: explain more."
        );
    }

    #[test]
    fn test_stray_bracket_in_prose_is_not_fenced() {
        let input = "The first paragraph explains the setup in detail.\n\
                     }\n\
                     The second paragraph continues the explanation afterwards.";
        let out = format_content(input);
        assert_eq!(fence_count(&out), 0);
        assert!(out.contains('}'));
    }

    #[test]
    fn test_unclosed_fence_is_repaired() {
        assert_eq!(format_content("```js\nlet x = 1;"), "```js\nlet x = 1;\n```");
    }

    #[test]
    fn test_no_lines_lost_when_fencing() {
        let input =
            "Here is the handler we ship.\n\nfunction handler(req, res) {\n  res.end();\n}";
        let out = format_content(input);
        for line in [
            "Here is the handler we ship.",
            "function handler(req, res) {",
            "  res.end();",
            "}",
        ] {
            assert!(out.contains(line), "missing {line:?} in {out:?}");
        }
    }

    #[test]
    fn test_format_content_is_idempotent() {
        for input in [
            "This stays prose.",
            "const x = 1;",
            "Step one: explain.\n\nconst a = 1;\nconst b = 2;\n\nStep two: explain more.",
            "```python\nprint(1)\n```",
        ] {
            let once = format_content(input);
            let twice = format_content(&once);
            assert_eq!(twice, once, "not idempotent for {input:?}");
        }
    }

    #[test]
    fn test_format_paragraphs_preserves_order_and_count() {
        let paragraphs = vec![
            "First paragraph, plain prose here.".to_string(),
            "const x = 1;".to_string(),
            String::new(),
        ];
        let out = format_paragraphs(&paragraphs);
        assert_eq!(out.len(), 3);
        assert_eq!(out[0], paragraphs[0]);
        assert!(out[1].starts_with("```javascript"));
        assert_eq!(out[2], "");
    }

    #[test]
    fn test_crlf_input_is_normalized() {
        let out = format_content("const a = 1;\r\nconst b = 2;\r\n");
        assert_eq!(out, "```javascript\nconst a = 1;\nconst b = 2;\n```");
    }

    #[test]
    fn test_blank_runs_are_collapsed() {
        let input =
            "One complete sentence sits here.\n\n\n\n\nAnother complete sentence follows it.";
        let out = format_content(input);
        assert_eq!(
            out,
            "One complete sentence sits here.\n\n\nAnother complete sentence follows it."
        );
    }
}
