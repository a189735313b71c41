//! Per-line classification.
//!
//! Deterministic signals decide most lines: the text table is consulted
//! first, then the code table. Lines matching neither are resolved by
//! scoring their neighbors, with ties falling to prose so ambiguous
//! content never gets fenced.

use smallvec::SmallVec;

use super::language::{self, Lang};
use super::rules;
use crate::scan;

/// Resolved label for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineLabel {
    /// Prose, emitted verbatim.
    Text,
    /// Source code, fenced on output.
    Code,
}

/// Classifier output for one line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classification {
    pub label: LineLabel,
    /// Language guess, present only for code lines that scored one.
    pub language: Option<Lang>,
}

/// Lines examined on each side when deterministic signals are silent.
const CONTEXT_LINES: usize = 3;

/// Classify one line given the full line list and its index.
pub fn classify_line(line: &str, all_lines: &[&str], index: usize) -> Classification {
    debug_assert!(index < all_lines.len());
    let trimmed = line.trim();

    if trimmed.is_empty() {
        return Classification {
            label: inherit_blank_label(all_lines, index),
            language: None,
        };
    }

    if rules::matches_text_signal(trimmed) {
        return text();
    }
    if rules::matches_code_signal(trimmed) {
        return code(all_lines, index);
    }

    let mut code_score = 0.0f32;
    let mut text_score = 0.0f32;
    let lo = index.saturating_sub(CONTEXT_LINES);
    let hi = (index + CONTEXT_LINES).min(all_lines.len() - 1);
    for i in lo..=hi {
        if i == index {
            continue;
        }
        let neighbor = all_lines[i].trim();
        if neighbor.is_empty() {
            continue;
        }
        if rules::matches_text_signal(neighbor) {
            text_score += 1.0;
        } else if rules::matches_code_signal(neighbor) {
            code_score += 1.0;
        }
    }
    if scan::structural_count(trimmed) > 0 {
        code_score += 0.5;
    }
    if rules::has_connective_word(trimmed) {
        text_score += 0.5;
    }

    // Ties resolve to prose.
    if code_score > text_score {
        code(all_lines, index)
    } else {
        text()
    }
}

/// Classify every line of the input.
pub(crate) fn classify_lines(all_lines: &[&str]) -> SmallVec<[Classification; 16]> {
    all_lines
        .iter()
        .enumerate()
        .map(|(index, line)| classify_line(line, all_lines, index))
        .collect()
}

#[inline]
fn text() -> Classification {
    Classification {
        label: LineLabel::Text,
        language: None,
    }
}

#[inline]
fn code(all_lines: &[&str], index: usize) -> Classification {
    Classification {
        label: LineLabel::Code,
        language: language::guess_line(all_lines, index),
    }
}

/// Blank lines take the label of an unambiguously-code neighbor so a
/// listing with interior spacing stays one segment; otherwise prose.
fn inherit_blank_label(all_lines: &[&str], index: usize) -> LineLabel {
    let prev = index.checked_sub(1).map(|i| all_lines[i]);
    let next = all_lines.get(index + 1).copied();
    if prev.is_some_and(is_unambiguous_code) || next.is_some_and(is_unambiguous_code) {
        LineLabel::Code
    } else {
        LineLabel::Text
    }
}

/// A neighbor counts as unambiguous code only when a code signal fires
/// and no text signal does; resolved labels are never consulted, so
/// classification stays order-independent.
fn is_unambiguous_code(line: &str) -> bool {
    let trimmed = line.trim();
    !trimmed.is_empty()
        && !rules::matches_text_signal(trimmed)
        && rules::matches_code_signal(trimmed)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn label_of(line: &str) -> LineLabel {
        classify_line(line, &[line], 0).label
    }

    #[test]
    fn test_prose_sentence() {
        assert_eq!(
            label_of("This function adds two numbers together."),
            LineLabel::Text
        );
    }

    #[test]
    fn test_const_declaration() {
        let got = classify_line("const x = 1;", &["const x = 1;"], 0);
        assert_eq!(got.label, LineLabel::Code);
        assert_eq!(got.language, Some(Lang::Javascript));
    }

    #[test]
    fn test_ambiguous_line_alone_is_text() {
        // No signals either way and no neighbors: tie resolves to prose.
        assert_eq!(label_of("x plus y"), LineLabel::Text);
    }

    #[test]
    fn test_ambiguous_line_in_code_context() {
        let lines = ["function add(a, b) {", "  return a + b;", "}"];
        let got = classify_line(lines[1], &lines, 1);
        assert_eq!(got.label, LineLabel::Code);
    }

    #[test]
    fn test_ambiguous_line_in_prose_context() {
        let lines = [
            "The following value matters.",
            "forty two",
            "It is explained below.",
        ];
        assert_eq!(classify_line(lines[1], &lines, 1).label, LineLabel::Text);
    }

    #[test]
    fn test_blank_inherits_from_code_neighbor() {
        let lines = ["const a = 1;", "", "const b = 2;"];
        assert_eq!(classify_line(lines[1], &lines, 1).label, LineLabel::Code);
    }

    #[test]
    fn test_blank_next_to_prose_stays_text() {
        let lines = ["A sentence ends here.", "", "Another one begins."];
        assert_eq!(classify_line(lines[1], &lines, 1).label, LineLabel::Text);
    }

    #[test]
    fn test_blank_between_prose_and_code_joins_code() {
        let lines = ["Step one: explain.", "", "const a = 1;"];
        assert_eq!(classify_line(lines[1], &lines, 1).label, LineLabel::Code);
    }

    #[test]
    fn test_structural_bonus_tips_the_scale() {
        // One code neighbor, one prose neighbor, and a `;` on the line:
        // 1.5 code vs 1.0 text resolves to code.
        let lines = ["const total = 0;", "total + step;", "The sum grows."];
        assert_eq!(classify_line(lines[1], &lines, 1).label, LineLabel::Code);
    }

    #[test]
    fn test_lone_bracket_is_code_at_this_stage() {
        // Segment repair may still fold it back into prose later.
        assert_eq!(label_of("}"), LineLabel::Code);
    }
}
