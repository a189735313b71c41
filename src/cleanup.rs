//! Lightweight repair for input that already carries fence markers.
//!
//! Already-fenced text is never re-classified; doing so would risk
//! double-fencing content that an upstream model got right. This pass
//! only fixes the common corruption shapes: duplicated fence openers,
//! doubled info tags, duplicated lines inside a fence, and a fence left
//! open at end of input.

use std::borrow::Cow;

use crate::rebuild;
use crate::scan::{self, FenceLine};

/// Fence tracking state while scanning lines.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum FenceScan {
    Outside,
    Inside,
}

/// Repair fence corruption without re-running classification.
pub fn repair_fences(lines: &[&str]) -> String {
    let mut out: Vec<Cow<'_, str>> = Vec::with_capacity(lines.len() + 1);
    let mut state = FenceScan::Outside;
    // Tag of the current opener, valid while `at_opener` says the opener
    // is still the last emitted line (the duplicate-opener window).
    let mut open_tag = String::new();
    let mut at_opener = false;

    for &line in lines {
        match state {
            FenceScan::Outside => match FenceLine::parse(line) {
                Some(fence) => {
                    let tag = collapse_doubled(fence.info);
                    out.push(render_marker(&fence, tag, line));
                    open_tag.clear();
                    open_tag.push_str(tag);
                    state = FenceScan::Inside;
                    at_opener = true;
                }
                None => out.push(Cow::Borrowed(collapse_doubled(line))),
            },
            FenceScan::Inside => match FenceLine::parse(line) {
                Some(fence) if at_opener && !fence.info.is_empty() => {
                    let tag = collapse_doubled(fence.info);
                    if open_tag.is_empty() {
                        // Bare opener followed by a tagged one: keep the
                        // tagged marker.
                        *out.last_mut().expect("opener was emitted") =
                            render_marker(&fence, tag, line);
                        open_tag.push_str(tag);
                    } else if open_tag == tag {
                        // Opener repeated verbatim: drop the duplicate.
                    } else {
                        out.push(Cow::Borrowed(line));
                        state = FenceScan::Outside;
                        at_opener = false;
                    }
                }
                Some(_) => {
                    out.push(Cow::Borrowed(line));
                    state = FenceScan::Outside;
                    at_opener = false;
                }
                None => {
                    let duplicate = !scan::is_blank(line)
                        && out.last().is_some_and(|prev| prev.as_ref() == line);
                    if !duplicate {
                        out.push(Cow::Borrowed(line));
                    }
                    at_opener = false;
                }
            },
        }
    }

    // A fence still open at end of input is closed, not reported.
    if state == FenceScan::Inside {
        out.push(Cow::Borrowed("```"));
    }

    let mut joined = String::with_capacity(lines.iter().map(|l| l.len() + 1).sum::<usize>() + 4);
    for (i, line) in out.iter().enumerate() {
        if i > 0 {
            joined.push('\n');
        }
        joined.push_str(line);
    }
    rebuild::collapse_and_trim(&joined)
}

/// Collapse a text that is exactly one word immediately repeated
/// (`javascript javascript`) down to the word. Anything else passes
/// through, so doubled words inside longer prose are left alone.
fn collapse_doubled(text: &str) -> &str {
    let mut tokens = text.split_whitespace();
    match (tokens.next(), tokens.next(), tokens.next()) {
        (Some(first), Some(second), None) if first == second => first,
        _ => text,
    }
}

/// Re-render a fence marker line when its info string changed.
fn render_marker<'a>(fence: &FenceLine<'_>, tag: &str, original: &'a str) -> Cow<'a, str> {
    if tag == fence.info {
        return Cow::Borrowed(original);
    }
    let mut line = String::with_capacity(fence.indent + fence.run + tag.len());
    for _ in 0..fence.indent {
        line.push(' ');
    }
    for _ in 0..fence.run {
        line.push(fence.marker as char);
    }
    line.push_str(tag);
    Cow::Owned(line)
}
