//! Output reconstruction.
//!
//! Renders repaired segments back into one string: text segments pass
//! through verbatim, code segments become blank-line-padded fenced
//! blocks. The final pass collapses oversized blank runs and trims the
//! document edges.

use crate::classify::LineLabel;
use crate::scan;
use crate::segment::Segment;

/// Output writer with a pre-allocated buffer.
struct FenceWriter {
    out: String,
}

impl FenceWriter {
    /// Fencing adds a few marker lines; input size plus slack covers it.
    fn with_capacity_for(input_len: usize) -> Self {
        Self {
            out: String::with_capacity(input_len + input_len / 4 + 16),
        }
    }

    fn push_line(&mut self, line: &str) {
        self.out.push_str(line);
        self.out.push('\n');
    }

    fn blank_line(&mut self) {
        self.out.push('\n');
    }

    fn fence_open(&mut self, tag: Option<&'static str>) {
        self.out.push_str("```");
        if let Some(tag) = tag {
            self.out.push_str(tag);
        }
        self.out.push('\n');
    }

    fn fence_close(&mut self) {
        self.out.push_str("```\n");
    }

    fn finish(self) -> String {
        collapse_and_trim(&self.out)
    }
}

/// Render segments into the final formatted string.
pub fn reconstruct(segments: &[Segment<'_>], input_len: usize) -> String {
    let mut writer = FenceWriter::with_capacity_for(input_len);
    for segment in segments {
        match segment.label {
            LineLabel::Text => {
                for line in &segment.lines {
                    writer.push_line(line);
                }
            }
            LineLabel::Code => {
                // A code segment of only blank lines came from spacing
                // around a listing; nothing to fence.
                if !segment.has_content() {
                    continue;
                }
                writer.blank_line();
                writer.fence_open(segment.language.map(|lang| lang.tag()));
                for line in trim_blank_edges(&segment.lines) {
                    writer.push_line(line);
                }
                writer.fence_close();
                writer.blank_line();
            }
        }
    }
    writer.finish()
}

/// Drop blank lines at the segment edges; interior blanks are content.
fn trim_blank_edges<'b, 'a>(lines: &'b [&'a str]) -> &'b [&'a str] {
    let start = lines
        .iter()
        .position(|line| !scan::is_blank(line))
        .unwrap_or(lines.len());
    let end = lines
        .iter()
        .rposition(|line| !scan::is_blank(line))
        .map_or(start, |i| i + 1);
    &lines[start..end]
}

/// Collapse runs of three or more blank lines down to exactly two, then
/// trim leading and trailing whitespace.
pub(crate) fn collapse_and_trim(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut blanks = 0usize;
    for line in text.split('\n') {
        if scan::is_blank(line) {
            blanks += 1;
            if blanks > 2 {
                continue;
            }
        } else {
            blanks = 0;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.trim().to_string()
}
