//! Segment building and repair.
//!
//! Groups the per-line labels into maximal same-label runs, then repairs
//! over-fragmentation: short prose interjections inside a listing are
//! folded into the surrounding code, and one-line code segments that
//! still read like prose are relabeled. Adjacent same-label segments are
//! coalesced, so the output strictly alternates.

use smallvec::SmallVec;

use crate::classify::{self, Classification, Lang, LineLabel};
use crate::scan;

/// A maximal run of consecutive lines sharing one resolved label.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment<'a> {
    pub label: LineLabel,
    /// The segment's lines, verbatim from the input.
    pub lines: Vec<&'a str>,
    /// Resolved language for code segments: majority vote over the
    /// per-line guesses. Always `None` for text segments.
    pub language: Option<Lang>,
}

impl Segment<'_> {
    /// True when at least one line is non-blank.
    pub fn has_content(&self) -> bool {
        self.lines.iter().any(|line| !scan::is_blank(line))
    }
}

/// Working segment carrying the raw per-line language guesses until the
/// repair pass settles segment boundaries.
#[derive(Debug)]
struct RawSegment<'a> {
    label: LineLabel,
    lines: Vec<&'a str>,
    guesses: SmallVec<[Lang; 8]>,
}

impl<'a> RawSegment<'a> {
    fn start(line: &'a str, cls: Classification) -> Self {
        let mut seg = Self {
            label: cls.label,
            lines: Vec::new(),
            guesses: SmallVec::new(),
        };
        seg.push(line, cls.language);
        seg
    }

    fn push(&mut self, line: &'a str, guess: Option<Lang>) {
        self.lines.push(line);
        if let Some(lang) = guess {
            self.guesses.push(lang);
        }
    }

    fn merge(&mut self, other: RawSegment<'a>) {
        self.lines.extend(other.lines);
        self.guesses.extend(other.guesses);
    }

    fn resolve(self) -> Segment<'a> {
        let language = match self.label {
            LineLabel::Code => classify::vote_language(self.guesses),
            LineLabel::Text => None,
        };
        Segment {
            label: self.label,
            lines: self.lines,
            language,
        }
    }
}

/// Build repaired segments from the classified line list.
pub fn build_segments<'a>(
    lines: &[&'a str],
    classifications: &[Classification],
) -> SmallVec<[Segment<'a>; 8]> {
    debug_assert_eq!(lines.len(), classifications.len());
    repair(group(lines, classifications))
        .into_iter()
        .map(RawSegment::resolve)
        .collect()
}

/// Pass 1: fold lines into maximal same-label runs.
fn group<'a>(lines: &[&'a str], classifications: &[Classification]) -> Vec<RawSegment<'a>> {
    let mut segments: Vec<RawSegment<'a>> = Vec::new();
    for (&line, &cls) in lines.iter().zip(classifications) {
        match segments.last_mut() {
            Some(open) if open.label == cls.label => open.push(line, cls.language),
            _ => segments.push(RawSegment::start(line, cls)),
        }
    }
    segments
}

/// Maximum length of a prose interjection that gets folded into the
/// surrounding listing.
const MAX_ABSORBED_TEXT_LINES: usize = 2;

/// Pass 2: repair over-fragmentation, judging each segment against its
/// pre-repair neighbors, and coalesce as labels change.
fn repair(input: Vec<RawSegment<'_>>) -> Vec<RawSegment<'_>> {
    let labels: Vec<LineLabel> = input.iter().map(|seg| seg.label).collect();
    let mut out: Vec<RawSegment<'_>> = Vec::with_capacity(input.len());

    for (idx, mut seg) in input.into_iter().enumerate() {
        let prev = idx.checked_sub(1).map(|i| labels[i]);
        let next = labels.get(idx + 1).copied();

        // A short remark inside a listing should not split the fence:
        // fold it into the preceding code segment.
        if seg.label == LineLabel::Text
            && seg.lines.len() <= MAX_ABSORBED_TEXT_LINES
            && prev == Some(LineLabel::Code)
            && next == Some(LineLabel::Code)
        {
            if let Some(open) = out.last_mut() {
                open.merge(seg);
                continue;
            }
        }

        // A one-line code segment that still reads like prose is a
        // heading, an aside, or bracket debris stranded between
        // paragraphs; give it back to the text flow.
        if seg.label == LineLabel::Code && seg.lines.len() == 1 {
            let line = seg.lines[0].trim();
            let reads_as_prose = classify::matches_text_signal(line);
            let stranded_debris = !line.bytes().any(|b| b.is_ascii_alphanumeric())
                && prev == Some(LineLabel::Text)
                && next == Some(LineLabel::Text);
            if reads_as_prose || stranded_debris {
                seg.label = LineLabel::Text;
                seg.guesses.clear();
            }
        }

        match out.last_mut() {
            Some(open) if open.label == seg.label => open.merge(seg),
            _ => out.push(seg),
        }
    }
    out
}
