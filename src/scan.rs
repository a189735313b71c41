//! Line splitting and byte-scan helpers shared by the pipeline stages.
//!
//! All stages are line-oriented; this module owns the one place where the
//! input is split and the small byte-counting queries the heuristics ask
//! over and over.

use memchr::{memchr2, memchr3, memchr3_iter, memchr_iter};

/// Split input into lines on `\n`, stripping one trailing `\r` per line.
///
/// Matches `str::split('\n')` semantics otherwise: a trailing newline
/// yields a final empty line, and empty input yields one empty line.
pub fn split_lines(input: &str) -> Vec<&str> {
    let bytes = input.as_bytes();
    let mut lines = Vec::with_capacity(bytes.len() / 32 + 1);
    let mut start = 0;
    for nl in memchr_iter(b'\n', bytes) {
        lines.push(strip_cr(&input[start..nl]));
        start = nl + 1;
    }
    lines.push(strip_cr(&input[start..]));
    lines
}

#[inline]
fn strip_cr(line: &str) -> &str {
    line.strip_suffix('\r').unwrap_or(line)
}

/// True if the line is empty or whitespace-only.
#[inline]
pub fn is_blank(line: &str) -> bool {
    line.bytes().all(|b| b == b' ' || b == b'\t')
}

/// Count of structural code bytes: `{`, `}`, `(`, `)`, `;`, `=`.
#[inline]
pub fn structural_count(line: &str) -> usize {
    let bytes = line.as_bytes();
    memchr3_iter(b'{', b'}', b'(', bytes).count() + memchr3_iter(b')', b';', b'=', bytes).count()
}

/// True if the line contains any of `;`, `{`, `}`, `(`, `)`.
///
/// These disqualify the sentence-end text signal: a line ending in a
/// period but carrying brackets reads as code, not prose.
#[inline]
pub fn has_sentence_blocker(line: &str) -> bool {
    let bytes = line.as_bytes();
    memchr3(b';', b'{', b'}', bytes).is_some() || memchr2(b'(', b')', bytes).is_some()
}

/// Parsed fence marker line: the marker run plus its info string.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FenceLine<'a> {
    /// The fence character (`` ` `` or `~`).
    pub marker: u8,
    /// Length of the marker run (at least 3).
    pub run: usize,
    /// Leading indentation in spaces (at most 3).
    pub indent: usize,
    /// Info string after the marker run, trimmed.
    pub info: &'a str,
}

impl<'a> FenceLine<'a> {
    /// Parse a line as a fence marker: up to three leading spaces, then a
    /// run of three or more backticks or tildes.
    pub fn parse(line: &'a str) -> Option<Self> {
        let bytes = line.as_bytes();
        let mut pos = 0;
        while pos < bytes.len() && pos < 3 && bytes[pos] == b' ' {
            pos += 1;
        }
        let indent = pos;
        let marker = match bytes.get(pos) {
            Some(&b'`') => b'`',
            Some(&b'~') => b'~',
            _ => return None,
        };
        let run_start = pos;
        while pos < bytes.len() && bytes[pos] == marker {
            pos += 1;
        }
        let run = pos - run_start;
        if run < 3 {
            return None;
        }
        Some(Self {
            marker,
            run,
            indent,
            info: line[pos..].trim(),
        })
    }

    /// True when the info string is empty (a bare marker line).
    #[inline]
    pub fn is_bare(&self) -> bool {
        self.info.is_empty()
    }
}

/// True if the line opens or closes a fenced code block.
#[inline]
pub fn is_fence_line(line: &str) -> bool {
    FenceLine::parse(line).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_split_basic() {
        assert_eq!(split_lines("a\nb\nc"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_split_trailing_newline() {
        assert_eq!(split_lines("a\n"), vec!["a", ""]);
    }

    #[test]
    fn test_split_empty() {
        assert_eq!(split_lines(""), vec![""]);
    }

    #[test]
    fn test_split_strips_carriage_return() {
        assert_eq!(split_lines("a\r\nb\r\n"), vec!["a", "b", ""]);
    }

    #[test]
    fn test_is_blank() {
        assert!(is_blank(""));
        assert!(is_blank("   \t"));
        assert!(!is_blank(" x "));
    }

    #[test]
    fn test_structural_count() {
        assert_eq!(structural_count("const x = 1;"), 2);
        assert_eq!(structural_count("foo(a, b) {"), 3);
        assert_eq!(structural_count("plain prose here"), 0);
    }

    #[test]
    fn test_sentence_blocker() {
        assert!(has_sentence_blocker("call(x)."));
        assert!(has_sentence_blocker("end;"));
        assert!(!has_sentence_blocker("A plain sentence, with = sign."));
    }

    #[test]
    fn test_fence_parse_backticks() {
        let fence = FenceLine::parse("```rust").unwrap();
        assert_eq!(fence.marker, b'`');
        assert_eq!(fence.run, 3);
        assert_eq!(fence.info, "rust");
        assert!(!fence.is_bare());
    }

    #[test]
    fn test_fence_parse_tildes() {
        let fence = FenceLine::parse("~~~~").unwrap();
        assert_eq!(fence.marker, b'~');
        assert_eq!(fence.run, 4);
        assert!(fence.is_bare());
    }

    #[test]
    fn test_fence_parse_indented() {
        let fence = FenceLine::parse("   ```").unwrap();
        assert_eq!(fence.indent, 3);
        assert!(FenceLine::parse("    ```").is_none());
    }

    #[test]
    fn test_fence_parse_too_short() {
        assert!(FenceLine::parse("``").is_none());
        assert!(FenceLine::parse("~~ not a fence").is_none());
    }

    #[test]
    fn test_fence_info_trimmed() {
        let fence = FenceLine::parse("```  python  ").unwrap();
        assert_eq!(fence.info, "python");
    }
}
