//! Deterministic line signals.
//!
//! Each heuristic is a named predicate collected into an ordered rule
//! table. The classifier consults `TEXT_RULES` first and `CODE_RULES`
//! only when no text signal fired, so precedence lives in exactly one
//! place and every rule can be tested on its own.

use std::collections::HashSet;
use std::sync::LazyLock;

use rustc_hash::FxBuildHasher as FastHashBuilder;

use crate::scan;

/// A named line predicate.
pub struct Rule {
    /// Stable name, used by rule-level tests.
    pub name: &'static str,
    /// Returns true when the signal fires for this (trimmed) line.
    pub check: fn(&str) -> bool,
}

/// Text signals, in evaluation order. Any match means prose.
pub const TEXT_RULES: &[Rule] = &[
    Rule { name: "leading-function-word", check: starts_with_function_word },
    Rule { name: "sentence-end", check: is_sentence_end },
    Rule { name: "auxiliary-verb", check: has_auxiliary_verb },
    Rule { name: "long-plain-phrase", check: is_long_plain_phrase },
    Rule { name: "explanatory-phrase", check: has_explanatory_phrase },
];

/// Code signals, in evaluation order. Consulted only when no text
/// signal fired; any match means code.
pub const CODE_RULES: &[Rule] = &[
    Rule { name: "module-keyword", check: starts_with_module_keyword },
    Rule { name: "declaration-keyword", check: starts_with_declaration },
    Rule { name: "control-keyword", check: starts_with_control_keyword },
    Rule { name: "call-or-definition", check: is_call_or_definition },
    Rule { name: "assignment", check: is_assignment },
    Rule { name: "bracket-only", check: is_bracket_only },
    Rule { name: "comment-marker", check: starts_with_comment_marker },
    Rule { name: "structural-density", check: has_structural_density },
    Rule { name: "markup-tag", check: is_markup_tag },
    Rule { name: "method-call", check: has_method_call },
    Rule { name: "arrow-function", check: has_arrow_function },
    Rule { name: "type-annotation", check: has_type_annotation },
];

/// True if any text signal fires.
pub fn matches_text_signal(line: &str) -> bool {
    TEXT_RULES.iter().any(|rule| (rule.check)(line))
}

/// True if any code signal fires.
pub fn matches_code_signal(line: &str) -> bool {
    CODE_RULES.iter().any(|rule| (rule.check)(line))
}

/// Words that open an English clause. A line starting with one of these
/// followed by a space or colon is prose regardless of what else it
/// contains.
static FUNCTION_WORDS: LazyLock<HashSet<&'static str, FastHashBuilder>> = LazyLock::new(|| {
    [
        "the", "this", "that", "and", "but", "or", "so", "when", "where", "how", "why", "what",
        "who", "which", "a", "an", "in", "on", "at", "to", "for", "with", "by", "from", "about",
        "through", "during", "before", "after", "above", "below", "between", "among", "under",
        "over", "here", "there", "provides", "allows", "enables", "helps", "makes", "creates",
        "builds", "develops", "implements",
    ]
    .into_iter()
    .collect()
});

/// Auxiliary and modal verbs that mark a clause as prose.
const AUXILIARY_VERBS: &[&str] = &[
    "is", "are", "was", "were", "will", "would", "should", "could", "can", "may", "might",
];

/// Whole-word auxiliaries/conjunctions that nudge an ambiguous line
/// toward prose in the context-scoring fallback (spec §4.1).
const CONNECTIVE_WORDS: &[&str] = &["and", "the", "is", "are", "will", "would"];

/// Phrases that only occur in explanatory prose.
const EXPLANATORY_PHRASES: &[&str] =
    &["for example", "such as", "in other words", "that is", "i.e.", "e.g."];

#[inline]
fn is_word_byte(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b == b'_' || b == b'$'
}

/// Leading alphabetic word of the line, with the byte that follows it.
fn leading_word(line: &str) -> Option<(&str, Option<u8>)> {
    let bytes = line.as_bytes();
    let mut end = 0;
    while end < bytes.len() && bytes[end].is_ascii_alphabetic() {
        end += 1;
    }
    if end == 0 || (end < bytes.len() && is_word_byte(bytes[end])) {
        return None;
    }
    Some((&line[..end], bytes.get(end).copied()))
}

fn starts_with_function_word(line: &str) -> bool {
    let Some((word, next)) = leading_word(line) else {
        return false;
    };
    if !matches!(next, Some(b' ') | Some(b':')) {
        return false;
    }
    FUNCTION_WORDS.contains(word.to_ascii_lowercase().as_str())
}

fn is_sentence_end(line: &str) -> bool {
    matches!(line.as_bytes().last(), Some(b'.' | b'!' | b'?')) && !scan::has_sentence_blocker(line)
}

/// Iterate the line's words, where a word is a maximal run of
/// alphanumerics, `_`, or `$`. `is_valid` stays one word, so the bare
/// auxiliary "is" inside it does not fire.
fn words(line: &str) -> impl Iterator<Item = &str> {
    line.split(|c: char| !(c.is_ascii_alphanumeric() || c == '_' || c == '$'))
        .filter(|w| !w.is_empty())
}

fn has_auxiliary_verb(line: &str) -> bool {
    words(line).any(|word| {
        AUXILIARY_VERBS
            .iter()
            .any(|verb| verb.eq_ignore_ascii_case(word))
    })
}

/// True if the line contains, as a whole word, any auxiliary/conjunction
/// from [`CONNECTIVE_WORDS`]. Used only by the context-scoring fallback.
pub fn has_connective_word(line: &str) -> bool {
    words(line).any(|word| {
        CONNECTIVE_WORDS
            .iter()
            .any(|conn| conn.eq_ignore_ascii_case(word))
    })
}

fn is_long_plain_phrase(line: &str) -> bool {
    line.split(' ').filter(|t| !t.is_empty()).count() > 8 && scan::structural_count(line) == 0
}

fn has_explanatory_phrase(line: &str) -> bool {
    let lower = line.to_ascii_lowercase();
    EXPLANATORY_PHRASES.iter().any(|p| lower.contains(p))
}

#[inline]
fn leading_keyword(line: &str, keywords: &[&str]) -> bool {
    let Some((word, _)) = leading_word(line) else {
        return false;
    };
    keywords.contains(&word)
}

fn starts_with_module_keyword(line: &str) -> bool {
    leading_keyword(line, &["import", "from", "export"])
}

fn starts_with_declaration(line: &str) -> bool {
    leading_keyword(line, &["const", "let", "var", "function", "class", "def"])
}

fn starts_with_control_keyword(line: &str) -> bool {
    let Some((word, _)) = leading_word(line) else {
        return false;
    };
    if !["if", "for", "while", "try", "catch"].contains(&word) {
        return false;
    }
    line[word.len()..].trim_start().starts_with('(')
}

/// `identifier(args) {` or `identifier(args);` — a call or definition
/// with its body/terminator on the same line.
fn is_call_or_definition(line: &str) -> bool {
    let bytes = line.as_bytes();
    if bytes.is_empty() || !(bytes[0].is_ascii_alphabetic() || bytes[0] == b'_' || bytes[0] == b'$')
    {
        return false;
    }
    let mut pos = 1;
    while pos < bytes.len() && is_word_byte(bytes[pos]) {
        pos += 1;
    }
    while pos < bytes.len() && bytes[pos] == b' ' {
        pos += 1;
    }
    if pos >= bytes.len() || bytes[pos] != b'(' {
        return false;
    }
    let Some(close) = line.rfind(')') else {
        return false;
    };
    matches!(line[close + 1..].trim(), "{" | ";")
}

/// `identifier = value` or `identifier: value`, not ending in `=`.
fn is_assignment(line: &str) -> bool {
    if line.ends_with('=') {
        return false;
    }
    let bytes = line.as_bytes();
    if bytes.is_empty() || !(bytes[0].is_ascii_alphabetic() || bytes[0] == b'_' || bytes[0] == b'$')
    {
        return false;
    }
    let mut pos = 1;
    while pos < bytes.len() && is_word_byte(bytes[pos]) {
        pos += 1;
    }
    while pos < bytes.len() && bytes[pos] == b' ' {
        pos += 1;
    }
    match bytes.get(pos) {
        // Single `=`: skip `==` comparisons and `=>` arrows.
        Some(&b'=') => {
            !matches!(bytes.get(pos + 1), Some(&b'=') | Some(&b'>'))
                && !line[pos + 1..].trim().is_empty()
        }
        Some(&b':') => !line[pos + 1..].trim().is_empty(),
        _ => false,
    }
}

fn is_bracket_only(line: &str) -> bool {
    !line.is_empty()
        && line
            .bytes()
            .all(|b| matches!(b, b'{' | b'}' | b'(' | b')' | b'[' | b']' | b';' | b',' | b' ' | b'\t'))
        && line.bytes().any(|b| matches!(b, b'{' | b'}' | b'(' | b')' | b'[' | b']'))
}

fn starts_with_comment_marker(line: &str) -> bool {
    line.starts_with("//")
        || line.starts_with('#')
        || line.starts_with('*')
        || line.starts_with("<!--")
}

fn has_structural_density(line: &str) -> bool {
    scan::structural_count(line) >= 2
}

/// An HTML/JSX tag: `<identifier ...>` or a closing `</...>`.
fn is_markup_tag(line: &str) -> bool {
    let bytes = line.as_bytes();
    if bytes.first() != Some(&b'<') {
        return false;
    }
    let tag_start = if bytes.get(1) == Some(&b'/') { 2 } else { 1 };
    matches!(bytes.get(tag_start), Some(b) if b.is_ascii_alphabetic())
        && memchr::memchr(b'>', bytes).is_some()
}

/// A method call: `.identifier(`.
fn has_method_call(line: &str) -> bool {
    let bytes = line.as_bytes();
    for dot in memchr::memchr_iter(b'.', bytes) {
        let mut pos = dot + 1;
        if !matches!(bytes.get(pos), Some(b) if b.is_ascii_alphabetic() || *b == b'_' || *b == b'$')
        {
            continue;
        }
        while pos < bytes.len() && is_word_byte(bytes[pos]) {
            pos += 1;
        }
        if bytes.get(pos) == Some(&b'(') {
            return true;
        }
    }
    false
}

/// An arrow function whose body opens on the same line: `=> {` or `=> (`.
fn has_arrow_function(line: &str) -> bool {
    let mut rest = line;
    while let Some(idx) = rest.find("=>") {
        let after = rest[idx + 2..].trim_start();
        if after.starts_with('{') || after.starts_with('(') {
            return true;
        }
        rest = &rest[idx + 2..];
    }
    false
}

/// A type annotation: `: string`, `: Promise<...>`, etc.
fn has_type_annotation(line: &str) -> bool {
    const TYPES: &[&str] = &["string", "number", "boolean", "object", "any", "void", "Promise"];
    let bytes = line.as_bytes();
    for colon in memchr::memchr_iter(b':', bytes) {
        let after = line[colon + 1..].trim_start();
        for ty in TYPES {
            if after.starts_with(ty)
                && !matches!(after.as_bytes().get(ty.len()), Some(&b) if is_word_byte(b))
            {
                return true;
            }
        }
    }
    false
}
