//! Language guessing for code lines.
//!
//! A fixed set of languages is scored by weighted keyword occurrences
//! inside a small window of surrounding lines. The tables are static
//! configuration: nothing mutates them at runtime, and the set order is
//! the tie-break order.

/// Languages the guesser can tag a fence with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Lang {
    Javascript,
    Typescript,
    Python,
    Java,
    Css,
    Html,
    Sql,
    Json,
}

impl Lang {
    /// Fence info-string tag for this language.
    pub fn tag(self) -> &'static str {
        match self {
            Self::Javascript => "javascript",
            Self::Typescript => "typescript",
            Self::Python => "python",
            Self::Java => "java",
            Self::Css => "css",
            Self::Html => "html",
            Self::Sql => "sql",
            Self::Json => "json",
        }
    }
}

/// All languages, in tie-break order.
const ALL_LANGS: [Lang; 8] = [
    Lang::Javascript,
    Lang::Typescript,
    Lang::Python,
    Lang::Java,
    Lang::Css,
    Lang::Html,
    Lang::Sql,
    Lang::Json,
];

/// Lines looked at on each side of a code line when scoring keywords.
const CONTEXT_LINES: usize = 2;

/// Minimum weighted score before a language is selected at all.
const MIN_SCORE: usize = 2;

struct LangSpec {
    lang: Lang,
    /// Lowercase needle plus its weight. Anchors that identify the
    /// language on their own carry weight 2; supporting tokens weight 1.
    keywords: &'static [(&'static str, usize)],
}

/// Keyword tables, in tie-break order. Needles are matched against a
/// lowercased window, so SQL written in uppercase still scores.
static LANG_SPECS: &[LangSpec] = &[
    LangSpec {
        lang: Lang::Javascript,
        keywords: &[
            ("function", 2),
            ("const ", 2),
            ("let ", 2),
            ("var ", 2),
            ("=>", 2),
            ("console.", 2),
            ("require(", 2),
            ("classname=", 2),
            ("return", 1),
            ("async ", 1),
            ("await ", 1),
        ],
    },
    LangSpec {
        lang: Lang::Typescript,
        keywords: &[
            ("interface ", 2),
            (": string", 2),
            (": number", 2),
            (": boolean", 2),
            ("readonly ", 2),
            ("declare ", 2),
            ("namespace ", 2),
            ("export type", 2),
            ("enum ", 1),
            ("implements ", 1),
        ],
    },
    LangSpec {
        lang: Lang::Python,
        keywords: &[
            ("def ", 2),
            ("self.", 2),
            ("elif", 2),
            ("lambda ", 2),
            ("print(", 2),
            ("__init__", 2),
            ("import ", 1),
            ("):", 1),
        ],
    },
    LangSpec {
        lang: Lang::Java,
        keywords: &[
            ("public ", 2),
            ("private ", 2),
            ("void ", 2),
            ("system.", 2),
            ("static ", 1),
            ("extends ", 1),
            ("implements ", 1),
            ("new ", 1),
        ],
    },
    LangSpec {
        lang: Lang::Css,
        keywords: &[
            ("margin:", 1),
            ("padding:", 1),
            ("color:", 1),
            ("display:", 1),
            ("font-", 1),
            ("background", 1),
            ("width:", 1),
            ("height:", 1),
            (":hover", 1),
            ("px;", 1),
        ],
    },
    LangSpec {
        lang: Lang::Html,
        keywords: &[
            ("<div", 2),
            ("<span", 2),
            ("<p>", 2),
            ("<html", 2),
            ("<body", 2),
            ("</", 1),
            ("href=", 1),
            ("class=", 1),
            ("/>", 1),
            ("<h1", 1),
        ],
    },
    LangSpec {
        lang: Lang::Sql,
        keywords: &[
            ("select ", 2),
            ("insert ", 2),
            ("create table", 2),
            ("order by", 2),
            ("group by", 2),
            ("update ", 1),
            ("delete ", 1),
            (" from ", 1),
            ("where ", 1),
            (" join ", 1),
        ],
    },
    LangSpec {
        lang: Lang::Json,
        keywords: &[
            ("\":", 1),
            ("null,", 1),
            ("true,", 1),
            ("false,", 1),
            ("},", 1),
            ("\",", 1),
        ],
    },
];

/// Guess the language of the code line at `index`, scoring keywords over
/// a window of up to two lines on each side. Returns `None` below the
/// score threshold: an unlabeled fence beats a wrong label.
pub(crate) fn guess_line(all_lines: &[&str], index: usize) -> Option<Lang> {
    debug_assert!(index < all_lines.len());
    let lo = index.saturating_sub(CONTEXT_LINES);
    let hi = (index + CONTEXT_LINES).min(all_lines.len() - 1);
    let window = all_lines[lo..=hi].join("\n").to_ascii_lowercase();

    let mut best: Option<(Lang, usize)> = None;
    for spec in LANG_SPECS {
        let score: usize = spec
            .keywords
            .iter()
            .map(|(needle, weight)| window.matches(needle).count() * weight)
            .sum();
        if score >= MIN_SCORE && best.map_or(true, |(_, s)| score > s) {
            best = Some((spec.lang, score));
        }
    }
    best.map(|(lang, _)| lang)
}

/// Resolve a segment's language by majority vote over its per-line
/// guesses. Ties fall to the earlier language in table order; a segment
/// with no guesses stays unlabeled.
pub(crate) fn vote<I>(guesses: I) -> Option<Lang>
where
    I: IntoIterator<Item = Lang>,
{
    let mut counts = [0usize; ALL_LANGS.len()];
    for lang in guesses {
        counts[lang as usize] += 1;
    }
    let mut best: Option<(Lang, usize)> = None;
    for (idx, &count) in counts.iter().enumerate() {
        if count > 0 && best.map_or(true, |(_, c)| count > c) {
            best = Some((ALL_LANGS[idx], count));
        }
    }
    best.map(|(lang, _)| lang)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn guess(lines: &[&str], index: usize) -> Option<Lang> {
        guess_line(lines, index)
    }

    #[test]
    fn test_single_const_line_is_javascript() {
        assert_eq!(guess(&["const x = 1;"], 0), Some(Lang::Javascript));
    }

    #[test]
    fn test_function_body_is_javascript() {
        let lines = ["function add(a, b) {", "  return a + b;", "}"];
        for i in 0..lines.len() {
            assert_eq!(guess(&lines, i), Some(Lang::Javascript), "line {i}");
        }
    }

    #[test]
    fn test_python_def() {
        assert_eq!(guess(&["def handler(event):"], 0), Some(Lang::Python));
    }

    #[test]
    fn test_typescript_outscores_javascript() {
        let lines = ["interface User {", "  name: string;", "  age: number;", "}"];
        assert_eq!(guess(&lines, 1), Some(Lang::Typescript));
    }

    #[test]
    fn test_sql_uppercase() {
        let lines = ["SELECT id, name", "FROM users", "WHERE active = 1"];
        assert_eq!(guess(&lines, 0), Some(Lang::Sql));
    }

    #[test]
    fn test_css_block() {
        let lines = [".card {", "  margin: 0;", "  padding: 4px;", "}"];
        assert_eq!(guess(&lines, 1), Some(Lang::Css));
    }

    #[test]
    fn test_below_threshold_is_none() {
        assert_eq!(guess(&["x + y"], 0), None);
    }

    #[test]
    fn test_vote_majority() {
        let got = vote([Lang::Python, Lang::Javascript, Lang::Python]);
        assert_eq!(got, Some(Lang::Python));
    }

    #[test]
    fn test_vote_tie_takes_table_order() {
        let got = vote([Lang::Python, Lang::Javascript]);
        assert_eq!(got, Some(Lang::Javascript));
    }

    #[test]
    fn test_vote_empty() {
        assert_eq!(vote(std::iter::empty::<Lang>()), None);
    }
}
