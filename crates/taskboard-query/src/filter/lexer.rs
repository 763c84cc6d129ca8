//! Tokenizer for search text.
//!
//! Search text is a whitespace-separated list of `attribute:value` pairs and
//! free words. Values and free text may be quoted with `"` or `'`; inside
//! quotes a backslash escapes the next character.

use std::iter::Peekable;
use std::str::Chars;

use log::warn;
use strsim::levenshtein;

/// Maximum edit distance for an attribute suggestion.
const MAX_SUGGESTION_DISTANCE: usize = 2;

/// A token in a search expression.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SearchToken {
    /// `name:value`; the name is lowercased.
    Attribute { name: String, value: String },
    /// A free word or quoted phrase.
    Text(String),
}

/// A token with its position in the input.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PositionedToken {
    /// The token.
    pub token: SearchToken,
    /// The byte position where the token starts (0-indexed).
    pub position: usize,
}

/// Splits search text into tokens.
pub struct Lexer<'a> {
    chars: Peekable<Chars<'a>>,
    /// Current byte position in the input string.
    position: usize,
}

impl<'a> Lexer<'a> {
    /// Creates a new lexer for the given input string.
    pub fn new(input: &'a str) -> Self {
        Self {
            chars: input.chars().peekable(),
            position: 0,
        }
    }

    fn peek(&mut self) -> Option<&char> {
        self.chars.peek()
    }

    fn next_char(&mut self) -> Option<char> {
        let c = self.chars.next();
        if let Some(ch) = c {
            self.position += ch.len_utf8();
        }
        c
    }

    fn skip_whitespace(&mut self) {
        while self.peek().is_some_and(|c| c.is_whitespace()) {
            self.next_char();
        }
    }

    /// Reads a quoted string; an unterminated quote runs to the end of input.
    fn read_quoted(&mut self, quote: char) -> String {
        self.next_char();
        let mut result = String::new();
        while let Some(c) = self.next_char() {
            if c == quote {
                break;
            }
            if c == '\\' {
                if let Some(escaped) = self.next_char() {
                    result.push(escaped);
                }
            } else {
                result.push(c);
            }
        }
        result
    }

    /// Reads until whitespace, stopping early at the first `:` if asked.
    fn read_word(&mut self, stop_at_colon: bool) -> String {
        let mut word = String::new();
        while let Some(&c) = self.peek() {
            if c.is_whitespace() || (stop_at_colon && c == ':') {
                break;
            }
            word.push(c);
            self.next_char();
        }
        word
    }

    fn read_value(&mut self) -> String {
        match self.peek() {
            Some(&q) if q == '"' || q == '\'' => self.read_quoted(q),
            _ => self.read_word(false),
        }
    }

    fn next_token(&mut self) -> Option<PositionedToken> {
        self.skip_whitespace();
        let position = self.position;
        let &first = self.peek()?;

        if first == '"' || first == '\'' {
            let text = self.read_quoted(first);
            return Some(PositionedToken {
                token: SearchToken::Text(text),
                position,
            });
        }

        let head = self.read_word(true);
        let is_name = !head.is_empty()
            && head.chars().all(|c| c.is_alphanumeric() || c == '_');

        let token = if self.peek() == Some(&':') && is_name {
            self.next_char();
            SearchToken::Attribute {
                name: head.to_lowercase(),
                value: self.read_value(),
            }
        } else {
            // A colon not preceded by a plain name stays part of the word.
            let rest = self.read_word(false);
            SearchToken::Text(head + &rest)
        };

        Some(PositionedToken { token, position })
    }

    /// Tokenizes the whole input.
    pub fn tokenize(mut self) -> Vec<PositionedToken> {
        let mut tokens = Vec::new();
        while let Some(token) = self.next_token() {
            if matches!(&token.token, SearchToken::Text(t) if t.is_empty()) {
                continue;
            }
            tokens.push(token);
        }
        tokens
    }
}

/// Returns the closest known attribute name to `name`, if it is close enough
/// to be a typo.
pub fn suggest_attribute<'k>(name: &str, known: &[&'k str]) -> Option<&'k str> {
    let (best, distance) = known
        .iter()
        .map(|candidate| (*candidate, levenshtein(name, candidate)))
        .min_by_key(|(_, d)| *d)?;
    (distance > 0 && distance <= MAX_SUGGESTION_DISTANCE).then_some(best)
}

/// Logs an unknown attribute, with a suggestion when one is close.
pub(crate) fn warn_unknown_attribute(family: &str, name: &str, known: &[&str]) {
    match suggest_attribute(name, known) {
        Some(suggestion) => warn!(
            "event=search_attribute module=filter family={family} status=unknown attribute={name} suggestion={suggestion} message=\"unknown search attribute '{name}', did you mean '{suggestion}'?\""
        ),
        None => warn!(
            "event=search_attribute module=filter family={family} status=unknown attribute={name}"
        ),
    }
}

/// Collapses `(key, filter)` entries so that filters sharing a key are
/// OR-grouped, keeping the order in which keys first appear.
pub(crate) fn group_by_key<K: PartialEq, F>(
    entries: Vec<(K, F)>,
    any: impl Fn(Vec<F>) -> F,
) -> Vec<F> {
    let mut groups: Vec<(K, Vec<F>)> = Vec::new();
    for (key, filter) in entries {
        match groups.iter_mut().find(|(k, _)| *k == key) {
            Some((_, filters)) => filters.push(filter),
            None => groups.push((key, vec![filter])),
        }
    }

    groups
        .into_iter()
        .map(|(_, mut filters)| {
            if filters.len() == 1 {
                filters.remove(0)
            } else {
                any(filters)
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokens(input: &str) -> Vec<SearchToken> {
        Lexer::new(input)
            .tokenize()
            .into_iter()
            .map(|t| t.token)
            .collect()
    }

    fn attr(name: &str, value: &str) -> SearchToken {
        SearchToken::Attribute {
            name: name.to_string(),
            value: value.to_string(),
        }
    }

    #[test]
    fn test_attribute_and_words() {
        assert_eq!(
            tokens("status:open fix login"),
            vec![
                attr("status", "open"),
                SearchToken::Text("fix".to_string()),
                SearchToken::Text("login".to_string()),
            ]
        );
    }

    #[test]
    fn test_attribute_name_is_lowercased() {
        assert_eq!(tokens("Status:Open"), vec![attr("status", "Open")]);
    }

    #[test]
    fn test_quoted_values() {
        assert_eq!(
            tokens(r#"assignee:"John Doe" column:'Work in progress'"#),
            vec![attr("assignee", "John Doe"), attr("column", "Work in progress")]
        );
    }

    #[test]
    fn test_escape_inside_quotes() {
        assert_eq!(
            tokens(r#"title:"say \"hi\"""#),
            vec![attr("title", r#"say "hi""#)]
        );
    }

    #[test]
    fn test_quoted_free_text() {
        assert_eq!(
            tokens(r#""fix login" due:today"#),
            vec![SearchToken::Text("fix login".to_string()), attr("due", "today")]
        );
    }

    #[test]
    fn test_comparison_value() {
        assert_eq!(tokens("due:<=2024-01-31"), vec![attr("due", "<=2024-01-31")]);
    }

    #[test]
    fn test_colon_without_name_is_text() {
        assert_eq!(
            tokens(":oops http://example.com"),
            vec![
                SearchToken::Text(":oops".to_string()),
                attr("http", "//example.com"),
            ]
        );
    }

    #[test]
    fn test_positions() {
        let positioned = Lexer::new("  a status:open").tokenize();
        assert_eq!(positioned[0].position, 2);
        assert_eq!(positioned[1].position, 4);
    }

    #[test]
    fn test_whitespace_only_yields_nothing() {
        assert!(tokens(" \t\n").is_empty());
        assert!(tokens(r#""""#).is_empty());
    }

    #[test]
    fn test_suggest_attribute() {
        let known = ["status", "assignee", "due"];
        assert_eq!(suggest_attribute("stauts", &known), Some("status"));
        assert_eq!(suggest_attribute("status", &known), None);
        assert_eq!(suggest_attribute("zzzzzz", &known), None);
    }

    #[test]
    fn test_group_by_key_keeps_first_appearance_order() {
        let entries = vec![("b", 1), ("a", 2), ("b", 3)];
        let grouped = group_by_key(entries, |v| v.iter().sum::<i32>() * 100);
        assert_eq!(grouped, vec![400, 2]);
    }
}
