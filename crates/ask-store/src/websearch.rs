//! Websearch-style query translation to FTS5 MATCH syntax
//!
//! Supported syntax, matching the hosted store's `websearch` search type:
//!
//! - unquoted words are AND-ed
//! - `"quoted text"` is a phrase
//! - `or` between two terms means either
//! - a leading `-` excludes a term or phrase
//!
//! Common English stop words are dropped from unquoted terms, including the
//! fragments contractions and possessives split into. Every emitted
//! term is a quoted FTS5 string, so user input can never inject operators.

/// English stop words ignored in unquoted terms
const STOP_WORDS: &[&str] = &[
    "a", "about", "an", "and", "are", "as", "at", "be", "but", "by", "can", "could", "did",
    "do", "does", "for", "from", "had", "has", "have", "how", "i", "if", "in", "into", "is",
    "it", "its", "me", "my", "of", "on", "our", "should", "so", "than", "that", "the",
    "their", "them", "then", "there", "these", "they", "this", "those", "to", "us", "was",
    "we", "were", "what", "when", "where", "which", "who", "whom", "why", "will", "with",
    "would", "you", "your",
    // contraction and possessive fragments
    "d", "ll", "m", "s", "t", "ve",
];

#[derive(Debug, Clone, PartialEq)]
enum Token {
    Term { text: String, quoted: bool, negated: bool },
    Or,
}

fn tokenize(query: &str) -> Vec<Token> {
    let mut tokens = Vec::new();
    let mut chars = query.chars().peekable();

    while let Some(&c) = chars.peek() {
        if c.is_whitespace() {
            chars.next();
            continue;
        }

        let mut negated = false;
        if c == '-' {
            chars.next();
            negated = true;
        }

        match chars.peek() {
            Some('"') => {
                chars.next();
                let mut text = String::new();
                for ch in chars.by_ref() {
                    if ch == '"' {
                        break;
                    }
                    text.push(ch);
                }
                tokens.push(Token::Term { text, quoted: true, negated });
            }
            Some(_) => {
                let mut text = String::new();
                while let Some(&ch) = chars.peek() {
                    if ch.is_whitespace() || ch == '"' {
                        break;
                    }
                    text.push(ch);
                    chars.next();
                }
                if !negated && text.eq_ignore_ascii_case("or") {
                    tokens.push(Token::Or);
                } else {
                    tokens.push(Token::Term { text, quoted: false, negated });
                }
            }
            None => {}
        }
    }

    tokens
}

/// Split into lowercase alphanumeric words, the way unicode61 tokenizes
fn words(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|w| !w.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Render a term as a quoted FTS5 string, or `None` if nothing searchable remains
fn render_term(text: &str, quoted: bool) -> Option<String> {
    let mut words = words(text);
    if !quoted {
        words.retain(|w| !STOP_WORDS.contains(&w.as_str()));
    }
    if words.is_empty() {
        return None;
    }
    Some(format!("\"{}\"", words.join(" ")))
}

/// Translate a websearch query into an FTS5 MATCH expression
///
/// Returns `None` when the query has no searchable positive term (empty,
/// only stop words, only exclusions); such a query matches nothing.
///
/// # Examples
///
/// ```
/// use ask_store::websearch::to_fts5;
///
/// assert_eq!(to_fts5("cloud native").as_deref(), Some(r#"("cloud" AND "native")"#));
/// assert_eq!(to_fts5("the of"), None);
/// ```
pub fn to_fts5(query: &str) -> Option<String> {
    let mut groups: Vec<Vec<String>> = Vec::new();
    let mut exclusions: Vec<String> = Vec::new();
    let mut pending_or = false;

    for token in tokenize(query) {
        match token {
            Token::Or => pending_or = !groups.is_empty(),
            Token::Term { text, quoted, negated } => {
                let Some(term) = render_term(&text, quoted) else {
                    continue;
                };
                if negated {
                    exclusions.push(term);
                    pending_or = false;
                } else if pending_or {
                    if let Some(last) = groups.last_mut() {
                        last.push(term);
                    }
                    pending_or = false;
                } else {
                    groups.push(vec![term]);
                }
            }
        }
    }

    if groups.is_empty() {
        return None;
    }

    let positive = groups
        .into_iter()
        .map(|group| {
            if group.len() == 1 {
                group.into_iter().next().unwrap_or_default()
            } else {
                format!("({})", group.join(" OR "))
            }
        })
        .collect::<Vec<_>>()
        .join(" AND ");

    let mut expr = format!("({})", positive);
    for term in exclusions {
        expr.push_str(" NOT ");
        expr.push_str(&term);
    }
    Some(expr)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_words_are_anded() {
        assert_eq!(
            to_fts5("platform engineering").as_deref(),
            Some(r#"("platform" AND "engineering")"#)
        );
    }

    #[test]
    fn test_stop_words_dropped() {
        assert_eq!(
            to_fts5("What services does Re:cinq offer?").as_deref(),
            Some(r#"("services" AND "re cinq" AND "offer")"#)
        );
    }

    #[test]
    fn test_only_stop_words_matches_nothing() {
        assert_eq!(to_fts5("what is it"), None);
        assert_eq!(to_fts5(""), None);
        assert_eq!(to_fts5("   ?!  "), None);
    }

    #[test]
    fn test_phrase() {
        assert_eq!(
            to_fts5(r#""waves of innovation" podcast"#).as_deref(),
            Some(r#"("waves of innovation" AND "podcast")"#)
        );
    }

    #[test]
    fn test_unterminated_phrase() {
        assert_eq!(to_fts5(r#""cloud native"#).as_deref(), Some(r#"("cloud native")"#));
    }

    #[test]
    fn test_or_groups() {
        assert_eq!(
            to_fts5("ai or cloud native").as_deref(),
            Some(r#"(("ai" OR "cloud") AND "native")"#)
        );
    }

    #[test]
    fn test_dangling_or_ignored() {
        assert_eq!(to_fts5("or cloud or").as_deref(), Some(r#"("cloud")"#));
    }

    #[test]
    fn test_negation() {
        assert_eq!(
            to_fts5(r#"cloud -legacy -"on premise""#).as_deref(),
            Some(r#"("cloud") NOT "legacy" NOT "on premise""#)
        );
    }

    #[test]
    fn test_only_negation_matches_nothing() {
        assert_eq!(to_fts5("-legacy"), None);
    }

    #[test]
    fn test_operator_injection_is_quoted() {
        assert_eq!(
            to_fts5("NEAR(a b) content:x*").as_deref(),
            Some(r#"("near" AND "b" AND "content x")"#)
        );
    }

    #[test]
    fn test_contractions_and_possessives() {
        assert_eq!(
            to_fts5("What's Re:cinq's podcast?").as_deref(),
            Some(r#"("re cinq" AND "podcast")"#)
        );
        assert_eq!(to_fts5("what's it's"), None);
    }

    #[test]
    fn test_quoted_phrase_keeps_stop_words() {
        assert_eq!(
            to_fts5(r#""what's new""#).as_deref(),
            Some(r#"("what s new")"#)
        );
    }
}
