//! Query-string parsing for the search mirror.
//!
//! Supported syntax, loosely following Lucene query strings:
//!
//! - `word` matches any field containing the token
//! - `field:word` restricts the match to one field (`car.id` is read as `car`)
//! - `wor*` matches tokens by prefix, `*` alone matches everything
//! - terms are OR-ed by default; `AND` joins its neighbours and binds tighter
//!   than `OR`

use super::{tokenize, SearchError};

#[derive(Debug, Clone, PartialEq, Eq)]
enum Pattern {
    Any,
    /// All tokens must be present; with `prefix` the last one matches by prefix.
    Tokens { tokens: Vec<String>, prefix: bool },
}

#[derive(Debug, Clone, PartialEq, Eq)]
struct Term {
    field: Option<String>,
    pattern: Pattern,
}

/// A parsed query: a disjunction of conjunctions of terms.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SearchQuery {
    groups: Vec<Vec<Term>>,
}

impl SearchQuery {
    pub fn parse(raw: &str) -> Result<Self, SearchError> {
        let mut groups: Vec<Vec<Term>> = Vec::new();
        let mut join_next = false;

        for word in raw.split_whitespace() {
            match word {
                "AND" | "&&" => {
                    if groups.is_empty() || join_next {
                        return Err(SearchError::InvalidQuery("AND without a left-hand term".into()));
                    }
                    join_next = true;
                    continue;
                }
                "OR" | "||" => {
                    if join_next {
                        return Err(SearchError::InvalidQuery("AND followed by OR".into()));
                    }
                    continue;
                }
                _ => {}
            }
            let term = Term::parse(word)?;
            match groups.last_mut() {
                Some(group) if join_next => group.push(term),
                _ => groups.push(vec![term]),
            }
            join_next = false;
        }

        if join_next {
            return Err(SearchError::InvalidQuery("AND without a right-hand term".into()));
        }
        if groups.is_empty() {
            return Err(SearchError::InvalidQuery("empty query".into()));
        }
        Ok(Self { groups })
    }

    /// `fields` holds the lowercase tokens of each named field of one document.
    pub fn matches(&self, fields: &[(&str, Vec<String>)]) -> bool {
        self.groups.iter().any(|group| group.iter().all(|term| term.matches(fields)))
    }
}

impl Term {
    fn parse(word: &str) -> Result<Self, SearchError> {
        let word = word.trim_matches('"');
        let (field, value) = match word.split_once(':') {
            Some((f, v)) if !f.is_empty() => (Some(normalize_field(f)), v),
            _ => (None, word),
        };

        if value == "*" {
            return Ok(Self { field, pattern: Pattern::Any });
        }
        let prefix = value.ends_with('*');
        let tokens = tokenize(value.trim_end_matches('*'));
        if tokens.is_empty() {
            return Err(SearchError::InvalidQuery(format!("nothing to match in '{}'", word)));
        }
        Ok(Self { field, pattern: Pattern::Tokens { tokens, prefix } })
    }

    fn matches(&self, fields: &[(&str, Vec<String>)]) -> bool {
        let mut candidates = fields
            .iter()
            .filter(|(name, _)| self.field.as_deref().map_or(true, |f| f.eq_ignore_ascii_case(name)));
        match &self.pattern {
            Pattern::Any => match self.field {
                None => true,
                Some(_) => candidates.any(|(_, tokens)| !tokens.is_empty()),
            },
            Pattern::Tokens { tokens, prefix } => {
                candidates.any(|(_, have)| tokens_match(tokens, *prefix, have))
            }
        }
    }
}

fn tokens_match(wanted: &[String], prefix: bool, have: &[String]) -> bool {
    let Some((last, head)) = wanted.split_last() else {
        return false;
    };
    let head_ok = head.iter().all(|t| have.contains(t));
    let last_ok = if prefix { have.iter().any(|h| h.starts_with(last.as_str())) } else { have.contains(last) };
    head_ok && last_ok
}

fn normalize_field(raw: &str) -> String {
    let lower = raw.to_ascii_lowercase();
    match lower.strip_suffix(".id") {
        Some(base) if !base.is_empty() => base.to_string(),
        _ => lower,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn doc() -> Vec<(&'static str, Vec<String>)> {
        vec![
            ("id", vec!["4".into()]),
            ("licence", vec!["class".into(), "b".into(), "autonomous".into()]),
            ("car", vec!["12".into()]),
        ]
    }

    fn hit(q: &str) -> bool {
        SearchQuery::parse(q).unwrap().matches(&doc())
    }

    #[test]
    fn test_bare_and_fielded_terms() {
        assert!(hit("autonomous"));
        assert!(hit("AUTONOMOUS"));
        assert!(hit("licence:class"));
        assert!(!hit("car:class"));
        assert!(hit("car.id:12"));
        assert!(!hit("safetyDriver:12"));
    }

    #[test]
    fn test_wildcards() {
        assert!(hit("*"));
        assert!(hit("auto*"));
        assert!(!hit("manual*"));
        assert!(hit("car:*"));
        assert!(!hit("safetydriver:*"));
    }

    #[test]
    fn test_multi_token_value_needs_every_token() {
        assert!(hit("licence:class-b"));
        assert!(!hit("licence:class-c"));
    }

    #[test]
    fn test_boolean_operators() {
        assert!(hit("manual autonomous"));
        assert!(hit("manual OR autonomous"));
        assert!(!hit("manual AND autonomous"));
        assert!(hit("class AND car:12"));
        assert!(hit("manual AND truck OR id:4"));
    }

    #[test]
    fn test_malformed_queries() {
        for q in ["", "   ", "AND x", "x AND", "x AND OR y", "!!!"] {
            assert!(SearchQuery::parse(q).is_err(), "{:?} should not parse", q);
        }
    }
}
