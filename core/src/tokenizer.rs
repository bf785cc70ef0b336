use lazy_static::lazy_static;
use regex::Regex;
use rust_stemmers::{Algorithm, Stemmer};
use unicode_normalization::UnicodeNormalization;

lazy_static! {
    static ref RE: Regex = Regex::new(r"(?u)\w+|'\w*").expect("valid regex");
    static ref STEMMER: Stemmer = Stemmer::create(Algorithm::English);
}

/// Tokenize text into normalized, stemmed terms.
///
/// NFKC normalization and lowercasing, then a word scan where a token
/// starting with an apostrophe (other than a bare `'s` or `'`) is merged
/// back into the preceding token, so `don't` survives as one term while
/// possessive `'s` fragments are dropped. Only tokens starting with an
/// alphanumeric character are kept and stemmed.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized = text.nfkc().collect::<String>().to_lowercase();
    let mut raw: Vec<String> = Vec::new();
    for mat in RE.find_iter(&normalized) {
        let token = mat.as_str();
        if token.starts_with('\'') && token != "'s" && token != "'" {
            if let Some(prev) = raw.last_mut() {
                prev.push_str(token);
                continue;
            }
        }
        raw.push(token.to_string());
    }
    raw.into_iter()
        .filter(|t| {
            t.chars()
                .next()
                .is_some_and(|c| c.is_alphanumeric() || c == '_')
        })
        .map(|t| STEMMER.stem(&t).to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn basic_tokenize() {
        let t = tokenize("Running, runner's run!");
        assert!(t.iter().any(|w| w == "run"));
    }
}
