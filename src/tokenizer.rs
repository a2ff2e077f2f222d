//! Tokenizer for themed text
//!
//! Lowercases, keeps ASCII letters and digits, hyphens and the accented
//! Latin letters used in French keywords, and splits on whitespace runs.
//! Everything else (punctuation, apostrophes, other scripts) becomes a
//! separator. Tokens shorter than two characters are dropped.
//!
//! Order and duplicates are preserved; callers decide whether they need the
//! token multiset (term frequency) or the token set (document frequency).

/// A normalized index term
pub type Term = String;

/// Accented lowercase letters kept inside terms
const ACCENTED: &str = "àâäçéèêëîïôöùûüÿñæœ";

/// Minimum term length, in characters
pub const MIN_TERM_CHARS: usize = 2;

fn is_term_char(c: char) -> bool {
    c.is_ascii_lowercase() || c.is_ascii_digit() || c == '-' || ACCENTED.contains(c)
}

/// Split raw text into index terms
pub fn tokenize(text: &str) -> Vec<Term> {
    let cleaned: String = text
        .to_lowercase()
        .chars()
        .map(|c| match c {
            '\u{2019}' | '\'' => ' ',
            c if is_term_char(c) => c,
            _ => ' ',
        })
        .collect();

    cleaned
        .split_whitespace()
        .filter(|token| token.chars().count() >= MIN_TERM_CHARS)
        .map(str::to_string)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lowercases_and_splits() {
        assert_eq!(tokenize("Vision  Robotics\tControl"), vec!["vision", "robotics", "control"]);
    }

    #[test]
    fn test_keeps_accents_and_hyphens() {
        assert_eq!(
            tokenize("Écologie marine | Sciences-de-la-vie"),
            vec!["écologie", "marine", "sciences-de-la-vie"]
        );
    }

    #[test]
    fn test_apostrophes_split_words() {
        assert_eq!(tokenize("l’océan d'aujourd'hui"), vec!["océan", "aujourd", "hui"]);
    }

    #[test]
    fn test_drops_short_tokens_and_punctuation() {
        assert_eq!(tokenize("a, b; IA (x) 3D!"), vec!["ia", "3d"]);
    }

    #[test]
    fn test_preserves_duplicates_and_order() {
        assert_eq!(tokenize("deep learning deep"), vec!["deep", "learning", "deep"]);
    }

    #[test]
    fn test_empty_and_whitespace_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \n\t ").is_empty());
        assert!(tokenize("... ; !!").is_empty());
    }

    #[test]
    fn test_unsupported_letters_become_separators() {
        // 'á' and 'ß' are outside the kept alphabet
        assert_eq!(tokenize("málaga straße"), vec!["laga", "stra"]);
    }
}
