//! Term normalization shared by indexing and querying.

/// Lowercase `text`, blank out everything that is not a word character or
/// whitespace, and split on whitespace.
///
/// Word characters are Unicode alphanumerics plus `_`, so `"naïve_bayes"`
/// stays one term while `"o'clock"` becomes `["o", "clock"]`.
pub fn tokenize(text: &str) -> Vec<String> {
    let normalized: String = text
        .to_lowercase()
        .chars()
        .map(|c| if is_word_char(c) || c.is_whitespace() { c } else { ' ' })
        .collect();
    normalized.split_whitespace().map(str::to_string).collect()
}

fn is_word_char(c: char) -> bool { c.is_alphanumeric() || c == '_' }

#[cfg(test)]
mod tests {
    use super::tokenize;

    #[test]
    fn empty_and_blank_input() {
        assert!(tokenize("").is_empty());
        assert!(tokenize("   \t\n ").is_empty());
        assert!(tokenize("?!...").is_empty());
    }

    #[test]
    fn punctuation_and_case() {
        assert_eq!(tokenize("Hello, World!"), vec!["hello", "world"]);
        assert_eq!(tokenize("rain-water  harvesting"), vec!["rain", "water", "harvesting"]);
    }

    #[test]
    fn unicode_word_characters_survive() {
        assert_eq!(tokenize("Crème BRÛLÉE"), vec!["crème", "brûlée"]);
        assert_eq!(tokenize("東京 2024"), vec!["東京", "2024"]);
        assert_eq!(tokenize("snake_case id"), vec!["snake_case", "id"]);
    }

    #[test]
    fn idempotent_on_joined_output() {
        let once = tokenize("  The QUICK, brown fox -- jumped!  ");
        let twice = tokenize(&once.join(" "));
        assert_eq!(once, twice);
    }
}
