use std::collections::HashSet;

///Removes every char outside `[a-zA-Z0-9]` and lowercases the rest.
/// # Example
/// ```
/// use collocations::clean_token;
/// assert_eq!(clean_token("(Hello]"), "hello");
/// assert_eq!(clean_token("--"), "");
/// ```
pub fn clean_token(raw: &str) -> String {
    raw.chars()
        .filter(char::is_ascii_alphanumeric)
        .map(|c| c.to_ascii_lowercase())
        .collect()
}

///True if the token is non-empty and made of ASCII digits only.
pub fn is_digits(token: &str) -> bool {
    !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit())
}

///Turns raw corpus tokens into the analysis stream. Order is preserved.
/// # Example
/// ```
/// use collocations::normalize_tokens;
/// use std::collections::HashSet;
/// let stop: HashSet<String> = ["the".to_string()].into_iter().collect();
/// let words = ["The", "quick", ",", "Fox", "42", "x_1"];
/// assert_eq!(normalize_tokens(words, &stop), vec!["quick", "fox", "x1"]);
/// ```
pub fn normalize_tokens<I, S>(words: I, stopwords: &HashSet<String>) -> Vec<String>
where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
{
    words
        .into_iter()
        .map(|w| clean_token(w.as_ref()))
        .filter(|w| !w.is_empty() && !stopwords.contains(w) && !is_digits(w))
        .collect()
}
