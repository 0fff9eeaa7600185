//! Anchor names for section headers.

/// Convert header text to an in-page anchor name
///
/// Rules:
/// - Lowercase
/// - Replace spaces with underscores
/// - Remove commas
///
/// Every other character is kept as is.
///
/// # Examples
///
/// ```
/// use rstbuild_core::slugify;
///
/// assert_eq!(slugify("Getting Started, Fast"), "getting_started_fast");
/// assert_eq!(slugify("API"), "api");
/// ```
pub fn slugify(input: &str) -> String {
    input
        .to_lowercase()
        .chars()
        .filter(|c| *c != ',')
        .map(|c| if c == ' ' { '_' } else { c })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_slugify() {
        assert_eq!(slugify("Getting Started, Fast"), "getting_started_fast");
        assert_eq!(slugify("API"), "api");
        assert_eq!(slugify("Hello World"), "hello_world");
    }

    #[test]
    fn test_other_punctuation_is_kept() {
        assert_eq!(slugify("C++ & Rust?"), "c++_&_rust?");
        assert_eq!(slugify("node.js"), "node.js");
        assert_eq!(slugify("a-b"), "a-b");
    }

    #[test]
    fn test_spaces_are_not_collapsed() {
        assert_eq!(slugify("a  b"), "a__b");
        assert_eq!(slugify(" lead"), "_lead");
    }

    #[test]
    fn test_tabs_are_kept() {
        assert_eq!(slugify("a\tb"), "a\tb");
    }

    #[test]
    fn test_empty_and_commas_only() {
        assert_eq!(slugify(""), "");
        assert_eq!(slugify(",,,"), "");
    }
}
