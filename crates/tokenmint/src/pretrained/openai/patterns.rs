//! # `OpenAI` Patterns

use crate::regex::ConstRegexWrapperPattern;

/// The "`r50k_base`" pretrained vocabulary piece pattern.
///
/// Possessive quantifiers keep `fancy-regex` from backtracking into
/// letter, number, and symbol runs.
pub const OA_R50K_BASE_PATTERN: ConstRegexWrapperPattern = ConstRegexWrapperPattern::Fancy(concat!(
    r"'(?:[sdmt]|ll|ve|re)",
    r"| ?\p{L}++",
    r"| ?\p{N}++",
    r"| ?[^\s\p{L}\p{N}]++",
    r"|\s++$",
    r"|\s+(?!\S)",
    r"|\s",
));

/// The "`p50k_base`" pretrained vocabulary piece pattern.
pub const OA_P50K_BASE_PATTERN: ConstRegexWrapperPattern = OA_R50K_BASE_PATTERN;

/// The "`cl100k_base`" pretrained vocabulary piece pattern.
pub const OA_CL100K_BASE_PATTERN: ConstRegexWrapperPattern =
    ConstRegexWrapperPattern::Fancy(concat!(
        r"'(?i:[sdmt]|ll|ve|re)",
        r"|[^\r\n\p{L}\p{N}]?+\p{L}++",
        r"|\p{N}{1,3}+",
        r"| ?[^\s\p{L}\p{N}]++[\r\n]*+",
        r"|\s++$",
        r"|\s*[\r\n]",
        r"|\s+(?!\S)",
        r"|\s",
    ));

#[cfg(test)]
mod tests {
    use super::*;

    fn pieces<'a>(
        pattern: ConstRegexWrapperPattern,
        text: &'a str,
    ) -> Vec<&'a str> {
        let re = pattern.to_pattern().compile().unwrap();
        re.find_iter(text).map(|m| &text[m.unwrap()]).collect()
    }

    #[test]
    fn test_patterns_compile() {
        assert!(OA_R50K_BASE_PATTERN.to_pattern().compile().is_ok());
        assert!(OA_P50K_BASE_PATTERN.to_pattern().compile().is_ok());
        assert!(OA_CL100K_BASE_PATTERN.to_pattern().compile().is_ok());
    }

    #[test]
    fn test_r50k_pieces() {
        assert_eq!(
            pieces(OA_R50K_BASE_PATTERN, "Hello world, it's 2024!  ok"),
            vec!["Hello", " world", ",", " it", "'s", " 2024", "!", " ", " ok"]
        );
    }

    #[test]
    fn test_cl100k_pieces() {
        assert_eq!(
            pieces(OA_CL100K_BASE_PATTERN, "Hello world, IT'S 12345!\n\nok "),
            vec!["Hello", " world", ",", " IT", "'S", " ", "123", "45", "!\n\n", "ok", " "]
        );
    }
}
