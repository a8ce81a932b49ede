//! Extraction of executable source from reasoner completions.
//!
//! Completions often wrap code in markdown fences; the repair flow needs the
//! bare source. The contract here is deliberately small: the first fenced
//! block wins, fences are line-oriented, and text without delimiters passes
//! through trimmed.

use std::sync::LazyLock;

use regex::Regex;

static FENCED_BLOCK_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?s)```[^\n`]*\n(.*?)```").expect("fence pattern is valid"));

/// Strip surrounding formatting delimiters from a completion.
///
/// A fenced code block (opening fence with an optional language tag on its
/// own line) yields the inner text, trimmed; the first block wins. An
/// opening fence without a closing fence yields everything after the fence
/// line, trimmed. Text without any fence is returned trimmed, unchanged.
pub fn extract_code(text: &str) -> String {
    if let Some(caps) = FENCED_BLOCK_RE.captures(text) {
        return caps[1].trim().to_string();
    }
    if let Some(idx) = text.find("```") {
        let after = &text[idx..];
        let body = match after.find('\n') {
            Some(newline) => &after[newline + 1..],
            None => "",
        };
        let body = match body.find("```") {
            Some(end) => &body[..end],
            None => body,
        };
        return body.trim().to_string();
    }
    text.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn strips_language_tagged_fence() {
        let text = "Here you go:\n```python\nprint('hi')\n```\nHope that helps.";
        assert_eq!(extract_code(text), "print('hi')");
    }

    #[test]
    fn strips_untagged_fence() {
        let text = "```\nx = 1\ny = 2\n```";
        assert_eq!(extract_code(text), "x = 1\ny = 2");
    }

    #[test]
    fn first_block_wins() {
        let text = "```\nfirst\n```\nand then\n```\nsecond\n```";
        assert_eq!(extract_code(text), "first");
    }

    #[test]
    fn unterminated_fence_keeps_trailing_body() {
        let text = "```python\nprint('hi')";
        assert_eq!(extract_code(text), "print('hi')");
    }

    #[test]
    fn plain_text_passes_through_trimmed() {
        assert_eq!(extract_code("  print('hi')  \n"), "print('hi')");
    }

    #[test]
    fn empty_input_stays_empty() {
        assert_eq!(extract_code(""), "");
        assert_eq!(extract_code("```python\n```"), "");
    }
}
