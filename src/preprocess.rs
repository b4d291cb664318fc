//! Emoji-aware text preprocessing.
//!
//! Every utterance passes through here before reaching the engine. The goal
//! is to clean chat noise without mangling emoji or other non-ASCII text:
//! whitespace runs collapse to a single space, control and zero-width
//! characters are dropped, everything else is preserved as typed.

/// Zero-width and joiner-adjacent characters that leak out of chat clients.
/// U+200D (zero-width joiner) is kept: it glues compound emoji together.
const ZERO_WIDTH: [char; 4] = ['\u{200B}', '\u{200C}', '\u{FEFF}', '\u{2060}'];

/// Normalize an utterance for the engine.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if c.is_control() || ZERO_WIDTH.contains(&c) {
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plain_text_untouched() {
        assert_eq!(normalize("hello there"), "hello there");
    }

    #[test]
    fn test_collapses_whitespace_runs() {
        assert_eq!(normalize("hello   there"), "hello there");
        assert_eq!(normalize("one\t\ttwo\n\nthree"), "one two three");
    }

    #[test]
    fn test_trims_edges() {
        assert_eq!(normalize("  padded  "), "padded");
        assert_eq!(normalize("\n\nleading"), "leading");
    }

    #[test]
    fn test_preserves_emoji() {
        assert_eq!(normalize("hi 👋 bot 🤖"), "hi 👋 bot 🤖");
        // Compound emoji use U+200D internally and must survive
        assert_eq!(normalize("👨‍👩‍👧"), "👨‍👩‍👧");
    }

    #[test]
    fn test_strips_zero_width_characters() {
        assert_eq!(normalize("spam\u{200B}word"), "spamword");
        assert_eq!(normalize("\u{FEFF}bom"), "bom");
    }

    #[test]
    fn test_strips_control_characters() {
        assert_eq!(normalize("a\u{0007}b"), "ab");
    }

    #[test]
    fn test_empty_and_whitespace_only() {
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("   \n\t "), "");
    }
}
