/// Default character bound for a rendered word.
pub const DEFAULT_MAX_RENDER_LEN: usize = 150;

/// Marker appended when a rendering had to be cut.
const ELLIPSIS: &str = "...";

/// Renders an arbitrary byte-string as a bounded, safe-to-print form.
///
/// Words that decode as non-empty printable UTF-8 come back quoted with a
/// single leading space, so a report line reads `2: "cat"`; everything else
/// falls back to an escaped byte-sequence form (`b"\xff\x00"`), visually
/// distinct from the quoted shape.
///
/// Total over all inputs: no byte content can make it panic, and the result
/// never exceeds `max_chars` characters.
pub fn render_word(word: &[u8], max_chars: usize) -> String {
    let rendered = match printable_text(word) {
        Some(text) => format!(" \"{text}\""),
        None => format!("b\"{}\"", word.escape_ascii()),
    };
    bound_chars(rendered, max_chars)
}

/// The decoded form of `word`, if it is non-empty printable UTF-8.
/// Control characters (including `\n`, `\t`, NUL) disqualify a word here and
/// push it down the escaped-bytes path.
fn printable_text(word: &[u8]) -> Option<&str> {
    let text = std::str::from_utf8(word).ok()?;
    if !text.is_empty() && text.chars().all(|c| !c.is_control()) {
        Some(text)
    } else {
        None
    }
}

/// Truncates `rendered` to at most `max_chars` characters, marking the cut
/// with an ellipsis. A truncated result is exactly `max_chars` long.
fn bound_chars(rendered: String, max_chars: usize) -> String {
    if rendered.chars().count() <= max_chars {
        return rendered;
    }
    if max_chars <= ELLIPSIS.len() {
        return ELLIPSIS.chars().take(max_chars).collect();
    }
    let mut bounded: String = rendered.chars().take(max_chars - ELLIPSIS.len()).collect();
    bounded.push_str(ELLIPSIS);
    bounded
}
