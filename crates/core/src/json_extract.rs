//! Locate a JSON object embedded in free-form model output.
//!
//! Text-generation models often wrap the requested JSON in prose or code
//! fences. [`first_json_object`] returns the first balanced `{ ... }` span,
//! ignoring braces that appear inside string literals.

/// Return the first balanced `{ ... }` span in `text`, if any.
///
/// Brace counting skips over JSON string literals (including escaped
/// quotes), so `{"a": "}"}` is returned whole. An opening brace that is
/// never closed yields `None`.
pub fn first_json_object(text: &str) -> Option<&str> {
    let start = text.find('{')?;
    let mut depth = 0usize;
    let mut in_string = false;
    let mut escaped = false;

    for (offset, c) in text[start..].char_indices() {
        if in_string {
            match c {
                _ if escaped => escaped = false,
                '\\' => escaped = true,
                '"' => in_string = false,
                _ => {}
            }
            continue;
        }

        match c {
            '"' => in_string = true,
            '{' => depth += 1,
            '}' => {
                depth -= 1;
                if depth == 0 {
                    let end = start + offset + c.len_utf8();
                    return Some(&text[start..end]);
                }
            }
            _ => {}
        }
    }

    None
}
