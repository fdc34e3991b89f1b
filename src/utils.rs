// src/utils.rs

/// Collapse whitespace for multi-line bodies: a whitespace run that contains a
/// line break becomes a single `\n`, any other run becomes a single space.
/// Leading and trailing whitespace is removed.
pub fn normalize_whitespace(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending: Option<char> = None;

    for c in text.chars() {
        if c.is_whitespace() {
            let is_break = c == '\n' || c == '\r';
            pending = match pending {
                Some('\n') => Some('\n'),
                _ if is_break => Some('\n'),
                _ => Some(' '),
            };
        } else {
            if let Some(sep) = pending.take() {
                if !out.is_empty() {
                    out.push(sep);
                }
            }
            out.push(c);
        }
    }

    out
}

/// Collapse every whitespace run (line breaks included) into one space.
pub fn collapse_to_line(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Uppercase the first character, leave the rest untouched.
pub fn capitalize_first(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Get file extension in lowercase
pub fn get_file_extension(filename: &str) -> Option<String> {
    std::path::Path::new(filename)
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_lowercase())
}

/// Character count, which is what every length threshold in the crate uses.
pub fn char_len(text: &str) -> usize {
    text.chars().count()
}
