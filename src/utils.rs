/// Longest file name (in bytes) produced by `sanitize_filename`
const MAX_FILENAME_BYTES: usize = 100;

/// Convert an untrusted string (header value, page heading) to a safe file name
///
/// Path separators, reserved characters and control characters become `_`,
/// leading dots are stripped so the result can never be `..` or hidden, and
/// the length is capped on a character boundary. Returns an empty string if
/// nothing usable is left.
pub fn sanitize_filename(name: &str) -> String {
    let replaced: String = name
        .trim()
        .chars()
        .map(|c| match c {
            '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '_',
            c if c.is_control() => '_',
            c => c,
        })
        .collect();
    let trimmed = replaced.trim_start_matches('.').trim();

    let mut end = trimmed.len().min(MAX_FILENAME_BYTES);
    while !trimmed.is_char_boundary(end) {
        end -= 1;
    }
    trimmed[..end].trim_end().to_string()
}

/// Collapse whitespace runs to single spaces and trim, approximating rendered text
pub fn normalize_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}
