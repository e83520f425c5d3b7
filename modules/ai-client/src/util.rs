/// Truncate a string to at most `max_bytes` bytes at a character boundary.
pub fn truncate_to_char_boundary(s: &str, max_bytes: usize) -> &str {
    if s.len() <= max_bytes {
        return s;
    }
    let mut end = max_bytes;
    while !s.is_char_boundary(end) && end > 0 {
        end -= 1;
    }
    &s[..end]
}

/// Strip a surrounding markdown code fence (```` ``` ```` or ```` ```json ````) from a response.
pub fn strip_code_blocks(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(rest) = trimmed.strip_prefix("```") else {
        return trimmed;
    };
    // Drop the info string ("json", "JSON", ...) whether or not a newline follows it.
    let info_len = rest
        .find(|c: char| !c.is_ascii_alphanumeric())
        .unwrap_or(rest.len());
    let body = rest[info_len..].trim();
    body.strip_suffix("```").unwrap_or(body).trim()
}

/// Remove double quotes and surrounding whitespace from a one-line reply.
pub fn strip_quotes(reply: &str) -> String {
    reply.trim().replace('"', "")
}
