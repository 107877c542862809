//! Field parsing for free-text campaign inputs.
//!
//! Empty input is never an error: every parser simply returns an empty list
//! and the alignment step falls back to the global defaults.

/// Split on commas, semicolons or newlines, trimming each token and dropping
/// empty ones.
pub fn parse_list(raw: &str) -> Vec<String> {
    raw.split(|c| matches!(c, ',' | ';' | '\n'))
        .map(str::trim)
        .filter(|token| !token.is_empty())
        .map(str::to_string)
        .collect()
}

/// Parse a recipient list.
///
/// Tokens without an `@` are dropped silently and do not count as recipients.
pub fn parse_recipients(raw: &str) -> Vec<String> {
    parse_list(raw)
        .into_iter()
        .filter(|token| token.contains('@'))
        .collect()
}

/// Parse paragraph-separated message blocks.
///
/// Blocks are separated by two or more consecutive newlines. Single newlines
/// stay inside the block text.
pub fn parse_message_blocks(raw: &str) -> Vec<String> {
    let normalized = raw.replace("\r\n", "\n");

    // A run of three or more newlines leaves leading newlines on the next
    // piece, which the trim removes.
    normalized
        .split("\n\n")
        .map(str::trim)
        .filter(|block| !block.is_empty())
        .map(str::to_string)
        .collect()
}
