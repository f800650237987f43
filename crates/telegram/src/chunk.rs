/// Longest text Telegram accepts in one message, in characters.
pub const TELEGRAM_MAX_MESSAGE_LEN: usize = 4096;

/// Split `text` into pieces of at most `max_chars` characters, preferring
/// line breaks. A single line longer than the limit is cut mid-line.
pub fn split_message(text: &str, max_chars: usize) -> Vec<String> {
    if max_chars == 0 {
        return Vec::new();
    }
    if text.chars().count() <= max_chars {
        return vec![text.to_string()];
    }

    let mut chunks = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for line in text.split('\n') {
        let line_len = line.chars().count();
        let needed = if current.is_empty() {
            line_len
        } else {
            line_len + 1
        };

        if current_len + needed <= max_chars {
            if !current.is_empty() {
                current.push('\n');
            }
            current.push_str(line);
            current_len += needed;
            continue;
        }

        if !current.is_empty() {
            chunks.push(std::mem::take(&mut current));
            current_len = 0;
        }

        let mut rest = line;
        while rest.chars().count() > max_chars {
            let cut = rest
                .char_indices()
                .nth(max_chars)
                .map_or(rest.len(), |(i, _)| i);
            chunks.push(rest[..cut].to_string());
            rest = &rest[cut..];
        }
        current.push_str(rest);
        current_len = rest.chars().count();
    }

    if !current.is_empty() {
        chunks.push(current);
    }
    chunks
}
