/// Split segment text into fixed-size citation chunks.
///
/// Chunks are measured in bytes but never split inside a UTF-8 character, and
/// no chunk is ever empty or whitespace-only.
pub fn split_into_chunks(text: &str, chunk_size: usize) -> Vec<String> {
    let chunk_size = chunk_size.max(1);
    let mut out = Vec::new();
    let mut rest = text;
    while !rest.is_empty() {
        if rest.len() <= chunk_size {
            push_non_blank(&mut out, rest);
            break;
        }
        let mut cut = chunk_size;
        while cut > 0 && !rest.is_char_boundary(cut) {
            cut -= 1;
        }
        if cut == 0 {
            // First char is wider than the chunk size; take it whole.
            cut = rest
                .char_indices()
                .nth(1)
                .map(|(i, _)| i)
                .unwrap_or(rest.len());
        }
        push_non_blank(&mut out, &rest[..cut]);
        rest = &rest[cut..];
    }
    out
}

fn push_non_blank(out: &mut Vec<String>, piece: &str) {
    if !piece.trim().is_empty() {
        out.push(piece.to_string());
    }
}

#[cfg(test)]
mod tests {
    use super::split_into_chunks;
    use pretty_assertions::assert_eq;

    #[test]
    fn short_text_is_a_single_chunk() {
        assert_eq!(split_into_chunks("short", 512), vec!["short".to_string()]);
    }

    #[test]
    fn long_text_splits_at_the_configured_size() {
        let text = "a".repeat(1100);
        let chunks = split_into_chunks(&text, 512);
        assert_eq!(chunks.len(), 3);
        assert_eq!(chunks[0].len(), 512);
        assert_eq!(chunks[1].len(), 512);
        assert_eq!(chunks[2].len(), 76);
    }

    #[test]
    fn never_splits_inside_a_utf8_character() {
        let text = "é".repeat(300); // 2 bytes each
        for chunk in split_into_chunks(&text, 511) {
            assert!(chunk.chars().all(|c| c == 'é'));
        }
    }

    #[test]
    fn never_yields_empty_or_blank_chunks() {
        assert!(split_into_chunks("", 512).is_empty());
        for chunk in split_into_chunks(&"x ".repeat(600), 512) {
            assert!(!chunk.trim().is_empty());
        }
    }
}
