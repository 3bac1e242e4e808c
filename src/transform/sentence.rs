//! Sentence splitting for sentence-level splices.

/// Split text into sentences.
///
/// A boundary is a whitespace run directly preceded by a period. The
/// whitespace itself is dropped; empty pieces are skipped.
pub fn split_sentences(text: &str) -> Vec<&str> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut prev: Option<char> = None;
    let mut chars = text.char_indices().peekable();

    while let Some((idx, ch)) = chars.next() {
        if ch.is_whitespace() && prev == Some('.') {
            push_piece(&mut sentences, &text[start..idx]);
            let mut end = idx + ch.len_utf8();
            while let Some(&(next_idx, next)) = chars.peek() {
                if !next.is_whitespace() {
                    break;
                }
                end = next_idx + next.len_utf8();
                chars.next();
            }
            start = end;
            prev = None;
            continue;
        }
        prev = Some(ch);
    }
    push_piece(&mut sentences, &text[start..]);

    sentences
}

fn push_piece<'a>(sentences: &mut Vec<&'a str>, piece: &'a str) {
    if !piece.trim().is_empty() {
        sentences.push(piece);
    }
}
