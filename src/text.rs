//! Splitting headings into characters and paragraphs into words so each
//! piece can be staggered.

/// A run of text; only `animated` pieces get their own span.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Piece<'a> {
    pub text: &'a str,
    pub animated: bool,
}

/// One animated piece per non-whitespace char; whitespace runs stay inert.
pub fn split_chars(text: &str) -> Vec<Piece<'_>> {
    let mut out = Vec::new();
    let mut ws_start: Option<usize> = None;
    for (i, c) in text.char_indices() {
        if c.is_whitespace() {
            if ws_start.is_none() {
                ws_start = Some(i);
            }
            continue;
        }
        if let Some(start) = ws_start.take() {
            out.push(Piece { text: &text[start..i], animated: false });
        }
        out.push(Piece { text: &text[i..i + c.len_utf8()], animated: true });
    }
    if let Some(start) = ws_start {
        out.push(Piece { text: &text[start..], animated: false });
    }
    out
}

/// One animated piece per whitespace-separated word.
pub fn split_words(text: &str) -> Vec<Piece<'_>> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut in_word = false;
    for (i, c) in text.char_indices() {
        let ws = c.is_whitespace();
        if i > start && ws == in_word {
            out.push(Piece { text: &text[start..i], animated: in_word });
            start = i;
        }
        in_word = !ws;
    }
    if start < text.len() {
        out.push(Piece { text: &text[start..], animated: in_word });
    }
    out
}

/// Number of animated pieces.
pub fn animated_count(pieces: &[Piece<'_>]) -> usize {
    pieces.iter().filter(|p| p.animated).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn texts<'a>(pieces: &[Piece<'a>]) -> Vec<&'a str> {
        pieces.iter().map(|p| p.text).collect()
    }

    #[test]
    fn chars_keep_spaces_inert() {
        let p = split_chars("Hi  yo");
        assert_eq!(texts(&p), ["H", "i", "  ", "y", "o"]);
        assert_eq!(animated_count(&p), 4);
        assert!(!p[2].animated);
    }

    #[test]
    fn chars_handle_multibyte() {
        let p = split_chars("né");
        assert_eq!(texts(&p), ["n", "é"]);
    }

    #[test]
    fn words_preserve_whitespace() {
        let p = split_words(" build  fast things ");
        assert_eq!(texts(&p), [" ", "build", "  ", "fast", " ", "things", " "]);
        assert_eq!(animated_count(&p), 3);
        assert_eq!(p.iter().map(|p| p.text).collect::<String>(), " build  fast things ");
    }

    #[test]
    fn empty_text() {
        assert!(split_chars("").is_empty());
        assert!(split_words("").is_empty());
    }
}
