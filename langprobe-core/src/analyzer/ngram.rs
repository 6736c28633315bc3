//! Sliding-window n-gram extraction.
//!
//! Characters are folded as they enter the window. The window holds at
//! most three characters and restarts from a space sentinel at every word
//! boundary, so grams never reach across more than one boundary.

use langprobe_types::Gram;
use smallvec::SmallVec;

use crate::analyzer::normalizer::ScriptFolding;

/// Stateful 1..=3 character window over a single text.
///
/// A window is driven across one text exactly once; use a fresh window for
/// every text.
///
/// # Example
///
/// ```
/// use langprobe_core::analyzer::{NGramWindow, ScriptFolding};
///
/// let folding = ScriptFolding::default();
/// let mut window = NGramWindow::new(&folding);
/// window.add_char('a');
/// assert_eq!(window.get(1).map(|g| g.to_string()), Some("a".to_string()));
/// assert_eq!(window.get(2).map(|g| g.to_string()), Some(" a".to_string()));
/// assert!(window.get(3).is_none());
/// ```
pub struct NGramWindow<'f> {
    folding: &'f ScriptFolding,
    grams: SmallVec<[char; Gram::MAX_LEN]>,
    capital_word: bool,
}

impl<'f> NGramWindow<'f> {
    /// Creates an empty window holding only the leading space sentinel.
    pub fn new(folding: &'f ScriptFolding) -> Self {
        let mut grams = SmallVec::new();
        grams.push(' ');
        Self {
            folding,
            grams,
            capital_word: false,
        }
    }

    /// Folds and appends one character.
    pub fn add_char(&mut self, c: char) {
        let c = self.folding.fold(c);
        let last = self.grams.last().copied().unwrap_or(' ');

        if last == ' ' {
            self.grams.clear();
            self.grams.push(' ');
            self.capital_word = false;
            if c == ' ' {
                return;
            }
        } else if self.grams.len() >= Gram::MAX_LEN {
            self.grams.remove(0);
        }
        self.grams.push(c);

        if c.is_uppercase() {
            if last.is_uppercase() {
                self.capital_word = true;
            }
        } else {
            self.capital_word = false;
        }
    }

    /// Returns the trailing gram of length `n`, if there is one.
    ///
    /// Yields nothing inside an all-capitals word, for a lone space, or when
    /// fewer than `n` characters are buffered.
    pub fn get(&self, n: usize) -> Option<Gram> {
        if self.capital_word {
            return None;
        }
        let len = self.grams.len();
        if n < 1 || n > Gram::MAX_LEN || len < n {
            return None;
        }
        if n == 1 {
            let c = self.grams[len - 1];
            if c == ' ' {
                return None;
            }
            return Gram::from_chars(&[c]);
        }
        Gram::from_chars(&self.grams[len - n..])
    }
}

/// Drives a fresh window across `text`, emitting every gram of length 1..=3
/// at every position, in order.
#[inline]
pub fn extract_ngrams<F>(folding: &ScriptFolding, text: &str, mut callback: F)
where
    F: FnMut(Gram),
{
    let mut window = NGramWindow::new(folding);
    for c in text.chars() {
        window.add_char(c);
        for n in 1..=Gram::MAX_LEN {
            if let Some(gram) = window.get(n) {
                callback(gram);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grams(text: &str) -> Vec<String> {
        let folding = ScriptFolding::default();
        let mut out = Vec::new();
        extract_ngrams(&folding, text, |g| out.push(g.to_string()));
        out
    }

    #[test]
    fn window_basic() {
        let folding = ScriptFolding::default();
        let mut w = NGramWindow::new(&folding);
        assert!(w.get(0).is_none());
        assert!(w.get(1).is_none());
        assert!(w.get(2).is_none());
        assert!(w.get(4).is_none());

        w.add_char('a');
        assert_eq!(w.get(1).map(|g| g.to_string()).as_deref(), Some("a"));
        assert_eq!(w.get(2).map(|g| g.to_string()).as_deref(), Some(" a"));
        assert!(w.get(3).is_none());

        w.add_char('b');
        assert_eq!(w.get(1).map(|g| g.to_string()).as_deref(), Some("b"));
        assert_eq!(w.get(2).map(|g| g.to_string()).as_deref(), Some("ab"));
        assert_eq!(w.get(3).map(|g| g.to_string()).as_deref(), Some(" ab"));

        w.add_char('c');
        assert_eq!(w.get(3).map(|g| g.to_string()).as_deref(), Some("abc"));

        w.add_char(' ');
        assert!(w.get(1).is_none());
        assert_eq!(w.get(2).map(|g| g.to_string()).as_deref(), Some("c "));
        assert_eq!(w.get(3).map(|g| g.to_string()).as_deref(), Some("bc "));

        w.add_char('d');
        assert_eq!(w.get(1).map(|g| g.to_string()).as_deref(), Some("d"));
        assert_eq!(w.get(2).map(|g| g.to_string()).as_deref(), Some(" d"));
        assert!(w.get(3).is_none());
    }

    #[test]
    fn punctuation_acts_as_boundary() {
        assert_eq!(grams("a.b"), vec!["a", " a", "a ", " a ", "b", " b"]);
    }

    #[test]
    fn repeated_spaces_are_dropped() {
        assert_eq!(grams("a  b"), grams("a b"));
    }

    #[test]
    fn capital_words_are_skipped() {
        let folding = ScriptFolding::default();
        let mut w = NGramWindow::new(&folding);
        w.add_char('A');
        assert!(w.get(1).is_some());
        w.add_char('B');
        assert!(w.get(1).is_none());
        assert!(w.get(2).is_none());
        w.add_char('c');
        assert_eq!(w.get(1).map(|g| g.to_string()).as_deref(), Some("c"));
    }

    #[test]
    fn kana_folded_in_window() {
        assert_eq!(grams("い"), vec!["あ", " あ"]);
    }

    #[test]
    fn empty_text_yields_nothing() {
        assert!(grams("").is_empty());
        assert!(grams("   ").is_empty());
        assert!(grams("1234").is_empty());
    }
}
