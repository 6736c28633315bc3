//! Character folding, Vietnamese composition and text cleaning.
//!
//! All tables here are plain data built once and handed to the store and
//! its detectors; nothing is kept in process-wide statics.

use std::borrow::Cow;
use std::io::Read;

use memchr::{memchr, memmem};
use regex::Regex;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;

const URL_PATTERN: &str = r"https?://[-_.?&~;+=/#0-9A-Za-z]{1,2076}";
const MAIL_PATTERN: &str = r"[-_.0-9A-Za-z]{1,64}@[-_0-9A-Za-z]{1,255}[-_.0-9A-Za-z]{1,255}";

const VI_BASES: &str = "AEIOUYaeiouyÂÊÔâêôĂăƠơƯư";

/// Combining marks paired with the precomposed letters they produce, in
/// `VI_BASES` order.
const VI_COMPOSED: [(char, &str); 5] = [
    ('\u{0300}', "ÀÈÌÒÙỲàèìòùỳẦỀỒầềồẰằỜờỪừ"),
    ('\u{0301}', "ÁÉÍÓÚÝáéíóúýẤẾỐấếốẮắỚớỨứ"),
    ('\u{0303}', "ÃẼĨÕŨỸãẽĩõũỹẪỄỖẫễỗẴẵỠỡỮữ"),
    ('\u{0309}', "ẢẺỈỎỦỶảẻỉỏủỷẨỂỔẩểổẲẳỞởỬử"),
    ('\u{0323}', "ẠẸỊỌỤỴạẹịọụỵẬỆỘậệộẶặỢợỰự"),
];

/// Per-character folding table applied before n-grams are formed.
///
/// The block rules (ASCII punctuation to space, kana to a representative
/// character, and so on) are fixed. The parts that depend on external
/// data are fields and can be loaded from JSON:
///
/// ```json
/// { "latin1_excluded": [" ", "«", "°", "»"], "cjk_map": { "丟": "丁" } }
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ScriptFolding {
    /// Latin-1 Supplement characters treated as separators.
    pub latin1_excluded: SmallVec<[char; 4]>,
    /// Maps each CJK ideograph to the representative of its cluster.
    pub cjk_map: FxHashMap<char, char>,
}

impl Default for ScriptFolding {
    fn default() -> Self {
        Self {
            latin1_excluded: SmallVec::from_slice(&['\u{00A0}', '\u{00AB}', '\u{00B0}', '\u{00BB}']),
            cjk_map: FxHashMap::default(),
        }
    }
}

impl ScriptFolding {
    /// Reads a folding table from JSON. Missing fields keep their defaults.
    pub fn from_reader<R: Read>(reader: R) -> serde_json::Result<Self> {
        serde_json::from_reader(reader)
    }

    /// Folds one character to its canonical form.
    #[inline]
    pub fn fold(&self, c: char) -> char {
        match c as u32 {
            // Basic Latin: only letters survive
            0x0000..=0x007F => {
                if c.is_ascii_alphabetic() {
                    c
                } else {
                    ' '
                }
            }
            0x0080..=0x00FF => {
                if self.latin1_excluded.contains(&c) {
                    ' '
                } else {
                    c
                }
            }
            // Latin Extended-B: Romanian comma-below to cedilla
            0x0180..=0x024F => match c {
                '\u{0219}' => '\u{015F}',
                '\u{021B}' => '\u{0163}',
                _ => c,
            },
            // Arabic: Farsi yeh to Arabic yeh
            0x0600..=0x06FF => {
                if c == '\u{06CC}' {
                    '\u{064A}'
                } else {
                    c
                }
            }
            0x1E00..=0x1EFF => {
                if c >= '\u{1EA0}' {
                    '\u{1EC3}'
                } else {
                    c
                }
            }
            // General Punctuation
            0x2000..=0x206F => ' ',
            // Hiragana
            0x3040..=0x309F => '\u{3042}',
            // Katakana
            0x30A0..=0x30FF => '\u{30A2}',
            // Bopomofo and Bopomofo Extended
            0x3100..=0x312F | 0x31A0..=0x31BF => '\u{3105}',
            // CJK Unified Ideographs
            0x4E00..=0x9FFF => self.cjk_map.get(&c).copied().unwrap_or(c),
            // Hangul Syllables
            0xAC00..=0xD7AF => '\u{AC00}',
            _ => c,
        }
    }
}

/// Composes Vietnamese base letters followed by a combining tone mark into
/// the single precomposed letter.
#[derive(Debug, Clone)]
pub struct VietnameseComposer {
    pairs: FxHashMap<(char, char), char>,
}

impl Default for VietnameseComposer {
    fn default() -> Self {
        let mut pairs = FxHashMap::default();
        for (mark, composed) in VI_COMPOSED {
            for (base, target) in VI_BASES.chars().zip(composed.chars()) {
                pairs.insert((base, mark), target);
            }
        }
        Self { pairs }
    }
}

impl VietnameseComposer {
    #[inline]
    fn is_tone_mark(c: char) -> bool {
        matches!(c, '\u{0300}' | '\u{0301}' | '\u{0303}' | '\u{0309}' | '\u{0323}')
    }

    /// Returns the text with every base + mark pair composed.
    ///
    /// Borrows the input when there is nothing to compose.
    pub fn compose<'a>(&self, text: &'a str) -> Cow<'a, str> {
        if !text.chars().any(Self::is_tone_mark) {
            return Cow::Borrowed(text);
        }

        let mut out = String::with_capacity(text.len());
        let mut chars = text.chars().peekable();
        while let Some(c) = chars.next() {
            let composed = chars
                .peek()
                .and_then(|&next| self.pairs.get(&(c, next)).copied());
            match composed {
                Some(target) => {
                    out.push(target);
                    chars.next();
                }
                None => out.push(c),
            }
        }
        Cow::Owned(out)
    }
}

/// Text normalizer shared by training and detection.
///
/// Combines the whole-text Vietnamese composition with the per-character
/// [`ScriptFolding`] used by the n-gram window.
#[derive(Debug, Clone, Default)]
pub struct TextNormalizer {
    folding: ScriptFolding,
    vietnamese: VietnameseComposer,
}

impl TextNormalizer {
    /// Creates a normalizer over the given folding table.
    pub fn new(folding: ScriptFolding) -> Self {
        Self {
            folding,
            vietnamese: VietnameseComposer::default(),
        }
    }

    /// Applies whole-text canonicalization.
    #[inline]
    pub fn normalize<'a>(&self, text: &'a str) -> Cow<'a, str> {
        self.vietnamese.compose(text)
    }

    /// Folds a single character.
    #[inline]
    pub fn fold(&self, c: char) -> char {
        self.folding.fold(c)
    }

    /// The folding table in use.
    pub fn folding(&self) -> &ScriptFolding {
        &self.folding
    }
}

/// Masks URLs and e-mail addresses before text is buffered for detection.
#[derive(Debug, Clone)]
pub struct TextCleaner {
    url: Regex,
    mail: Regex,
}

impl Default for TextCleaner {
    fn default() -> Self {
        Self::new()
    }
}

impl TextCleaner {
    /// Compiles the masking patterns.
    pub fn new() -> Self {
        Self {
            url: Regex::new(URL_PATTERN).expect("URL pattern is valid"),
            mail: Regex::new(MAIL_PATTERN).expect("mail pattern is valid"),
        }
    }

    /// Replaces every URL and e-mail address with a single space.
    pub fn mask<'a>(&self, text: &'a str) -> Cow<'a, str> {
        let bytes = text.as_bytes();
        let mut out = Cow::Borrowed(text);

        if memmem::find(bytes, b"http").is_some() {
            let replaced = match self.url.replace_all(&out, " ") {
                Cow::Owned(s) => Some(s),
                Cow::Borrowed(_) => None,
            };
            if let Some(s) = replaced {
                out = Cow::Owned(s);
            }
        }
        if memchr(b'@', out.as_bytes()).is_some() {
            let replaced = match self.mail.replace_all(&out, " ") {
                Cow::Owned(s) => Some(s),
                Cow::Borrowed(_) => None,
            };
            if let Some(s) = replaced {
                out = Cow::Owned(s);
            }
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn fold(c: char) -> char {
        ScriptFolding::default().fold(c)
    }

    #[test]
    fn ascii_letters_kept() {
        assert_eq!(fold('a'), 'a');
        assert_eq!(fold('Z'), 'Z');
    }

    #[test]
    fn ascii_non_letters_become_space() {
        for c in ['1', '.', '-', '@', '\n', '[', '`'] {
            assert_eq!(fold(c), ' ', "{c:?}");
        }
    }

    #[test]
    fn latin1_separators() {
        assert_eq!(fold('\u{00A0}'), ' ');
        assert_eq!(fold('«'), ' ');
        assert_eq!(fold('é'), 'é');
    }

    #[test]
    fn romanian_comma_below() {
        assert_eq!(fold('\u{0219}'), '\u{015F}');
        assert_eq!(fold('\u{021B}'), '\u{0163}');
    }

    #[test]
    fn kana_and_hangul_collapse() {
        assert_eq!(fold('い'), 'あ');
        assert_eq!(fold('ン'), 'ア');
        assert_eq!(fold('한'), '\u{AC00}');
        assert_eq!(fold('ㄅ'), '\u{3105}');
    }

    #[test]
    fn general_punctuation_is_space() {
        assert_eq!(fold('\u{2014}'), ' ');
        assert_eq!(fold('\u{201C}'), ' ');
    }

    #[test]
    fn vietnamese_extended_additional() {
        assert_eq!(fold('\u{1EA1}'), '\u{1EC3}');
        assert_eq!(fold('\u{1E00}'), '\u{1E00}');
    }

    #[test]
    fn farsi_yeh() {
        assert_eq!(fold('\u{06CC}'), '\u{064A}');
    }

    #[test]
    fn cjk_map_is_injectable() {
        let mut folding = ScriptFolding::default();
        assert_eq!(folding.fold('丟'), '丟');
        folding.cjk_map.insert('丟', '丁');
        assert_eq!(folding.fold('丟'), '丁');
    }

    #[test]
    fn folding_from_json() {
        let json = r#"{ "cjk_map": { "丟": "丁" } }"#;
        let folding = ScriptFolding::from_reader(json.as_bytes()).expect("valid json");
        assert_eq!(folding.fold('丟'), '丁');
        // defaults survive a partial document
        assert_eq!(folding.fold('\u{00A0}'), ' ');
    }

    #[test]
    fn vietnamese_composition() {
        let composer = VietnameseComposer::default();
        assert_eq!(composer.compose("a\u{0300}"), "à");
        assert_eq!(composer.compose("Vie\u{0323}t"), "Vi\u{1EB9}t");
        assert_eq!(composer.compose("Vi\u{00EA}\u{0323}t"), "Vi\u{1EC7}t");
        assert_eq!(composer.compose("ơ\u{0309}"), "ở");
    }

    #[test]
    fn vietnamese_borrows_when_unchanged() {
        let composer = VietnameseComposer::default();
        assert!(matches!(composer.compose("hello"), Cow::Borrowed(_)));
        // a mark after a non-base letter is left alone
        assert_eq!(composer.compose("b\u{0300}"), "b\u{0300}");
    }

    #[test]
    fn mask_url() {
        let cleaner = TextCleaner::new();
        assert_eq!(cleaner.mask("see http://example.com/x?a=1 now"), "see   now");
        assert_eq!(cleaner.mask("https://a.b"), " ");
    }

    #[test]
    fn mask_mail() {
        let cleaner = TextCleaner::new();
        assert_eq!(cleaner.mask("mail foo.bar@example.org ok"), "mail   ok");
    }

    #[test]
    fn mask_leaves_plain_text_borrowed() {
        let cleaner = TextCleaner::new();
        assert!(matches!(cleaner.mask("plain text"), Cow::Borrowed(_)));
        assert!(matches!(cleaner.mask("http is a protocol"), Cow::Borrowed(_)));
    }
}
