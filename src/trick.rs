//! Trick code translation. Codes like `f-1080-Mu+b-5-St` pack one or more
//! tricks (`+`-joined) of `-`-separated descriptor tokens. The translator is
//! pure and stateless: it tokenizes, merges the two lookahead pairs the
//! notation allows, and glosses each token through a fixed dictionary.

/// Separator between gloss words (a middle dot, as used on the event sheets).
const GLOSS_SEP: &str = "・";

/// Rotation directions, stances, spin families, grabs, and connector words.
/// Tokens absent from this table contribute nothing to the gloss but stay
/// visible in the raw breakdown.
const TOKEN_WORDS: &[(&str, &str)] = &[
    // rotation direction / stance
    ("f", "フロントサイド"),
    ("fs", "フロントサイド"),
    ("b", "バックサイド"),
    ("bs", "バックサイド"),
    ("sw", "スイッチ"),
    ("cab", "キャブ"),
    // spin families
    ("cork", "コーク"),
    ("dub", "ダブルコーク"),
    ("trip", "トリプルコーク"),
    ("rodeo", "ロデオ"),
    ("misty", "ミスティ"),
    ("flat", "フラットスピン"),
    // grabs
    ("Mu", "ミュート"),
    ("In", "インディ"),
    ("St", "ステイルフィッシュ"),
    ("Me", "メランコリー"),
    ("Ta", "テールグラブ"),
    ("No", "ノーズグラブ"),
    ("Ja", "ジャパン"),
    ("Tru", "トラックドライバー"),
    // rail approaches / connectors
    ("2-on", "ツーオン"),
    ("to-fakie", "トゥフェイキー"),
    ("to-sw", "トゥスイッチ"),
    ("to-regular", "トゥレギュラー"),
    ("+", "＋"),
];

/// Half-rotation counts to spin degrees.
const SPIN_DEGREES: &[(&str, &str)] = &[
    ("1", "180°"),
    ("3", "360°"),
    ("5", "540°"),
    ("7", "720°"),
    ("9", "900°"),
    ("10", "1080°"),
    ("12", "1260°"),
];

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TrickGloss {
    /// Human-readable reading, empty when no token mapped.
    pub gloss: String,
    /// Original code with `+` visually spaced, empty only for empty input.
    pub breakdown: String,
}

impl TrickGloss {
    pub fn is_empty(&self) -> bool {
        self.gloss.is_empty() && self.breakdown.is_empty()
    }
}

/// Translate a trick code into a gloss plus its raw breakdown. Empty input
/// yields an empty result (no tooltip); a code where nothing maps yields the
/// breakdown alone.
pub fn translate(code: &str) -> TrickGloss {
    let collapsed: String = code.chars().filter(|c| !c.is_whitespace()).collect();
    if collapsed.is_empty() {
        return TrickGloss::default();
    }

    let segments: Vec<Vec<String>> = collapsed
        .split('+')
        .map(segment_tokens)
        .filter(|tokens| !tokens.is_empty())
        .collect();

    let mut tokens: Vec<String> = Vec::new();
    for (i, segment) in segments.iter().enumerate() {
        if i > 0 {
            tokens.push("+".to_string());
        }
        tokens.extend(segment.iter().cloned());
    }

    let words: Vec<&str> = tokens
        .iter()
        .filter_map(|token| token_word(token))
        .collect();

    let breakdown = collapsed.replace('+', " + ");
    // Connector glyphs alone do not make a reading.
    if words.iter().all(|w| *w == "＋") {
        return TrickGloss {
            gloss: String::new(),
            breakdown,
        };
    }
    TrickGloss {
        gloss: words.join(GLOSS_SEP),
        breakdown,
    }
}

/// Split one trick segment on `-`, dropping empty tokens, then merge the two
/// lookahead pairs: `2` followed by `on` becomes `2-on`, and `to` consumes
/// whatever follows it as `to-<next>`.
fn segment_tokens(segment: &str) -> Vec<String> {
    let raw: Vec<&str> = segment.split('-').filter(|t| !t.is_empty()).collect();
    let mut out = Vec::with_capacity(raw.len());
    let mut i = 0;
    while i < raw.len() {
        match raw[i] {
            "2" if raw.get(i + 1) == Some(&"on") => {
                out.push("2-on".to_string());
                i += 2;
            }
            "to" if i + 1 < raw.len() => {
                out.push(format!("to-{}", raw[i + 1]));
                i += 2;
            }
            tok => {
                out.push(tok.to_string());
                i += 1;
            }
        }
    }
    out
}

fn token_word(token: &str) -> Option<&'static str> {
    if !token.is_empty() && token.chars().all(|c| c.is_ascii_digit()) {
        return SPIN_DEGREES
            .iter()
            .find(|(key, _)| *key == token)
            .map(|(_, word)| *word);
    }
    TOKEN_WORDS
        .iter()
        .find(|(key, _)| *key == token)
        .map(|(_, word)| *word)
}
