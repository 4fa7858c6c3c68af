/*!
 * Output clean-up for model translations.
 *
 * Marian and NLLB models frequently emit tokenization spaces inside Japanese
 * text. `detokenize_japanese` removes them and restores full-width
 * punctuation.
 */

use once_cell::sync::Lazy;
use regex::Regex;

static SPACE_BEFORE_PUNCTUATION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\s+([。、・！？])").expect("valid punctuation regex"));
static OPEN_PAREN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*（\s*").expect("valid paren regex"));
static CLOSE_PAREN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s*）\s*").expect("valid paren regex"));

/// Kana, CJK punctuation, ideographs and full-width forms
fn is_cjk(c: char) -> bool {
    matches!(
        c,
        '\u{3000}'..='\u{30FF}' | '\u{4E00}'..='\u{9FFF}' | '\u{FF00}'..='\u{FFEF}'
    )
}

/// Drop whitespace runs that sit between two CJK characters
fn collapse_cjk_spaces(text: &str) -> String {
    let chars: Vec<char> = text.chars().collect();
    let mut out = String::with_capacity(text.len());
    let mut i = 0;
    while i < chars.len() {
        let c = chars[i];
        if c.is_whitespace() {
            let start = i;
            while i < chars.len() && chars[i].is_whitespace() {
                i += 1;
            }
            let before = start.checked_sub(1).map(|p| chars[p]);
            let after = chars.get(i).copied();
            let joins_cjk = before.is_some_and(is_cjk) && after.is_some_and(is_cjk);
            if !joins_cjk {
                out.extend(&chars[start..i]);
            }
            continue;
        }
        out.push(c);
        i += 1;
    }
    out
}

/// Remove unnecessary spaces from Japanese model output
pub fn detokenize_japanese(text: &str) -> String {
    let text = text
        .replace(" .", "。")
        .replace(" ,", "、")
        .replace(" ・", "・")
        .replace(" ！", "！")
        .replace(" ？", "？");
    let text = collapse_cjk_spaces(&text);
    let text = SPACE_BEFORE_PUNCTUATION.replace_all(&text, "$1");
    let text = OPEN_PAREN.replace_all(&text, "（");
    let text = CLOSE_PAREN.replace_all(&text, "）");
    text.trim().to_string()
}
