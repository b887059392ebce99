//! 回答文本规范化
//!
//! 上游有时会对回答做两次转义，落地前需要还原：
//! 1. 双重转义的码点（两个及以上反斜杠 + `u` + 四位十六进制）还原为字符
//! 2. 双重转义的引号（两个及以上反斜杠 + `"`）还原为 `"`
//! 3. 去掉开头残留的引号、反斜杠以及结尾残留的反斜杠
//!
//! 三步反复执行直到文本不再变化，因此 `format_answer` 是幂等的。

use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static ESCAPED_CODE_POINT: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"\\{2,}u([0-9a-fA-F]{4})").expect("码点正则无效"));

static ESCAPED_QUOTE: Lazy<Regex> = Lazy::new(|| Regex::new(r#"\\{2,}""#).expect("引号正则无效"));

/// 规范化助手回答文本
pub fn format_answer(raw: &str) -> String {
    let mut current = raw.to_string();
    loop {
        let next = format_once(&current);
        // 每一步要么不变，要么严格缩短，循环必然终止
        if next == current {
            return current;
        }
        current = next;
    }
}

fn format_once(text: &str) -> String {
    let decoded = ESCAPED_CODE_POINT.replace_all(text, |caps: &Captures| {
        u32::from_str_radix(&caps[1], 16)
            .ok()
            .and_then(char::from_u32)
            .map(String::from)
            .unwrap_or_else(|| caps[0].to_string())
    });
    let unquoted = ESCAPED_QUOTE.replace_all(&decoded, "\"");

    unquoted
        .trim_start_matches(['"', '\\'])
        .trim_end_matches('\\')
        .to_string()
}
