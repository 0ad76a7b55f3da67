//! 生成テキストのサニタイズパイプライン
//!
//! 2 段構成の決定的なテキスト変換。
//! Stage A（[`strip_continuation`]）: モデルがテンプレートの 2 周目を
//! 出力し始める典型的な失敗を、マーカーの最小出現位置で切り落とす。
//! Stage B（[`clean_raw_output`]）: 正規化・カンマ分割・重複除去・上限適用。
//! 仕上げ（[`finalize_keywords`]）: 予約語除外と大文字小文字を無視した
//! 最終的な重複除去。

use std::collections::HashSet;

/// 最終リストの上限件数
pub const MAX_KEYWORDS: usize = 5;

/// Stage A の打ち切りマーカー（合成プロンプト 2 周目の先頭ラベル）
pub const CONTINUATION_MARKERS: [&str; 5] =
    ["query:", "keywords:", "keyword:", "answer:", "output:"];

/// キーワードとして採用しない予約語
pub const RESERVED_TOKENS: [&str; 7] = [
    "query", "keyword", "keywords", "answer", "output", "input", "example",
];

/// Stage A: 改行を潰し、最も早く現れる打ち切りマーカーで切り落とす。
///
/// マーカーは大文字小文字を無視して探索し、見つかったものの「最小の
/// 出現位置」で切る（最初に走査したマーカーではない）。冪等。
pub fn strip_continuation(raw: &str) -> String {
    let mut text = raw.replace(['\n', '\r'], " ");
    let cut = CONTINUATION_MARKERS
        .iter()
        .filter_map(|marker| find_ascii_ci(&text, marker))
        .min()
        .unwrap_or(text.len());
    text.truncate(cut);
    text.trim().to_string()
}

/// Stage B: 小文字化・改行と引用符の除去・カンマ分割・トリム・
/// 完全一致での重複除去（先勝ち）・最大 5 件。
pub fn clean_raw_output(raw: &str) -> Vec<String> {
    let normalized = raw
        .to_lowercase()
        .replace(['\r', '\n'], " ")
        .replace('"', "");

    let mut phrases: Vec<String> = Vec::new();
    for part in normalized.split(',') {
        let phrase = part.trim();
        if phrase.is_empty() {
            continue;
        }
        if phrases.iter().any(|p| p == phrase) {
            continue;
        }
        phrases.push(phrase.to_string());
        if phrases.len() == MAX_KEYWORDS {
            break;
        }
    }
    phrases
}

/// 仕上げ: アンダースコアを空白へ、末尾のコロンを除去し、
/// 長さ 1 以下と予約語を捨て、大文字小文字を無視して再度重複除去。
pub fn finalize_keywords(phrases: impl IntoIterator<Item = String>) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out: Vec<String> = Vec::new();
    for phrase in phrases {
        let phrase = phrase.replace('_', " ");
        let phrase = phrase.trim().trim_end_matches(':').trim();
        if phrase.chars().count() <= 1 {
            continue;
        }
        let key = phrase.to_lowercase();
        if RESERVED_TOKENS.contains(&key.as_str()) {
            continue;
        }
        if seen.insert(key) {
            out.push(phrase.to_string());
        }
        if out.len() == MAX_KEYWORDS {
            break;
        }
    }
    out
}

/// 結果チャネルの 1 行をホスト側で解釈する。
/// カンマ分割・トリム・空要素除去・大文字小文字を無視した重複除去。
/// 空行（空白のみ）は空リストであってエラーではない。
pub fn parse_result_line(line: &str) -> Vec<String> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut out: Vec<String> = Vec::new();
    for part in line.split(',') {
        let keyword = part.trim();
        if keyword.is_empty() {
            continue;
        }
        if seen.insert(keyword.to_lowercase()) {
            out.push(keyword.to_string());
        }
    }
    out
}

/// ASCII マーカーを大文字小文字無視で探し、先頭バイト位置を返す。
/// マーカーは ASCII のみなので、返る位置は常に文字境界。
fn find_ascii_ci(haystack: &str, needle: &str) -> Option<usize> {
    let h = haystack.as_bytes();
    let n = needle.as_bytes();
    if n.is_empty() || n.len() > h.len() {
        return None;
    }
    (0..=h.len() - n.len()).find(|&i| h[i..i + n.len()].eq_ignore_ascii_case(n))
}
