//! クエリ本文からのフォールバック抽出
//!
//! モデル出力が使い物にならないときでも、クエリ自体に内容語があれば
//! 決定的に「それなりの」結果を返すための抽出器。モデルには一切依存しない。

use regex::Regex;
use std::collections::HashSet;
use std::sync::OnceLock;

use crate::sanitize::MAX_KEYWORDS;

/// フォールバック採用の最小トークン長
const MIN_TOKEN_LEN: usize = 3;

/// 除外する英語ストップワード（冠詞・前置詞・助動詞・疑問詞・代名詞）
const STOPWORDS: &[&str] = &[
    "the", "and", "for", "but", "nor", "not", "are", "was", "were", "been",
    "being", "does", "did", "doing", "have", "has", "had", "having", "will",
    "would", "can", "could", "should", "shall", "may", "might", "must",
    "how", "what", "when", "where", "which", "who", "whom", "whose", "why",
    "this", "that", "these", "those", "with", "from", "into", "onto", "over",
    "under", "about", "after", "before", "between", "you", "your", "yours",
    "they", "them", "their", "she", "her", "him", "his", "its", "our", "ours",
];

/// 単語文字と空白以外を取り除くフィルタ
fn word_filter() -> &'static Regex {
    static FILTER: OnceLock<Regex> = OnceLock::new();
    FILTER.get_or_init(|| Regex::new(r"[^\w\s]").expect("static word filter regex"))
}

/// クエリから内容語を抽出する。
///
/// 文字・数字・空白・アンダースコア以外を除去し、アンダースコアを空白に
/// 置き換えて空白で分割。小文字化した長さ 3 以上の非ストップワードを、
/// 出現順を保って重複除去し最大 5 件返す。
pub fn fallback_keywords(query: &str) -> Vec<String> {
    let filtered = word_filter().replace_all(query, "");
    let filtered = filtered.replace('_', " ");

    let mut seen: HashSet<String> = HashSet::new();
    let mut out: Vec<String> = Vec::new();
    for token in filtered.split_whitespace() {
        let token = token.to_lowercase();
        if token.chars().count() < MIN_TOKEN_LEN {
            continue;
        }
        if STOPWORDS.contains(&token.as_str()) {
            continue;
        }
        if seen.insert(token.clone()) {
            out.push(token);
        }
        if out.len() == MAX_KEYWORDS {
            break;
        }
    }
    out
}
