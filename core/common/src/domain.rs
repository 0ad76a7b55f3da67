//! ドメイン型（Newtype）
//!
//! String を直接運ばず、意味のある型に包んで境界を明確にする。

/// ユーザーの検索クエリ（自由テキスト）
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Query(String);

impl Query {
    pub fn new(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// コマンドライン引数列を半角スペースで結合してクエリにする
    pub fn from_args(args: &[String]) -> Self {
        Self(args.join(" "))
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// トリム後に空なら true（この場合ワーカーはモデルをロードしない）
    pub fn is_blank(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl std::ops::Deref for Query {
    type Target = str;
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

impl std::fmt::Display for Query {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

/// 最終キーワードリスト（小文字・重複なし・最大 5 件）
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeywordList(Vec<String>);

impl KeywordList {
    pub fn new(keywords: Vec<String>) -> Self {
        Self(keywords)
    }

    pub fn as_slice(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// 結果チャネルの 1 行形式（`", "` 区切り）に整形する
    pub fn to_result_line(&self) -> String {
        self.0.join(", ")
    }
}

impl From<Vec<String>> for KeywordList {
    fn from(v: Vec<String>) -> Self {
        Self(v)
    }
}

impl std::fmt::Display for KeywordList {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.to_result_line())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_query_from_args_joins_with_space() {
        let q = Query::from_args(&["how".to_string(), "to".to_string(), "rust".to_string()]);
        assert_eq!(q.as_str(), "how to rust");
    }

    #[test]
    fn test_query_is_blank() {
        assert!(Query::new("").is_blank());
        assert!(Query::new("   \t").is_blank());
        assert!(!Query::new("rust").is_blank());
    }

    #[test]
    fn test_keyword_list_result_line() {
        let list = KeywordList::new(vec!["cats".to_string(), "dogs".to_string()]);
        assert_eq!(list.to_result_line(), "cats, dogs");
        assert_eq!(KeywordList::default().to_result_line(), "");
    }
}
