//! プロンプト組み立て
//!
//! 固定テンプレートにクエリを埋め込むだけの純粋関数。会話状態は持たない。
//! クエリ内の引用符はそのまま埋め込む（敵対的入力への耐性は生成側と
//! サニタイザ側の責務）。

use crate::domain::Query;

/// クエリからキーワード抽出用プロンプトを組み立てる
pub fn build_prompt(query: &Query) -> String {
    format!(
        "You are a keyword-extraction assistant.\n\
         **Return *exactly 3-5* distinct core keywords or short phrases,\n\
         comma-separated, lowercase, no line breaks, no extra words.**\n\
         \n\
         query: \"{}\"\n\
         keywords:",
        query.as_str()
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_embeds_query_verbatim() {
        let prompt = build_prompt(&Query::new("wireless router"));
        assert!(prompt.contains("query: \"wireless router\""));
        assert!(prompt.ends_with("keywords:"));
    }

    #[test]
    fn test_prompt_preserves_embedded_quotes() {
        let prompt = build_prompt(&Query::new(r#"say "hello""#));
        assert!(prompt.contains(r#"query: "say "hello"""#));
    }

    #[test]
    fn test_prompt_is_stable() {
        let q = Query::new("x");
        assert_eq!(build_prompt(&q), build_prompt(&q));
    }
}
