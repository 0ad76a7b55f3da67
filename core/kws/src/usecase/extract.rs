//! キーワード抽出ユースケース
//!
//! プロンプト組み立て → 生成 → サニタイズ → （不足なら）フォールバック →
//! 仕上げ、の直列パイプライン。生成の失敗はここで握りつぶして空出力扱いに
//! するため、この関数は常にリストを返す。

use common::config::WorkerConfig;
use common::diag::Diag;
use common::domain::Query;
use common::{fallback, prompt, sanitize};

use crate::ports::outbound::TextGenerator;

/// クエリから最終キーワードリストを組み立てる
pub fn run(
    generator: &mut dyn TextGenerator,
    query: &Query,
    config: &WorkerConfig,
    diag: &Diag,
) -> Vec<String> {
    let prompt = prompt::build_prompt(query);
    let raw = match generator.generate(&prompt) {
        Ok(raw) => raw,
        Err(e) => {
            // 推論の失敗は致命的にせず、空出力として縮退させる
            diag.warn(&format!("generation failed, degrading to empty output: {e}"));
            String::new()
        }
    };
    diag.info(&format!("raw output: {} bytes", raw.len()));

    let stripped = sanitize::strip_continuation(&raw);
    let mut phrases = sanitize::clean_raw_output(&stripped);
    diag.info(&format!("sanitized: {}", phrases.join(", ")));

    if phrases.len() < config.min_keywords {
        let extra = fallback::fallback_keywords(query.as_str());
        diag.info(&format!(
            "fallback engaged ({} sanitized < {} minimum): {}",
            phrases.len(),
            config.min_keywords,
            extra.join(", ")
        ));
        phrases.extend(extra);
    }

    sanitize::finalize_keywords(phrases)
}
