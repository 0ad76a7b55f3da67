//! Outbound ポート: ワーカーが推論エンジンを使うための trait

use common::error::Error;

/// 有界テキスト生成の抽象
///
/// 実装は `adapter::llama::LlamaGenerator`（llama.cpp）やテスト用 Stub など。
/// 生成はトークン上限と打ち切りマーカーで必ず有界になる。
pub trait TextGenerator {
    /// プロンプトから、打ち切り条件に達するまでの生テキストを 1 ブロック返す
    fn generate(&mut self, prompt: &str) -> Result<String, Error>;
}

/// 何も生成しない実装（生成系が初期化できないときの縮退用）
#[derive(Debug, Clone, Default)]
pub struct NoopGenerator;

impl TextGenerator for NoopGenerator {
    fn generate(&mut self, _prompt: &str) -> Result<String, Error> {
        Ok(String::new())
    }
}
