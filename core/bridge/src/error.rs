//! エラーハンドリング（ホスト側）
//!
//! プロセスレベルの失敗だけを呼び出し側へ構造化して渡す。
//! モデル・推論系の失敗はワーカー内で縮退済みなので、ここには現れない。

use std::path::PathBuf;
use std::time::Duration;
use thiserror::Error;

/// ワーカー監督のエラー
#[derive(Debug, Error)]
pub enum BridgeError {
    /// ワーカー実行ファイルが存在しない
    #[error("keyword worker not found: {0}")]
    NotFound(PathBuf),
    /// ワーカーの起動に失敗した
    #[error("keyword worker failed to start: {0}")]
    Spawn(String),
    /// 制限時間内に結果が得られなかった（ワーカーは kill 済み）
    #[error("keyword worker timed out after {waited:?}")]
    Timeout {
        waited: Duration,
        /// タイムアウトまでに診断チャネルから拾えた内容（デバッグ用）
        diagnostics: String,
    },
    /// その他の I/O エラー
    #[error("io error: {0}")]
    Io(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_timeout_display_includes_duration() {
        let err = BridgeError::Timeout {
            waited: Duration::from_secs(3),
            diagnostics: String::new(),
        };
        assert!(err.to_string().contains("timed out"));
    }

    #[test]
    fn test_not_found_display_includes_path() {
        let err = BridgeError::NotFound(PathBuf::from("/opt/kws"));
        assert!(err.to_string().contains("/opt/kws"));
    }
}
