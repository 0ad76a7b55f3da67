//! エラーハンドリング
//!
//! ワーカー内のエラーは「致命的（プロセス終了）」と「回復可能（空出力に縮退）」に
//! 大別する。致命的なのはモデル重みの欠落のみで、それ以外の推論系エラーは
//! 呼び出し側から見ると常に「キーワードなし」に縮退する。

use std::path::PathBuf;
use thiserror::Error;

/// ワーカー内エラー
#[derive(Debug, Error)]
pub enum Error {
    /// モデル重みファイルが見つからない（致命的・終了コード 1・リトライなし）
    #[error("model weights not found: {0}")]
    ModelNotFound(PathBuf),
    /// 推論エンジン内部のエラー（回復可能: 空出力に縮退する）
    #[error("inference failed: {0}")]
    Inference(String),
    /// I/O エラー
    #[error("io error: {0}")]
    Io(String),
    /// その他の致命的エラー（終了コード 2）
    #[error("{0}")]
    Fatal(String),
}

impl Error {
    /// I/O エラーをメッセージから生成
    pub fn io_msg(msg: impl Into<String>) -> Self {
        Error::Io(msg.into())
    }

    /// ワーカープロセスの終了コードへの対応付け
    ///
    /// `ModelNotFound` は 1、それ以外の致命的エラーは 2。
    pub fn exit_code(&self) -> i32 {
        match self {
            Error::ModelNotFound(_) => 1,
            _ => 2,
        }
    }

    /// 回復可能（空出力に縮退してよい）なら true
    pub fn is_recoverable(&self) -> bool {
        matches!(self, Error::Inference(_))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exit_code_mapping() {
        let err = Error::ModelNotFound(PathBuf::from("model.gguf"));
        assert_eq!(err.exit_code(), 1);

        let err = Error::Fatal("boom".to_string());
        assert_eq!(err.exit_code(), 2);

        let err = Error::Io("disk".to_string());
        assert_eq!(err.exit_code(), 2);
    }

    #[test]
    fn test_inference_error_is_recoverable() {
        assert!(Error::Inference("decode failed".to_string()).is_recoverable());
        assert!(!Error::ModelNotFound(PathBuf::from("m.gguf")).is_recoverable());
        assert!(!Error::Fatal("boom".to_string()).is_recoverable());
    }

    #[test]
    fn test_display_includes_path() {
        let err = Error::ModelNotFound(PathBuf::from("granite.gguf"));
        assert!(err.to_string().contains("granite.gguf"));
    }
}
