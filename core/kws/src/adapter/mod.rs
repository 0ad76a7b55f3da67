//! アダプター層（OS・推論エンジンとの境界）

pub mod llama;
pub mod native;

use std::path::PathBuf;

/// 実行ファイルのあるディレクトリ（モデル重みと extern/ の基準パス）
pub(crate) fn exe_dir() -> Option<PathBuf> {
    std::env::current_exe()
        .ok()
        .and_then(|p| p.parent().map(|d| d.to_path_buf()))
}
