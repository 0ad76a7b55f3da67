//! ワーカープロセス監督（ホスト側）
//!
//! UI 層に公開するのは [`extract_keywords`] 一つ。ワーカーを起動し、
//! 結果チャネル（stdout）の読み切りをタイムアウトと競争させ、
//! 負けたら kill してタイプ付きエラーを返す。呼び出し側が
//! タイムアウトを超えてブロックしないことがこの層の中核保証。

/// エラーハンドリング
pub mod error;

/// プロセス起動・多重化・タイムアウト
pub mod supervisor;

pub use error::BridgeError;
pub use supervisor::extract_keywords;
