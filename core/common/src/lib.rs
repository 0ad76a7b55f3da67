//! キーワード抽出サービス共通ライブラリ
//!
//! ワーカー（`kws`）とホスト側ブリッジ（`bridge`）で共有される機能を提供します。

/// エラーハンドリング
pub mod error;

/// ドメイン型（Newtype）
pub mod domain;

/// 実行時設定（環境変数で上書き）
pub mod config;

/// プロンプト組み立て
pub mod prompt;

/// 生成テキストのサニタイズパイプライン
pub mod sanitize;

/// クエリ本文からのフォールバック抽出
pub mod fallback;

/// 診断シンク（stderr + 追記ログファイル）
pub mod diag;
