//! 実行時設定（環境変数で上書き・範囲クランプ）
//!
//! プロセス起動時に一度だけ解決し、以後は不変。各値は名前付き環境変数で
//! 個別に上書きでき、数値は必ず上下限にクランプされる。解決後の値は
//! 起動バナーで JSON としてログに残す。

use serde::Serialize;
use std::path::PathBuf;

/// ログ出力ディレクトリ
pub const ENV_LOG_DIR: &str = "KWS_LOG_DIR";
/// コンテキストウィンドウのトークン数
pub const ENV_CTX_SIZE: &str = "KWS_CTX_SIZE";
/// GPU にオフロードするレイヤー数
pub const ENV_GPU_LAYERS: &str = "KWS_GPU_LAYERS";
/// 生成トークン数の上限
pub const ENV_MAX_TOKENS: &str = "KWS_MAX_TOKENS";
/// フォールバック抽出を発動するサニタイズ済み件数のしきい値
pub const ENV_MIN_KEYWORDS: &str = "KWS_MIN_KEYWORDS";

/// ワーカーの実行パラメータ
#[derive(Debug, Clone, Serialize)]
pub struct WorkerConfig {
    pub log_dir: PathBuf,
    pub ctx_size: u32,
    pub gpu_layers: u32,
    pub max_tokens: u32,
    pub min_keywords: usize,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            log_dir: PathBuf::from("logs"),
            ctx_size: 512,
            gpu_layers: 6,
            max_tokens: 60,
            min_keywords: 3,
        }
    }
}

impl WorkerConfig {
    /// プロセス環境変数から設定を解決する
    pub fn from_env() -> Self {
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// 起動バナー用に解決済みの値を 1 行の JSON へ整形する
    pub fn to_banner_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_default()
    }

    /// 任意の lookup 関数から設定を解決する（テスト用に環境から切り離す）
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Self {
        let defaults = Self::default();
        Self {
            log_dir: lookup(ENV_LOG_DIR)
                .filter(|s| !s.trim().is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.log_dir),
            ctx_size: clamped(&lookup, ENV_CTX_SIZE, defaults.ctx_size, 256, 8192),
            gpu_layers: clamped(&lookup, ENV_GPU_LAYERS, defaults.gpu_layers, 0, 64),
            max_tokens: clamped(&lookup, ENV_MAX_TOKENS, defaults.max_tokens, 1, 512),
            min_keywords: clamped(&lookup, ENV_MIN_KEYWORDS, defaults.min_keywords as u32, 0, 5)
                as usize,
        }
    }
}

/// 環境変数値を数値として解釈し `[min, max]` にクランプする。
/// 未設定・解釈不能ならデフォルト値。
fn clamped(lookup: &impl Fn(&str) -> Option<String>, name: &str, default: u32, min: u32, max: u32) -> u32 {
    match lookup(name).and_then(|s| s.trim().parse::<u32>().ok()) {
        Some(v) => v.clamp(min, max),
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[test]
    fn test_defaults_when_env_missing() {
        let config = WorkerConfig::from_lookup(|_| None);
        assert_eq!(config.log_dir, PathBuf::from("logs"));
        assert_eq!(config.ctx_size, 512);
        assert_eq!(config.gpu_layers, 6);
        assert_eq!(config.max_tokens, 60);
        assert_eq!(config.min_keywords, 3);
    }

    #[test]
    fn test_overrides_are_applied() {
        let config = WorkerConfig::from_lookup(lookup_from(&[
            (ENV_LOG_DIR, "/tmp/kws-logs"),
            (ENV_CTX_SIZE, "1024"),
            (ENV_GPU_LAYERS, "12"),
            (ENV_MAX_TOKENS, "32"),
            (ENV_MIN_KEYWORDS, "2"),
        ]));
        assert_eq!(config.log_dir, PathBuf::from("/tmp/kws-logs"));
        assert_eq!(config.ctx_size, 1024);
        assert_eq!(config.gpu_layers, 12);
        assert_eq!(config.max_tokens, 32);
        assert_eq!(config.min_keywords, 2);
    }

    #[test]
    fn test_values_are_clamped() {
        let config = WorkerConfig::from_lookup(lookup_from(&[
            (ENV_CTX_SIZE, "64"),
            (ENV_GPU_LAYERS, "999"),
            (ENV_MAX_TOKENS, "0"),
            (ENV_MIN_KEYWORDS, "9"),
        ]));
        assert_eq!(config.ctx_size, 256);
        assert_eq!(config.gpu_layers, 64);
        assert_eq!(config.max_tokens, 1);
        assert_eq!(config.min_keywords, 5);
    }

    #[test]
    fn test_garbage_values_fall_back_to_defaults() {
        let config = WorkerConfig::from_lookup(lookup_from(&[
            (ENV_CTX_SIZE, "not-a-number"),
            (ENV_MAX_TOKENS, "-5"),
            (ENV_LOG_DIR, "   "),
        ]));
        assert_eq!(config.ctx_size, 512);
        assert_eq!(config.max_tokens, 60);
        assert_eq!(config.log_dir, PathBuf::from("logs"));
    }

    #[test]
    fn test_config_serializes_for_banner() {
        let json = WorkerConfig::default().to_banner_json();
        assert!(json.contains("\"ctx_size\":512"));
        assert!(json.contains("\"max_tokens\":60"));
    }
}
