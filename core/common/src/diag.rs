//! 診断シンク（stderr + 追記ログファイル）
//!
//! 結果チャネル（stdout）を汚さないため、診断はすべて stderr と
//! ログファイルに流す。各行には起動からの経過秒とプロセス ID の
//! プレフィックスを付ける。ファイル書き込みは best-effort で、
//! 失敗してもワーカーを落とさない。

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::Path;
use std::sync::Mutex;
use std::time::Instant;

/// 現在時刻を ISO8601 (RFC3339) で返す。起動バナーに使う。
pub fn now_iso8601() -> String {
    chrono::Utc::now().to_rfc3339()
}

/// 診断シンク
///
/// ワーカー起動時に一度生成し、全レイヤーに参照で渡す。
/// ログファイルのハンドルはドロップ時に必ず解放される。
pub struct Diag {
    start: Instant,
    pid: u32,
    file: Option<Mutex<File>>,
}

impl Diag {
    /// ログディレクトリ配下の `kws.log` に追記するシンクを生成する。
    /// ディレクトリ作成やオープンに失敗した場合は stderr のみになる。
    pub fn new(log_dir: &Path) -> Self {
        let file = std::fs::create_dir_all(log_dir)
            .ok()
            .and_then(|_| {
                OpenOptions::new()
                    .create(true)
                    .append(true)
                    .open(log_dir.join("kws.log"))
                    .ok()
            })
            .map(Mutex::new);
        Self {
            start: Instant::now(),
            pid: std::process::id(),
            file,
        }
    }

    /// stderr のみに出力するシンク（テスト用）
    pub fn disabled() -> Self {
        Self {
            start: Instant::now(),
            pid: std::process::id(),
            file: None,
        }
    }

    /// セッション開始バナー（タイムスタンプ・PID・解決済み設定）
    pub fn banner(&self, config_json: &str) {
        self.info(&format!("session start {} pid={}", now_iso8601(), self.pid));
        self.info(&format!("config {config_json}"));
    }

    pub fn info(&self, message: &str) {
        self.write_line("INFO", message);
    }

    pub fn warn(&self, message: &str) {
        self.write_line("WARN", message);
    }

    fn write_line(&self, level: &str, message: &str) {
        let line = format!(
            "[{:8.3}s][kws:{}] {} {}",
            self.start.elapsed().as_secs_f64(),
            self.pid,
            level,
            message
        );
        eprintln!("{line}");
        if let Some(file) = &self.file {
            if let Ok(mut f) = file.lock() {
                let _ = writeln!(f, "{line}");
                let _ = f.flush();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_to_log_file() {
        let dir = tempfile::tempdir().unwrap();
        let diag = Diag::new(dir.path());
        diag.banner("{\"ctx_size\":512}");
        diag.info("model loaded");
        diag.warn("native library unavailable");
        drop(diag);

        let content = std::fs::read_to_string(dir.path().join("kws.log")).unwrap();
        assert!(content.contains("session start"));
        assert!(content.contains("INFO model loaded"));
        assert!(content.contains("WARN native library unavailable"));
        assert!(content.contains(&format!("kws:{}", std::process::id())));
    }

    #[test]
    fn test_creates_missing_log_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("a").join("b");
        let diag = Diag::new(&nested);
        diag.info("hello");
        assert!(nested.join("kws.log").exists());
    }

    #[test]
    fn test_disabled_sink_does_not_panic() {
        let diag = Diag::disabled();
        diag.info("no file behind this one");
        diag.warn("still fine");
    }

    #[test]
    fn test_unwritable_dir_degrades_to_stderr_only() {
        // ファイルをディレクトリ名の位置に置いてオープンを失敗させる
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocked");
        std::fs::write(&blocker, b"file, not a dir").unwrap();
        let diag = Diag::new(&blocker);
        diag.info("swallowed");
    }
}
