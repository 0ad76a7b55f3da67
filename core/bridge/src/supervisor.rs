//! プロセス起動・多重化・タイムアウト
//!
//! ワーカーの 2 つの出力ストリームを別々に引き回す。stdout は結果
//! チャネルで、読み切った 1 行だけを機械的に解釈する。stderr は
//! 診断チャネルで、解釈はせずタイムアウト時のエラーに添えるだけ。
//! kill は常に安全（ワーカーは自前の追記ログ以外に永続状態を持たない）。

use std::io::{BufRead, BufReader, Read};
use std::path::Path;
use std::process::{Child, Command, Stdio};
use std::sync::mpsc;
use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, Instant};

use common::sanitize;

use crate::error::BridgeError;

/// ワーカーを 1 回実行し、キーワードの順序付き集合を返す。
///
/// * `query` - クエリ本文（単一の引数としてワーカーへ渡す）
/// * `worker_path` - ワーカー実行ファイルのパス
/// * `timeout` - 結果読み切りまでの制限時間
///
/// 空行の結果は空リストであってエラーではない。制限時間を超えたら
/// ワーカーを kill して [`BridgeError::Timeout`] を返す。
pub fn extract_keywords(
    query: &str,
    worker_path: &Path,
    timeout: Duration,
) -> Result<Vec<String>, BridgeError> {
    if !worker_path.exists() {
        return Err(BridgeError::NotFound(worker_path.to_path_buf()));
    }

    let mut child = Command::new(worker_path)
        .arg(query)
        .stdin(Stdio::null())
        .stdout(Stdio::piped())
        .stderr(Stdio::piped())
        .spawn()
        .map_err(|e| BridgeError::Spawn(e.to_string()))?;

    let stdout = child
        .stdout
        .take()
        .ok_or_else(|| BridgeError::Spawn("stdout not captured".to_string()))?;
    let stderr = child
        .stderr
        .take()
        .ok_or_else(|| BridgeError::Spawn("stderr not captured".to_string()))?;

    // 診断チャネルは行単位で随時バッファへ溜める
    let diagnostics = Arc::new(Mutex::new(String::new()));
    let diagnostics_writer = Arc::clone(&diagnostics);
    let stderr_reader = thread::spawn(move || {
        for line in BufReader::new(stderr).lines().map_while(Result::ok) {
            if let Ok(mut buf) = diagnostics_writer.lock() {
                buf.push_str(&line);
                buf.push('\n');
            }
        }
    });

    // 結果チャネルは読み切りをタイムアウトと競争させる
    let (tx, rx) = mpsc::channel();
    let stdout_reader = thread::spawn(move || {
        let mut output = String::new();
        let mut stdout = stdout;
        let _ = stdout.read_to_string(&mut output);
        let _ = tx.send(output);
    });

    let started = Instant::now();
    match rx.recv_timeout(timeout) {
        Ok(output) => {
            let _ = child.wait();
            let _ = stdout_reader.join();
            let _ = stderr_reader.join();
            Ok(sanitize::parse_result_line(output.trim()))
        }
        Err(mpsc::RecvTimeoutError::Timeout) => {
            kill_and_reap(&mut child);
            let _ = stderr_reader.join();
            let captured = diagnostics
                .lock()
                .map(|buf| buf.clone())
                .unwrap_or_default();
            Err(BridgeError::Timeout {
                waited: started.elapsed(),
                diagnostics: captured,
            })
        }
        Err(mpsc::RecvTimeoutError::Disconnected) => {
            kill_and_reap(&mut child);
            Err(BridgeError::Io(
                "worker stdout reader terminated unexpectedly".to_string(),
            ))
        }
    }
}

/// kill は best-effort（既に終了していれば失敗を無視する）
fn kill_and_reap(child: &mut Child) {
    let _ = child.kill();
    let _ = child.wait();
}
