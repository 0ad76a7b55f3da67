//! ネイティブ高速化ライブラリの事前ロード
//!
//! 推論の前に、候補ライブラリを固定の優先順で明示的にロードする。
//! 各候補のロード失敗は警告ログに留め、必ず次の候補へ進む。
//! 全滅でも推論エンジン組み込みの遅いコードパスで続行できる。
//! どのバックエンドが有効になったかは診断としてのみ公開する。

use common::diag::Diag;
use libloading::Library;

/// 優先順に試す候補ライブラリ名
#[cfg(target_os = "windows")]
const CANDIDATES: &[&str] = &["cudart64_12.dll", "cublas64_12.dll", "ggml-cuda.dll"];
#[cfg(target_os = "linux")]
const CANDIDATES: &[&str] = &["libcudart.so.12", "libcublas.so.12", "libggml-cuda.so"];
#[cfg(not(any(target_os = "windows", target_os = "linux")))]
const CANDIDATES: &[&str] = &[];

/// ロード済みハンドルの保持体
///
/// ハンドルはプロセス終了まで解放しない（ドロップするとロードの意味がない）。
pub struct NativeRuntime {
    _libraries: Vec<Library>,
    backend: &'static str,
}

impl NativeRuntime {
    /// 候補を順に試し、結果を診断へ記録する。失敗しても止まらない。
    pub fn preload(diag: &Diag) -> Self {
        let extern_dir = super::exe_dir().map(|d| d.join("extern"));
        let mut libraries = Vec::new();
        for name in CANDIDATES {
            match try_load(extern_dir.as_deref(), name) {
                Ok(lib) => {
                    diag.info(&format!("native library loaded: {name}"));
                    libraries.push(lib);
                }
                Err(e) => {
                    diag.warn(&format!("native library unavailable: {name} ({e})"));
                }
            }
        }
        let backend = if libraries.is_empty() { "cpu" } else { "cuda" };
        Self {
            _libraries: libraries,
            backend,
        }
    }

    /// 有効になったバックエンドのラベル（診断用）
    pub fn backend(&self) -> &'static str {
        self.backend
    }
}

/// exe 隣の extern/ を優先し、無ければシステムの探索パスに委ねる
fn try_load(
    extern_dir: Option<&std::path::Path>,
    name: &str,
) -> Result<Library, libloading::Error> {
    if let Some(dir) = extern_dir {
        let path = dir.join(name);
        if path.exists() {
            // SAFETY: ライブラリの初期化子を信頼してロードする。
            // 候補は既知の推論ランタイムに限られる。
            return unsafe { Library::new(&path) };
        }
    }
    // SAFETY: 同上
    unsafe { Library::new(name) }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_preload_never_fails() {
        // CUDA が無い環境でも全候補が警告扱いで続行されること
        let runtime = NativeRuntime::preload(&Diag::disabled());
        assert!(runtime.backend() == "cpu" || runtime.backend() == "cuda");
    }

    #[test]
    fn test_missing_library_is_an_error_not_a_panic() {
        let result = try_load(None, "definitely-not-a-real-library-name");
        assert!(result.is_err());
    }
}
