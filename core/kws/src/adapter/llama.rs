//! llama.cpp による有界テキスト生成
//!
//! 重みのロード → コンテキスト作成 → プロンプトの prefill →
//! 1 トークンずつの生成、という直列フロー。生成はトークン上限か
//! 打ち切りマーカーの出現で必ず止まる。モデルはテンプレートの
//! 2 周目（"query:" 等）を続けて出力しがちなので、事後のサニタイズに
//! 頼らず生成中にも切る。

use std::num::NonZeroU32;
use std::path::PathBuf;

use llama_cpp_2::context::params::LlamaContextParams;
use llama_cpp_2::llama_backend::LlamaBackend;
use llama_cpp_2::llama_batch::LlamaBatch;
use llama_cpp_2::model::params::LlamaModelParams;
use llama_cpp_2::model::{AddBos, LlamaModel};
use llama_cpp_2::sampling::LlamaSampler;

use common::config::WorkerConfig;
use common::diag::Diag;
use common::error::Error;

use crate::ports::outbound::TextGenerator;

/// モデル重みの固定ファイル名（実行ファイルと同じディレクトリに置く）
pub const MODEL_FILE: &str = "granite-3.3-2b-instruct-Q4_K_M.gguf";

/// 生成を打ち切るマーカー（蓄積テキストに対して大文字小文字無視で照合）
const STOP_MARKERS: &[&str] = &["\n", "query:", "keywords:", "answer:", "output:"];

/// llama.cpp を使う TextGenerator 実装
pub struct LlamaGenerator {
    backend: LlamaBackend,
    model: LlamaModel,
    ctx_size: u32,
    max_tokens: u32,
}

impl LlamaGenerator {
    /// バックエンド初期化と重みロードを行う。
    /// 重みファイルが無ければ `Error::ModelNotFound`（致命的・リトライなし）。
    pub fn new(config: &WorkerConfig, diag: &Diag) -> Result<Self, Error> {
        let model_path = default_model_path();
        if !model_path.exists() {
            return Err(Error::ModelNotFound(model_path));
        }

        let backend = LlamaBackend::init()
            .map_err(|e| Error::Inference(format!("backend init failed: {e}")))?;

        let params = LlamaModelParams::default().with_n_gpu_layers(config.gpu_layers);
        let started = std::time::Instant::now();
        let model = LlamaModel::load_from_file(&backend, &model_path, &params)
            .map_err(|e| Error::Inference(format!("model load failed: {e}")))?;
        diag.info(&format!(
            "model loaded: {} ({} ms, {} gpu layers)",
            model_path.display(),
            started.elapsed().as_millis(),
            config.gpu_layers
        ));

        Ok(Self {
            backend,
            model,
            ctx_size: config.ctx_size,
            max_tokens: config.max_tokens,
        })
    }
}

impl TextGenerator for LlamaGenerator {
    fn generate(&mut self, prompt: &str) -> Result<String, Error> {
        let tokens = self
            .model
            .str_to_token(prompt, AddBos::Always)
            .map_err(|e| Error::Inference(format!("tokenization failed: {e}")))?;

        let ctx_params =
            LlamaContextParams::default().with_n_ctx(NonZeroU32::new(self.ctx_size));
        let mut ctx = self
            .model
            .new_context(&self.backend, ctx_params)
            .map_err(|e| Error::Inference(format!("context creation failed: {e}")))?;

        // プロンプト全体を prefill
        let n_batch = ctx.n_batch() as usize;
        for chunk in tokens.chunks(n_batch) {
            let mut batch = LlamaBatch::get_one(chunk)
                .map_err(|e| Error::Inference(format!("batch creation failed: {e}")))?;
            ctx.decode(&mut batch)
                .map_err(|e| Error::Inference(format!("prefill decode failed: {e}")))?;
        }

        let mut sampler =
            LlamaSampler::chain_simple(vec![LlamaSampler::temp(0.8), LlamaSampler::dist(0)]);
        let mut decoder = encoding_rs::UTF_8.new_decoder();
        let mut output = String::new();

        for _ in 0..self.max_tokens {
            let token = sampler.sample(&ctx, -1);
            sampler.accept(token);

            if self.model.is_eog_token(token) {
                break;
            }

            let piece = self
                .model
                .token_to_piece(token, &mut decoder, true, None)
                .map_err(|e| Error::Inference(format!("token decode failed: {e}")))?;
            output.push_str(&piece);

            if hit_stop_marker(&output) {
                break;
            }

            let next = [token];
            let mut batch = LlamaBatch::get_one(&next)
                .map_err(|e| Error::Inference(format!("batch creation failed: {e}")))?;
            ctx.decode(&mut batch)
                .map_err(|e| Error::Inference(format!("decode failed: {e}")))?;
        }

        Ok(output)
    }
}

/// 実行ファイルと同じディレクトリのモデルパスを返す
fn default_model_path() -> PathBuf {
    super::exe_dir()
        .map(|d| d.join(MODEL_FILE))
        .unwrap_or_else(|| PathBuf::from(MODEL_FILE))
}

/// 蓄積テキストが打ち切りマーカーを含むか（大文字小文字無視）
fn hit_stop_marker(text: &str) -> bool {
    let lower = text.to_lowercase();
    STOP_MARKERS.iter().any(|marker| lower.contains(marker))
}
