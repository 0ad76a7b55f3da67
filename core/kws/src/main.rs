mod adapter;
mod cli;
mod ports;
mod usecase;

use std::io::{BufRead, Write};
use std::process;

use common::config::WorkerConfig;
use common::diag::Diag;
use common::domain::{KeywordList, Query};
use common::error::Error;

use adapter::llama::LlamaGenerator;
use adapter::native::NativeRuntime;
use cli::ParseOutcome;
use ports::outbound::NoopGenerator;

fn main() {
    // 推論エンジン由来の panic も含め、最上位で必ず受け止める。
    // 結果チャネルに何も出さずに落ちると呼び出し側が stdout 待ちで
    // ブロックしうるため、ModelNotFound 以外は空行を出してから終了する。
    let exit_code = match std::panic::catch_unwind(run) {
        Ok(Ok(code)) => code,
        Ok(Err(e)) => {
            eprintln!("kws: {e}");
            let code = e.exit_code();
            if code != 1 {
                println!();
            }
            code
        }
        Err(panic) => {
            let detail = panic_message(&panic);
            eprintln!("kws: unexpected crash: {detail}");
            println!();
            2
        }
    };
    // process::exit はバッファを flush しないので明示的に掃き出す
    let _ = std::io::stdout().flush();
    process::exit(exit_code);
}

fn run() -> Result<i32, Error> {
    let args = match cli::parse_args()? {
        ParseOutcome::Help => {
            cli::print_help();
            return Ok(0);
        }
        ParseOutcome::Run(args) => args,
    };

    let query = if args.is_empty() {
        read_query_interactive()?
    } else {
        Query::from_args(&args)
    };

    let config = WorkerConfig::from_env();
    let diag = Diag::new(&config.log_dir);
    diag.banner(&config.to_banner_json());

    if query.is_blank() {
        // 空クエリはモデルをロードせず、空の結果で正常終了
        diag.info("blank query, emitting empty result");
        println!();
        return Ok(0);
    }
    diag.info(&format!("query: \"{}\"", query.as_str()));

    // ネイティブ高速化ライブラリの事前ロード（失敗しても続行）
    let native = NativeRuntime::preload(&diag);
    diag.info(&format!("active backend: {}", native.backend()));

    let keywords = match LlamaGenerator::new(&config, &diag) {
        Ok(mut generator) => usecase::extract::run(&mut generator, &query, &config, &diag),
        Err(Error::ModelNotFound(path)) => return Err(Error::ModelNotFound(path)),
        Err(e) => {
            diag.warn(&format!("generator unavailable, fallback only: {e}"));
            usecase::extract::run(&mut NoopGenerator, &query, &config, &diag)
        }
    };

    let line = KeywordList::new(keywords).to_result_line();
    diag.info(&format!("result: {line}"));
    println!("{line}");
    Ok(0)
}

/// panic ペイロードから人間可読なメッセージを取り出す
fn panic_message(panic: &(dyn std::any::Any + Send)) -> String {
    if let Some(s) = panic.downcast_ref::<&str>() {
        (*s).to_string()
    } else if let Some(s) = panic.downcast_ref::<String>() {
        s.clone()
    } else {
        "unknown panic payload".to_string()
    }
}

/// 引数なしで起動されたとき、診断チャネルで入力を促して 1 行読む
fn read_query_interactive() -> Result<Query, Error> {
    eprint!("query: ");
    let mut line = String::new();
    std::io::stdin()
        .lock()
        .read_line(&mut line)
        .map_err(|e| Error::io_msg(format!("failed to read query from stdin: {e}")))?;
    Ok(Query::new(line.trim_end_matches(['\r', '\n'])))
}
