//! コマンドライン引数の解析
//!
//! 位置引数はすべてクエリ本文として扱う（空白で結合される）。
//! 引数なしの場合の対話読み取りは main 側の責務。

use clap::builder::ArgAction;
use common::error::Error;

/// 解析結果: ヘルプ表示 / クエリ引数での実行
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ParseOutcome {
    Help,
    Run(Vec<String>),
}

fn build_clap_command() -> clap::Command {
    clap::Command::new("kws")
        .about("Extract up to 5 keywords from a query with a local language model")
        .disable_help_flag(true)
        .arg(
            clap::Arg::new("help")
                .short('h')
                .long("help")
                .help("Show this help message")
                .action(ArgAction::SetTrue),
        )
        .arg(
            clap::Arg::new("query")
                .help("Query text (all positional arguments are joined with spaces)")
                .num_args(0..)
                .allow_hyphen_values(true)
                .trailing_var_arg(true),
        )
}

/// プロセス引数を解析する
pub fn parse_args() -> Result<ParseOutcome, Error> {
    parse_from(std::env::args().skip(1))
}

/// 引数列を解析する（テスト用にプロセス環境から切り離す）
pub fn parse_from(args: impl IntoIterator<Item = String>) -> Result<ParseOutcome, Error> {
    let argv = std::iter::once("kws".to_string()).chain(args);
    let matches = build_clap_command()
        .try_get_matches_from(argv)
        .map_err(|e| Error::Fatal(format!("invalid arguments: {e}")))?;

    if matches.get_flag("help") {
        return Ok(ParseOutcome::Help);
    }

    let query_args: Vec<String> = matches
        .get_many::<String>("query")
        .map(|vals| vals.cloned().collect())
        .unwrap_or_default();
    Ok(ParseOutcome::Run(query_args))
}

pub fn print_help() {
    println!("Usage: kws [options] [query...]");
    println!("Options:");
    println!("  -h, --help    Show this help message");
    println!();
    println!("Description:");
    println!("  Loads a local quantized model, extracts up to 5 lowercase keywords");
    println!("  from the query and prints them as one comma-separated line on stdout.");
    println!("  All diagnostics go to stderr and to <KWS_LOG_DIR>/kws.log.");
    println!();
    println!("Environment:");
    println!("  KWS_LOG_DIR       log directory (default: logs)");
    println!("  KWS_CTX_SIZE      context window in tokens (256-8192, default 512)");
    println!("  KWS_GPU_LAYERS    layers offloaded to the GPU (0-64, default 6)");
    println!("  KWS_MAX_TOKENS    generation cap in tokens (1-512, default 60)");
    println!("  KWS_MIN_KEYWORDS  fallback threshold (0-5, default 3)");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_args_become_query() {
        let outcome = parse_from(["reset".to_string(), "router".to_string()]).unwrap();
        assert_eq!(
            outcome,
            ParseOutcome::Run(vec!["reset".to_string(), "router".to_string()])
        );
    }

    #[test]
    fn test_no_args_is_empty_run() {
        let outcome = parse_from(std::iter::empty()).unwrap();
        assert_eq!(outcome, ParseOutcome::Run(Vec::new()));
    }

    #[test]
    fn test_help_flag() {
        let outcome = parse_from(["--help".to_string()]).unwrap();
        assert_eq!(outcome, ParseOutcome::Help);
        let outcome = parse_from(["-h".to_string()]).unwrap();
        assert_eq!(outcome, ParseOutcome::Help);
    }

    #[test]
    fn test_hyphen_values_are_query_text() {
        let outcome = parse_from(["--weird-flag".to_string(), "text".to_string()]).unwrap();
        assert_eq!(
            outcome,
            ParseOutcome::Run(vec!["--weird-flag".to_string(), "text".to_string()])
        );
    }
}
