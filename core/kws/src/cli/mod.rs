//! CLI 層

mod args;

pub use args::{parse_args, parse_from, print_help, ParseOutcome};
