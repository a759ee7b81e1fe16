//! Run lambda calculus definitions and expressions and print the results to
//! standard output.
//!
//! Example usage:
//!
//!     cargo run -- --src-filepath test_programs/church_numerals.lc
//!
//! Without `--src-filepath` an interactive session is started.

use clap::Parser;
use rust_lambda_eval::end_to_end::{run_interpreter, InterpreterConfig};
use tracing::Level;

fn main() {
    let interpreter_config = InterpreterConfig::parse();

    let max_level = if interpreter_config.verbose {
        Level::TRACE
    } else {
        Level::WARN
    };
    tracing_subscriber::fmt()
        .with_max_level(max_level)
        .with_writer(std::io::stderr)
        .init();

    let interpreter_result = run_interpreter(&interpreter_config);

    match interpreter_result {
        Ok(execution_result) => {
            if !execution_result.is_empty() {
                println!("{}", execution_result);
            }
        }

        Err(run_error) => {
            eprintln!("{}", run_error);
            std::process::exit(1);
        }
    }
}
