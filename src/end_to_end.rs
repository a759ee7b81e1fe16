//! Code to configure and run the interpreter, either over a script of
//! definitions and expressions or interactively.

use std::fs;
use std::io::{self, BufRead, Write};

use clap::Parser;
use thiserror::Error;
use tracing::{debug, warn};

use crate::box_tree_impl::binding_context::BindingContext;
use crate::box_tree_impl::box_tree_ast::Expression;
use crate::box_tree_impl::box_tree_execution::{
    execute_expression, ReductionError, StepLimit,
};
use crate::box_tree_impl::box_tree_recursive_descent_parsing::{parse_expression, ParseError};
use crate::lexical_analysis::{run_lexical_analysis, TokenClass};

/// Config for the interpreter. Instantiate via `InterpreterConfig::parse()`.
#[derive(Parser, Debug, Default)]
#[command(version, about, long_about = None)]
pub struct InterpreterConfig {
    /// Script of definitions and expressions to run. Starts an interactive
    /// session when omitted.
    #[arg(short, long)]
    pub src_filepath: Option<String>,

    /// Maximum number of reduction steps per expression. Unbounded when
    /// omitted.
    #[arg(short, long)]
    pub max_steps: Option<usize>,

    /// Log every reduction step.
    #[arg(short, long)]
    pub verbose: bool,
}

/// Errors that may be thrown when running the interpreter.
#[derive(Error, Debug)]
pub enum RunError {
    #[error("Input file error: {0}")]
    InputFileError(#[from] io::Error),

    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),

    #[error("Reduction error: {0}")]
    ReductionError(#[from] ReductionError),

    #[error("Invalid definition name '{0}'")]
    InvalidDefinitionName(String),
}

/// What running a single line did.
#[derive(Debug, PartialEq, Eq)]
pub enum LineOutcome {
    Skipped,
    Defined {
        def_name: String,
        def_body: Expression,
    },
    Evaluated {
        parsed: Expression,
        reduced: Expression,
    },
}

impl std::fmt::Display for LineOutcome {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LineOutcome::Skipped => {
                return Ok(());
            }
            LineOutcome::Defined { def_name, def_body } => {
                return write!(f, "{} = {}", def_name, def_body);
            }
            LineOutcome::Evaluated { parsed, reduced } => {
                return write!(
                    f,
                    "Parsed expression: {}\nReduced result: {}",
                    parsed, reduced
                );
            }
        }
    }
}

// A definition name must be exactly one identifier token.
fn validate_def_name(def_name: &str) -> Result<(), RunError> {
    let tokens = run_lexical_analysis(def_name);

    match tokens.as_slice() {
        [token] if token.token_class == TokenClass::Identifier => {
            return Ok(());
        }
        _ => {
            return Err(RunError::InvalidDefinitionName(String::from(def_name)));
        }
    }
}

/// Runs one line. Blank lines and `#` comments are skipped, a line containing
/// `=` is split at the first `=` into a definition, and anything else is
/// evaluated as an expression.
///
/// A definition only touches `context` once its body has parsed.
pub fn run_line(
    line: &str,
    context: &mut BindingContext,
    step_limit: StepLimit,
) -> Result<LineOutcome, RunError> {
    let line = line.trim();

    if line.is_empty() || line.starts_with('#') {
        return Ok(LineOutcome::Skipped);
    }

    if let Some((def_name, def_str)) = line.split_once('=') {
        let def_name = def_name.trim();
        validate_def_name(def_name)?;

        let def_body = parse_expression(def_str)?;
        context.define(def_name, def_body.clone());

        return Ok(LineOutcome::Defined {
            def_name: String::from(def_name),
            def_body,
        });
    }

    let parsed = parse_expression(line)?;
    let evaluation = execute_expression(parsed.clone(), context, step_limit)?;
    debug!(steps = evaluation.steps, "reached normal form");

    return Ok(LineOutcome::Evaluated {
        parsed,
        reduced: evaluation.normal_form,
    });
}

/// Runs every line of a script against `context`. A failing line is reported
/// in the output and does not stop the lines after it.
pub fn run_script(program_string: &str, context: &mut BindingContext, step_limit: StepLimit) -> String {
    let mut out = vec![];

    for (line_idx, line) in program_string.lines().enumerate() {
        match run_line(line, context, step_limit) {
            Ok(LineOutcome::Skipped) => {}
            Ok(line_outcome) => {
                out.push(line_outcome.to_string());
            }
            Err(run_error) => {
                warn!(line_num = line_idx + 1, %run_error, "line failed");
                out.push(format!("line {}: error: {}", line_idx + 1, run_error));
            }
        }
    }

    return out.join("\n");
}

/// Runs an interactive session reading from `input` and writing to `output`,
/// until `exit` or end of input.
pub fn run_repl<R: BufRead, W: Write>(
    mut input: R,
    mut output: W,
    step_limit: StepLimit,
) -> Result<(), RunError> {
    let mut context = BindingContext::new();

    writeln!(output, "Welcome to the Lambda Calculus REPL! Type 'exit' to quit.")?;

    loop {
        write!(output, "λ> ")?;
        output.flush()?;

        let mut line = String::new();
        if input.read_line(&mut line)? == 0 {
            writeln!(output)?;
            break;
        }

        if line.trim().eq_ignore_ascii_case("exit") {
            break;
        }

        match run_line(&line, &mut context, step_limit) {
            Ok(LineOutcome::Skipped) => {}
            Ok(line_outcome) => {
                writeln!(output, "{}", line_outcome)?;
            }
            Err(run_error) => {
                writeln!(output, "Error: {}", run_error)?;
            }
        }
    }

    return Ok(());
}

/// Run the interpreter given an interpreter config: over the script at
/// `src_filepath` if one is given, returning its output, or interactively on
/// standard input and output otherwise.
pub fn run_interpreter(config: &InterpreterConfig) -> Result<String, RunError> {
    let step_limit = StepLimit::from(config.max_steps);

    match &config.src_filepath {
        Some(src_filepath) => {
            let program_string = fs::read_to_string(src_filepath)?;
            let mut context = BindingContext::new();
            return Ok(run_script(&program_string, &mut context, step_limit));
        }
        None => {
            run_repl(io::stdin().lock(), io::stdout().lock(), step_limit)?;
            return Ok(String::new());
        }
    }
}
