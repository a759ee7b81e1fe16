//! Recursive descent parser that constructs lambda-calculus expressions in the
//! box-tree representation given a slice of tokens.
//!
//! Grammar:
//!
//! ```text
//! expr := atom atom*
//! atom := 'λ' IDENT '.' expr | '(' expr ')' | IDENT
//! ```

use thiserror::Error;

use crate::box_tree_impl::box_tree_ast::Expression;
use crate::lexical_analysis::{run_lexical_analysis, Token, TokenClass};

/// Represents a parsing error. Positions are byte offsets into the source
/// text.
#[derive(Error, Debug, PartialEq, Eq, Clone)]
pub enum ParseError {
    #[error("Empty expression at position {position}")]
    EmptyExpression { position: usize },

    #[error("Expected parameter after 'λ' at position {position}")]
    MissingParameter { position: usize },

    #[error("Expected '.' after lambda parameter '{parameter}' at position {position}")]
    MissingDot { parameter: String, position: usize },

    #[error("Expected ')' to close '(' at position {position}")]
    MissingClosingParenthesis { position: usize },

    #[error("Unexpected token '{token_text}' at position {position}")]
    UnexpectedToken { token_text: String, position: usize },
}

// Offset reported when the parser runs out of tokens: just past the last one.
fn end_of_input_pos(tokens: &[Token]) -> usize {
    return tokens.last().map_or(0, |token| token.end_pos);
}

// Checks whether tokens[start_idx] exists and is of the given class.
fn peek_token_class(tokens: &[Token], start_idx: usize, token_class: TokenClass) -> bool {
    return tokens
        .get(start_idx)
        .is_some_and(|token| token.token_class == token_class);
}

/// Tries to parse an expression that looks like `λ[IDENTIFIER].[EXPR]`, with
/// `start_idx` pointing just past the lambda token.
fn try_lambda_rule(
    tokens: &[Token],
    lambda_token: &Token,
    start_idx: usize,
) -> Result<(Expression, usize), ParseError> {
    let parameter_token = match tokens.get(start_idx) {
        Some(token) if token.token_class == TokenClass::Identifier => token,
        Some(token) => {
            return Err(ParseError::MissingParameter {
                position: token.start_pos,
            });
        }
        None => {
            return Err(ParseError::MissingParameter {
                position: lambda_token.end_pos,
            });
        }
    };

    if !peek_token_class(tokens, start_idx + 1, TokenClass::Dot) {
        return Err(ParseError::MissingDot {
            parameter: parameter_token.token_text.clone(),
            position: parameter_token.end_pos,
        });
    }

    // The body extends as far as the enclosing expression allows.
    let (body, start_idx) = try_expr_rule(tokens, start_idx + 2)?;

    return Ok((
        Expression::Abstraction {
            parameter: parameter_token.token_text.clone(),
            body: Box::new(body),
        },
        start_idx,
    ));
}

/// Tries to parse an expression that looks like `([EXPR])`, with `start_idx`
/// pointing just past the opening parenthesis.
fn try_parenthesis_expr_rule(
    tokens: &[Token],
    open_token: &Token,
    start_idx: usize,
) -> Result<(Expression, usize), ParseError> {
    let (expression, start_idx) = try_expr_rule(tokens, start_idx)?;

    if !peek_token_class(tokens, start_idx, TokenClass::RightParenthesis) {
        return Err(ParseError::MissingClosingParenthesis {
            position: open_token.start_pos,
        });
    }

    return Ok((expression, start_idx + 1));
}

/// Tries to parse according to the production `atom -> λv. e | (e) | v`.
fn try_atom_rule(tokens: &[Token], start_idx: usize) -> Result<(Expression, usize), ParseError> {
    let Some(token) = tokens.get(start_idx) else {
        return Err(ParseError::EmptyExpression {
            position: end_of_input_pos(tokens),
        });
    };

    match token.token_class {
        TokenClass::Lambda => {
            return try_lambda_rule(tokens, token, start_idx + 1);
        }
        TokenClass::LeftParenthesis => {
            return try_parenthesis_expr_rule(tokens, token, start_idx + 1);
        }
        TokenClass::Identifier => {
            return Ok((
                Expression::Variable {
                    name: token.token_text.clone(),
                },
                start_idx + 1,
            ));
        }
        TokenClass::RightParenthesis | TokenClass::Dot | TokenClass::Whitespace => {
            return Err(ParseError::UnexpectedToken {
                token_text: token.token_text.clone(),
                position: token.start_pos,
            });
        }
    }
}

/// Tries to parse according to the production `e -> atom atom*`, folding the
/// atoms into left-associative applications. Stops at the end of input, a
/// closing parenthesis or a dot, leaving that token for the caller.
fn try_expr_rule(tokens: &[Token], start_idx: usize) -> Result<(Expression, usize), ParseError> {
    // Parse at least one atom.
    let (mut out_expr, mut start_idx) = try_atom_rule(tokens, start_idx)?;

    // Keep parsing atoms while maintaining left associativity.
    while let Some(token) = tokens.get(start_idx) {
        if matches!(
            token.token_class,
            TokenClass::RightParenthesis | TokenClass::Dot
        ) {
            break;
        }

        let (next_atom, new_start_idx) = try_atom_rule(tokens, start_idx)?;
        out_expr = Expression::Application {
            function: Box::new(out_expr),
            argument: Box::new(next_atom),
        };
        start_idx = new_start_idx;
    }

    return Ok((out_expr, start_idx));
}

/// Uses recursive descent to parse the given tokens into one `Expression`.
/// Every token must be consumed.
pub fn parse_recursive_descent(tokens: &[Token]) -> Result<Expression, ParseError> {
    let (expression, start_idx) = try_expr_rule(tokens, 0)?;

    if let Some(token) = tokens.get(start_idx) {
        return Err(ParseError::UnexpectedToken {
            token_text: token.token_text.clone(),
            position: token.start_pos,
        });
    }

    return Ok(expression);
}

/// Lexes and parses a source string into an `Expression`.
pub fn parse_expression(program_str: &str) -> Result<Expression, ParseError> {
    let tokens = run_lexical_analysis(program_str);
    return parse_recursive_descent(&tokens);
}
