//! Splits lambda calculus source text into tokens.

use lazy_static::lazy_static;
use regex::Regex;

/// The different classes of tokens that compose the language.
#[derive(PartialEq, Eq, Debug, Clone, Copy)]
pub enum TokenClass {
    Lambda,
    LeftParenthesis,
    RightParenthesis,
    Dot,
    Identifier,
    Whitespace,
}

/// Represents a single token of the language, along with the byte offsets it
/// spans in the source text.
#[derive(PartialEq, Eq, Debug, Clone)]
pub struct Token {
    pub token_class: TokenClass,
    pub token_text: String,
    pub start_pos: usize,
    pub end_pos: usize,
}

// Represents how to recognize a token class.
#[derive(Debug)]
struct TokenRule {
    token_class: TokenClass,
    regex: Regex,
}

// Token rules in priority order. Together they cover every possible character,
// so the lexer never gets stuck.
lazy_static! {
    static ref token_rules: Vec<TokenRule> = vec![
        TokenRule {
            token_class: TokenClass::Lambda,
            regex: Regex::new(r"^λ").expect("Unable to compile Lambda rule regex."),
        },
        TokenRule {
            token_class: TokenClass::LeftParenthesis,
            regex: Regex::new(r"^\(").expect("Unable to compile LeftParenthesis rule regex."),
        },
        TokenRule {
            token_class: TokenClass::RightParenthesis,
            regex: Regex::new(r"^\)").expect("Unable to compile RightParenthesis rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Dot,
            regex: Regex::new(r"^\.").expect("Unable to compile Dot rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Identifier,
            regex: Regex::new(r"^[^\s().λ]+").expect("Unable to compile Identifier rule regex."),
        },
        TokenRule {
            token_class: TokenClass::Whitespace,
            regex: Regex::new(r"^\s+").expect("Unable to compile Whitespace rule regex."),
        },
    ];
}

// Finds the first rule, in priority order, that matches at the start of the
// input string, along with the length of the match.
fn get_matching_rule(input_str: &str) -> Option<(&'static TokenRule, usize)> {
    return token_rules.iter().find_map(|token_rule| {
        token_rule
            .regex
            .find(input_str)
            .map(|match_obj| (token_rule, match_obj.len()))
    });
}

/// Given a string, returns the vector of tokens that comprise that string.
/// Whitespace only separates tokens and is never emitted.
///
/// The lexer does no validation; malformed token sequences are reported by the
/// parser.
pub fn run_lexical_analysis(program_str: &str) -> Vec<Token> {
    let mut curr_idx: usize = 0;
    let mut out = Vec::new();

    while curr_idx < program_str.len() {
        let Some((token_rule, match_len)) = get_matching_rule(&program_str[curr_idx..]) else {
            break;
        };

        if token_rule.token_class != TokenClass::Whitespace {
            out.push(Token {
                token_class: token_rule.token_class,
                token_text: String::from(&program_str[curr_idx..curr_idx + match_len]),
                start_pos: curr_idx,
                end_pos: curr_idx + match_len,
            });
        }

        curr_idx += match_len;
    }

    return out;
}
