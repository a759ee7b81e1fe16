//! Data structures to represent lambda calculus expressions, and some utility
//! functions to display and manipulate them.

use std::collections::HashSet;

/// Represents a lambda-calculus expression.
///
/// The derived `PartialEq` is literal structural equality: abstractions only
/// compare equal when their parameter names match textually. Use
/// `alpha_equivalent` to compare up to renaming of bound variables.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Expression {
    Variable {
        name: String,
    },
    Abstraction {
        parameter: String,
        body: Box<Expression>,
    },
    Application {
        function: Box<Expression>,
        argument: Box<Expression>,
    },
}

impl Expression {
    pub fn var(name: &str) -> Expression {
        return Expression::Variable {
            name: String::from(name),
        };
    }

    pub fn abs(parameter: &str, body: Expression) -> Expression {
        return Expression::Abstraction {
            parameter: String::from(parameter),
            body: Box::new(body),
        };
    }

    pub fn app(function: Expression, argument: Expression) -> Expression {
        return Expression::Application {
            function: Box::new(function),
            argument: Box::new(argument),
        };
    }

    /// Literal structural equality: same variants, same names, same shape.
    pub fn structurally_equal(&self, other: &Expression) -> bool {
        return self == other;
    }

    /// Equality up to consistent renaming of bound variables, so `λx. x` and
    /// `λy. y` are alpha-equivalent while `λx. y` and `λy. y` are not.
    pub fn alpha_equivalent(&self, other: &Expression) -> bool {
        return alpha_equivalent_helper(self, other, &mut Vec::new(), &mut Vec::new());
    }
}

// Compares two expressions while tracking the binders in scope on each side.
// Bound variables match when they refer to binders at the same depth; free
// variables match by name.
fn alpha_equivalent_helper<'a>(
    left: &'a Expression,
    right: &'a Expression,
    left_binders: &mut Vec<&'a str>,
    right_binders: &mut Vec<&'a str>,
) -> bool {
    match (left, right) {
        (Expression::Variable { name: left_name }, Expression::Variable { name: right_name }) => {
            let left_idx = left_binders.iter().rposition(|b| *b == left_name.as_str());
            let right_idx = right_binders.iter().rposition(|b| *b == right_name.as_str());

            return match (left_idx, right_idx) {
                (None, None) => left_name == right_name,
                (Some(l), Some(r)) => l == r,
                _ => false,
            };
        }
        (
            Expression::Abstraction {
                parameter: left_param,
                body: left_body,
            },
            Expression::Abstraction {
                parameter: right_param,
                body: right_body,
            },
        ) => {
            left_binders.push(left_param.as_str());
            right_binders.push(right_param.as_str());

            let result = alpha_equivalent_helper(left_body, right_body, left_binders, right_binders);

            left_binders.pop();
            right_binders.pop();
            return result;
        }
        (
            Expression::Application {
                function: left_fn,
                argument: left_arg,
            },
            Expression::Application {
                function: right_fn,
                argument: right_arg,
            },
        ) => {
            return alpha_equivalent_helper(left_fn, right_fn, left_binders, right_binders)
                && alpha_equivalent_helper(left_arg, right_arg, left_binders, right_binders);
        }
        _ => {
            return false;
        }
    }
}

// Helper function to produce the canonical string representation of an
// Expression. Every abstraction and application is parenthesized.
fn expression_to_string_helper(expression: &Expression, string_so_far: &mut String) {
    match expression {
        Expression::Variable { name } => {
            string_so_far.push_str(name.as_str());
        }
        Expression::Abstraction { parameter, body } => {
            string_so_far.push_str("(λ");
            string_so_far.push_str(parameter.as_str());
            string_so_far.push_str(". ");
            expression_to_string_helper(body, string_so_far);
            string_so_far.push(')');
        }
        Expression::Application { function, argument } => {
            string_so_far.push('(');
            expression_to_string_helper(function, string_so_far);
            string_so_far.push(' ');
            expression_to_string_helper(argument, string_so_far);
            string_so_far.push(')');
        }
    };
}

/// Renders an expression in canonical, fully parenthesized form.
pub fn render(expression: &Expression) -> String {
    let mut out_string = String::new();
    expression_to_string_helper(expression, &mut out_string);
    return out_string;
}

impl std::fmt::Display for Expression {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        return write!(f, "{}", render(self).as_str());
    }
}

/// Computes the free variables in the given lambda calculus expression.
pub fn get_all_free_variables(expression: &Expression) -> HashSet<&str> {
    match expression {
        Expression::Variable { name } => {
            return HashSet::from([name.as_str()]);
        }
        Expression::Application { function, argument } => {
            let function_free_vars = get_all_free_variables(function);
            let argument_free_vars = get_all_free_variables(argument);

            return function_free_vars
                .union(&argument_free_vars)
                .copied()
                .collect();
        }
        Expression::Abstraction { parameter, body } => {
            let mut body_free_vars = get_all_free_variables(body);
            body_free_vars.remove(parameter.as_str());
            return body_free_vars;
        }
    };
}

/// Finds all variables used in the given lambda calculus expression, bound
/// parameters included.
pub fn get_all_variables(expression: &Expression) -> HashSet<&str> {
    match expression {
        Expression::Variable { name } => {
            return HashSet::from([name.as_str()]);
        }
        Expression::Application { function, argument } => {
            let function_vars = get_all_variables(function);
            let argument_vars = get_all_variables(argument);

            return function_vars.union(&argument_vars).copied().collect();
        }
        Expression::Abstraction { parameter, body } => {
            let mut body_vars = get_all_variables(body);
            body_vars.insert(parameter.as_str());
            return body_vars;
        }
    };
}

/// Checks whether `var_name` occurs free in the given expression.
pub fn occurs_free(var_name: &str, expression: &Expression) -> bool {
    match expression {
        Expression::Variable { name } => {
            return name == var_name;
        }
        Expression::Application { function, argument } => {
            return occurs_free(var_name, function) || occurs_free(var_name, argument);
        }
        Expression::Abstraction { parameter, body } => {
            return parameter != var_name && occurs_free(var_name, body);
        }
    };
}

/// Renames the free occurrences of a variable in the given lambda calculus
/// expression. Occurrences shadowed by an inner binder of the same name are
/// left alone.
pub fn rename_variable(old_var_name: &str, new_var_name: &str, expr_to_rename: &mut Expression) {
    match expr_to_rename {
        Expression::Variable { name } => {
            if name.as_str() == old_var_name {
                *name = String::from(new_var_name);
            }
        }
        Expression::Application { function, argument } => {
            rename_variable(old_var_name, new_var_name, function);
            rename_variable(old_var_name, new_var_name, argument);
        }
        Expression::Abstraction { parameter, body } => {
            if parameter.as_str() != old_var_name {
                rename_variable(old_var_name, new_var_name, body);
            }
        }
    }
}
