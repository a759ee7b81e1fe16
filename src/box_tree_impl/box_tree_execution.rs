//! Reduces lambda-calculus expressions in the box-tree representation to
//! normal form.

use std::collections::HashSet;

use thiserror::Error;
use tracing::trace;

use crate::box_tree_impl::binding_context::BindingContext;
use crate::box_tree_impl::box_tree_ast::Expression;
use crate::box_tree_impl::box_tree_substitution::{rename_colliding_binders, substitute};

/// Upper bound on the number of reduction steps one evaluation may take.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub enum StepLimit {
    #[default]
    Unbounded,
    AtMost(usize),
}

impl From<Option<usize>> for StepLimit {
    fn from(value: Option<usize>) -> Self {
        return match value {
            Some(max_steps) => StepLimit::AtMost(max_steps),
            None => StepLimit::Unbounded,
        };
    }
}

/// Errors that may be thrown while reducing an expression.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum ReductionError {
    #[error("No normal form reached within {limit} steps, stopped at {last}")]
    StepLimitReached { limit: usize, last: Box<Expression> },
}

/// The normal form of an expression and the number of steps it took.
#[derive(Debug, PartialEq, Eq)]
pub struct Evaluation {
    pub normal_form: Expression,
    pub steps: usize,
}

// Performs one normal-order step on expr_body. `bound_names` holds the
// parameters of the abstractions enclosing expr_body. Returns the stepped
// expression and whether anything was rewritten.
fn step_helper<'a>(
    expr_body: &'a Expression,
    context: &BindingContext,
    bound_names: &mut Vec<&'a str>,
) -> (Expression, bool) {
    match expr_body {
        // A free variable naming a definition expands to it, once.
        Expression::Variable { name } => {
            if bound_names.contains(&name.as_str()) {
                return (expr_body.clone(), false);
            }

            match context.lookup(name) {
                Some(def_body) => {
                    let names_in_scope: HashSet<&str> = bound_names.iter().copied().collect();
                    return (rename_colliding_binders(def_body, &names_in_scope), true);
                }
                None => {
                    return (expr_body.clone(), false);
                }
            }
        }

        Expression::Application { function, argument } => {
            // The function being applied is an abstraction, so we are at a
            // redex.
            if let Expression::Abstraction { parameter, body } = &**function {
                return (substitute(body, parameter, argument), true);
            }

            let (new_function, function_changed) = step_helper(function, context, bound_names);
            let (new_argument, argument_changed) = step_helper(argument, context, bound_names);

            return (
                Expression::Application {
                    function: Box::new(new_function),
                    argument: Box::new(new_argument),
                },
                function_changed || argument_changed,
            );
        }

        Expression::Abstraction { parameter, body } => {
            bound_names.push(parameter.as_str());
            let (new_body, body_changed) = step_helper(body, context, bound_names);
            bound_names.pop();

            return (
                Expression::Abstraction {
                    parameter: parameter.clone(),
                    body: Box::new(new_body),
                },
                body_changed,
            );
        }
    };
}

/// Performs one reduction step: beta-reduces the redex at the top of the
/// expression if there is one, otherwise steps the function and argument of
/// an application, or the body of an abstraction. Free variables bound in
/// `context` are expanded. The boolean says whether anything was rewritten.
pub fn step(expr_body: &Expression, context: &BindingContext) -> (Expression, bool) {
    return step_helper(expr_body, context, &mut Vec::new());
}

/// Repeatedly steps `expr_body` until a step rewrites nothing, giving up with
/// an error once `step_limit` steps have rewritten something.
pub fn execute_expression(
    mut expr_body: Expression,
    context: &BindingContext,
    step_limit: StepLimit,
) -> Result<Evaluation, ReductionError> {
    let mut steps = 0;

    loop {
        let (new_expr_body, change_made) = step(&expr_body, context);
        if !change_made {
            return Ok(Evaluation {
                normal_form: expr_body,
                steps,
            });
        }

        if let StepLimit::AtMost(limit) = step_limit {
            if steps >= limit {
                return Err(ReductionError::StepLimitReached {
                    limit,
                    last: Box::new(expr_body),
                });
            }
        }

        steps += 1;
        trace!(step = steps, "{}", new_expr_body);
        expr_body = new_expr_body;
    }
}

/// Reduces `expr_body` to normal form with no step limit. Runs forever on
/// expressions that have no normal form.
pub fn interpret(mut expr_body: Expression, context: &BindingContext) -> Expression {
    loop {
        let (new_expr_body, change_made) = step(&expr_body, context);
        if !change_made {
            return expr_body;
        }
        expr_body = new_expr_body;
    }
}

#[cfg(test)]
mod tests {
    use std::thread;
    use std::time::Duration;

    use super::*;
    use crate::box_tree_impl::box_tree_recursive_descent_parsing::parse_expression;

    fn parse(program_str: &str) -> Expression {
        return parse_expression(program_str).expect("Unable to parse expression string.");
    }

    fn church_context() -> BindingContext {
        let mut context = BindingContext::new();
        context.define("zero", parse("λf. λx. x"));
        context.define("succ", parse("λn. λf. λx. f (n f x)"));
        context.define("add", parse("λm. λn. λf. λx. m f (n f x)"));
        context.define("one", parse("succ zero"));
        context.define("two", parse("succ one"));
        return context;
    }

    // Evaluates each program string with an empty context and checks the
    // rendered normal form.
    #[test]
    fn test_interpret_simple() {
        let programs_and_expected_outputs = vec![
            ("(λx. x) a", "a"),
            ("(λx. x y) (λz. z)", "y"),
            ("(λa. λb. a b) ((λx. x) (λy. y))", "(λb. b)"),
            ("a b c", "((a b) c)"),
            ("(λx. x) (λy. y) (λz. z)", "(λz. z)"),
            ("λx. (λy. y) x", "(λx. x)"),
        ];

        let context = BindingContext::new();
        for (program_str, expected_output) in programs_and_expected_outputs {
            assert_eq!(interpret(parse(program_str), &context).to_string(), expected_output);
        }
    }

    #[test]
    fn test_step_reduces_outermost_redex_first() {
        let context = BindingContext::new();
        let (stepped, change_made) = step(&parse("(λx. x) ((λy. y) a)"), &context);

        assert!(change_made);
        assert_eq!(stepped, parse("(λy. y) a"));
    }

    #[test]
    fn test_step_steps_both_sides_of_stuck_application() {
        let context = BindingContext::new();
        let (stepped, change_made) = step(&parse("f ((λx. x) a) ((λy. y) b)"), &context);

        assert!(change_made);
        assert_eq!(stepped, parse("f a b"));
    }

    #[test]
    fn test_normal_form_is_idempotent() {
        let context = BindingContext::new();

        for program_str in ["x", "λx. x", "λf. λx. f (f x)", "a (λb. b c)"] {
            let expr = parse(program_str);
            let (_, change_made) = step(&expr, &context);
            assert!(!change_made);
            assert_eq!(interpret(expr.clone(), &context), expr);
        }
    }

    #[test]
    fn test_named_binding_expansion() {
        let mut context = BindingContext::new();
        context.define("I", parse("λx. x"));

        assert_eq!(interpret(parse("I y"), &context), parse("y"));
    }

    #[test]
    fn test_bound_names_are_not_expanded() {
        let mut context = BindingContext::new();
        context.define("I", parse("λx. x"));

        let expr = parse("λI. I z");
        assert_eq!(interpret(expr.clone(), &context), expr);
    }

    #[test]
    fn test_expansion_renames_binders_in_scope() {
        let mut context = BindingContext::new();
        context.define("K", parse("λx. λy. x"));

        // The expanded K sits under a binder for x, so its own x is renamed.
        let result = interpret(parse("λx. K"), &context);
        assert_eq!(result, parse("λx. λx'. λy. x'"));
    }

    #[test]
    fn test_beta_reduction_avoids_capture() {
        let context = BindingContext::new();

        // Without renaming this would wrongly give \y. y.
        let result = interpret(parse("(λx. λy. x) y"), &context);
        assert_eq!(result, parse("λy'. y"));

        let result = interpret(parse("λy. (λx. λy. x) y"), &context);
        assert!(result.alpha_equivalent(&parse("λa. λb. a")));
    }

    #[test]
    fn test_church_addition() {
        let context = church_context();

        let result = interpret(parse("add one two"), &context);
        assert!(result.alpha_equivalent(&parse("λf. λx. f (f (f x))")));

        let result = interpret(parse("add one two g z"), &context);
        assert_eq!(result, parse("g (g (g z))"));
    }

    #[test]
    fn test_execute_expression_counts_steps() {
        let context = BindingContext::new();

        let evaluation = execute_expression(parse("(λx. x) a"), &context, StepLimit::Unbounded)
            .expect("Unexpected reduction error.");
        assert_eq!(
            evaluation,
            Evaluation {
                normal_form: parse("a"),
                steps: 1,
            }
        );

        let evaluation = execute_expression(parse("a"), &context, StepLimit::AtMost(0))
            .expect("Unexpected reduction error.");
        assert_eq!(evaluation.steps, 0);
    }

    #[test]
    fn test_step_limit_stops_non_terminating_expression() {
        let context = BindingContext::new();
        let omega = parse("(λx. x x) (λx. x x)");

        let result = execute_expression(omega.clone(), &context, StepLimit::AtMost(1000));

        assert_eq!(
            result,
            Err(ReductionError::StepLimitReached {
                limit: 1000,
                last: Box::new(omega),
            })
        );
    }

    #[test]
    fn test_step_limit_stops_recursive_definition() {
        let mut context = BindingContext::new();
        context.define("loop", parse("loop"));

        let result = execute_expression(parse("loop"), &context, StepLimit::AtMost(10));
        assert!(matches!(
            result,
            Err(ReductionError::StepLimitReached { limit: 10, .. })
        ));
    }

    #[test]
    fn test_unbounded_interpret_keeps_running_on_omega() {
        let handle = thread::spawn(|| {
            let context = BindingContext::new();
            let omega = parse("(λx. x x) (λx. x x)");
            interpret(omega, &context)
        });

        thread::sleep(Duration::from_millis(300));

        // The thread is left spinning; it goes away when the test binary exits.
        assert!(!handle.is_finished());
    }
}
