//! Capture-avoiding substitution on box-tree expressions.

use std::collections::HashSet;

use crate::box_tree_impl::box_tree_ast::{
    get_all_free_variables, get_all_variables, occurs_free, rename_variable, Expression,
};

/// Produces a name derived from `base` that is not in `vars_to_avoid`, by
/// appending primes.
pub fn fresh_name(base: &str, vars_to_avoid: &HashSet<&str>) -> String {
    let mut new_name = String::from(base);

    while vars_to_avoid.contains(new_name.as_str()) {
        new_name.push('\'');
    }

    return new_name;
}

/// Given an abstraction's formal param and body, and the free variables of a
/// value being substituted into the body, renames the formal param so that the
/// value's free variables are not captured. Returns the new param name.
fn perform_alpha_conversion(
    formal_param: &str,
    fn_body: &mut Expression,
    value_free_vars: &HashSet<&str>,
) -> String {
    let new_formal_param = {
        let all_fn_body_vars = get_all_variables(fn_body);
        let vars_to_avoid: HashSet<&str> =
            all_fn_body_vars.union(value_free_vars).copied().collect();
        fresh_name(formal_param, &vars_to_avoid)
    };

    rename_variable(formal_param, new_formal_param.as_str(), fn_body);
    return new_formal_param;
}

fn substitute_helper(
    expr: &Expression,
    var_name: &str,
    var_value: &Expression,
    value_free_vars: &HashSet<&str>,
) -> Expression {
    match expr {
        Expression::Variable { name } => {
            if name == var_name {
                return var_value.clone();
            }
            return expr.clone();
        }

        Expression::Application { function, argument } => {
            return Expression::Application {
                function: Box::new(substitute_helper(
                    function,
                    var_name,
                    var_value,
                    value_free_vars,
                )),
                argument: Box::new(substitute_helper(
                    argument,
                    var_name,
                    var_value,
                    value_free_vars,
                )),
            };
        }

        Expression::Abstraction { parameter, body } => {
            // var_name is shadowed, or absent, so nothing below changes.
            if parameter == var_name || !occurs_free(var_name, body) {
                return expr.clone();
            }

            let mut parameter = parameter.clone();
            let mut body = (**body).clone();

            // To prevent variable capture, perform alpha conversion if
            // var_value contains the parameter as a free variable.
            if value_free_vars.contains(parameter.as_str()) {
                parameter = perform_alpha_conversion(&parameter, &mut body, value_free_vars);
            }

            return Expression::Abstraction {
                parameter,
                body: Box::new(substitute_helper(
                    &body,
                    var_name,
                    var_value,
                    value_free_vars,
                )),
            };
        }
    };
}

/// Replaces the free occurrences of `var_name` in `expr` with `var_value`,
/// alpha-renaming binders that would otherwise capture free variables of
/// `var_value`.
pub fn substitute(expr: &Expression, var_name: &str, var_value: &Expression) -> Expression {
    let value_free_vars = get_all_free_variables(var_value);
    return substitute_helper(expr, var_name, var_value, &value_free_vars);
}

fn rename_colliding_binders_helper(
    expr: &Expression,
    names_in_scope: &HashSet<&str>,
    vars_to_avoid: &HashSet<&str>,
) -> Expression {
    match expr {
        Expression::Variable { .. } => {
            return expr.clone();
        }

        Expression::Application { function, argument } => {
            return Expression::Application {
                function: Box::new(rename_colliding_binders_helper(
                    function,
                    names_in_scope,
                    vars_to_avoid,
                )),
                argument: Box::new(rename_colliding_binders_helper(
                    argument,
                    names_in_scope,
                    vars_to_avoid,
                )),
            };
        }

        Expression::Abstraction { parameter, body } => {
            if !names_in_scope.contains(parameter.as_str()) {
                return Expression::Abstraction {
                    parameter: parameter.clone(),
                    body: Box::new(rename_colliding_binders_helper(
                        body,
                        names_in_scope,
                        vars_to_avoid,
                    )),
                };
            }

            let new_parameter = fresh_name(parameter, vars_to_avoid);
            let mut body = (**body).clone();
            rename_variable(parameter, new_parameter.as_str(), &mut body);

            return Expression::Abstraction {
                parameter: new_parameter,
                body: Box::new(rename_colliding_binders_helper(
                    &body,
                    names_in_scope,
                    vars_to_avoid,
                )),
            };
        }
    };
}

/// Prepares a named definition for insertion at a point where
/// `names_in_scope` are already bound: every binder in `replacement` whose
/// parameter collides with one of those names gets a fresh name, applied
/// consistently to the references it binds.
pub fn rename_colliding_binders(
    replacement: &Expression,
    names_in_scope: &HashSet<&str>,
) -> Expression {
    let vars_to_avoid: HashSet<&str> = get_all_variables(replacement)
        .union(names_in_scope)
        .copied()
        .collect();

    return rename_colliding_binders_helper(replacement, names_in_scope, &vars_to_avoid);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::box_tree_impl::box_tree_recursive_descent_parsing::parse_expression;

    fn parse(program_str: &str) -> Expression {
        return parse_expression(program_str).expect("Unable to parse expression string.");
    }

    #[test]
    fn test_substitute_variables() {
        let value = parse("λz. z");

        assert_eq!(substitute(&parse("x"), "x", &value), value);
        assert_eq!(substitute(&parse("y"), "x", &value), parse("y"));
        assert_eq!(
            substitute(&parse("x y x"), "x", &parse("a")),
            parse("a y a")
        );
    }

    #[test]
    fn test_substitute_stops_at_shadowing_binder() {
        let expr = parse("λx. x");
        assert_eq!(substitute(&expr, "x", &parse("a")), expr);

        let expr = parse("x (λx. x)");
        assert_eq!(substitute(&expr, "x", &parse("a")), parse("a (λx. x)"));
    }

    #[test]
    fn test_substitute_under_binder() {
        assert_eq!(
            substitute(&parse("λy. x y"), "x", &parse("a")),
            parse("λy. a y")
        );
    }

    #[test]
    fn test_substitute_avoids_capture() {
        // Substituting y for x in \y. x must not bind the free y.
        let result = substitute(&parse("λy. x"), "x", &parse("y"));
        assert_eq!(result, parse("λy'. y"));

        // The fresh name also avoids names already used in the body.
        let result = substitute(&parse("λy. x y'"), "x", &parse("y"));
        assert_eq!(result, parse("λy''. y y'"));
    }

    #[test]
    fn test_substitute_leaves_unaffected_binders_alone() {
        // x does not occur in the body, so no renaming is needed.
        let expr = parse("λy. y");
        assert_eq!(substitute(&expr, "x", &parse("y")), expr);
    }

    #[test]
    fn test_fresh_name() {
        assert_eq!(fresh_name("x", &HashSet::new()), "x");
        assert_eq!(fresh_name("x", &HashSet::from(["x", "x'"])), "x''");
    }

    #[test]
    fn test_rename_colliding_binders() {
        let replacement = parse("λx. λy. x y");
        let names_in_scope = HashSet::from(["x"]);

        let renamed = rename_colliding_binders(&replacement, &names_in_scope);

        assert_eq!(renamed, parse("λx'. λy. x' y"));
        assert!(renamed.alpha_equivalent(&replacement));
    }

    #[test]
    fn test_rename_colliding_binders_without_collision() {
        let replacement = parse("λa. a b");
        let names_in_scope = HashSet::from(["x", "b"]);

        assert_eq!(
            rename_colliding_binders(&replacement, &names_in_scope),
            replacement
        );
    }
}
