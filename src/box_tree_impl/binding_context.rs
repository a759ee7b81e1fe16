//! Name -> expression table used to expand named definitions during
//! reduction.

use std::collections::HashMap;

use tracing::debug;

use crate::box_tree_impl::box_tree_ast::Expression;

/// Holds the expressions bound by definitions. Entries are only ever added or
/// overwritten, never removed.
#[derive(Debug, Default, Clone)]
pub struct BindingContext {
    def_map: HashMap<String, Expression>,
}

impl BindingContext {
    pub fn new() -> Self {
        return Self::default();
    }

    /// Binds `def_name` to `def_body`, replacing any previous binding.
    pub fn define(&mut self, def_name: &str, def_body: Expression) {
        debug!(def_name, def_body = %def_body, "defining name");
        self.def_map.insert(String::from(def_name), def_body);
    }

    pub fn lookup(&self, def_name: &str) -> Option<&Expression> {
        return self.def_map.get(def_name);
    }

    pub fn contains(&self, def_name: &str) -> bool {
        return self.def_map.contains_key(def_name);
    }

    pub fn len(&self) -> usize {
        return self.def_map.len();
    }

    pub fn is_empty(&self) -> bool {
        return self.def_map.is_empty();
    }

    /// Names of all definitions, in no particular order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        return self.def_map.keys().map(String::as_str);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_define_and_lookup() {
        let mut context = BindingContext::new();
        assert!(context.is_empty());
        assert_eq!(context.lookup("I"), None);

        let identity = Expression::abs("x", Expression::var("x"));
        context.define("I", identity.clone());

        assert_eq!(context.lookup("I"), Some(&identity));
        assert!(context.contains("I"));
        assert!(!context.contains("K"));
        assert_eq!(context.len(), 1);
        assert_eq!(context.names().collect::<Vec<_>>(), vec!["I"]);
    }

    #[test]
    fn test_define_overwrites() {
        let mut context = BindingContext::new();
        context.define("a", Expression::var("b"));
        context.define("a", Expression::var("c"));

        assert_eq!(context.lookup("a"), Some(&Expression::var("c")));
        assert_eq!(context.len(), 1);
    }
}
