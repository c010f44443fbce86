//! Lexical scope chain for the resolver.
//!
//! Each scope frame holds its own bindings plus a reference to its parent
//! frame for lookup fallback. Entering a block or a mapper body pushes a
//! fresh frame; `def` inserts into the current frame, so later sibling
//! commands in the same block observe the binding while nothing outside the
//! frame does.

use std::rc::Rc;

use im::HashMap;

use crate::runtime::value::Value;

#[derive(Debug, Clone)]
pub struct Scope<T> {
    bindings: HashMap<String, Value<T>>,
    parent: Option<Rc<Scope<T>>>,
}

impl<T: Clone> Scope<T> {
    /// The root scope: empty bindings, no parent.
    pub fn root() -> Self {
        Self {
            bindings: HashMap::new(),
            parent: None,
        }
    }

    /// Pushes a fresh, empty frame on top of this scope.
    pub fn child(&self) -> Self {
        Self {
            bindings: HashMap::new(),
            parent: Some(Rc::new(self.clone())),
        }
    }

    /// Looks a name up through the whole chain, innermost frame first.
    pub fn lookup(&self, name: &str) -> Option<&Value<T>> {
        match self.bindings.get(name) {
            Some(value) => Some(value),
            None => self.parent.as_deref().and_then(|p| p.lookup(name)),
        }
    }

    /// Whether a name is bound anywhere in the chain. Binding sites use
    /// this to reject re-binding an existing name.
    pub fn is_bound(&self, name: &str) -> bool {
        self.lookup(name).is_some()
    }

    /// Binds a name in the current frame.
    pub fn bind(&mut self, name: impl Into<String>, value: Value<T>) {
        self.bindings.insert(name.into(), value);
    }
}

impl<T: Clone> Default for Scope<T> {
    fn default() -> Self {
        Self::root()
    }
}

#[cfg(test)]
mod scope_tests {
    use super::*;

    type V = Value<()>;

    #[test]
    fn child_frames_shadow_and_do_not_leak() {
        let mut outer: Scope<()> = Scope::root();
        outer.bind("x", V::Number(1.0));

        let mut inner = outer.child();
        inner.bind("x", V::Number(2.0));
        inner.bind("y", V::Number(3.0));

        assert_eq!(inner.lookup("x"), Some(&V::Number(2.0)));
        assert_eq!(inner.lookup("y"), Some(&V::Number(3.0)));
        assert_eq!(outer.lookup("x"), Some(&V::Number(1.0)));
        assert_eq!(outer.lookup("y"), None);
    }

    #[test]
    fn is_bound_consults_the_whole_chain() {
        let mut outer: Scope<()> = Scope::root();
        outer.bind("x", V::Number(1.0));
        let inner = outer.child();
        assert!(inner.is_bound("x"));
        assert!(!inner.is_bound("z"));
    }
}
