//! Environment for variable scoping.
//!
//! Uses a scope stack (not cloning) for efficient scope management. Each
//! scope holds its own bindings plus a parent link, so lookup and
//! assignment walk outward through the chain.

use std::cell::RefCell;
use std::fmt;
use std::ops::Deref;
use std::rc::Rc;

use rustc_hash::FxHashMap;

use flint_ir::Name;

use crate::value::Value;

/// Error from an environment operation.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EnvError {
    /// `define` target already bound in the current scope.
    AlreadyDefined,
    /// `assign` target not bound in any scope on the chain.
    Undefined,
}

/// A single-threaded scope wrapper for reference-counted interior
/// mutability.
///
/// Wraps `Rc<RefCell<T>>` so all scope allocations go through the
/// `LocalScope::new()` factory. Not thread-safe: the interpreter runs
/// single-threaded, so `Rc` is used instead of `Arc`.
#[repr(transparent)]
pub struct LocalScope<T>(Rc<RefCell<T>>);

impl<T> LocalScope<T> {
    /// Create a new `LocalScope` wrapping the given value.
    #[inline]
    pub fn new(value: T) -> Self {
        LocalScope(Rc::new(RefCell::new(value)))
    }

    /// Borrow the inner value immutably.
    #[inline]
    pub fn borrow(&self) -> std::cell::Ref<'_, T> {
        self.0.borrow()
    }

    /// Borrow the inner value mutably.
    #[inline]
    pub fn borrow_mut(&self) -> std::cell::RefMut<'_, T> {
        self.0.borrow_mut()
    }
}

impl<T> Clone for LocalScope<T> {
    #[inline]
    fn clone(&self) -> Self {
        LocalScope(Rc::clone(&self.0))
    }
}

impl<T: fmt::Debug> fmt::Debug for LocalScope<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("LocalScope").field(&self.0).finish()
    }
}

impl<T: Default> Default for LocalScope<T> {
    fn default() -> Self {
        LocalScope::new(T::default())
    }
}

impl<T> Deref for LocalScope<T> {
    type Target = RefCell<T>;

    #[inline]
    fn deref(&self) -> &Self::Target {
        &self.0
    }
}

/// A single scope containing variable bindings.
#[derive(Clone, Debug, Default)]
pub struct Scope {
    /// Variable bindings in this scope.
    bindings: FxHashMap<Name, Value>,
    /// Parent scope (for lexical scoping).
    parent: Option<LocalScope<Scope>>,
}

impl Scope {
    /// Create a new empty scope with no parent.
    pub fn new() -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: None,
        }
    }

    /// Create a new scope with a parent.
    pub fn with_parent(parent: LocalScope<Scope>) -> Self {
        Scope {
            bindings: FxHashMap::default(),
            parent: Some(parent),
        }
    }

    /// Define a variable in this scope.
    ///
    /// Fails if the name is already bound *in this scope's own bindings*;
    /// the parent chain is not consulted, so shadowing an outer binding is
    /// allowed but redefining in the same scope is not.
    #[inline]
    pub fn define(&mut self, name: Name, value: Value) -> Result<(), EnvError> {
        if self.bindings.contains_key(&name) {
            return Err(EnvError::AlreadyDefined);
        }
        self.bindings.insert(name, value);
        Ok(())
    }

    /// Look up a variable, walking the parent chain outward.
    #[inline]
    pub fn lookup(&self, name: Name) -> Option<Value> {
        if let Some(value) = self.bindings.get(&name) {
            return Some(value.clone());
        }
        if let Some(parent) = &self.parent {
            return parent.borrow().lookup(name);
        }
        None
    }

    /// Assign to a variable, mutating the first scope on the chain that
    /// binds the name.
    #[inline]
    pub fn assign(&mut self, name: Name, value: Value) -> Result<(), EnvError> {
        if let Some(slot) = self.bindings.get_mut(&name) {
            *slot = value;
            return Ok(());
        }
        if let Some(parent) = &self.parent {
            return parent.borrow_mut().assign(name, value);
        }
        Err(EnvError::Undefined)
    }
}

/// Environment for the interpreter using a scope stack.
///
/// Instead of cloning environments, a stack of scopes is pushed and popped
/// as blocks enter and exit. The global scope is always at the bottom and
/// persists across top-level `interpret` calls (REPL entries included).
pub struct Environment {
    /// Stack of scopes, with the current scope at the top.
    scopes: Vec<LocalScope<Scope>>,
    /// Global scope (always at the bottom).
    global: LocalScope<Scope>,
}

impl Environment {
    /// Create a new environment with a global scope.
    pub fn new() -> Self {
        let global = LocalScope::new(Scope::new());
        Environment {
            scopes: vec![global.clone()],
            global,
        }
    }

    /// Current scope depth (1 = only the global scope).
    pub fn depth(&self) -> usize {
        self.scopes.len()
    }

    /// Push a new scope onto the stack.
    #[inline]
    pub fn push_scope(&mut self) {
        let parent = self.current_scope();
        let new_scope = LocalScope::new(Scope::with_parent(parent));
        self.scopes.push(new_scope);
    }

    /// Pop the current scope from the stack. The global scope is never
    /// popped.
    #[inline]
    pub fn pop_scope(&mut self) {
        if self.scopes.len() > 1 {
            self.scopes.pop();
        }
    }

    /// Get the current scope.
    #[inline]
    fn current_scope(&self) -> LocalScope<Scope> {
        self.scopes.last().unwrap_or(&self.global).clone()
    }

    /// Define a variable in the current scope (same-scope redefinition is
    /// rejected).
    #[inline]
    pub fn define(&mut self, name: Name, value: Value) -> Result<(), EnvError> {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow_mut()
            .define(name, value)
    }

    /// Look up a variable by name, walking outward to the global scope.
    #[inline]
    pub fn lookup(&self, name: Name) -> Option<Value> {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow()
            .lookup(name)
    }

    /// Assign to an existing variable, walking outward to the global scope.
    #[inline]
    pub fn assign(&mut self, name: Name, value: Value) -> Result<(), EnvError> {
        self.scopes
            .last()
            .unwrap_or(&self.global)
            .borrow_mut()
            .assign(name, value)
    }

    /// Define a binding directly in the global scope (native functions).
    pub fn define_global(&mut self, name: Name, value: Value) -> Result<(), EnvError> {
        self.global.borrow_mut().define(name, value)
    }

    /// Create the environment a function body runs in.
    ///
    /// The child shares only the global scope: function bodies see their
    /// parameters and globals, not the locals of the scope they were
    /// defined or called in.
    #[must_use]
    pub fn child(&self) -> Self {
        let global = self.global.clone();
        Environment {
            scopes: vec![global.clone()],
            global,
        }
    }
}

impl Default for Environment {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flint_ir::StringInterner;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_scope_define_lookup() {
        let interner = StringInterner::new();
        let x = interner.intern("x");

        let mut scope = Scope::new();
        assert_eq!(scope.define(x, Value::Number(42.0)), Ok(()));
        assert_eq!(scope.lookup(x), Some(Value::Number(42.0)));
    }

    #[test]
    fn test_scope_redefinition_rejected() {
        let interner = StringInterner::new();
        let x = interner.intern("x");

        let mut scope = Scope::new();
        assert_eq!(scope.define(x, Value::Number(1.0)), Ok(()));
        assert_eq!(
            scope.define(x, Value::Number(2.0)),
            Err(EnvError::AlreadyDefined)
        );
        // The original binding is untouched.
        assert_eq!(scope.lookup(x), Some(Value::Number(1.0)));
    }

    #[test]
    fn test_scope_shadowing() {
        let interner = StringInterner::new();
        let x = interner.intern("x");

        let parent = LocalScope::new(Scope::new());
        assert_eq!(parent.borrow_mut().define(x, Value::Number(1.0)), Ok(()));

        let mut child = Scope::with_parent(parent);
        // Shadowing an outer binding is not a redefinition.
        assert_eq!(child.define(x, Value::Number(2.0)), Ok(()));
        assert_eq!(child.lookup(x), Some(Value::Number(2.0)));
    }

    #[test]
    fn test_assign_walks_outward() {
        let interner = StringInterner::new();
        let x = interner.intern("x");

        let mut env = Environment::new();
        env.define(x, Value::Number(1.0)).ok();
        env.push_scope();
        assert_eq!(env.assign(x, Value::Number(5.0)), Ok(()));
        env.pop_scope();
        assert_eq!(env.lookup(x), Some(Value::Number(5.0)));
    }

    #[test]
    fn test_assign_undefined() {
        let interner = StringInterner::new();
        let x = interner.intern("x");

        let mut env = Environment::new();
        assert_eq!(
            env.assign(x, Value::Number(1.0)),
            Err(EnvError::Undefined)
        );
    }

    #[test]
    fn test_environment_push_pop() {
        let interner = StringInterner::new();
        let x = interner.intern("x");

        let mut env = Environment::new();
        env.define(x, Value::Number(10.0)).ok();

        env.push_scope();
        env.define(x, Value::Number(20.0)).ok();
        assert_eq!(env.lookup(x), Some(Value::Number(20.0)));

        env.pop_scope();
        assert_eq!(env.lookup(x), Some(Value::Number(10.0)));
    }

    #[test]
    fn test_global_scope_never_popped() {
        let interner = StringInterner::new();
        let x = interner.intern("x");

        let mut env = Environment::new();
        env.define(x, Value::Nil).ok();
        env.pop_scope();
        env.pop_scope();
        assert_eq!(env.lookup(x), Some(Value::Nil));
        assert_eq!(env.depth(), 1);
    }

    #[test]
    fn test_child_sees_only_globals() {
        let interner = StringInterner::new();
        let g = interner.intern("g");
        let local = interner.intern("local");

        let mut env = Environment::new();
        env.define_global(g, Value::Number(99.0)).ok();
        env.push_scope();
        env.define(local, Value::Number(1.0)).ok();

        let child = env.child();
        assert_eq!(child.lookup(g), Some(Value::Number(99.0)));
        assert_eq!(child.lookup(local), None);
    }

    #[test]
    fn test_child_shares_global_mutations() {
        let interner = StringInterner::new();
        let g = interner.intern("g");

        let mut env = Environment::new();
        env.define_global(g, Value::Number(1.0)).ok();

        let mut child = env.child();
        assert_eq!(child.assign(g, Value::Number(2.0)), Ok(()));
        // The parent sees the assignment: the global scope is shared.
        assert_eq!(env.lookup(g), Some(Value::Number(2.0)));
    }

    #[test]
    fn test_sibling_scopes_redefine_independently() {
        let interner = StringInterner::new();
        let x = interner.intern("x");

        let mut env = Environment::new();
        env.push_scope();
        assert_eq!(env.define(x, Value::Number(1.0)), Ok(()));
        env.pop_scope();
        env.push_scope();
        // A fresh sibling scope can define the same name again.
        assert_eq!(env.define(x, Value::Number(2.0)), Ok(()));
        env.pop_scope();
    }
}
