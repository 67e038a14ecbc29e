//! RAII scope guard for environment management.
//!
//! The guard holds `&mut Interpreter` and implements `Deref`/`DerefMut`,
//! so it is used exactly like the interpreter itself. When it drops -
//! normal exit, fault propagation, or unwinding - `pop_scope()` runs, so
//! the previous environment is always restored.

use std::ops::{Deref, DerefMut};

use super::Interpreter;

/// Guard that pops the current environment scope on drop.
pub(crate) struct ScopedInterpreter<'guard, 'interp> {
    interpreter: &'guard mut Interpreter<'interp>,
}

impl Drop for ScopedInterpreter<'_, '_> {
    fn drop(&mut self) {
        self.interpreter.env.pop_scope();
    }
}

impl<'interp> Deref for ScopedInterpreter<'_, 'interp> {
    type Target = Interpreter<'interp>;

    fn deref(&self) -> &Self::Target {
        self.interpreter
    }
}

impl DerefMut for ScopedInterpreter<'_, '_> {
    fn deref_mut(&mut self) -> &mut Self::Target {
        self.interpreter
    }
}

impl<'a> Interpreter<'a> {
    /// Push a scope and return a guard that pops it on drop.
    pub(crate) fn scoped(&mut self) -> ScopedInterpreter<'_, 'a> {
        self.env.push_scope();
        ScopedInterpreter { interpreter: self }
    }
}
