//! Self-dependency detection for bindings under construction.

use std::cell::RefCell;

use crate::error::{DiError, DiResult};

// Bindings currently constructing on this thread, outermost first.
thread_local! {
    static CONSTRUCTING: RefCell<Vec<(usize, String)>> = const { RefCell::new(Vec::new()) };
}

/// Guard for managing the thread-local construction stack
struct StackGuard;

impl StackGuard {
    fn enter(binding: usize, name: &str) -> DiResult<Self> {
        CONSTRUCTING.with(|stack| {
            let mut stack = stack.borrow_mut();
            if let Some(start) = stack.iter().position(|(id, _)| *id == binding) {
                let mut path: Vec<String> = stack[start..].iter().map(|(_, n)| n.clone()).collect();
                path.push(name.to_string());
                return Err(DiError::Circular(path));
            }
            stack.push((binding, name.to_string()));
            Ok(StackGuard)
        })
    }
}

impl Drop for StackGuard {
    fn drop(&mut self) {
        CONSTRUCTING.with(|stack| {
            stack.borrow_mut().pop();
        });
    }
}

/// Runs `f` with `binding` marked as under construction.
///
/// Fails with [`DiError::Circular`] when `binding` is already being constructed
/// further up the stack.
pub(crate) fn with_cycle_guard<T, F>(binding: usize, name: &str, f: F) -> DiResult<T>
where
    F: FnOnce() -> DiResult<T>,
{
    let _guard = StackGuard::enter(binding, name)?;
    f()
}
