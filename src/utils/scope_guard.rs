/// Runs a closure when dropped, whichever way the enclosing scope exits.
pub struct ScopeGuard<F: FnOnce()>(Option<F>);

impl<F: FnOnce()> ScopeGuard<F> {
    pub fn new(f: F) -> Self {
        Self(Some(f))
    }
}

impl<F: FnOnce()> Drop for ScopeGuard<F> {
    fn drop(&mut self) {
        if let Some(f) = self.0.take() {
            f();
        }
    }
}

/// Shorthand for [`ScopeGuard::new`]
pub fn defer<F: FnOnce()>(f: F) -> ScopeGuard<F> {
    ScopeGuard::new(f)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;

    #[test]
    fn runs_on_early_return() {
        let ran = Cell::new(false);
        let check = |bail: bool| -> u8 {
            let _guard = defer(|| ran.set(true));
            if bail {
                return 1;
            }
            2
        };

        assert_eq!(check(true), 1);
        assert!(ran.get());
    }

    #[test]
    fn runs_exactly_once() {
        let count = Cell::new(0);
        {
            let _guard = ScopeGuard::new(|| count.set(count.get() + 1));
        }
        assert_eq!(count.get(), 1);
    }
}
