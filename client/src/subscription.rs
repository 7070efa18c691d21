use std::fmt;

/// Handle for one live feed registration.
///
/// Cancelling runs the release closure exactly once; further calls are
/// no-ops, and dropping an uncancelled handle cancels it.
pub struct Subscription {
    release: Option<Box<dyn FnOnce()>>,
}

impl Subscription {
    pub fn new(release: impl FnOnce() + 'static) -> Subscription {
        Subscription {
            release: Some(Box::new(release)),
        }
    }

    /// A handle with nothing to release, for registrations that failed
    /// but whose caller still expects a handle.
    pub fn noop() -> Subscription {
        Subscription { release: None }
    }

    /// Stop deliveries. Idempotent.
    pub fn cancel(&mut self) {
        if let Some(release) = self.release.take() {
            release();
        }
    }

    pub fn is_active(&self) -> bool {
        self.release.is_some()
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        self.cancel();
    }
}

impl fmt::Debug for Subscription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Subscription")
            .field("active", &self.is_active())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::Cell;
    use std::rc::Rc;

    #[test]
    fn cancel_runs_release_once() {
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        let mut sub = Subscription::new(move || seen.set(seen.get() + 1));
        assert!(sub.is_active());

        sub.cancel();
        sub.cancel();
        assert_eq!(count.get(), 1);
        assert!(!sub.is_active());
    }

    #[test]
    fn drop_cancels() {
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        {
            let _sub = Subscription::new(move || seen.set(seen.get() + 1));
        }
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn cancelled_handle_does_not_release_again_on_drop() {
        let count = Rc::new(Cell::new(0));
        let seen = Rc::clone(&count);
        {
            let mut sub = Subscription::new(move || seen.set(seen.get() + 1));
            sub.cancel();
        }
        assert_eq!(count.get(), 1);
    }

    #[test]
    fn noop_handle_is_inert() {
        let mut sub = Subscription::noop();
        assert!(!sub.is_active());
        sub.cancel();
    }
}
