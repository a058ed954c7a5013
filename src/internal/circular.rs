//! Circular dependency detection.
//!
//! Every top-level resolution owns a [`ResolutionPath`]: the services being
//! realized on the current call stack, outermost first. Re-entering a service
//! that is already on the path is a cycle; the cyclic segment is reported.

use crate::error::{DiError, DiResult};
use crate::key::Key;

pub(crate) struct ResolutionPath {
    stack: Vec<Key>,
    max_depth: usize,
}

impl ResolutionPath {
    pub(crate) fn new(max_depth: usize) -> Self {
        Self {
            stack: Vec::new(),
            max_depth,
        }
    }

    /// Pushes `key`, failing on a cycle (checked before the depth guard) or
    /// when the path is already `max_depth` long.
    pub(crate) fn enter(&mut self, key: Key) -> DiResult<()> {
        if let Some(start) = self.stack.iter().position(|k| *k == key) {
            let mut path: Vec<&'static str> = self.stack[start..]
                .iter()
                .map(Key::display_name)
                .collect();
            path.push(key.display_name());
            return Err(DiError::DependencyCycle(path));
        }

        if self.stack.len() >= self.max_depth {
            return Err(DiError::DepthExceeded(self.max_depth));
        }

        self.stack.push(key);
        Ok(())
    }

    pub(crate) fn leave(&mut self, key: Key) {
        let last = self.stack.pop();
        debug_assert_eq!(last, Some(key));
    }

    pub(crate) fn depth(&self) -> usize {
        self.stack.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct A;
    struct B;
    struct C;

    #[test]
    fn reports_only_the_cyclic_segment() {
        let mut path = ResolutionPath::new(16);
        path.enter(Key::of::<A>()).unwrap();
        path.enter(Key::of::<B>()).unwrap();
        path.enter(Key::of::<C>()).unwrap();

        match path.enter(Key::of::<B>()) {
            Err(DiError::DependencyCycle(cycle)) => {
                assert_eq!(cycle.len(), 3);
                assert!(cycle[0].ends_with("::B"));
                assert!(cycle[1].ends_with("::C"));
                assert!(cycle[2].ends_with("::B"));
            }
            other => panic!("expected cycle, got {other:?}"),
        }
    }

    #[test]
    fn leave_allows_revisiting_siblings() {
        let mut path = ResolutionPath::new(16);
        path.enter(Key::of::<A>()).unwrap();
        path.enter(Key::of::<B>()).unwrap();
        path.leave(Key::of::<B>());
        path.enter(Key::of::<B>()).unwrap();
        assert_eq!(path.depth(), 2);
    }

    #[test]
    fn depth_guard_trips_at_limit() {
        let mut path = ResolutionPath::new(2);
        path.enter(Key::of::<A>()).unwrap();
        path.enter(Key::of::<B>()).unwrap();
        assert_eq!(path.enter(Key::of::<C>()), Err(DiError::DepthExceeded(2)));
    }
}
