use crate::domain::{AnswerMap, NavigationState};
use std::cell::RefCell;
use std::fmt;
use std::rc::Rc;

/// Host-supplied observer function
pub type Callback<T> = Rc<dyn Fn(T)>;

/// Wrap a closure as a [`Callback`]
pub fn callback<T, F>(f: F) -> Callback<T>
where
    F: Fn(T) + 'static,
{
    Rc::new(f)
}

/// Cross-render slot holding the most recent observer
///
/// Every render swaps the stored callback in place. Swapping never emits
/// anything: only data changes reach the observer. Clones share the slot.
pub struct ObserverHandle<T> {
    slot: Rc<RefCell<Option<Callback<T>>>>,
}

impl<T> ObserverHandle<T> {
    pub fn new() -> Self {
        Self {
            slot: Rc::new(RefCell::new(None)),
        }
    }

    /// Store the latest observer (or clear it)
    pub fn replace(&self, callback: Option<Callback<T>>) {
        *self.slot.borrow_mut() = callback;
    }

    pub fn is_set(&self) -> bool {
        self.slot.borrow().is_some()
    }

    /// Call the current observer, if any
    ///
    /// The slot is not borrowed while the observer runs, so an observer may
    /// replace itself.
    pub fn emit(&self, value: T) -> bool {
        let current = self.slot.borrow().clone();
        match current {
            Some(observer) => {
                observer(value);
                true
            }
            None => false,
        }
    }
}

impl<T> Clone for ObserverHandle<T> {
    fn clone(&self) -> Self {
        Self {
            slot: Rc::clone(&self.slot),
        }
    }
}

impl<T> Default for ObserverHandle<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T> fmt::Debug for ObserverHandle<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ObserverHandle")
            .field("set", &self.is_set())
            .finish()
    }
}

/// The three observers every renderer reports through
#[derive(Debug, Clone, Default)]
pub struct RendererCallbacks {
    pub on_answers_change: ObserverHandle<AnswerMap>,
    pub on_index_change: ObserverHandle<usize>,
    pub on_navigation_change: ObserverHandle<NavigationState>,
}
