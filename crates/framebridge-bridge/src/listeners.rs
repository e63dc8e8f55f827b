use std::cell::{Cell, RefCell};
use std::fmt;
use std::rc::Rc;

use crate::event::RenderEvent;

/// Identity of one render listener registration.
///
/// Removal is by id, so registering the same closure twice yields two
/// independent registrations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ListenerId(u64);

type Listener<A> = Rc<dyn Fn(&RenderEvent<A>)>;

/// Ordered list of typed render listeners.
///
/// Registration is additive and dispatch follows registration order. The list
/// may be changed from inside a listener; the change applies to the next
/// dispatch.
pub struct RenderListeners<A> {
    next_id: Cell<u64>,
    entries: RefCell<Vec<(ListenerId, Listener<A>)>>,
}

impl<A> RenderListeners<A> {
    pub fn new() -> Self {
        Self {
            next_id: Cell::new(0),
            entries: RefCell::new(Vec::new()),
        }
    }

    /// Append a listener.
    pub fn add<F>(&self, listener: F) -> ListenerId
    where
        F: Fn(&RenderEvent<A>) + 'static,
    {
        let id = ListenerId(self.next_id.get());
        self.next_id.set(id.0 + 1);
        self.entries.borrow_mut().push((id, Rc::new(listener)));
        id
    }

    /// Remove a listener. Returns false if the id is not registered.
    pub fn remove(&self, id: ListenerId) -> bool {
        let mut entries = self.entries.borrow_mut();
        let before = entries.len();
        entries.retain(|(entry, _)| *entry != id);
        before != entries.len()
    }

    pub fn len(&self) -> usize {
        self.entries.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.borrow().is_empty()
    }

    /// Invoke every listener with `event`, in registration order.
    ///
    /// Returns the number of listeners invoked.
    pub fn dispatch(&self, event: &RenderEvent<A>) -> usize {
        let snapshot: Vec<Listener<A>> = self
            .entries
            .borrow()
            .iter()
            .map(|(_, listener)| Rc::clone(listener))
            .collect();

        for listener in &snapshot {
            listener(event);
        }
        snapshot.len()
    }
}

impl<A> Default for RenderListeners<A> {
    fn default() -> Self {
        Self::new()
    }
}

impl<A> fmt::Debug for RenderListeners<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RenderListeners")
            .field("len", &self.len())
            .finish()
    }
}
