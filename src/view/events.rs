//! Typed event bus for view-level signaling.
//!
//! Components that care about filter changes subscribe with a callback;
//! the orchestrator publishes. Events carry owned data so subscribers
//! never borrow view state.

use std::rc::Rc;

/// Events published by the bug list view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ViewEvent {
    /// A saved filter (preset or custom) was applied.
    FilterApplied { filter_id: i64, name: String },
    /// A new custom filter was saved.
    FilterSaved { filter_id: i64, name: String },
    /// A custom filter was deleted.
    FilterDeleted { filter_id: i64 },
    /// All criteria were cleared.
    FiltersCleared,
    /// The sort field or direction changed.
    SortChanged { field: String, direction: String },
}

type Subscriber = Rc<dyn Fn(&ViewEvent)>;

/// Publish/subscribe bus. Subscribers are invoked synchronously in
/// subscription order.
#[derive(Default, Clone)]
pub struct ViewEvents {
    subscribers: Vec<Subscriber>,
}

impl ViewEvents {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    pub fn subscribe(&mut self, f: impl Fn(&ViewEvent) + 'static) {
        self.subscribers.push(Rc::new(f));
    }

    pub fn publish(&self, event: &ViewEvent) {
        for subscriber in &self.subscribers {
            subscriber(event);
        }
    }
}

impl std::fmt::Debug for ViewEvents {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ViewEvents")
            .field("subscribers", &self.subscribers.len())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    #[test]
    fn subscribers_receive_published_events() {
        let received: Rc<RefCell<Vec<ViewEvent>>> = Rc::default();
        let mut bus = ViewEvents::new();

        let sink = Rc::clone(&received);
        bus.subscribe(move |e| sink.borrow_mut().push(e.clone()));

        bus.publish(&ViewEvent::FiltersCleared);
        bus.publish(&ViewEvent::FilterDeleted { filter_id: 3 });

        let events = received.borrow();
        assert_eq!(events.len(), 2);
        assert_eq!(events[0], ViewEvent::FiltersCleared);
        assert_eq!(events[1], ViewEvent::FilterDeleted { filter_id: 3 });
    }

    #[test]
    fn multiple_subscribers_all_notified() {
        let a: Rc<RefCell<u32>> = Rc::default();
        let b: Rc<RefCell<u32>> = Rc::default();
        let mut bus = ViewEvents::new();

        let sink = Rc::clone(&a);
        bus.subscribe(move |_| *sink.borrow_mut() += 1);
        let sink = Rc::clone(&b);
        bus.subscribe(move |_| *sink.borrow_mut() += 1);

        bus.publish(&ViewEvent::FiltersCleared);
        assert_eq!(*a.borrow(), 1);
        assert_eq!(*b.borrow(), 1);
    }
}
