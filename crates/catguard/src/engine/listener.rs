use super::event::Event;

/// Handle returned by [`super::Engine::subscribe`], used to unsubscribe again.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(pub(crate) u64);

/// A presentation layer (or anything else) interested in engine changes.
///
/// Listeners are called synchronously from inside the engine operation that produced the
/// event. They observe state; they cannot feed back into the engine.
pub trait Listener {
    fn notify(&mut self, event: &Event);
}

impl<F> Listener for F
where
    F: FnMut(&Event),
{
    fn notify(&mut self, event: &Event) {
        self(event)
    }
}

/// Subscribed listeners, in subscription order.
#[derive(Default)]
pub(crate) struct Listeners {
    next_id: u64,
    entries: Vec<(ListenerId, Box<dyn Listener>)>,
}

impl Listeners {
    pub(crate) fn subscribe(&mut self, listener: Box<dyn Listener>) -> ListenerId {
        let id = ListenerId(self.next_id);
        self.next_id += 1;
        self.entries.push((id, listener));
        id
    }

    /// Returns false if the id was not subscribed.
    pub(crate) fn unsubscribe(&mut self, id: ListenerId) -> bool {
        let before = self.entries.len();
        self.entries.retain(|(entry_id, _)| *entry_id != id);
        self.entries.len() != before
    }

    pub(crate) fn publish(&mut self, event: Event) {
        tracing::trace!("Publishing {:?} to {} listener(s)", event, self.entries.len());
        for (_, listener) in &mut self.entries {
            listener.notify(&event);
        }
    }

    pub(crate) fn len(&self) -> usize {
        self.entries.len()
    }
}
