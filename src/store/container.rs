use std::fmt;

use log::trace;

/// Pure state transition logic for a [`Store`].
pub trait Reducer {
    type State;
    type Action: fmt::Debug;

    /// Apply `action` to `state`. Returns `true` when the transition was
    /// committed, `false` for a no-op (subscribers are not notified then).
    fn reduce(&mut self, state: &mut Self::State, action: Self::Action) -> bool;
}

/// Handle returned by [`Store::subscribe`].
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

type Listener<S> = Box<dyn FnMut(&S)>;

/// Single-threaded state container with a dispatch/subscribe contract.
pub struct Store<R: Reducer> {
    state: R::State,
    reducer: R,
    listeners: Vec<(SubscriptionId, Listener<R::State>)>,
    next_id: u64,
}

impl<R: Reducer> Store<R> {
    /// Create a store holding `initial`.
    pub fn new(reducer: R, initial: R::State) -> Self {
        Self {
            state: initial,
            reducer,
            listeners: Vec::new(),
            next_id: 0,
        }
    }

    /// Current committed state.
    pub fn state(&self) -> &R::State {
        &self.state
    }

    /// Reduce `action` and notify subscribers if it changed anything.
    pub fn dispatch(&mut self, action: R::Action) -> bool {
        trace!("dispatch {action:?}");
        let committed = self.reducer.reduce(&mut self.state, action);
        if committed {
            for (_, listener) in self.listeners.iter_mut() {
                listener(&self.state);
            }
        }
        committed
    }

    /// Register `listener`; it runs after every committed transition, in
    /// subscription order.
    pub fn subscribe<F>(&mut self, listener: F) -> SubscriptionId
    where
        F: FnMut(&R::State) + 'static,
    {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.listeners.push((id, Box::new(listener)));
        id
    }

    /// Remove a listener. Returns `false` if `id` was unknown.
    pub fn unsubscribe(&mut self, id: SubscriptionId) -> bool {
        let before = self.listeners.len();
        self.listeners.retain(|(lid, _)| *lid != id);
        self.listeners.len() != before
    }
}
