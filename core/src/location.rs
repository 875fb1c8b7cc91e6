use alloc::boxed::Box;
use alloc::collections::VecDeque;
use alloc::rc::Rc;
use alloc::vec::Vec;
use core::cell::RefCell;

use crate::LatLng;

/// Callback a [`LocationProvider`] invokes with each new position.
pub type LocationCallback = Box<dyn FnMut(LatLng)>;

/// Device location source, such as a GPS sensor or a recorded track.
pub trait LocationProvider {
    type Handle;

    fn subscribe(&mut self, on_update: LocationCallback) -> Self::Handle;
    fn unsubscribe(&mut self, handle: Self::Handle);
}

/// Single-threaded queue between a [`LocationProvider`] and the game.
///
/// Updates that arrive between interactions wait here until the game drains them, so they go
/// through the same clear-then-populate path as manual movement.
#[derive(Clone, Debug, Default)]
pub struct LocationFeed {
    pending: Rc<RefCell<VecDeque<LatLng>>>,
}

impl LocationFeed {
    pub fn new() -> Self {
        Self::default()
    }

    /// Callback to hand to [`LocationProvider::subscribe`].
    pub fn sink(&self) -> LocationCallback {
        let pending = Rc::clone(&self.pending);
        Box::new(move |location| pending.borrow_mut().push_back(location))
    }

    pub fn push(&self, location: LatLng) {
        self.pending.borrow_mut().push_back(location);
    }

    pub fn take_pending(&self) -> Vec<LatLng> {
        self.pending.borrow_mut().drain(..).collect()
    }

    pub fn len(&self) -> usize {
        self.pending.borrow().len()
    }

    pub fn is_empty(&self) -> bool {
        self.pending.borrow().is_empty()
    }
}
