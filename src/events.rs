//! Explicit publish/subscribe for game-level notifications.
//!
//! Listeners register on an [`EventBus`] and receive a [`Subscription`]
//! guard. The listener stays registered for exactly as long as the guard is
//! alive, which ties it to the lifecycle of whatever component holds it.
//!
//! Listeners run while the bus is locked: they must not subscribe to,
//! publish on, or drop a subscription of the same bus.

use glam::Vec3;
use std::sync::{Arc, Mutex, PoisonError, Weak};

/// Notifications broadcast by a grapple session.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum GameEvent {
    /// The scene should be reset to its initial state.
    Restart,
    /// A rope was fired and hit `grapple_point`.
    RopeAttached { grapple_point: Vec3 },
    /// The active rope was released.
    RopeDetached,
    /// Rope angular acceleration after a fixed step, in degrees per second squared.
    AngularAcceleration(f32),
}

type Listener<E> = Box<dyn FnMut(&E) + Send>;

struct Registry<E> {
    next_id: u64,
    listeners: Vec<(u64, Listener<E>)>,
}

/// Shared, cloneable event channel.
pub struct EventBus<E> {
    registry: Arc<Mutex<Registry<E>>>,
}

impl<E> Clone for EventBus<E> {
    fn clone(&self) -> Self {
        Self {
            registry: Arc::clone(&self.registry),
        }
    }
}

impl<E> Default for EventBus<E> {
    fn default() -> Self {
        Self::new()
    }
}

impl<E> std::fmt::Debug for EventBus<E> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventBus")
            .field("listeners", &self.listener_count())
            .finish()
    }
}

impl<E> EventBus<E> {
    pub fn new() -> Self {
        Self {
            registry: Arc::new(Mutex::new(Registry {
                next_id: 0,
                listeners: Vec::new(),
            })),
        }
    }

    /// Register `listener`. It is removed when the returned guard is dropped
    /// or passed to [`Subscription::unsubscribe`].
    #[must_use = "dropping the subscription immediately unregisters the listener"]
    pub fn subscribe<F>(&self, listener: F) -> Subscription<E>
    where
        F: FnMut(&E) + Send + 'static,
    {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        let id = registry.next_id;
        registry.next_id += 1;
        registry.listeners.push((id, Box::new(listener)));

        Subscription {
            id,
            registry: Arc::downgrade(&self.registry),
        }
    }

    /// Deliver `event` to every listener in registration order. Returns how
    /// many were notified.
    pub fn publish(&self, event: &E) -> usize {
        let mut registry = self.registry.lock().unwrap_or_else(PoisonError::into_inner);
        for (_, listener) in registry.listeners.iter_mut() {
            listener(event);
        }
        registry.listeners.len()
    }

    pub fn listener_count(&self) -> usize {
        self.registry
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .listeners
            .len()
    }
}

/// Registration guard returned by [`EventBus::subscribe`].
pub struct Subscription<E> {
    id: u64,
    registry: Weak<Mutex<Registry<E>>>,
}

impl<E> Subscription<E> {
    /// Unregister now. Equivalent to dropping the guard.
    pub fn unsubscribe(self) {}

    fn remove(&self) {
        if let Some(registry) = self.registry.upgrade() {
            let mut registry = registry.lock().unwrap_or_else(PoisonError::into_inner);
            registry.listeners.retain(|(id, _)| *id != self.id);
        }
    }
}

impl<E> Drop for Subscription<E> {
    fn drop(&mut self) {
        self.remove();
    }
}

/// Broadcasts [`GameEvent::Restart`] when a tracked point drops below a height.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct FallDetector {
    pub boundary_y: f32,
}

impl FallDetector {
    pub fn new(boundary_y: f32) -> Self {
        Self { boundary_y }
    }

    #[inline]
    pub fn has_fallen(&self, position: Vec3) -> bool {
        position.y < self.boundary_y
    }

    /// Publish a restart if `position` is out of bounds. Returns whether it was.
    pub fn check(&self, position: Vec3, bus: &EventBus<GameEvent>) -> bool {
        let fallen = self.has_fallen(position);
        if fallen {
            bus.publish(&GameEvent::Restart);
        }
        fallen
    }
}
