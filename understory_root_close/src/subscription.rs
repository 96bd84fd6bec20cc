// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Subscription disposal objects.

use alloc::rc::{Rc, Weak};
use core::cell::RefCell;

use crate::registry::{RegistryState, SubscriptionId};

/// Shared release logic for both subscription flavors.
#[derive(Debug)]
pub(crate) struct Handle {
    id: SubscriptionId,
    registry: Weak<RefCell<RegistryState>>,
    active: bool,
}

impl Handle {
    pub(crate) fn new(id: SubscriptionId, registry: &Rc<RefCell<RegistryState>>) -> Self {
        Self {
            id,
            registry: Rc::downgrade(registry),
            active: true,
        }
    }

    fn release(&mut self) {
        if !core::mem::take(&mut self.active) {
            return;
        }
        // A registry that is already gone has no listeners left to release.
        let Some(registry) = self.registry.upgrade() else {
            return;
        };
        match registry.try_borrow_mut() {
            Ok(mut state) => state.remove(self.id),
            Err(_) => {
                tracing::warn!(
                    subscription = self.id.get(),
                    "listener registry busy during release; subscription leaked"
                );
            }
        }
    }
}

/// An active root-close subscription.
///
/// Dropping it (or calling [`RootCloseSubscription::deactivate`]) removes the
/// subscription and releases its document listeners.
#[derive(Debug)]
#[must_use = "dropping a subscription deactivates it immediately"]
pub struct RootCloseSubscription {
    handle: Handle,
}

impl RootCloseSubscription {
    pub(crate) fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Identifier reported in [`Delivery`](crate::Delivery) values.
    pub fn id(&self) -> SubscriptionId {
        self.handle.id
    }

    /// Whether the subscription is still listening.
    pub fn is_active(&self) -> bool {
        self.handle.active
    }

    /// Stop listening. Calling it again is a no-op.
    pub fn deactivate(&mut self) {
        self.handle.release();
    }
}

impl Drop for RootCloseSubscription {
    fn drop(&mut self) {
        self.handle.release();
    }
}

/// An active plain listener subscription (for example, window resize).
#[derive(Debug)]
#[must_use = "dropping a subscription deactivates it immediately"]
pub struct ListenerSubscription {
    handle: Handle,
}

impl ListenerSubscription {
    pub(crate) fn new(handle: Handle) -> Self {
        Self { handle }
    }

    /// Identifier reported in [`Delivery::Notify`](crate::Delivery::Notify).
    pub fn id(&self) -> SubscriptionId {
        self.handle.id
    }

    /// Whether the subscription is still listening.
    pub fn is_active(&self) -> bool {
        self.handle.active
    }

    /// Stop listening. Calling it again is a no-op.
    pub fn deactivate(&mut self) {
        self.handle.release();
    }
}

impl Drop for ListenerSubscription {
    fn drop(&mut self) {
        self.handle.release();
    }
}
