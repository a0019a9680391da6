use std::fmt;
use std::ops::{Deref, DerefMut};
use std::sync::Weak;

use serde::Serialize;

use super::store::{Ledger, Meta};
use crate::item::Kind;

/// A handle that can be scrubbed and handed out again.
pub trait Recyclable: Send + 'static {
    /// Clears per-use state (classes, attributes, content...) before reuse.
    fn reset(&mut self) {}
}

impl Recyclable for () {}

impl Recyclable for String {
    fn reset(&mut self) {
        self.clear();
    }
}

impl<T: Send + 'static> Recyclable for Vec<T> {
    fn reset(&mut self) {
        self.clear();
    }
}

/// Identity of a pooled handle, stable across reuse.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize)]
pub struct HandleId(pub(crate) u64);

impl fmt::Display for HandleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "handle-{}", self.0)
    }
}

/// Checkout record of one handle; dropping it strikes the handle from the
/// pool's in-use table.
pub(crate) struct Lease {
    id: HandleId,
    ledger: Weak<Ledger>,
}

impl Lease {
    pub(crate) fn new(id: HandleId, ledger: Weak<Ledger>) -> Self {
        Self { id, ledger }
    }

    /// Closes the lease and hands back its checkout record.
    pub(crate) fn settle(mut self) -> Option<Meta> {
        let ledger = std::mem::take(&mut self.ledger).upgrade()?;
        ledger.lock().remove(&self.id)
    }
}

impl Drop for Lease {
    fn drop(&mut self) {
        if let Some(ledger) = self.ledger.upgrade() {
            ledger.lock().remove(&self.id);
        }
    }
}

/// A handle checked out of a [`ResourcePool`](super::ResourcePool).
///
/// Give it back with `release`. Dropping it, or unwrapping it with
/// [`into_inner`](Self::into_inner), discards the handle and clears its
/// in-use entry.
pub struct Pooled<R> {
    pub(crate) id: HandleId,
    pub(crate) kind: Kind,
    pub(crate) handle: R,
    pub(crate) lease: Lease,
}

impl<R> Pooled<R> {
    pub fn id(&self) -> HandleId {
        self.id
    }

    pub fn kind(&self) -> Kind {
        self.kind
    }

    /// Unwraps the raw handle, detaching it from the pool for good.
    pub fn into_inner(self) -> R {
        let Pooled { handle, lease, .. } = self;
        drop(lease);
        handle
    }
}

impl<R> Deref for Pooled<R> {
    type Target = R;

    fn deref(&self) -> &R {
        &self.handle
    }
}

impl<R> DerefMut for Pooled<R> {
    fn deref_mut(&mut self) -> &mut R {
        &mut self.handle
    }
}

impl<R: fmt::Debug> fmt::Debug for Pooled<R> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Pooled")
            .field("id", &self.id)
            .field("kind", &self.kind)
            .field("handle", &self.handle)
            .finish()
    }
}
