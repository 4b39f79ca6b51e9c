//! Link between a tracked object and its runtime.

use std::sync::Weak;

use super::runtime::{Runtime, RuntimeInner};
use super::ObjectId;

/// Identity of a tracked object plus a weak reference to its runtime.
///
/// The reference is weak so that effects capturing tracked objects do not
/// keep the runtime alive. Once the runtime is gone, tracking and triggering
/// through this handle do nothing. Dropping the handle releases the object's
/// registry entries.
pub(crate) struct TrackHandle {
    id: ObjectId,
    runtime: Weak<RuntimeInner>,
}

impl TrackHandle {
    pub(crate) fn new(runtime: &Runtime) -> Self {
        Self {
            id: ObjectId::new(),
            runtime: runtime.downgrade(),
        }
    }

    pub(crate) fn id(&self) -> ObjectId {
        self.id
    }

    pub(crate) fn track(&self, key: &str) {
        if let Some(runtime) = Runtime::upgrade(&self.runtime) {
            runtime.track(self.id, key);
        }
    }

    pub(crate) fn trigger(&self, key: &str) {
        if let Some(runtime) = Runtime::upgrade(&self.runtime) {
            runtime.trigger(self.id, key);
        }
    }
}

impl Drop for TrackHandle {
    fn drop(&mut self) {
        if let Some(runtime) = Runtime::upgrade(&self.runtime) {
            runtime.release(self.id);
        }
    }
}
