//! Deferred-work execution seam.
//!
//! Commissioning events arrive on the external stack's own callback
//! threads. Work that would re-enter the stack's event loop (session
//! establishment in particular) must instead be handed to this executor
//! and run on a separate context. "Deferred" means explicitly scheduled
//! elsewhere, not suspended in place: `schedule` returns immediately.

/// A context that runs submitted work items off the caller's thread.
pub trait DeferredExecutor: Send + Sync {
    /// Enqueue `work` for execution on the deferred context. Items run
    /// in submission order.
    fn schedule(&self, work: Box<dyn FnOnce() + Send>);
}
