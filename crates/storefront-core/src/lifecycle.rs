//! # View Lifecycle & Client Error Handler
//!
//! A minimal view-lifecycle abstraction and the view-less component that
//! wires the global error handler once per mount.
//!
//! ## Lifecycle
//! ```text
//! ┌─────────────────────────────────────────────────────────────────────────┐
//! │                     ViewHost<ClientErrorHandler>                        │
//! │                                                                         │
//! │  mount()     render() ──► commit ──► on_ready()   initializer runs     │
//! │                                                                         │
//! │  rerender()  render() ──► commit                  (no on_ready)        │
//! │  rerender()  render() ──► commit                  (no on_ready)        │
//! │                                                                         │
//! │  unmount()   on_detach()                          flag cleared         │
//! │                                                                         │
//! │  mount()     render() ──► commit ──► on_ready()   initializer runs     │
//! └─────────────────────────────────────────────────────────────────────────┘
//! ```
//!
//! The call-once guarantee lives in the component's own `initialized` flag,
//! not in the host. A host that calls `on_ready` twice for one mount still
//! gets a single initializer call.

use tracing::debug;

// =============================================================================
// Initializer
// =============================================================================

/// The external error-handler initializer.
///
/// Its return value is unused and its failures are its own business: a
/// panic inside `init_error_handler` propagates out of `on_ready` untouched.
pub trait ErrorHandlerInit {
    fn init_error_handler(&self);
}

impl<F> ErrorHandlerInit for F
where
    F: Fn(),
{
    fn init_error_handler(&self) {
        self()
    }
}

// =============================================================================
// Lifecycle
// =============================================================================

/// Hooks a component exposes to its [`ViewHost`].
pub trait Lifecycle {
    /// What the component contributes to the view tree.
    type Output;

    fn render(&self) -> Self::Output;

    /// Runs after the first commit of a mount.
    fn on_ready(&mut self) {}

    /// Runs when the component leaves the tree.
    fn on_detach(&mut self) {}
}

/// Drives a single mounted component through render, commit and teardown.
#[derive(Debug)]
pub struct ViewHost<C: Lifecycle> {
    component: C,
    commits: u64,
}

impl<C: Lifecycle> ViewHost<C> {
    /// Attaches `component`: first render, commit, then `on_ready`.
    pub fn mount(component: C) -> (Self, C::Output) {
        let mut host = ViewHost {
            component,
            commits: 0,
        };
        let output = host.commit();
        host.component.on_ready();
        (host, output)
    }

    /// Renders and commits again; never re-runs `on_ready`.
    pub fn rerender(&mut self) -> C::Output {
        self.commit()
    }

    /// Detaches the component and hands it back for a later remount.
    pub fn unmount(mut self) -> C {
        debug!(commits = self.commits, "Unmounting component");
        self.component.on_detach();
        self.component
    }

    /// Commits made during this mount, including the first.
    pub fn commits(&self) -> u64 {
        self.commits
    }

    pub fn component(&self) -> &C {
        &self.component
    }

    fn commit(&mut self) -> C::Output {
        let output = self.component.render();
        self.commits += 1;
        output
    }
}

// =============================================================================
// Client Error Handler
// =============================================================================

/// View-less component that runs the error-handler initializer once per
/// mount.
///
/// ## Example
/// ```rust
/// use std::cell::Cell;
/// use storefront_core::lifecycle::{ClientErrorHandler, ViewHost};
///
/// let calls = Cell::new(0);
/// let handler = ClientErrorHandler::new(|| calls.set(calls.get() + 1));
///
/// let (mut host, ()) = ViewHost::mount(handler);
/// host.rerender();
/// assert_eq!(calls.get(), 1);
/// ```
#[derive(Debug)]
pub struct ClientErrorHandler<I> {
    initializer: I,
    initialized: bool,
}

impl<I: ErrorHandlerInit> ClientErrorHandler<I> {
    pub fn new(initializer: I) -> Self {
        ClientErrorHandler {
            initializer,
            initialized: false,
        }
    }

    /// Whether the initializer has run for the current mount.
    pub fn is_initialized(&self) -> bool {
        self.initialized
    }
}

impl<I: ErrorHandlerInit> Lifecycle for ClientErrorHandler<I> {
    /// Null placeholder: nothing visible.
    type Output = ();

    fn render(&self) {}

    fn on_ready(&mut self) {
        if self.initialized {
            return;
        }
        // Set before the call: a panicking initializer is not retried.
        self.initialized = true;
        debug!("Initializing client error handler");
        self.initializer.init_error_handler();
    }

    fn on_detach(&mut self) {
        self.initialized = false;
    }
}
