//! A centered, content-updatable modal dialog bound to a page or a container.
//!
//! The widget is written against the [`dom::Dom`] contract so it can be
//! hosted anywhere a document, event and animation layer exists:
//! - [`dom`] - host contract and the in-memory [`dom::memory::MemoryDom`]
//! - [`modal`] - the [`Modal`] controller and its options
//! - [`registry`] - one controller per target element

pub mod dom;
pub mod modal;
pub mod registry;

pub use modal::{Modal, ModalHooks, ModalMsg, ModalOptions, Trigger};
pub use registry::ModalRegistry;
