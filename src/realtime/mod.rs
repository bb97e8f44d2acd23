//! Live "something changed" signals for customer and employee screens.

pub mod dispatcher;
pub mod registry;
pub mod socket;

pub use dispatcher::RealtimeDispatcher;
pub use registry::SessionRegistry;
