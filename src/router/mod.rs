pub mod completion;
pub mod factory;
pub mod traits;

pub use completion::{CompletionResult, CompletionRouter, FailureKind};
pub use factory::{BackendFactory, BackendSelector};
pub use traits::{BackendError, ChatBackend, ChatTurn, Role};
