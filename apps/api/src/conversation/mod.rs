// Conversation controller: the screening flow from greeting to conclusion.
// machine.rs is pure; controller.rs runs its effects; handlers.rs is the HTTP edge.

pub mod controller;
pub mod handlers;
pub mod machine;
pub mod messages;
pub mod session;
