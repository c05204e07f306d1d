// Application layer: selection state machine, the orchestrator loop and the
// pass-through HTTP server.

pub mod app;
pub mod protocol;
pub mod server;
pub mod state;
