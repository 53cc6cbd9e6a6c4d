pub mod public;
mod router;
pub(crate) use router::{TurnOutcome, run_session_turn};
pub use router::{models_router, router};
