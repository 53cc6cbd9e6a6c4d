pub mod public;
mod router;
pub mod templates;
pub use router::router;
