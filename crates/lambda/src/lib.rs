//! Lambda invocation shell for the schema-migration runner.

pub mod error;
pub mod handler;

pub use error::HandlerError;
pub use handler::{handle, SUCCESS_RESPONSE};
