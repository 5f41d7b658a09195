//! Domain model for the tracing core.
//!
//! Holds small newtypes, the file-operation enumeration, and the internal
//! error taxonomy shared by the sinks and the dispatcher.

pub mod errors;
pub mod file_op;
pub mod types;

pub use errors::TraceError;
pub use file_op::{BinaryFileOp, FileOp};
pub use types::{CounterId, FileId, FunctionId, ProcessId, Timestamp};
