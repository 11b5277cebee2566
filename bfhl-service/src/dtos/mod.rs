pub mod envelope;
pub mod operation;

pub use envelope::{Envelope, OperationResult};
pub use operation::{Operation, OperationKind};
