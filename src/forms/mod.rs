//! Form schemas, drafts, and the session state machine.

pub mod descriptor;
pub mod payload;
pub mod session;
pub mod value;

pub use descriptor::{FieldDescriptor, FieldKind, FormDescriptor, CONSTITUTION, PATIENT};
pub use session::FormSession;
pub use value::{Draft, FieldValue};
