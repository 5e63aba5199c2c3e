//! Client-side core for the TCM intake application.
//!
//! Owns what the views cannot: form drafts with durable local persistence,
//! step navigation, and the submit-and-await-reply cycle against the remote
//! diagnosis API. Returned Markdown reports are handed to a read-only
//! presenter; rendering them is not this crate's business.

pub mod dataset;
pub mod flow;
pub mod forms;
pub mod report;
pub mod store;
pub mod submit;

pub use dataset::DatasetFlow;
pub use flow::{IntakeFlow, TongueFlow};
pub use forms::{FieldValue, FormSession, CONSTITUTION, PATIENT};
pub use report::{Report, ReportSink};
pub use store::{DiskStore, DraftStore, MemoryStore};
pub use submit::{HttpTransport, SubmissionController, SubmissionState, SubmitError, Transport};
