#![forbid(unsafe_code)]

pub mod memory;
pub mod rest;
pub mod store;

pub use memory::MemorySubmissionStore;
pub use rest::{RestStoreConfig, RestSubmissionStore};
pub use store::{StoreError, SubmissionRecord, SubmissionStore, FORM_SUBMISSIONS_TABLE};
