#![forbid(unsafe_code)]

pub mod webhook;

pub use webhook::{NotifyAck, NotifyError, WebhookHttpConfig, WebhookNotifierRuntime};
