// Domain model for seqtrace: naming, events and the recording they form.

pub mod context;
pub mod error;
pub mod event;
pub mod naming;
pub mod recording;
