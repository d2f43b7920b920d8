// Infrastructure for seqtrace: the instrumentation runtime and config loading.

pub mod config;
pub mod runtime;
