use crate::domain::context::InvocationContext;
use crate::domain::event::EventLog;
use std::io::Write;

pub mod sequence_exporter;

/// Continuation handed back by an observer for one invocation; the
/// runtime passes it back unchanged when that invocation returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReturnHook {
    /// A call was recorded and must be closed on return
    Close,
    /// Nothing was recorded; the return is ignored
    Ignore,
}

/// Receives invocation and return boundaries from the instrumentation
/// runtime. `caller` is the frame one level up the real call stack.
pub trait InvocationObserver {
    fn on_invocation(
        &mut self,
        context: &InvocationContext,
        caller: Option<&InvocationContext>,
    ) -> ReturnHook;

    fn on_return(&mut self, context: &InvocationContext, hook: ReturnHook);
}

pub trait TraceExporter {
    fn export(&self, log: &EventLog, out: &mut dyn Write) -> std::io::Result<()>;
}
