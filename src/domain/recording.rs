//! Recording
//!
//! Pending call stack plus event log, owned by one session and fed by its
//! interceptor.

use crate::domain::error::{Result, TraceError};
use crate::domain::event::{CallEvent, EventLog, ReturnEvent, TraceEvent};
use crate::domain::naming::NamingRegistry;

#[derive(Debug, Default)]
pub struct Recording {
    pub registry: NamingRegistry,
    pending: Vec<CallEvent>,
    log: EventLog,
    fault: bool,
}

impl Recording {
    pub fn new(registry: NamingRegistry) -> Self {
        Self {
            registry,
            pending: Vec::new(),
            log: EventLog::new(),
            fault: false,
        }
    }

    /// Append to the pending stack, then to the log.
    pub fn push_call(&mut self, call: CallEvent) {
        tracing::trace!(event = %call, "call");
        self.pending.push(call.clone());
        self.log.push(TraceEvent::Call(call));
    }

    /// Close the most recent pending call.
    pub fn pop_call(&mut self) -> Result<()> {
        let call = self.pending.pop().ok_or(TraceError::PairingUnderflow)?;
        let ret = ReturnEvent::new(call);
        tracing::trace!(event = %ret, "return");
        self.log.push(TraceEvent::Return(ret));
        Ok(())
    }

    pub fn log(&self) -> &EventLog {
        &self.log
    }

    pub fn pending(&self) -> &[CallEvent] {
        &self.pending
    }

    /// Mark the recording as invalid; the log is no longer trustworthy.
    pub fn poison(&mut self) {
        self.fault = true;
    }

    pub fn is_poisoned(&self) -> bool {
        self.fault
    }

    /// Forget calls that will never be closed (their frames outlived the
    /// observer). They stay in the log unmatched.
    pub fn abandon_pending(&mut self) {
        self.pending.clear();
    }

    /// Drop all events and pending calls. Naming is kept.
    pub fn clear_events(&mut self) {
        self.pending.clear();
        self.log.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::context::{Receiver, TraceId};

    fn call(recording: &mut Recording, caller: u64, target: u64, op: &str) -> CallEvent {
        let caller = recording.registry.resolve(&Receiver::surrogate("Obj", TraceId::from_raw(caller)));
        let target = recording.registry.resolve(&Receiver::surrogate("Obj", TraceId::from_raw(target)));
        CallEvent::new(caller, target, op)
    }

    #[test]
    fn test_push_then_pop_pairs() {
        let mut recording = Recording::default();
        let c = call(&mut recording, 1, 2, "run");
        recording.push_call(c);
        assert_eq!(recording.pending().len(), 1);

        recording.pop_call().unwrap();
        assert!(recording.pending().is_empty());

        let lines: Vec<String> = recording.log().iter().map(|e| e.to_string()).collect();
        assert_eq!(lines, vec!["Obj[0] -> Obj[1] : run", "Obj[1] --> Obj[0]:"]);
    }

    #[test]
    fn test_pop_is_lifo() {
        let mut recording = Recording::default();
        for op in ["x", "y", "z"] {
            let c = call(&mut recording, 1, 2, op);
            recording.push_call(c);
        }
        for _ in 0..3 {
            recording.pop_call().unwrap();
        }

        let closed: Vec<&str> = recording
            .log()
            .returns()
            .map(|r| r.source_call.operation_name.as_str())
            .collect();
        assert_eq!(closed, vec!["z", "y", "x"]);
    }

    #[test]
    fn test_pop_on_empty_underflows() {
        let mut recording = Recording::default();
        assert!(matches!(
            recording.pop_call(),
            Err(TraceError::PairingUnderflow)
        ));
        assert!(recording.log().is_empty());
    }
}
