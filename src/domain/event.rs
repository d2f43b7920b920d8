//! Event Model
//!
//! Call and Return events with participant names snapshotted at capture
//! time, and the append-only log they are recorded in.

use crate::domain::naming::NamedEntity;
use std::fmt;

/// One observed invocation boundary.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CallEvent {
    /// Receiver of the frame containing the call site
    pub caller: NamedEntity,
    /// Receiver of the invoked function
    pub target: NamedEntity,
    pub operation_name: String,
}

impl CallEvent {
    pub fn new(caller: NamedEntity, target: NamedEntity, operation_name: impl Into<String>) -> Self {
        Self {
            caller,
            target,
            operation_name: operation_name.into(),
        }
    }

    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for CallEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} -> {} : {}", self.caller, self.target, self.operation_name)
    }
}

/// Closes the call it carries.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReturnEvent {
    pub source_call: CallEvent,
}

impl ReturnEvent {
    pub fn new(source_call: CallEvent) -> Self {
        Self { source_call }
    }

    pub fn to_text(&self) -> String {
        self.to_string()
    }
}

impl fmt::Display for ReturnEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} --> {}:",
            self.source_call.target, self.source_call.caller
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TraceEvent {
    Call(CallEvent),
    Return(ReturnEvent),
}

impl TraceEvent {
    pub fn is_call(&self) -> bool {
        matches!(self, TraceEvent::Call(_))
    }

    pub fn is_return(&self) -> bool {
        matches!(self, TraceEvent::Return(_))
    }
}

impl fmt::Display for TraceEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TraceEvent::Call(call) => fmt::Display::fmt(call, f),
            TraceEvent::Return(ret) => fmt::Display::fmt(ret, f),
        }
    }
}

/// Ordered, append-only sequence of events.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct EventLog {
    events: Vec<TraceEvent>,
}

impl EventLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, event: TraceEvent) {
        self.events.push(event);
    }

    pub fn iter(&self) -> std::slice::Iter<'_, TraceEvent> {
        self.events.iter()
    }

    pub fn as_slice(&self) -> &[TraceEvent] {
        &self.events
    }

    pub fn len(&self) -> usize {
        self.events.len()
    }

    pub fn is_empty(&self) -> bool {
        self.events.is_empty()
    }

    pub fn calls(&self) -> impl Iterator<Item = &CallEvent> {
        self.events.iter().filter_map(|e| match e {
            TraceEvent::Call(call) => Some(call),
            TraceEvent::Return(_) => None,
        })
    }

    pub fn returns(&self) -> impl Iterator<Item = &ReturnEvent> {
        self.events.iter().filter_map(|e| match e {
            TraceEvent::Return(ret) => Some(ret),
            TraceEvent::Call(_) => None,
        })
    }

    pub fn clear(&mut self) {
        self.events.clear();
    }
}

impl<'a> IntoIterator for &'a EventLog {
    type Item = &'a TraceEvent;
    type IntoIter = std::slice::Iter<'a, TraceEvent>;

    fn into_iter(self) -> Self::IntoIter {
        self.events.iter()
    }
}
