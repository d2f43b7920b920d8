// Session controller for seqtrace.

use crate::domain::context::Receiver;
use crate::domain::error::{Result, TraceError};
use crate::domain::event::{CallEvent, EventLog};
use crate::domain::naming::{NamedEntity, NamingRegistry};
use crate::domain::recording::Recording;
use crate::infrastructure::config::{NamingPolicy, TracerConfig};
use crate::infrastructure::runtime::{self, ObserverId};
use crate::ports::sequence_exporter::SequenceExporter;
use crate::ports::TraceExporter;
use std::cell::{Ref, RefCell};
use std::io::Write;
use std::rc::Rc;

pub mod interceptor;

use interceptor::Interceptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    Inactive,
    Active,
}

/// Records the calls made on the current thread between `start` and
/// `stop`, and dumps them as sequence-diagram text.
pub struct TraceSession {
    config: TracerConfig,
    recording: Rc<RefCell<Recording>>,
    exporter: SequenceExporter,
    observer: Option<ObserverId>,
}

impl Default for TraceSession {
    fn default() -> Self {
        Self::new()
    }
}

impl TraceSession {
    pub fn new() -> Self {
        Self::with_config(TracerConfig::default())
    }

    pub fn with_config(config: TracerConfig) -> Self {
        let registry = NamingRegistry::with_placeholder(config.placeholder_label.clone());
        Self {
            exporter: SequenceExporter::with_title(config.title.clone()),
            recording: Rc::new(RefCell::new(Recording::new(registry))),
            config,
            observer: None,
        }
    }

    pub fn config(&self) -> &TracerConfig {
        &self.config
    }

    pub fn state(&self) -> SessionState {
        match self.observer {
            Some(_) => SessionState::Active,
            None => SessionState::Inactive,
        }
    }

    pub fn is_active(&self) -> bool {
        self.state() == SessionState::Active
    }

    /// Begin observing instrumented frames on this thread.
    pub fn start(&mut self) -> Result<()> {
        if self.observer.is_some() {
            return Err(TraceError::AlreadyActive);
        }

        {
            let mut recording = self.recording.borrow_mut();
            if recording.is_poisoned() {
                return Err(TraceError::PairingUnderflow);
            }
            if self.config.naming == NamingPolicy::PerSession {
                recording.registry.clear();
                recording.clear_events();
            }
        }

        let interceptor = Interceptor::new(Rc::clone(&self.recording));
        let id = runtime::install(Box::new(interceptor))?;
        self.observer = Some(id);

        tracing::debug!(depth = runtime::current_depth(), "tracing session started");
        Ok(())
    }

    /// Stop observing. Calls still in flight stay in the log unclosed.
    pub fn stop(&mut self) -> Result<()> {
        let id = self.observer.take().ok_or(TraceError::NotActive)?;
        runtime::uninstall(id);

        let mut recording = self.recording.borrow_mut();
        let in_flight = recording.pending().len();
        recording.abandon_pending();
        tracing::debug!(
            events = recording.log().len(),
            in_flight,
            "tracing session stopped"
        );

        if recording.is_poisoned() {
            return Err(TraceError::PairingUnderflow);
        }
        Ok(())
    }

    /// Record a call by hand. Only valid while active.
    pub fn push_call(&mut self, call: CallEvent) -> Result<()> {
        if self.observer.is_none() {
            return Err(TraceError::NotActive);
        }
        self.recording.borrow_mut().push_call(call);
        Ok(())
    }

    /// Close the most recent call by hand. Only valid while active.
    pub fn pop_call(&mut self) -> Result<()> {
        if self.observer.is_none() {
            return Err(TraceError::NotActive);
        }
        let mut recording = self.recording.borrow_mut();
        if let Err(err) = recording.pop_call() {
            tracing::error!(%err, "unmatched return, recording invalidated");
            recording.poison();
            return Err(err);
        }
        Ok(())
    }

    /// Borrow this session's naming registry.
    ///
    /// Release the borrow before entering traced frames.
    pub fn registry(&self) -> Ref<'_, NamingRegistry> {
        Ref::map(self.recording.borrow(), |recording| &recording.registry)
    }

    /// Name `receiver` in this session's registry.
    pub fn resolve(&self, receiver: &Receiver) -> NamedEntity {
        self.recording.borrow_mut().registry.resolve(receiver)
    }

    /// Snapshot of the recorded events.
    pub fn events(&self) -> EventLog {
        self.recording.borrow().log().clone()
    }

    /// Render the log as diagram text (no trailing newline).
    pub fn render(&self) -> String {
        self.exporter.to_text(self.recording.borrow().log())
    }

    /// Write every event, in order, one per line, to `out`.
    pub fn dump_to(&self, out: &mut dyn Write) -> Result<()> {
        let recording = self.recording.borrow();
        if recording.is_poisoned() {
            return Err(TraceError::PairingUnderflow);
        }
        self.exporter.export(recording.log(), out)?;
        Ok(())
    }

    /// Write every event to standard output.
    pub fn dump(&self) -> Result<()> {
        let stdout = std::io::stdout();
        let mut out = stdout.lock();
        self.dump_to(&mut out)
    }
}

impl Drop for TraceSession {
    fn drop(&mut self) {
        if let Some(id) = self.observer.take() {
            runtime::uninstall(id);
        }
    }
}
