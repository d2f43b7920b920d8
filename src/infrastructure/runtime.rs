//! Instrumentation Runtime
//!
//! Thread-local frame stack fed by `Frame` guards. Every instrumented
//! function pushes a frame on entry and pops it when the guard drops,
//! whether or not anyone is observing. An installed observer sees each
//! boundary together with the frame one level up (the caller).
//!
//! Frames entered while an observer callback is running are inert: the
//! tracer never observes itself.

use crate::domain::context::{InvocationContext, Receiver};
use crate::domain::error::{Result, TraceError};
use crate::ports::{InvocationObserver, ReturnHook};
use std::cell::RefCell;
use std::marker::PhantomData;

/// Handle of an installed observer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObserverId(u64);

struct Installed {
    id: ObserverId,
    observer: Box<dyn InvocationObserver>,
}

struct FrameRecord {
    serial: u64,
    context: InvocationContext,
    /// Set when an observer saw the entry; only that observer sees the return
    continuation: Option<(ObserverId, ReturnHook)>,
}

#[derive(Default)]
struct Runtime {
    frames: Vec<FrameRecord>,
    observer: Option<Installed>,
    next_serial: u64,
    next_observer: u64,
}

thread_local! {
    static RUNTIME: RefCell<Runtime> = RefCell::new(Runtime::default());
}

/// Install `observer` for the current thread.
pub fn install(observer: Box<dyn InvocationObserver>) -> Result<ObserverId> {
    RUNTIME.with(|cell| {
        let mut rt = cell
            .try_borrow_mut()
            .map_err(|_| TraceError::ObserverInstalled)?;
        if rt.observer.is_some() {
            return Err(TraceError::ObserverInstalled);
        }

        let id = ObserverId(rt.next_observer);
        rt.next_observer += 1;
        rt.observer = Some(Installed { id, observer });
        tracing::debug!(observer = id.0, depth = rt.frames.len(), "observer installed");
        Ok(id)
    })
}

/// Remove the observer installed under `id`. Returns false if it is not
/// the current observer.
pub fn uninstall(id: ObserverId) -> bool {
    let removed = RUNTIME
        .try_with(|cell| {
            let mut rt = cell.try_borrow_mut().ok()?;
            let current = rt.observer.as_ref().is_some_and(|i| i.id == id);
            if current {
                rt.observer.take()
            } else {
                None
            }
        })
        .ok()
        .flatten();

    match removed {
        Some(_) => {
            tracing::debug!(observer = id.0, "observer uninstalled");
            true
        }
        None => false,
    }
}

pub fn is_installed() -> bool {
    RUNTIME
        .try_with(|cell| {
            cell.try_borrow()
                .map(|rt| rt.observer.is_some())
                .unwrap_or(true)
        })
        .unwrap_or(false)
}

/// Depth of the instrumented frame stack on this thread.
pub fn current_depth() -> usize {
    RUNTIME
        .try_with(|cell| cell.try_borrow().map(|rt| rt.frames.len()).unwrap_or(0))
        .unwrap_or(0)
}

/// Guard for one instrumented frame. Bind it to a named variable so it
/// lives until the end of the function.
#[must_use = "the frame returns as soon as the guard is dropped"]
pub struct Frame {
    serial: Option<u64>,
    _not_send: PhantomData<*const ()>,
}

impl Frame {
    /// Whether the frame was pushed; false inside observer callbacks.
    pub fn is_live(&self) -> bool {
        self.serial.is_some()
    }
}

impl std::fmt::Debug for Frame {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Frame").field("serial", &self.serial).finish()
    }
}

/// Enter an instrumented frame.
pub fn enter(context: InvocationContext) -> Frame {
    let serial = RUNTIME
        .try_with(|cell| {
            let mut guard = cell.try_borrow_mut().ok()?;
            let Runtime {
                frames,
                observer,
                next_serial,
                ..
            } = &mut *guard;

            let continuation = observer.as_mut().map(|installed| {
                let caller = frames.last().map(|f| &f.context);
                let hook = installed.observer.on_invocation(&context, caller);
                (installed.id, hook)
            });

            let serial = *next_serial;
            *next_serial += 1;
            frames.push(FrameRecord {
                serial,
                context,
                continuation,
            });
            Some(serial)
        })
        .ok()
        .flatten();

    Frame {
        serial,
        _not_send: PhantomData,
    }
}

/// Enter a frame bound to `receiver`.
pub fn enter_method<T: ?Sized>(receiver: &T, operation: &'static str) -> Frame {
    enter(InvocationContext::new(Receiver::of(receiver), operation))
}

/// Enter a frame without receiver.
pub fn enter_fn(operation: &'static str) -> Frame {
    enter(InvocationContext::free(operation))
}

impl Drop for Frame {
    fn drop(&mut self) {
        if let Some(serial) = self.serial.take() {
            exit(serial);
        }
    }
}

// Pops the frame with `serial` and anything still above it (guards leaked
// or dropped out of order), innermost first.
fn exit(serial: u64) {
    let _ = RUNTIME.try_with(|cell| {
        let Ok(mut guard) = cell.try_borrow_mut() else {
            return;
        };
        let rt = &mut *guard;

        let Some(position) = rt.frames.iter().rposition(|f| f.serial == serial) else {
            return;
        };

        while rt.frames.len() > position {
            let Some(frame) = rt.frames.pop() else {
                break;
            };
            if let (Some((id, hook)), Some(installed)) =
                (frame.continuation, rt.observer.as_mut())
            {
                if installed.id == id {
                    installed.observer.on_return(&frame.context, hook);
                }
            }
        }
    });
}
