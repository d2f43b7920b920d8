//! Interceptor
//!
//! Turns runtime boundaries into Call/Return events on a shared Recording.

use crate::domain::context::InvocationContext;
use crate::domain::event::CallEvent;
use crate::domain::recording::Recording;
use crate::ports::{InvocationObserver, ReturnHook};
use std::cell::RefCell;
use std::rc::Rc;

pub struct Interceptor {
    recording: Rc<RefCell<Recording>>,
}

impl Interceptor {
    pub fn new(recording: Rc<RefCell<Recording>>) -> Self {
        Self { recording }
    }
}

impl InvocationObserver for Interceptor {
    fn on_invocation(
        &mut self,
        context: &InvocationContext,
        caller: Option<&InvocationContext>,
    ) -> ReturnHook {
        // Entry frames have no call site to draw an arrow from.
        let Some(caller) = caller else {
            return ReturnHook::Ignore;
        };

        let mut recording = self.recording.borrow_mut();
        if recording.is_poisoned() {
            return ReturnHook::Ignore;
        }

        // A receiver-less caller resolves to the placeholder.
        let caller = recording.registry.resolve(&caller.receiver);
        let target = recording.registry.resolve(&context.receiver);
        recording.push_call(CallEvent::new(caller, target, context.operation));
        ReturnHook::Close
    }

    fn on_return(&mut self, context: &InvocationContext, hook: ReturnHook) {
        if hook == ReturnHook::Ignore {
            return;
        }

        let mut recording = self.recording.borrow_mut();
        if recording.is_poisoned() {
            return;
        }
        if let Err(err) = recording.pop_call() {
            tracing::error!(%err, operation = context.operation, "unmatched return, recording invalidated");
            recording.poison();
        }
    }
}
