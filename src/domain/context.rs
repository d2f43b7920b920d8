//! Invocation Contexts
//!
//! What an instrumented frame knows about itself: the receiver it runs on
//! and the operation it performs.

use std::sync::atomic::{AtomicU64, Ordering};

static NEXT_TRACE_ID: AtomicU64 = AtomicU64::new(0);

/// Stable identity handle for a traced value.
///
/// Store one in a struct at construction and pass it to
/// `trace_frame!(self, id: self.trace_id)`. The name then follows the value
/// when it moves, and a new value never inherits a dropped value's name.
/// Cloning the handle clones the identity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct TraceId(u64);

impl TraceId {
    /// Allocate a fresh id, unique within the process.
    pub fn next() -> Self {
        TraceId(NEXT_TRACE_ID.fetch_add(1, Ordering::Relaxed))
    }

    /// Wrap an id the caller manages itself.
    pub fn from_raw(raw: u64) -> Self {
        TraceId(raw)
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

impl Default for TraceId {
    fn default() -> Self {
        Self::next()
    }
}

/// Address identity of a borrowed referent.
///
/// Qualified by the full type path so that a struct and its first field
/// (which share an address) stay distinct.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Identity {
    pub type_path: &'static str,
    pub addr: usize,
}

/// The object an invocation is bound to, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Receiver {
    /// A borrowed object (`self`), identified by its address
    Object {
        class_label: &'static str,
        identity: Identity,
    },
    /// An object carrying its own `TraceId`
    Surrogate { class_label: &'static str, id: TraceId },
    /// No receiver: free functions, associated functions, constructors
    None,
}

impl Receiver {
    /// Bind to a borrowed object, identified by its address.
    ///
    /// An address is only stable while the value neither moves nor drops;
    /// prefer `identified` for values that do.
    pub fn of<T: ?Sized>(referent: &T) -> Self {
        let type_path = std::any::type_name::<T>();
        Receiver::Object {
            class_label: short_type_name(type_path),
            identity: Identity {
                type_path,
                addr: referent as *const T as *const () as usize,
            },
        }
    }

    /// Bind to a borrowed object named by `id` rather than by its address.
    pub fn identified<T: ?Sized>(_referent: &T, id: TraceId) -> Self {
        Self::surrogate(short_type_name(std::any::type_name::<T>()), id)
    }

    /// Bind to an explicit class label and id.
    pub fn surrogate(class_label: &'static str, id: TraceId) -> Self {
        Receiver::Surrogate { class_label, id }
    }

    pub fn class_label(&self) -> Option<&'static str> {
        match *self {
            Receiver::Object { class_label, .. } | Receiver::Surrogate { class_label, .. } => {
                Some(class_label)
            }
            Receiver::None => None,
        }
    }

    pub fn is_none(&self) -> bool {
        matches!(self, Receiver::None)
    }
}

/// A live instrumented frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvocationContext {
    pub receiver: Receiver,
    pub operation: &'static str,
}

impl InvocationContext {
    pub fn new(receiver: Receiver, operation: &'static str) -> Self {
        Self { receiver, operation }
    }

    /// Context of a function without receiver.
    pub fn free(operation: &'static str) -> Self {
        Self::new(Receiver::None, operation)
    }
}

/// Reduce a full type path to the bare type name.
///
/// `alloc::vec::Vec<my::Car>` becomes `Vec`, `dyn my::Op` becomes `Op`.
pub fn short_type_name(type_path: &'static str) -> &'static str {
    let base = type_path.split('<').next().unwrap_or(type_path);
    let base = base.rsplit("::").next().unwrap_or(base);
    base.trim_start_matches(['&', '*'])
        .trim_start_matches("mut ")
        .trim_start_matches("const ")
        .trim_start_matches("dyn ")
}

/// Name of the function enclosing a `trace_frame!` call site.
///
/// Takes the type name of a nested probe fn (`krate::Car::start::__probe`)
/// and returns its parent segment, skipping closure frames.
#[doc(hidden)]
pub fn enclosing_fn_name(probe_path: &'static str) -> &'static str {
    let path = probe_path.strip_suffix("::__probe").unwrap_or(probe_path);
    let mut segments = path.rsplit("::").filter(|s| *s != "{{closure}}");
    segments.next().unwrap_or(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    struct Car {
        wheels: u8,
    }

    #[test]
    fn test_short_type_name() {
        assert_eq!(short_type_name("seqtrace::demo::Car"), "Car");
        assert_eq!(short_type_name("alloc::vec::Vec<seqtrace::Car>"), "Vec");
        assert_eq!(short_type_name("dyn seqtrace::Op"), "Op");
        assert_eq!(short_type_name("u32"), "u32");
    }

    #[test]
    fn test_receiver_of_uses_address_identity() {
        let a = Car { wheels: 4 };
        let b = Car { wheels: 4 };
        assert_eq!(Receiver::of(&a), Receiver::of(&a));
        assert_ne!(Receiver::of(&a), Receiver::of(&b));
        assert_eq!(a.wheels, b.wheels);

        match Receiver::of(&a) {
            Receiver::Object { class_label, .. } => assert_eq!(class_label, "Car"),
            other => panic!("expected an object receiver, got {:?}", other),
        }
    }

    #[test]
    fn test_struct_and_first_field_are_distinct() {
        let car = Car { wheels: 3 };
        assert_ne!(Receiver::of(&car), Receiver::of(&car.wheels));
    }

    #[test]
    fn test_identified_receiver_keeps_class_and_id() {
        let car = Car { wheels: 4 };
        let id = TraceId::next();
        let receiver = Receiver::identified(&car, id);

        assert_eq!(receiver, Receiver::surrogate("Car", id));
        assert_eq!(receiver.class_label(), Some("Car"));
        assert_eq!(Receiver::None.class_label(), None);
        assert_eq!(car.wheels, 4);
    }

    #[test]
    fn test_trace_ids_are_fresh() {
        let a = TraceId::next();
        let b = TraceId::default();
        assert_ne!(a, b);
        assert_eq!(TraceId::from_raw(a.raw()), a);
    }

    #[test]
    fn test_enclosing_fn_name() {
        assert_eq!(enclosing_fn_name("krate::Car::start::__probe"), "start");
        assert_eq!(
            enclosing_fn_name("krate::main::{{closure}}::__probe"),
            "main"
        );
        assert_eq!(enclosing_fn_name("helper::__probe"), "helper");
    }
}
