/// Enter an instrumented frame for the enclosing function.
///
/// The returned guard must be bound to a named variable; the frame returns
/// when it drops.
///
/// ```
/// struct Driver;
///
/// impl Driver {
///     fn check_eyes(&self) -> bool {
///         let _frame = seqtrace::trace_frame!(self);
///         true
///     }
/// }
///
/// fn helper() {
///     let _frame = seqtrace::trace_frame!();
/// }
/// # Driver.check_eyes();
/// # helper();
/// ```
///
/// Forms:
/// - `trace_frame!()` / `trace_frame!(None, "name")`: no receiver
/// - `trace_frame!(self)` / `trace_frame!(self, "name")`: bound to a reference,
///   named by address
/// - `trace_frame!(self, id: self.trace_id)` /
///   `trace_frame!(self, id: self.trace_id, "name")`: named by a stored
///   [`TraceId`](crate::TraceId), for values that move or are short-lived
///
/// Without an explicit name the operation is named after the enclosing fn.
#[macro_export]
macro_rules! trace_frame {
    () => {
        $crate::trace_frame!(None, $crate::__enclosing_fn!())
    };
    (None) => {
        $crate::trace_frame!(None, $crate::__enclosing_fn!())
    };
    (None, $op:expr) => {
        $crate::infrastructure::runtime::enter($crate::domain::context::InvocationContext::free($op))
    };
    ($receiver:expr, id: $id:expr) => {
        $crate::trace_frame!($receiver, id: $id, $crate::__enclosing_fn!())
    };
    ($receiver:expr, id: $id:expr, $op:expr) => {
        $crate::infrastructure::runtime::enter($crate::domain::context::InvocationContext::new(
            $crate::domain::context::Receiver::identified($receiver, $id),
            $op,
        ))
    };
    ($receiver:expr) => {
        $crate::trace_frame!($receiver, $crate::__enclosing_fn!())
    };
    ($receiver:expr, $op:expr) => {
        $crate::infrastructure::runtime::enter($crate::domain::context::InvocationContext::new(
            $crate::domain::context::Receiver::of($receiver),
            $op,
        ))
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __enclosing_fn {
    () => {{
        fn __probe() {}
        fn __type_name_of<T>(_: T) -> &'static str {
            ::std::any::type_name::<T>()
        }
        $crate::domain::context::enclosing_fn_name(__type_name_of(__probe))
    }};
}
