//! seqtrace - record call/return events on the current thread and render
//! them as sequence-diagram text.
//!
//! ```
//! use seqtrace::{trace_frame, TraceSession};
//!
//! struct Car;
//! struct Driver;
//!
//! impl Car {
//!     fn start(&self, driver: &Driver) {
//!         let _frame = trace_frame!(self);
//!         driver.check();
//!     }
//! }
//!
//! impl Driver {
//!     fn check(&self) {
//!         let _frame = trace_frame!(self);
//!     }
//! }
//!
//! let _main = trace_frame!(None, "main");
//! let mut session = TraceSession::new();
//! session.start().unwrap();
//! Car.start(&Driver);
//! session.stop().unwrap();
//! assert!(session.render().contains("Car[0] -> Driver[0] : check"));
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
mod macros;
pub mod ports;

pub use application::{SessionState, TraceSession};
pub use domain::context::{InvocationContext, Receiver, TraceId};
pub use domain::error::TraceError;
pub use domain::event::{CallEvent, EventLog, ReturnEvent, TraceEvent};
pub use domain::naming::{NamedEntity, NamingRegistry};
pub use infrastructure::config::{NamingPolicy, TracerConfig};
pub use infrastructure::runtime::{current_depth, enter, enter_fn, enter_method, Frame};
