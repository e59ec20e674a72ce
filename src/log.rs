//! Logging shim.
//!
//! With the `tracing` feature on, these are `tracing`'s own macros. Without it
//! they swallow their arguments, so diagram rendering pays nothing for the
//! log statements sprinkled through the evaluators.

#[cfg(feature = "tracing")]
pub use tracing::{debug, info, warn};

#[cfg(not(feature = "tracing"))]
#[doc(hidden)]
#[macro_export]
macro_rules! __storyviz_noop_log {
    ($($arg:tt)*) => {};
}

#[cfg(not(feature = "tracing"))]
pub use crate::__storyviz_noop_log as debug;
#[cfg(not(feature = "tracing"))]
pub use crate::__storyviz_noop_log as info;
#[cfg(not(feature = "tracing"))]
pub use crate::__storyviz_noop_log as warn;
