mod logging;
mod recover;
mod trace;

pub use logging::{LoggingAspect, LoggingConfig};
pub use recover::{RecoverAspect, RecoverConfig};
pub use trace::{TraceAspect, TraceConfig};
