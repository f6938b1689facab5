mod tracing;

pub use self::tracing::{LogFormat, init as init_tracing};
