mod errors;
mod logs;
mod metadata;
mod metrics;
mod otel;
mod parsetime;

pub use self::errors::AppError;
pub use self::logs::init_logger;
pub use self::metadata::HeaderInjector;
pub use self::metrics::{Method, MethodLabels, Metrics, Status};
pub use self::otel::{Telemetry, TracingContext};
pub use self::parsetime::parse_datetime;
