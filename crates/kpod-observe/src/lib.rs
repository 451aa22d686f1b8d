mod logger;
pub use logger::*;

mod events;
pub use events::TracingMetrics;
