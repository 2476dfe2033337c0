pub mod config;
pub mod console;
pub mod errors;
pub mod instance_registry;
pub mod metric_projector;
pub mod metrics_table;
pub mod monitor;
pub mod object_cache;

pub use config::MonitorConfig;
pub use console::{CacheListener, ConsoleEvent, ConsoleHandler};
pub use errors::{FetchError, Result};
pub use instance_registry::{InstanceDomain, InstanceRegistry, NewInstance};
pub use metric_projector::MetricProjector;
pub use metrics_table::{MetricType, MetricValue};
pub use monitor::QpidMonitor;
pub use object_cache::ObjectCache;
