use qmon_core::CoercionError;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, FetchError>;

/// Failures reported to the metrics framework on a metric fetch.
///
/// The availability variants are expected, recoverable outcomes: the
/// framework retries on its next fetch cycle. Only `Coercion` indicates
/// data that exists but cannot be represented as requested, which is
/// surfaced rather than silently defaulted so downstream readings are
/// never corrupted.
#[derive(Debug, Clone, PartialEq, Error)]
pub enum FetchError {
    /// No snapshot of the requested kind is cached for the identity yet,
    /// or the object has since been retired broker-side.
    #[error("no {kind} cached for object {identity}")]
    InstanceUnavailable {
        kind: &'static str,
        identity: String,
    },

    /// The snapshot exists but lacks the requested attribute.
    #[error("no {metric} attribute found for object {identity}")]
    ValueUnavailable {
        metric: &'static str,
        identity: String,
    },

    /// The (cluster, item) pair names no metric in the descriptor tables.
    #[error("unknown metric: cluster {cluster} item {item}")]
    UnknownMetric { cluster: u32, item: u32 },

    /// The attribute exists but cannot be represented as the declared type.
    #[error("metric type error: {0}")]
    Coercion(#[from] CoercionError),
}
