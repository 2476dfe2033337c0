use std::sync::Arc;
use tracing::debug;

use qmon_core::{AttributeValue, ObjectIdentity};

use crate::errors::{FetchError, Result};
use crate::metrics_table::{self, MetricType, MetricValue};
use crate::object_cache::ObjectCache;

/// Resolves a `(cluster, item)` metric identifier plus a target object into
/// a typed scalar read from the cache.
///
/// Pure request/response over the cache's current snapshots; holds no state
/// of its own.
#[derive(Debug, Clone)]
pub struct MetricProjector {
    cache: Arc<ObjectCache>,
}

impl MetricProjector {
    pub fn new(cache: Arc<ObjectCache>) -> Self {
        MetricProjector { cache }
    }

    /// Fetch one metric value for the object identified by `id`.
    ///
    /// Even clusters read the object's properties snapshot, odd clusters its
    /// statistics. An absent snapshot or attribute is an availability
    /// failure the framework retries; a present attribute that cannot be
    /// represented as `declared` is a coercion failure.
    pub fn fetch(
        &self,
        cluster: u32,
        item: u32,
        id: &ObjectIdentity,
        declared: MetricType,
    ) -> Result<MetricValue> {
        let def = metrics_table::metric(cluster, item)
            .ok_or(FetchError::UnknownMetric { cluster, item })?;

        let from_properties = metrics_table::reads_properties(cluster);
        let snapshot = if from_properties {
            self.cache.lookup_properties(id)
        } else {
            self.cache.lookup_statistics(id)
        };
        let snapshot = match snapshot {
            Some(snapshot) => snapshot,
            None => {
                let kind = if from_properties {
                    "properties"
                } else {
                    "statistics"
                };
                debug!("no {} for {}", kind, id);
                return Err(FetchError::InstanceUnavailable {
                    kind,
                    identity: id.to_string(),
                });
            }
        };

        let value = snapshot
            .attribute(def.name)
            .ok_or_else(|| FetchError::ValueUnavailable {
                metric: def.name,
                identity: id.to_string(),
            })?;

        project(value, declared).map_err(FetchError::from)
    }
}

/// Coerce one attribute value to the metric's declared output type.
fn project(
    value: &AttributeValue,
    declared: MetricType,
) -> std::result::Result<MetricValue, qmon_core::CoercionError> {
    match declared {
        MetricType::I32 => value.as_i32().map(MetricValue::I32),
        MetricType::I64 => value.as_i64().map(MetricValue::I64),
        MetricType::U32 => value.as_u32().map(MetricValue::U32),
        MetricType::U64 => value.as_u64().map(MetricValue::U64),
        MetricType::Float => value.as_f32().map(MetricValue::Float),
        MetricType::Double => value.as_f64().map(MetricValue::Double),
        MetricType::String => Ok(MetricValue::String(render_string(value))),
    }
}

/// Render a value for a string-declared metric.
///
/// The arm order is significant: booleans, maps, nulls, object references
/// and UUIDs each have a fixed rendering that takes precedence over the
/// generic string conversion.
fn render_string(value: &AttributeValue) -> String {
    match value {
        AttributeValue::Bool(b) => if *b { "true" } else { "false" }.to_string(),
        AttributeValue::Map(_) => value.to_string(),
        AttributeValue::Null => "null".to_string(),
        AttributeValue::ObjectRef(id) => id.to_string(),
        AttributeValue::Uuid(uuid) => uuid.to_string(),
        other => other.to_string(),
    }
}
