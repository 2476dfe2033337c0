use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::info;

use crate::config::MonitorConfig;
use crate::console::{CacheListener, ConsoleEvent, ConsoleHandler};
use crate::errors::{FetchError, Result};
use crate::instance_registry::{InstanceDomain, InstanceRegistry, NewInstance};
use crate::metric_projector::MetricProjector;
use crate::metrics_table::{MetricType, MetricValue};
use crate::object_cache::ObjectCache;

/// The assembled monitoring console.
///
/// Owns the object cache, the projector and the instance registry, and
/// pumps the broker client's event feed into the cache on a spawned task.
/// The metrics framework drives the other side through
/// [`poll_new_instances`](QpidMonitor::poll_new_instances) and
/// [`fetch_metric`](QpidMonitor::fetch_metric) on its own cadence.
#[derive(Debug)]
pub struct QpidMonitor {
    cache: Arc<ObjectCache>,
    projector: MetricProjector,
    registry: Arc<InstanceRegistry>,
}

impl QpidMonitor {
    pub fn new(config: &MonitorConfig) -> Self {
        let cache = Arc::new(ObjectCache::new());
        cache.set_include_auto_delete(config.include_auto_delete);
        let projector = MetricProjector::new(Arc::clone(&cache));
        QpidMonitor {
            cache,
            projector,
            registry: Arc::new(InstanceRegistry::new()),
        }
    }

    /// Shared handle to the cache, for wiring collaborators that talk to it
    /// directly.
    pub fn cache(&self) -> Arc<ObjectCache> {
        Arc::clone(&self.cache)
    }

    /// One-time setup call; see
    /// [`ObjectCache::set_include_auto_delete`].
    pub fn configure_include_auto_delete(&self, include: bool) {
        self.cache.set_include_auto_delete(include);
    }

    /// Spawn the event pump consuming the broker client's feed until the
    /// channel closes.
    pub fn start(&self, mut events: mpsc::Receiver<ConsoleEvent>) -> JoinHandle<()> {
        let listener = CacheListener::new(Arc::clone(&self.cache));
        tokio::spawn(async move {
            while let Some(event) = events.recv().await {
                listener.handle_event(event);
            }
            info!("console event feed closed");
        })
    }

    /// Register every newly discovered object with its instance domain.
    /// Called once per fetch cycle, before any metric fetches.
    pub fn poll_new_instances(&self) -> Vec<NewInstance> {
        self.registry.drain_new_instances(&self.cache)
    }

    /// Fetch one metric for a framework-assigned instance id.
    pub fn fetch_metric(
        &self,
        cluster: u32,
        item: u32,
        instance_id: u32,
        declared: MetricType,
    ) -> Result<MetricValue> {
        let domain = InstanceDomain::for_cluster(cluster)
            .ok_or(FetchError::UnknownMetric { cluster, item })?;
        let identity = self.registry.resolve(domain, instance_id).ok_or_else(|| {
            FetchError::InstanceUnavailable {
                kind: "instance",
                identity: format!("{}#{}", domain, instance_id),
            }
        })?;
        self.projector.fetch(cluster, item, &identity, declared)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qmon_core::{AttributeValue, ObjectIdentity, ObjectSnapshot, SchemaKey};
    use std::collections::BTreeMap;

    fn identity(n: u64) -> ObjectIdentity {
        ObjectIdentity::new(0, 1, 0, 0, n)
    }

    fn queue_properties(name: &str) -> ObjectSnapshot {
        let mut attributes = BTreeMap::new();
        attributes.insert("name".to_string(), AttributeValue::Str(name.to_string()));
        attributes.insert("autoDelete".to_string(), AttributeValue::Bool(false));
        attributes.insert("durable".to_string(), AttributeValue::Bool(true));
        ObjectSnapshot::new(SchemaKey::new("org.apache.qpid.broker", "queue"), attributes)
    }

    fn queue_statistics(depth: u64) -> ObjectSnapshot {
        let mut attributes = BTreeMap::new();
        attributes.insert("msgDepth".to_string(), AttributeValue::Uint(depth));
        ObjectSnapshot::new(SchemaKey::new("org.apache.qpid.broker", "queue"), attributes)
    }

    /// Test: full cycle from event feed to metric fetch
    ///
    /// Purpose
    /// - Exercise the assembled console the way the two collaborators do:
    ///   events in through the pump, instances and metrics out.
    ///
    /// Flow
    /// - Pump connect + properties events through the channel, close it,
    ///   and wait for the pump to finish
    /// - Poll new instances, fetch a string property and a statistics
    ///   metric before and after the statistics update arrives
    ///
    /// Expected
    /// - One queue instance; "name" fetches as "q1"; statistics fetch is
    ///   InstanceUnavailable until statistics are delivered
    #[tokio::test]
    async fn test_event_feed_to_metric_fetch() {
        let _ = tracing_subscriber::fmt().with_test_writer().try_init();

        let monitor = QpidMonitor::new(&MonitorConfig::default());
        let (tx, rx) = mpsc::channel(16);
        let pump = monitor.start(rx);

        let id = identity(1);
        tx.send(ConsoleEvent::BrokerConnected {
            url: "amqp:tcp:localhost:5672".to_string(),
            broker_id: uuid::Uuid::new_v4(),
        })
        .await
        .unwrap();
        tx.send(ConsoleEvent::ObjectProperties {
            id,
            snapshot: queue_properties("q1"),
        })
        .await
        .unwrap();
        drop(tx);
        pump.await.unwrap();

        let instances = monitor.poll_new_instances();
        assert_eq!(instances.len(), 1);
        let instance = &instances[0];
        assert_eq!(instance.domain, InstanceDomain::Queue);
        assert_eq!(instance.name, "q1");

        // Queue properties cluster 2, item 5 is "name".
        let name = monitor
            .fetch_metric(2, 5, instance.instance_id, MetricType::String)
            .unwrap();
        assert_eq!(name, MetricValue::String("q1".to_string()));

        // No statistics yet.
        let err = monitor
            .fetch_metric(3, 29, instance.instance_id, MetricType::U64)
            .unwrap_err();
        assert!(matches!(err, FetchError::InstanceUnavailable { .. }));

        // Deliver statistics directly (the pump has shut down) and refetch.
        monitor.cache().on_statistics_update(id, queue_statistics(7));
        let depth = monitor
            .fetch_metric(3, 29, instance.instance_id, MetricType::U64)
            .unwrap();
        assert_eq!(depth, MetricValue::U64(7));

        // Still exactly one discovery.
        assert!(monitor.poll_new_instances().is_empty());
    }

    #[test]
    fn test_unregistered_instance_is_unavailable() {
        let monitor = QpidMonitor::new(&MonitorConfig::default());
        let err = monitor
            .fetch_metric(2, 5, 0, MetricType::String)
            .unwrap_err();
        assert!(matches!(err, FetchError::InstanceUnavailable { kind, .. } if kind == "instance"));

        let err = monitor
            .fetch_metric(11, 0, 0, MetricType::U64)
            .unwrap_err();
        assert!(matches!(err, FetchError::UnknownMetric { .. }));
    }
}
