use dashmap::{DashMap, DashSet};
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Mutex;
use tracing::{trace, warn};

use qmon_core::{AttributeValue, ObjectClass, ObjectIdentity, ObjectSnapshot};

/// Thread-safe accumulator of broker-advertised object state.
///
/// The broker client library pushes property and statistics updates from its
/// own delivery thread while the metrics framework polls and looks up from
/// another; the cache is the only synchronization point between the two.
/// Properties and statistics are kept in independent slots because the
/// broker delivers them as separate update streams that race in practice.
///
/// Every identity is surfaced through the discovery queue at most once for
/// the lifetime of the process, the first time a snapshot of either kind is
/// accepted for it.
#[derive(Debug, Default)]
pub struct ObjectCache {
    props: DashMap<ObjectIdentity, ObjectSnapshot>,
    stats: DashMap<ObjectIdentity, ObjectSnapshot>,
    /// First-sight test-and-set; an identity enters `discovery` exactly when
    /// its insertion here succeeds.
    seen: DashSet<ObjectIdentity>,
    /// Identities not yet handed to the framework, in first-sight order.
    discovery: Mutex<VecDeque<ObjectIdentity>>,
    include_auto_delete: AtomicBool,
}

impl ObjectCache {
    pub fn new() -> Self {
        ObjectCache::default()
    }

    /// Whether auto-delete objects (ephemeral session queues, typically)
    /// should be cached and discovered. Off by default to bound cache
    /// growth.
    ///
    /// Expected to be called once, before update events start flowing.
    /// Flipping it mid-stream cannot corrupt the cache, but whether an
    /// in-flight update is filtered under the old or new setting is
    /// unspecified.
    pub fn set_include_auto_delete(&self, include: bool) {
        self.include_auto_delete.store(include, Ordering::Relaxed);
    }

    pub fn include_auto_delete(&self) -> bool {
        self.include_auto_delete.load(Ordering::Relaxed)
    }

    /// Accept a properties update for `id`, subject to classification and
    /// auto-delete filtering.
    pub fn on_properties_update(&self, id: ObjectIdentity, snapshot: ObjectSnapshot) {
        if snapshot.object_class() == ObjectClass::Other {
            trace!("ignoring unsupported object {} ({})", id, snapshot.schema());
            return;
        }
        if !self.include_auto_delete() && is_auto_delete(&snapshot) {
            trace!("ignoring auto-delete {} ({})", snapshot.describe(), id);
            return;
        }
        self.props.insert(id, snapshot);
        self.note_first_sight(id);
    }

    /// Accept a statistics update for `id`.
    ///
    /// When auto-delete filtering is on, statistics alone cannot establish
    /// the object's auto-delete status, so the update is discarded unless a
    /// non-auto-delete properties snapshot is already cached. Both the
    /// no-properties-yet and the deliberately-suppressed case are benign
    /// transient states.
    pub fn on_statistics_update(&self, id: ObjectIdentity, snapshot: ObjectSnapshot) {
        if snapshot.object_class() == ObjectClass::Other {
            trace!("ignoring unsupported object {} ({})", id, snapshot.schema());
            return;
        }
        if !self.include_auto_delete() {
            match self.props.get(&id) {
                None => {
                    trace!("no properties yet for {}, dropping statistics", id);
                    return;
                }
                Some(props) if is_auto_delete(&props) => {
                    trace!("ignoring statistics for auto-delete {}", props.describe());
                    return;
                }
                Some(_) => {}
            }
        }
        self.stats.insert(id, snapshot);
        self.note_first_sight(id);
    }

    /// Dequeue the oldest identity not yet reported to the framework.
    /// Returns immediately with `None` when there is nothing pending.
    pub fn next_new_identity(&self) -> Option<ObjectIdentity> {
        self.discovery_queue().pop_front()
    }

    pub fn lookup_properties(&self, id: &ObjectIdentity) -> Option<ObjectSnapshot> {
        self.props.get(id).map(|entry| entry.value().clone())
    }

    pub fn lookup_statistics(&self, id: &ObjectIdentity) -> Option<ObjectSnapshot> {
        self.stats.get(id).map(|entry| entry.value().clone())
    }

    /// Number of identities that have ever been accepted.
    pub fn known_objects(&self) -> usize {
        self.seen.len()
    }

    fn note_first_sight(&self, id: ObjectIdentity) {
        // The set insert is the atomic test-and-set: it returns true for
        // exactly one caller per identity, even when a properties and a
        // statistics update race on first sight.
        if self.seen.insert(id) {
            self.discovery_queue().push_back(id);
        }
    }

    fn discovery_queue(&self) -> std::sync::MutexGuard<'_, VecDeque<ObjectIdentity>> {
        // Nothing can panic while holding this lock, so it cannot poison.
        self.discovery
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

/// Read the object's `autoDelete` property. A present but non-boolean value
/// is reported and treated as not-auto-delete, so an otherwise valid object
/// still gets cached.
fn is_auto_delete(snapshot: &ObjectSnapshot) -> bool {
    match snapshot.attribute("autoDelete") {
        None => false,
        Some(AttributeValue::Bool(auto_delete)) => *auto_delete,
        Some(other) => {
            warn!(
                "{} has non-boolean autoDelete attribute ({})",
                snapshot.describe(),
                other.kind()
            );
            false
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use qmon_core::SchemaKey;
    use std::collections::BTreeMap;
    use std::sync::Arc;

    fn identity(n: u64) -> ObjectIdentity {
        ObjectIdentity::new(0, 1, 0, 0, n)
    }

    fn queue_props(name: &str, auto_delete: bool) -> ObjectSnapshot {
        let mut attributes = BTreeMap::new();
        attributes.insert("name".to_string(), AttributeValue::Str(name.to_string()));
        attributes.insert("autoDelete".to_string(), AttributeValue::Bool(auto_delete));
        attributes.insert("durable".to_string(), AttributeValue::Bool(true));
        ObjectSnapshot::new(SchemaKey::new("org.apache.qpid.broker", "queue"), attributes)
    }

    fn queue_stats(depth: u64) -> ObjectSnapshot {
        let mut attributes = BTreeMap::new();
        attributes.insert("msgDepth".to_string(), AttributeValue::Uint(depth));
        ObjectSnapshot::new(SchemaKey::new("org.apache.qpid.broker", "queue"), attributes)
    }

    fn exchange_props() -> ObjectSnapshot {
        ObjectSnapshot::new(
            SchemaKey::new("org.apache.qpid.broker", "exchange"),
            BTreeMap::new(),
        )
    }

    #[test]
    fn test_discovery_is_at_most_once() {
        let cache = ObjectCache::new();
        let id = identity(1);

        cache.on_properties_update(id, queue_props("q1", false));
        cache.on_statistics_update(id, queue_stats(1));
        cache.on_properties_update(id, queue_props("q1", false));
        cache.on_statistics_update(id, queue_stats(2));

        assert_eq!(cache.next_new_identity(), Some(id));
        assert_eq!(cache.next_new_identity(), None);

        // Later updates never re-queue a known identity.
        cache.on_properties_update(id, queue_props("q1", false));
        assert_eq!(cache.next_new_identity(), None);
    }

    #[test]
    fn test_discovery_preserves_first_sight_order() {
        let cache = ObjectCache::new();
        for n in 0..5 {
            cache.on_properties_update(identity(n), queue_props(&format!("q{}", n), false));
        }
        for n in 0..5 {
            assert_eq!(cache.next_new_identity(), Some(identity(n)));
        }
        assert_eq!(cache.next_new_identity(), None);
    }

    /// Test: property and statistics slots are independent
    ///
    /// Purpose
    /// - Statistics may arrive before properties; each slot must answer for
    ///   itself, and the late properties arrival must not re-discover.
    ///
    /// Flow
    /// - Deliver statistics only (with auto-delete filtering off, so the
    ///   statistics are accepted without a properties snapshot)
    /// - Validate lookups, then deliver properties and re-validate
    ///
    /// Expected
    /// - Properties lookup absent then present; exactly one discovery
    #[test]
    fn test_independent_slots_stats_first() {
        let cache = ObjectCache::new();
        cache.set_include_auto_delete(true);
        let id = identity(9);

        cache.on_statistics_update(id, queue_stats(42));
        assert!(cache.lookup_properties(&id).is_none());
        let stats = cache.lookup_statistics(&id).unwrap();
        assert_eq!(stats.attribute("msgDepth").unwrap().as_u64().unwrap(), 42);

        assert_eq!(cache.next_new_identity(), Some(id));

        cache.on_properties_update(id, queue_props("q9", false));
        assert!(cache.lookup_properties(&id).is_some());
        assert!(cache.lookup_statistics(&id).is_some());
        // Already first-sighted via statistics.
        assert_eq!(cache.next_new_identity(), None);
    }

    #[test]
    fn test_auto_delete_suppression() {
        let cache = ObjectCache::new();
        let id = identity(3);

        cache.on_properties_update(id, queue_props("tmp", true));
        assert!(cache.lookup_properties(&id).is_none());
        assert_eq!(cache.next_new_identity(), None);

        // Statistics with no properties cached are also suppressed.
        cache.on_statistics_update(id, queue_stats(5));
        assert!(cache.lookup_statistics(&id).is_none());
        assert_eq!(cache.next_new_identity(), None);
    }

    #[test]
    fn test_auto_delete_override() {
        let cache = ObjectCache::new();
        cache.set_include_auto_delete(true);
        let id = identity(4);

        cache.on_properties_update(id, queue_props("tmp", true));
        cache.on_statistics_update(id, queue_stats(5));

        assert!(cache.lookup_properties(&id).is_some());
        assert!(cache.lookup_statistics(&id).is_some());
        assert_eq!(cache.next_new_identity(), Some(id));
        assert_eq!(cache.next_new_identity(), None);
    }

    #[test]
    fn test_malformed_auto_delete_is_lenient() {
        let cache = ObjectCache::new();
        let id = identity(6);

        let mut attributes = BTreeMap::new();
        attributes.insert("name".to_string(), AttributeValue::Str("q6".to_string()));
        attributes.insert(
            "autoDelete".to_string(),
            AttributeValue::Str("yes".to_string()),
        );
        let snapshot = ObjectSnapshot::new(
            SchemaKey::new("org.apache.qpid.broker", "queue"),
            attributes,
        );

        // Non-boolean autoDelete is warned about and treated as false.
        cache.on_properties_update(id, snapshot);
        assert!(cache.lookup_properties(&id).is_some());
        assert_eq!(cache.next_new_identity(), Some(id));
    }

    #[test]
    fn test_unrecognized_class_never_cached() {
        let cache = ObjectCache::new();
        let id = identity(7);

        cache.on_properties_update(id, exchange_props());
        cache.on_statistics_update(id, exchange_props());

        assert!(cache.lookup_properties(&id).is_none());
        assert!(cache.lookup_statistics(&id).is_none());
        assert_eq!(cache.next_new_identity(), None);

        // A later recognized update for the same identity is simply the
        // first accepted one.
        cache.on_properties_update(id, queue_props("q7", false));
        assert!(cache.lookup_properties(&id).is_some());
        assert_eq!(cache.next_new_identity(), Some(id));
    }

    /// Test: concurrent updates and lookups
    ///
    /// Purpose
    /// - Drive the cache from several update threads and a draining thread
    ///   at once; no identity may be lost or duplicated in discovery.
    ///
    /// Flow
    /// - 4 writer threads each deliver properties + statistics for the same
    ///   200 identities (so first-sight races between kinds and threads)
    /// - A drainer thread polls next_new_identity throughout
    ///
    /// Expected
    /// - Exactly 200 distinct identities discovered in total
    #[test]
    fn test_concurrent_update_and_drain() {
        const OBJECTS: u64 = 200;

        let cache = Arc::new(ObjectCache::new());
        cache.set_include_auto_delete(true);

        let mut writers = Vec::new();
        for worker in 0..4 {
            let cache = Arc::clone(&cache);
            writers.push(std::thread::spawn(move || {
                for n in 0..OBJECTS {
                    let id = identity(n);
                    if worker % 2 == 0 {
                        cache.on_properties_update(id, queue_props(&format!("q{}", n), false));
                        cache.on_statistics_update(id, queue_stats(n));
                    } else {
                        cache.on_statistics_update(id, queue_stats(n));
                        cache.on_properties_update(id, queue_props(&format!("q{}", n), false));
                    }
                    let _ = cache.lookup_properties(&id);
                    let _ = cache.lookup_statistics(&id);
                }
            }));
        }

        let drainer = {
            let cache = Arc::clone(&cache);
            std::thread::spawn(move || {
                let mut drained = Vec::new();
                while drained.len() < OBJECTS as usize {
                    match cache.next_new_identity() {
                        Some(id) => drained.push(id),
                        None => std::thread::yield_now(),
                    }
                }
                drained
            })
        };

        for writer in writers {
            writer.join().unwrap();
        }
        let mut drained = drainer.join().unwrap();
        assert_eq!(cache.next_new_identity(), None);

        drained.sort();
        drained.dedup();
        assert_eq!(drained.len(), OBJECTS as usize);
        assert_eq!(cache.known_objects(), OBJECTS as usize);
    }
}
