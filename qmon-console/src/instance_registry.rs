use dashmap::DashMap;
use std::fmt::{self, Display, Formatter};
use std::sync::atomic::{AtomicU32, Ordering};
use tracing::{debug, warn};

use qmon_core::{ObjectClass, ObjectIdentity};

use crate::object_cache::ObjectCache;

/// The three instance domains the console populates, one per modeled
/// object class.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InstanceDomain {
    Broker,
    Queue,
    System,
}

impl InstanceDomain {
    /// Domain addressed by a metric cluster: broker clusters 0 and 1,
    /// queue clusters 2 and 3, system cluster 4.
    pub fn for_cluster(cluster: u32) -> Option<InstanceDomain> {
        match cluster {
            0 | 1 => Some(InstanceDomain::Broker),
            2 | 3 => Some(InstanceDomain::Queue),
            4 => Some(InstanceDomain::System),
            _ => None,
        }
    }

    pub fn for_class(class: ObjectClass) -> Option<InstanceDomain> {
        match class {
            ObjectClass::Broker => Some(InstanceDomain::Broker),
            ObjectClass::Queue => Some(InstanceDomain::Queue),
            ObjectClass::System => Some(InstanceDomain::System),
            ObjectClass::Other => None,
        }
    }

    fn index(self) -> usize {
        match self {
            InstanceDomain::Broker => 0,
            InstanceDomain::Queue => 1,
            InstanceDomain::System => 2,
        }
    }
}

impl Display for InstanceDomain {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            InstanceDomain::Broker => write!(f, "broker"),
            InstanceDomain::Queue => write!(f, "queue"),
            InstanceDomain::System => write!(f, "system"),
        }
    }
}

/// A newly registered instance, reported once per discovered object.
#[derive(Debug, Clone, PartialEq)]
pub struct NewInstance {
    pub domain: InstanceDomain,
    pub instance_id: u32,
    pub name: String,
    pub identity: ObjectIdentity,
}

/// Adapter-owned mapping between the metrics framework's per-domain
/// instance ids and broker object identities.
///
/// The cache deliberately knows nothing about instance ids; this registry
/// is the only holder of that association. Instance names are derived from
/// the object's `name` (or `nodeName`) attribute, and a name seen again
/// keeps its instance id with the identity refreshed.
#[derive(Debug, Default)]
pub struct InstanceRegistry {
    by_instance: DashMap<(InstanceDomain, u32), ObjectIdentity>,
    by_name: DashMap<(InstanceDomain, String), u32>,
    next_ids: [AtomicU32; 3],
}

impl InstanceRegistry {
    pub fn new() -> Self {
        InstanceRegistry::default()
    }

    /// Drain the cache's discovery queue, registering an instance for each
    /// identity that has a usable properties snapshot.
    ///
    /// Objects with no properties yet (statistics-only first sight) or no
    /// name attribute are skipped with a log line; they were dequeued, so
    /// they are not reported again.
    pub fn drain_new_instances(&self, cache: &ObjectCache) -> Vec<NewInstance> {
        let mut registered = Vec::new();
        while let Some(identity) = cache.next_new_identity() {
            let props = match cache.lookup_properties(&identity) {
                Some(props) => props,
                None => {
                    debug!("no properties found for object {}", identity);
                    continue;
                }
            };
            let domain = match InstanceDomain::for_class(props.object_class()) {
                Some(domain) => domain,
                None => {
                    // The cache filters unrecognized classes, so this is a
                    // programming-error-class defect; log and move on.
                    warn!("{} has unsupported type", identity);
                    continue;
                }
            };
            let name = match props.name(true) {
                Some(name) if !name.is_empty() => name,
                _ => {
                    warn!("{} has no name attribute", identity);
                    continue;
                }
            };
            let instance_id = self.register(domain, name.clone(), identity);
            registered.push(NewInstance {
                domain,
                instance_id,
                name,
                identity,
            });
        }
        registered
    }

    /// Identity behind a framework instance id, if one was registered.
    pub fn resolve(&self, domain: InstanceDomain, instance_id: u32) -> Option<ObjectIdentity> {
        self.by_instance
            .get(&(domain, instance_id))
            .map(|entry| *entry)
    }

    fn register(&self, domain: InstanceDomain, name: String, identity: ObjectIdentity) -> u32 {
        let instance_id = *self
            .by_name
            .entry((domain, name))
            .or_insert_with(|| self.next_ids[domain.index()].fetch_add(1, Ordering::Relaxed));
        self.by_instance.insert((domain, instance_id), identity);
        instance_id
    }
}
