use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use tracing::{debug, info, trace};
use uuid::Uuid;

use qmon_core::{ObjectIdentity, ObjectSnapshot, SchemaKey};

use crate::object_cache::ObjectCache;

/// Events delivered by the broker client collaborator.
///
/// A closed set of variants through one handler seam; there is exactly one
/// meaningful concrete listener, so no deeper dispatch hierarchy is needed.
#[derive(Debug, Clone)]
pub enum ConsoleEvent {
    BrokerConnected { url: String, broker_id: Uuid },
    BrokerDisconnected { url: String, broker_id: Uuid },
    NewPackage { package: String },
    NewClass { schema: SchemaKey },
    NewAgent { label: String },
    AgentRemoved { label: String },
    ObjectProperties { id: ObjectIdentity, snapshot: ObjectSnapshot },
    ObjectStatistics { id: ObjectIdentity, snapshot: ObjectSnapshot },
}

pub trait ConsoleHandler: Send + Sync {
    fn handle_event(&self, event: ConsoleEvent);
}

/// Per-process diagnostic state for schema logging.
///
/// Keeps the "log each schema once" behavior without hidden global state:
/// the listener owns this and passes it where needed.
#[derive(Debug, Default)]
pub struct SchemaDiagnostics {
    seen: Mutex<HashSet<SchemaKey>>,
}

impl SchemaDiagnostics {
    pub fn new() -> Self {
        SchemaDiagnostics::default()
    }

    /// Debug-log the snapshot's schema and attribute names, only the first
    /// time this schema key is seen.
    pub fn log_schema(&self, snapshot: &ObjectSnapshot) {
        let mut seen = self
            .seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        if seen.insert(snapshot.schema().clone()) {
            debug!("new schema {}", snapshot.schema());
            for (name, value) in snapshot.attributes() {
                debug!("  attribute: {} ({})", name, value.kind());
            }
        }
    }

    #[cfg(test)]
    fn seen_count(&self) -> usize {
        self.seen
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .len()
    }
}

/// The console listener: routes object updates into the cache and logs
/// lifecycle events.
pub struct CacheListener {
    cache: Arc<ObjectCache>,
    schemas: SchemaDiagnostics,
}

impl CacheListener {
    pub fn new(cache: Arc<ObjectCache>) -> Self {
        CacheListener {
            cache,
            schemas: SchemaDiagnostics::new(),
        }
    }
}

impl ConsoleHandler for CacheListener {
    fn handle_event(&self, event: ConsoleEvent) {
        match event {
            ConsoleEvent::BrokerConnected { url, broker_id } => {
                info!("broker {} ({}) connected", url, broker_id);
            }
            ConsoleEvent::BrokerDisconnected { url, broker_id } => {
                info!("broker {} ({}) disconnected", url, broker_id);
            }
            ConsoleEvent::NewPackage { package } => {
                trace!("new package {}", package);
            }
            ConsoleEvent::NewClass { schema } => {
                trace!("new class {}", schema);
            }
            ConsoleEvent::NewAgent { label } => {
                trace!("new agent {}", label);
            }
            ConsoleEvent::AgentRemoved { label } => {
                trace!("agent {} removed", label);
            }
            ConsoleEvent::ObjectProperties { id, snapshot } => {
                self.schemas.log_schema(&snapshot);
                self.cache.on_properties_update(id, snapshot);
            }
            ConsoleEvent::ObjectStatistics { id, snapshot } => {
                self.schemas.log_schema(&snapshot);
                self.cache.on_statistics_update(id, snapshot);
            }
        }
    }
}
