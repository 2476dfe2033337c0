//! Static metric descriptor tables.
//!
//! Metrics are addressed by a `(cluster, item)` pair. Clusters alternate by
//! convention between the two attribute streams of each object class: an
//! even cluster reads from properties, an odd one from statistics.
//!
//! - 0: broker properties
//! - 1: broker statistics
//! - 2: queue properties
//! - 3: queue statistics
//! - 4: system properties (systems publish no statistics)

/// Output type a metric is declared to produce.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MetricType {
    I32,
    I64,
    U32,
    U64,
    Float,
    Double,
    String,
}

/// A scalar metric value, coerced to the metric's declared type.
#[derive(Debug, Clone, PartialEq)]
pub enum MetricValue {
    I32(i32),
    I64(i64),
    U32(u32),
    U64(u64),
    Float(f32),
    Double(f64),
    String(String),
}

/// One metric descriptor: the attribute it reads and the type it declares.
#[derive(Debug, Clone, Copy)]
pub struct MetricDef {
    pub item: u32,
    pub name: &'static str,
    pub ty: MetricType,
    pub description: &'static str,
}

impl MetricDef {
    const fn new(item: u32, name: &'static str, ty: MetricType, description: &'static str) -> Self {
        MetricDef {
            item,
            name,
            ty,
            description,
        }
    }
}

use MetricType::{String as Text, U32, U64};

// org.apache.qpid.broker::broker::properties
pub const BROKER_PROPERTIES: &[MetricDef] = &[
    MetricDef::new(0, "connBacklog", U32, "Connection backlog limit for listening socket"),
    MetricDef::new(1, "dataDir", Text, "Persistent configuration storage location"),
    MetricDef::new(2, "maxConns", U32, "Maximum allowed connections"),
    MetricDef::new(3, "mgmtPubInterval", U32, "Interval for management broadcasts"),
    MetricDef::new(4, "mgmtPublish", Text, "Broker's management agent sends unsolicited data on the publish interval"),
    MetricDef::new(5, "name", Text, "Index for the broker at this agent"),
    MetricDef::new(6, "port", U32, "TCP Port for AMQP Service"),
    MetricDef::new(7, "stagingThreshold", U32, "Broker stages messages over this size to disk"),
    MetricDef::new(8, "systemRef", Text, "System ID"),
    MetricDef::new(9, "version", Text, "Running software version"),
    MetricDef::new(10, "workerThreads", U32, "Thread pool size"),
];

// org.apache.qpid.broker::broker::statistics
pub const BROKER_STATISTICS: &[MetricDef] = &[
    MetricDef::new(0, "abandoned", U64, "Messages left in a deleted queue"),
    MetricDef::new(1, "abandonedViaAlt", U64, "Messages routed to alternate exchange from a deleted queue"),
    MetricDef::new(2, "acquires", U64, "Messages acquired from the queue"),
    MetricDef::new(3, "byteDepth", U64, "Current number of bytes on queues in broker"),
    MetricDef::new(4, "byteFtdDepth", U64, "Current number of bytes flowed-to-disk"),
    MetricDef::new(5, "byteFtdDequeues", U64, "Total bytes dequeued from the broker having been flowed-to-disk"),
    MetricDef::new(6, "byteFtdEnqueues", U64, "Total bytes released from memory and flowed-to-disk on broker"),
    MetricDef::new(7, "bytePersistDequeues", U64, "Total persistent bytes dequeued from broker"),
    MetricDef::new(8, "bytePersistEnqueues", U64, "Total persistent bytes enqueued to broker"),
    MetricDef::new(9, "byteTotalDequeues", U64, "Total bytes dequeued from broker"),
    MetricDef::new(10, "byteTotalEnqueues", U64, "Total bytes enqueued to broker"),
    MetricDef::new(11, "byteTxnDequeues", U64, "Total transactional bytes dequeued from broker"),
    MetricDef::new(12, "byteTxnEnqueues", U64, "Total transactional bytes enqueued to broker"),
    MetricDef::new(13, "discardsLvq", U64, "Messages discarded due to LVQ insert"),
    MetricDef::new(14, "discardsNoRoute", U64, "Messages discarded due to no-route from exchange"),
    MetricDef::new(15, "discardsOverflow", U64, "Messages discarded due to reject-policy overflow"),
    MetricDef::new(16, "discardsPurge", U64, "Messages discarded due to management purge"),
    MetricDef::new(17, "discardsRing", U64, "Messages discarded due to ring-queue overflow"),
    MetricDef::new(18, "discardsSubscriber", U64, "Messages discarded due to subscriber reject"),
    MetricDef::new(19, "discardsTtl", U64, "Messages discarded due to TTL expiration"),
    MetricDef::new(20, "msgDepth", U64, "Current number of messages on queues in broker"),
    MetricDef::new(21, "msgFtdDepth", U64, "Current number of messages flowed-to-disk"),
    MetricDef::new(22, "msgFtdDequeues", U64, "Total message bodies dequeued from the broker having been flowed-to-disk"),
    MetricDef::new(23, "msgFtdEnqueues", U64, "Total message bodies released from memory and flowed-to-disk on broker"),
    MetricDef::new(24, "msgPersistDequeues", U64, "Total persistent messages dequeued from broker"),
    MetricDef::new(25, "msgPersistEnqueues", U64, "Total persistent messages enqueued to broker"),
    MetricDef::new(26, "msgTotalDequeues", U64, "Total messages dequeued from broker"),
    MetricDef::new(27, "msgTotalEnqueues", U64, "Total messages enqueued to broker"),
    MetricDef::new(28, "msgTxnDequeues", U64, "Total transactional messages dequeued from broker"),
    MetricDef::new(29, "msgTxnEnqueues", U64, "Total transactional messages enqueued to broker"),
    MetricDef::new(30, "queueCount", U64, "Number of queues in the broker"),
    MetricDef::new(31, "releases", U64, "Acquired messages reinserted into the queue"),
    MetricDef::new(32, "reroutes", U64, "Messages dequeued to management re-route"),
    MetricDef::new(33, "uptime", U64, "Total time the broker has been running"),
];

// org.apache.qpid.broker::queue::properties
pub const QUEUE_PROPERTIES: &[MetricDef] = &[
    MetricDef::new(0, "altExchange", Text, ""),
    MetricDef::new(1, "arguments", Text, "Arguments supplied in queue.declare"),
    MetricDef::new(2, "autoDelete", Text, ""),
    MetricDef::new(3, "durable", Text, ""),
    MetricDef::new(4, "exclusive", Text, ""),
    MetricDef::new(5, "name", Text, ""),
    MetricDef::new(6, "vhostRef", Text, ""),
];

// org.apache.qpid.broker::queue::statistics
pub const QUEUE_STATISTICS: &[MetricDef] = &[
    MetricDef::new(0, "acquires", U64, "Messages acquired from the queue"),
    MetricDef::new(1, "bindingCountHigh", U32, "Current bindings (High)"),
    MetricDef::new(2, "bindingCountLow", U32, "Current bindings (Low)"),
    MetricDef::new(3, "bindingCount", U32, "Current bindings"),
    MetricDef::new(4, "byteDepth", U64, "Current size of queue in bytes"),
    MetricDef::new(5, "byteFtdDepth", U64, "Current number of bytes flowed-to-disk"),
    MetricDef::new(6, "byteFtdDequeues", U64, "Total bytes dequeued from the broker having been flowed-to-disk"),
    MetricDef::new(7, "byteFtdEnqueues", U64, "Total bytes released from memory and flowed-to-disk on broker"),
    MetricDef::new(8, "bytePersistDequeues", U64, "Persistent messages dequeued"),
    MetricDef::new(9, "bytePersistEnqueues", U64, "Persistent messages enqueued"),
    MetricDef::new(10, "byteTotalDequeues", U64, "Total messages dequeued"),
    MetricDef::new(11, "byteTotalEnqueues", U64, "Total messages enqueued"),
    MetricDef::new(12, "byteTxnDequeues", U64, "Transactional messages dequeued"),
    MetricDef::new(13, "byteTxnEnqueues", U64, "Transactional messages enqueued"),
    MetricDef::new(14, "consumerCountHigh", U32, "Current consumers on queue (High)"),
    MetricDef::new(15, "consumerCountLow", U32, "Current consumers on queue (Low)"),
    MetricDef::new(16, "consumerCount", U32, "Current consumers on queue"),
    MetricDef::new(17, "discardsLvq", U64, "Messages discarded due to LVQ insert"),
    MetricDef::new(18, "discardsOverflow", U64, "Messages discarded due to reject-policy overflow"),
    MetricDef::new(19, "discardsPurge", U64, "Messages discarded due to management purge"),
    MetricDef::new(20, "discardsRing", U64, "Messages discarded due to ring-queue overflow"),
    MetricDef::new(21, "discardsSubscriber", U64, "Messages discarded due to subscriber reject"),
    MetricDef::new(22, "discardsTtl", U64, "Messages discarded due to TTL expiration"),
    MetricDef::new(23, "flowStopped", Text, "Flow control active."),
    MetricDef::new(24, "flowStoppedCount", U32, "Number of times flow control was activated for this queue"),
    MetricDef::new(25, "messageLatencyAverage", U64, "Broker latency through this queue (Average)"),
    MetricDef::new(26, "messageLatencyMax", U64, "Broker latency through this queue (Max)"),
    MetricDef::new(27, "messageLatencyMin", U64, "Broker latency through this queue (Min)"),
    MetricDef::new(28, "messageLatencySamples", U64, "Broker latency through this queue (Samples)"),
    MetricDef::new(29, "msgDepth", U64, "Current size of queue in messages"),
    MetricDef::new(30, "msgFtdDepth", U64, "Current number of messages flowed-to-disk"),
    MetricDef::new(31, "msgFtdDequeues", U64, "Total message bodies dequeued from the broker having been flowed-to-disk"),
    MetricDef::new(32, "msgFtdEnqueues", U64, "Total message bodies released from memory and flowed-to-disk on broker"),
    MetricDef::new(33, "msgPersistDequeues", U64, "Persistent messages dequeued"),
    MetricDef::new(34, "msgPersistEnqueues", U64, "Persistent messages enqueued"),
    MetricDef::new(35, "msgTotalDequeues", U64, "Total messages dequeued"),
    MetricDef::new(36, "msgTotalEnqueues", U64, "Total messages enqueued"),
    MetricDef::new(37, "msgTxnDequeues", U64, "Transactional messages dequeued"),
    MetricDef::new(38, "msgTxnEnqueues", U64, "Transactional messages enqueued"),
    MetricDef::new(39, "releases", U64, "Acquired messages reinserted into the queue"),
    MetricDef::new(40, "reroutes", U64, "Messages dequeued to management re-route"),
    MetricDef::new(41, "unackedMessagesHigh", U32, "Messages consumed but not yet acked (High)"),
    MetricDef::new(42, "unackedMessagesLow", U32, "Messages consumed but not yet acked (Low)"),
    MetricDef::new(43, "unackedMessages", U32, "Messages consumed but not yet acked"),
];

// org.apache.qpid.broker::system::properties
pub const SYSTEM_PROPERTIES: &[MetricDef] = &[
    MetricDef::new(0, "osName", Text, "Operating system name"),
    MetricDef::new(1, "nodeName", Text, "Node name"),
    MetricDef::new(2, "machine", Text, ""),
    MetricDef::new(3, "release", Text, "System release"),
    MetricDef::new(4, "version", Text, "System version"),
    MetricDef::new(5, "systemId", Text, "System UUID"),
];

/// All descriptors for one metric cluster, or `None` for an unknown cluster.
pub fn cluster_table(cluster: u32) -> Option<&'static [MetricDef]> {
    match cluster {
        0 => Some(BROKER_PROPERTIES),
        1 => Some(BROKER_STATISTICS),
        2 => Some(QUEUE_PROPERTIES),
        3 => Some(QUEUE_STATISTICS),
        4 => Some(SYSTEM_PROPERTIES),
        _ => None,
    }
}

/// Look up one metric descriptor by `(cluster, item)`.
pub fn metric(cluster: u32, item: u32) -> Option<&'static MetricDef> {
    cluster_table(cluster)?.get(item as usize)
}

/// Whether a cluster reads from the properties stream (even) or the
/// statistics stream (odd).
pub fn reads_properties(cluster: u32) -> bool {
    cluster % 2 == 0
}
