use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// Identity of one QMF management object, assigned by the broker when the
/// object is first advertised and stable across the object's lifetime.
///
/// The console only ever stores and compares identities; it never mints one
/// itself. The five fields mirror the QMF v1 object-id layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct ObjectIdentity {
    pub flags: u8,
    pub sequence: u16,
    pub broker_bank: u32,
    pub agent_bank: u32,
    pub object_num: u64,
}

impl ObjectIdentity {
    pub fn new(
        flags: u8,
        sequence: u16,
        broker_bank: u32,
        agent_bank: u32,
        object_num: u64,
    ) -> Self {
        ObjectIdentity {
            flags,
            sequence,
            broker_bank,
            agent_bank,
            object_num,
        }
    }
}

impl Display for ObjectIdentity {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        // Canonical dash-separated form, used for logging and diagnostics.
        write!(
            f,
            "{}-{}-{}-{}-{}",
            self.flags, self.sequence, self.broker_bank, self.agent_bank, self.object_num
        )
    }
}
