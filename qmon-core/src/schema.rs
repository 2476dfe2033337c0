use serde::{Deserialize, Serialize};
use std::fmt::{self, Display, Formatter};

/// The QMF package every broker-side management class we model lives in.
const BROKER_PACKAGE: &str = "org.apache.qpid.broker";

/// Schema key of a QMF management class: package name plus class name.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct SchemaKey {
    pub package: String,
    pub class: String,
}

impl SchemaKey {
    pub fn new(package: impl Into<String>, class: impl Into<String>) -> Self {
        SchemaKey {
            package: package.into(),
            class: class.into(),
        }
    }

    /// Classify the management class this key names.
    ///
    /// The console only models brokers, queues and host systems; everything
    /// else the broker advertises classifies as `Other` and is ignored.
    pub fn object_class(&self) -> ObjectClass {
        if self.package == BROKER_PACKAGE {
            match self.class.as_str() {
                "broker" => return ObjectClass::Broker,
                "queue" => return ObjectClass::Queue,
                "system" => return ObjectClass::System,
                _ => {}
            }
        }
        ObjectClass::Other
    }
}

impl Display for SchemaKey {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.package, self.class)
    }
}

/// Classification of a management object, derived from its schema key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ObjectClass {
    Broker,
    Queue,
    System,
    /// Any class the console does not model.
    Other,
}

impl Display for ObjectClass {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        match self {
            ObjectClass::Broker => write!(f, "broker"),
            ObjectClass::Queue => write!(f, "queue"),
            ObjectClass::System => write!(f, "system"),
            ObjectClass::Other => write!(f, "other"),
        }
    }
}
