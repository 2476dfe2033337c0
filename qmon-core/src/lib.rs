pub mod identity;
pub mod schema;
pub mod snapshot;
pub mod value;

pub use identity::ObjectIdentity;
pub use schema::{ObjectClass, SchemaKey};
pub use snapshot::ObjectSnapshot;
pub use value::{AttributeValue, CoercionError};
