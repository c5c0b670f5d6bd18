pub mod introspection;
pub mod metrics;
pub mod scope;
pub mod store;

pub use introspection::{HttpIntrospector, IntrospectedToken, IntrospectionError, TokenIntrospector};
pub use self::metrics::{get_metrics, init_metrics};
pub use store::TransactionStore;
