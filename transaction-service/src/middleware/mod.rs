pub mod oauth;

pub use oauth::{require_transaction_scope, GrantedScope};
