use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::borrow::Cow;

/// Zero-based insertion index into the store.
pub type TransactionId = u64;

const UNKNOWN: &str = "Unknown";

/// A recorded purchase. Immutable once stored.
///
/// Fields hold whatever JSON the caller sent; only their presence is
/// checked.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq)]
pub struct Transaction {
    pub currency: Value,
    pub amount: Value,
    pub product: Value,
}

impl Transaction {
    pub fn new(
        currency: impl Into<Value>,
        amount: impl Into<Value>,
        product: impl Into<Value>,
    ) -> Self {
        Self {
            currency: currency.into(),
            amount: amount.into(),
            product: product.into(),
        }
    }

    /// Returned for any lookup outside the stored range.
    pub fn placeholder() -> Self {
        Self::new(UNKNOWN, 0, UNKNOWN)
    }

    pub fn purchase_confirmation(&self) -> String {
        format!(
            "Thank you for purchasing a {} for {} {}",
            plain_text(&self.product),
            plain_text(&self.amount),
            plain_text(&self.currency)
        )
    }
}

/// Text form of a field: strings unquoted, numbers as written, the
/// remaining scalars spelled `True`/`False`/`None`.
fn plain_text(value: &Value) -> Cow<'_, str> {
    match value {
        Value::String(s) => Cow::Borrowed(s),
        Value::Bool(true) => Cow::Borrowed("True"),
        Value::Bool(false) => Cow::Borrowed("False"),
        Value::Null => Cow::Borrowed("None"),
        other => Cow::Owned(other.to_string()),
    }
}
