use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::num::IntErrorKind;

use crate::error::TransactionError;
use crate::models::{Transaction, TransactionId};

/// Create body. Every field is required; absence is reported by name and
/// values of any JSON type are accepted.
#[derive(Debug, Deserialize)]
#[serde(transparent)]
pub struct CreateTransactionRequest(Map<String, Value>);

impl CreateTransactionRequest {
    fn take(&mut self, field: &'static str) -> Result<Value, TransactionError> {
        self.0
            .remove(field)
            .ok_or(TransactionError::MissingField(field))
    }
}

impl TryFrom<CreateTransactionRequest> for Transaction {
    type Error = TransactionError;

    fn try_from(mut req: CreateTransactionRequest) -> Result<Self, Self::Error> {
        let currency = req.take("currency")?;
        let amount = req.take("amount")?;
        let product = req.take("product")?;

        Ok(Transaction::new(currency, amount, product))
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct CreateTransactionResponse {
    #[serde(rename = "transactionId")]
    pub transaction_id: TransactionId,
}

/// `?transactionId=` for the unauthenticated lookup.
#[derive(Debug, Deserialize)]
pub struct LookupQuery {
    #[serde(rename = "transactionId")]
    pub transaction_id: Option<String>,
}

impl LookupQuery {
    /// Requested id. Absent or non-integer values fall back to `0`; integers
    /// beyond `i64` saturate so they stay out of range.
    pub fn transaction_id(&self) -> i64 {
        let Some(raw) = self.transaction_id.as_deref() else {
            return 0;
        };

        match raw.trim().parse::<i64>() {
            Ok(id) => id,
            Err(e) => match e.kind() {
                IntErrorKind::PosOverflow => i64::MAX,
                IntErrorKind::NegOverflow => i64::MIN,
                _ => 0,
            },
        }
    }
}
