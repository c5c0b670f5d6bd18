//! Create, lookup and scope-protected read of recorded purchases.

use axum::{
    extract::{Path, Query, State},
    Json,
};
use service_core::error::AppError;

use crate::{
    dtos::{CreateTransactionRequest, CreateTransactionResponse, LookupQuery},
    error::TransactionError,
    middleware::GrantedScope,
    models::{Transaction, TransactionId},
    services::{metrics, scope},
    AppState,
};

/// Record a purchase and return its sequential id.
pub async fn create_transaction(
    State(state): State<AppState>,
    Json(payload): Json<CreateTransactionRequest>,
) -> Result<Json<CreateTransactionResponse>, AppError> {
    let Transaction {
        currency,
        amount,
        product,
    } = Transaction::try_from(payload)?;

    tracing::info!(%currency, %amount, %product, "Creating transaction");

    let transaction_id = state.store.create(currency, amount, product).await;
    metrics::record_transaction_created();

    tracing::debug!(transaction_id, "Transaction stored");

    Ok(Json(CreateTransactionResponse { transaction_id }))
}

/// Unauthenticated lookup; unknown ids yield the placeholder record.
pub async fn lookup_transaction(
    State(state): State<AppState>,
    Query(query): Query<LookupQuery>,
) -> Json<Transaction> {
    let transaction_id = query.transaction_id();
    tracing::debug!(transaction_id, "Looking up transaction");

    Json(state.store.lookup(transaction_id).await)
}

/// Read guarded by an introspected `transactionId<n>` grant for exactly
/// this id.
pub async fn read_transaction(
    State(state): State<AppState>,
    Path(transaction_id): Path<TransactionId>,
    GrantedScope(granted): GrantedScope,
) -> Result<String, AppError> {
    let authorized = scope::authorize(&granted, i128::from(transaction_id)).map_err(|e| {
        tracing::error!(transaction_id, error = %e, "Malformed transaction scope from introspection");
        metrics::record_protected_read("malformed_scope");
        TransactionError::from(e)
    })?;

    if !authorized {
        tracing::warn!(transaction_id, granted_scopes = %granted, "Scope does not grant transaction");
        metrics::record_protected_read("denied");
        return Err(TransactionError::Unauthorized.into());
    }

    metrics::record_protected_read("granted");
    // Ids past i64::MAX are beyond any stored index.
    let index = i64::try_from(transaction_id).unwrap_or(i64::MAX);
    let transaction = state.store.lookup(index).await;

    Ok(transaction.purchase_confirmation())
}
