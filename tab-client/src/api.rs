//! Table endpoints of the restaurant backend
//!
//! Every call is scoped to one table:
//! `restaurants/{id}/branches/{b}/tables/{t}/...`. Responses arrive in the
//! `{code, message, data}` envelope.

use shared::{ApiResponse, AppError, ErrorCode};
use shared::models::{
    AccessCheck, ActiveUser, PayDishesRequest, PayRequest, PaySplitRequest, PaymentReceipt,
    RecordTransactionRequest, SplitBillRequest, SplitStatus, TableOrders, TableRef,
};

use crate::http::{HttpClient, envelope_data, required_data};
use crate::{ClientError, ClientResult};

/// Typed access to the table endpoints
#[derive(Debug, Clone)]
pub struct TableApi<C> {
    http: C,
}

impl<C: HttpClient> TableApi<C> {
    pub fn new(http: C) -> Self {
        Self { http }
    }

    pub fn http(&self) -> &C {
        &self.http
    }

    fn endpoint(table: &TableRef, name: &str) -> ClientResult<String> {
        if !table.is_resolved() {
            return Err(ClientError::App(AppError::new(ErrorCode::TableUnresolved)));
        }
        Ok(table.endpoint(name))
    }

    // ========== Reads ==========

    /// Validate the guest session against this table
    ///
    /// A `valid: false` answer is returned as a `TableAccessDenied` error.
    pub async fn access(&self, table: &TableRef) -> ClientResult<AccessCheck> {
        let path = Self::endpoint(table, "access")?;
        let check = required_data(
            self.http.get::<ApiResponse<AccessCheck>>(&path).await?,
            "access",
        )?;
        if !check.valid {
            let reason = check
                .reason
                .unwrap_or_else(|| "Access to this table was denied".to_string());
            return Err(ClientError::App(AppError::access_denied(reason)));
        }
        Ok(check)
    }

    pub async fn orders(&self, table: &TableRef) -> ClientResult<TableOrders> {
        let path = Self::endpoint(table, "orders")?;
        let orders = self.http.get::<ApiResponse<TableOrders>>(&path).await?;
        Ok(envelope_data(orders)?.unwrap_or_default())
    }

    pub async fn active_users(&self, table: &TableRef) -> ClientResult<Vec<ActiveUser>> {
        let path = Self::endpoint(table, "active-users")?;
        let users = self.http.get::<ApiResponse<Vec<ActiveUser>>>(&path).await?;
        Ok(envelope_data(users)?.unwrap_or_default())
    }

    /// Current split status; `None` when no split is active
    pub async fn split_status(&self, table: &TableRef) -> ClientResult<Option<SplitStatus>> {
        let path = Self::endpoint(table, "split-status")?;
        let status = envelope_data(self.http.get::<ApiResponse<SplitStatus>>(&path).await?)?;
        Ok(status.filter(|s| s.is_active))
    }

    // ========== Writes ==========

    pub async fn split_bill(
        &self,
        table: &TableRef,
        request: &SplitBillRequest,
    ) -> ClientResult<Option<SplitStatus>> {
        let path = Self::endpoint(table, "split-bill")?;
        tracing::info!(
            table = %table.table_number,
            people = request.number_of_people,
            "Starting equal split"
        );
        envelope_data(
            self.http
                .post::<ApiResponse<SplitStatus>, _>(&path, request)
                .await?,
        )
    }

    pub async fn pay_split(
        &self,
        table: &TableRef,
        request: &PaySplitRequest,
    ) -> ClientResult<PaymentReceipt> {
        let path = Self::endpoint(table, "pay-split")?;
        self.receipt(&path, request).await
    }

    pub async fn pay(
        &self,
        table: &TableRef,
        request: &PayRequest,
    ) -> ClientResult<PaymentReceipt> {
        let path = Self::endpoint(table, "pay")?;
        self.receipt(&path, request).await
    }

    pub async fn pay_dishes(
        &self,
        table: &TableRef,
        request: &PayDishesRequest,
    ) -> ClientResult<PaymentReceipt> {
        let path = Self::endpoint(table, "dishes/pay")?;
        self.receipt(&path, request).await
    }

    pub async fn record_transaction(
        &self,
        table: &TableRef,
        request: &RecordTransactionRequest,
    ) -> ClientResult<PaymentReceipt> {
        let path = Self::endpoint(table, "transactions")?;
        self.receipt(&path, request).await
    }

    async fn receipt<B: serde::Serialize + Sync>(
        &self,
        path: &str,
        body: &B,
    ) -> ClientResult<PaymentReceipt> {
        let receipt = envelope_data(
            self.http
                .post::<ApiResponse<PaymentReceipt>, _>(path, body)
                .await?,
        )?
        .unwrap_or_default();
        tracing::info!(
            %path,
            transaction_id = receipt.transaction_id.as_deref().unwrap_or("-"),
            status = %receipt.status,
            "Payment request accepted"
        );
        Ok(receipt)
    }
}
