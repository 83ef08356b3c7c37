//! Checkout flow
//!
//! `begin` turns a guest's payment action into the tip selection URL. The
//! action is guarded against the current allocation first and a refused
//! action never reaches the network. The submit helpers post the actual
//! payment requests while holding the session's `submitting` flag.

use std::future::Future;

use reqwest::Url;
use shared::bill::guard;
use shared::models::{
    PayDishesRequest, PayRequest, PaySplitRequest, PaymentReceipt, RecordTransactionRequest,
    SplitBillRequest, TableRef,
};
use shared::{
    AppError, ApplyOutcome, BillAllocation, ErrorCode, GuardViolation, PaymentIntent, PaymentMode,
    SessionAction, TableSession, TipHandoff,
};
use thiserror::Error;

use crate::api::TableApi;
use crate::http::HttpClient;
use crate::{ClientConfig, ClientError, ClientResult};

/// Checkout errors
#[derive(Debug, Error)]
pub enum CheckoutError {
    /// Table unresolved, not loaded or access not granted
    #[error("The table is not ready for payment")]
    NotReady,

    #[error("Missing guest identity: {0}")]
    MissingIdentity(&'static str),

    /// Refused locally, nothing was sent
    #[error("{0}")]
    Refused(GuardViolation),

    #[error("A payment is already being submitted")]
    InProgress,

    #[error(transparent)]
    Client(#[from] ClientError),
}

impl CheckoutError {
    pub fn code(&self) -> ErrorCode {
        match self {
            Self::NotReady => ErrorCode::TableUnresolved,
            Self::MissingIdentity(_) => ErrorCode::NotAuthenticated,
            Self::Refused(v) => v.code,
            Self::InProgress => ErrorCode::PaymentInProgress,
            Self::Client(e) => e.code(),
        }
    }
}

impl From<CheckoutError> for AppError {
    fn from(err: CheckoutError) -> Self {
        match err {
            CheckoutError::Refused(v) => v.into(),
            CheckoutError::Client(e) => e.into(),
            other => AppError::with_message(other.code(), other.to_string()),
        }
    }
}

/// A started checkout: the hand-off and where to send the guest
#[derive(Debug, Clone, PartialEq)]
pub struct Checkout {
    pub handoff: TipHandoff,
    pub url: Url,
}

/// Drives payment actions for one table session
#[derive(Debug, Clone)]
pub struct CheckoutService<C> {
    api: TableApi<C>,
    tip_url: Url,
}

impl<C: HttpClient> CheckoutService<C> {
    pub fn new(api: TableApi<C>, config: &ClientConfig) -> ClientResult<Self> {
        let tip_url = Url::parse(&config.tip_url)
            .map_err(|e| ClientError::Config(format!("tip_url '{}': {}", config.tip_url, e)))?;
        Ok(Self { api, tip_url })
    }

    pub fn api(&self) -> &TableApi<C> {
        &self.api
    }

    /// Tip selection URL carrying the hand-off parameters
    pub fn tip_url(&self, handoff: &TipHandoff) -> Url {
        let mut url = self.tip_url.clone();
        url.query_pairs_mut().extend_pairs(handoff.query_pairs());
        url
    }

    /// Start a payment action
    ///
    /// For equal shares the split is opened on the backend first, unless one
    /// is already active.
    pub async fn begin(
        &self,
        session: &mut TableSession,
        intent: &PaymentIntent,
    ) -> Result<Checkout, CheckoutError> {
        let (table, allocation) = ready(session)?;
        let user_name = session
            .guest_name()
            .ok_or(CheckoutError::MissingIdentity("guest name"))?
            .to_string();

        let handoff =
            guard(intent, &allocation, &user_name).map_err(|v| refuse(session, v))?;

        if handoff.mode == PaymentMode::EqualShares && !split_active(session) {
            self.open_split(session, &table, &allocation).await?;
        }

        let url = self.tip_url(&handoff);
        tracing::info!(
            mode = %handoff.mode,
            amount = handoff.amount,
            "Handing off to tip selection"
        );
        Ok(Checkout { handoff, url })
    }

    /// Pay a custom amount
    pub async fn pay_amount(
        &self,
        session: &mut TableSession,
        amount: f64,
        payment_method_id: &str,
    ) -> Result<PaymentReceipt, CheckoutError> {
        let (table, allocation) = ready(session)?;
        let (guest_name, user_id) = identity(session)?;
        let intent = PaymentIntent::ChooseAmount { amount };
        let handoff = guard(&intent, &allocation, &guest_name).map_err(|v| refuse(session, v))?;
        let request = PayRequest {
            amount: handoff.amount,
            user_id,
            guest_name,
            payment_method_id: payment_method_id.to_string(),
        };
        self.submit(session, self.api.pay(&table, &request)).await
    }

    /// Pay this guest's share of the active split
    pub async fn pay_split(
        &self,
        session: &mut TableSession,
        payment_method_id: &str,
    ) -> Result<PaymentReceipt, CheckoutError> {
        let (table, _) = ready(session)?;
        let (guest_name, user_id) = identity(session)?;
        if !split_active(session) {
            let violation = GuardViolation::new(
                PaymentMode::EqualShares,
                ErrorCode::SplitNotActive,
                ErrorCode::SplitNotActive.message(),
            );
            return Err(refuse(session, violation));
        }
        let request = PaySplitRequest {
            user_id,
            guest_name,
            payment_method_id: payment_method_id.to_string(),
        };
        self.submit(session, self.api.pay_split(&table, &request))
            .await
    }

    /// Pay specific dish orders
    pub async fn pay_dishes(
        &self,
        session: &mut TableSession,
        dish_order_ids: &[String],
        payment_method_id: &str,
    ) -> Result<PaymentReceipt, CheckoutError> {
        let (table, allocation) = ready(session)?;
        let (guest_name, user_id) = identity(session)?;
        let intent = PaymentIntent::SelectItems {
            dish_order_ids: dish_order_ids.to_vec(),
        };
        let handoff = guard(&intent, &allocation, &guest_name).map_err(|v| refuse(session, v))?;
        let request = PayDishesRequest {
            dish_order_ids: handoff.dish_order_ids,
            user_id,
            guest_name,
            payment_method_id: payment_method_id.to_string(),
        };
        self.submit(session, self.api.pay_dishes(&table, &request))
            .await
    }

    /// Record a completed transaction, tip included
    pub async fn record_transaction(
        &self,
        session: &mut TableSession,
        handoff: &TipHandoff,
        tip_amount: f64,
        payment_method_id: &str,
    ) -> Result<PaymentReceipt, CheckoutError> {
        let (table, _) = ready(session)?;
        let request = RecordTransactionRequest {
            amount: handoff.amount,
            tip_amount: tip_amount.max(0.0),
            mode: handoff.mode.as_str().to_string(),
            guest_name: handoff.user_name.clone(),
            user_id: session.user_id().map(str::to_string),
            payment_method_id: payment_method_id.to_string(),
            dish_order_ids: handoff.dish_order_ids.clone(),
        };
        self.submit(session, self.api.record_transaction(&table, &request))
            .await
    }

    /// Open the split on the backend and record it in the session
    ///
    /// A split opened concurrently by another guest counts as opened. When
    /// the backend does not echo the split back it is read again.
    async fn open_split(
        &self,
        session: &mut TableSession,
        table: &TableRef,
        allocation: &BillAllocation,
    ) -> Result<(), CheckoutError> {
        let request = split_request(allocation);
        let opened = async {
            match self.api.split_bill(table, &request).await {
                Err(e) if e.code() == ErrorCode::SplitAlreadyActive => {
                    tracing::info!("Split already active on the backend");
                    Ok(None)
                }
                other => other,
            }
        };
        let mut status = self.submit(session, opened).await?.filter(|s| s.is_active);

        if status.is_none() {
            status = match self.api.split_status(table).await {
                Ok(status) => status,
                Err(e) => {
                    tracing::warn!(error = %e, "Split status unavailable after opening split");
                    None
                }
            };
        }
        session.apply(SessionAction::SplitStatusLoaded {
            generation: session.generation(),
            status,
        });
        Ok(())
    }

    /// Run one write with the `submitting` flag held
    ///
    /// The flag is reset whatever the outcome; failures become the alert.
    async fn submit<T, F>(&self, session: &mut TableSession, request: F) -> Result<T, CheckoutError>
    where
        F: Future<Output = ClientResult<T>>,
    {
        if session.apply(SessionAction::SubmitStarted) != ApplyOutcome::Applied {
            session.apply(SessionAction::Alert(
                ErrorCode::PaymentInProgress.message().to_string(),
            ));
            return Err(CheckoutError::InProgress);
        }
        match request.await {
            Ok(value) => {
                session.apply(SessionAction::SubmitFinished { error: None });
                Ok(value)
            }
            Err(e) => {
                tracing::error!(error = %e, "Payment request failed");
                session.apply(SessionAction::SubmitFinished {
                    error: Some(user_message(&e)),
                });
                Err(e.into())
            }
        }
    }
}

/// Show the refusal to the guest
fn refuse(session: &mut TableSession, violation: GuardViolation) -> CheckoutError {
    tracing::info!(
        mode = %violation.mode,
        code = %violation.code,
        "Payment action refused"
    );
    session.apply(SessionAction::Alert(violation.message.clone()));
    CheckoutError::Refused(violation)
}

fn split_active(session: &TableSession) -> bool {
    session.data().split.as_ref().is_some_and(|s| s.is_active)
}

fn ready(session: &TableSession) -> Result<(TableRef, BillAllocation), CheckoutError> {
    let table = session.table().cloned().ok_or(CheckoutError::NotReady)?;
    let allocation = session.allocation().ok_or(CheckoutError::NotReady)?;
    Ok((table, allocation))
}

fn identity(session: &TableSession) -> Result<(String, String), CheckoutError> {
    let guest_name = session
        .guest_name()
        .ok_or(CheckoutError::MissingIdentity("guest name"))?;
    let user_id = session
        .user_id()
        .ok_or(CheckoutError::MissingIdentity("user id"))?;
    Ok((guest_name.to_string(), user_id.to_string()))
}

fn split_request(allocation: &BillAllocation) -> SplitBillRequest {
    SplitBillRequest {
        number_of_people: u32::try_from(allocation.split_eligible_guests.len()).unwrap_or(u32::MAX),
        user_ids: None,
        guest_names: Some(allocation.split_eligible_guests.clone()),
    }
}

/// Message shown to the guest for a failed write
fn user_message(err: &ClientError) -> String {
    match err {
        ClientError::Api { message, .. } if !message.is_empty() => message.clone(),
        other => other.code().message().to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::bill::AllocationInput;
    use shared::models::DishOrder;

    #[test]
    fn test_split_request_lists_eligible_guests() {
        let orders = vec![
            DishOrder::new("d1", "Ana", 10.0),
            DishOrder::new("d2", "Ben", 5.0),
            DishOrder::new("d3", "Ana", 2.0),
        ];
        let allocation = BillAllocation::compute(&AllocationInput::new(&orders));
        let request = split_request(&allocation);
        assert_eq!(request.number_of_people, 2);
        assert_eq!(
            request.guest_names,
            Some(vec!["Ana".to_string(), "Ben".to_string()])
        );
    }

    #[test]
    fn test_user_message_prefers_backend_text() {
        let err = ClientError::Api {
            code: 5001,
            message: "Card declined".into(),
            details: None,
        };
        assert_eq!(user_message(&err), "Card declined");
        assert_eq!(
            user_message(&ClientError::InvalidResponse("stack trace".into())),
            ErrorCode::InternalError.message()
        );
    }

    #[test]
    fn test_checkout_error_codes() {
        assert_eq!(CheckoutError::InProgress.code(), ErrorCode::PaymentInProgress);
        assert_eq!(CheckoutError::NotReady.code(), ErrorCode::TableUnresolved);

        let refused = CheckoutError::Refused(GuardViolation::new(
            PaymentMode::ChooseAmount,
            ErrorCode::PaymentAmountInvalid,
            "Please enter an amount greater than zero",
        ));
        let app: AppError = refused.into();
        assert_eq!(app.code, ErrorCode::PaymentAmountInvalid);
        assert_eq!(app.details.unwrap()["mode"], "choose-amount");
    }
}
