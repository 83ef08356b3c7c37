//! Table loading sequence
//!
//! Access is validated first. Only a granted table goes on to read, strictly
//! one after another: orders, then active users, then split status. A failed
//! read is logged and treated as empty so the page still renders; an access
//! failure is final.
//!
//! Fetching and applying are split so a slow load can be fenced: results are
//! tagged with the generation they were started under and a newer reload
//! makes them stale.

use shared::models::{AccessCheck, TableOrders, TableRef};
use shared::{AppError, ApplyOutcome, Generation, SessionAction, TableSession};
use thiserror::Error;

use crate::api::TableApi;
use crate::http::HttpClient;

/// Loader errors
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("No table selected")]
    NoTable,

    /// Terminal; the session is in its error state
    #[error("Table access denied: {0}")]
    Access(AppError),

    /// A newer load started while this one was in flight
    #[error("Load of generation {0} superseded")]
    Superseded(u64),
}

/// Which read fell back to empty
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TableRead {
    Orders,
    ActiveUsers,
    SplitStatus,
}

impl TableRead {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Orders => "orders",
            Self::ActiveUsers => "active-users",
            Self::SplitStatus => "split-status",
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct DegradedRead {
    pub read: TableRead,
    pub error: String,
}

/// Everything fetched for one generation, not yet applied
#[derive(Debug, Clone)]
pub struct TableSnapshot {
    pub generation: Generation,
    pub access: Result<AccessCheck, AppError>,
    pub actions: Vec<SessionAction>,
    pub degraded: Vec<DegradedRead>,
}

/// Result of a completed load
#[derive(Debug, Clone, PartialEq)]
pub struct LoadReport {
    pub generation: Generation,
    pub degraded: Vec<DegradedRead>,
}

impl LoadReport {
    pub fn is_complete(&self) -> bool {
        self.degraded.is_empty()
    }
}

impl TableSnapshot {
    /// Apply to the session
    ///
    /// Fails with [`LoadError::Superseded`] when the session has moved on to
    /// a newer generation; nothing is applied in that case.
    pub fn apply_to(self, session: &mut TableSession) -> Result<LoadReport, LoadError> {
        let generation = self.generation;
        let check = match self.access {
            Ok(check) => check,
            Err(error) => {
                return match session.apply(SessionAction::AccessDenied {
                    generation,
                    error: error.clone(),
                }) {
                    ApplyOutcome::Stale => Err(LoadError::Superseded(generation.0)),
                    _ => Err(LoadError::Access(error)),
                };
            }
        };

        if session.apply(SessionAction::AccessGranted { generation }) != ApplyOutcome::Applied {
            return Err(LoadError::Superseded(generation.0));
        }
        if session.guest_name().is_none()
            && let Some(guest_name) = check.guest_name
        {
            session.apply(SessionAction::GuestIdentified {
                guest_name,
                user_id: None,
            });
        }
        for action in self.actions {
            if session.apply(action) == ApplyOutcome::Stale {
                return Err(LoadError::Superseded(generation.0));
            }
        }

        Ok(LoadReport {
            generation,
            degraded: self.degraded,
        })
    }
}

/// Runs the loading sequence against the backend
#[derive(Debug, Clone)]
pub struct TableLoader<C> {
    api: TableApi<C>,
}

impl<C: HttpClient> TableLoader<C> {
    pub fn new(api: TableApi<C>) -> Self {
        Self { api }
    }

    pub fn api(&self) -> &TableApi<C> {
        &self.api
    }

    /// Fetch the table under `generation`
    pub async fn fetch(&self, table: &TableRef, generation: Generation) -> TableSnapshot {
        let access = match self.api.access(table).await {
            Ok(check) => check,
            Err(e) => {
                tracing::error!(
                    table = %table.path(),
                    error = %e,
                    "Table access validation failed"
                );
                return TableSnapshot {
                    generation,
                    access: Err(e.into()),
                    actions: Vec::new(),
                    degraded: Vec::new(),
                };
            }
        };

        let mut actions = Vec::with_capacity(3);
        let mut degraded = Vec::new();

        let orders = match self.api.orders(table).await {
            Ok(orders) => orders,
            Err(e) => {
                Self::degrade(&mut degraded, TableRead::Orders, &e);
                TableOrders::default()
            }
        };
        actions.push(SessionAction::OrdersLoaded { generation, orders });

        let users = match self.api.active_users(table).await {
            Ok(users) => users,
            Err(e) => {
                Self::degrade(&mut degraded, TableRead::ActiveUsers, &e);
                Vec::new()
            }
        };
        actions.push(SessionAction::ActiveUsersLoaded { generation, users });

        let status = match self.api.split_status(table).await {
            Ok(status) => status,
            Err(e) => {
                Self::degrade(&mut degraded, TableRead::SplitStatus, &e);
                None
            }
        };
        actions.push(SessionAction::SplitStatusLoaded { generation, status });

        TableSnapshot {
            generation,
            access: Ok(access),
            actions,
            degraded,
        }
    }

    /// Fetch and apply in one go
    pub async fn load(&self, session: &mut TableSession) -> Result<LoadReport, LoadError> {
        let table = session.table().cloned().ok_or(LoadError::NoTable)?;
        let snapshot = self.fetch(&table, session.generation()).await;
        let report = snapshot.apply_to(session)?;
        if report.is_complete() {
            tracing::info!(table = %table.path(), "Table loaded");
        } else {
            tracing::warn!(
                table = %table.path(),
                degraded = report.degraded.len(),
                "Table loaded with missing data"
            );
        }
        Ok(report)
    }

    /// Start a new generation and load it
    pub async fn reload(&self, session: &mut TableSession) -> Result<LoadReport, LoadError> {
        if session.apply(SessionAction::Reload) != ApplyOutcome::Applied {
            return match session.access() {
                shared::AccessState::Error(error) => Err(LoadError::Access(error.clone())),
                _ => Err(LoadError::NoTable),
            };
        }
        self.load(session).await
    }

    fn degrade(degraded: &mut Vec<DegradedRead>, read: TableRead, error: &crate::ClientError) {
        tracing::warn!(read = read.as_str(), error = %error, "Read failed, using empty data");
        degraded.push(DegradedRead {
            read,
            error: error.to_string(),
        });
    }
}
