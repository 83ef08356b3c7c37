//! Table session state
//!
//! Application state for one guest at one table, changed only through
//! [`SessionAction`]s. The access check is the only state machine:
//!
//! ```text
//! Validating ──AccessGranted──▶ Ok
//!     │
//!     └──────AccessDenied─────▶ Error (terminal)
//! ```
//!
//! Every load runs under a [`Generation`]. Starting a new load bumps the
//! generation, and results tagged with an older one are dropped.

use serde::Serialize;

use crate::bill::{AllocationInput, BillAllocation};
use crate::error::AppError;
use crate::models::{ActiveUser, DishOrder, SplitStatus, TableOrders, TableRef, TableSummary};

/// Load fence; results from an older generation are stale
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize)]
pub struct Generation(pub u64);

impl Generation {
    pub fn next(self) -> Self {
        Self(self.0.wrapping_add(1))
    }
}

/// Access / session validation state
#[derive(Debug, Clone, PartialEq, Default)]
pub enum AccessState {
    #[default]
    Validating,
    Ok,
    /// Terminal: the page renders a dedicated error view
    Error(AppError),
}

impl AccessState {
    pub fn is_ok(&self) -> bool {
        matches!(self, Self::Ok)
    }

    pub fn is_error(&self) -> bool {
        matches!(self, Self::Error(_))
    }
}

/// Data fetched for the table in the current generation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TableData {
    pub orders: Vec<DishOrder>,
    pub summary: Option<TableSummary>,
    pub active_users: Option<Vec<ActiveUser>>,
    pub split: Option<SplitStatus>,
}

impl TableData {
    pub fn allocation_input<'a>(&'a self, current_guest: Option<&'a str>) -> AllocationInput<'a> {
        AllocationInput::new(&self.orders)
            .with_summary(self.summary.as_ref())
            .with_active_users(self.active_users.as_deref())
            .with_split_records(self.split.as_ref().and_then(SplitStatus::active_records))
            .with_current_guest(current_guest)
    }
}

/// Every transition of a [`TableSession`]
#[derive(Debug, Clone, PartialEq)]
pub enum SessionAction {
    /// Table resolved from the QR code; starts a fresh generation
    TableResolved(TableRef),
    GuestIdentified {
        guest_name: String,
        user_id: Option<String>,
    },
    /// Start a reload of the table data
    Reload,
    AccessGranted {
        generation: Generation,
    },
    AccessDenied {
        generation: Generation,
        error: AppError,
    },
    OrdersLoaded {
        generation: Generation,
        orders: TableOrders,
    },
    ActiveUsersLoaded {
        generation: Generation,
        users: Vec<ActiveUser>,
    },
    /// `None` means no split is active
    SplitStatusLoaded {
        generation: Generation,
        status: Option<SplitStatus>,
    },
    ToggleDish(String),
    ClearSelection,
    SubmitStarted,
    SubmitFinished {
        error: Option<String>,
    },
    Alert(String),
    DismissAlert,
}

/// What [`TableSession::apply`] did with an action
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ApplyOutcome {
    Applied,
    /// Tagged with an older generation
    Stale,
    /// Not allowed in the current state
    Ignored,
}

/// State of one guest at one table
#[derive(Debug, Clone, Default)]
pub struct TableSession {
    table: Option<TableRef>,
    guest_name: Option<String>,
    user_id: Option<String>,
    access: AccessState,
    generation: Generation,
    data: TableData,
    selected: Vec<String>,
    submitting: bool,
    alert: Option<String>,
}

impl TableSession {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn table(&self) -> Option<&TableRef> {
        self.table.as_ref()
    }

    pub fn guest_name(&self) -> Option<&str> {
        self.guest_name.as_deref()
    }

    pub fn user_id(&self) -> Option<&str> {
        self.user_id.as_deref()
    }

    pub fn access(&self) -> &AccessState {
        &self.access
    }

    pub fn generation(&self) -> Generation {
        self.generation
    }

    pub fn data(&self) -> &TableData {
        &self.data
    }

    pub fn selected(&self) -> &[String] {
        &self.selected
    }

    pub fn is_submitting(&self) -> bool {
        self.submitting
    }

    pub fn alert(&self) -> Option<&str> {
        self.alert.as_deref()
    }

    /// Current allocation; only available once access is granted
    pub fn allocation(&self) -> Option<BillAllocation> {
        if !self.access.is_ok() {
            return None;
        }
        Some(BillAllocation::compute(
            &self.data.allocation_input(self.guest_name.as_deref()),
        ))
    }

    /// Apply one action
    pub fn apply(&mut self, action: SessionAction) -> ApplyOutcome {
        if self.access.is_error() {
            tracing::debug!(?action, "Session is in error state, action ignored");
            return ApplyOutcome::Ignored;
        }

        if let Some(generation) = action_generation(&action)
            && generation != self.generation
        {
            tracing::debug!(
                current = self.generation.0,
                received = generation.0,
                "Dropping stale load result"
            );
            return ApplyOutcome::Stale;
        }

        match action {
            SessionAction::TableResolved(table) => {
                self.generation = self.generation.next();
                self.table = Some(table);
                self.access = AccessState::Validating;
                self.data = TableData::default();
                self.selected.clear();
            }
            SessionAction::GuestIdentified {
                guest_name,
                user_id,
            } => {
                self.guest_name = Some(guest_name);
                self.user_id = user_id;
            }
            SessionAction::Reload => {
                if self.table.is_none() {
                    return ApplyOutcome::Ignored;
                }
                self.generation = self.generation.next();
            }
            SessionAction::AccessGranted { .. } => {
                self.access = AccessState::Ok;
            }
            SessionAction::AccessDenied { error, .. } => {
                tracing::warn!(code = %error.code, message = %error.message, "Table access denied");
                self.access = AccessState::Error(error);
            }
            SessionAction::OrdersLoaded { orders, .. } => {
                self.data.orders = orders.orders;
                self.data.summary = orders.summary;
                let data = &self.data;
                self.selected
                    .retain(|id| data.orders.iter().any(|d| &d.id == id && !d.is_paid()));
            }
            SessionAction::ActiveUsersLoaded { users, .. } => {
                self.data.active_users = Some(users);
            }
            SessionAction::SplitStatusLoaded { status, .. } => {
                self.data.split = status;
            }
            SessionAction::ToggleDish(id) => {
                if let Some(pos) = self.selected.iter().position(|s| *s == id) {
                    self.selected.remove(pos);
                } else {
                    self.selected.push(id);
                }
            }
            SessionAction::ClearSelection => self.selected.clear(),
            SessionAction::SubmitStarted => {
                if self.submitting {
                    return ApplyOutcome::Ignored;
                }
                self.submitting = true;
                self.alert = None;
            }
            SessionAction::SubmitFinished { error } => {
                self.submitting = false;
                if error.is_none() {
                    self.selected.clear();
                }
                self.alert = error;
            }
            SessionAction::Alert(message) => self.alert = Some(message),
            SessionAction::DismissAlert => self.alert = None,
        }
        ApplyOutcome::Applied
    }
}

fn action_generation(action: &SessionAction) -> Option<Generation> {
    match action {
        SessionAction::AccessGranted { generation }
        | SessionAction::AccessDenied { generation, .. }
        | SessionAction::OrdersLoaded { generation, .. }
        | SessionAction::ActiveUsersLoaded { generation, .. }
        | SessionAction::SplitStatusLoaded { generation, .. } => Some(*generation),
        _ => None,
    }
}
