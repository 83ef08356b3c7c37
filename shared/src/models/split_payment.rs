//! Split Payment Models

use serde::{Deserialize, Serialize};

/// Status of one participant in a split bill
///
/// A missing or unrecognised status is `Other`, never pending.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "snake_case")]
pub enum SplitRecordStatus {
    Pending,
    Paid,
    #[default]
    #[serde(other)]
    Other,
}

/// One participant's share of an active split bill
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SplitPaymentRecord {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub guest_name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user_id: Option<String>,
    #[serde(default)]
    pub status: SplitRecordStatus,
    #[serde(default)]
    pub amount: Option<f64>,
}

impl SplitPaymentRecord {
    pub fn for_guest(guest_name: impl Into<String>, status: SplitRecordStatus) -> Self {
        Self {
            guest_name: Some(guest_name.into()),
            user_id: None,
            status,
            amount: None,
        }
    }

    pub fn for_user(user_id: impl Into<String>, status: SplitRecordStatus) -> Self {
        Self {
            guest_name: None,
            user_id: Some(user_id.into()),
            status,
            amount: None,
        }
    }

    /// Guest name when known, otherwise the user id
    pub fn identity(&self) -> Option<&str> {
        self.guest_name
            .as_deref()
            .filter(|n| !n.is_empty())
            .or(self.user_id.as_deref().filter(|id| !id.is_empty()))
    }

    pub fn is_pending(&self) -> bool {
        self.status == SplitRecordStatus::Pending
    }
}

/// Split bill state of a table
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct SplitStatus {
    #[serde(default)]
    pub is_active: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub number_of_people: Option<u32>,
    #[serde(default, alias = "splitPayments")]
    pub records: Vec<SplitPaymentRecord>,
}

impl SplitStatus {
    /// Records of an active split, `None` when no split is running
    pub fn active_records(&self) -> Option<&[SplitPaymentRecord]> {
        self.is_active.then_some(self.records.as_slice())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identity_prefers_guest_name() {
        let mut record = SplitPaymentRecord::for_guest("Ana", SplitRecordStatus::Pending);
        record.user_id = Some("u1".into());
        assert_eq!(record.identity(), Some("Ana"));

        let record = SplitPaymentRecord::for_user("u2", SplitRecordStatus::Paid);
        assert_eq!(record.identity(), Some("u2"));
    }

    #[test]
    fn test_empty_guest_name_falls_back_to_user_id() {
        let json = r#"{"guestName":"","userId":"u7","status":"pending"}"#;
        let record: SplitPaymentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.identity(), Some("u7"));
        assert!(record.is_pending());
    }

    #[test]
    fn test_unknown_status() {
        let json = r#"{"guestName":"Ana","status":"processing"}"#;
        let record: SplitPaymentRecord = serde_json::from_str(json).unwrap();
        assert_eq!(record.status, SplitRecordStatus::Other);
        assert!(!record.is_pending());
    }

    #[test]
    fn test_record_without_status_keeps_the_split() {
        let json = r#"{"isActive":true,"splitPayments":[{"guestName":"Ana"},{"guestName":"Ben","status":"pending"}]}"#;
        let status: SplitStatus = serde_json::from_str(json).unwrap();
        let records = status.active_records().unwrap();
        assert_eq!(records.len(), 2);
        assert_eq!(records[0].status, SplitRecordStatus::Other);
        assert!(records[1].is_pending());
    }

    #[test]
    fn test_inactive_split_has_no_records() {
        let json = r#"{"isActive":false,"splitPayments":[{"guestName":"Ana","status":"pending"}]}"#;
        let status: SplitStatus = serde_json::from_str(json).unwrap();
        assert_eq!(status.records.len(), 1);
        assert!(status.active_records().is_none());
    }
}
