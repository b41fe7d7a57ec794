//! Payment record.
//!
//! A payment asserts that one member settled dues for one period. Rows are
//! created once per `(member_id, period)` and never updated or deleted.

use super::member::MemberId;
use super::period::Period;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Stable payment identifier.
pub type PaymentId = Uuid;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Payment {
    pub payment_id: PaymentId,
    /// May reference a member that has since been deleted.
    pub member_id: MemberId,
    pub period: Period,
    /// Always `true` for rows written by this crate.
    pub paid: bool,
}

impl Payment {
    /// Creates a paid record with a freshly generated id.
    pub fn paid(member_id: MemberId, period: Period) -> Self {
        Self {
            payment_id: Uuid::new_v4(),
            member_id,
            period,
            paid: true,
        }
    }
}
