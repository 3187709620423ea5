use crate::entities::{PaymentMethod, PaymentStatus, payment_entity as payments};
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

#[derive(Debug, Serialize, Deserialize)]
pub struct CreatePaymentRequest {
    pub membership_id: i64,
    /// 金额(分)
    pub amount: i64,
    pub method: PaymentMethod,
    pub receipt_url: Option<String>,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct UpdatePaymentStatusRequest {
    pub status: PaymentStatus,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct PaymentQuery {
    pub page: Option<u64>,
    pub page_size: Option<u64>,
    pub membership_id: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PaymentResponse {
    pub id: i64,
    pub membership_id: i64,
    pub amount: i64,
    pub method: PaymentMethod,
    pub receipt_url: Option<String>,
    pub status: PaymentStatus,
    pub payment_date: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<payments::Model> for PaymentResponse {
    fn from(m: payments::Model) -> Self {
        Self {
            id: m.id,
            membership_id: m.membership_id,
            amount: m.amount,
            method: m.method,
            receipt_url: m.receipt_url,
            status: m.status,
            payment_date: m.payment_date,
            updated_at: m.updated_at,
        }
    }
}
