use std::fmt;

use bigdecimal::BigDecimal;
use chrono::{DateTime, Utc};
use uuid::Uuid;

use super::catalog::RestaurantSummary;
use super::errors::DomainError;

// ── Lifecycle ────────────────────────────────────────────────────────────────

/// Order progress, derived from the three nullable lifecycle timestamps.
///
/// An order is born `Pending` and moves forward one stage per transition;
/// timestamps are set exactly once and never cleared, so the derivation is
/// total: `delivered_at` implies `sent_at` implies `started_at`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OrderStatus {
    Pending,
    InProcess,
    Sent,
    Delivered,
}

impl OrderStatus {
    pub fn from_timestamps(
        started_at: Option<DateTime<Utc>>,
        sent_at: Option<DateTime<Utc>>,
        delivered_at: Option<DateTime<Utc>>,
    ) -> Self {
        if delivered_at.is_some() {
            OrderStatus::Delivered
        } else if sent_at.is_some() {
            OrderStatus::Sent
        } else if started_at.is_some() {
            OrderStatus::InProcess
        } else {
            OrderStatus::Pending
        }
    }

    /// Customer edits and deletes are only legal before the restaurant picks
    /// the order up.
    pub fn is_pending(self) -> bool {
        self == OrderStatus::Pending
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            OrderStatus::Pending => "pending",
            OrderStatus::InProcess => "in process",
            OrderStatus::Sent => "sent",
            OrderStatus::Delivered => "delivered",
        };
        f.write_str(name)
    }
}

/// A staff-driven state transition. Each event stamps exactly one lifecycle
/// timestamp and is legal from exactly one status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LifecycleEvent {
    Confirm,
    Send,
    Deliver,
}

impl LifecycleEvent {
    /// Gate for the monotonic state machine: `Err(Conflict)` unless the event
    /// is the single legal next step from `status`.
    pub fn ensure_applicable(self, status: OrderStatus) -> Result<(), DomainError> {
        match (self, status) {
            (LifecycleEvent::Confirm, OrderStatus::Pending)
            | (LifecycleEvent::Send, OrderStatus::InProcess)
            | (LifecycleEvent::Deliver, OrderStatus::Sent) => Ok(()),
            _ => Err(DomainError::conflict(self.conflict_reason(status))),
        }
    }

    fn conflict_reason(self, status: OrderStatus) -> String {
        match self {
            LifecycleEvent::Confirm => {
                format!("Order cannot be confirmed: it is already {}", status)
            }
            LifecycleEvent::Send => match status {
                OrderStatus::Pending => "Order cannot be sent before it is confirmed".to_string(),
                _ => format!("Order cannot be sent: it is already {}", status),
            },
            LifecycleEvent::Deliver => match status {
                OrderStatus::Pending | OrderStatus::InProcess => {
                    "Order cannot be delivered before it is sent".to_string()
                }
                _ => format!("Order cannot be delivered: it is already {}", status),
            },
        }
    }
}

// ── Write-side inputs ────────────────────────────────────────────────────────

/// One requested product line, before validation and pricing.
#[derive(Debug, Clone)]
pub struct LineDraft {
    pub product_id: Uuid,
    pub quantity: i32,
}

/// A creation request as it leaves the HTTP layer.
#[derive(Debug, Clone)]
pub struct OrderDraft {
    pub restaurant_id: Uuid,
    pub address: String,
    pub lines: Vec<LineDraft>,
}

/// An update request. `restaurant_id` must be absent: the field only exists so
/// the validation layer can reject attempts to move an order between
/// restaurants.
#[derive(Debug, Clone)]
pub struct OrderUpdate {
    pub restaurant_id: Option<Uuid>,
    pub address: String,
    pub lines: Vec<LineDraft>,
}

/// A validated, priced line ready to persist. `unit_price` is captured from
/// the product's current price and never re-read afterwards.
#[derive(Debug, Clone)]
pub struct NewOrderLineRecord {
    pub product_id: Uuid,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

/// A fully validated and priced order, ready for the repository transaction.
#[derive(Debug, Clone)]
pub struct NewOrderRecord {
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub address: String,
    pub price: BigDecimal,
    pub shipping_costs: BigDecimal,
    pub lines: Vec<NewOrderLineRecord>,
}

/// The mutable portion of a pending order plus its replacement line set.
#[derive(Debug, Clone)]
pub struct OrderChanges {
    pub address: String,
    pub price: BigDecimal,
    pub shipping_costs: BigDecimal,
    pub lines: Vec<NewOrderLineRecord>,
}

// ── Read-side views ──────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct OrderView {
    pub id: Uuid,
    pub customer_id: Uuid,
    pub restaurant_id: Uuid,
    pub address: String,
    pub price: BigDecimal,
    pub shipping_costs: BigDecimal,
    pub started_at: Option<DateTime<Utc>>,
    pub sent_at: Option<DateTime<Utc>>,
    pub delivered_at: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
}

impl OrderView {
    pub fn status(&self) -> OrderStatus {
        OrderStatus::from_timestamps(self.started_at, self.sent_at, self.delivered_at)
    }
}

#[derive(Debug, Clone)]
pub struct OrderLineView {
    pub id: Uuid,
    pub product_id: Uuid,
    pub product_name: String,
    pub quantity: i32,
    pub unit_price: BigDecimal,
}

/// An order with its expansions: always the lines, and the restaurant summary
/// on customer-facing reads.
#[derive(Debug, Clone)]
pub struct OrderDetail {
    pub order: OrderView,
    pub restaurant: Option<RestaurantSummary>,
    pub lines: Vec<OrderLineView>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn ts(hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2025, 8, 18, hour, 0, 0).unwrap()
    }

    #[test]
    fn status_is_pending_when_all_timestamps_null() {
        assert_eq!(
            OrderStatus::from_timestamps(None, None, None),
            OrderStatus::Pending
        );
    }

    #[test]
    fn status_is_in_process_once_started() {
        assert_eq!(
            OrderStatus::from_timestamps(Some(ts(10)), None, None),
            OrderStatus::InProcess
        );
    }

    #[test]
    fn status_is_sent_once_sent() {
        assert_eq!(
            OrderStatus::from_timestamps(Some(ts(10)), Some(ts(11)), None),
            OrderStatus::Sent
        );
    }

    #[test]
    fn status_is_delivered_once_delivered() {
        assert_eq!(
            OrderStatus::from_timestamps(Some(ts(10)), Some(ts(11)), Some(ts(12))),
            OrderStatus::Delivered
        );
    }

    #[test]
    fn confirm_is_only_legal_from_pending() {
        assert!(LifecycleEvent::Confirm
            .ensure_applicable(OrderStatus::Pending)
            .is_ok());
        for status in [
            OrderStatus::InProcess,
            OrderStatus::Sent,
            OrderStatus::Delivered,
        ] {
            let err = LifecycleEvent::Confirm.ensure_applicable(status);
            assert!(
                matches!(err, Err(DomainError::Conflict(_))),
                "confirm from {status} should conflict"
            );
        }
    }

    #[test]
    fn send_is_only_legal_from_in_process() {
        assert!(LifecycleEvent::Send
            .ensure_applicable(OrderStatus::InProcess)
            .is_ok());
        for status in [
            OrderStatus::Pending,
            OrderStatus::Sent,
            OrderStatus::Delivered,
        ] {
            assert!(
                matches!(
                    LifecycleEvent::Send.ensure_applicable(status),
                    Err(DomainError::Conflict(_))
                ),
                "send from {status} should conflict"
            );
        }
    }

    #[test]
    fn deliver_is_only_legal_from_sent() {
        assert!(LifecycleEvent::Deliver
            .ensure_applicable(OrderStatus::Sent)
            .is_ok());
        for status in [
            OrderStatus::Pending,
            OrderStatus::InProcess,
            OrderStatus::Delivered,
        ] {
            assert!(
                matches!(
                    LifecycleEvent::Deliver.ensure_applicable(status),
                    Err(DomainError::Conflict(_))
                ),
                "deliver from {status} should conflict"
            );
        }
    }

    #[test]
    fn repeated_transitions_conflict_instead_of_overwriting() {
        // Set-once semantics: a second confirm on an in-process order is a
        // conflict, never a timestamp overwrite.
        let err = LifecycleEvent::Confirm.ensure_applicable(OrderStatus::InProcess);
        assert!(matches!(err, Err(DomainError::Conflict(_))));
    }

    #[test]
    fn status_display_matches_query_vocabulary() {
        assert_eq!(OrderStatus::Pending.to_string(), "pending");
        assert_eq!(OrderStatus::InProcess.to_string(), "in process");
        assert_eq!(OrderStatus::Sent.to_string(), "sent");
        assert_eq!(OrderStatus::Delivered.to_string(), "delivered");
    }

    #[test]
    fn only_pending_orders_are_editable() {
        assert!(OrderStatus::Pending.is_pending());
        assert!(!OrderStatus::InProcess.is_pending());
        assert!(!OrderStatus::Sent.is_pending());
        assert!(!OrderStatus::Delivered.is_pending());
    }
}
