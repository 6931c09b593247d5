//! Display mapping for the order list page.
//!
//! Everything here is pure: the handler passes in the render time so rows
//! can be built and checked without a clock.

use chrono::{DateTime, Utc};
use crate::models::{ListedStatus, OrderSummary};

/// The status column.
#[derive(Debug, Clone, PartialEq)]
pub enum StatusCell {
    Expired,
    Completed,
    /// Time left to pay, as `mm:ss`.
    Countdown {
        expires_at: Option<DateTime<Utc>>,
        remaining: String,
    },
}

impl StatusCell {
    pub fn for_order(order: &OrderSummary, now: DateTime<Utc>) -> Self {
        match order.status {
            ListedStatus::Cancelled => StatusCell::Expired,
            ListedStatus::Completed => StatusCell::Completed,
            ListedStatus::Open => StatusCell::Countdown {
                expires_at: order.expires_at,
                remaining: remaining(order.expires_at, now),
            },
        }
    }

    pub fn label(&self) -> &str {
        match self {
            StatusCell::Expired => "Expired",
            StatusCell::Completed => "Completed",
            StatusCell::Countdown { remaining, .. } => remaining.as_str(),
        }
    }

    pub fn color(&self) -> Option<&'static str> {
        match self {
            StatusCell::Expired => Some("red"),
            StatusCell::Completed => Some("green"),
            StatusCell::Countdown { .. } => None,
        }
    }

    pub fn is_countdown(&self) -> bool {
        matches!(self, StatusCell::Countdown { .. })
    }

    /// RFC 3339 deadline for the countdown element, empty when unknown.
    pub fn deadline(&self) -> String {
        match self {
            StatusCell::Countdown {
                expires_at: Some(at),
                ..
            } => at.to_rfc3339(),
            _ => String::new(),
        }
    }
}

/// Paid / delivered columns: a check with the date, or a cross with a
/// fixed label.
#[derive(Debug, Clone, PartialEq)]
pub enum FlagCell {
    Done { date: String },
    Pending { label: &'static str },
}

impl FlagCell {
    fn new(done: bool, at: Option<&str>, pending: &'static str) -> Self {
        if done {
            FlagCell::Done {
                date: at.map(short_date).unwrap_or_default(),
            }
        } else {
            FlagCell::Pending { label: pending }
        }
    }

    pub fn is_done(&self) -> bool {
        matches!(self, FlagCell::Done { .. })
    }

    pub fn text(&self) -> &str {
        match self {
            FlagCell::Done { date } => date.as_str(),
            FlagCell::Pending { label } => *label,
        }
    }
}

/// One row of the order table.
#[derive(Debug, Clone, PartialEq)]
pub struct OrderRow {
    pub id: String,
    /// 1-based position in the list.
    pub position: usize,
    pub date: String,
    pub total: String,
    pub method: String,
    pub status: StatusCell,
    pub paid: FlagCell,
    pub delivered: FlagCell,
    pub details_href: String,
}

impl OrderRow {
    pub fn new(position: usize, order: &OrderSummary, now: DateTime<Utc>) -> Self {
        Self {
            id: order.id.clone(),
            position,
            date: short_date(&order.created_at),
            total: format!("$ {:.2}", order.total_price),
            method: order.payment_method.clone(),
            status: StatusCell::for_order(order, now),
            paid: FlagCell::new(order.is_paid, order.paid_at.as_deref(), "Not Paid"),
            delivered: FlagCell::new(
                order.is_delivered,
                order.delivered_at.as_deref(),
                "Not Delivered",
            ),
            details_href: format!("/orders/{}", order.id),
        }
    }
}

pub fn build_rows(orders: &[OrderSummary], now: DateTime<Utc>) -> Vec<OrderRow> {
    orders
        .iter()
        .enumerate()
        .map(|(index, order)| OrderRow::new(index + 1, order, now))
        .collect()
}

/// First ten characters of an ISO timestamp (`YYYY-MM-DD`).
fn short_date(timestamp: &str) -> String {
    timestamp.chars().take(10).collect()
}

fn remaining(expires_at: Option<DateTime<Utc>>, now: DateTime<Utc>) -> String {
    let seconds = expires_at
        .map(|at| (at - now).num_seconds().max(0))
        .unwrap_or(0);
    format!("{:02}:{:02}", seconds / 60, seconds % 60)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{Duration, TimeZone};

    fn now() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2021, 3, 4, 10, 20, 30).unwrap()
    }

    fn order(status: ListedStatus) -> OrderSummary {
        OrderSummary {
            id: "5f8d0d55b54764421b7156c9".to_string(),
            status,
            created_at: "2021-03-04T10:20:30.000Z".to_string(),
            total_price: 19.9,
            payment_method: "stripe".to_string(),
            is_paid: false,
            paid_at: None,
            is_delivered: false,
            delivered_at: None,
            expires_at: Some(now() + Duration::seconds(15 * 60)),
        }
    }

    #[test]
    fn cancelled_renders_expired_in_red() {
        let row = OrderRow::new(1, &order(ListedStatus::Cancelled), now());
        assert_eq!(row.status, StatusCell::Expired);
        assert_eq!(row.status.label(), "Expired");
        assert_eq!(row.status.color(), Some("red"));
    }

    #[test]
    fn completed_renders_completed_in_green() {
        let row = OrderRow::new(1, &order(ListedStatus::Completed), now());
        assert_eq!(row.status.label(), "Completed");
        assert_eq!(row.status.color(), Some("green"));
    }

    #[test]
    fn open_status_renders_countdown() {
        let row = OrderRow::new(1, &order(ListedStatus::Open), now());
        assert!(row.status.is_countdown());
        assert_eq!(row.status.label(), "15:00");
        assert_eq!(row.status.color(), None);
    }

    #[test]
    fn countdown_clamps_at_zero() {
        let mut order = order(ListedStatus::Open);
        order.expires_at = Some(now() - Duration::seconds(90));
        assert_eq!(OrderRow::new(1, &order, now()).status.label(), "00:00");

        order.expires_at = None;
        let row = OrderRow::new(1, &order, now());
        assert_eq!(row.status.label(), "00:00");
        assert_eq!(row.status.deadline(), "");
    }

    #[test]
    fn unpaid_renders_not_paid_even_with_paid_at() {
        let mut order = order(ListedStatus::Open);
        order.paid_at = Some("2021-03-05T00:00:00.000Z".to_string());

        let row = OrderRow::new(1, &order, now());
        assert!(!row.paid.is_done());
        assert_eq!(row.paid.text(), "Not Paid");
        assert_eq!(row.delivered.text(), "Not Delivered");
    }

    #[test]
    fn paid_and_delivered_show_dates() {
        let mut order = order(ListedStatus::Completed);
        order.is_paid = true;
        order.paid_at = Some("2021-03-05T08:00:00.000Z".to_string());
        order.is_delivered = true;
        order.delivered_at = Some("2021-03-07T08:00:00.000Z".to_string());

        let row = OrderRow::new(1, &order, now());
        assert!(row.paid.is_done());
        assert_eq!(row.paid.text(), "2021-03-05");
        assert_eq!(row.delivered.text(), "2021-03-07");
    }

    #[test]
    fn row_formats_date_total_and_link() {
        let rows = build_rows(
            &[order(ListedStatus::Open), order(ListedStatus::Completed)],
            now(),
        );

        assert_eq!(rows[0].date, "2021-03-04");
        assert_eq!(rows[0].total, "$ 19.90");
        assert_eq!(rows[0].method, "stripe");
        assert_eq!(rows[0].details_href, "/orders/5f8d0d55b54764421b7156c9");
        assert_eq!(rows[1].position, 2);
    }
}
