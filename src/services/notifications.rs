use crate::{
    db::DbPool,
    entities::{activity_log, ActivityType, LpgType},
    errors::ServiceError,
    services::{
        activity,
        stock::{StockLevel, StockService},
    },
};
use chrono::{DateTime, Duration, Utc};
use serde::{Deserialize, Serialize};
use std::sync::Arc;
use tracing::{debug, instrument};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

pub const CRITICAL_STOCK_THRESHOLD: i64 = 10;
pub const LOW_STOCK_THRESHOLD: i64 = 50;
pub const DEFAULT_LIMIT: u64 = 20;
pub const MAX_LIMIT: u64 = 100;
const ACTIVITY_WINDOW_DAYS: i64 = 7;

/// Declaration order is urgency order; `Ord` sorts CRITICAL first.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize, ToSchema,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl From<ActivityType> for Priority {
    fn from(activity_type: ActivityType) -> Self {
        match activity_type {
            ActivityType::OrderCreated | ActivityType::PaymentReceived => Priority::Medium,
            ActivityType::OrderStatusChanged
            | ActivityType::InvoiceIssued
            | ActivityType::StockIn
            | ActivityType::StockOut => Priority::Low,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum NotificationKind {
    Activity,
    StockAlert,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Notification {
    /// Activity row id, or the product id for stock alerts
    pub id: Uuid,
    pub kind: NotificationKind,
    pub priority: Priority,
    pub title: String,
    pub message: String,
    pub activity_type: Option<ActivityType>,
    pub pangkalan_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct NotificationQuery {
    /// Defaults to 20, capped at 100
    pub limit: Option<u64>,
}

impl NotificationQuery {
    pub fn effective_limit(&self) -> u64 {
        self.limit.unwrap_or(DEFAULT_LIMIT).clamp(1, MAX_LIMIT)
    }
}

impl From<activity_log::Model> for Notification {
    fn from(row: activity_log::Model) -> Self {
        Self {
            id: row.id,
            kind: NotificationKind::Activity,
            priority: row.activity_type.into(),
            title: row.title,
            message: row.description,
            activity_type: Some(row.activity_type),
            pangkalan_id: row.pangkalan_id,
            order_id: row.order_id,
            created_at: row.created_at,
        }
    }
}

fn stock_priority(current: i64) -> Option<Priority> {
    if current <= CRITICAL_STOCK_THRESHOLD {
        Some(Priority::Critical)
    } else if current <= LOW_STOCK_THRESHOLD {
        Some(Priority::High)
    } else {
        None
    }
}

fn label(lpg_type: LpgType) -> &'static str {
    match lpg_type {
        LpgType::Kg3 => "3 kg",
        LpgType::Kg5 => "5,5 kg",
        LpgType::Kg12 => "12 kg",
        LpgType::Kg50 => "50 kg",
    }
}

/// Alerts for products at or below the low-stock threshold.
pub fn stock_alerts(levels: &[StockLevel], now: DateTime<Utc>) -> Vec<Notification> {
    levels
        .iter()
        .filter(|level| level.is_active)
        .filter_map(|level| {
            let priority = stock_priority(level.current)?;
            let title = match priority {
                Priority::Critical => format!("Stok {} kritis", label(level.lpg_type)),
                _ => format!("Stok {} menipis", label(level.lpg_type)),
            };
            Some(Notification {
                id: level.product_id,
                kind: NotificationKind::StockAlert,
                priority,
                title,
                message: format!("{} tersisa {} tabung", level.name, level.current),
                activity_type: None,
                pangkalan_id: None,
                order_id: None,
                created_at: now,
            })
        })
        .collect()
}

/// Most urgent first, then newest first, truncated to `limit`.
pub fn compose(
    activities: Vec<Notification>,
    alerts: Vec<Notification>,
    limit: usize,
) -> Vec<Notification> {
    let mut all: Vec<Notification> = activities.into_iter().chain(alerts).collect();
    all.sort_by(|a, b| {
        a.priority
            .cmp(&b.priority)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    all.truncate(limit);
    all
}

#[derive(Clone)]
pub struct NotificationService {
    db_pool: Arc<DbPool>,
    stock: StockService,
}

impl NotificationService {
    pub fn new(db_pool: Arc<DbPool>) -> Self {
        Self {
            stock: StockService::new(db_pool.clone()),
            db_pool,
        }
    }

    #[instrument(skip(self))]
    pub async fn list(&self, query: &NotificationQuery) -> Result<Vec<Notification>, ServiceError> {
        let limit = query.effective_limit();
        let now = Utc::now();

        let activities = activity::recent(
            &*self.db_pool,
            now - Duration::days(ACTIVITY_WINDOW_DAYS),
            limit,
        )
        .await?
        .into_iter()
        .map(Notification::from)
        .collect();
        let alerts = stock_alerts(&self.stock.stock_levels().await?, now);

        let notifications = compose(activities, alerts, limit as usize);
        debug!(count = notifications.len(), "notifications composed");
        Ok(notifications)
    }
}
