use crate::{
    entities::{activity_log, ActivityType},
    errors::ServiceError,
};
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use tracing::debug;
use uuid::Uuid;

/// A row about to be written to `activity_logs`
#[derive(Debug, Clone)]
pub struct ActivityEntry {
    pub activity_type: ActivityType,
    pub title: String,
    pub description: String,
    pub user_id: Option<Uuid>,
    pub pangkalan_id: Option<Uuid>,
    pub order_id: Option<Uuid>,
}

impl ActivityEntry {
    pub fn new(
        activity_type: ActivityType,
        title: impl Into<String>,
        description: impl Into<String>,
    ) -> Self {
        Self {
            activity_type,
            title: title.into(),
            description: description.into(),
            user_id: None,
            pangkalan_id: None,
            order_id: None,
        }
    }

    pub fn by(mut self, user_id: Option<Uuid>) -> Self {
        self.user_id = user_id;
        self
    }

    pub fn pangkalan(mut self, pangkalan_id: Uuid) -> Self {
        self.pangkalan_id = Some(pangkalan_id);
        self
    }

    pub fn order(mut self, order_id: Uuid) -> Self {
        self.order_id = Some(order_id);
        self
    }
}

/// Writes an activity row on `conn`, which may be an open transaction.
pub async fn record<C: ConnectionTrait>(
    conn: &C,
    entry: ActivityEntry,
) -> Result<activity_log::Model, ServiceError> {
    debug!(activity_type = %entry.activity_type, title = %entry.title, "recording activity");
    let row = activity_log::ActiveModel {
        id: Set(Uuid::new_v4()),
        activity_type: Set(entry.activity_type),
        title: Set(entry.title),
        description: Set(entry.description),
        user_id: Set(entry.user_id),
        pangkalan_id: Set(entry.pangkalan_id),
        order_id: Set(entry.order_id),
        created_at: Set(Utc::now()),
    };
    Ok(row.insert(conn).await?)
}

/// Newest activity rows created at or after `since`.
pub async fn recent<C: ConnectionTrait>(
    conn: &C,
    since: DateTime<Utc>,
    limit: u64,
) -> Result<Vec<activity_log::Model>, ServiceError> {
    Ok(activity_log::Entity::find()
        .filter(activity_log::Column::CreatedAt.gte(since))
        .order_by_desc(activity_log::Column::CreatedAt)
        .limit(limit)
        .all(conn)
        .await?)
}
