use async_trait::async_trait;
use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use symcheck_core::{HistoryEntry, HistoryPage, HistoryRepo, NewHistoryEntry};
use symcheck_entities::search_history;
use tracing::info;
use uuid::Uuid;

use crate::convert;

/// Search history kept in the `search_history` table.
pub struct DatabaseHistoryRepository {
    db: DatabaseConnection,
}

impl DatabaseHistoryRepository {
    #[must_use]
    pub const fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

#[async_trait]
impl HistoryRepo for DatabaseHistoryRepository {
    async fn append(&self, entry: &NewHistoryEntry) -> anyhow::Result<HistoryEntry> {
        let model = search_history::ActiveModel {
            id: Set(Uuid::now_v7()),
            user_id: Set(entry.user_id),
            query: Set(entry.query.clone()),
            top_prediction: Set(entry.top_prediction.clone()),
            confidence: Set(entry.confidence),
            alternatives: Set(serde_json::to_string(&entry.alternatives)?),
            created_at: Set(Utc::now()),
        }
        .insert(&self.db)
        .await?;

        info!("Saved search history {} for {}", model.id, entry.user_id);
        convert::history_from_model(model)
    }

    async fn list(
        &self,
        user_id: &Uuid,
        page: u64,
        page_size: u64,
    ) -> anyhow::Result<HistoryPage> {
        let page = page.max(1);
        let page_size = page_size.max(1);

        let query = search_history::Entity::find()
            .filter(search_history::Column::UserId.eq(*user_id));
        let total_items = query.clone().count(&self.db).await?;

        let Some(offset) = (page - 1)
            .checked_mul(page_size)
            .filter(|offset| *offset < total_items)
        else {
            return Ok(HistoryPage {
                items: Vec::new(),
                page,
                page_size,
                total_items,
                total_pages: total_items.div_ceil(page_size),
            });
        };

        let models = query
            .order_by_desc(search_history::Column::CreatedAt)
            .order_by_desc(search_history::Column::Id)
            .offset(offset)
            .limit(page_size.min(total_items - offset))
            .all(&self.db)
            .await?;

        let mut items = Vec::with_capacity(models.len());
        for model in models {
            items.push(convert::history_from_model(model)?);
        }

        Ok(HistoryPage {
            items,
            page,
            page_size,
            total_items,
            total_pages: total_items.div_ceil(page_size),
        })
    }

    async fn delete(&self, user_id: &Uuid, id: &Uuid) -> anyhow::Result<bool> {
        let result = search_history::Entity::delete_many()
            .filter(search_history::Column::Id.eq(*id))
            .filter(search_history::Column::UserId.eq(*user_id))
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn clear(&self, user_id: &Uuid) -> anyhow::Result<u64> {
        let result = search_history::Entity::delete_many()
            .filter(search_history::Column::UserId.eq(*user_id))
            .exec(&self.db)
            .await?;

        info!("Cleared {} history records for {user_id}", result.rows_affected);
        Ok(result.rows_affected)
    }
}
