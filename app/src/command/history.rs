use uuid::Uuid;

use super::init_common_components;

#[derive(Debug, Clone)]
pub struct HistoryInput {
    /// 1-based page number
    pub page: u64,
    pub delete: Option<Uuid>,
    pub clear: bool,
}

/// Strategy for browsing, deleting and clearing the user's search history.
#[derive(Debug, Clone, Copy)]
pub struct HistoryStrategy;

impl super::CommandStrategy for HistoryStrategy {
    type Input = HistoryInput;

    async fn execute(&self, input: Self::Input) -> anyhow::Result<()> {
        let common = init_common_components().await?;
        let user = common.current_user().await?;
        let history = common.store.history();

        if input.clear {
            let removed = history.clear(&user.id).await?;
            println!("🗑️  Removed {removed} history records");
            return Ok(());
        }

        if let Some(id) = input.delete {
            if history.delete(&user.id, &id).await? {
                println!("🗑️  Removed history record {id}");
            } else {
                anyhow::bail!("No history record {id} found");
            }
            return Ok(());
        }

        let page = history
            .list(&user.id, input.page, common.config.history.page_size)
            .await?;

        if page.total_items == 0 {
            println!("No searches yet. Try 'symcheck check \"fever, cough\"'");
            return Ok(());
        }

        for entry in &page.items {
            println!(
                "{}  {}",
                entry.created_at.with_timezone(&chrono::Local).format("%Y-%m-%d %H:%M"),
                entry.id
            );
            println!("  Query: {}", entry.query);
            println!(
                "  Top:   {} ({:.1}%)",
                entry.top_prediction,
                entry.confidence * 100.0
            );
            if !entry.alternatives.is_empty() {
                let alternatives: Vec<String> = entry
                    .alternatives
                    .iter()
                    .map(|a| format!("{} ({:.1}%)", a.label, a.confidence * 100.0))
                    .collect();
                println!("  Also:  {}", alternatives.join(", "));
            }
            println!();
        }

        println!(
            "Page {} of {} ({} searches)",
            page.page, page.total_pages, page.total_items
        );
        if page.has_next() {
            println!("Next: symcheck history --page {}", page.page + 1);
        }
        Ok(())
    }
}
