use symcheck_config::Config;

/// Strategy for listing the symptom catalog of the loaded dataset.
#[derive(Debug, Clone, Copy)]
pub struct SymptomsStrategy;

impl super::CommandStrategy for SymptomsStrategy {
    /// Optional substring filter
    type Input = Option<String>;

    async fn execute(&self, filter: Self::Input) -> anyhow::Result<()> {
        let config = Config::load()?;
        let dataset = config.dataset_source().load();

        if dataset.catalog().is_empty() {
            println!(
                "No dataset found in {}. Expected one of: {}",
                config.dataset.dir.display(),
                config.dataset.candidates.join(", ")
            );
            return Ok(());
        }

        let filter = filter.map(|f| f.trim().to_lowercase());
        let names: Vec<&str> = dataset
            .catalog()
            .names()
            .filter(|name| {
                filter
                    .as_deref()
                    .is_none_or(|f| name.to_lowercase().contains(f))
            })
            .collect();

        for name in &names {
            println!("{name}");
        }
        println!();
        println!("{} of {} symptoms", names.len(), dataset.catalog().len());
        Ok(())
    }
}
