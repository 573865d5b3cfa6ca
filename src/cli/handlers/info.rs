//! Information display handlers (stats, config)

use std::path::Path;

use crate::analytics;
use crate::cli::output::*;
use crate::store::TransactionStore;
use crate::AppConfig;
use crate::Result;

pub fn handle_stats_command(store: &TransactionStore, export: Option<&Path>) -> Result<()> {
    let stats = analytics::dataset_stats(store)?;
    print_statistics(&stats);

    if let Some(export_path) = export {
        let json = serde_json::to_string_pretty(&stats)?;
        std::fs::write(export_path, json)?;
        print_success(&format!("Statistics exported to: {}", export_path.display()));
    }

    Ok(())
}

pub fn handle_config_command(config: &AppConfig) -> Result<()> {
    print_config(config);
    Ok(())
}
