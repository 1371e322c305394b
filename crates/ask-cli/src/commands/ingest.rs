//! Ingest command implementation.

use crate::cli::IngestArgs;
use crate::config::Profile;
use crate::error::{CliError, Result};
use crate::output::Formatter;
use ask_domain::KnowledgeSource;
use ask_store::SqliteStore;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Execute the ingest command.
pub async fn execute_ingest(args: IngestArgs, profile: &Profile, formatter: &Formatter) -> Result<()> {
    let db = args
        .db
        .map(PathBuf::from)
        .unwrap_or_else(|| profile.knowledge_db.clone());

    let count = ingest_file(Path::new(&args.file), &db)?;

    println!(
        "{}",
        formatter.success(&format!("Ingested {} sources into {}", count, db.display()))
    );

    Ok(())
}

/// Load a JSON array of sources into a knowledge file, replacing by id.
fn ingest_file(file: &Path, db: &Path) -> Result<usize> {
    let json_data = fs::read_to_string(file)?;
    let sources: Vec<KnowledgeSource> = serde_json::from_str(&json_data)?;

    if sources.is_empty() {
        return Err(CliError::InvalidInput("No sources provided".to_string()));
    }

    let store = SqliteStore::new(db)?;
    for source in &sources {
        debug!("Ingesting source {} ({})", source.id, source.title);
        store.upsert_source(source)?;
    }

    Ok(sources.len())
}
