//! Status command implementation.

use crate::chat::Backend;
use crate::error::Result;
use crate::local::LocalAsker;
use crate::output::Formatter;

/// Execute the status command against the chosen backend.
pub async fn execute_status(backend: &Backend, formatter: &Formatter) -> Result<()> {
    match backend {
        Backend::Remote(client) => {
            let report = client.health().await?;
            println!("{}", formatter.format_health(&report, client.server_url()));
        }
        Backend::Local(local) => {
            println!("{}", local_status(local, formatter).await?);
        }
    }

    Ok(())
}

async fn local_status(local: &LocalAsker, formatter: &Formatter) -> Result<String> {
    let mut out = formatter.success("Local answering");
    out.push_str(&format!("\n  Sources:  {}", local.source_count()?));
    if let Some(status) = local.status().await {
        out.push_str(&format!("\n  Pipeline: {}", status));
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{OutputFormat, Profile};

    #[tokio::test]
    async fn test_local_status_reports_unloaded_pipeline() {
        let dir = tempfile::tempdir().unwrap();
        let profile = Profile {
            knowledge_db: dir.path().join("kb.db"),
            ..Profile::default()
        };
        let local = LocalAsker::from_profile(&profile).unwrap();
        let formatter = Formatter::new(OutputFormat::Table, false);

        let out = local_status(&local, &formatter).await.unwrap();

        assert!(out.contains("Sources:  0"));
        assert!(out.contains("Pipeline: not loaded"));
    }
}
