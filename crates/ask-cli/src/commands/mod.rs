//! Command implementations.

pub mod ask;
pub mod ingest;
pub mod profile;
pub mod status;

pub use self::ask::execute_ask;
pub use self::ingest::execute_ingest;
pub use self::profile::execute_profile;
pub use self::status::execute_status;

use crate::chat::Backend;
use crate::client::AskClient;
use crate::config::{AskMode, Config};
use crate::error::Result;
use crate::local::LocalAsker;
use std::time::Duration;

/// Build the answering backend for the active profile.
///
/// `force_local` overrides a remote profile.
pub fn connect_backend(config: &Config, force_local: bool) -> Result<Backend> {
    let profile = config.get_active_profile()?;

    if force_local || profile.mode == AskMode::Local {
        return Ok(Backend::Local(LocalAsker::from_profile(profile)?));
    }

    let client = AskClient::new(&profile.server_url)
        .with_timeout(Duration::from_secs(config.settings.timeout_secs));
    Ok(Backend::Remote(client))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::Profile;

    #[test]
    fn test_remote_by_default() {
        let config = Config::default();
        let backend = connect_backend(&config, false).unwrap();
        assert!(matches!(backend, Backend::Remote(_)));
    }

    #[test]
    fn test_local_flag_overrides_profile() {
        let dir = tempfile::tempdir().unwrap();
        let mut config = Config::default();
        config.set_profile(
            "default".to_string(),
            Profile {
                knowledge_db: dir.path().join("kb.db"),
                ..Profile::default()
            },
        );

        let backend = connect_backend(&config, true).unwrap();
        assert!(matches!(backend, Backend::Local(_)));
    }
}
