//! Command-line argument definitions using clap.

use clap::Parser;
use std::path::PathBuf;

use crate::config::Config;

/// FANBOX creator archiver CLI.
#[derive(Parser, Debug)]
#[command(
    name = "fanbox-archiver",
    version,
    about = "Archive posts and media from a FANBOX creator",
    long_about = "A CLI tool that mirrors a FANBOX creator's posts into a local directory.\n\n\
                  Runs are incremental: anything already on disk is reused, so an\n\
                  interrupted run can simply be started again."
)]
pub struct Args {
    /// Creator id, `@id`, or creator page URL. Nothing is done when omitted.
    pub creator: Option<String>,

    /// Path to configuration file.
    #[arg(short, long, default_value = "config.toml")]
    pub config: PathBuf,

    /// Base directory for archives.
    #[arg(short = 'd', long = "directory")]
    pub download_directory: Option<PathBuf>,

    /// Value of the FANBOXSESSID cookie from a logged-in browser.
    #[arg(short = 's', long = "session-id", env = "FANBOX_SESSID")]
    pub session_id: Option<String>,

    /// Browser user agent string.
    #[arg(short = 'a', long = "user-agent", env = "FANBOX_USER_AGENT")]
    pub user_agent: Option<String>,

    /// Seconds to wait after each post fetched from the API.
    #[arg(long)]
    pub cooldown: Option<u64>,

    /// Maximum number of posts to request from the listing.
    #[arg(short, long)]
    pub limit: Option<u32>,

    /// Give up on an asset after this many attempts instead of retrying forever.
    #[arg(long)]
    pub max_attempts: Option<u32>,

    /// Hide the progress bar.
    #[arg(long)]
    pub no_progress: bool,

    /// Show information about skipped downloads.
    #[arg(long)]
    pub show_skipped: bool,

    /// Enable debug logging.
    #[arg(long)]
    pub debug: bool,
}

impl Args {
    /// Merge CLI arguments into an existing config, overriding where specified.
    pub fn merge_into_config(&self, config: &mut Config) {
        if let Some(session_id) = &self.session_id {
            config.session.session_id = Some(session_id.clone());
        }

        if let Some(user_agent) = &self.user_agent {
            config.session.user_agent = user_agent.clone();
        }

        if let Some(dir) = &self.download_directory {
            config.options.download_directory = Some(dir.clone());
        }

        if let Some(cooldown) = self.cooldown {
            config.options.cooldown_seconds = cooldown;
        }

        if let Some(limit) = self.limit {
            config.options.list_limit = limit;
        }

        if let Some(attempts) = self.max_attempts {
            config.options.asset_max_attempts = Some(attempts);
        }

        // Boolean flags (only override if set to non-default)
        if self.no_progress {
            config.options.show_progress = false;
        }

        if self.show_skipped {
            config.options.show_skipped = true;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positional_creator() {
        let args = Args::parse_from(["fanbox-archiver", "somecreator"]);
        assert_eq!(args.creator.as_deref(), Some("somecreator"));
        assert_eq!(args.config, PathBuf::from("config.toml"));
    }

    #[test]
    fn test_no_creator() {
        let args = Args::parse_from(["fanbox-archiver"]);
        assert!(args.creator.is_none());
    }

    #[test]
    fn test_merge_overrides() {
        let args = Args::parse_from([
            "fanbox-archiver",
            "somecreator",
            "--directory",
            "/archive",
            "--session-id",
            "12345_abcdef",
            "--cooldown",
            "0",
            "--limit",
            "20",
            "--no-progress",
        ]);
        let mut config = Config::default();
        args.merge_into_config(&mut config);

        assert_eq!(config.options.download_directory, Some(PathBuf::from("/archive")));
        assert_eq!(config.session.session_id.as_deref(), Some("12345_abcdef"));
        assert_eq!(config.options.cooldown_seconds, 0);
        assert_eq!(config.options.list_limit, 20);
        assert!(!config.options.show_progress);
        assert!(config.options.asset_max_attempts.is_none());
    }

    #[test]
    fn test_merge_keeps_config_when_flags_absent() {
        let args = Args::parse_from(["fanbox-archiver", "somecreator"]);
        let mut config = Config::default();
        config.options.cooldown_seconds = 7;
        config.options.show_skipped = true;
        args.merge_into_config(&mut config);

        assert_eq!(config.options.cooldown_seconds, 7);
        assert!(config.options.show_skipped);
        assert!(config.options.show_progress);
    }
}
