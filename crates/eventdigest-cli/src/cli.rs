//! Command-line interface definition.

use std::path::PathBuf;

use chrono::{DateTime, Local, NaiveDate, NaiveTime, Utc};
use clap::{Args, Parser, Subcommand, ValueEnum};
use eventdigest_core::{CalendarKind, local_instant};
use url::Url;

/// eventdigest - Weekly event digests from your calendars
#[derive(Debug, Parser)]
#[command(name = "eventdigest")]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Path to configuration file
    #[arg(long, short, env = "EVENTDIGEST_CONFIG")]
    pub config: Option<PathBuf>,

    /// Enable debug output
    #[arg(long, short = 'v')]
    pub debug: bool,

    #[command(subcommand)]
    pub command: Command,
}

/// Available commands.
#[derive(Debug, Subcommand)]
pub enum Command {
    /// Log in with a provider and start a session
    Login {
        #[arg(value_enum)]
        provider: Provider,
    },

    /// Log out and forget the session
    Logout,

    /// Calendar commands
    Calendars {
        #[command(subcommand)]
        action: CalendarAction,
    },

    /// Print (and optionally publish) the digest of the active calendar
    Summary(SummaryArgs),

    /// Summary template commands
    Templates {
        #[command(subcommand)]
        action: TemplateAction,
    },

    /// Google Photos commands
    Photos {
        #[command(subcommand)]
        action: PhotoAction,
    },

    /// Configuration commands
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

/// Event providers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum Provider {
    Facebook,
    Google,
}

impl From<Provider> for CalendarKind {
    fn from(provider: Provider) -> Self {
        match provider {
            Provider::Facebook => CalendarKind::Facebook,
            Provider::Google => CalendarKind::Google,
        }
    }
}

/// Calendar actions.
#[derive(Debug, Subcommand)]
pub enum CalendarAction {
    /// List the calendars of the session
    List,

    /// Reload the calendar list from the provider
    Refresh,

    /// Make a calendar the active one
    Use { calendar_id: String },
}

/// Digest options.
#[derive(Debug, Args)]
pub struct SummaryArgs {
    /// Start of the window (RFC 3339 or YYYY-MM-DD). Defaults to the next
    /// Thursday noon
    #[arg(long, value_parser = parse_instant)]
    pub since: Option<DateTime<Utc>>,

    /// Length of the window in days
    #[arg(long)]
    pub days: Option<u32>,

    /// Render with this template and remember it
    #[arg(long)]
    pub template: Option<String>,

    /// Photo to attach to the post
    #[arg(long)]
    pub photo: Option<Url>,

    /// Publish the digest on the Facebook page
    #[arg(long)]
    pub publish: bool,

    /// Schedule the published post (RFC 3339 or YYYY-MM-DD)
    #[arg(long, value_parser = parse_instant, requires = "publish")]
    pub schedule: Option<DateTime<Utc>>,
}

/// Template actions.
#[derive(Debug, Subcommand)]
pub enum TemplateAction {
    /// List templates, marking the preferred one
    List,

    /// Set the preferred template
    Use { name: String },
}

/// Photo actions.
#[derive(Debug, Subcommand)]
pub enum PhotoAction {
    /// List albums
    Albums,

    /// Fetch every photo of an album and print their URLs
    Fetch { album_id: String },

    /// Fetch photos in batches across albums
    Browse {
        /// Number of batches to fetch
        #[arg(long, default_value = "1")]
        batches: usize,

        /// Photos per batch (defaults to the configured page size)
        #[arg(long)]
        page_size: Option<usize>,

        /// Albums to leave out (can be repeated)
        #[arg(long, action = clap::ArgAction::Append)]
        hide: Vec<String>,
    },
}

/// Configuration actions.
#[derive(Debug, Subcommand)]
pub enum ConfigAction {
    /// Dump current configuration
    Dump,

    /// Validate configuration
    Validate,

    /// Show configuration file path
    Path,
}

/// Parses an RFC 3339 timestamp or a local `YYYY-MM-DD` date (midnight).
pub fn parse_instant(value: &str) -> Result<DateTime<Utc>, String> {
    if let Ok(instant) = DateTime::parse_from_rfc3339(value) {
        return Ok(instant.with_timezone(&Utc));
    }
    let date = NaiveDate::parse_from_str(value, "%Y-%m-%d")
        .map_err(|_| format!("invalid date '{value}', expected RFC 3339 or YYYY-MM-DD"))?;
    local_instant(&Local, date, NaiveTime::MIN)
        .ok_or_else(|| format!("'{value}' has no local midnight"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use clap::CommandFactory;

    #[test]
    fn verify_cli() {
        Cli::command().debug_assert();
    }

    #[test]
    fn parses_rfc3339() {
        assert_eq!(
            parse_instant("2024-06-06T12:00:00+02:00").unwrap(),
            Utc.with_ymd_and_hms(2024, 6, 6, 10, 0, 0).unwrap()
        );
    }

    #[test]
    fn parses_plain_date_as_local_midnight() {
        let instant = parse_instant("2024-06-06").unwrap();
        let local = instant.with_timezone(&Local);
        assert_eq!(local.date_naive(), NaiveDate::from_ymd_opt(2024, 6, 6).unwrap());
        assert_eq!(local.time(), NaiveTime::MIN);
    }

    #[test]
    fn rejects_garbage() {
        assert!(parse_instant("next thursday").is_err());
    }

    #[test]
    fn summary_flags() {
        let cli = Cli::try_parse_from([
            "eventdigest",
            "summary",
            "--days",
            "3",
            "--publish",
            "--schedule",
            "2024-06-06T12:00:00Z",
        ])
        .unwrap();
        let Command::Summary(args) = cli.command else {
            panic!("expected summary");
        };
        assert_eq!(args.days, Some(3));
        assert!(args.publish);
        assert!(args.schedule.is_some());
    }

    #[test]
    fn schedule_requires_publish() {
        assert!(Cli::try_parse_from(["eventdigest", "summary", "--schedule", "2024-06-06"]).is_err());
    }

    #[test]
    fn browse_collects_hidden_albums() {
        let cli = Cli::try_parse_from([
            "eventdigest", "photos", "browse", "--batches", "2", "--hide", "a", "--hide", "b",
        ])
        .unwrap();
        let Command::Photos {
            action: PhotoAction::Browse { batches, hide, page_size },
        } = cli.command
        else {
            panic!("expected photos browse");
        };
        assert_eq!(batches, 2);
        assert_eq!(hide, ["a", "b"]);
        assert!(page_size.is_none());
    }

    #[test]
    fn provider_maps_to_kind() {
        let cli = Cli::try_parse_from(["eventdigest", "login", "google"]).unwrap();
        let Command::Login { provider } = cli.command else {
            panic!("expected login");
        };
        assert_eq!(CalendarKind::from(provider), CalendarKind::Google);
    }
}
