//! eventdigest CLI entry point.

use std::process::ExitCode;

use clap::Parser;
use tracing::warn;

use eventdigest_app::AppConfig;
use eventdigest_cli::cli::{CalendarAction, Cli, Command, ConfigAction, PhotoAction, TemplateAction};
use eventdigest_cli::commands;
use eventdigest_cli::{CliResult, Context};
use eventdigest_core::{TracingConfig, init_tracing};

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = Cli::parse();

    if let Err(e) = init_tracing(TracingConfig::for_cli(cli.debug)) {
        eprintln!("warning: {}", e);
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("error: {}", e);
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> CliResult<()> {
    let config = if let Some(ref path) = cli.config {
        AppConfig::load_from(path)?
    } else {
        AppConfig::load().unwrap_or_else(|e| {
            warn!(error = %e, "ignoring unreadable configuration");
            AppConfig::default()
        })
    };

    if let Command::Config { ref action } = cli.command {
        return match action {
            ConfigAction::Dump => commands::config::dump(&config),
            ConfigAction::Validate => commands::config::validate(&config),
            ConfigAction::Path => commands::config::path(),
        };
    }

    let mut ctx = Context::open(config)?;
    match cli.command {
        Command::Login { provider } => commands::auth::login(&mut ctx, provider.into()).await,
        Command::Logout => commands::auth::logout(&mut ctx).await,
        Command::Calendars { action } => match action {
            CalendarAction::List => commands::calendars::list(&mut ctx),
            CalendarAction::Refresh => commands::calendars::refresh(&mut ctx).await,
            CalendarAction::Use { calendar_id } => {
                commands::calendars::select(&mut ctx, &calendar_id).await
            }
        },
        Command::Summary(args) => commands::summary::run(&mut ctx, args).await,
        Command::Templates { action } => match action {
            TemplateAction::List => commands::templates::list(&ctx),
            TemplateAction::Use { name } => commands::templates::select(&ctx, &name),
        },
        Command::Photos { action } => match action {
            PhotoAction::Albums => commands::photos::albums(&ctx).await,
            PhotoAction::Fetch { album_id } => commands::photos::fetch(&ctx, &album_id).await,
            PhotoAction::Browse {
                batches,
                page_size,
                hide,
            } => commands::photos::browse(&ctx, batches, page_size, &hide).await,
        },
        Command::Config { .. } => Ok(()),
    }
}
