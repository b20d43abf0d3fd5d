//! Digest rendering and publishing.

use chrono::{DateTime, Utc};
use eventdigest_app::{AppConfig, DigestRange};
use eventdigest_core::SummaryTemplate;
use eventdigest_providers::CalendarService;
use tracing::{debug, info};

use crate::cli::SummaryArgs;
use crate::context::Context;
use crate::error::{CliError, CliResult};

/// Default window length when only a start is given.
const DEFAULT_RANGE_DAYS: u32 = 7;

/// Picks the digest window from the flags, then the configuration, then the
/// Thursday to Wednesday week.
pub fn resolve_range(
    since: Option<DateTime<Utc>>,
    days: Option<u32>,
    config: &AppConfig,
    now: DateTime<Utc>,
) -> CliResult<DigestRange> {
    let days = days.or(config.digest.range_days);
    let (since, days) = match (since, days) {
        (Some(since), days) => (since, days.unwrap_or(DEFAULT_RANGE_DAYS)),
        (None, Some(days)) => (now, days),
        (None, None) => return Ok(DigestRange::upcoming_week()),
    };
    DigestRange::days_from(since, days)
        .ok_or_else(|| CliError::usage(format!("a {days} day window from {since} is out of range")))
}

/// Looks a template up by name among the configured ones.
pub fn find_template(config: &AppConfig, name: &str) -> CliResult<SummaryTemplate> {
    let templates = config.summary_templates();
    templates
        .iter()
        .find(|template| template.name == name)
        .cloned()
        .ok_or_else(|| {
            let names: Vec<_> = templates.iter().map(|t| t.name.as_str()).collect();
            CliError::usage(format!(
                "unknown template '{}', expected one of: {}",
                name,
                names.join(", ")
            ))
        })
}

/// Prints the digest of the active calendar and publishes it on request.
pub async fn run(ctx: &mut Context, args: SummaryArgs) -> CliResult<()> {
    if let Some(ref name) = args.template {
        let template = find_template(&ctx.config, name)?;
        ctx.app.preferences().set_summary_post_template(&template)?;
    }

    let connection = ctx.connect().await?;
    let range = resolve_range(args.since, args.days, &ctx.config, Utc::now())?;
    debug!(since = %range.since, until = %range.until, "digest range");

    let mut post = ctx
        .app
        .build_post(&connection.source, range.since, range.until)
        .await
        .ok_or_else(|| CliError::provider("events unavailable"))?;
    if let Some(photo) = args.photo {
        post = post.with_image_url(photo);
    }

    let text = ctx.app.render(&post);
    print!("{text}");

    if !args.publish {
        return Ok(());
    }

    let CalendarService::Facebook(ref facebook) = connection.source else {
        return Err(CliError::usage("only Facebook pages can be published to"));
    };
    let page_id = ctx
        .app
        .session()
        .map(|session| session.active_calendar().id().to_string())
        .ok_or(CliError::NotLoggedIn)?;

    if !facebook
        .publish_summary(&page_id, &text, post.image_url.clone(), args.schedule)
        .await
    {
        return Err(CliError::provider("publishing failed"));
    }

    info!(page_id = %page_id, scheduled = args.schedule.is_some(), "digest published");
    match args.schedule {
        Some(at) => eprintln!("Scheduled for {}.", at.to_rfc3339()),
        None => eprintln!("Published."),
    }
    Ok(())
}
