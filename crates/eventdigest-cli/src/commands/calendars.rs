//! Calendar commands.

use std::fmt::Write;

use eventdigest_app::Session;

use crate::context::Context;
use crate::error::{CliError, CliResult};

/// One line per calendar, the active one marked with `*`.
pub fn format_calendars(session: &Session) -> String {
    let mut out = String::new();
    for calendar in session.calendars() {
        let marker = if calendar == session.active_calendar() {
            '*'
        } else {
            ' '
        };
        let _ = writeln!(
            out,
            "{} {}  {} ({})",
            marker,
            calendar.id(),
            calendar.name(),
            calendar.kind()
        );
    }
    out
}

/// Lists the calendars known to the session.
pub fn list(ctx: &mut Context) -> CliResult<()> {
    let session = ctx.app.session().ok_or(CliError::NotLoggedIn)?;
    print!("{}", format_calendars(session));
    Ok(())
}

/// Reloads the calendars from the provider.
pub async fn refresh(ctx: &mut Context) -> CliResult<()> {
    let connection = ctx.connect().await?;
    if !ctx.app.refresh_calendars(&connection.source).await {
        return Err(CliError::provider("calendars unavailable"));
    }
    list(ctx)
}

/// Makes `calendar_id` the active calendar.
///
/// A restored session only knows its active calendar, so the list is
/// refreshed first when the id is not known yet.
pub async fn select(ctx: &mut Context, calendar_id: &str) -> CliResult<()> {
    let known = ctx
        .app
        .session()
        .ok_or(CliError::NotLoggedIn)?
        .calendars()
        .iter()
        .any(|calendar| calendar.id() == calendar_id);

    if !known {
        let connection = ctx.connect().await?;
        ctx.app.refresh_calendars(&connection.source).await;
    }

    ctx.app.select_calendar(calendar_id)?;
    println!("Active calendar: {calendar_id}");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use eventdigest_app::{AppConfig, MemoryCache};
    use eventdigest_core::{Calendar, CalendarKind};

    #[test]
    fn marks_active_calendar() {
        let mut ctx = Context::with_cache(AppConfig::default(), Arc::new(MemoryCache::new()));
        ctx.app.sessions().create(vec![
            Calendar::new("123", "Jazz Club", CalendarKind::Facebook),
            Calendar::new("456", "Blues Bar", CalendarKind::Facebook),
        ]);
        ctx.app.select_calendar("456").unwrap();

        let session = ctx.app.session().unwrap();
        assert_eq!(
            format_calendars(session),
            "  123  Jazz Club (facebook)\n* 456  Blues Bar (facebook)\n"
        );
    }

    #[test]
    fn list_requires_session() {
        let mut ctx = Context::with_cache(AppConfig::default(), Arc::new(MemoryCache::new()));
        assert!(matches!(list(&mut ctx), Err(CliError::NotLoggedIn)));
    }
}
