//! Login and logout.

use eventdigest_core::CalendarKind;
use tracing::info;

use crate::commands::calendars::format_calendars;
use crate::context::Context;
use crate::error::{CliError, CliResult};

/// Signs in with the provider and starts a session over its calendars.
pub async fn login(ctx: &mut Context, kind: CalendarKind) -> CliResult<()> {
    let login = ctx.login_for(kind);
    let source = ctx.calendar_service(kind, login.clone());

    if !ctx.app.log_in(login.as_ref(), &source).await {
        return Err(CliError::provider(format!(
            "could not log in to {} (is {} set to a valid token?)",
            kind.display_name(),
            login.env_var()
        )));
    }

    info!(provider = %kind, "session started");
    println!("Logged in to {}.", kind.display_name());
    if let Some(session) = ctx.app.session() {
        print!("{}", format_calendars(session));
    }
    Ok(())
}

/// Signs out of the session's provider and forgets the session.
pub async fn logout(ctx: &mut Context) -> CliResult<()> {
    let kind = ctx
        .app
        .session()
        .map(|session| session.active_calendar().kind());

    match kind {
        Some(kind) => {
            let login = ctx.login_for(kind);
            ctx.app.log_out(login.as_ref()).await;
        }
        None => ctx.app.sessions().clear(),
    }

    println!("Logged out.");
    Ok(())
}
