//! Summary template commands.

use std::fmt::Write;

use eventdigest_core::SummaryTemplate;

use crate::commands::summary::find_template;
use crate::context::Context;
use crate::error::CliResult;

/// One line per template, the preferred one marked with `*`.
pub fn format_templates(templates: &[SummaryTemplate], preferred: &SummaryTemplate) -> String {
    let mut out = String::new();
    for template in templates {
        let marker = if template.name == preferred.name { '*' } else { ' ' };
        let _ = writeln!(out, "{} {}", marker, template.name);
    }
    out
}

pub fn list(ctx: &Context) -> CliResult<()> {
    let templates = ctx.config.summary_templates();
    print!("{}", format_templates(&templates, &ctx.app.template()));
    Ok(())
}

/// Stores the template used by `summary` from now on.
pub fn select(ctx: &Context, name: &str) -> CliResult<()> {
    let template = find_template(&ctx.config, name)?;
    ctx.app.preferences().set_summary_post_template(&template)?;
    println!("Summary template: {}", template.name);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    use eventdigest_app::{AppConfig, MemoryCache};

    #[test]
    fn marks_preferred() {
        let templates = SummaryTemplate::with_empty_first(&[SummaryTemplate::new("Weekly", "", "")]);
        let out = format_templates(&templates, &templates[1]);
        assert_eq!(out, "  Empty Post\n* Weekly\n");
    }

    #[test]
    fn select_persists_preference() {
        let mut config = AppConfig::default();
        config.templates.push(SummaryTemplate::new("Weekly", "Hi", "Bye"));
        let ctx = Context::with_cache(config, Arc::new(MemoryCache::new()));

        select(&ctx, "Weekly").unwrap();
        assert_eq!(ctx.app.template().name, "Weekly");
        assert!(select(&ctx, "Nope").is_err());
    }
}
