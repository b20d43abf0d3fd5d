//! Configuration commands.

use std::collections::HashSet;

use eventdigest_app::AppConfig;

use crate::error::{CliError, CliResult};

/// Dump the current configuration to stdout.
pub fn dump(config: &AppConfig) -> CliResult<()> {
    let toml_str = config.to_toml()?;
    println!("# config.toml ({})", AppConfig::default_path().display());
    println!("{}", toml_str);
    Ok(())
}

/// Problems that make `config` unusable, empty when it is valid.
pub fn problems(config: &AppConfig) -> Vec<String> {
    let mut problems = Vec::new();

    if config.photos.page_size == 0 {
        problems.push("photos.page_size must be at least 1".to_string());
    }
    if config.digest.range_days == Some(0) {
        problems.push("digest.range_days must be at least 1".to_string());
    }
    if config.providers.timeout == 0 {
        problems.push("providers.timeout must be at least 1 second".to_string());
    }
    for (key, value) in [
        ("providers.facebook_token_env", &config.providers.facebook_token_env),
        ("providers.google_token_env", &config.providers.google_token_env),
    ] {
        if value.trim().is_empty() {
            problems.push(format!("{key} must name an environment variable"));
        }
    }

    let mut names = HashSet::new();
    for template in &config.templates {
        if template.name.trim().is_empty() {
            problems.push("templates must have a name".to_string());
        } else if !names.insert(template.name.as_str()) {
            problems.push(format!("template '{}' is defined twice", template.name));
        }
    }

    problems
}

/// Validate the configuration.
pub fn validate(config: &AppConfig) -> CliResult<()> {
    let problems = problems(config);
    if !problems.is_empty() {
        return Err(CliError::usage(format!(
            "invalid configuration:\n  {}",
            problems.join("\n  ")
        )));
    }

    println!("Configuration is valid.");
    Ok(())
}

/// Show the configuration file path.
pub fn path() -> CliResult<()> {
    println!("config: {}", AppConfig::default_path().display());
    println!("cache: {}", AppConfig::default().cache_path().display());
    Ok(())
}
