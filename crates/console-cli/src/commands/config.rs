use anyhow::Result;
use console_infrastructure::ConfigService;

use crate::context::AppContext;

/// Writes a default config file unless one exists, then prints its path.
pub fn init(ctx: &AppContext) -> Result<()> {
    let path = ConfigService::new(&ctx.paths)?.ensure_config_file()?;
    println!("{}", path.display());
    Ok(())
}

/// Prints the effective configuration (file plus environment overrides).
pub fn show(ctx: &AppContext) -> Result<()> {
    let mut config = ctx.config.clone();
    if config.api.token.is_some() {
        config.api.token = Some("********".to_string());
    }
    print!("{}", toml::to_string_pretty(&config)?);
    Ok(())
}
