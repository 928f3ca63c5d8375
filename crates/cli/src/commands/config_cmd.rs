//! `arabot config` — Configuration helpers.

use arabot_config::AppConfig;
use clap::Subcommand;

#[derive(Debug, Clone, Copy, Default, Subcommand)]
pub enum ConfigAction {
    /// Print the default configuration as TOML
    #[default]
    Default,
    /// Print the config file location
    Path,
    /// Load and validate the effective configuration
    Validate,
}

pub fn run(action: ConfigAction) -> Result<(), Box<dyn std::error::Error>> {
    match action {
        ConfigAction::Default => print!("{}", AppConfig::default_toml()),
        ConfigAction::Path => println!("{}", config_path().display()),
        ConfigAction::Validate => validate()?,
    }
    Ok(())
}

fn config_path() -> std::path::PathBuf {
    std::env::var("ARABOT_CONFIG")
        .map(std::path::PathBuf::from)
        .unwrap_or_else(|_| AppConfig::config_dir().join("config.toml"))
}

fn validate() -> Result<(), Box<dyn std::error::Error>> {
    println!("Validating configuration...");

    match AppConfig::load() {
        Ok(config) => {
            println!("   ok  Config parsed and validated");
            println!();
            println!("   Backend:   {:?}", config.model.backend);
            println!("   Model:     {}", config.model.model_id);
            println!("   Summary:   {}", config.model.summary_model());
            println!(
                "   Gateway:   {}:{}",
                config.gateway.host, config.gateway.port
            );
            println!("   Storage:   {:?}", config.storage.backend);
        }
        Err(e) => {
            println!("   error  {e}");
            return Err(e.into());
        }
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn config_path_is_valid() {
        let path = AppConfig::config_dir().join("config.toml");
        assert!(path.to_str().unwrap().contains("config.toml"));
    }

    #[test]
    fn default_toml_round_trips() {
        let parsed: AppConfig = toml::from_str(&AppConfig::default_toml()).unwrap();
        assert_eq!(parsed.model.model_id, AppConfig::default().model.model_id);
        assert!(parsed.validate().is_ok());
    }
}
