//! `arabot serve` — Start the HTTP gateway.

use arabot_config::AppConfig;

pub async fn run(port_override: Option<u16>) -> Result<(), Box<dyn std::error::Error>> {
    let mut config = AppConfig::load().map_err(|e| format!("Failed to load config: {e}"))?;

    if let Some(port) = port_override {
        config.gateway.port = port;
    }

    println!("Arabot Gateway");
    println!("   Listening: {}:{}", config.gateway.host, config.gateway.port);
    println!("   Model:     {}", config.model.model_id);
    println!("   Routes:    /health, /slack/events, /storage/events");

    arabot_gateway::start(config).await?;

    Ok(())
}
