mod settings;

use config::{Config, ConfigError, Environment, File};

pub use settings::{
    BrokerSettings, LoggingSettings, PartialBrokerSettings, PartialLoggingSettings,
    PartialSettings, Settings,
};

/// Environment variable prefix, e.g. `BROKERLINE_BROKER__PORT=9000`.
pub const ENV_PREFIX: &str = "BROKERLINE";

/// Loads the configuration from `.env`, the default file and environment variables
/// Merges the configuration with default values and rejects a zero read timeout
pub fn load_config() -> Result<Settings, ConfigError> {
    let _ = dotenvy::dotenv();

    let builder = Config::builder()
        .add_source(File::with_name("config/default").required(false))
        .add_source(
            Environment::with_prefix(ENV_PREFIX)
                .prefix_separator("_")
                .separator("__")
                .try_parsing(true),
        );

    let config = builder.build()?;

    // Try to deserialize what is available
    let partial: PartialSettings = config.try_deserialize()?;

    let settings = Settings::merge(partial);
    settings.validate()?;
    Ok(settings)
}
