use serde::Deserialize;

/// Settings of the flight generator service.
#[derive(Debug, Deserialize, Clone)]
pub struct ProviderConfig {
    pub port: u16,
    /// Batch size is drawn from `[min, max)`.
    pub min: usize,
    pub max: usize,
    /// Prices are whole numbers in `[min_price, max_price)`.
    pub min_price: f64,
    pub max_price: f64,
    #[serde(default = "default_range")]
    pub date_range: u32,
    #[serde(default = "default_range")]
    pub return_date_range: u32,
}

fn default_range() -> u32 {
    20
}

impl ProviderConfig {
    pub fn load() -> Result<Self, config::ConfigError> {
        let s = config::Config::builder()
            .add_source(config::File::with_name("config/provider"))
            .add_source(config::File::with_name("config/provider-local").required(false))
            // e.g. `FLIGHTDESK_PROVIDER__PORT=9090`
            .add_source(config::Environment::with_prefix("FLIGHTDESK_PROVIDER").separator("__"))
            .build()?;

        s.try_deserialize()
    }
}
