use std::env;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};

use crate::generator::GeneratorConfig;
use crate::optimizer::PackingConfig;

/// Complete application configuration, loaded from environment variables
/// or default values.
#[derive(Clone, Debug)]
pub struct AppConfig {
    pub api: ApiConfig,
    pub optimizer: OptimizerConfig,
    pub generator: GeneratorConfig,
}

impl AppConfig {
    /// Creates a configuration from the currently available environment
    /// variables.
    pub fn from_env() -> Self {
        Self {
            api: ApiConfig::from_env(),
            optimizer: OptimizerConfig::from_env(),
            generator: generator_config_from_env(),
        }
    }
}

/// Configuration for the API server.
#[derive(Clone, Debug)]
pub struct ApiConfig {
    bind_ip: IpAddr,
    display_host: String,
    port: u16,
}

impl ApiConfig {
    const DEFAULT_HOST: &'static str = "0.0.0.0";
    const DEFAULT_PORT: u16 = 8080;

    fn from_env() -> Self {
        let host_value =
            env_string("GRIDSTOW_API_HOST").unwrap_or_else(|| Self::DEFAULT_HOST.to_string());
        let (bind_ip, display_host) = match host_value.parse::<IpAddr>() {
            Ok(ip) => (ip, host_value),
            Err(err) => {
                eprintln!(
                    "⚠️ Could not parse GRIDSTOW_API_HOST ('{}'): {}. Using {}.",
                    host_value,
                    err,
                    Self::DEFAULT_HOST
                );
                (
                    IpAddr::V4(Ipv4Addr::UNSPECIFIED),
                    Self::DEFAULT_HOST.to_string(),
                )
            }
        };

        let port = match env_string("GRIDSTOW_API_PORT") {
            Some(raw) => match raw.parse::<u16>() {
                Ok(value) if value != 0 => value,
                Ok(_) => {
                    eprintln!(
                        "⚠️ GRIDSTOW_API_PORT must not be 0. Using {}.",
                        Self::DEFAULT_PORT
                    );
                    Self::DEFAULT_PORT
                }
                Err(err) => {
                    eprintln!(
                        "⚠️ Could not parse GRIDSTOW_API_PORT ('{}'): {}. Using {}.",
                        raw,
                        err,
                        Self::DEFAULT_PORT
                    );
                    Self::DEFAULT_PORT
                }
            },
            None => Self::DEFAULT_PORT,
        };

        Self {
            bind_ip,
            display_host,
            port,
        }
    }

    /// Socket address to bind the server to.
    pub fn socket_addr(&self) -> SocketAddr {
        SocketAddr::new(self.bind_ip, self.port)
    }

    /// Visible hostname for logging and hints.
    pub fn display_host(&self) -> &str {
        &self.display_host
    }

    /// Configured port.
    pub fn port(&self) -> u16 {
        self.port
    }

    /// Indicates whether the server binds to all interfaces.
    pub fn binds_to_all_interfaces(&self) -> bool {
        match self.bind_ip {
            IpAddr::V4(addr) => addr == Ipv4Addr::UNSPECIFIED,
            IpAddr::V6(addr) => addr == Ipv6Addr::UNSPECIFIED,
        }
    }
}

/// Configuration for the placement engine.
#[derive(Clone, Debug)]
pub struct OptimizerConfig {
    packing: PackingConfig,
}

impl OptimizerConfig {
    const AUTO_EXPAND_VAR: &'static str = "GRIDSTOW_PACKING_AUTO_EXPAND";
    const LOAD_FACTOR_VAR: &'static str = "GRIDSTOW_PACKING_EXPAND_LOAD_FACTOR";
    const HEADROOM_VAR: &'static str = "GRIDSTOW_PACKING_EXPAND_HEADROOM";
    const MAX_GRID_SIZE_VAR: &'static str = "GRIDSTOW_PACKING_MAX_GRID_SIZE";

    fn from_env() -> Self {
        let auto_expand = env_string(Self::AUTO_EXPAND_VAR)
            .and_then(|raw| parse_bool(&raw, Self::AUTO_EXPAND_VAR))
            .unwrap_or(PackingConfig::DEFAULT_AUTO_EXPAND);

        let expand_load_factor = load_f64_with_warning(
            Self::LOAD_FACTOR_VAR,
            PackingConfig::DEFAULT_EXPAND_LOAD_FACTOR,
            |value| (0.0..=1.0).contains(&value),
            "must be between 0 and 1",
            "Warning: Adjusted load factor changes when grids grow",
        );

        let expand_headroom = load_f64_with_warning(
            Self::HEADROOM_VAR,
            PackingConfig::DEFAULT_EXPAND_HEADROOM,
            |value| value >= 1.0,
            "must be at least 1",
            "Warning: Adjusted headroom changes expanded grid sizes",
        );

        let max_grid_size = load_usize_with_warning(
            Self::MAX_GRID_SIZE_VAR,
            PackingConfig::DEFAULT_MAX_GRID_SIZE,
            |value| value > 0,
            "must be at least 1",
        );

        let packing = PackingConfig::builder()
            .auto_expand(auto_expand)
            .expand_load_factor(expand_load_factor)
            .expand_headroom(expand_headroom)
            .max_grid_size(max_grid_size)
            .build();

        Self { packing }
    }

    /// Returns the configured PackingConfig.
    pub fn packing_config(&self) -> PackingConfig {
        self.packing
    }
}

const GENERATOR_MIN_COUNT_VAR: &str = "GRIDSTOW_GENERATOR_MIN_COUNT";
const GENERATOR_MAX_COUNT_VAR: &str = "GRIDSTOW_GENERATOR_MAX_COUNT";
const GENERATOR_MAX_DIMENSION_VAR: &str = "GRIDSTOW_GENERATOR_MAX_DIMENSION";
const GENERATOR_DEFECT_RATE_VAR: &str = "GRIDSTOW_GENERATOR_DEFECT_RATE";

fn generator_config_from_env() -> GeneratorConfig {
    let min_count = load_usize_with_warning(
        GENERATOR_MIN_COUNT_VAR,
        GeneratorConfig::DEFAULT_MIN_COUNT,
        |value| value > 0,
        "must be at least 1",
    );

    let mut max_count = load_usize_with_warning(
        GENERATOR_MAX_COUNT_VAR,
        GeneratorConfig::DEFAULT_MAX_COUNT,
        |value| value > 0,
        "must be at least 1",
    );
    if max_count < min_count {
        eprintln!(
            "⚠️ {} is below {}. Raising it to {}.",
            GENERATOR_MAX_COUNT_VAR, GENERATOR_MIN_COUNT_VAR, min_count
        );
        max_count = min_count;
    }

    let max_dimension = load_usize_with_warning(
        GENERATOR_MAX_DIMENSION_VAR,
        GeneratorConfig::DEFAULT_MAX_DIMENSION,
        |value| value > 0,
        "must be at least 1",
    );

    let defect_rate = load_f64_with_warning(
        GENERATOR_DEFECT_RATE_VAR,
        GeneratorConfig::DEFAULT_DEFECT_RATE,
        |value| (0.0..=1.0).contains(&value),
        "must be between 0 and 1",
        "Warning: Adjusted defect rate changes generated fleets",
    );

    GeneratorConfig {
        min_count,
        max_count,
        max_dimension,
        defect_rate,
    }
}

fn env_string(name: &str) -> Option<String> {
    match env::var(name) {
        Ok(value) => {
            let trimmed = value.trim();
            if trimmed.is_empty() {
                None
            } else {
                Some(trimmed.to_owned())
            }
        }
        Err(env::VarError::NotPresent) => None,
        Err(err) => {
            eprintln!(
                "⚠️ Access to {} failed: {}. Using default value.",
                name, err
            );
            None
        }
    }
}

fn parse_bool(raw: &str, var_name: &str) -> Option<bool> {
    match raw.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "y" | "on" => Some(true),
        "0" | "false" | "no" | "n" | "off" => Some(false),
        other => {
            eprintln!(
                "⚠️ Could not interpret {} ('{}') as boolean value. Using default value.",
                var_name, other
            );
            None
        }
    }
}

fn load_f64_with_warning(
    var_name: &str,
    default: f64,
    validator: impl Fn(f64) -> bool,
    invalid_hint: &str,
    warning: &str,
) -> f64 {
    match env_string(var_name) {
        Some(raw) => match raw.parse::<f64>() {
            Ok(value) => {
                if !validator(value) {
                    eprintln!(
                        "⚠️ {} contains invalid value '{}': {}. Using {}.",
                        var_name, raw, invalid_hint, default
                    );
                    default
                } else {
                    let tolerance = (default.abs().max(1.0)) * 1e-9;
                    if (value - default).abs() > tolerance {
                        println!("⚠️ {} ({} = {}).", warning, var_name, value);
                    }
                    value
                }
            }
            Err(err) => {
                eprintln!(
                    "⚠️ Could not parse {} ('{}') as number: {}. Using {}.",
                    var_name, raw, err, default
                );
                default
            }
        },
        None => default,
    }
}

fn load_usize_with_warning(
    var_name: &str,
    default: usize,
    validator: impl Fn(usize) -> bool,
    invalid_hint: &str,
) -> usize {
    match env_string(var_name) {
        Some(raw) => match raw.parse::<usize>() {
            Ok(value) if validator(value) => value,
            Ok(value) => {
                eprintln!(
                    "⚠️ {} contains invalid value '{}': {}. Using {}.",
                    var_name, value, invalid_hint, default
                );
                default
            }
            Err(err) => {
                eprintln!(
                    "⚠️ Could not parse {} ('{}') as number: {}. Using {}.",
                    var_name, raw, err, default
                );
                default
            }
        },
        None => default,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_bool_true_values() {
        assert_eq!(parse_bool("1", "TEST_VAR"), Some(true));
        assert_eq!(parse_bool("true", "TEST_VAR"), Some(true));
        assert_eq!(parse_bool("yes", "TEST_VAR"), Some(true));
        assert_eq!(parse_bool("on", "TEST_VAR"), Some(true));
        assert_eq!(parse_bool("TRUE", "TEST_VAR"), Some(true));
        assert_eq!(parse_bool(" true ", "TEST_VAR"), Some(true));
    }

    #[test]
    fn test_parse_bool_false_values() {
        assert_eq!(parse_bool("0", "TEST_VAR"), Some(false));
        assert_eq!(parse_bool("false", "TEST_VAR"), Some(false));
        assert_eq!(parse_bool("no", "TEST_VAR"), Some(false));
        assert_eq!(parse_bool("OFF", "TEST_VAR"), Some(false));
        assert_eq!(parse_bool("  0  ", "TEST_VAR"), Some(false));
    }

    #[test]
    fn test_parse_bool_invalid_values() {
        assert_eq!(parse_bool("invalid", "TEST_VAR"), None);
        assert_eq!(parse_bool("2", "TEST_VAR"), None);
        assert_eq!(parse_bool("", "TEST_VAR"), None);
    }

    #[test]
    fn defaults_apply_without_env() {
        // Default-constructed sections mirror the engine constants.
        let packing = PackingConfig::default();
        assert!(packing.auto_expand);
        assert_eq!(packing.max_grid_size, 50);

        let generator = GeneratorConfig::default();
        assert_eq!(generator.min_count, 3);
        assert_eq!(generator.max_count, 10);
    }
}
