//! Server configuration (command line, with environment fallbacks).

use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use clap::Parser;

use ivx_catalog::simulator::{DEFAULT_FAILURE_RATE, SimulationConfig};
use ivx_catalog::{Catalog, CatalogError};
use ivx_observability::LogFormat;

/// Command-line arguments for `ivx-api`.
#[derive(Parser, Debug, Clone)]
#[command(name = "ivx-api")]
#[command(about = "IVX product shelf API")]
#[command(version)]
pub struct ServerConfig {
    /// Address to listen on
    #[arg(long, default_value = "0.0.0.0:8080", env = "IVX_BIND")]
    pub bind: SocketAddr,

    /// JSON catalog file replacing the built-in seed catalog
    #[arg(long, env = "IVX_CATALOG")]
    pub catalog: Option<PathBuf>,

    /// Probability that a shelf fetch fails with an injected network error
    #[arg(long, default_value_t = DEFAULT_FAILURE_RATE, env = "IVX_FAILURE_RATE")]
    pub failure_rate: f64,

    /// Lower bound of the injected shelf fetch delay
    #[arg(long, default_value_t = 300, env = "IVX_MIN_DELAY_MS")]
    pub min_delay_ms: u64,

    /// Upper bound of the injected shelf fetch delay
    #[arg(long, default_value_t = 800, env = "IVX_MAX_DELAY_MS")]
    pub max_delay_ms: u64,

    /// Fixed seed for the failure/latency simulator
    #[arg(long, env = "IVX_SEED")]
    pub seed: Option<u64>,

    /// Serve shelves straight from the catalog (no delay, no injected failures)
    #[arg(long, env = "IVX_NO_SIMULATION")]
    pub no_simulation: bool,

    /// Log output format: json or pretty
    #[arg(long, default_value = "json", env = "IVX_LOG_FORMAT")]
    pub log_format: LogFormat,
}

impl ServerConfig {
    /// Simulator settings, or `None` when simulation is switched off.
    pub fn simulation(&self) -> Option<SimulationConfig> {
        if self.no_simulation {
            return None;
        }
        Some(SimulationConfig {
            min_delay: Duration::from_millis(self.min_delay_ms),
            max_delay: Duration::from_millis(self.max_delay_ms),
            failure_rate: self.failure_rate,
            seed: self.seed,
        })
    }

    pub fn load_catalog(&self) -> Result<Arc<Catalog>, CatalogError> {
        match &self.catalog {
            Some(path) => Ok(Arc::new(Catalog::from_json_file(path)?)),
            None => Ok(Catalog::builtin()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_simulator_defaults() {
        let cfg = ServerConfig::parse_from(["ivx-api"]);
        assert_eq!(cfg.bind, "0.0.0.0:8080".parse::<SocketAddr>().unwrap());
        assert_eq!(cfg.simulation(), Some(SimulationConfig::default()));
        assert_eq!(cfg.log_format, LogFormat::Json);
        assert_eq!(cfg.load_catalog().unwrap().len(), 16);
    }

    #[test]
    fn no_simulation_flag_disables_simulator() {
        let cfg = ServerConfig::parse_from(["ivx-api", "--no-simulation"]);
        assert_eq!(cfg.simulation(), None);
    }

    #[test]
    fn simulation_flags_are_applied() {
        let cfg = ServerConfig::parse_from([
            "ivx-api",
            "--failure-rate",
            "0.5",
            "--min-delay-ms",
            "0",
            "--max-delay-ms",
            "10",
            "--seed",
            "9",
            "--log-format",
            "pretty",
        ]);
        let sim = cfg.simulation().unwrap();
        assert_eq!(sim.failure_rate, 0.5);
        assert_eq!(sim.max_delay, Duration::from_millis(10));
        assert_eq!(sim.seed, Some(9));
        assert_eq!(cfg.log_format, LogFormat::Pretty);
    }

    #[test]
    fn unknown_log_format_is_rejected() {
        assert!(ServerConfig::try_parse_from(["ivx-api", "--log-format", "xml"]).is_err());
    }
}
