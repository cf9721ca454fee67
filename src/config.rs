use crate::errors::{EngineError, EngineResult};
use crate::models::{MarketParameters, OptionSpec};
use crate::report::display::DisplayOptions;
use crate::risk::{PortfolioPreset, SimulationConfig};
use clap::error::ErrorKind;
use clap::Parser;
use std::ffi::OsString;
use std::path::PathBuf;

/// Command-line flags. Every numeric flag can also come from the
/// environment (or a `.env` file) under its `RISK_*` name.
#[derive(Debug, Clone, Parser)]
#[command(name = "mc_var", version, about = "Monte Carlo VaR/ES for a Black-Scholes call/put portfolio")]
pub struct Cli {
    /// Annualized volatility
    #[arg(short = 'v', long = "vol", env = "RISK_VOL", default_value_t = 0.4)]
    pub vol: f64,

    /// Spot price of the underlying
    #[arg(short = 's', long, env = "RISK_SPOT", default_value_t = 100.0)]
    pub spot: f64,

    /// Real-world drift used for simulation
    #[arg(short = 'm', long, alias = "miu", env = "RISK_DRIFT", default_value_t = 0.1)]
    pub drift: f64,

    /// Risk-free rate used for pricing
    #[arg(short = 'r', long, env = "RISK_RATE", default_value_t = 0.05)]
    pub rate: f64,

    #[arg(long = "k-call", env = "RISK_K_CALL", default_value_t = 105.0)]
    pub k_call: f64,

    #[arg(long = "k-put", env = "RISK_K_PUT", default_value_t = 95.0)]
    pub k_put: f64,

    /// Time to expiry of both legs, in years
    #[arg(short = 't', long = "time-to-expiry", env = "RISK_EXPIRY", default_value_t = 10.0)]
    pub time_to_expiry: f64,

    /// Risk horizon in years
    #[arg(long, env = "RISK_HORIZON", default_value_t = 1.0)]
    pub horizon: f64,

    #[arg(short = 'c', long, env = "RISK_CONFIDENCE", default_value_t = 0.95)]
    pub confidence: f64,

    #[arg(short = 'n', long, alias = "num-of-trials", env = "RISK_TRIALS", default_value_t = 10_000)]
    pub trials: usize,

    /// Seed for reproducible runs
    #[arg(long, env = "RISK_SEED")]
    pub seed: Option<u64>,

    #[arg(long, value_enum, env = "RISK_PORTFOLIO", default_value_t = PortfolioPreset::PutMinusCall)]
    pub portfolio: PortfolioPreset,

    /// Save the loss histogram (HTML) to this path
    #[arg(short = 'f', long = "save-path")]
    pub save_path: Option<PathBuf>,

    #[arg(short = 'b', long, alias = "display-bins", default_value_t = 100)]
    pub bins: usize,

    /// Skip opening the histogram viewer
    #[arg(long)]
    pub no_display: bool,

    /// Print the full report as JSON instead of the one-line summary
    #[arg(long)]
    pub json: bool,
}

#[derive(Debug, Clone)]
pub struct AppConfig {
    pub market: MarketParameters,
    pub call: OptionSpec,
    pub put: OptionSpec,
    pub simulation: SimulationConfig,
    pub portfolio: PortfolioPreset,
    pub display: DisplayOptions,
    pub json: bool,
}

impl AppConfig {
    /// Load `.env` (if any), then parse the process arguments.
    pub fn load() -> EngineResult<Self> {
        dotenvy::dotenv().ok();
        Self::parse_from(std::env::args_os())
    }

    /// Parse `args` (program name first) together with any `RISK_*`
    /// environment variables. `--help` and `--version` print and exit;
    /// every other parse failure becomes `EngineError::Config`.
    pub fn parse_from<I, T>(args: I) -> EngineResult<Self>
    where
        I: IntoIterator<Item = T>,
        T: Into<OsString> + Clone,
    {
        let cli = match Cli::try_parse_from(args) {
            Ok(cli) => cli,
            Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => {
                e.exit()
            }
            Err(e) => return Err(EngineError::Config(e.to_string())),
        };
        Self::from_cli(&cli)
    }

    pub fn from_cli(cli: &Cli) -> EngineResult<Self> {
        let market = MarketParameters::new(cli.spot, cli.vol, cli.rate, cli.drift);
        let call = OptionSpec::call(cli.k_call, cli.time_to_expiry);
        let put = OptionSpec::put(cli.k_put, cli.time_to_expiry);
        let simulation = SimulationConfig {
            horizon: cli.horizon,
            trials: cli.trials,
            confidence: cli.confidence,
            seed: cli.seed,
        };

        market.validate()?;
        call.validate()?;
        put.validate()?;
        simulation.validate()?;

        if cli.bins == 0 {
            return Err(EngineError::Config("bins must be positive".into()));
        }

        Ok(Self {
            market,
            call,
            put,
            simulation,
            portfolio: cli.portfolio,
            display: DisplayOptions {
                bins: cli.bins,
                save_path: cli.save_path.clone(),
                show: !cli.no_display,
            },
            json: cli.json,
        })
    }
}
