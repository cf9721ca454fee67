use mc_var::config::AppConfig;
use mc_var::report::display;
use mc_var::report::summary::RiskReport;
use mc_var::RiskEngine;

fn main() {
    // Structured logging on stderr; stdout carries the results
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    let cfg = match AppConfig::load() {
        Ok(c) => c,
        Err(e) => {
            tracing::error!("config error: {e}");
            std::process::exit(1);
        }
    };

    tracing::info!(
        spot = cfg.market.spot,
        vol = cfg.market.volatility,
        drift = cfg.market.drift,
        rate = cfg.market.rate,
        k_call = cfg.call.strike,
        k_put = cfg.put.strike,
        expiry = cfg.call.expiry,
        horizon = cfg.simulation.horizon,
        confidence = cfg.simulation.confidence,
        trials = cfg.simulation.trials,
        seed = ?cfg.simulation.seed,
        portfolio = ?cfg.portfolio,
        "starting risk run"
    );

    let engine = match RiskEngine::new(cfg.market, cfg.call, cfg.put, cfg.simulation) {
        Ok(e) => e,
        Err(e) => {
            tracing::error!("engine setup error: {e}");
            std::process::exit(1);
        }
    };

    let outcome = match engine.run(cfg.portfolio.definition()) {
        Ok(o) => o,
        Err(e) => {
            tracing::error!("risk run failed: {e}");
            std::process::exit(1);
        }
    };

    let report = RiskReport::new(&cfg, &outcome);
    if cfg.json {
        match report.to_json() {
            Ok(json) => println!("{json}"),
            Err(e) => {
                tracing::error!("report error: {e}");
                std::process::exit(1);
            }
        }
    } else {
        println!("{}", report.headline());
    }

    // Results are already out; display failures only log
    display::display(outcome.losses.as_slice(), &cfg.display, Some(&outcome.stats));
}
