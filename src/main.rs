use analytics::{AnalyticsEngine, DecompositionResult, TableAnalysis};
use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use comfy_table::Table;
use configuration::{load_config, AnalysisConfig, OutputFormat};
use core_types::{index_by_date, PriceTable};
use risk::{HistoricalRiskModel, RiskModel, RiskReport};
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

/// The main entry point for the price analytics tool.
fn main() -> Result<()> {
    // Logs go to stderr so that `--format json` output stays machine readable.
    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli = Cli::parse();
    let config = cli.resolve_config()?;
    let table = load_table(&cli.csv, &config)?;

    match cli.command {
        Commands::Analyze => {
            let engine = AnalyticsEngine::new(config.clone());
            let analysis = engine.analyze(&table).context("Analysis failed")?;
            emit(config.output, &analysis, print_analysis)
        }
        Commands::Risk { ticker } => {
            let model = HistoricalRiskModel::new(config.risk.clone())?;
            let returns = AnalyticsEngine::new(config.clone()).returns(&table);
            let reports = match ticker {
                Some(ticker) => vec![model.assess(&returns, &ticker)?],
                None => model.assess_available(&returns)?,
            };
            emit(config.output, &reports, |r| print_risk(r))
        }
        Commands::Decompose { ticker, tail } => {
            let engine = AnalyticsEngine::new(config.clone());
            let result = engine
                .decompose(&table, &ticker)
                .with_context(|| format!("Failed to decompose '{}'", ticker))?;
            emit(config.output, &result, |r| print_decomposition(r, tail))
        }
    }
}

// ==============================================================================
// CLI Structure
// ==============================================================================

/// Descriptive and risk statistics over daily closing prices.
#[derive(Parser)]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// The price file, with a header row `Date,<ticker1>,<ticker2>,...`.
    #[arg(long)]
    csv: PathBuf,

    /// An optional TOML file with analysis parameters.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Only analyse `<FIELD>_<TICKER>` columns (e.g. "Close").
    #[arg(long)]
    field: Option<String>,

    /// Rolling window length.
    #[arg(long)]
    window: Option<usize>,

    /// Z-score threshold for outliers.
    #[arg(long)]
    threshold: Option<f64>,

    /// VaR confidence level (e.g. 0.05).
    #[arg(long)]
    confidence: Option<f64>,

    /// Seasonal period in observations.
    #[arg(long)]
    period: Option<usize>,

    #[arg(long, value_enum)]
    format: Option<OutputFormat>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Returns, rolling statistics and outliers for every ticker.
    Analyze,
    /// Value-at-Risk and Sharpe ratio per ticker.
    Risk {
        /// Restrict the report to one ticker.
        #[arg(long)]
        ticker: Option<String>,
    },
    /// Additive trend/seasonal/residual decomposition of one ticker.
    Decompose {
        #[arg(long)]
        ticker: String,

        /// Number of trailing rows to print in table output.
        #[arg(long, default_value_t = 10)]
        tail: usize,
    },
}

impl Cli {
    /// Loads the config file (if any) and applies the command-line overrides.
    fn resolve_config(&self) -> Result<AnalysisConfig> {
        let mut config =
            load_config(self.config.as_deref()).context("Failed to load configuration")?;

        if let Some(field) = &self.field {
            config.data.price_field = Some(field.clone());
        }
        if let Some(window) = self.window {
            config.rolling.window = window;
        }
        if let Some(threshold) = self.threshold {
            config.outliers.zscore_threshold = threshold;
        }
        if let Some(confidence) = self.confidence {
            config.risk.confidence = confidence;
        }
        if let Some(period) = self.period {
            config.seasonal.period = period;
        }
        if let Some(format) = self.format {
            config.output = format;
        }

        config
            .validate()
            .map_err(|e| anyhow::anyhow!("Invalid parameters: {}", e))?;
        Ok(config)
    }
}

fn load_table(path: &Path, config: &AnalysisConfig) -> Result<PriceTable> {
    let raw = dataset::read_csv(path)
        .with_context(|| format!("Failed to read {}", path.display()))?;
    let table = index_by_date(raw, &config.data.date_field).context("Failed to index prices")?;

    let table = match &config.data.price_field {
        Some(field) => table.select_field(field)?,
        None => table,
    };

    tracing::info!(rows = table.len(), tickers = ?table.tickers(), "Loaded price table.");
    Ok(table)
}

// ==============================================================================
// Output
// ==============================================================================

fn emit<T, F>(format: OutputFormat, value: &T, print_table: F) -> Result<()>
where
    T: Serialize,
    F: FnOnce(&T),
{
    match format {
        OutputFormat::Json => println!("{}", serde_json::to_string_pretty(value)?),
        OutputFormat::Table => print_table(value),
    }
    Ok(())
}

fn fmt_opt(value: Option<f64>) -> String {
    value.map_or_else(|| "-".to_string(), |v| format!("{:.6}", v))
}

fn print_analysis(analysis: &TableAnalysis) {
    let mut summary = Table::new();
    summary.set_header(vec!["Ticker", "Returns", "Mean", "Std", "Min", "Max"]);
    for s in &analysis.return_summary {
        summary.add_row(vec![
            s.ticker.clone(),
            s.count.to_string(),
            fmt_opt(s.mean),
            fmt_opt(s.std),
            fmt_opt(s.min),
            fmt_opt(s.max),
        ]);
    }
    println!("Daily returns\n{}", summary);

    let window = analysis.rolling.window;
    let mut rolling = Table::new();
    rolling.set_header(vec![
        "Ticker".to_string(),
        format!("Last {}-day mean", window),
        format!("Last {}-day std", window),
    ]);
    for (mean, std) in analysis
        .rolling
        .rolling_mean
        .columns()
        .iter()
        .zip(analysis.rolling.rolling_std.columns())
    {
        rolling.add_row(vec![
            mean.name.clone(),
            fmt_opt(mean.values.last().copied().flatten()),
            fmt_opt(std.values.last().copied().flatten()),
        ]);
    }
    println!("Rolling statistics\n{}", rolling);

    let mut zscores = Table::new();
    zscores.set_header(vec!["Ticker", "Date", "Return", "Z-score"]);
    for column in &analysis.zscore_outliers.columns {
        for o in &column.outliers {
            zscores.add_row(vec![
                column.ticker.clone(),
                o.timestamp.format("%Y-%m-%d").to_string(),
                format!("{:.6}", o.value),
                format!("{:.2}", o.z_score),
            ]);
        }
    }
    println!(
        "Z-score outliers (|z| > {})\n{}",
        analysis.zscore_outliers.threshold, zscores
    );

    let q = &analysis.quantile_outliers;
    let mut tails = Table::new();
    tails.set_header(vec![
        "Ticker".to_string(),
        format!("Cutoff q{}", q.lower_quantile),
        "Low days".to_string(),
        format!("Cutoff q{}", q.upper_quantile),
        "High days".to_string(),
    ]);
    for column in &q.columns {
        tails.add_row(vec![
            column.ticker.clone(),
            fmt_opt(column.low_cutoff),
            column.low.len().to_string(),
            fmt_opt(column.high_cutoff),
            column.high.len().to_string(),
        ]);
    }
    println!("Quantile outliers\n{}", tails);
}

fn print_risk(reports: &[RiskReport]) {
    let mut table = Table::new();
    table.set_header(vec![
        "Ticker",
        "Obs",
        "Confidence",
        "VaR",
        "Exp. shortfall",
        "Sharpe",
        "Sharpe (ann.)",
    ]);
    for r in reports {
        table.add_row(vec![
            r.ticker.clone(),
            r.observations.to_string(),
            r.confidence.to_string(),
            format!("{:.6}", r.value_at_risk),
            format!("{:.6}", r.expected_shortfall),
            fmt_opt(r.sharpe_ratio),
            fmt_opt(r.annualized_sharpe_ratio),
        ]);
    }
    println!("{}", table);
}

fn print_decomposition(result: &DecompositionResult, tail: usize) {
    let mut table = Table::new();
    table.set_header(vec!["Date", "Observed", "Trend", "Seasonal", "Residual"]);

    let start = result.observed.len().saturating_sub(tail);
    for i in start..result.observed.len() {
        table.add_row(vec![
            result.index[i].format("%Y-%m-%d").to_string(),
            format!("{:.4}", result.observed[i]),
            fmt_opt(result.trend[i]),
            format!("{:.6}", result.seasonal[i]),
            fmt_opt(result.residual[i]),
        ]);
    }
    println!(
        "{} additive decomposition (period {})\n{}",
        result.ticker, result.period, table
    );
}
