use analytics::{AnalyticsEngine, AnalyticsError, ROLLING_MEAN, ROLLING_STD};
use configuration::AnalysisConfig;
use core_types::PriceTable;

const FIXTURE: &str = concat!(env!("CARGO_MANIFEST_DIR"), "/../dataset/tests/data/prices.csv");

fn close_prices() -> PriceTable {
    dataset::load_price_table(FIXTURE)
        .expect("Failed to load fixture")
        .select_field("Close")
        .expect("Fixture has Close columns")
}

#[test]
fn full_analysis_of_fixture() {
    let table = close_prices();
    let engine = AnalyticsEngine::new(AnalysisConfig::default());

    let analysis = engine.analyze(&table).unwrap();

    assert_eq!(analysis.returns.tickers(), vec!["BND", "SPY", "TSLA"]);
    assert_eq!(analysis.returns.index(), table.index());

    // The BND gap at row 10 blanks the returns on both sides of it.
    let bnd = analysis.returns.column("BND").unwrap();
    assert_eq!(bnd.values[0], None);
    assert_eq!(bnd.values[10], None);
    assert_eq!(bnd.values[11], None);
    assert!(bnd.values[12].is_some());

    let mean = analysis.rolling.get(ROLLING_MEAN).unwrap().column("SPY").unwrap();
    let std = analysis.rolling.get(ROLLING_STD).unwrap().column("SPY").unwrap();
    assert!(mean.values[..29].iter().all(Option::is_none));
    assert!(mean.values[29..].iter().all(Option::is_some));
    assert!(std.values[29..].iter().all(|s| s.unwrap() > 0.0));

    // The -21% TSLA day.
    let tsla = analysis.zscore_outliers.for_ticker("TSLA").unwrap();
    assert!(tsla.outliers.iter().any(|o| o.row == 300 && o.z_score < -3.0));
    let tails = analysis.quantile_outliers.for_ticker("TSLA").unwrap();
    assert!(tails.low.iter().any(|f| f.row == 300));

    let spy_summary = analysis
        .return_summary
        .iter()
        .find(|s| s.ticker == "SPY")
        .unwrap();
    assert_eq!(spy_summary.count, 559);
}

#[test]
fn decomposition_of_fixture_round_trips() {
    let table = close_prices();
    let engine = AnalyticsEngine::default();

    let result = engine.decompose(&table, "SPY").unwrap();
    assert_eq!(result.period, 252);
    assert_eq!(result.trend.iter().filter(|t| t.is_none()).count(), 252);

    for i in 0..result.observed.len() {
        if let (Some(t), Some(r)) = (result.trend[i], result.residual[i]) {
            assert!((t + result.seasonal[i] + r - result.observed[i]).abs() < 1e-8);
        }
    }
}

#[test]
fn decomposition_rejects_gaps_and_short_series() {
    let table = close_prices();
    let engine = AnalyticsEngine::default();

    assert!(matches!(
        engine.decompose(&table, "BND"),
        Err(AnalyticsError::MissingObservation { row: 10, .. })
    ));

    let mut config = AnalysisConfig::default();
    config.seasonal.period = 300;
    assert_eq!(
        AnalyticsEngine::new(config)
            .decompose(&table, "SPY")
            .unwrap_err(),
        AnalyticsError::InsufficientData {
            required: 600,
            available: 560
        }
    );
}
