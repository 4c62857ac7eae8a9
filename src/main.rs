use std::path::Path;

use anyhow::{Context, Result};

use ccee_dashboard::config::{DashboardConfig, CONFIG_FILE};
use ccee_dashboard::data::{CovidPeriod, Dimension, LoadCache};
use ccee_dashboard::state::DashboardState;
use ccee_dashboard::summary::{format_mwh, yearly_summary_table};

fn main() -> Result<()> {
    let config = DashboardConfig::load(Path::new(CONFIG_FILE))?;
    env_logger::Builder::new()
        .parse_filters(&config.log_filter)
        .init();

    let mut cache = LoadCache::new();
    let table = cache
        .get_or_load(&config.data_path)
        .with_context(|| format!("loading {}", config.data_path.display()))?;

    let state = DashboardState::new(table);
    let options = state.options();
    for dim in Dimension::ALL {
        log::debug!("{dim}: {} values", options.count(dim));
    }
    let covid: Vec<String> = options
        .covid_flags
        .iter()
        .map(|f| CovidPeriod::from(*f).to_string())
        .collect();
    log::info!("Covid periods present: {}", covid.join(", "));

    let view = state.view();
    log::info!(
        "{} rows, total {} MWh, mean {} MWh, {} years",
        view.filtered_rows,
        format_mwh(view.kpis.total_mwh),
        view.kpis.mean_mwh.map_or_else(|| "-".to_string(), format_mwh),
        view.kpis.distinct_years
    );
    if let Some(top) = &view.top_states {
        let ranking: Vec<String> = top
            .states
            .iter()
            .map(|s| format!("{} ({})", s.state, format_mwh(s.consumption_mwh)))
            .collect();
        log::info!("Top states in {}: {}", top.year, ranking.join(", "));
    }

    print!("{}", yearly_summary_table(&view.yearly_totals));
    Ok(())
}
