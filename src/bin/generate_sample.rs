use std::path::Path;

use anyhow::{Context, Result};
use ccee_dashboard::config::{DashboardConfig, CONFIG_FILE};
use ccee_dashboard::data::loader::REQUIRED_COLUMNS;

/// (state, submarket, relative size)
const STATES: [(&str, &str, f64); 8] = [
    ("SP", "Sudeste", 5.0),
    ("MG", "Sudeste", 2.4),
    ("RJ", "Sudeste", 1.9),
    ("PR", "Sul", 1.4),
    ("RS", "Sul", 1.3),
    ("BA", "Nordeste", 1.1),
    ("PE", "Nordeste", 0.8),
    ("PA", "Norte", 0.7),
];

const CLASSES: [(&str, f64); 3] = [
    ("Residencial", 1.0),
    ("Comercial", 0.6),
    ("Industrial", 1.5),
];

const BRANCHES: [&str; 3] = ["Serviços", "Manufaturados", "Alimentícios"];

/// Monthly demand shape, January first.
const SEASONALITY: [f64; 12] = [
    1.08, 1.06, 1.05, 1.00, 0.95, 0.92, 0.91, 0.94, 0.98, 1.02, 1.04, 1.07,
];

/// Seeded multiplicative noise around 1.0, so reruns write the same file.
struct Jitter {
    seed: u64,
    spread: f64,
}

impl Jitter {
    fn new(seed: u64, spread: f64) -> Self {
        Self { seed, spread }
    }

    /// splitmix64 step.
    fn next_bits(&mut self) -> u64 {
        self.seed = self.seed.wrapping_add(0x9E37_79B9_7F4A_7C15);
        let mut z = self.seed;
        z = (z ^ (z >> 30)).wrapping_mul(0xBF58_476D_1CE4_E5B9);
        z = (z ^ (z >> 27)).wrapping_mul(0x94D0_49BB_1331_11EB);
        z ^ (z >> 31)
    }

    /// A factor drawn uniformly from `[1 - spread, 1 + spread)`.
    fn factor(&mut self) -> f64 {
        let unit = (self.next_bits() >> 11) as f64 / (1u64 << 53) as f64;
        1.0 + self.spread * (2.0 * unit - 1.0)
    }
}

fn main() -> Result<()> {
    let config = DashboardConfig::load(Path::new(CONFIG_FILE))?;
    env_logger::Builder::new()
        .parse_filters(&config.log_filter)
        .init();

    let output_path = config.data_path;
    if let Some(parent) = output_path.parent().filter(|p| !p.as_os_str().is_empty()) {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("creating {}", parent.display()))?;
    }

    let mut writer = csv::Writer::from_path(&output_path)
        .with_context(|| format!("creating {}", output_path.display()))?;
    writer.write_record(REQUIRED_COLUMNS)?;

    let mut jitter = Jitter::new(42, 0.05);
    let mut rows = 0usize;

    for year in 2018..=2022 {
        // Demand dips after the March 2020 onset, then recovers.
        for (month_idx, season) in SEASONALITY.iter().enumerate() {
            let month = month_idx + 1;
            let post_covid = (year, month) >= (2020, 3);
            let shock = match (year, post_covid) {
                (2020, true) => 0.88,
                (2021, _) => 0.96,
                _ => 1.0,
            };

            for (state, region, size) in STATES {
                for (class, class_weight) in CLASSES {
                    for branch in BRANCHES {
                        let base = 1_000.0 * size * class_weight * season * shock;
                        let value = base * jitter.factor();
                        writer.write_record([
                            format!("01/{month:02}/{year}"),
                            class.to_string(),
                            branch.to_string(),
                            region.to_string(),
                            state.to_string(),
                            format!("{value:.3}"),
                            u8::from(post_covid).to_string(),
                        ])?;
                        rows += 1;
                    }
                }
            }
        }
    }

    writer.flush()?;
    log::info!("Sample written with seed 42 over 2018-2022");
    println!("Wrote {rows} consumption records to {}", output_path.display());
    Ok(())
}
