use std::fs;
use std::path::PathBuf;
use std::sync::Arc;

use tempfile::TempDir;

use ccee_dashboard::aggregate::{top5_states, total, yearly_totals};
use ccee_dashboard::data::{filter, load, Dimension, LoadCache, Selections};
use ccee_dashboard::pipeline::compute_view;
use ccee_dashboard::state::DashboardState;

const HEADER: &str = "Data,Classe,Ramo,Submercado,UF,Consumo,Covid,Fonte";

fn write_dataset(rows: &[&str]) -> (TempDir, PathBuf) {
    let dir = tempfile::tempdir().expect("create temp dir");
    let path = dir.path().join("CCEE_BR_Data.csv");
    let mut body = format!("{HEADER}\n");
    for row in rows {
        body.push_str(row);
        body.push('\n');
    }
    fs::write(&path, body).expect("write dataset");
    (dir, path)
}

fn scenario_rows() -> Vec<&'static str> {
    vec![
        "01/01/2019,Residencial,Serviços,Sudeste,SP,100,0,ccee",
        "01/07/2019,Comercial,Serviços,Sul,PR,50,0,ccee",
        "01/02/2020,Residencial,Serviços,Sudeste,SP,120,0,ccee",
        "01/05/2020,Comercial,Comércio,Sudeste,RJ,80,1,ccee",
        "01/05/2020,Residencial,Comércio,Sul,RS,40,1,ccee",
        "01/03/2021,Residencial,Serviços,Nordeste,BA,70,1,ccee",
        "01/09/2021,Comercial,Serviços,Sudeste,SP,90,1,ccee",
    ]
}

#[test]
fn loading_twice_yields_identical_tables() {
    let (_tmp, path) = write_dataset(&scenario_rows());
    let first = load(&path).expect("first load");
    let second = load(&path).expect("second load");
    assert_eq!(first, second);
    assert_eq!(first.len(), 7);
}

#[test]
fn filter_is_sound_and_complete() {
    let (_tmp, path) = write_dataset(&scenario_rows());
    let table = load(&path).expect("load");

    let mut sel = Selections::all(&table);
    sel.years = [2020, 2021].into();
    sel.regions = ["Sudeste".to_string()].into();
    sel.covid_flags = [1].into();

    let kept = filter(&table, &sel);
    assert!(kept.iter().all(|r| sel.matches(r)));

    let dropped = table.iter().filter(|r| !kept.records().contains(r));
    for rec in dropped {
        let violates = !sel.years.contains(&rec.year())
            || !sel.consumer_classes.contains(&rec.consumer_class)
            || !sel.activity_branches.contains(&rec.activity_branch)
            || !sel.regions.contains(&rec.region)
            || !rec
                .covid_indicator
                .is_some_and(|flag| sel.covid_flags.contains(&flag));
        assert!(violates, "{rec:?} was dropped without violating a selection");
    }
    assert_eq!(kept.len(), 2);
}

#[test]
fn default_selection_returns_the_whole_table() {
    let (_tmp, path) = write_dataset(&scenario_rows());
    let table = load(&path).expect("load");
    assert_eq!(filter(&table, &Selections::all(&table)), table);
}

#[test]
fn yearly_totals_match_manual_grouping() {
    let (_tmp, path) = write_dataset(&scenario_rows());
    let table = load(&path).expect("load");

    let yearly = yearly_totals(&table);
    for entry in &yearly {
        let manual: f64 = table
            .iter()
            .filter(|r| r.year() == entry.year)
            .map(|r| r.consumption_mwh)
            .sum();
        assert_eq!(entry.consumption_mwh, manual);
    }
    let across: f64 = yearly.iter().map(|y| y.consumption_mwh).sum();
    assert_eq!(across, total(&table));
}

#[test]
fn top5_is_bounded_ordered_and_year_scoped() {
    let rows: Vec<String> = ["SP", "MG", "RJ", "PR", "RS", "BA", "PE"]
        .iter()
        .enumerate()
        .flat_map(|(i, uf)| {
            [
                format!("01/01/2022,Residencial,Serviços,Sudeste,{uf},{},1,x", (i + 1) * 100),
                format!("01/01/2021,Residencial,Serviços,Sudeste,{uf},{},1,x", 10_000 - i),
            ]
        })
        .collect();
    let refs: Vec<&str> = rows.iter().map(String::as_str).collect();
    let (_tmp, path) = write_dataset(&refs);
    let table = load(&path).expect("load");

    let top = top5_states(&table, 2022);
    assert_eq!(top.len(), 5);
    assert!(top.windows(2).all(|w| w[0].consumption_mwh > w[1].consumption_mwh));
    let names: Vec<&str> = top.iter().map(|s| s.state.as_str()).collect();
    assert_eq!(names, vec!["PE", "BA", "RS", "PR", "RJ"]);
    assert_eq!(top[0].consumption_mwh, 700.0);
}

#[test]
fn selecting_2020_and_both_classes_gives_one_year() {
    let (_tmp, path) = write_dataset(&scenario_rows());
    let table = load(&path).expect("load");

    let mut sel = Selections::all(&table);
    sel.years = [2020].into();
    sel.consumer_classes = ["Residencial".to_string(), "Comercial".to_string()].into();

    let view = compute_view(&table, &sel);
    assert_eq!(view.yearly_totals.len(), 1);
    assert_eq!(view.yearly_totals[0].year, 2020);
    assert_eq!(view.yearly_totals[0].consumption_mwh, 240.0);
    assert_eq!(view.top_states.as_ref().map(|t| t.year), Some(2020));

    sel.consumer_classes.clear();
    let empty = compute_view(&table, &sel);
    assert_eq!(empty.filtered_rows, 0);
    assert_eq!(empty.kpis.total_mwh, 0.0);
    assert!(empty.yearly_totals.is_empty());
}

#[test]
fn cached_session_recomputes_on_selection_change() {
    let (_tmp, path) = write_dataset(&scenario_rows());
    let mut cache = LoadCache::new();
    let table = cache.get_or_load(&path).expect("load");
    let again = cache.get_or_load(&path).expect("cached");
    assert!(Arc::ptr_eq(&table, &again));

    let mut state = DashboardState::new(table);
    assert_eq!(state.view().kpis.total_mwh, 550.0);
    assert_eq!(state.view().kpis.distinct_years, 3);

    state.toggle_category(Dimension::Region, "Sul");
    assert_eq!(state.view().kpis.total_mwh, 460.0);

    state.select_none(Dimension::CovidPeriod);
    assert!(state.view().pivot.is_empty());
    assert_eq!(state.view().kpis.mean_mwh, None);
}
