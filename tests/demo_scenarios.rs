//! End-to-end tests for the demo scenarios
//!
//! Runs each scenario through the library entry point and checks the
//! rendered reports.

use uuid::Uuid;
use wiring_demo::{run, OutputFormat, Scenario, ScenarioReport};

#[test]
fn test_writers_scenario_json() {
    let report = run(Scenario::Writers).expect("writers scenario failed");
    let json = report.render(OutputFormat::Json).expect("render failed");
    let value: serde_json::Value = serde_json::from_str(&json).expect("invalid json");

    assert_eq!(value["scenario"], "writers");

    let guid = |pass: &str, item: usize| -> Uuid {
        value[pass]["lines"][item]["guid"]
            .as_str()
            .and_then(|s| s.parse().ok())
            .expect("missing guid")
    };

    let lifecycles: Vec<_> = (0..3)
        .map(|i| value["before"]["lines"][i]["lifecycle"].as_str().unwrap_or_default().to_string())
        .collect();
    assert_eq!(lifecycles, vec!["transient", "singleton", "scoped"]);

    assert_ne!(guid("before", 0), guid("after", 0));
    assert_eq!(guid("before", 1), guid("scoped", 1));
    assert_ne!(guid("before", 2), guid("scoped", 2));
    assert_eq!(guid("before", 2), guid("after", 2));
}

#[test]
fn test_tree_scenario_text() {
    let report = run(Scenario::Tree { iterations: 3 }).expect("tree scenario failed");
    let text = report.render(OutputFormat::Text).expect("render failed");

    assert_eq!(text.lines().filter(|l| l.starts_with("Dependency3: ")).count(), 3);
    assert_eq!(text.lines().filter(|l| l.starts_with("Dependency2: ")).count(), 3);
}

#[test]
fn test_cycle_scenario_reports_all_types() {
    let report = run(Scenario::Cycle).expect("cycle scenario failed");
    let ScenarioReport::Cycle(cycle) = &report else {
        panic!("unexpected report: {report:?}");
    };

    assert_eq!(cycle.failures.len(), 3);
    assert!(cycle
        .failures
        .iter()
        .all(|f| f.reason.starts_with("Circular dependency detected")));

    let text = report.render(OutputFormat::Text).expect("render failed");
    assert!(text.starts_with("build() rejected 3 registrations:"));
    assert!(text.contains("Could not resolve C (C): Circular dependency detected: C -> A -> B -> A"));
}

#[test]
fn test_all_scenarios_run() {
    for scenario in Scenario::all() {
        assert!(run(scenario).is_ok(), "{scenario:?} failed");
    }
}
