//! Integration tests for sena-forge

use sena_forge::{
    analysis,
    draws::DrawRepository,
    generator::CombinationGenerator,
    import,
    types::{Combination, Constraints, Draw, FetchConfig, GenerationConfig, MatchTally, MatchTier},
};
use std::collections::BTreeSet;
use std::io::Write;
use std::time::Duration;

const PAYLOAD: &str = r#"[
    {"concurso": 2703, "data": "13/04/2024", "dezenas": ["01", "02", "03", "04", "05", "06"]},
    {"concurso": 2702, "data": "11/04/2024", "dezenas": ["07", "08", "09", "10", "11", "12"]},
    {"concurso": 2701, "data": "09/04/2024", "dezenas": ["01", "02", "03", "04", "50", "60"]}
]"#;

fn payload_file() -> tempfile::NamedTempFile {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(PAYLOAD.as_bytes()).unwrap();
    file
}

#[tokio::test]
async fn test_file_repository_end_to_end() {
    let file = payload_file();
    let repository = DrawRepository::from_file(file.path());

    let outcome = repository.fetch(30).await;
    assert!(!outcome.is_degraded());
    assert_eq!(outcome.draws().len(), 3);
    assert_eq!(outcome.draws()[0].contest, Some(2703));

    let table = analysis::compute(outcome.draws());
    assert_eq!(table.total(), 18);

    let frequent = analysis::most_frequent_combination(&table).unwrap();
    assert_eq!(frequent.numbers(), &[1, 2, 3, 4, 5, 6]);

    let tally = analysis::score(&frequent, outcome.draws());
    assert_eq!(tally, MatchTally { quadra: 1, quina: 0, sena: 1 });
}

#[test]
fn test_repository_with_blocking_runtime() {
    let file = payload_file();
    let repository = DrawRepository::from_file(file.path());

    let outcome = tokio_test::block_on(repository.fetch(2));
    assert_eq!(outcome.draws().len(), 2);

    let again = tokio_test::block_on(repository.fetch(2));
    assert!(again.from_cache);
}

#[tokio::test]
async fn test_unreachable_api_degrades_to_empty() {
    let config = FetchConfig {
        endpoint: "http://127.0.0.1:9/api/mega-sena".to_string(),
        timeout: Duration::from_secs(2),
        ..Default::default()
    };
    let repository = DrawRepository::http(config).unwrap();

    let outcome = repository.fetch(30).await;
    assert!(outcome.draws().is_empty());
    assert!(outcome.error.unwrap().is_network());

    // Downstream stages tolerate the empty history
    let table = analysis::compute(outcome.draws.as_slice());
    assert!(table.is_empty());
    let combination = Combination::new(&[1, 2, 3, 4, 5, 6]).unwrap();
    assert_eq!(analysis::score(&combination, outcome.draws.as_slice()), MatchTally::default());
}

#[tokio::test]
async fn test_malformed_file_is_data_format_error() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    file.write_all(br#"[{"concurso": 1}]"#).unwrap();

    let outcome = DrawRepository::from_file(file.path()).fetch(10).await;
    assert!(outcome.draws().is_empty());
    assert!(outcome.error.unwrap().is_data_format());
}

#[test]
fn test_scenario_exact_draw_match() {
    let draws = vec![
        Draw::new(&[1, 2, 3, 4, 5, 6]).unwrap(),
        Draw::new(&[7, 8, 9, 10, 11, 12]).unwrap(),
    ];
    let combination = Combination::new(&[1, 2, 3, 4, 5, 6]).unwrap();
    let tally = analysis::score(&combination, &draws);

    assert_eq!(tally.get(MatchTier::Quadra), 0);
    assert_eq!(tally.get(MatchTier::Quina), 0);
    assert_eq!(tally.get(MatchTier::Sena), 1);
}

#[test]
fn test_scenario_almost_everything_excluded() {
    let constraints = Constraints {
        required: BTreeSet::new(),
        excluded: (1..=60).filter(|n| *n != 10 && *n != 20 && *n != 30).collect(),
        sum_min: 0,
        sum_max: 360,
        even_count: 3,
    };
    assert!(sena_forge::generate(&constraints).is_none());
}

#[test]
fn test_scenario_six_required_evens() {
    let constraints = Constraints {
        required: [2, 4, 6, 8, 10, 12].into_iter().collect(),
        excluded: BTreeSet::new(),
        sum_min: 42,
        sum_max: 42,
        even_count: 6,
    };
    let combination = sena_forge::generate(&constraints).unwrap();
    assert_eq!(combination.numbers(), &[2, 4, 6, 8, 10, 12]);
}

#[test]
fn test_generated_then_scored() {
    let draws: Vec<Draw> = [
        [5, 15, 25, 35, 45, 55],
        [6, 16, 26, 36, 46, 56],
        [1, 12, 23, 34, 45, 56],
    ]
    .iter()
    .map(|n| Draw::new(n).unwrap())
    .collect();

    let constraints = Constraints {
        required: [5, 15, 25, 35].into_iter().collect(),
        sum_min: 100,
        sum_max: 250,
        even_count: 1,
        ..Default::default()
    };
    let mut generator = CombinationGenerator::with_config(GenerationConfig {
        seed: Some(7),
        ..Default::default()
    });
    let combination = generator.generate(&constraints).unwrap();
    assert!(constraints.is_satisfied_by(&combination));

    // Four required numbers guarantee at least a quadra against the first draw
    let tally = analysis::score(&combination, &draws);
    assert!(tally.total() >= 1);
}

#[test]
fn test_csv_import_and_score() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "d1,d2,d3,d4,d5,d6").unwrap();
    writeln!(file, "1,2,3,4,5,6").unwrap();
    writeln!(file, "1,2,3,4,,").unwrap();
    writeln!(file, "7,8,9,10,11,13").unwrap();

    let report = import::import_file(file.path()).unwrap();
    assert_eq!(report.accepted.len(), 2);
    assert_eq!(report.rejected.len(), 1);

    let draws = vec![Draw::new(&[7, 8, 9, 10, 11, 12]).unwrap()];
    let results = analysis::score_all(&report.combinations(), &draws);
    assert_eq!(results[0].1.total(), 0);
    assert_eq!(results[1].1.quina, 1);
}

#[test]
fn test_error_handling() {
    use sena_forge::error::SenaForgeError;

    let error = SenaForgeError::validation("test error");
    assert!(error.to_string().contains("test error"));

    let error = SenaForgeError::config("config error");
    assert!(error.to_string().contains("config error"));

    let error = SenaForgeError::network("down", Some(500), None);
    assert!(error.user_message().contains("500"));
}

#[test]
fn test_library_initialization() {
    let result = sena_forge::init();
    assert!(result.is_ok());
}
