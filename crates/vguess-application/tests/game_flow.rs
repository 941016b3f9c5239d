//! End-to-end game flows over the file-backed adapters.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use tempfile::TempDir;
use vguess_application::{GameUseCase, GuessOutcome, RecordStore, RosterOrigin};
use vguess_core::character::{NumericMode, SnapshotRepository};
use vguess_core::compare::{Attribute, MatchKind};
use vguess_core::session::Phase;
use vguess_infrastructure::{CsvRosterSource, JsonSnapshotRepository, StaticRosterSource};

const DELAY: Duration = Duration::from_millis(4000);

const HEADER: &str = "Id,first_name,last_name,colour,gender,status,speciality,nb_followers,debut_date,height,affiliation,country,seisoness,nickname,is_selected";

// Record 1 is flagged as already used, so record 2 is the only possible target.
fn country_csv() -> String {
    [
        HEADER,
        "1,Ookami,Mio,Red,F,ACTIF,Singing,1200000,2018-12-07,155,HOLOLIVE,JP,SEISO,Mio-sha,true",
        "2,Kiara,Takanashi,Orange,F,ACTIF,\"Singing,Gaming\",1500000,2020-09-12,165,HOLOLIVE,\"JP,US\",NEUTRAL,Tenchou,",
    ]
    .join("\n")
}

fn write_csv(dir: &Path, content: &str) -> std::path::PathBuf {
    let path = dir.join("roster.csv");
    std::fs::write(&path, content).unwrap();
    path
}

fn csv_game(dir: &Path, csv: &str) -> (GameUseCase, Arc<JsonSnapshotRepository>) {
    let snapshot = Arc::new(JsonSnapshotRepository::new(dir.join("snapshot.json")));
    let source = Arc::new(CsvRosterSource::new(write_csv(dir, csv)));
    let store = RecordStore::new(snapshot.clone(), source, NumericMode::Strict);
    (GameUseCase::new(Arc::new(store), DELAY), snapshot)
}

fn scored(outcome: GuessOutcome) -> vguess_core::compare::ComparisonRow {
    match outcome {
        GuessOutcome::Compared(row) => row,
        other => panic!("expected a scored row, got {:?}", other),
    }
}

#[tokio::test(start_paused = true)]
async fn test_country_scenario_partial_then_win() {
    let dir = TempDir::new().unwrap();
    let (game, _) = csv_game(dir.path(), &country_csv());

    let outcome = game.start().await;
    assert_eq!(outcome.origin, RosterOrigin::Ingested);
    assert_eq!(game.session().await.target().unwrap().id, 2);

    let row = scored(game.submit_guess(1).await.unwrap());
    assert_eq!(
        row.cell(Attribute::Country).unwrap().verdict.kind,
        MatchKind::Partial
    );
    assert_eq!(
        row.cell(Attribute::Speciality).unwrap().verdict.kind,
        MatchKind::Partial
    );

    let row = scored(game.submit_guess(2).await.unwrap());
    assert!(row.all_exact());
    assert!(!game.has_won().await);

    tokio::time::sleep(DELAY + Duration::from_millis(1)).await;
    assert!(game.has_won().await);
    assert_eq!(game.phase().await, Phase::Won);
}

#[tokio::test(start_paused = true)]
async fn test_restart_mid_guessing_resets_session() {
    let dir = TempDir::new().unwrap();
    let (game, _) = csv_game(dir.path(), &country_csv());
    game.start().await;

    game.submit_guess(1).await.unwrap();
    game.set_search_text("kia").await;
    assert_eq!(game.phase().await, Phase::Guessing);

    assert!(game.restart().await);
    let session = game.session().await;
    assert!(session.guesses().is_empty());
    assert_eq!(session.search_text(), "");
    assert!(!session.has_won());
    assert_eq!(session.target().unwrap().id, 2);
    assert_eq!(game.roster().await.len(), 2);
}

#[tokio::test]
async fn test_snapshot_is_reused_without_the_source() {
    let dir = TempDir::new().unwrap();
    let (game, snapshot) = csv_game(dir.path(), &country_csv());
    game.start().await;
    assert_eq!(snapshot.load_snapshot().await.unwrap().unwrap().len(), 2);

    let store = RecordStore::new(
        snapshot,
        Arc::new(StaticRosterSource::unavailable()),
        NumericMode::Strict,
    );
    let outcome = store.load().await;
    assert_eq!(outcome.origin, RosterOrigin::Snapshot);
    assert_eq!(outcome.roster.get(2).unwrap().country, vec!["JP", "US"]);
}

#[tokio::test(start_paused = true)]
async fn test_corrupt_snapshot_without_source_is_an_unwinnable_session() {
    let dir = TempDir::new().unwrap();
    let snapshot_path = dir.path().join("snapshot.json");
    std::fs::write(&snapshot_path, "[{\"id\": 1, \"first_na").unwrap();

    let store = RecordStore::new(
        Arc::new(JsonSnapshotRepository::new(snapshot_path)),
        Arc::new(CsvRosterSource::new(dir.path().join("missing.csv"))),
        NumericMode::Strict,
    );
    let game = GameUseCase::new(Arc::new(store), DELAY);

    let outcome = game.start().await;
    assert_eq!(outcome.origin, RosterOrigin::Unavailable);
    assert!(outcome.roster.is_empty());
    assert!(outcome.error.is_some());
    assert!(!game.session().await.can_win());
}

#[tokio::test(start_paused = true)]
async fn test_consumed_targets_exhaust_the_pool() {
    let dir = TempDir::new().unwrap();
    let (game, snapshot) = csv_game(dir.path(), &country_csv());
    game.start().await;

    game.mark_target_consumed().await.unwrap();
    let persisted = snapshot.load_snapshot().await.unwrap().unwrap();
    assert!(persisted.iter().all(|r| r.has_been_selected));

    assert!(!game.restart().await);
    assert!(game.session().await.target().is_none());

    let GuessOutcome::NoTarget = game.submit_guess(1).await.unwrap() else {
        panic!("expected an unscored guess");
    };
    tokio::time::sleep(DELAY * 2).await;
    assert!(!game.has_won().await);
}

#[tokio::test]
async fn test_strict_mode_reports_rejected_rows() {
    let dir = TempDir::new().unwrap();
    let csv = format!(
        "{}\n{}\n",
        country_csv(),
        "3,Usada,Pekora,Blue,F,ACTIF,,lots,2019-07-17,153,HOLOLIVE,JP,YABAI,Peko,"
    );
    let (game, _) = csv_game(dir.path(), &csv);

    let outcome = game.start().await;
    let report = outcome.report.unwrap();
    assert_eq!(report.accepted, 2);
    assert_eq!(report.rejected.len(), 1);
    assert_eq!(report.rejected[0].column, "nb_followers");
    assert!(outcome.roster.get(3).is_none());
}
