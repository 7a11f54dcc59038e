use assert_cmd::Command;
use predicates::prelude::*;
use std::fs::write;
use std::path::Path;
use std::sync::{Arc, Mutex};
use tempfile::tempdir;
use tracing_subscriber::prelude::*;
use tracing_subscriber::{layer::Context, Layer, Registry};

const SPRINT_RESULTS: &str = "\
resultId,raceId,driverId,position,positionOrder
1,10,100,1,1
2,10,101,2,2
3,11,101,1,1
4,11,100,DNF,20
5,12,100,1,1
";
const DRIVERS: &str = "driverId,forename,surname,dob\n100,Max,V,1997-09-30\n101,Lewis,H,1985-01-07\n";
const RACES: &str = "raceId,year,name,date\n10,2021,R1,2021-07-17\n11,2022,R2,2022-04-23\n12,2023,R3,2023-07-29\n";

fn write_dataset(dir: &Path, drivers: &str) {
    write(dir.join("sprint_results.csv"), SPRINT_RESULTS).unwrap();
    write(dir.join("drivers.csv"), drivers).unwrap();
    write(dir.join("races.csv"), RACES).unwrap();
}

#[test]
fn analyze_writes_csv_and_charts_and_prints_table() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_dataset(data.path(), DRIVERS);

    let mut cmd = Command::cargo_bin("f1-sprint").expect("Binary exists");
    cmd.arg("analyze")
        .arg("--data-dir")
        .arg(data.path())
        .arg("--output-dir")
        .arg(out.path())
        .arg("--no-log-file");

    cmd.assert()
        .success()
        .stdout(
            predicate::str::contains("Number of F1 Sprint race wins per driver:")
                .and(predicate::str::contains("Max V"))
                .and(predicate::str::contains("Lewis H")),
        );

    let csv = std::fs::read_to_string(out.path().join("sprint_wins.csv")).unwrap();
    assert_eq!(
        csv,
        "driverName,sprintWins,latestWinYear\nMax V,2,2023\nLewis H,1,2022\n"
    );
    assert!(out.path().join("sprint_wins_by_driver.png").exists());
    assert!(out.path().join("sprint_races_by_year.png").exists());
}

#[test]
fn analyze_reads_directories_from_config_file() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_dataset(data.path(), DRIVERS);
    let config = out.path().join("config.yaml");
    write(
        &config,
        format!(
            "data_dir: {:?}\noutput_dir: {:?}\n",
            data.path(),
            out.path().join("processed")
        ),
    )
    .unwrap();

    Command::cargo_bin("f1-sprint")
        .expect("Binary exists")
        .arg("analyze")
        .arg("--config")
        .arg(&config)
        .arg("--no-log-file")
        .assert()
        .success();

    assert!(out.path().join("processed").join("sprint_wins.csv").exists());
}

#[test]
fn analyze_fails_without_output_when_drivers_lack_surname() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_dataset(data.path(), "driverId,forename\n100,Max\n101,Lewis\n");

    Command::cargo_bin("f1-sprint")
        .expect("Binary exists")
        .arg("analyze")
        .arg("--data-dir")
        .arg(data.path())
        .arg("--output-dir")
        .arg(out.path())
        .arg("--no-log-file")
        .assert()
        .failure()
        .stderr(predicate::str::contains("surname"));

    assert!(!out.path().join("sprint_wins.csv").exists());
    assert!(!out.path().join("sprint_wins_by_driver.png").exists());
}

#[test]
fn analyze_appends_to_log_file() {
    let data = tempdir().unwrap();
    let out = tempdir().unwrap();
    write_dataset(data.path(), DRIVERS);
    let log = out.path().join("run.log");

    Command::cargo_bin("f1-sprint")
        .expect("Binary exists")
        .arg("analyze")
        .arg("--data-dir")
        .arg(data.path())
        .arg("--output-dir")
        .arg(out.path())
        .arg("--log-file")
        .arg(&log)
        .assert()
        .success();

    let contents = std::fs::read_to_string(&log).unwrap();
    assert!(contents.contains("Analysis completed successfully"), "log was: {contents}");
}

/// Custom Layer to collect emitted event messages.
struct EventCollector {
    events: Arc<Mutex<Vec<String>>>,
}

impl<S> Layer<S> for EventCollector
where
    S: tracing::Subscriber,
{
    fn on_event(&self, event: &tracing::Event<'_>, _ctx: Context<'_, S>) {
        let msg = format!("{:?}", event);
        self.events.lock().unwrap().push(msg);
    }
}

#[tokio::test]
async fn emits_trace_initialised_event() {
    let events = Arc::new(Mutex::new(Vec::new()));
    let collector = EventCollector {
        events: events.clone(),
    };
    let subscriber = Registry::default().with(collector);
    let _guard = tracing::subscriber::set_default(subscriber);

    use f1_sprint::cli::{run, Cli, Commands};

    // A config path that does not exist makes the run fail right after start-up.
    let cli = Cli {
        log_file: "unused.log".into(),
        no_log_file: true,
        command: Commands::Analyze {
            config: Some(std::path::PathBuf::from("dummy.yaml")),
            data_dir: None,
            output_dir: None,
            download: false,
        },
    };

    let result = run(cli).await;

    assert!(result.is_err());
    let event_msgs = events.lock().unwrap();
    assert!(
        event_msgs.iter().any(|msg| msg.contains("trace_initialised")),
        "Expected a 'trace_initialised' trace event, got: {:?}",
        event_msgs
    );
}
