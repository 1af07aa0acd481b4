use assert_cmd::Command;
use predicates::str::contains as str_contains;
use std::io::Write;
use tempfile::NamedTempFile;

#[allow(deprecated)]
fn cli() -> Command {
    let mut cmd = Command::cargo_bin("cli").expect("cli binary");
    cmd.env_remove("DISPATCH_BOARD_CONFIG")
        .env_remove("DISPATCH_BOARD_PRIMARY_URL")
        .env_remove("DISPATCH_BOARD_FALLBACK_URL");
    cmd
}

fn run_cli(script: &str) -> assert_cmd::assert::Assert {
    cli().write_stdin(script.to_string()).assert()
}

fn feed_file() -> NamedTempFile {
    let mut file = NamedTempFile::new().expect("create temp file");
    write!(
        file,
        r#"[{{"job": "4521", "client": "Acme", "location": "Yard 3", "CarNo": 12,
             "Commodity": "Grain", "assigned": "J. Diaz",
             "startDate": "2025-07-28", "endDate": "2025-07-29"}},
            {{"job": "SPL", "client": "Beta Co", "CarNo": 4, "Container": "Drums",
             "startDate": "2025-07-31"}}]"#
    )
    .unwrap();
    file
}

#[test]
fn cli_reports_shipping_week() {
    run_cli("week 2025-08-03\nweek 07/27/2025\nquit\n")
        .success()
        .stdout(str_contains("2025-08-03 is in shipping week 1."))
        .stdout(str_contains("2025-07-27 is in shipping week 52."));
}

#[test]
fn cli_anchor_lists_week_titles() {
    run_cli("anchor 2025-07-30\nweeks\nquit\n")
        .success()
        .stdout(str_contains(
            "Board anchored to 2025-07-30 (window 2025-07-27..2025-08-09).",
        ))
        .stdout(str_contains("Shipping week 52 (Jul 27 → Aug 02)"))
        .stdout(str_contains("Shipping week 1 (Aug 03 → Aug 09)"));
}

#[test]
fn cli_load_then_show_day() {
    let feed = feed_file();
    let path = feed.path().to_string_lossy().replace('\\', "\\\\");
    let script = format!("anchor 2025-07-30\nload {path}\nday 2025-07-29\nday 2025-09-01\nquit\n");
    let assert = run_cli(&script).success();
    let output = String::from_utf8_lossy(&assert.get_output().stdout);

    assert!(output.contains("Loaded 2 jobs from"), "{output}");
    let day = output
        .split("Tue Jul 29 (1 jobs)")
        .last()
        .expect("day heading in output");
    assert!(day.contains("4521 Acme - Yard 3"), "{day}");
    assert!(output.contains("2025-09-01 is outside the board window"));
}

#[test]
fn cli_loads_file_given_as_argument() {
    let feed = feed_file();
    cli()
        .arg(feed.path())
        .write_stdin("summary\nquit\n")
        .assert()
        .success()
        .stdout(str_contains("Loaded 2 jobs from"))
        .stdout(str_contains("jobs=2"));
}

#[test]
fn cli_exports_csv() {
    let feed = feed_file();
    let out = NamedTempFile::new().expect("create temp file");
    let script = format!(
        "anchor 2025-07-30\nload {}\nexport csv {}\nquit\n",
        feed.path().display(),
        out.path().display()
    );
    run_cli(&script)
        .success()
        .stdout(str_contains("Exported 3 rows to"));

    let text = std::fs::read_to_string(out.path()).unwrap();
    assert!(text.starts_with("date,kind,start,end,inspector,title,detail"));
    assert!(text.contains("2025-08-01,sampling,2025-07-31,2025-07-31,Unassigned,"));
}

#[test]
fn cli_rejects_anchor_at_calendar_edge() {
    run_cli("anchor 12/31/262142\nweek 12/31/262142\nsummary\nquit\n")
        .success()
        .stdout(str_contains(
            "Anchor +262142-12-31 is out of range for a board window.",
        ))
        .stdout(str_contains("jobs=0"));
}

#[test]
fn cli_rejects_unknown_command() {
    run_cli("frobnicate\nquit\n")
        .success()
        .stdout(str_contains("Unknown command 'frobnicate'. Type 'help'."));
}
