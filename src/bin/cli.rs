use chrono::{Local, NaiveDate};
use dispatch_board::{
    Board, BoardConfig, BoardSnapshot, FileJobSource, HttpJobSource, Job, RawJobRecord,
    export_day_buckets_csv, fetch_or_empty, parse_flexible_date, parse_raw_jobs, shipping_week,
    window_bounds,
};
use std::io::{self, Write};

const JOB_HEADERS: [&str; 5] = ["kind", "start", "end", "inspector", "job"];

fn push_row<'a>(out: &mut String, widths: &[usize], cells: impl Iterator<Item = &'a str>) {
    out.push('|');
    for (ci, cell) in cells.enumerate() {
        out.push(' ');
        out.push_str(cell);
        let width = widths.get(ci).copied().unwrap_or(0);
        let pad = width.saturating_sub(cell.chars().count());
        out.push_str(&" ".repeat(pad));
        out.push(' ');
        out.push('|');
    }
    out.push('\n');
}

fn render_text_table(headers: &[&str], rows: &[Vec<String>]) -> String {
    // Compute column widths
    let mut widths: Vec<usize> = headers.iter().map(|h| h.chars().count()).collect();
    for row in rows {
        for (ci, cell) in row.iter().enumerate() {
            let len = cell.chars().count();
            if ci < widths.len() && len > widths[ci] {
                widths[ci] = len;
            }
        }
    }

    // Build horizontal separator
    let mut sep = String::new();
    sep.push('+');
    for w in &widths {
        sep.push_str(&"-".repeat(*w + 2));
        sep.push('+');
    }

    let mut out = String::new();
    out.push_str(&sep);
    out.push('\n');
    push_row(&mut out, &widths, headers.iter().copied());
    out.push_str(&sep);
    out.push('\n');
    for row in rows {
        push_row(&mut out, &widths, row.iter().map(String::as_str));
    }
    out.push_str(&sep);
    out.push('\n');
    out
}

fn job_row(job: &Job) -> Vec<String> {
    let mut label = job.title();
    let detail = job.detail();
    if !detail.is_empty() {
        label.push_str(" | ");
        label.push_str(&detail);
    }
    vec![
        job.kind().to_string(),
        job.start.to_string(),
        job.end_date.to_string(),
        job.inspector.clone(),
        label,
    ]
}

fn render_jobs(jobs: &[Job]) -> String {
    let rows: Vec<Vec<String>> = jobs.iter().map(job_row).collect();
    render_text_table(&JOB_HEADERS, &rows)
}

fn render_board(snapshot: &BoardSnapshot) -> String {
    let mut headers = vec!["date"];
    headers.extend(JOB_HEADERS);
    let mut rows = Vec::new();
    for (date, jobs) in snapshot.day_buckets.iter() {
        let day = date.format("%a %b %d").to_string();
        if jobs.is_empty() {
            let mut row = vec![day];
            row.resize(headers.len(), String::new());
            rows.push(row);
            continue;
        }
        for (idx, job) in jobs.iter().enumerate() {
            let mut row = vec![if idx == 0 { day.clone() } else { String::new() }];
            row.extend(job_row(job));
            rows.push(row);
        }
    }

    let mut out = String::new();
    for title in &snapshot.week_titles {
        out.push_str(&title.label);
        out.push('\n');
    }
    out.push_str(&render_text_table(&headers, &rows));
    out
}

fn print_help() {
    println!(
        "Commands:\n  help                               Show this help\n  show                               Show the two-week board\n  summary                            Show board counts\n  day <YYYY-MM-DD>                   Show the jobs bucketed on one day\n  future                             Jobs starting after the board window\n  past                               Trains that started before this week\n  upcoming                           Trains without a date or after next week\n  weeks                              Show shipping week titles\n  week <date>                        Shipping week for a date (YYYY-MM-DD or MM/DD/YYYY)\n  anchor <date|today>                Move the board window to the week of <date>\n  load <json_path>                   Load job records from a JSON file\n  fetch                              Fetch job records from the configured feed\n  export csv <path>                  Write day buckets to CSV\n  config show                        Show configuration\n  config load <json_path>            Load configuration from JSON file\n  quit|exit                          Exit"
    );
}

fn print_config(config: &BoardConfig) {
    let anchor = config
        .window_start
        .map(|d| d.to_string())
        .unwrap_or_else(|| "today".to_string());
    println!("Window anchor      : {}", anchor);
    println!("Bucket span (days) : {}", config.bucket_span_days);
    println!("Refresh interval   : {}s", config.refresh_interval_secs);
    println!("Primary feed       : {}", config.primary_url);
    println!("Fallback feed      : {}", config.fallback_url);
}

struct Session {
    config: BoardConfig,
    records: Vec<RawJobRecord>,
    snapshot: BoardSnapshot,
}

impl Session {
    fn new(config: BoardConfig) -> Self {
        let snapshot = BoardSnapshot::empty(&config, today());
        Self {
            config,
            records: Vec::new(),
            snapshot,
        }
    }

    /// Jobs are rebuilt from the raw records every time, never patched.
    fn rebuild(&mut self) {
        let today = today();
        let jobs = parse_raw_jobs(&self.records, today);
        self.snapshot = Board::build(&jobs, &self.config, today);
    }

    fn replace_records(&mut self, records: Vec<RawJobRecord>) {
        self.records = records;
        self.rebuild();
    }
}

fn today() -> NaiveDate {
    Local::now().date_naive()
}

fn fetch_records(config: &BoardConfig) -> Result<Vec<RawJobRecord>, Box<dyn std::error::Error>> {
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()?;
    let source = HttpJobSource::from_config(config)?;
    Ok(runtime.block_on(fetch_or_empty(&source)))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("warn")),
        )
        .with_writer(io::stderr)
        .with_target(false)
        .init();

    let config = match BoardConfig::from_env() {
        Ok(config) => config,
        Err(e) => {
            println!("Configuration error: {}. Using defaults.", e);
            BoardConfig::default()
        }
    };
    let mut session = Session::new(config);

    if let Some(path) = std::env::args().nth(1) {
        match FileJobSource::new(&path).read() {
            Ok(records) => {
                session.replace_records(records);
                println!("Loaded {} jobs from {}.", session.records.len(), path);
            }
            Err(e) => println!("Load error: {}", e),
        }
    }

    println!("Dispatch Board (CLI) - type 'help' for commands\n");
    println!("{}", render_board(&session.snapshot));

    let stdin = io::stdin();
    let mut line = String::new();
    loop {
        print!("> ");
        let _ = io::stdout().flush();
        line.clear();
        match stdin.read_line(&mut line) {
            Ok(0) | Err(_) => break,
            Ok(_) => {}
        }
        let input = line.trim();
        if input.is_empty() {
            continue;
        }

        let mut parts = input.split_whitespace();
        let cmd = parts.next().unwrap_or("");

        match cmd {
            "help" => print_help(),
            "quit" | "exit" => break,
            "show" => println!("{}", render_board(&session.snapshot)),
            "summary" => println!("{}", session.snapshot.summary().to_cli_summary()),
            "day" => match parts.next().and_then(parse_flexible_date) {
                Some(date) => match session.snapshot.bucket(date) {
                    Some(jobs) => {
                        println!("{} ({} jobs)", date.format("%a %b %d"), jobs.len());
                        println!("{}", render_jobs(jobs));
                    }
                    None => println!(
                        "{} is outside the board window {}..{}.",
                        date, session.snapshot.window_start, session.snapshot.window_end
                    ),
                },
                None => println!("Usage: day <YYYY-MM-DD>"),
            },
            "future" => {
                println!("Future jobs ({}):", session.snapshot.future_jobs.len());
                println!("{}", render_jobs(&session.snapshot.future_jobs));
            }
            "past" => {
                println!("Past trains ({}):", session.snapshot.past_trains.len());
                println!("{}", render_jobs(&session.snapshot.past_trains));
            }
            "upcoming" => {
                println!("Upcoming trains ({}):", session.snapshot.upcoming_trains.len());
                println!("{}", render_jobs(&session.snapshot.upcoming_trains));
            }
            "weeks" => {
                for title in &session.snapshot.week_titles {
                    println!("{}", title.label);
                }
            }
            "week" => match parts.next().and_then(parse_flexible_date) {
                Some(date) => println!("{} is in shipping week {}.", date, shipping_week(date)),
                None => println!("Usage: week <YYYY-MM-DD|MM/DD/YYYY>"),
            },
            "anchor" => match parts.next() {
                Some("today") => {
                    session.config.window_start = None;
                    session.rebuild();
                    println!("Board anchored to today.");
                    println!("{}", render_board(&session.snapshot));
                }
                Some(raw) => match parse_flexible_date(raw) {
                    Some(date) if window_bounds(date, session.config.span_days()).is_none() => {
                        println!("Anchor {} is out of range for a board window.", date);
                    }
                    Some(date) => {
                        session.config.window_start = Some(date);
                        session.rebuild();
                        println!(
                            "Board anchored to {} (window {}..{}).",
                            date, session.snapshot.window_start, session.snapshot.window_end
                        );
                        println!("{}", render_board(&session.snapshot));
                    }
                    None => println!("Invalid date (YYYY-MM-DD or MM/DD/YYYY)"),
                },
                None => println!("Usage: anchor <date|today>"),
            },
            "load" => match parts.next() {
                Some(path) => match FileJobSource::new(path).read() {
                    Ok(records) => {
                        session.replace_records(records);
                        println!("Loaded {} jobs from {}.", session.records.len(), path);
                        println!("{}", session.snapshot.summary().to_cli_summary());
                    }
                    Err(e) => println!("Load error: {}", e),
                },
                None => println!("Usage: load <json_path>"),
            },
            "fetch" => match fetch_records(&session.config) {
                Ok(records) => {
                    session.replace_records(records);
                    println!("Fetched {} jobs.", session.records.len());
                    println!("{}", session.snapshot.summary().to_cli_summary());
                }
                Err(e) => println!("Fetch error: {}", e),
            },
            "export" => match (parts.next(), parts.next()) {
                (Some("csv"), Some(path)) => {
                    match export_day_buckets_csv(&session.snapshot, path) {
                        Ok(rows) => println!("Exported {} rows to {}.", rows, path),
                        Err(e) => println!("Export error: {}", e),
                    }
                }
                _ => println!("Usage: export csv <path>"),
            },
            "config" => match (parts.next(), parts.next()) {
                (Some("show"), _) => print_config(&session.config),
                (Some("load"), Some(path)) => match BoardConfig::load(path) {
                    Ok(config) => {
                        session.config = config;
                        session.rebuild();
                        println!("Configuration loaded from {}.", path);
                    }
                    Err(e) => println!("Config error: {}", e),
                },
                _ => println!("Usage: config <show|load <json_path>>"),
            },
            _ => println!("Unknown command '{}'. Type 'help'.", cmd),
        }
    }
}
