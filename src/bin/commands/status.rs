use memodb::lens::time::TimeLens;
use memodb::lens::utils::OutputFormat;
use memodb::{format_size, get_database_info, DatabaseInfo, MemoConfig, SCHEMA_VERSION};
use serde::Serialize;

#[derive(Debug, Serialize)]
struct StatusInfo {
    config_file: String,
    data_dir: String,
    search_limit: u64,
    schema_version: u32,
    database: DatabaseInfo,
}

pub fn run(config: &MemoConfig, output_format: OutputFormat) {
    let info = StatusInfo {
        config_file: MemoConfig::config_file_path(),
        data_dir: config.data_dir.clone(),
        search_limit: config.search_limit,
        schema_version: SCHEMA_VERSION,
        database: get_database_info(config),
    };

    match output_format {
        OutputFormat::Json | OutputFormat::JsonLine => match serde_json::to_string(&info) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("ERROR: Failed to serialize to JSON: {}", e),
        },
        OutputFormat::JsonPretty => match serde_json::to_string_pretty(&info) {
            Ok(json) => println!("{}", json),
            Err(e) => eprintln!("ERROR: Failed to serialize to JSON: {}", e),
        },
        OutputFormat::Psv => {
            println!("key|value");
            for (key, value) in status_lines(&info) {
                println!("{}|{}", key, value);
            }
        }
        OutputFormat::Table | OutputFormat::Markdown => {
            println!("Configuration:");
            println!("  Config File:      {}", info.config_file);
            println!("  Data Directory:   {}", info.data_dir);
            println!("  Search Limit:     {}", info.search_limit);
            println!();
            println!("Database:");
            for (key, value) in status_lines(&info).into_iter().skip(3) {
                println!("  {:<17} {}", format!("{}:", key), value);
            }
        }
    }
}

fn status_lines(info: &StatusInfo) -> Vec<(&'static str, String)> {
    let db = &info.database;
    let mut lines = vec![
        ("Config File", info.config_file.clone()),
        ("Data Directory", info.data_dir.clone()),
        ("Search Limit", info.search_limit.to_string()),
        ("Path", db.path.clone()),
        ("Exists", db.exists.to_string()),
    ];

    if let Some(size) = db.size_bytes {
        lines.push(("Size", format_size(size)));
    }
    lines.push(("Schema", db.schema_status.clone()));
    if let Some(live) = db.live_count {
        lines.push(("Memos", live.to_string()));
    }
    if let (Some(total), Some(live)) = (db.total_count, db.live_count) {
        lines.push(("Deleted", total.saturating_sub(live).to_string()));
    }
    if let Some(ts) = db.last_modified {
        let time = TimeLens::new();
        let now = chrono::Utc::now().timestamp();
        lines.push((
            "Last Modified",
            format!("{} ({})", time.rfc3339(ts), time.humanize(ts, now)),
        ));
    }
    lines
}
