use std::path::{Path, PathBuf};

use clap::{Parser, Subcommand};
use griddle::AnalysisParams;
use griddle_http::serve;

#[derive(Parser)]
#[command(name = "griddle", version, about = "Event-tracking audit engine")]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,

    #[arg(long, env = "GRIDDLE_BIND_ADDR")]
    bind_addr: Option<String>,
    #[arg(long, env = "GRIDDLE_PORT")]
    port: Option<u16>,
}

#[derive(Subcommand)]
enum Command {
    /// Analyze a JSON export file and print the report
    Analyze {
        /// Path of the JSON file to parse (e.g. export.json)
        file: PathBuf,
        /// Filter parameter to search for (e.g. fbc)
        filter_param: String,
        /// Root ID to match against (e.g. 305546688)
        root_id: String,
        /// Also list the ids of target and failed events
        #[arg(long)]
        show_ids: bool,
        /// Save the report to a timestamped text file
        #[arg(long)]
        save_file: bool,
    },
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    match cli.command {
        Some(Command::Analyze {
            file,
            filter_param,
            root_id,
            show_ids,
            save_file,
        }) => {
            if let Err(e) = run_analyze(&file, &filter_param, &root_id, show_ids, save_file) {
                eprintln!("ERROR: {}", e);
                std::process::exit(1);
            }
            Ok(())
        }
        None => {
            std::env::set_var("GRIDDLE_BIND_ADDR", resolve_bind_addr(&cli));
            serve().await
        }
    }
}

fn run_analyze(
    file: &Path,
    filter_param: &str,
    root_id: &str,
    show_ids: bool,
    save_file: bool,
) -> Result<(), Box<dyn std::error::Error>> {
    let raw = std::fs::read_to_string(file)
        .map_err(|e| format!("cannot read '{}': {}", file.display(), e))?;
    let data: serde_json::Value = serde_json::from_str(&raw)
        .map_err(|e| format!("invalid JSON in '{}': {}", file.display(), e))?;

    let params = AnalysisParams {
        filter_param: filter_param.to_string(),
        root_id: root_id.to_string(),
        show_ids,
    };
    let summary = griddle::analyze(&data, &params)?;

    println!("{}", summary.output_content);

    if save_file {
        let filename = format!("{}.txt", chrono::Local::now().format("%Y%m%d%H%M%S"));
        std::fs::write(&filename, &summary.output_content)
            .map_err(|e| format!("cannot save '{}': {}", filename, e))?;
        eprintln!("Results saved to: {}", filename);
    }

    Ok(())
}

fn resolve_bind_addr(cli: &Cli) -> String {
    if let Some(bind_addr) = &cli.bind_addr {
        return bind_addr.clone();
    }
    if let Some(port) = cli.port {
        return format!("127.0.0.1:{port}");
    }
    "127.0.0.1:5000".to_string()
}
