use clap::{Parser, Subcommand};
use log::info;
use rssi_fingerprint::{CollectionSession, EngineConfig, RequestParser};
use serde_json::{json, Value};
use std::path::{Path, PathBuf};

/// Wi-Fi fingerprint survey and RSSI positioning tool
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Configuration file (JSON); defaults apply when omitted
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Replace the anchor set from a JSON file
    SetAnchors {
        /// `{"anchors": [{"identifier", "x", "y"}]}` or `{"routers": [{"ssid", "x", "y"}]}`
        file: PathBuf,
    },
    /// Estimate a position without recording anything
    Estimate {
        /// Request JSON
        file: PathBuf,
    },
    /// Estimate, append the fingerprint, and mark the grid cell visited
    Save {
        /// Request JSON
        file: PathBuf,
    },
    /// Print configured anchors and visited cells
    State,
    /// Convert one signal-strength reading to a distance
    Distance {
        #[arg(allow_hyphen_values = true)]
        signal_dbm: i32,
    },
}

fn read_json(path: &Path) -> Result<Value, Box<dyn std::error::Error>> {
    let data = std::fs::read_to_string(path)
        .map_err(|e| format!("Failed to read '{}': {}", path.display(), e))?;
    Ok(serde_json::from_str(&data)?)
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => EngineConfig::load_from_file(path)?,
        None => EngineConfig::default(),
    };

    let parser = RequestParser::new();

    match args.command {
        Command::Distance { signal_dbm } => {
            let distance = config.path_loss.estimate_distance(signal_dbm);
            let value = if distance.is_finite() {
                json!(distance)
            } else {
                json!("∞")
            };
            println!("{}", serde_json::to_string_pretty(&json!({ "distance_m": value }))?);
        }
        Command::SetAnchors { file } => {
            let anchors = parser.parse_anchor_config(&read_json(&file)?)?;
            let session = CollectionSession::open(&config)?;
            let count = anchors.len();
            session.set_anchors(anchors)?;
            info!("Stored anchors in {}", config.storage.anchors_path.display());
            println!("{}", serde_json::to_string_pretty(&json!({ "ok": true, "anchors": count }))?);
        }
        Command::Estimate { file } => {
            let request = parser.parse_estimate_request(&read_json(&file)?)?;
            let session = CollectionSession::open(&config)?;
            let result = session.engine().estimate(&request);
            println!("{}", serde_json::to_string_pretty(&result)?);
        }
        Command::Save { file } => {
            let request = parser.parse_estimate_request(&read_json(&file)?)?;
            let session = CollectionSession::open(&config)?;
            let outcome = session.save(&request)?;
            println!("{}", serde_json::to_string_pretty(&outcome)?);
        }
        Command::State => {
            let session = CollectionSession::open(&config)?;
            println!("{}", serde_json::to_string_pretty(&session.engine().state())?);
        }
    }

    Ok(())
}
