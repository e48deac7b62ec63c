use std::path::{Path, PathBuf};

use clap::Parser;
use log::info;
use serde_json::json;
use six_axis_rs::session::{RecordedHid, RecordedSession};
use six_axis_rs::{ControllerManager, TrackerConfig};

#[derive(Parser, Debug)]
struct Args {
    /// Path to six_axis_session_*.json[.gz]
    #[arg(long, conflicts_with = "session_dir")]
    session: Option<PathBuf>,

    /// Directory of recorded sessions to batch replay
    #[arg(long)]
    session_dir: Option<PathBuf>,

    /// Tracker config (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Write the summary here as well as to stdout
    #[arg(long)]
    output: Option<PathBuf>,
}

fn run_once(path: &Path, config: &TrackerConfig) -> anyhow::Result<serde_json::Value> {
    let session = RecordedSession::load(path)?;
    let styles = session.styles();
    let recorded_at = session.recorded_at.clone();
    if styles.is_empty() {
        anyhow::bail!("{}: no npad was ever connected", path.display());
    }

    let mut hid = RecordedHid::new(session)?;
    let mut manager = ControllerManager::new(config, &styles)?;
    manager.initialize(&mut hid);

    let mut recenters = 0usize;
    let mut drop_sum = 0.0;
    let mut drop_count = 0usize;
    let mut max_drop: f64 = 0.0;

    let rotation = loop {
        let outcome = manager.poll(&hid);
        recenters += outcome.recentered.len();

        for sensor in manager.sensors().iter().filter(|s| s.is_connected(&hid)) {
            let drop = sensor.packet_drop_percentage();
            drop_sum += drop;
            drop_count += 1;
            max_drop = max_drop.max(drop);
        }

        if outcome.quit {
            info!("{}: quit chord at frame {}", path.display(), hid.position());
            break outcome.rotation;
        }
        if !hid.advance() {
            break outcome.rotation;
        }
    };

    let cursors: Vec<serde_json::Value> = manager
        .statuses(&hid)
        .into_iter()
        .filter(|s| s.sampling_number.is_some())
        .map(|s| {
            json!({
                "npad": s.id.to_string(),
                "style": s.style.to_string(),
                "x": s.cursor.x,
                "y": s.cursor.y,
            })
        })
        .collect();

    let mean_drop = if drop_count > 0 { drop_sum / drop_count as f64 } else { 0.0 };

    Ok(json!({
        "session": path.display().to_string(),
        "recorded_at": recorded_at,
        "frames": manager.frame(),
        "recorded_frames": hid.frame_count(),
        "recenter_count": recenters,
        "final_cursors": cursors,
        "final_rotation": [rotation.w, rotation.i, rotation.j, rotation.k],
        "mean_drop_percentage": mean_drop,
        "max_drop_percentage": max_drop,
    }))
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => TrackerConfig::load(path)?,
        None => TrackerConfig::default(),
    };

    let mut results = Vec::new();
    if let Some(dir) = args.session_dir.as_ref() {
        for entry in std::fs::read_dir(dir)? {
            let path = entry?.path();
            if !path.is_file() {
                continue;
            }
            let name = path.file_name().and_then(|n| n.to_str()).unwrap_or("");
            if !(name.starts_with("six_axis_session_") && (name.ends_with(".json") || name.ends_with(".json.gz"))) {
                continue;
            }
            match run_once(&path, &config) {
                Ok(res) => results.push(res),
                Err(e) => eprintln!("Failed {}: {}", path.display(), e),
            }
        }
    } else if let Some(session) = args.session.as_ref() {
        results.push(run_once(session, &config)?);
    } else {
        anyhow::bail!("Provide --session or --session-dir");
    }

    let summary = serde_json::to_string_pretty(&results)?;
    if let Some(output) = args.output.as_ref() {
        std::fs::write(output, &summary)?;
        info!("Wrote summary to {}", output.display());
    }
    println!("{}", summary);
    Ok(())
}
