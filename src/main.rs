use anyhow::{bail, Result};
use chrono::Utc;
use clap::Parser;
use log::info;
use std::path::PathBuf;
use tokio::time::{self, Duration, MissedTickBehavior};

use six_axis_rs::session::Recorder;
use six_axis_rs::sim::{SimulatedHid, SimulationConfig};
use six_axis_rs::status::format_status;
use six_axis_rs::{ControllerManager, HidSource, NpadId, TrackerConfig};

#[derive(Parser, Debug)]
#[command(name = "six_axis")]
#[command(about = "Six-axis controller tracking against simulated controllers", long_about = None)]
struct Args {
    /// Frames to run (0 = until the quit chord or Ctrl-C)
    #[arg(long, default_value = "0")]
    frames: u64,

    /// Tracker config (JSON)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Connected npads, comma separated
    #[arg(long, value_delimiter = ',', default_value = "No1")]
    npads: Vec<NpadId>,

    /// Drop every Nth six-axis sample (0 = lossless)
    #[arg(long, default_value = "0")]
    drop_every: u32,

    /// Frame on which the recenter button is pressed
    #[arg(long)]
    recenter_frame: Option<u64>,

    /// Frame from which Plus+Minus is held
    #[arg(long)]
    quit_frame: Option<u64>,

    /// Directory to write the recorded session to
    #[arg(long, value_name = "DIR")]
    record: Option<PathBuf>,

    /// Log status every N frames
    #[arg(long, default_value = "60")]
    status_every: u64,

    /// Poll as fast as possible instead of at the frame rate
    #[arg(long, default_value_t = false)]
    no_pacing: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => TrackerConfig::load(path)?,
        None => TrackerConfig::default(),
    };
    if args.no_pacing && args.frames == 0 && args.quit_frame.is_none() {
        bail!("--no-pacing needs --frames or --quit-frame to terminate");
    }

    info!("Six-axis tracker starting");
    info!("  Frames: {} (0=until quit)", args.frames);
    info!("  Frame rate: {} Hz", config.frame_rate);
    info!("  Npads: {:?}", args.npads);
    info!("  Screen: {}x{}", config.pointer.width, config.pointer.height);

    let sim_config = SimulationConfig {
        frame_rate: config.frame_rate,
        drop_every: args.drop_every,
        recenter_frame: args.recenter_frame,
        quit_frame: args.quit_frame,
        connected: args.npads.clone(),
        ..SimulationConfig::default()
    };
    let style = sim_config.style;
    let mut hid = SimulatedHid::new(sim_config);

    let mut manager = ControllerManager::new(&config, &[style])?;
    manager.initialize(&mut hid);

    let tracked: Vec<NpadId> = NpadId::ALL.iter().copied().take(config.npad_count).collect();
    let mut recorder = args
        .record
        .as_ref()
        .map(|_| Recorder::new(&tracked, hid.tick_frequency()));

    let mut interval = (!args.no_pacing).then(|| {
        let mut interval = time::interval(Duration::from_secs_f64(1.0 / config.frame_rate));
        interval.set_missed_tick_behavior(MissedTickBehavior::Delay);
        interval
    });
    let ctrl_c = tokio::signal::ctrl_c();
    tokio::pin!(ctrl_c);

    let mut recenters = 0usize;
    loop {
        if args.frames > 0 && manager.frame() >= args.frames {
            info!("Frame limit reached, stopping...");
            break;
        }

        if let Some(interval) = interval.as_mut() {
            tokio::select! {
                _ = interval.tick() => {}
                _ = &mut ctrl_c => {
                    info!("Interrupted, stopping...");
                    break;
                }
            }
        }

        if let Some(recorder) = recorder.as_mut() {
            recorder.capture(&hid);
        }

        let outcome = manager.poll(&hid);
        recenters += outcome.recentered.len();

        if args.status_every > 0 && manager.frame() % args.status_every == 0 {
            let q = outcome.rotation;
            info!(
                "[frame {}] rot=({:.3}, {:.3}, {:.3}, {:.3}) {}",
                manager.frame(),
                q.w,
                q.i,
                q.j,
                q.k,
                format_status(&manager.statuses(&hid))
            );
        }

        if outcome.quit {
            info!("Quit chord held, stopping...");
            break;
        }

        hid.advance();
    }

    if let (Some(dir), Some(recorder)) = (args.record.as_ref(), recorder) {
        std::fs::create_dir_all(dir)?;
        let path = dir.join(format!(
            "six_axis_session_{}.json.gz",
            Utc::now().format("%Y%m%d_%H%M%S")
        ));
        recorder.into_session().save(&path)?;
    }

    info!("=== Final Stats ===");
    info!("Frames: {}", manager.frame());
    info!("Recenters: {}", recenters);
    for status in manager.statuses(&hid).iter().filter(|s| s.connected) {
        info!("{}", status.format_line());
    }

    Ok(())
}
