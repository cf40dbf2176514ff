use acquisition::{save_capture, CaptureSource, FileSource, SyntheticSource};
use anyhow::Context;
use clap::Parser;
use gui_bridge::bridge::GuiBridge;
use gui_bridge::model::VisualizationModel;
use log::{info, warn};
use std::fs::{self, OpenOptions};
use std::io::Write;
use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::Arc;
use tokio::runtime::Builder as TokioBuilder;
use tokio::signal;
use workflow::config::WorkflowConfig;
use workflow::runner::{Runner, WorkflowResult};

mod acquisition;
mod generator;
mod gui_bridge;
mod workflow;

#[derive(Parser)]
#[command(author, version, about = "FMCW range-time-intensity workflow driver")]
struct Args {
    /// Process a single capture and write the renderer payload
    #[arg(long, default_value_t = false)]
    offline: bool,
    /// Load a workflow config from YAML
    #[arg(long)]
    workflow: Option<PathBuf>,
    /// Replay a JSON capture instead of synthesizing one
    #[arg(long)]
    capture: Option<PathBuf>,
    /// Write the acquired capture to this JSON file
    #[arg(long)]
    save_capture: Option<PathBuf>,
    /// Chirp duration in seconds
    #[arg(long, default_value_t = 20e-3)]
    chirp_duration: f64,
    /// Sweep bandwidth in Hz
    #[arg(long, default_value_t = 50e6)]
    bandwidth: f64,
    /// Requested sample rate in Hz
    #[arg(long, default_value_t = 100_000.0)]
    sample_rate: f64,
    /// Range cutoff of the zoomed RTI view in metres
    #[arg(long, default_value_t = 20.0)]
    zoom_cutoff: f64,
    #[arg(long, default_value = "tools/data/rti_payload.json")]
    output: PathBuf,
    #[arg(long, default_value = "tools/data/rti_report.log")]
    report: PathBuf,
    /// Keep the GUI bridge alive for incoming captures
    #[arg(long, default_value_t = false)]
    serve: bool,
    #[arg(long, default_value = "127.0.0.1:9000")]
    bind: SocketAddr,
}

fn main() -> anyhow::Result<()> {
    env_logger::init();
    let args = Args::parse();

    let workflow_config = if let Some(path) = &args.workflow {
        WorkflowConfig::load(path)?
    } else {
        WorkflowConfig::from_args(
            args.chirp_duration,
            args.bandwidth,
            args.sample_rate,
            args.zoom_cutoff,
        )
    };

    let runner = Arc::new(Runner::new(workflow_config.clone()));
    let gui_bridge = GuiBridge::new(runner.clone());

    if args.offline {
        let mut source: Box<dyn CaptureSource> = match &args.capture {
            Some(path) => Box::new(FileSource::new(path)),
            None => Box::new(SyntheticSource::new(
                workflow_config.generator.clone(),
                workflow_config.radar.clone(),
            )),
        };
        let capture = source
            .acquire(workflow_config.requested_fs_hz)
            .context("acquiring capture")?;
        if let Some(path) = &args.save_capture {
            save_capture(path, &capture)?;
        }

        let result = runner.execute(&capture)?;
        let model = VisualizationModel::from_result(&result);

        println!(
            "Offline run -> chirps {} (raw edges {}), RTI {}x{}, display {:.1}..{:.1} dB",
            result.output.valid_edges.len(),
            result.output.edges.raw.len(),
            model.rti_db.len(),
            model.range_axis_m.len(),
            model.display.vmin,
            model.display.vmax
        );

        write_payload(&args.output, &model)?;
        append_report(&args.report, &result)?;
        gui_bridge.publish(&model);
        gui_bridge.publish_status("Offline workflow results ready.");
        let metrics = runner.metrics();
        info!(
            "processed {} capture(s), {} chirps, {} failure(s)",
            metrics.captures, metrics.chirps, metrics.failures
        );
    }

    if args.serve {
        let (bound, _server) = gui_bridge.serve(args.bind)?;
        gui_bridge.publish_status(&format!(
            "HTTP bridge running on http://{} (Ctrl+C to stop)...",
            bound
        ));
        let runtime = TokioBuilder::new_current_thread()
            .enable_all()
            .build()
            .context("creating runtime for signal handling")?;
        runtime.block_on(async {
            signal::ctrl_c().await.context("awaiting Ctrl+C to exit")?;
            Ok::<(), anyhow::Error>(())
        })?;
    } else if !args.offline {
        warn!("nothing to do: pass --offline and/or --serve");
    }

    Ok(())
}

fn ensure_parent(path: &Path) -> anyhow::Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    Ok(())
}

fn write_payload(path: &Path, model: &VisualizationModel) -> anyhow::Result<()> {
    ensure_parent(path)?;
    let json = serde_json::to_string(model).context("serializing renderer payload")?;
    fs::write(path, json).with_context(|| format!("writing payload {}", path.display()))
}

fn append_report(path: &Path, result: &WorkflowResult) -> anyhow::Result<()> {
    ensure_parent(path)?;
    let rti = &result.output.rti;
    let report = format!(
        "fs={:.1} coerced={} window={} raw_edges={} valid_edges={} rows={} bins={} vmin={:.2} vmax={:.2} spectral_peak_hz={:.1}\n",
        result.capture.achieved_fs,
        result.capture.was_coerced,
        result.output.window,
        result.output.edges.raw.len(),
        result.output.valid_edges.len(),
        rti.rows(),
        rti.usable_bins(),
        rti.display.vmin,
        rti.display.vmax,
        result.output.spectrum.peak_frequency_hz
    );
    let mut file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening report {}", path.display()))?;
    file.write_all(report.as_bytes())?;
    Ok(())
}
