use crate::acquisition::{CaptureFile, CaptureSource, SyntheticSource};
use crate::generator::scene::GeneratorConfig;
use crate::gui_bridge::model::VisualizationModel;
use crate::workflow::runner::{Runner, WorkflowResult};
use anyhow::{Context, Result};
use log::{error, info};
use serde_json::json;
use std::{
    net::SocketAddr,
    sync::{Arc, PoisonError, RwLock},
    thread,
};
use tokio::runtime::Builder;
use warp::{
    http::StatusCode,
    reply::{Json, WithStatus},
    Filter, Rejection, Reply,
};

type SharedModel = Arc<RwLock<VisualizationModel>>;

/// Largest capture body accepted by the ingest routes.
pub const MAX_BODY_BYTES: u64 = 32 * 1024 * 1024;

/// Hosts the latest processed capture for an external renderer and accepts
/// new captures over HTTP.
pub struct GuiBridge {
    state: SharedModel,
    runner: Arc<Runner>,
}

impl GuiBridge {
    pub fn new(runner: Arc<Runner>) -> Self {
        Self {
            state: Arc::new(RwLock::new(VisualizationModel::default())),
            runner,
        }
    }

    /// Binds `address` and serves the bridge routes on a background thread.
    ///
    /// Returns the bound address, so port 0 picks a free port.
    pub fn serve(&self, address: SocketAddr) -> Result<(SocketAddr, thread::JoinHandle<()>)> {
        let routes = routes(self.state.clone(), self.runner.clone(), MAX_BODY_BYTES);
        let runtime = Builder::new_current_thread()
            .enable_all()
            .build()
            .context("creating bridge runtime")?;
        let (bound, server) = {
            let _context = runtime.enter();
            warp::serve(routes)
                .try_bind_ephemeral(address)
                .with_context(|| format!("binding GUI bridge to {}", address))?
        };
        let handle = thread::spawn(move || runtime.block_on(server));
        info!("GUI bridge listening on http://{}", bound);
        Ok((bound, handle))
    }

    pub fn publish(&self, model: &VisualizationModel) {
        let mut guard = self.state.write().unwrap_or_else(PoisonError::into_inner);
        *guard = model.clone();
        info!(
            "published RTI {} rows x {} bins",
            guard.rti_db.len(),
            guard.range_axis_m.len()
        );
    }

    pub fn publish_status(&self, message: &str) {
        info!("[GUI] {}", message);
    }

    #[cfg(test)]
    pub fn snapshot(&self) -> VisualizationModel {
        self.state
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }
}

/// `GET /rti`, `POST /ingest` and `POST /ingest-config`.
fn routes(
    state: SharedModel,
    runner: Arc<Runner>,
    body_limit: u64,
) -> impl Filter<Extract = (impl Reply,), Error = Rejection> + Clone {
    let state_filter = warp::any().map(move || state.clone());
    let runner_filter = warp::any().map(move || runner.clone());

    let get_route = warp::path("rti")
        .and(warp::get())
        .and(state_filter.clone())
        .map(|state: SharedModel| {
            let guard = state.read().unwrap_or_else(PoisonError::into_inner);
            warp::reply::json(&*guard)
        });

    let post_route = warp::path("ingest")
        .and(warp::post())
        .and(warp::body::content_length_limit(body_limit))
        .and(warp::body::json())
        .and(state_filter.clone())
        .and(runner_filter.clone())
        .and_then(|file: CaptureFile, state: SharedModel, runner: Arc<Runner>| {
            respond_blocking(move || {
                respond(
                    file.into_waveforms()
                        .and_then(|capture| runner.execute(&capture)),
                    &state,
                    None,
                )
            })
        });

    let generator_route = warp::path("ingest-config")
        .and(warp::post())
        .and(warp::body::content_length_limit(body_limit))
        .and(warp::body::json())
        .and(state_filter)
        .and(runner_filter)
        .and_then(|config: GeneratorConfig, state: SharedModel, runner: Arc<Runner>| {
            respond_blocking(move || {
                let workflow = runner.config();
                let mut source = SyntheticSource::new(config.clone(), workflow.radar.clone());
                respond(
                    source
                        .acquire(workflow.requested_fs_hz)
                        .and_then(|capture| runner.execute(&capture)),
                    &state,
                    config.scenario.as_deref(),
                )
            })
        });

    get_route.or(post_route).or(generator_route)
}

/// Runs pipeline work on the blocking pool, away from the reactor thread.
async fn respond_blocking<F>(job: F) -> Result<WithStatus<Json>, Rejection>
where
    F: FnOnce() -> WithStatus<Json> + Send + 'static,
{
    match tokio::task::spawn_blocking(job).await {
        Ok(reply) => Ok(reply),
        Err(err) => {
            error!("ingest worker failed: {}", err);
            Ok(warp::reply::with_status(
                warp::reply::json(&json!({"status": "error", "message": err.to_string()})),
                StatusCode::INTERNAL_SERVER_ERROR,
            ))
        }
    }
}

fn respond(
    result: Result<WorkflowResult>,
    state: &SharedModel,
    scenario: Option<&str>,
) -> WithStatus<Json> {
    match result {
        Ok(result) => {
            let model = VisualizationModel::from_result(&result);
            let rows = model.rti_db.len();
            *state.write().unwrap_or_else(PoisonError::into_inner) = model;
            if let Some(name) = scenario {
                info!("[GUI] scenario {} -> {} RTI rows", name, rows);
            }
            warp::reply::with_status(
                warp::reply::json(&json!({"status": "ok", "rows": rows})),
                StatusCode::OK,
            )
        }
        Err(err) => {
            error!("ingest error: {:#}", err);
            warp::reply::with_status(
                warp::reply::json(&json!({"status": "error", "message": format!("{:#}", err)})),
                StatusCode::UNPROCESSABLE_ENTITY,
            )
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::workflow::config::WorkflowConfig;

    fn runner() -> Arc<Runner> {
        let mut cfg = WorkflowConfig::default();
        cfg.generator.duration_s = 0.2;
        Arc::new(Runner::new(cfg))
    }

    #[test]
    fn gui_bridge_updates_state() {
        let runner = runner();
        let gui = GuiBridge::new(runner.clone());
        let cfg = runner.config();
        let mut source = SyntheticSource::new(cfg.generator.clone(), cfg.radar.clone());
        let capture = source.acquire(cfg.requested_fs_hz).unwrap();
        let result = runner.execute(&capture).unwrap();
        let model = VisualizationModel::from_result(&result);
        gui.publish(&model);

        let snapshot = gui.snapshot();
        assert_eq!(snapshot.raw_edges, 10);
        assert_eq!(snapshot.valid_edges, 9);
        assert_eq!(snapshot.rti_db.len(), 8);
        assert_eq!(snapshot.rti_db[0].len(), snapshot.range_axis_m.len());
        assert_eq!(snapshot, model);
    }

    #[test]
    fn failed_ingest_leaves_state_untouched() {
        let runner = runner();
        let gui = GuiBridge::new(runner.clone());
        let file = CaptureFile {
            beat: vec![0.0; 10],
            sync: vec![0.0; 10],
            achieved_fs: 100_000.0,
            was_coerced: false,
        };
        let reply = respond(
            file.into_waveforms().and_then(|c| runner.execute(&c)),
            &gui.state,
            None,
        );
        let response = reply.into_response();
        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        assert_eq!(gui.snapshot(), VisualizationModel::default());
    }

    #[test]
    fn serve_fails_when_port_is_taken() {
        let occupied = std::net::TcpListener::bind("127.0.0.1:0").unwrap();
        let address = occupied.local_addr().unwrap();
        let gui = GuiBridge::new(runner());
        let err = gui.serve(address).err().unwrap();
        assert!(format!("{:#}", err).contains("binding GUI bridge"));
    }

    #[test]
    fn serve_reports_bound_port() {
        let gui = GuiBridge::new(runner());
        let (bound, _server) = gui.serve(SocketAddr::from(([127, 0, 0, 1], 0))).unwrap();
        assert_ne!(bound.port(), 0);
    }

    #[tokio::test]
    async fn ingest_route_processes_capture() {
        let runner = runner();
        let gui = GuiBridge::new(runner.clone());
        let cfg = runner.config();
        let mut source = SyntheticSource::new(cfg.generator.clone(), cfg.radar.clone());
        let capture = source.acquire(cfg.requested_fs_hz).unwrap();
        let filter = routes(gui.state.clone(), runner.clone(), MAX_BODY_BYTES);

        let response = warp::test::request()
            .method("POST")
            .path("/ingest")
            .json(&CaptureFile::from_waveforms(&capture))
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::OK);

        let response = warp::test::request()
            .method("GET")
            .path("/rti")
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::OK);
        let model: VisualizationModel = serde_json::from_slice(response.body()).unwrap();
        assert_eq!(model.valid_edges, 9);
        assert_eq!(model.rti_db.len(), 8);
    }

    #[tokio::test]
    async fn ingest_route_rejects_oversized_body() {
        let runner = runner();
        let gui = GuiBridge::new(runner.clone());
        let filter = routes(gui.state.clone(), runner, 64);
        let file = CaptureFile {
            beat: vec![0.0; 100],
            sync: vec![0.0; 100],
            achieved_fs: 100_000.0,
            was_coerced: false,
        };

        let response = warp::test::request()
            .method("POST")
            .path("/ingest")
            .json(&file)
            .reply(&filter)
            .await;
        assert_eq!(response.status(), StatusCode::PAYLOAD_TOO_LARGE);
        assert_eq!(gui.snapshot(), VisualizationModel::default());
    }
}
