use crate::generator::scene::GeneratorConfig;
use anyhow::Context;
use fmcwcore::prelude::RadarConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub radar: RadarConfig,
    pub requested_fs_hz: f64,
    /// Range cutoff of the zoomed RTI view, in metres.
    pub zoom_cutoff_m: f64,
    /// Leading samples of each trace kept for time-domain plots.
    pub trace_samples: usize,
    pub generator: GeneratorConfig,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            radar: RadarConfig::default(),
            requested_fs_hz: 100_000.0,
            zoom_cutoff_m: 20.0,
            trace_samples: 6_000,
            generator: GeneratorConfig::default(),
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(
        chirp_duration_s: f64,
        bandwidth_hz: f64,
        requested_fs_hz: f64,
        zoom_cutoff_m: f64,
    ) -> Self {
        Self {
            radar: RadarConfig {
                chirp_duration_s,
                bandwidth_hz,
                ..Default::default()
            },
            requested_fs_hz,
            zoom_cutoff_m,
            ..Default::default()
        }
    }
}
