use crate::workflow::config::WorkflowConfig;
use anyhow::Context;
use fmcwcore::capture::DiagnosticTrace;
use fmcwcore::processing::{PipelineOutput, RangeZoom, RtiPipeline};
use fmcwcore::telemetry::{MetricsRecorder, MetricsSnapshot};
use fmcwcore::{CaptureResult, CapturedWaveforms};
use std::sync::Arc;

pub struct WorkflowResult {
    pub capture: CaptureResult,
    pub trace: DiagnosticTrace,
    pub output: PipelineOutput,
    pub zoom: RangeZoom,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
    metrics: Arc<MetricsRecorder>,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self {
            config,
            metrics: Arc::new(MetricsRecorder::new()),
        }
    }

    pub fn config(&self) -> &WorkflowConfig {
        &self.config
    }

    pub fn metrics(&self) -> MetricsSnapshot {
        self.metrics.snapshot()
    }

    pub fn execute(&self, capture: &CapturedWaveforms) -> anyhow::Result<WorkflowResult> {
        let pipeline =
            RtiPipeline::new(self.config.radar.clone()).context("configuring RTI pipeline")?;

        let output = match pipeline.run(capture) {
            Ok(output) => output,
            Err(err) => {
                self.metrics.record_failure();
                return Err(err).context("processing capture");
            }
        };
        self.metrics.record_capture(output.valid_edges.len());

        let zoom = output.rti.zoom(self.config.zoom_cutoff_m);
        Ok(WorkflowResult {
            capture: capture.capture(),
            trace: capture.diagnostic_trace(self.config.trace_samples),
            output,
            zoom,
        })
    }
}
