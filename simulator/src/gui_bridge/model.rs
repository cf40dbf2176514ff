use crate::workflow::runner::WorkflowResult;
use fmcwcore::capture::DiagnosticTrace;
use fmcwcore::processing::{ChirpSpectrum, DisplayBounds};
use ndarray::Array2;
use serde::{Deserialize, Serialize};

/// Near-range slice of the RTI image.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct ZoomModel {
    pub cutoff_m: f64,
    pub rti_db: Vec<Vec<f64>>,
    pub range_axis_m: Vec<f64>,
}

/// Everything a renderer needs to draw one processed capture.
#[derive(Debug, Clone, Serialize, Deserialize, Default, PartialEq)]
pub struct VisualizationModel {
    pub sample_rate_hz: f64,
    pub was_coerced: bool,
    pub raw_edges: usize,
    pub valid_edges: usize,
    pub trace: DiagnosticTrace,
    pub spectrum: ChirpSpectrum,
    /// One row per cancelled chirp pair, usable range half only.
    pub rti_db: Vec<Vec<f64>>,
    pub time_axis_s: Vec<f64>,
    pub range_axis_m: Vec<f64>,
    pub display: DisplayBounds,
    pub zoom: ZoomModel,
}

impl VisualizationModel {
    pub fn from_result(result: &WorkflowResult) -> Self {
        let output = &result.output;
        Self {
            sample_rate_hz: result.capture.achieved_fs,
            was_coerced: result.capture.was_coerced,
            raw_edges: output.edges.raw.len(),
            valid_edges: output.valid_edges.len(),
            trace: result.trace.clone(),
            spectrum: output.spectrum.clone(),
            rti_db: rows(&output.rti.magnitude_db),
            time_axis_s: output.rti.time_axis.clone(),
            range_axis_m: output.rti.range_axis.clone(),
            display: output.rti.display,
            zoom: ZoomModel {
                cutoff_m: result.zoom.cutoff_m,
                rti_db: rows(&result.zoom.magnitude_db),
                range_axis_m: result.zoom.range_axis.clone(),
            },
        }
    }
}

fn rows(matrix: &Array2<f64>) -> Vec<Vec<f64>> {
    matrix.rows().into_iter().map(|row| row.to_vec()).collect()
}
