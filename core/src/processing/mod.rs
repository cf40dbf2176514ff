pub mod edges;
pub mod pipeline;
pub mod rti;
pub mod spectrum;
pub mod windower;

pub use edges::{EdgeDetector, EdgeSet};
pub use pipeline::{PipelineOutput, RtiPipeline};
pub use rti::{DisplayBounds, RangeZoom, RtiProcessor, RtiProduct};
pub use spectrum::{ChirpSpectrum, SpectralAnalyzer};
pub use windower::ChirpWindower;
