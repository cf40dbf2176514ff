use crate::acquisition::source::CaptureSource;
use anyhow::Context;
use fmcwcore::{CaptureResult, CapturedWaveforms};
use log::info;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};

/// On-disk JSON form of a capture.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CaptureFile {
    pub beat: Vec<f64>,
    pub sync: Vec<f64>,
    pub achieved_fs: f64,
    #[serde(default)]
    pub was_coerced: bool,
}

impl CaptureFile {
    pub fn from_waveforms(capture: &CapturedWaveforms) -> Self {
        Self {
            beat: capture.beat().to_vec(),
            sync: capture.sync().to_vec(),
            achieved_fs: capture.fs(),
            was_coerced: capture.capture().was_coerced,
        }
    }

    pub fn into_waveforms(self) -> anyhow::Result<CapturedWaveforms> {
        let result = CaptureResult {
            achieved_fs: self.achieved_fs,
            was_coerced: self.was_coerced,
        };
        CapturedWaveforms::new(self.beat, self.sync, result).context("validating capture file")
    }
}

/// Replays a capture previously written with [`save_capture`].
pub struct FileSource {
    path: PathBuf,
}

impl FileSource {
    pub fn new<P: Into<PathBuf>>(path: P) -> Self {
        Self { path: path.into() }
    }
}

impl CaptureSource for FileSource {
    fn acquire(&mut self, requested_fs: f64) -> anyhow::Result<CapturedWaveforms> {
        let contents = fs::read_to_string(&self.path)
            .with_context(|| format!("reading capture {}", self.path.display()))?;
        let file: CaptureFile = serde_json::from_str(&contents)
            .with_context(|| format!("parsing capture {}", self.path.display()))?;
        if (file.achieved_fs - requested_fs).abs() > f64::EPSILON * requested_fs.abs() {
            info!(
                "capture {} recorded at {:.1} Hz (requested {:.1} Hz)",
                self.path.display(),
                file.achieved_fs,
                requested_fs
            );
        }
        file.into_waveforms()
    }
}

pub fn save_capture<P: AsRef<Path>>(path: P, capture: &CapturedWaveforms) -> anyhow::Result<()> {
    let path_ref = path.as_ref();
    if let Some(parent) = path_ref.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("creating directory {}", parent.display()))?;
    }
    let json = serde_json::to_string(&CaptureFile::from_waveforms(capture))
        .context("serializing capture")?;
    fs::write(path_ref, json).with_context(|| format!("writing capture {}", path_ref.display()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::{tempdir, NamedTempFile};

    #[test]
    fn saved_capture_replays_identically() {
        let capture = CapturedWaveforms::new(
            vec![0.25, -0.5, 1.0],
            vec![0.0, 1.0, 0.0],
            CaptureResult {
                achieved_fs: 1_000.0,
                was_coerced: true,
            },
        )
        .unwrap();
        let dir = tempdir().unwrap();
        let path = dir.path().join("captures/run.json");
        save_capture(&path, &capture).unwrap();

        let replayed = FileSource::new(&path).acquire(1_000.0).unwrap();
        assert_eq!(replayed, capture);
    }

    #[test]
    fn mismatched_capture_file_is_rejected() {
        let mut temp = NamedTempFile::new().unwrap();
        temp.write_all(br#"{"beat":[0.0,1.0],"sync":[0.0],"achieved_fs":10.0}"#)
            .unwrap();
        let err = FileSource::new(temp.path()).acquire(10.0).unwrap_err();
        assert!(format!("{:#}", err).contains("shape mismatch"));
    }
}
