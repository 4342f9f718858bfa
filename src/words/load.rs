use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use anyhow::{Context, Result};
use tracing::{info, warn};

use super::catalog::TextEntry;
use super::dataset::Dataset;
use super::parse::parse_records;

#[derive(Clone, Debug)]
pub struct LoadRequest {
    pub data_dir: PathBuf,
    pub text: TextEntry,
    pub shuffle_seed: Option<u64>,
}

impl LoadRequest {
    pub fn path(&self) -> PathBuf {
        self.data_dir.join(&self.text.file)
    }
}

pub fn load_dataset(request: &LoadRequest) -> Result<Dataset> {
    let path = request.path();
    let file = File::open(&path)
        .with_context(|| format!("failed to open word list {}", path.display()))?;
    let mut dataset = parse_records(BufReader::new(file))
        .with_context(|| format!("failed to read word list {}", path.display()))?;

    if let Some(seed) = request.shuffle_seed {
        dataset.shuffle(seed);
    }

    if dataset.is_empty() {
        warn!(path = %path.display(), "word list has no usable rows");
    }

    info!(
        text = %request.text.key,
        path = %path.display(),
        words = dataset.len(),
        rejected = dataset.rejected().len(),
        "loaded word list"
    );
    Ok(dataset)
}
