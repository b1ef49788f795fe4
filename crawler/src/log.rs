use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

pub const DISCOVERY_LOG_FILE: &str = "pages.txt";

/// Line-delimited `location<TAB>depth` record of every newly discovered location.
pub struct DiscoveryLog {
    path: PathBuf,
    out: BufWriter<File>,
}

impl DiscoveryLog {
    /// Create or truncate the log at `path`.
    pub fn create(path: impl AsRef<Path>) -> std::io::Result<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir)?;
        }
        let out = BufWriter::new(File::create(&path)?);
        Ok(Self { path, out })
    }

    pub fn record(&mut self, location: &str, depth: usize) -> std::io::Result<()> {
        writeln!(self.out, "{location}\t{depth}")
    }

    pub fn path(&self) -> &Path { &self.path }

    pub fn finish(mut self) -> std::io::Result<()> { self.out.flush() }
}
