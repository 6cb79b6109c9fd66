use super::error::StoreError;
use super::types::{PrRecord, RecordMap, FIELDS};
use atomic_write_file::AtomicWriteFile;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, info, warn};

/// Flat-file table of PR records, one CSV row per PR.
#[derive(Debug, Clone)]
pub struct RecordStore {
    path: PathBuf,
}

/// Result of merging a snapshot into the store
#[derive(Debug, Clone, Default)]
pub struct MergeOutcome {
    pub records: RecordMap,
    pub added: usize,
    pub updated: usize,
    pub unchanged: usize,
}

impl RecordStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Create an empty store (header row only) if none exists.
    ///
    /// Returns true if a new file was created.
    pub fn ensure_initialized(&self) -> Result<bool, StoreError> {
        if self.path.exists() {
            return Ok(false);
        }
        self.write_all(&RecordMap::new())?;
        info!("Created empty record store at {}", self.path.display());
        Ok(true)
    }

    /// Load every record, keyed and sorted by zero-padded PR number.
    ///
    /// A missing store reads as empty. A store whose header row does not match
    /// the fixed column list is reported as corrupt.
    pub fn load_all(&self) -> Result<RecordMap, StoreError> {
        if !self.path.exists() {
            debug!("No record store at {}, starting empty", self.path.display());
            return Ok(RecordMap::new());
        }

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .from_path(&self.path)
            .map_err(|e| StoreError::io(&self.path, e.into()))?;

        let headers = reader
            .headers()
            .map_err(|e| StoreError::corrupt(&self.path, e.to_string()))?
            .clone();
        if headers.is_empty() {
            return Err(StoreError::corrupt(&self.path, "missing header row"));
        }
        if !headers.iter().eq(FIELDS.iter().copied()) {
            return Err(StoreError::corrupt(
                &self.path,
                format!(
                    "unexpected header row '{}', expected '{}'",
                    headers.iter().collect::<Vec<_>>().join(","),
                    FIELDS.join(",")
                ),
            ));
        }

        let mut records = RecordMap::new();
        for row in reader.deserialize::<PrRecord>() {
            let record = row.map_err(|e| {
                let line = e.position().map(|p| p.line()).unwrap_or_default();
                StoreError::corrupt(&self.path, format!("line {}: {}", line, e))
            })?;
            if let Some(column) = record.missing_end_timestamp() {
                return Err(StoreError::corrupt(
                    &self.path,
                    format!("PR #{} is {:?} but {} is empty", record.number, record.state, column),
                ));
            }
            if let Some(previous) = records.insert(record.key(), record) {
                warn!(
                    "Duplicate row for PR #{} in {}, keeping the last one",
                    previous.number,
                    self.path.display()
                );
            }
        }

        debug!("Loaded {} records from {}", records.len(), self.path.display());
        Ok(records)
    }

    /// Upsert `incoming` over `existing` by key and persist the union.
    ///
    /// Incoming records replace existing ones in full. The file is replaced
    /// atomically, so readers see either the old or the new table.
    pub fn merge_and_persist(
        &self,
        existing: RecordMap,
        incoming: Vec<PrRecord>,
    ) -> Result<MergeOutcome, StoreError> {
        let mut outcome = MergeOutcome {
            records: existing,
            ..MergeOutcome::default()
        };

        for record in incoming {
            match outcome.records.insert(record.key(), record.clone()) {
                None => outcome.added += 1,
                Some(previous) if previous == record => outcome.unchanged += 1,
                Some(_) => outcome.updated += 1,
            }
        }

        self.write_all(&outcome.records)?;
        info!(
            "Persisted {} records to {} ({} added, {} updated, {} unchanged)",
            outcome.records.len(),
            self.path.display(),
            outcome.added,
            outcome.updated,
            outcome.unchanged
        );
        Ok(outcome)
    }

    fn write_all(&self, records: &RecordMap) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                fs::create_dir_all(parent).map_err(|e| StoreError::io(parent, e))?;
            }
        }

        let file = AtomicWriteFile::open(&self.path).map_err(|e| StoreError::io(&self.path, e))?;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(false)
            .terminator(csv::Terminator::Any(b'\n'))
            .quote_style(csv::QuoteStyle::Necessary)
            .from_writer(file);

        writer
            .write_record(FIELDS)
            .map_err(|e| StoreError::io(&self.path, e.into()))?;
        for record in records.values() {
            writer
                .serialize(record)
                .map_err(|e| StoreError::io(&self.path, e.into()))?;
        }

        let file = writer
            .into_inner()
            .map_err(|e| {
                let source = std::io::Error::new(e.error().kind(), e.error().to_string());
                StoreError::io(&self.path, source)
            })?;
        file.commit().map_err(|e| StoreError::io(&self.path, e))?;
        Ok(())
    }
}
