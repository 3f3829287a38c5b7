use std::collections::HashSet;
use std::fs::{self, File, OpenOptions};
use std::marker::PhantomData;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::extract::Vendor;

pub const GPU_FILE: &str = "discovered_gpus.csv";
pub const NON_GPU_FILE: &str = "non_gpus.csv";
pub const NOT_FOUND_FILE: &str = "not_found.csv";

/// A row in one of the keyed record sets. The id is the dedup key.
pub trait Record: Serialize + DeserializeOwned {
    const HEADER: &'static [&'static str];
    fn id(&self) -> u64;
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpuRecord {
    pub id: u64,
    pub price: String,
    pub vendor: Vendor,
    pub brand: String,
    pub model: String,
    pub title: String,
}

impl Record for GpuRecord {
    const HEADER: &'static [&'static str] = &["id", "price", "vendor", "brand", "model", "title"];
    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NonGpuRecord {
    pub id: u64,
    pub title: String,
}

impl Record for NonGpuRecord {
    const HEADER: &'static [&'static str] = &["id", "title"];
    fn id(&self) -> u64 {
        self.id
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NotFoundRecord {
    pub id: u64,
}

impl Record for NotFoundRecord {
    const HEADER: &'static [&'static str] = &["id"];
    fn id(&self) -> u64 {
        self.id
    }
}

// ── Keyed record set ──

/// One append-only CSV record set keyed by id.
///
/// A missing file is the normal first-run state. The file is created with its
/// header row on the first append and is never truncated by the sweep; every
/// append is flushed so a crash loses at most the in-flight request.
pub struct RecordSet<R> {
    path: PathBuf,
    known: HashSet<u64>,
    writer: Option<csv::Writer<File>>,
    _marker: PhantomData<fn() -> R>,
}

impl<R: Record> RecordSet<R> {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        let mut known = HashSet::new();
        if path.exists() {
            let mut rdr = csv::Reader::from_path(&path)
                .with_context(|| format!("opening record set {}", path.display()))?;
            for row in rdr.deserialize::<R>() {
                let record =
                    row.with_context(|| format!("malformed record in {}", path.display()))?;
                // Duplicate rows merge by keeping the first-seen id.
                known.insert(record.id());
            }
        }
        Ok(Self {
            path,
            known,
            writer: None,
            _marker: PhantomData,
        })
    }

    pub fn contains(&self, id: u64) -> bool {
        self.known.contains(&id)
    }

    pub fn len(&self) -> usize {
        self.known.len()
    }

    /// Durably add one record. Appending an id that is already known is a
    /// no-op: the first-seen record wins.
    pub fn append(&mut self, record: R) -> Result<()> {
        if !self.known.insert(record.id()) {
            return Ok(());
        }
        if self.writer.is_none() {
            self.writer = Some(open_append_writer::<R>(&self.path)?);
        }
        let writer = self.writer.as_mut().unwrap();
        writer
            .serialize(&record)
            .with_context(|| format!("writing record to {}", self.path.display()))?;
        writer
            .flush()
            .with_context(|| format!("flushing {}", self.path.display()))?;
        Ok(())
    }
}

fn open_append_writer<R: Record>(path: &Path) -> Result<csv::Writer<File>> {
    let size = fs::metadata(path).map(|m| m.len()).unwrap_or(0);
    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("opening {} for append", path.display()))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    if size == 0 {
        writer.write_record(R::HEADER)?;
        writer.flush()?;
    }
    Ok(writer)
}

/// Load every record in a set, merging duplicate ids by first occurrence.
pub fn read_all<R: Record>(path: &Path) -> Result<Vec<R>> {
    let mut rdr = csv::Reader::from_path(path)
        .with_context(|| format!("opening record set {}", path.display()))?;
    let mut seen = HashSet::new();
    let mut records = Vec::new();
    for row in rdr.deserialize::<R>() {
        let record: R = row.with_context(|| format!("malformed record in {}", path.display()))?;
        if seen.insert(record.id()) {
            records.push(record);
        }
    }
    Ok(records)
}

/// Replace a set's file wholesale. Only the cosmetic sort pass does this;
/// the sweep itself never truncates.
pub fn rewrite<R: Record>(path: &Path, records: &[R]) -> Result<()> {
    let file =
        File::create(path).with_context(|| format!("rewriting {}", path.display()))?;
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_writer(file);
    writer.write_record(R::HEADER)?;
    for record in records {
        writer.serialize(record)?;
    }
    writer.flush()?;
    Ok(())
}

// ── Ledger ──

/// The three record sets opened together under one data directory. An id
/// recorded in any of them counts as processed and is never fetched again.
pub struct Ledger {
    pub gpus: RecordSet<GpuRecord>,
    pub non_gpus: RecordSet<NonGpuRecord>,
    pub not_found: RecordSet<NotFoundRecord>,
}

impl Ledger {
    pub fn open(dir: &Path) -> Result<Self> {
        fs::create_dir_all(dir)
            .with_context(|| format!("creating data dir {}", dir.display()))?;
        Ok(Self {
            gpus: RecordSet::open(dir.join(GPU_FILE))?,
            non_gpus: RecordSet::open(dir.join(NON_GPU_FILE))?,
            not_found: RecordSet::open(dir.join(NOT_FOUND_FILE))?,
        })
    }

    pub fn is_known(&self, id: u64) -> bool {
        self.gpus.contains(id) || self.non_gpus.contains(id) || self.not_found.contains(id)
    }

    pub fn known_total(&self) -> usize {
        self.gpus.len() + self.non_gpus.len() + self.not_found.len()
    }
}

// ── Tests ──
