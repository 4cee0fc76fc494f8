//! File-backed orchestrator state under `$NUDGE_HOME` (default `~/.nudge`).
//!
//! Everything the engine must not hold lives here: the task export, the
//! pending delivery queue, delivered identities and per-day overdue counters.

use anyhow::{Context, Result};
use chrono::NaiveDate;
use nudge_core::{NotificationPayload, Task};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs::{self, OpenOptions};
use std::io::{BufRead, BufReader, Write};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone)]
pub struct Home {
    root: PathBuf,
}

impl Home {
    pub fn resolve() -> Result<Self> {
        if let Ok(dir) = std::env::var("NUDGE_HOME") {
            return Ok(Self::at(dir));
        }
        let home = std::env::var("HOME").context("HOME is not set")?;
        Ok(Self::at(PathBuf::from(home).join(".nudge")))
    }

    pub fn at(root: impl Into<PathBuf>) -> Self {
        Self { root: root.into() }
    }

    pub fn ensure(&self) -> Result<PathBuf> {
        fs::create_dir_all(&self.root)
            .with_context(|| format!("create {}", self.root.display()))?;
        Ok(self.root.clone())
    }

    pub fn tasks_path(&self) -> Result<PathBuf> {
        Ok(self.ensure()?.join("tasks.json"))
    }

    pub fn queue_path(&self) -> Result<PathBuf> {
        Ok(self.ensure()?.join("queue.jsonl"))
    }

    pub fn delivered_path(&self) -> Result<PathBuf> {
        Ok(self.ensure()?.join("delivered.txt"))
    }

    pub fn overdue_counts_path(&self) -> Result<PathBuf> {
        Ok(self.ensure()?.join("overdue_counts.json"))
    }
}

pub fn read_tasks(path: &Path) -> Result<Vec<Task>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
    serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
}

pub fn write_tasks(path: &Path, tasks: &[Task]) -> Result<()> {
    let json = serde_json::to_string_pretty(tasks)?;
    fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

/// Pending payloads, one JSON object per line. Unparseable lines are skipped.
pub fn read_queue(path: &Path) -> Result<Vec<NotificationPayload>> {
    if !path.exists() {
        return Ok(Vec::new());
    }
    let f = fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    let mut rows = Vec::new();
    for line in BufReader::new(f).lines() {
        let line = line?;
        if line.trim().is_empty() {
            continue;
        }
        match serde_json::from_str::<NotificationPayload>(&line) {
            Ok(p) => rows.push(p),
            Err(e) => tracing::warn!(error = %e, "skipping malformed queue line"),
        }
    }
    Ok(rows)
}

pub fn write_queue(path: &Path, queue: &[NotificationPayload]) -> Result<()> {
    let mut out = String::new();
    for p in queue {
        out.push_str(&serde_json::to_string(p)?);
        out.push('\n');
    }
    fs::write(path, out).with_context(|| format!("write {}", path.display()))?;
    Ok(())
}

pub fn read_delivered(path: &Path) -> Result<HashSet<String>> {
    if !path.exists() {
        return Ok(HashSet::new());
    }
    let f = fs::File::open(path).with_context(|| format!("open {}", path.display()))?;
    Ok(BufReader::new(f)
        .lines()
        .map_while(|l| l.ok())
        .filter(|l| !l.trim().is_empty())
        .collect())
}

pub fn append_delivered(path: &Path, identities: &[String]) -> Result<()> {
    let mut f = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("open {}", path.display()))?;
    for id in identities {
        writeln!(f, "{}", id)?;
    }
    Ok(())
}

/// Per-task overdue reminders delivered on `date` (profile-local). Counts
/// from an earlier day are discarded.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct OverdueLedger {
    pub date: Option<NaiveDate>,
    #[serde(default)]
    pub counts: HashMap<String, u32>,
}

impl OverdueLedger {
    pub fn load(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }
        let s = fs::read_to_string(path).with_context(|| format!("read {}", path.display()))?;
        serde_json::from_str(&s).with_context(|| format!("parse {}", path.display()))
    }

    pub fn save(&self, path: &Path) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        fs::write(path, json).with_context(|| format!("write {}", path.display()))?;
        Ok(())
    }

    /// Snapshot handed to the engine by value.
    pub fn counts_for(&self, today: NaiveDate) -> HashMap<String, u32> {
        if self.date == Some(today) {
            self.counts.clone()
        } else {
            HashMap::new()
        }
    }

    pub fn record(&mut self, task_id: &str, today: NaiveDate) {
        if self.date != Some(today) {
            self.date = Some(today);
            self.counts.clear();
        }
        *self.counts.entry(task_id.to_string()).or_insert(0) += 1;
    }
}
