use std::fs::{self, File};
use std::io::{self, BufWriter, Write};
use std::path::Path;

use chrono::{SecondsFormat, Utc};
use serde::{Deserialize, Serialize};

use crate::game::HandResult;

/// Resolution of a single soil within a played hand.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SoilHarvest {
    /// Board index of the soil
    pub soil: usize,
    /// Name of the harvested seed
    pub seed: String,
    /// Harvest iterations folded into `value`
    pub retriggers: u32,
    /// Harvest value including retriggers
    pub value: f64,
    /// Neighbour bonus
    pub synergy: f64,
    /// Evil soil lost its multiplier before this harvest
    #[serde(default)]
    pub withered: bool,
    #[serde(default)]
    pub coins: u32,
    #[serde(default)]
    pub duplicates: u32,
}

/// Complete record of a played hand.
/// Serialized to JSONL, one hand per line.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HarvestRecord {
    /// Identifier of the hand (format: YYYYMMDD-NNNNNN when written by the logger)
    pub hand_id: String,
    pub round: u32,
    /// RNG seed of the run, when known
    #[serde(default)]
    pub seed: Option<u64>,
    /// Soils in the order they were resolved
    pub harvests: Vec<SoilHarvest>,
    pub score_before: f64,
    pub score_after: f64,
    pub score_goal: u64,
    #[serde(default)]
    pub result: Option<HandResult>,
    /// Timestamp (RFC3339 format)
    #[serde(default)]
    pub ts: Option<String>,
    #[serde(default)]
    pub meta: Option<serde_json::Value>,
}

impl HarvestRecord {
    pub fn new(hand_id: String, round: u32, score_before: f64, score_goal: u64) -> Self {
        Self {
            hand_id,
            round,
            seed: None,
            harvests: Vec::new(),
            score_before,
            score_after: score_before,
            score_goal,
            result: None,
            ts: None,
            meta: None,
        }
    }

    pub fn gained(&self) -> f64 {
        self.score_after - self.score_before
    }
}

/// Hand id as written to the log: `YYYYMMDD-NNNNNN`.
pub fn format_hand_id(day: &str, seq: u32) -> String {
    format!("{day}-{seq:06}")
}

fn today() -> String {
    Utc::now().format("%Y%m%d").to_string()
}

/// Appends harvest records to a writer, one JSON object per `\n`-terminated
/// line. Records without `ts` are stamped with the current UTC time. Every
/// line is flushed as it is written.
pub struct HarvestLogger<W: Write = BufWriter<File>> {
    out: W,
    day: String,
    seq: u32,
}

impl HarvestLogger {
    /// Creates or truncates the file at `path`, making missing parent
    /// directories. Ids are numbered under today's date.
    pub fn create<P: AsRef<Path>>(path: P) -> io::Result<Self> {
        let path = path.as_ref();
        match path.parent() {
            Some(dir) if !dir.as_os_str().is_empty() => fs::create_dir_all(dir)?,
            _ => {}
        }
        let file = File::create(path)?;
        Ok(Self::new(BufWriter::new(file), today()))
    }
}

impl<W: Write> HarvestLogger<W> {
    pub fn new(out: W, day: impl Into<String>) -> Self {
        Self {
            out,
            day: day.into(),
            seq: 0,
        }
    }

    /// Next hand id in this log's sequence, starting at `-000001`.
    pub fn next_id(&mut self) -> String {
        self.seq += 1;
        format_hand_id(&self.day, self.seq)
    }

    pub fn write(&mut self, record: &HarvestRecord) -> io::Result<()> {
        let stamped;
        let record = match record.ts {
            Some(_) => record,
            None => {
                stamped = HarvestRecord {
                    ts: Some(Utc::now().to_rfc3339_opts(SecondsFormat::Secs, true)),
                    ..record.clone()
                };
                &stamped
            }
        };
        serde_json::to_writer(&mut self.out, record)?;
        self.out.write_all(b"\n")?;
        self.out.flush()
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}
