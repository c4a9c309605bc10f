//! Time-range chunks and the second-bucket index over them.
//!
//! A [`ChunkSet`] maps a continuous playback-time axis onto discrete text
//! chunks (subtitle lines). Lookups go through a coarse index keyed by
//! integer second and then re-check exact half-open containment, so the
//! index may over-report but results never do.
//!
//! # Example
//!
//! ```rust
//! use glosstrack::chunk::{ChunkSet, TimeRangeChunk};
//! use glosstrack::text::AnnotatedText;
//!
//! let chunk = TimeRangeChunk::new(1.0, 3.5, AnnotatedText::new("こんにちは\n"))?;
//! let set = ChunkSet::new(vec![chunk])?;
//! assert_eq!(set.get_chunks_at_time(2.0).len(), 1);
//! assert!(set.get_chunks_at_time(4.0).is_empty());
//! # Ok::<(), glosstrack::AnnoError>(())
//! ```

use std::collections::HashMap;
use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use tracing::debug;
use uuid::Uuid;

use crate::error::{AnnoError, Result};
use crate::text::{AnnotatedText, PortableAnnotatedText};

/// Opaque unique identifier of a chunk
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ChunkId(Uuid);

impl ChunkId {
    #[must_use]
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ChunkId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ChunkId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for ChunkId {
    type Err = uuid::Error;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        Uuid::parse_str(s).map(Self)
    }
}

/// Upper bound for chunk times: 100 hours, just past the largest SRT
/// timestamp `99:59:59,999`. Keeps the per-second index bounded.
pub const MAX_TIME_SECONDS: f64 = 360_000.0;

/// Half-open playback interval `[begin, end)` in seconds
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TimeRange {
    pub begin: f64,
    pub end: f64,
}

impl TimeRange {
    /// Fails unless `0 <= begin <= end <= MAX_TIME_SECONDS`
    pub fn new(begin: f64, end: f64) -> Result<Self> {
        if begin.is_finite()
            && end.is_finite()
            && 0.0 <= begin
            && begin <= end
            && end <= MAX_TIME_SECONDS
        {
            Ok(Self { begin, end })
        } else {
            Err(AnnoError::InvalidTimeRange { begin, end })
        }
    }

    #[must_use]
    pub fn contains(&self, t: f64) -> bool {
        t >= self.begin && t < self.end
    }

    #[must_use]
    pub fn intersects(&self, begin: f64, end: f64) -> bool {
        end > self.begin && begin < self.end
    }

    /// Integer seconds this range is bucketed under, `floor(begin)..=floor(end)`
    fn seconds(&self) -> std::ops::RangeInclusive<i64> {
        (self.begin.floor() as i64)..=(self.end.floor() as i64)
    }
}

/// One time-bounded unit of annotated text. Immutable.
#[derive(Debug, Clone, PartialEq)]
pub struct TimeRangeChunk {
    uid: ChunkId,
    range: TimeRange,
    anno_text: AnnotatedText,
}

impl TimeRangeChunk {
    /// New chunk with a fresh id
    pub fn new(begin: f64, end: f64, anno_text: AnnotatedText) -> Result<Self> {
        Ok(Self {
            uid: ChunkId::new(),
            range: TimeRange::new(begin, end)?,
            anno_text,
        })
    }

    #[must_use]
    pub fn with_id(uid: ChunkId, range: TimeRange, anno_text: AnnotatedText) -> Self {
        Self {
            uid,
            range,
            anno_text,
        }
    }

    #[must_use]
    pub fn uid(&self) -> ChunkId {
        self.uid
    }

    #[must_use]
    pub fn range(&self) -> TimeRange {
        self.range
    }

    #[must_use]
    pub fn anno_text(&self) -> &AnnotatedText {
        &self.anno_text
    }
}

/// Integer second -> ids of chunks touching that second, in construction order
type SecondIndex = HashMap<i64, Vec<ChunkId>>;

/// Indexed collection of chunks.
///
/// Built once from a chunk list; any change produces a new set. Chunks and
/// the index are shared between revisions, so replacing one chunk's text
/// copies only pointers.
#[derive(Debug, Clone)]
pub struct ChunkSet {
    chunks: Vec<Arc<TimeRangeChunk>>,
    slots: Arc<HashMap<ChunkId, usize>>,
    index: Arc<SecondIndex>,
    /// Smallest and largest index key
    span: Option<(i64, i64)>,
}

impl ChunkSet {
    /// Index `chunks`. Fails on duplicate chunk ids and on ranges
    /// [`TimeRange::new`] would reject.
    pub fn new(chunks: Vec<TimeRangeChunk>) -> Result<Self> {
        let mut slots = HashMap::with_capacity(chunks.len());
        let mut index: SecondIndex = HashMap::new();

        for (slot, chunk) in chunks.iter().enumerate() {
            if slots.insert(chunk.uid, slot).is_some() {
                return Err(AnnoError::DuplicateChunk(chunk.uid));
            }
            let range = TimeRange::new(chunk.range.begin, chunk.range.end)?;
            for second in range.seconds() {
                index.entry(second).or_default().push(chunk.uid);
            }
        }

        debug!(
            "Indexed {} chunks into {} second buckets",
            chunks.len(),
            index.len()
        );

        let span = index.keys().min().copied().zip(index.keys().max().copied());

        Ok(Self {
            chunks: chunks.into_iter().map(Arc::new).collect(),
            slots: Arc::new(slots),
            index: Arc::new(index),
            span,
        })
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    #[must_use]
    pub fn get(&self, id: ChunkId) -> Option<&TimeRangeChunk> {
        self.slots.get(&id).map(|&slot| &*self.chunks[slot])
    }

    /// Chunks in construction order
    pub fn iter(&self) -> impl Iterator<Item = &TimeRangeChunk> {
        self.chunks.iter().map(|c| &**c)
    }

    /// Chunk ids in construction order
    pub fn chunk_ids(&self) -> impl Iterator<Item = ChunkId> + '_ {
        self.chunks.iter().map(|c| c.uid)
    }

    fn bucket(&self, second: i64) -> impl Iterator<Item = &TimeRangeChunk> {
        self.index
            .get(&second)
            .into_iter()
            .flatten()
            .filter_map(|id| self.get(*id))
    }

    /// Chunks whose range contains `t`, in construction order
    #[must_use]
    pub fn get_chunks_at_time(&self, t: f64) -> Vec<&TimeRangeChunk> {
        if !t.is_finite() {
            return Vec::new();
        }
        self.bucket(t.floor() as i64)
            .filter(|c| c.range.contains(t))
            .collect()
    }

    /// Last of [`get_chunks_at_time`](Self::get_chunks_at_time), if any
    #[must_use]
    pub fn get_last_chunk_at_time(&self, t: f64) -> Option<&TimeRangeChunk> {
        self.get_chunks_at_time(t).pop()
    }

    /// Chunks intersecting `[begin, end)`, each once, in construction order
    #[must_use]
    pub fn get_chunks_in_range(&self, begin: f64, end: f64) -> Vec<&TimeRangeChunk> {
        if !(begin.is_finite() && end.is_finite()) || begin > end {
            return Vec::new();
        }
        let Some((first, last)) = self.span else {
            return Vec::new();
        };
        let from = (begin.floor() as i64).max(first);
        let to = (end.floor() as i64).min(last);
        let mut hits: Vec<usize> = (from..=to)
            .flat_map(|second| self.index.get(&second).into_iter().flatten())
            .filter_map(|id| self.slots.get(id).copied())
            .filter(|&slot| self.chunks[slot].range.intersects(begin, end))
            .collect();
        hits.sort_unstable();
        hits.dedup();
        hits.into_iter().map(|slot| &*self.chunks[slot]).collect()
    }

    /// Replace one chunk's text. Timing is unchanged, so the index is reused.
    pub fn set_chunk_anno_text(&self, id: ChunkId, anno_text: AnnotatedText) -> Result<Self> {
        let slot = *self.slots.get(&id).ok_or(AnnoError::ChunkNotFound(id))?;
        let mut chunks = self.chunks.clone();
        let old = &chunks[slot];
        chunks[slot] = Arc::new(TimeRangeChunk::with_id(old.uid, old.range, anno_text));
        Ok(Self {
            chunks,
            slots: Arc::clone(&self.slots),
            index: Arc::clone(&self.index),
            span: self.span,
        })
    }

    /// Flatten into the portable representation. The index is not stored.
    pub fn to_portable(&self) -> Result<PortableChunkSet> {
        let chunks = self
            .iter()
            .map(|c| {
                Ok(PortableChunk {
                    uid: c.uid,
                    range: c.range,
                    anno_text: c.anno_text.to_portable()?,
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(PortableChunkSet { chunks })
    }

    /// Rebuild from the portable representation, re-indexing from scratch
    pub fn from_portable(portable: PortableChunkSet) -> Result<Self> {
        let chunks = portable
            .chunks
            .into_iter()
            .map(|c| {
                let range = TimeRange::new(c.range.begin, c.range.end)?;
                let anno_text = AnnotatedText::from_portable(c.anno_text)?;
                Ok(TimeRangeChunk::with_id(c.uid, range, anno_text))
            })
            .collect::<Result<Vec<_>>>()?;
        Self::new(chunks)
    }
}

impl PartialEq for ChunkSet {
    fn eq(&self, other: &Self) -> bool {
        self.chunks == other.chunks
    }
}

/// Wire form of a [`ChunkSet`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PortableChunkSet {
    pub chunks: Vec<PortableChunk>,
}

/// Wire form of a [`TimeRangeChunk`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PortableChunk {
    pub uid: ChunkId,
    pub range: TimeRange,
    pub anno_text: PortableAnnotatedText,
}
