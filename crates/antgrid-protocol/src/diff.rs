#![forbid(unsafe_code)]

//! Chunked grid diffs.
//!
//! The server groups changed cells into chunks purely for transport. The only
//! client-side meaning of a chunk is its position in the message: when the
//! same cell appears in two chunks, the later chunk wins. Chunk order is
//! therefore preserved exactly as received rather than going through a
//! hashed map.

use std::fmt;

use antgrid_core::{CellKey, CellMap, Color};
use serde::de::{MapAccess, Visitor};
use serde::ser::SerializeMap;
use serde::{Deserialize, Deserializer, Serialize, Serializer};

/// A `chunkKey → (cellKey → color)` update, in wire order.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct GridDiff {
    chunks: Vec<(String, CellMap)>,
}

impl GridDiff {
    /// An empty diff.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a chunk. Later chunks override earlier ones on flatten.
    pub fn push_chunk(&mut self, chunk_key: impl Into<String>, cells: CellMap) {
        self.chunks.push((chunk_key.into(), cells));
    }

    /// Builder form of [`push_chunk`](Self::push_chunk).
    #[must_use]
    pub fn with_chunk(mut self, chunk_key: impl Into<String>, cells: CellMap) -> Self {
        self.push_chunk(chunk_key, cells);
        self
    }

    /// Single-chunk diff from `(x, y, color)` triples. Mostly for tests and tools.
    #[must_use]
    pub fn from_cells<'a>(cells: impl IntoIterator<Item = (u32, u32, &'a str)>) -> Self {
        let map = cells
            .into_iter()
            .map(|(x, y, color)| (CellKey::new(x, y), Color::from(color)))
            .collect();
        Self::new().with_chunk("0,0", map)
    }

    /// Whether no chunk carries any cell.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.chunks.iter().all(|(_, cells)| cells.is_empty())
    }

    /// Number of chunks as received.
    #[must_use]
    pub fn chunk_count(&self) -> usize {
        self.chunks.len()
    }

    /// Collapse all chunks into one cell map, later chunks winning.
    #[must_use]
    pub fn flatten(&self) -> CellMap {
        let capacity = self.chunks.iter().map(|(_, cells)| cells.len()).sum();
        let mut flat = CellMap::with_capacity_and_hasher(capacity, Default::default());
        for (_, cells) in &self.chunks {
            for (key, color) in cells {
                flat.insert(*key, color.clone());
            }
        }
        flat
    }
}

impl Serialize for GridDiff {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let mut map = serializer.serialize_map(Some(self.chunks.len()))?;
        for (chunk_key, cells) in &self.chunks {
            map.serialize_entry(chunk_key, cells)?;
        }
        map.end()
    }
}

struct GridDiffVisitor;

impl<'de> Visitor<'de> for GridDiffVisitor {
    type Value = GridDiff;

    fn expecting(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str("a map of chunk keys to cell maps")
    }

    fn visit_map<A: MapAccess<'de>>(self, mut access: A) -> Result<GridDiff, A::Error> {
        let mut chunks = Vec::with_capacity(access.size_hint().unwrap_or(0));
        while let Some((chunk_key, cells)) = access.next_entry::<String, CellMap>()? {
            chunks.push((chunk_key, cells));
        }
        Ok(GridDiff { chunks })
    }

    fn visit_unit<E: serde::de::Error>(self) -> Result<GridDiff, E> {
        Ok(GridDiff::default())
    }
}

impl<'de> Deserialize<'de> for GridDiff {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        deserializer.deserialize_any(GridDiffVisitor)
    }
}
