//! Stroke chunking and reassembly.
//!
//! A stroke's point sequence is split into fixed-size chunks before fan-out
//! so a single event never exceeds transport payload limits. Consumers buffer
//! chunks per stroke until every index in `[0, total_chunks)` has arrived and
//! then concatenate them in index order.
//!
//! Duplicate chunk indices are ignored: the first chunk seen for an index
//! wins, so a stroke is never rebuilt from a mix of two deliveries.

use std::collections::{BTreeMap, HashMap};

use super::{
    error::ReassemblyError,
    value_object::{ChunkSize, Point},
};

/// Default number of points per chunk.
pub const DEFAULT_CHUNK_SIZE: usize = 50;

/// One transmissible slice of a stroke's points.
#[derive(Debug, Clone, PartialEq)]
pub struct StrokeChunk<T = Point> {
    pub chunk_index: usize,
    pub total_chunks: usize,
    pub points: Vec<T>,
}

/// Split `points` into ordered chunks of at most `chunk_size` points.
///
/// An empty sequence yields no chunks.
pub fn split<T: Clone>(points: &[T], chunk_size: ChunkSize) -> Vec<StrokeChunk<T>> {
    let total_chunks = points.len().div_ceil(chunk_size.get());
    points
        .chunks(chunk_size.get())
        .enumerate()
        .map(|(chunk_index, slice)| StrokeChunk {
            chunk_index,
            total_chunks,
            points: slice.to_vec(),
        })
        .collect()
}

/// Reassembly buffer for a single stroke.
#[derive(Debug, Clone)]
pub struct StrokeReassembler<T = Point> {
    total_chunks: usize,
    parts: BTreeMap<usize, Vec<T>>,
}

impl<T> StrokeReassembler<T> {
    pub fn new(total_chunks: usize) -> Self {
        Self {
            total_chunks,
            parts: BTreeMap::new(),
        }
    }

    pub fn received(&self) -> usize {
        self.parts.len()
    }

    pub fn is_complete(&self) -> bool {
        self.parts.len() == self.total_chunks
    }

    /// Buffer a chunk.
    ///
    /// Returns `Ok(true)` if the chunk was stored, `Ok(false)` if its index had
    /// already been seen (the earlier chunk is kept).
    pub fn accept(&mut self, chunk: StrokeChunk<T>) -> Result<bool, ReassemblyError> {
        if chunk.total_chunks != self.total_chunks {
            return Err(ReassemblyError::TotalMismatch {
                expected: self.total_chunks,
                got: chunk.total_chunks,
            });
        }
        if chunk.chunk_index >= self.total_chunks {
            return Err(ReassemblyError::IndexOutOfRange {
                index: chunk.chunk_index,
                total_chunks: self.total_chunks,
            });
        }
        if self.parts.contains_key(&chunk.chunk_index) {
            return Ok(false);
        }
        self.parts.insert(chunk.chunk_index, chunk.points);
        Ok(true)
    }

    /// Concatenate the buffered chunks in index order.
    pub fn into_points(self) -> Result<Vec<T>, ReassemblyError> {
        if !self.is_complete() {
            return Err(ReassemblyError::Incomplete {
                received: self.parts.len(),
                total_chunks: self.total_chunks,
            });
        }
        Ok(self.parts.into_values().flatten().collect())
    }
}

/// Reassembly buffers for many strokes, keyed by stroke id.
#[derive(Debug, Clone)]
pub struct ChunkAssembler<T = Point> {
    pending: HashMap<String, StrokeReassembler<T>>,
}

impl<T> Default for ChunkAssembler<T> {
    fn default() -> Self {
        Self {
            pending: HashMap::new(),
        }
    }
}

impl<T> ChunkAssembler<T> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one chunk for `stroke_id`.
    ///
    /// Returns the full point sequence once the last missing chunk arrives;
    /// the buffer for that stroke is dropped at that point.
    ///
    /// A chunk announcing a different `total_chunks` than the pending buffer
    /// belongs to a newer save of the same stroke. The stale partial buffer is
    /// discarded and reassembly restarts from that chunk, so a lost chunk
    /// never blocks later versions.
    pub fn push(
        &mut self,
        stroke_id: &str,
        chunk: StrokeChunk<T>,
    ) -> Result<Option<Vec<T>>, ReassemblyError> {
        let buffer = self
            .pending
            .entry(stroke_id.to_string())
            .or_insert_with(|| StrokeReassembler::new(chunk.total_chunks));
        if buffer.total_chunks != chunk.total_chunks {
            *buffer = StrokeReassembler::new(chunk.total_chunks);
        }

        if let Err(e) = buffer.accept(chunk) {
            if buffer.received() == 0 {
                self.pending.remove(stroke_id);
            }
            return Err(e);
        }
        if !buffer.is_complete() {
            return Ok(None);
        }

        match self.pending.remove(stroke_id) {
            Some(buffer) => buffer.into_points().map(Some),
            None => Ok(None),
        }
    }

    /// Forget any partial state for `stroke_id`.
    pub fn discard(&mut self, stroke_id: &str) -> bool {
        self.pending.remove(stroke_id).is_some()
    }

    /// Drop every partial stroke (e.g. when the whiteboard is cleared).
    pub fn clear(&mut self) {
        self.pending.clear();
    }

    /// Number of strokes still waiting for chunks.
    pub fn pending(&self) -> usize {
        self.pending.len()
    }
}
