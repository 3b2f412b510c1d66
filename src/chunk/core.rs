/// Default chunk size: large enough to amortize per-task overhead, small
/// enough that a multi-GB file still yields many chunks per worker for load
/// balancing.
pub const DEFAULT_CHUNK_SIZE: u64 = 4 * 1024 * 1024; // 4MB

/// Half-open byte range `[start, end)` assigned to one scan task.
/// For one run, the planned ranges are disjoint and jointly cover
/// `[0, source_len)` exactly once.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ByteRange {
    pub start: u64,
    pub end: u64,
}

impl ByteRange {
    #[inline]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// Divide `[0, len)` into `ceil(len / chunk_size)` nominal contiguous ranges.
/// An empty source yields no chunks; otherwise no range is ever empty.
pub fn plan_chunks(len: u64, chunk_size: u64) -> Vec<ByteRange> {
    let chunk_size = chunk_size.max(1);
    if len == 0 {
        return Vec::new();
    }
    let num_chunks = len.div_ceil(chunk_size);
    (0..num_chunks)
        .map(|i| {
            let start = i * chunk_size;
            ByteRange {
                start,
                end: start.saturating_add(chunk_size).min(len),
            }
        })
        .collect()
}

/// Move every interior chunk boundary forward onto a separator byte so no
/// word is split across two ranges (range-extension strategy).
///
/// `next_separator(pos)` must return the first offset `>= pos` whose byte is
/// a separator under the run's word policy, or the source length if the tail
/// is all word content. The walk for boundary `i` starts at
/// `max(nominal_end, previous_boundary)`, so a word spanning several chunks
/// is walked once, not once per boundary it crosses.
///
/// Ranges that collapse to empty (a word longer than a whole chunk swallows
/// its successor) are dropped; the survivors stay disjoint, word-aligned,
/// and jointly cover the same `[0, len)`.
pub fn align_ranges<E>(
    ranges: &[ByteRange],
    mut next_separator: impl FnMut(u64) -> Result<u64, E>,
) -> Result<Vec<ByteRange>, E> {
    let Some(last) = ranges.last() else {
        return Ok(Vec::new());
    };

    let mut aligned = Vec::with_capacity(ranges.len());
    let mut boundary = ranges[0].start;
    for range in &ranges[..ranges.len() - 1] {
        let start = boundary;
        // If an earlier extension already passed this nominal split, the
        // probe starts on a known separator and returns immediately.
        boundary = next_separator(range.end.max(boundary))?;
        aligned.push(ByteRange {
            start,
            end: boundary,
        });
    }
    aligned.push(ByteRange {
        start: boundary,
        end: last.end.max(boundary),
    });

    aligned.retain(|r| !r.is_empty());
    Ok(aligned)
}
