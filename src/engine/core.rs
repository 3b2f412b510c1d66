use std::io;

use rayon::prelude::*;
use thiserror::Error;

use crate::chunk::{self, ByteRange, DEFAULT_CHUNK_SIZE};
use crate::engine::source::ByteSource;
use crate::scan::{self, ChunkCounts, FreqMap, WordPolicy};

/// What the run produces: a total, or a total plus per-word frequencies.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CountMode {
    TotalOnly,
    WithFrequencies,
}

/// How chunk-boundary word splits are corrected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundaryStrategy {
    /// Grow each boundary forward onto a separator before scanning, so no
    /// word is ever split. Correct for totals and for frequency keys.
    RangeExtend,
    /// Scan nominal ranges and let the reducer subtract one word per
    /// adjacent pair whose facing edges both sit inside a word. Correct for
    /// totals only — a split word still lands under two partial keys, which
    /// is why frequency runs refuse this strategy.
    FlagSubtract,
}

/// Tunables for one counting run.
#[derive(Debug, Clone, Copy)]
pub struct CountOptions {
    /// Target chunk size in bytes.
    pub chunk_size: u64,
    /// Worker threads; 0 means one per hardware thread (rayon's default).
    pub threads: usize,
    pub mode: CountMode,
    pub strategy: BoundaryStrategy,
}

impl Default for CountOptions {
    fn default() -> Self {
        CountOptions {
            chunk_size: DEFAULT_CHUNK_SIZE,
            threads: 0,
            mode: CountMode::TotalOnly,
            strategy: BoundaryStrategy::RangeExtend,
        }
    }
}

impl CountOptions {
    /// The byte-classification policy is tied to the mode so one run can
    /// never mix policies across scanners: coarse wc-style words for plain
    /// totals, alphanumeric runs for frequency keys.
    #[inline]
    pub fn policy(&self) -> WordPolicy {
        match self.mode {
            CountMode::TotalOnly => WordPolicy::NonSpace,
            CountMode::WithFrequencies => WordPolicy::Alnum,
        }
    }
}

/// Final merged result of one run. Built once by the reducer after every
/// chunk task has completed; `frequencies` is present exactly in
/// `WithFrequencies` mode.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct GlobalResult {
    pub total_words: u64,
    pub frequencies: Option<FreqMap>,
}

impl GlobalResult {
    fn empty(mode: CountMode) -> Self {
        GlobalResult {
            total_words: 0,
            frequencies: (mode == CountMode::WithFrequencies).then(FreqMap::new),
        }
    }

    /// Number of distinct normalized words (frequency mode only).
    pub fn unique_words(&self) -> Option<usize> {
        self.frequencies.as_ref().map(|m| m.len())
    }
}

#[derive(Debug, Error)]
pub enum CountError {
    /// The source cannot be opened or its length determined; nothing was
    /// planned or scanned.
    #[error("cannot open source: {0}")]
    SourceUnavailable(#[source] io::Error),

    /// One chunk's read did not return its full byte range. The whole run
    /// aborts — a partial count is worse than no count.
    #[error("read of {len} bytes at offset {offset} failed: {source}")]
    ReadFailure {
        offset: u64,
        len: usize,
        #[source]
        source: io::Error,
    },

    /// Flag-and-subtract repairs totals but leaves a boundary-split word
    /// under two partial keys, so frequency runs must use range extension.
    #[error("frequency counting requires the range-extension boundary strategy")]
    FrequenciesNeedRangeExtension,

    #[error("cannot build worker pool: {0}")]
    WorkerPool(#[from] rayon::ThreadPoolBuildError),
}

/// Count words (and, in frequency mode, per-word occurrences) over `source`.
///
/// The source is partitioned into chunks, one scan task per chunk runs on a
/// rayon pool with no shared mutable state, and the per-chunk results are
/// folded in chunk-index order after all tasks complete. Chunking is an
/// optimization, not a semantic change: the result is identical for every
/// `chunk_size` and `threads` value, and identical to a single sequential
/// scan of the whole source.
pub fn count_words<S: ByteSource + ?Sized>(
    source: &S,
    opts: &CountOptions,
) -> Result<GlobalResult, CountError> {
    if opts.mode == CountMode::WithFrequencies && opts.strategy == BoundaryStrategy::FlagSubtract {
        return Err(CountError::FrequenciesNeedRangeExtension);
    }

    let len = source.len();
    if len == 0 {
        return Ok(GlobalResult::empty(opts.mode));
    }

    let policy = opts.policy();
    let nominal = chunk::plan_chunks(len, opts.chunk_size);
    let ranges = match opts.strategy {
        BoundaryStrategy::RangeExtend => {
            chunk::align_ranges(&nominal, |pos| next_separator(source, policy, pos))?
        }
        BoundaryStrategy::FlagSubtract => nominal,
    };

    let collect_frequencies = opts.mode == CountMode::WithFrequencies;

    // A lone chunk needs no pool; skip rayon entirely (its startup cost
    // dominates small inputs).
    let results: Vec<ChunkCounts> = if ranges.len() == 1 {
        vec![scan_range(source, ranges[0], policy, collect_frequencies)?]
    } else if opts.threads == 0 {
        scan_all(source, &ranges, policy, collect_frequencies)?
    } else {
        let pool = rayon::ThreadPoolBuilder::new()
            .num_threads(opts.threads)
            .build()?;
        pool.install(|| scan_all(source, &ranges, policy, collect_frequencies))?
    };

    Ok(reduce(results, opts))
}

/// One task per range. `collect` is the barrier: it completes only when
/// every task has, preserves chunk-index order regardless of completion
/// order, and short-circuits the run on the first failed chunk.
fn scan_all<S: ByteSource + ?Sized>(
    source: &S,
    ranges: &[ByteRange],
    policy: WordPolicy,
    collect_frequencies: bool,
) -> Result<Vec<ChunkCounts>, CountError> {
    ranges
        .par_iter()
        .map(|&range| scan_range(source, range, policy, collect_frequencies))
        .collect()
}

/// Scan one boundary-resolved range. In-memory sources lend the scanner a
/// subslice; positioned sources read the range into a task-private buffer.
fn scan_range<S: ByteSource + ?Sized>(
    source: &S,
    range: ByteRange,
    policy: WordPolicy,
    collect_frequencies: bool,
) -> Result<ChunkCounts, CountError> {
    if let Some(data) = source.as_slice() {
        let data = &data[range.start as usize..range.end as usize];
        return Ok(scan::scan_chunk(data, policy, collect_frequencies));
    }
    let mut buf = vec![0u8; range.len() as usize];
    source.read_at(range.start, &mut buf)?;
    Ok(scan::scan_chunk(&buf, policy, collect_frequencies))
}

/// Probe block size for boundary walks on positioned sources. Boundary
/// overshoot is typically a fraction of one word, so a small block almost
/// always resolves the walk in one read.
const PROBE_BLOCK: usize = 4096;

/// First offset `>= from` whose byte is a separator under `policy`, or the
/// source length. This is the range-extension walk: bounded by source
/// length, and the extender never asks about bytes an earlier walk already
/// claimed.
fn next_separator<S: ByteSource + ?Sized>(
    source: &S,
    policy: WordPolicy,
    from: u64,
) -> Result<u64, CountError> {
    let len = source.len();
    if let Some(data) = source.as_slice() {
        let rest = &data[from.min(len) as usize..];
        return Ok(match rest.iter().position(|&b| !policy.is_word_byte(b)) {
            Some(i) => from + i as u64,
            None => len,
        });
    }

    let mut block = [0u8; PROBE_BLOCK];
    let mut pos = from;
    while pos < len {
        let n = PROBE_BLOCK.min((len - pos) as usize);
        source.read_at(pos, &mut block[..n])?;
        if let Some(i) = block[..n].iter().position(|&b| !policy.is_word_byte(b)) {
            return Ok(pos + i as u64);
        }
        pos += n as u64;
    }
    Ok(len)
}

/// Fold per-chunk results into the global result, in chunk-index order.
/// Totals and key-wise map merges are commutative, so the outcome does not
/// depend on which task finished first; only the flag-and-subtract
/// correction needs the index order, comparing each chunk's trailing edge
/// with its successor's leading edge.
fn reduce(chunks: Vec<ChunkCounts>, opts: &CountOptions) -> GlobalResult {
    let mut global = GlobalResult::empty(opts.mode);
    let mut prev_ends_with_word = false;

    for (i, counts) in chunks.into_iter().enumerate() {
        global.total_words += counts.words;
        if opts.strategy == BoundaryStrategy::FlagSubtract
            && i > 0
            && prev_ends_with_word
            && counts.starts_with_word
        {
            // The word straddling this boundary started once in each
            // neighbor; drop the duplicate.
            global.total_words -= 1;
        }
        prev_ends_with_word = counts.ends_with_word;

        if let (Some(global_map), Some(local)) = (global.frequencies.as_mut(), counts.frequencies) {
            if global_map.is_empty() {
                *global_map = local;
            } else {
                for (word, n) in local {
                    *global_map.entry(word).or_insert(0) += n;
                }
            }
        }
    }
    global
}
