use std::collections::HashMap;

/// Frequency mapping local to one chunk (and, after reduction, global).
/// Keys are normalized words: lower-cased ASCII alphanumeric runs. Equality
/// and hashing are by byte content, so the map never depends on any encoding
/// beyond the byte values themselves.
pub type FreqMap = HashMap<Vec<u8>, u64>;

/// Byte classification fixed for one counting run. Every scanner in a run
/// uses the same policy; the boundary flags of a chunk are only comparable
/// to its neighbors' flags under the policy that produced them.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum WordPolicy {
    /// Any non-whitespace byte is word content (wc-style counting).
    /// Whitespace is the C locale set: space, \t, \n, \v, \f, \r.
    NonSpace,
    /// Only ASCII alphanumeric bytes are word content; punctuation and every
    /// other byte separates. Used for frequency counting so punctuation never
    /// becomes part of a stored word.
    Alnum,
}

/// Word-content lookup table for branchless boundary detection:
/// `table[byte] == 1` if the byte is word content under NonSpace.
const fn make_nonspace_table() -> [u8; 256] {
    let mut t = [1u8; 256];
    t[0x09] = 0; // \t  horizontal tab
    t[0x0A] = 0; // \n  newline
    t[0x0B] = 0; // \v  vertical tab
    t[0x0C] = 0; // \f  form feed
    t[0x0D] = 0; // \r  carriage return
    t[0x20] = 0; //     space
    t
}

/// Word-content lookup table under Alnum: ASCII digits and letters only.
const fn make_alnum_table() -> [u8; 256] {
    let mut t = [0u8; 256];
    let mut b = b'0';
    while b <= b'9' {
        t[b as usize] = 1;
        b += 1;
    }
    let mut b = b'A';
    while b <= b'Z' {
        t[b as usize] = 1;
        b += 1;
    }
    let mut b = b'a';
    while b <= b'z' {
        t[b as usize] = 1;
        b += 1;
    }
    t
}

const NONSPACE_TABLE: [u8; 256] = make_nonspace_table();
const ALNUM_TABLE: [u8; 256] = make_alnum_table();

impl WordPolicy {
    #[inline]
    fn table(self) -> &'static [u8; 256] {
        match self {
            WordPolicy::NonSpace => &NONSPACE_TABLE,
            WordPolicy::Alnum => &ALNUM_TABLE,
        }
    }

    /// True if `b` is word content under this policy.
    #[inline]
    pub fn is_word_byte(self, b: u8) -> bool {
        self.table()[b as usize] == 1
    }
}

/// Per-chunk scan output. Produced once by the task that scanned the range,
/// immutable afterwards, consumed by the reducer.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkCounts {
    /// Number of word starts seen inside the range.
    pub words: u64,
    /// Local frequency mapping; present only in frequency mode.
    pub frequencies: Option<FreqMap>,
    /// First byte of the range is word content (false for an empty range).
    pub starts_with_word: bool,
    /// Last byte of the range is word content (false for an empty range).
    pub ends_with_word: bool,
}

/// Count words using a branchless lookup table.
/// A word is a maximal run of word-content bytes under `policy`.
///
/// A word starts at each transition from separator to word content. The
/// lookup table and XOR/AND avoid all branches in the hot loop, eliminating
/// branch misprediction. This is also the sequential reference: scanning the
/// whole input as one chunk is the oracle the chunked engine is tested
/// against.
pub fn count_words_in(data: &[u8], policy: WordPolicy) -> u64 {
    let table = policy.table();
    let mut words = 0u64;
    let mut prev_word = 0u8; // treat start-of-data as a separator

    for &b in data {
        let curr_word = table[b as usize];
        // 1 only at separator→word transitions.
        words += ((prev_word ^ 1) & curr_word) as u64;
        prev_word = curr_word;
    }
    words
}

/// Scan one chunk. The range must already be boundary-resolved by the
/// caller: either word-aligned (range extension) or nominal with the flags
/// consumed by the reducer (flag-and-subtract).
///
/// In frequency mode, word-content bytes are lower-cased into a buffer and
/// flushed into the local map on each word→separator transition. End of
/// range flushes a pending word as-is — correct when ranges are word-aligned,
/// which the engine guarantees for every frequency run.
pub fn scan_chunk(data: &[u8], policy: WordPolicy, collect_frequencies: bool) -> ChunkCounts {
    let mut counts = ChunkCounts {
        frequencies: collect_frequencies.then(FreqMap::new),
        ..ChunkCounts::default()
    };

    if data.is_empty() {
        return counts;
    }

    match counts.frequencies.as_mut() {
        None => counts.words = count_words_in(data, policy),
        Some(map) => {
            let mut word: Vec<u8> = Vec::with_capacity(32);
            for &b in data {
                if policy.is_word_byte(b) {
                    word.push(b.to_ascii_lowercase());
                } else if !word.is_empty() {
                    counts.words += 1;
                    *map.entry(std::mem::take(&mut word)).or_insert(0) += 1;
                }
            }
            if !word.is_empty() {
                counts.words += 1;
                *map.entry(word).or_insert(0) += 1;
            }
        }
    }

    counts.starts_with_word = policy.is_word_byte(data[0]);
    counts.ends_with_word = policy.is_word_byte(data[data.len() - 1]);
    counts
}
