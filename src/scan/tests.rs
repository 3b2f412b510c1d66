use super::*;

fn freqs(data: &[u8]) -> FreqMap {
    scan_chunk(data, WordPolicy::Alnum, true)
        .frequencies
        .unwrap()
}

fn freq_of(map: &FreqMap, word: &str) -> u64 {
    map.get(word.as_bytes()).copied().unwrap_or(0)
}

// ──────────────────────────────────────────────────
// Word policy tests
// ──────────────────────────────────────────────────

#[test]
fn test_nonspace_whitespace_set() {
    for b in [b' ', b'\t', b'\n', 0x0B, 0x0C, b'\r'] {
        assert!(!WordPolicy::NonSpace.is_word_byte(b), "byte {:#04x}", b);
    }
}

#[test]
fn test_nonspace_everything_else_is_word_content() {
    // NUL, control chars, punctuation, high bytes: all word content
    for b in [0x00u8, 0x01, 0x7F, b'!', b'a', b'0', 0x80, 0xFF] {
        assert!(WordPolicy::NonSpace.is_word_byte(b), "byte {:#04x}", b);
    }
}

#[test]
fn test_alnum_word_content() {
    for b in [b'a', b'z', b'A', b'Z', b'0', b'9'] {
        assert!(WordPolicy::Alnum.is_word_byte(b), "byte {:#04x}", b);
    }
}

#[test]
fn test_alnum_separators() {
    // Punctuation, whitespace, control chars, and high bytes all separate
    for b in [b' ', b'\n', b'-', b'\'', b'.', b',', 0x00u8, 0x7F, 0x80, 0xFF] {
        assert!(!WordPolicy::Alnum.is_word_byte(b), "byte {:#04x}", b);
    }
}

// ──────────────────────────────────────────────────
// Word counting tests
// ──────────────────────────────────────────────────

#[test]
fn test_count_words_empty() {
    assert_eq!(count_words_in(b"", WordPolicy::NonSpace), 0);
    assert_eq!(count_words_in(b"", WordPolicy::Alnum), 0);
}

#[test]
fn test_count_words_single() {
    assert_eq!(count_words_in(b"hello", WordPolicy::NonSpace), 1);
}

#[test]
fn test_count_words_multiple() {
    assert_eq!(count_words_in(b"hello world", WordPolicy::NonSpace), 2);
}

#[test]
fn test_count_words_leading_trailing_whitespace() {
    assert_eq!(count_words_in(b"  hello  world  ", WordPolicy::NonSpace), 2);
}

#[test]
fn test_count_words_tabs_and_newlines() {
    assert_eq!(count_words_in(b"one\ttwo\nthree", WordPolicy::NonSpace), 3);
}

#[test]
fn test_count_words_all_whitespace() {
    assert_eq!(count_words_in(b" \t\n\r\x0B\x0C", WordPolicy::NonSpace), 0);
}

#[test]
fn test_count_words_punctuation_policies_differ() {
    // "don't stop" — NonSpace sees 2 words; Alnum sees 3 (apostrophe splits)
    assert_eq!(count_words_in(b"don't stop", WordPolicy::NonSpace), 2);
    assert_eq!(count_words_in(b"don't stop", WordPolicy::Alnum), 3);
}

#[test]
fn test_count_words_alnum_digits() {
    assert_eq!(count_words_in(b"route 66, exit 9", WordPolicy::Alnum), 4);
}

#[test]
fn test_count_words_binary_nonspace() {
    // NUL is word content under NonSpace — "a\x00b" is one word
    assert_eq!(count_words_in(b"a\x00b", WordPolicy::NonSpace), 1);
    // ...but a separator under Alnum
    assert_eq!(count_words_in(b"a\x00b", WordPolicy::Alnum), 2);
}

// ──────────────────────────────────────────────────
// Chunk scanner tests
// ──────────────────────────────────────────────────

#[test]
fn test_scan_chunk_empty() {
    let counts = scan_chunk(b"", WordPolicy::NonSpace, false);
    assert_eq!(counts, ChunkCounts::default());
}

#[test]
fn test_scan_chunk_boundary_flags() {
    let counts = scan_chunk(b"hello world", WordPolicy::NonSpace, false);
    assert_eq!(counts.words, 2);
    assert!(counts.starts_with_word);
    assert!(counts.ends_with_word);

    let counts = scan_chunk(b" hello ", WordPolicy::NonSpace, false);
    assert_eq!(counts.words, 1);
    assert!(!counts.starts_with_word);
    assert!(!counts.ends_with_word);
}

#[test]
fn test_scan_chunk_flags_respect_policy() {
    // '!' is word content under NonSpace, a separator under Alnum
    let counts = scan_chunk(b"!ab!", WordPolicy::NonSpace, false);
    assert!(counts.starts_with_word && counts.ends_with_word);

    let counts = scan_chunk(b"!ab!", WordPolicy::Alnum, false);
    assert!(!counts.starts_with_word && !counts.ends_with_word);
}

#[test]
fn test_scan_chunk_no_frequencies_requested() {
    let counts = scan_chunk(b"a b c", WordPolicy::NonSpace, false);
    assert!(counts.frequencies.is_none());
}

#[test]
fn test_scan_chunk_frequencies_basic() {
    let map = freqs(b"the cat and the hat");
    assert_eq!(freq_of(&map, "the"), 2);
    assert_eq!(freq_of(&map, "cat"), 1);
    assert_eq!(freq_of(&map, "hat"), 1);
    assert_eq!(map.len(), 4);
}

#[test]
fn test_scan_chunk_frequencies_lowercase_normalization() {
    let map = freqs(b"Hello HELLO hello");
    assert_eq!(freq_of(&map, "hello"), 3);
    assert_eq!(map.len(), 1);
}

#[test]
fn test_scan_chunk_frequencies_punctuation_separates() {
    // Punctuation never becomes part of a stored word
    let map = freqs(b"end. End! end?");
    assert_eq!(freq_of(&map, "end"), 3);
    assert_eq!(map.len(), 1);
}

#[test]
fn test_scan_chunk_frequencies_trailing_word_flushed() {
    let map = freqs(b"alpha beta");
    assert_eq!(freq_of(&map, "beta"), 1);
}

#[test]
fn test_scan_chunk_frequencies_word_count_matches_map_sum() {
    let counts = scan_chunk(b"a bb a ccc bb a", WordPolicy::Alnum, true);
    let map = counts.frequencies.as_ref().unwrap();
    let sum: u64 = map.values().sum();
    assert_eq!(counts.words, sum);
    assert_eq!(counts.words, 6);
}

#[test]
fn test_scan_chunk_frequency_counts_match_plain_count() {
    // Frequency scan and branchless count agree on the same policy
    let data = b"one, two; three... 42 forty-two";
    let counts = scan_chunk(data, WordPolicy::Alnum, true);
    assert_eq!(counts.words, count_words_in(data, WordPolicy::Alnum));
}
