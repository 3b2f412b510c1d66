use std::io::{self, BufWriter, Write};
use std::path::Path;
use std::process;
use std::time::Instant;

use clap::{Parser, ValueEnum};

use wordfreq_rs::chunk::DEFAULT_CHUNK_SIZE;
use wordfreq_rs::common::io::{read_file, read_stdin};
use wordfreq_rs::engine::{
    BoundaryStrategy, CountMode, CountOptions, GlobalResult, PositionedFile, count_words,
};
use wordfreq_rs::io_error_msg;

#[derive(Parser)]
#[command(
    name = "wf",
    about = "Count words, and word frequencies, in parallel over large files"
)]
struct Cli {
    /// Print per-word frequencies (lower-cased alphanumeric words)
    #[arg(short = 'f', long = "frequencies")]
    frequencies: bool,

    /// Print only the N most frequent words (implies -f)
    #[arg(long = "top", value_name = "N")]
    top: Option<usize>,

    /// Chunk size in bytes for parallel scanning
    #[arg(long = "chunk-size", value_name = "BYTES", default_value_t = DEFAULT_CHUNK_SIZE)]
    chunk_size: u64,

    /// Worker threads (0 = one per hardware thread)
    #[arg(short = 'j', long = "threads", value_name = "N", default_value_t = 0)]
    threads: usize,

    /// How words split by a chunk boundary are corrected
    #[arg(long = "strategy", value_enum, default_value = "range-extend")]
    strategy: StrategyArg,

    /// Read files with positioned reads (pread) instead of mmap
    #[arg(long = "no-mmap")]
    no_mmap: bool,

    /// Report elapsed wall time on stderr
    #[arg(long = "time")]
    time: bool,

    /// Files to process (reads stdin if none given)
    files: Vec<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum StrategyArg {
    /// Word-aligned chunk boundaries; exact totals and frequencies
    RangeExtend,
    /// Nominal boundaries with an adjacency correction; totals only
    FlagSubtract,
}

impl From<StrategyArg> for BoundaryStrategy {
    fn from(arg: StrategyArg) -> Self {
        match arg {
            StrategyArg::RangeExtend => BoundaryStrategy::RangeExtend,
            StrategyArg::FlagSubtract => BoundaryStrategy::FlagSubtract,
        }
    }
}

/// Compute number of decimal digits needed to display a value.
fn num_width(n: u64) -> usize {
    if n == 0 {
        return 1;
    }
    let mut width = 0;
    let mut val = n;
    while val > 0 {
        val /= 10;
        width += 1;
    }
    width
}

fn main() {
    wordfreq_rs::reset_sigpipe();
    let cli = Cli::parse();

    let mode = if cli.frequencies || cli.top.is_some() {
        CountMode::WithFrequencies
    } else {
        CountMode::TotalOnly
    };
    let options = CountOptions {
        chunk_size: cli.chunk_size,
        threads: cli.threads,
        mode,
        strategy: cli.strategy.into(),
    };

    let files: Vec<String> = if cli.files.is_empty() {
        vec!["-".to_string()] // stdin
    } else {
        cli.files.clone()
    };

    let started = Instant::now();

    // Phase 1: count every operand
    let mut results: Vec<(GlobalResult, String)> = Vec::new();
    let mut had_error = false;

    for filename in &files {
        let counted = if filename == "-" {
            match read_stdin() {
                Ok(data) => count_words(data.as_slice(), &options),
                Err(e) => {
                    eprintln!("wf: standard input: {}", io_error_msg(&e));
                    had_error = true;
                    continue;
                }
            }
        } else if cli.no_mmap {
            match PositionedFile::open(Path::new(filename)) {
                Ok(source) => count_words(&source, &options),
                Err(e) => Err(e),
            }
        } else {
            match read_file(Path::new(filename)) {
                Ok(data) => count_words(&data, &options),
                Err(e) => {
                    eprintln!("wf: {}: {}", filename, io_error_msg(&e));
                    had_error = true;
                    continue;
                }
            }
        };

        match counted {
            Ok(result) => {
                let display_name = if filename == "-" {
                    String::new()
                } else {
                    filename.clone()
                };
                results.push((result, display_name));
            }
            Err(e) => {
                eprintln!("wf: {}: {}", filename, e);
                had_error = true;
            }
        }
    }

    let elapsed = started.elapsed();

    // Phase 2: print
    let mut out = BufWriter::with_capacity(64 * 1024, io::stdout().lock());
    match mode {
        CountMode::TotalOnly => print_totals(&mut out, &results),
        CountMode::WithFrequencies => print_frequencies(&mut out, &results, cli.top),
    }
    let _ = out.flush();

    if cli.time {
        eprintln!("wf: elapsed {:.3}s", elapsed.as_secs_f64());
    }

    if had_error {
        process::exit(1);
    }
}

/// Total-only output: one right-aligned count per operand, plus a total row
/// when more than one operand was counted.
fn print_totals(out: &mut impl Write, results: &[(GlobalResult, String)]) {
    let total: u64 = results.iter().map(|(r, _)| r.total_words).sum();
    let width = num_width(total);

    for (result, name) in results {
        if name.is_empty() {
            let _ = writeln!(out, "{:>width$}", result.total_words);
        } else {
            let _ = writeln!(out, "{:>width$} {}", result.total_words, name);
        }
    }
    if results.len() > 1 {
        let _ = writeln!(out, "{:>width$} total", total);
    }
}

/// Frequency output: summary header plus the table sorted by descending
/// count, ties in byte order. The ordering is presentation only — the
/// underlying mapping carries no ordering contract.
fn print_frequencies(
    out: &mut impl Write,
    results: &[(GlobalResult, String)],
    top: Option<usize>,
) {
    for (i, (result, name)) in results.iter().enumerate() {
        if results.len() > 1 {
            if i > 0 {
                let _ = writeln!(out);
            }
            let _ = writeln!(out, "==> {} <==", name);
        }

        let _ = writeln!(out, "Total words: {}", result.total_words);
        let Some(map) = result.frequencies.as_ref() else {
            continue;
        };
        let _ = writeln!(out, "Unique words: {}", map.len());

        let mut entries: Vec<(&Vec<u8>, u64)> = map.iter().map(|(w, &n)| (w, n)).collect();
        entries.sort_unstable_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(b.0)));
        if let Some(n) = top {
            entries.truncate(n);
        }

        let width = entries.first().map_or(1, |&(_, n)| num_width(n));
        for (word, n) in entries {
            let _ = write!(out, "{:>width$} ", n);
            let _ = out.write_all(word);
            let _ = writeln!(out);
        }
    }
}
