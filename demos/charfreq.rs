//! # Character Frequency Example
//!
//! Counts alphabetic characters (uppercased) in a file with a parallel
//! chunked map/reduce and prints the mapping, most frequent first.
//!
//! ## Run
//! ```bash
//! cargo run --example charfreq -- path/to/file.txt
//! ```

use std::time::Instant;

use anyhow::Context;

fn main() -> anyhow::Result<()> {
    let path = std::env::args()
        .nth(1)
        .context("usage: charfreq <file>")?;

    let started = Instant::now();
    let counts = unitvisor::charfreq::scan_file(&path)
        .with_context(|| format!("failed to read '{path}'"))?;

    let mut rows: Vec<(char, usize)> = counts.into_iter().collect();
    rows.sort_by(|a, b| b.1.cmp(&a.1).then(a.0.cmp(&b.0)));
    for (ch, n) in rows {
        println!("{ch} {n}");
    }
    println!("processed in {:?}", started.elapsed());
    Ok(())
}
