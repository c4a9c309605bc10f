use std::path::Path;

use anyhow::Result;

use glosstrack::{Config, TimeRange};

use super::{load_chunk_set, print_chunks};

pub async fn cmd_range(path: &Path, begin: f64, end: f64, config: &Config) -> Result<()> {
    // Reject reversed or non-finite bounds instead of printing nothing
    TimeRange::new(begin, end)?;

    let chunk_set = load_chunk_set(path, None, config).await?;
    let chunks = chunk_set.get_chunks_in_range(begin, end);

    eprintln!("{} of {} chunks in [{begin}, {end})", chunks.len(), chunk_set.len());
    print_chunks(&chunks, config);
    Ok(())
}
