use std::path::Path;

use anyhow::Result;

use glosstrack::Config;

use super::{load_chunk_set, print_chunks};

pub async fn cmd_at(path: &Path, seconds: f64, config: &Config) -> Result<()> {
    let chunk_set = load_chunk_set(path, None, config).await?;
    let chunks = chunk_set.get_chunks_at_time(seconds);

    if chunks.is_empty() {
        eprintln!("No chunks at {seconds}s");
        return Ok(());
    }
    print_chunks(&chunks, config);
    Ok(())
}
