mod at;
mod ingest;
mod range;
mod render;

pub use at::cmd_at;
pub use ingest::cmd_ingest;
pub use range::cmd_range;
pub use render::cmd_render;

use std::path::Path;

use anyhow::{Context, Result};

use glosstrack::{load_subtitle_track, render_plain, ChunkSet, Config, PortableChunkSet, TimeRangeChunk};

/// Load a chunk set from an SRT file or a portable `.json` dump.
///
/// `language` wins over the configured ingest language; neither applies to
/// JSON input.
pub async fn load_chunk_set(path: &Path, language: Option<&str>, config: &Config) -> Result<ChunkSet> {
    let content = tokio::fs::read_to_string(path)
        .await
        .with_context(|| format!("failed to read {}", path.display()))?;

    let is_json = path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        let portable: PortableChunkSet = serde_json::from_str(&content)
            .with_context(|| format!("invalid chunk set JSON in {}", path.display()))?;
        return ChunkSet::from_portable(portable)
            .with_context(|| format!("invalid chunk set in {}", path.display()));
    }

    let language = language.or(config.ingest.language.as_deref());
    let track = load_subtitle_track(&content, language, None)
        .with_context(|| format!("failed to ingest {}", path.display()))?;
    Ok(track.chunk_set)
}

/// One line per chunk: `begin --> end  text`, with line breaks shown as ` / `
pub fn print_chunks(chunks: &[&TimeRangeChunk], config: &Config) {
    let renderer = config.renderer();
    for chunk in chunks {
        let range = chunk.range();
        let text = render_plain(&renderer.render(chunk.anno_text()));
        let text = text.trim_end_matches('\n').replace('\n', " / ");
        println!("{:>9.3} --> {:<9.3}  {text}", range.begin, range.end);
    }
}
