use std::path::Path;

use anyhow::Result;

use glosstrack::render::html::to_html;
use glosstrack::{render_plain, Config, TimeRangeChunk};

use super::load_chunk_set;

pub async fn cmd_render(path: &Path, at: Option<f64>, html: bool, config: &Config) -> Result<()> {
    let chunk_set = load_chunk_set(path, None, config).await?;
    let chunks: Vec<&TimeRangeChunk> = match at {
        Some(t) => chunk_set.get_chunks_at_time(t),
        None => chunk_set.iter().collect(),
    };

    let renderer = config.renderer();
    for chunk in chunks {
        let tree = renderer.render(chunk.anno_text());
        if html {
            let range = chunk.range();
            println!(
                "<p data-begin=\"{}\" data-end=\"{}\">{}</p>",
                range.begin,
                range.end,
                to_html(&tree)
            );
        } else {
            print!("{}", render_plain(&tree));
        }
    }
    Ok(())
}
