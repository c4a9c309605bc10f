use std::path::Path;

use anyhow::Result;

use glosstrack::Config;

use super::load_chunk_set;

pub async fn cmd_ingest(path: &Path, language: Option<&str>, pretty: bool, config: &Config) -> Result<()> {
    let chunk_set = load_chunk_set(path, language, config).await?;
    let portable = chunk_set.to_portable()?;

    let json = if pretty {
        serde_json::to_string_pretty(&portable)?
    } else {
        serde_json::to_string(&portable)?
    };
    println!("{json}");
    Ok(())
}
