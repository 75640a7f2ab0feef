use config_file::FromConfigFile;
use serde::Deserialize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use iff_timetables::error::Error;
use iff_timetables::fetcher::Fetcher;
use iff_timetables::file_fetcher::{FileFetcher, FileFetcherConfig};
use iff_timetables::iff_importer::{IffImporter, IffImporterConfig};
use iff_timetables::importer::Importer;
use iff_timetables::schedule::Schedule;

#[derive(Clone, Deserialize)]
struct Config {
    iff: IffImporterConfig,
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_target(false)
        .init();

    let path = std::env::args().nth(1).unwrap_or_else(|| "./config.toml".to_string());
    let config = Config::from_config_file(&path)?.iff;

    let fetcher = FileFetcher::new(FileFetcherConfig {
        directory: config.directory.clone(),
    });
    let mut schedule = Schedule::new(config.namespace.clone());

    // files without identification take their window from an earlier one
    let mut files = config.files.clone();
    files.sort_by_key(|file| !file.identification);

    for file in files {
        info!("Importing {} as {:?}", file.file.display(), file.kind);
        let data = fetcher.fetch(&file.file).await?;
        let truncation = config.truncation;
        schedule = tokio::task::spawn_blocking(move || {
            let mut importer = IffImporter::new(truncation);
            if file.identification {
                importer.overlay(file.kind, data, schedule)
            } else {
                importer.overlay_without_identification(file.kind, data, schedule)
            }
        })
        .await??;
    }

    info!(
        "Schedule {} has {} stations, {} footnotes and {} services",
        schedule.namespace,
        schedule.stations.len(),
        schedule.footnotes.len(),
        schedule.services.len()
    );

    if let Some(output) = &config.output {
        let json = serde_json::to_vec_pretty(&schedule)?;
        tokio::fs::write(output, json).await?;
        info!("Wrote schedule to {}", output.display());
    }

    Ok(())
}
