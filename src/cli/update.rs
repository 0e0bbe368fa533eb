use super::ui;
use crate::core::benchmark::compute_all;
use crate::core::config::AppConfig;
use crate::core::normalize::normalize_workbook;
use crate::core::report::{render_blocks, update_report};
use crate::core::{COMBINATIONS, CombinationRunner};
use crate::providers::cafci::CafciDownloader;
use crate::providers::util::build_client;
use anyhow::Result;
use tracing::{info, warn};

/// Downloads the spreadsheet, rebuilds every ranking and rewrites the report.
///
/// Download and normalization failures fall back to the files already on
/// disk; only a report that cannot be read or written fails the command.
pub async fn run(config: &AppConfig, skip_download: bool) -> Result<()> {
    let client = build_client(config.request_timeout())?;
    let paths = &config.paths;

    if skip_download {
        info!("Skipping spreadsheet download");
    } else {
        let downloader = CafciDownloader::new(&config.providers.cafci.base_url, client.clone());
        if let Err(e) = downloader.download(&paths.workbook).await {
            warn!(error = %e, "Spreadsheet download failed, using {}", paths.workbook.display());
        }
    }

    if let Err(e) = normalize_workbook(&paths.workbook, &paths.table) {
        warn!(error = %e, "Normalization failed, using {}", paths.table.display());
    }

    let loader = super::record_loader(config, &client);
    let runner = CombinationRunner::new(&loader, &paths.table, config.top_n);
    let pb = ui::new_progress_bar(COMBINATIONS.len() as u64, true);
    let rankings = runner
        .run_all(&|combination| {
            pb.set_message(combination.id());
            pb.inc(1);
        })
        .await;
    pb.finish_and_clear();

    let benchmarks = compute_all(&config.benchmarks);
    let indicators = super::indicators::fetch(config, &client).await;

    let blocks = render_blocks(&rankings, &benchmarks, &indicators)?;
    update_report(&paths.report, &blocks)?;

    let ranked: usize = rankings.values().map(Vec::len).sum();
    println!(
        "{} {} with {} combinations ({} ranked entries)",
        ui::style_text("Updated", ui::StyleType::Label),
        paths.report.display(),
        rankings.len(),
        ranked
    );
    Ok(())
}
