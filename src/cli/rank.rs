use super::ui;
use crate::core::config::AppConfig;
use crate::core::{COMBINATIONS, CombinationRunner, FilterCombination, RankedFund};
use crate::providers::util::build_client;
use anyhow::{Result, anyhow};
use std::collections::BTreeMap;

pub async fn run(
    config: &AppConfig,
    combination: Option<&str>,
    max_investment: Option<u64>,
) -> Result<()> {
    let client = build_client(config.request_timeout())?;
    let loader = super::record_loader(config, &client);
    let runner = CombinationRunner::new(&loader, &config.paths.table, config.top_n)
        .with_max_investment(max_investment);

    if let Some(id) = combination {
        let combination = FilterCombination::find(id).ok_or_else(|| {
            let known: Vec<String> = COMBINATIONS.iter().map(FilterCombination::id).collect();
            anyhow!("Unknown combination '{}'. Expected one of: {}", id, known.join(", "))
        })?;
        let ranked = runner.run(combination).await;
        display_ranking(combination, &ranked);
        return Ok(());
    }

    let pb = ui::new_progress_bar(COMBINATIONS.len() as u64, true);
    let results = runner
        .run_all(&|combination| {
            pb.set_message(combination.id());
            pb.inc(1);
        })
        .await;
    pb.finish_and_clear();

    display_all(&results);
    Ok(())
}

fn display_ranking(combination: &FilterCombination, ranked: &[RankedFund]) {
    println!(
        "\nCombination: {}",
        ui::style_text(&combination.id(), ui::StyleType::Title)
    );
    if ranked.is_empty() {
        println!("{}", ui::style_text("No funds matched", ui::StyleType::Subtle));
        return;
    }
    println!("{}", ui::ranked_funds_table(ranked, combination.use_ytd));
}

fn display_all(results: &BTreeMap<String, Vec<RankedFund>>) {
    for (i, combination) in COMBINATIONS.iter().enumerate() {
        let ranked = results
            .get(&combination.id())
            .map(Vec::as_slice)
            .unwrap_or_default();
        display_ranking(combination, ranked);
        if i < COMBINATIONS.len() - 1 {
            ui::print_separator();
        }
    }
}
