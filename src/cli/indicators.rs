use super::ui;
use crate::core::config::AppConfig;
use crate::core::indicators::{FinancialIndicators, Reading, ReferenceDates, collect_indicators};
use crate::providers::argentina_datos::ArgentinaDatosProvider;
use crate::providers::fred::FredProvider;
use crate::providers::util::build_client;
use anyhow::Result;
use comfy_table::{Cell, CellAlignment, Table};
use reqwest::Client;

pub async fn fetch(config: &AppConfig, client: &Client) -> FinancialIndicators {
    let providers = &config.providers;
    let series = ArgentinaDatosProvider::new(&providers.argentina_datos.base_url, client.clone());
    let inflation = FredProvider::new(
        &providers.fred.base_url,
        &providers.fred.series_id,
        providers.fred.api_key.clone(),
        client.clone(),
    );
    let dates = ReferenceDates {
        today: chrono::Local::now().date_naive(),
        start: config.ytd_start_date,
    };
    collect_indicators(&series, &inflation, dates).await
}

pub async fn run(config: &AppConfig) -> Result<()> {
    let client = build_client(config.request_timeout())?;
    let indicators = fetch(config, &client).await;

    println!(
        "\n{} {}",
        ui::style_text("Indicators as of", ui::StyleType::Title),
        indicators.calculation_date
    );
    println!(
        "{}",
        ui::style_text(
            &format!(
                "YTD from {} to {} ({} days)",
                indicators.reference_date_start_year_api,
                indicators.reference_date_yesterday,
                indicators.days_elapsed_current_year
            ),
            ui::StyleType::Subtle
        )
    );
    println!("{}", indicators_table(&indicators));
    Ok(())
}

fn reading_cell(reading: &Reading<f64>) -> Cell {
    match reading {
        Reading::Value(v) => Cell::new(format!("{v}%")).set_alignment(CellAlignment::Right),
        Reading::Failed { error } => ui::error_cell(error),
    }
}

fn indicators_table(indicators: &FinancialIndicators) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![ui::header_cell("Indicator"), ui::header_cell("Value")]);

    table.add_row(vec![
        Cell::new("US inflation YTD"),
        reading_cell(&indicators.us_inflation_ytd),
    ]);
    match &indicators.uva_inflation {
        Reading::Value(uva) => {
            table.add_row(vec![
                Cell::new("UVA inflation YTD"),
                reading_cell(&Reading::Value(uva.ytd)),
            ]);
            table.add_row(vec![
                Cell::new("UVA inflation annualized"),
                reading_cell(&Reading::Value(uva.annualized)),
            ]);
        }
        Reading::Failed { error } => {
            table.add_row(vec![Cell::new("UVA inflation"), ui::error_cell(error)]);
        }
    }
    table.add_row(vec![
        Cell::new("Dólar bolsa (compra) YTD"),
        reading_cell(&indicators.dollar_bolsa_ytd),
    ]);
    table
}
