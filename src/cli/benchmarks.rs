use super::ui;
use crate::core::benchmark::{BenchmarkMetrics, compute_all};
use crate::core::config::AppConfig;
use comfy_table::{Cell, CellAlignment, Table};

pub fn run(config: &AppConfig) -> anyhow::Result<()> {
    let metrics = compute_all(&config.benchmarks);
    if metrics.is_empty() {
        println!("No benchmark accounts configured.");
        return Ok(());
    }

    println!("\n{}", ui::style_text("Remunerated accounts", ui::StyleType::Title));
    println!("{}", metrics_table(&metrics));
    Ok(())
}

fn metrics_table(metrics: &[BenchmarkMetrics]) -> Table {
    let mut table = ui::new_styled_table();
    table.set_header(vec![
        ui::header_cell("Account"),
        ui::header_cell("Recommended initial"),
        ui::header_cell("Best daily %"),
        ui::header_cell("Capped daily %"),
    ]);

    for metric in metrics {
        match metric {
            BenchmarkMetrics::Computed {
                nombre,
                monto_inicial_recomendado,
                best_daily_yield,
                capped_daily_yield,
            } => table.add_row(vec![
                Cell::new(nombre),
                Cell::new(format!("{monto_inicial_recomendado:.0}"))
                    .set_alignment(CellAlignment::Right),
                Cell::new(format!("{best_daily_yield:.3}")).set_alignment(CellAlignment::Right),
                Cell::new(format!("{capped_daily_yield:.3}")).set_alignment(CellAlignment::Right),
            ]),
            BenchmarkMetrics::Invalid { nombre, error } => table.add_row(vec![
                Cell::new(nombre),
                ui::error_cell(error),
                Cell::new(""),
                Cell::new(""),
            ]),
        };
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::benchmark::BenchmarkOffer;
    use comfy_table::ContentArrangement;

    #[test]
    fn test_metrics_table_shows_errors_inline() {
        let offers = vec![
            BenchmarkOffer {
                rate: 0.228,
                ceiling: 500_000.0,
                label: "Bica".to_string(),
            },
            BenchmarkOffer {
                rate: -1.0,
                ceiling: 1.0,
                label: "Broken".to_string(),
            },
        ];
        let mut table = metrics_table(&compute_all(&offers));
        table.set_content_arrangement(ContentArrangement::Disabled);
        let rendered = table.to_string();

        assert!(rendered.contains("490720"));
        assert!(rendered.contains("0.063"));
        assert!(rendered.contains("Invalid input"));
    }
}
