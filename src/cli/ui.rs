use crate::core::RankedFund;
use comfy_table::modifiers::UTF8_ROUND_CORNERS;
use comfy_table::presets::UTF8_FULL;
use comfy_table::{Attribute, Cell, CellAlignment, Color, ContentArrangement, Table};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

/// Defines different styles for text elements.
pub enum StyleType {
    Title,
    Label,
    Subtle,
}

/// Applies a consistent style to a string.
pub fn style_text(text: &str, style_type: StyleType) -> String {
    let styled = match style_type {
        StyleType::Title => style(text).bold().underlined(),
        StyleType::Label => style(text).bold(),
        StyleType::Subtle => style(text).dim(),
    };
    styled.to_string()
}

/// Creates a new `comfy_table::Table` with standard styling.
pub fn new_styled_table() -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .apply_modifier(UTF8_ROUND_CORNERS)
        .set_content_arrangement(ContentArrangement::Dynamic);
    table
}

/// Creates a styled header cell for a table.
pub fn header_cell(text: &str) -> Cell {
    Cell::new(text)
        .fg(Color::Cyan)
        .add_attribute(Attribute::Bold)
}

/// Formats an `Option<T>` into a `Cell`. `None` is displayed as "N/A".
pub fn format_optional_cell<T>(value: Option<T>, format_fn: impl Fn(T) -> String) -> Cell {
    value.map_or(
        Cell::new("N/A")
            .fg(Color::DarkGrey)
            .set_alignment(CellAlignment::Right),
        |v| Cell::new(format_fn(v)).set_alignment(CellAlignment::Right),
    )
}

/// Creates a cell for displaying a percentage variation with color coding.
pub fn variation_cell(variation: Option<f64>, highlighted: bool) -> Cell {
    let Some(value) = variation else {
        return format_optional_cell(None::<f64>, |v| v.to_string());
    };
    let color = if value >= 0.0 { Color::Green } else { Color::Red };
    let cell = Cell::new(format!("{value:.4}%"))
        .fg(color)
        .set_alignment(CellAlignment::Right);
    if highlighted {
        cell.add_attribute(Attribute::Bold)
    } else {
        cell
    }
}

/// Creates a cell for an error message.
pub fn error_cell(message: &str) -> Cell {
    Cell::new(message).fg(Color::Red)
}

/// Renders a ranking; the column used for ordering is shown in bold.
pub fn ranked_funds_table(funds: &[RankedFund], use_ytd: bool) -> Table {
    let mut table = new_styled_table();
    table.set_header(vec![
        header_cell("#"),
        header_cell("Fund"),
        header_cell("Daily"),
        header_cell("YTD"),
        header_cell("Currency"),
        header_cell("Class."),
        header_cell("Min. investment"),
    ]);

    for (i, fund) in funds.iter().enumerate() {
        table.add_row(vec![
            Cell::new(i + 1).set_alignment(CellAlignment::Right),
            Cell::new(&fund.name),
            variation_cell(fund.daily_variation, !use_ytd),
            variation_cell(fund.ytd_variation, use_ytd),
            Cell::new(&fund.currency),
            Cell::new(fund.classification).set_alignment(CellAlignment::Right),
            Cell::new(fund.min_investment).set_alignment(CellAlignment::Right),
        ]);
    }
    table
}

/// Creates a new `indicatif::ProgressBar` with standard styling.
pub fn new_progress_bar(len: u64, with_message: bool) -> ProgressBar {
    let template = if with_message {
        "{spinner:.green} {msg} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})"
    } else {
        "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})"
    };

    let pb = ProgressBar::new(len);
    pb.set_style(
        ProgressStyle::with_template(template)
            .unwrap_or_else(|_| ProgressStyle::default_bar())
            .progress_chars("#>-"),
    );
    pb
}

/// Prints a separator line matching the terminal width.
pub fn print_separator() {
    let term_width = console::Term::stdout()
        .size_checked()
        .map(|(_, w)| w as usize)
        .unwrap_or(80);
    println!("\n{}", "─".repeat(term_width));
}
