use std::collections::BTreeMap;

use comfy_table::{Attribute, Cell, CellAlignment, Color, Table, modifiers, presets};
use enumset::EnumSet;
use itertools::Itertools;
use touprice::core::{
    composite::CompositeSummary,
    configuration::TimeConfiguration,
    grid::{DayGrid, HOURS_PER_DAY},
    label::TimePeriodLabel,
    tariff::TariffRecord,
};

fn new_table() -> Table {
    let mut table = Table::new();
    table.load_preset(presets::UTF8_FULL_CONDENSED).apply_modifier(modifiers::UTF8_ROUND_CORNERS);
    table.enforce_styling();
    table
}

#[must_use]
pub fn build_configurations_table(configurations: &[TimeConfiguration]) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Months", "Start", "End", "Label"]);
    for configuration in configurations {
        for (i, rule) in configuration.time_rules.iter().enumerate() {
            let months =
                if i == 0 { configuration.month_pattern.to_string() } else { String::new() };
            table.add_row(vec![
                Cell::new(months).add_attribute(Attribute::Bold),
                Cell::new(&rule.start),
                Cell::new(&rule.end).add_attribute(Attribute::Dim),
                Cell::new(rule.label).fg(rule.label.color()),
            ]);
        }
    }
    table
}

/// Months as rows, hours as columns.
#[must_use]
pub fn build_matrix_table(matrix: &BTreeMap<u32, DayGrid>) -> Table {
    let mut table = new_table();
    table.set_header(
        std::iter::once(String::new()).chain((0..HOURS_PER_DAY).map(|hour| format!("{hour:02}"))),
    );
    for (month, grid) in matrix {
        table.add_row(std::iter::once(Cell::new(month).add_attribute(Attribute::Bold)).chain(
            grid.iter().map(|label| {
                Cell::new(label.initial()).fg(label.color()).set_alignment(CellAlignment::Center)
            }),
        ));
    }
    table
}

#[must_use]
pub fn build_tariffs_table<'a>(tariffs: impl IntoIterator<Item = &'a TariffRecord>) -> Table {
    let mut table = new_table();
    table.set_header(
        ["Province", "Month", "Category", "Voltage", "Rules"]
            .into_iter()
            .map(Cell::new)
            .chain(
                EnumSet::<TimePeriodLabel>::all()
                    .iter()
                    .map(|label| Cell::new(label).fg(label.color())),
            ),
    );
    for tariff in tariffs {
        table.add_row(
            [
                Cell::new(&tariff.province),
                Cell::new(&tariff.month).add_attribute(Attribute::Bold),
                Cell::new(&tariff.category),
                Cell::new(&tariff.voltage_level),
                Cell::new(tariff.time_rules.len()).set_alignment(CellAlignment::Right),
            ]
            .into_iter()
            .chain(EnumSet::<TimePeriodLabel>::all().iter().map(|label| {
                tariff.prices.get(label).map_or_else(
                    || Cell::new("-").add_attribute(Attribute::Dim),
                    |price| Cell::new(price).set_alignment(CellAlignment::Right),
                )
            })),
        );
    }
    table
}

#[must_use]
pub fn build_composite_table(summary: &CompositeSummary) -> Table {
    let mut table = new_table();
    table.set_header(vec!["Month", "Average", "Hours", "Breakdown"]);
    for result in &summary.results {
        let breakdown = result
            .breakdown
            .iter()
            .map(|entry| {
                format!("{}: {:.2} h × {} = {}", entry.label, entry.hours, entry.price, entry.cost)
            })
            .join("\n");
        table.add_row(vec![
            Cell::new(&result.month).add_attribute(Attribute::Bold),
            Cell::new(result.avg_price).set_alignment(CellAlignment::Right),
            Cell::new(format!("{:.2}", result.total_hours)).set_alignment(CellAlignment::Right),
            Cell::new(breakdown),
        ]);
    }
    for (month, reason) in &summary.skipped {
        table.add_row(vec![
            Cell::new(month).add_attribute(Attribute::Dim),
            Cell::new("-").set_alignment(CellAlignment::Right),
            Cell::new("-").set_alignment(CellAlignment::Right),
            Cell::new(reason).fg(Color::DarkYellow),
        ]);
    }
    table
}
