use comfy_table::{presets::UTF8_FULL, Cell, CellAlignment, Row, Table};
use upreport::format::scientific;
use upreport::{Descriptor, FlowRecord};

/// Console tables for the review menu.
pub struct Formatter {}

impl Default for Formatter {
    fn default() -> Self {
        Self::new()
    }
}

impl Formatter {
    pub fn new() -> Self {
        Self {}
    }

    pub fn format_flows(&self, flows: &[FlowRecord]) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("Compartment").set_alignment(CellAlignment::Left),
            Cell::new("Flow").set_alignment(CellAlignment::Left),
            Cell::new("Amount").set_alignment(CellAlignment::Right),
            Cell::new("Unit").set_alignment(CellAlignment::Left),
            Cell::new("DQI").set_alignment(CellAlignment::Left),
        ]));

        for flow in flows {
            table.add_row(Row::from(vec![
                Cell::new(&flow.category),
                Cell::new(&flow.name),
                Cell::new(scientific(flow.amount)).set_alignment(CellAlignment::Right),
                Cell::new(&flow.unit),
                Cell::new(&flow.dq),
            ]));
        }

        table.to_string()
    }

    /// Product systems with their identifiers, marking the current one.
    pub fn format_product_systems(&self, systems: &[Descriptor], current: &str) -> String {
        let mut table = Table::new();
        table.load_preset(UTF8_FULL);
        table.set_header(Row::from(vec![
            Cell::new("#").set_alignment(CellAlignment::Right),
            Cell::new("Product system").set_alignment(CellAlignment::Left),
            Cell::new("Id").set_alignment(CellAlignment::Left),
        ]));

        for (i, system) in systems.iter().enumerate() {
            let marker = if system.id == current { " *" } else { "" };
            table.add_row(Row::from(vec![
                Cell::new(i + 1).set_alignment(CellAlignment::Right),
                Cell::new(format!("{}{}", system.name, marker)),
                Cell::new(&system.id),
            ]));
        }

        table.to_string()
    }
}
