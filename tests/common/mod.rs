//! Daily-report workbook fixtures written with rust_xlsxwriter

#![allow(dead_code)]

use rust_xlsxwriter::Workbook;
use std::path::Path;

/// A cell in a fixture row
#[derive(Clone, Debug)]
pub enum Cell {
    Text(&'static str),
    Number(f64),
    Blank,
}

impl From<&'static str> for Cell {
    fn from(s: &'static str) -> Self {
        Cell::Text(s)
    }
}

impl From<f64> for Cell {
    fn from(v: f64) -> Self {
        Cell::Number(v)
    }
}

/// One report line: the five columns the search reads
#[derive(Clone, Debug)]
pub struct ReportRow {
    pub customer: Cell,
    pub route: Cell,
    pub transporter: Cell,
    pub units: Cell,
    pub cost: Cell,
}

pub fn row(
    customer: impl Into<Cell>,
    route: impl Into<Cell>,
    transporter: impl Into<Cell>,
    units: impl Into<Cell>,
    cost: impl Into<Cell>,
) -> ReportRow {
    ReportRow {
        customer: customer.into(),
        route: route.into(),
        transporter: transporter.into(),
        units: units.into(),
        cost: cost.into(),
    }
}

const CUSTOMER: u16 = 1;
const ROUTE: u16 = 10;
const TRANSPORTER: u16 = 11;
const UNITS: u16 = 18;
const COST: u16 = 19;

fn header(col: u16) -> String {
    match col {
        CUSTOMER => "Customer".to_string(),
        ROUTE => "Route".to_string(),
        TRANSPORTER => "Transporter".to_string(),
        UNITS => "Units".to_string(),
        COST => "Cost".to_string(),
        _ => format!("Field {}", col),
    }
}

fn write_cell(
    worksheet: &mut rust_xlsxwriter::Worksheet,
    row: u32,
    col: u16,
    cell: &Cell,
) {
    match cell {
        Cell::Text(s) => {
            worksheet.write_string(row, col, *s).unwrap();
        }
        Cell::Number(v) => {
            worksheet.write_number(row, col, *v).unwrap();
        }
        Cell::Blank => {}
    }
}

/// Write a workbook with one sheet per day in the standard report layout
/// (header in row 1, customer in B, route in K, transporter in L, units in S, cost in T)
pub fn write_report(path: &Path, days: &[(&str, Vec<ReportRow>)]) {
    let mut workbook = Workbook::new();

    for (name, rows) in days {
        let worksheet = workbook.add_worksheet();
        worksheet.set_name(*name).unwrap();

        for col in 0..20u16 {
            worksheet.write_string(0, col, header(col)).unwrap();
        }

        for (i, r) in rows.iter().enumerate() {
            let excel_row = i as u32 + 1;
            worksheet
                .write_string(excel_row, 0, format!("line {}", i + 1))
                .unwrap();
            write_cell(worksheet, excel_row, CUSTOMER, &r.customer);
            write_cell(worksheet, excel_row, ROUTE, &r.route);
            write_cell(worksheet, excel_row, TRANSPORTER, &r.transporter);
            write_cell(worksheet, excel_row, UNITS, &r.units);
            write_cell(worksheet, excel_row, COST, &r.cost);
        }
    }

    workbook.save(path).unwrap();
}

/// The two-day ACME report used across the suites
pub fn scenario_days() -> Vec<(&'static str, Vec<ReportRow>)> {
    vec![
        (
            "Mon",
            vec![
                row("ACME", "R1", "FastFreight", 5.0, 10.0),
                row("ACME", "R1", "FastFreight", 0.0, 0.0),
            ],
        ),
        ("Tue", vec![row("ACME", "R2", "FastFreight", 3.0, 6.0)]),
    ]
}

pub fn write_scenario(path: &Path) {
    write_report(path, &scenario_days());
}
