use crate::core::SearchEngine;
use crate::error::{PineError, PineResult};
use crate::excel::{SheetSource, WorkbookSource};
use crate::layout::{index_to_column_letter, ColumnLayout, Field};
use crate::types::{SearchColumn, SearchOutcome};
use crate::writer::{self, format_amount, format_cost};
use colored::Colorize;
use notify::{RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebouncedEventKind};
use std::path::{Path, PathBuf};
use std::sync::mpsc::channel;
use std::time::Duration;

/// Everything the `search` and `watch` commands need
#[derive(Debug, Clone, Default)]
pub struct SearchOptions {
    /// Workbook to search
    pub file: PathBuf,
    pub query: String,
    /// Match the transporter column instead of the customer column
    pub by_transporter: bool,
    /// YAML column layout; the standard report layout when absent
    pub layout: Option<PathBuf>,
    /// Summary destination; `search_result.txt` next to the binary when absent
    pub output: Option<PathBuf>,
    pub no_export: bool,
    /// Also list every matching row
    pub show_rows: bool,
    /// Print the raw outcome as JSON instead of the table
    pub json: bool,
    pub verbose: bool,
}

impl SearchOptions {
    pub fn column(&self) -> SearchColumn {
        SearchColumn::from_customer_flag(!self.by_transporter)
    }
}

/// Load the column layout from a YAML file, or fall back to the default
pub fn load_layout(path: Option<&Path>) -> PineResult<ColumnLayout> {
    match path {
        Some(p) => ColumnLayout::from_file(p),
        None => Ok(ColumnLayout::default()),
    }
}

/// Execute the search command
pub fn search(options: SearchOptions) -> PineResult<()> {
    if !options.json {
        println!("{}", "🌲 PineSearch - Searching daily report".bold().green());
        println!("   File: {}", options.file.display());
        println!("   Query: {}", options.query.bright_yellow().bold());
        println!("   Column: {}\n", options.column().label().cyan());
    }

    search_internal(&options).map(|_| ())
}

/// Run one search, print it and export the summary
fn search_internal(options: &SearchOptions) -> PineResult<SearchOutcome> {
    let layout = load_layout(options.layout.as_deref())?;
    if options.verbose {
        println!(
            "{}",
            format!(
                "📐 Columns: customer={}, route={}, transporter={}, units={}, cost={}",
                index_to_column_letter(layout.customer),
                index_to_column_letter(layout.route),
                index_to_column_letter(layout.transporter),
                index_to_column_letter(layout.units),
                index_to_column_letter(layout.cost),
            )
            .cyan()
        );
    }

    let engine = SearchEngine::new(layout);
    let outcome = engine.search_path(&options.file, &options.query, options.column());

    if options.json {
        let json = serde_json::to_string_pretty(&outcome)
            .map_err(|e| PineError::Export(format!("Failed to serialize outcome: {}", e)))?;
        println!("{}", json);
        return match outcome.error {
            Some(message) => Err(PineError::DataSource(message)),
            None => Ok(outcome),
        };
    }

    if let Some(ref message) = outcome.error {
        println!(
            "{} {}",
            "❌ No matching records found".bold().red(),
            format!("(error: {})", message).red()
        );
        return Err(PineError::DataSource(message.clone()));
    }

    if outcome.is_empty() {
        println!("{}", "📭 No matching records found.".yellow());
        return Ok(outcome);
    }

    println!("{}", "✅ Search Results:".bold().green());
    print!("{}", render_table(&outcome));
    println!();

    if options.show_rows {
        println!("{}", format!("📋 Matching rows ({}):", outcome.rows.len()).bold().cyan());
        print!("{}", render_rows(&outcome, engine.layout()));
        println!();
    }

    if !options.no_export {
        let destination = options
            .output
            .clone()
            .unwrap_or_else(writer::default_export_path);
        let saved = writer::export_report(&outcome, &destination)?;
        println!("{}", "💾 Daily units, cost, and route count saved to:".green());
        println!("   {}", saved.display());
    }

    Ok(outcome)
}

/// Render the per-day aggregate table and totals
pub fn render_table(outcome: &SearchOutcome) -> String {
    let headers = ["Day", "Units", "Cost", "Unique Route Count"];
    let rows: Vec<[String; 4]> = outcome
        .daily()
        .iter()
        .map(|d| {
            [
                d.day.clone(),
                format_amount(d.units),
                format_cost(d.cost),
                d.unique_routes.to_string(),
            ]
        })
        .collect();

    let mut widths = headers.map(|h| h.chars().count());
    for row in &rows {
        for (width, cell) in widths.iter_mut().zip(row.iter()) {
            *width = (*width).max(cell.chars().count());
        }
    }

    let line = |cells: [&str; 4]| {
        format!(
            "   {:<w0$}  {:>w1$}  {:>w2$}  {:>w3$}\n",
            cells[0],
            cells[1],
            cells[2],
            cells[3],
            w0 = widths[0],
            w1 = widths[1],
            w2 = widths[2],
            w3 = widths[3],
        )
    };

    let mut out = line(headers);
    let rule_width = widths.iter().sum::<usize>() + 6;
    out.push_str(&format!("   {}\n", "─".repeat(rule_width)));
    for row in &rows {
        out.push_str(&line([
            row[0].as_str(),
            row[1].as_str(),
            row[2].as_str(),
            row[3].as_str(),
        ]));
    }
    out.push_str(&format!(
        "\n   Total Units: {}\n   Total Cost: {}\n",
        format_amount(outcome.total_units),
        format_cost(outcome.total_cost)
    ));
    out
}

/// Render each matching row with its named columns
pub fn render_rows(outcome: &SearchOutcome, layout: &ColumnLayout) -> String {
    let mut out = String::new();
    for matched in &outcome.rows {
        let cell = |field: Field| {
            matched
                .cells
                .get(layout.position(field))
                .map(|c| c.to_string())
                .unwrap_or_default()
        };
        out.push_str(&format!(
            "   {} row {}: customer={}, transporter={}, route={}, units={}, cost={}\n",
            matched.sheet,
            matched.row,
            cell(Field::Customer),
            cell(Field::Transporter),
            cell(Field::Route),
            cell(Field::Units),
            cell(Field::Cost),
        ));
    }
    out
}

/// Execute the sheets command - list sheets and their data row counts
pub fn sheets(file: PathBuf, layout: Option<PathBuf>) -> PineResult<()> {
    let layout = load_layout(layout.as_deref())?;

    println!("{}", "🌲 PineSearch - Sheets".bold().green());
    println!("   File: {}\n", file.display());

    let mut source = WorkbookSource::open(&file)?.with_header_rows(layout.header_rows);
    let names = source.sheet_names();
    if names.is_empty() {
        println!("{}", "   No sheets found".yellow());
        return Ok(());
    }

    for name in names {
        let sheet = source.load_sheet(&name)?;
        println!(
            "   📄 {} ({} rows)",
            sheet.name.bright_blue().bold(),
            sheet.row_count()
        );
    }
    Ok(())
}

/// Execute the watch command - rerun the search whenever the workbook changes
pub fn watch(options: SearchOptions) -> PineResult<()> {
    println!("{}", "👁️  PineSearch - Watch Mode".bold().green());
    println!("   Watching: {}", options.file.display());
    println!("   Query: {}", options.query.bright_yellow().bold());
    println!("   Press {} to stop\n", "Ctrl+C".bold().yellow());

    if !options.file.exists() {
        return Err(PineError::DataSource(format!(
            "File not found: {}",
            options.file.display()
        )));
    }

    let canonical_path = options.file.canonicalize()?;
    let parent_dir = canonical_path
        .parent()
        .ok_or_else(|| PineError::Config("Cannot determine parent directory".to_string()))?;

    let (tx, rx) = channel();

    // Spreadsheet apps save in several steps; debounce them into one event
    let mut debouncer = new_debouncer(Duration::from_millis(500), tx)
        .map_err(|e| PineError::Config(format!("Failed to create file watcher: {}", e)))?;

    debouncer
        .watcher()
        .watch(parent_dir, RecursiveMode::NonRecursive)
        .map_err(|e| PineError::Config(format!("Failed to watch directory: {}", e)))?;

    if options.verbose {
        println!(
            "   {} {}",
            "Watching directory:".cyan(),
            parent_dir.display()
        );
    }

    println!("{}", "🔄 Initial run...".cyan());
    run_watch_action(&options);
    println!();

    loop {
        match rx.recv() {
            Ok(Ok(events)) => {
                let relevant = events.iter().any(|event| {
                    event.kind == DebouncedEventKind::Any
                        && is_same_file(&event.path, &canonical_path)
                });

                if relevant {
                    println!(
                        "\n{} {}",
                        "🔄 Change detected at".cyan(),
                        chrono::Local::now().format("%H:%M:%S").to_string().cyan()
                    );
                    run_watch_action(&options);
                    println!();
                }
            }
            Ok(Err(error)) => {
                eprintln!("{} Watch error: {}", "❌".red(), error);
            }
            Err(e) => {
                eprintln!("{} Channel error: {}", "❌".red(), e);
                break;
            }
        }
    }

    Ok(())
}

fn is_same_file(event_path: &Path, watched: &Path) -> bool {
    if let Ok(event_canonical) = event_path.canonicalize() {
        if event_canonical == watched {
            return true;
        }
    }
    // The file may be gone mid-save; fall back to the name
    match (event_path.file_name(), watched.file_name()) {
        (Some(a), Some(b)) => a == b,
        _ => false,
    }
}

fn run_watch_action(options: &SearchOptions) {
    match search_internal(options) {
        Ok(outcome) if outcome.is_empty() => {}
        Ok(_) => println!("{}", "✅ Search complete".bold().green()),
        Err(e) => {
            if let Some(message) = watch_failure_message(&e) {
                println!("{} {}", "❌ Search failed:".bold().red(), message);
            }
        }
    }
}

/// Failures `search_internal` has not already reported
fn watch_failure_message(error: &PineError) -> Option<String> {
    match error {
        PineError::DataSource(_) => None,
        other => Some(other.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::{CellValue, MatchedRow};
    use std::io::Write;
    use tempfile::TempDir;

    fn two_days() -> SearchOutcome {
        let mut outcome = SearchOutcome::default();
        outcome.record_day("Mon", 5.0, 10.0, 1);
        outcome.record_day("Tuesday", 3.0, 6.0, 2);
        outcome
    }

    #[test]
    fn test_render_table_has_header_rows_and_totals() {
        let table = render_table(&two_days());
        let lines: Vec<&str> = table.lines().collect();

        assert!(lines[0].contains("Day"));
        assert!(lines[0].contains("Unique Route Count"));
        assert!(lines[2].contains("Mon"));
        assert!(lines[2].contains("5.00"));
        assert!(lines[2].contains("€10.00"));
        assert!(lines[3].contains("Tuesday"));
        assert!(lines[3].ends_with('2'));
        assert!(table.contains("Total Units: 8.00"));
        assert!(table.contains("Total Cost: €16.00"));
    }

    #[test]
    fn test_render_table_aligns_columns() {
        let table = render_table(&two_days());
        let lines: Vec<&str> = table.lines().collect();
        // Header and data rows share the same display width
        assert_eq!(lines[0].chars().count(), lines[2].chars().count());
        assert_eq!(lines[2].chars().count(), lines[3].chars().count());
    }

    #[test]
    fn test_render_rows_uses_layout() {
        let mut cells = vec![CellValue::Null; 20];
        cells[1] = CellValue::from("ACME");
        cells[10] = CellValue::from("R1");
        cells[11] = CellValue::from("FastFreight");
        cells[18] = CellValue::Int(5);
        cells[19] = CellValue::Float(10.5);

        let mut outcome = two_days();
        outcome.rows.push(MatchedRow {
            sheet: "Mon".to_string(),
            row: 2,
            cells,
        });

        let rendered = render_rows(&outcome, &ColumnLayout::default());
        assert_eq!(
            rendered,
            "   Mon row 2: customer=ACME, transporter=FastFreight, route=R1, units=5, cost=10.5\n"
        );
    }

    #[test]
    fn test_load_layout_default_and_file() {
        assert_eq!(load_layout(None).unwrap(), ColumnLayout::default());

        let temp_dir = TempDir::new().unwrap();
        let path = temp_dir.path().join("layout.yaml");
        let mut file = std::fs::File::create(&path).unwrap();
        writeln!(file, "customer: A\nunits: C\ncost: D").unwrap();

        let layout = load_layout(Some(path.as_path())).unwrap();
        assert_eq!(layout.customer, 0);
        assert_eq!(layout.units, 2);
        assert_eq!(layout.cost, 3);
    }

    #[test]
    fn test_load_layout_missing_file() {
        let result = load_layout(Some(Path::new("no-such-layout.yaml")));
        assert!(matches!(result, Err(PineError::Config(_))));
    }

    #[test]
    fn test_search_options_column() {
        let mut options = SearchOptions::default();
        assert_eq!(options.column(), SearchColumn::Customer);
        options.by_transporter = true;
        assert_eq!(options.column(), SearchColumn::Transporter);
    }

    #[test]
    fn test_search_missing_file_is_error() {
        let options = SearchOptions {
            file: PathBuf::from("no-such-report.xlsx"),
            query: "ACME".to_string(),
            no_export: true,
            ..Default::default()
        };
        assert!(matches!(search(options), Err(PineError::DataSource(_))));
    }

    #[test]
    fn test_watch_missing_file_is_error() {
        let options = SearchOptions {
            file: PathBuf::from("no-such-report.xlsx"),
            ..Default::default()
        };
        assert!(watch(options).is_err());
    }

    #[test]
    fn test_watch_reports_data_source_errors_once() {
        let data_source = PineError::DataSource("Failed to open report.xlsx".to_string());
        assert_eq!(watch_failure_message(&data_source), None);

        let export = PineError::Export("disk full".to_string());
        assert_eq!(
            watch_failure_message(&export),
            Some("Export error: disk full".to_string())
        );
    }

    #[test]
    fn test_is_same_file_by_name() {
        assert!(is_same_file(
            Path::new("/tmp/gone/report.xlsx"),
            Path::new("/data/report.xlsx")
        ));
        assert!(!is_same_file(
            Path::new("/tmp/other.xlsx"),
            Path::new("/data/report.xlsx")
        ));
    }
}
