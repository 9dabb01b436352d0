//! Command implementations.
//!
//! Each command returns the text to print on stdout. Failures carry
//! context for the user; the binary prints them and exits non-zero.

use std::path::Path;

use anyhow::{anyhow, bail, Context, Result};
use tabula_access::{AuthUser, Decision, PermissionGate};
use tabula_client::{report_error, rows_from_json, ApiClient, CancellationToken};
use tabula_seeker::{DateRange, Row};
use tabula_view::{
    Column, DataTable, DataTableBuilder, ExportField, ExportFormat, ExportOutcome, QueryParams,
    TableConfig,
};

use crate::cli::{Command, ExportArgs, FileFormat, GateArgs, OutputFormat, TableArgs, ViewArgs};
use crate::render::render_page;

/// Runs a parsed command line.
pub fn run(command: Command) -> Result<String> {
    match command {
        Command::View(args) => view(&args),
        Command::Export(args) => export(&args),
        Command::Gate(args) => gate(&args),
    }
}

// ============================================================================
// Rows
// ============================================================================

/// Reads rows from a JSON file.
pub fn read_rows(path: &Path) -> Result<Vec<Row>> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("failed to read {}", path.display()))?;
    let value: serde_json::Value = serde_json::from_str(&text)
        .with_context(|| format!("{} is not valid JSON", path.display()))?;
    rows_from_json(value).with_context(|| format!("{} holds no rows", path.display()))
}

/// Fetches rows from the API, cancelling on Ctrl-C.
pub fn fetch_rows(path: &str) -> Result<Vec<Row>> {
    let client = ApiClient::from_env().context("API is not configured")?;
    let runtime = tokio::runtime::Builder::new_current_thread()
        .enable_all()
        .build()
        .context("failed to start the async runtime")?;

    let result = runtime.block_on(async {
        let cancel = CancellationToken::new();
        let on_interrupt = cancel.clone();
        tokio::spawn(async move {
            if tokio::signal::ctrl_c().await.is_ok() {
                on_interrupt.cancel();
            }
        });
        client.fetch_rows(path, &cancel).await
    });

    result.map_err(|err| match report_error(&err, false) {
        Some(notice) => anyhow!(notice.text),
        None => anyhow!(err),
    })
}

fn load_rows(args: &TableArgs) -> Result<Vec<Row>> {
    match (&args.source.data, &args.source.api) {
        (Some(path), _) => read_rows(path),
        (None, Some(api)) => fetch_rows(api),
        (None, None) => bail!("either --data or --api is required"),
    }
}

// ============================================================================
// Table
// ============================================================================

/// A table showing every field of the first row.
fn inferred_builder(rows: &[Row]) -> DataTableBuilder<Row> {
    let fields: Vec<String> = rows
        .first()
        .map(|row| row.keys().cloned().collect())
        .unwrap_or_default();
    log::info!("no table config, using fields {:?}", fields);
    DataTable::builder(fields.iter().map(|f| Column::field(f.as_str(), f.as_str())).collect())
        .search_fields(fields.iter().cloned())
        .export_fields(fields.iter().map(ExportField::new).collect())
}

/// Builds the table for `args` and replays the requested interaction on it.
pub fn build_table(args: &TableArgs, rows: Vec<Row>) -> Result<DataTable<Row>> {
    let builder = match &args.config {
        Some(path) => TableConfig::load(path)
            .with_context(|| format!("failed to load table config {}", path.display()))?
            .builder::<Row>()?,
        None => inferred_builder(&rows),
    };
    let params = args
        .url
        .as_deref()
        .map(QueryParams::parse)
        .unwrap_or_default();
    let mut table = builder.rows(rows).params(params).build()?;

    if let Some(search) = &args.search {
        table.set_search(search);
    }

    if !args.filters.is_empty() || args.from.is_some() || args.to.is_some() {
        table.open_filters();
        for filter in &args.filters {
            let (field, value) = filter
                .split_once('=')
                .ok_or_else(|| anyhow!("filter '{}' must look like FIELD=VALUE", filter))?;
            table.panel_mut().select(field.trim(), value)?;
        }
        let draft = table.panel().draft().clone();
        let start = match &args.from {
            Some(date) => Some(DateRange::parse_bound(date)?),
            None => draft.start_date,
        };
        let end = match &args.to {
            Some(date) => Some(DateRange::parse_bound(date)?),
            None => draft.end_date,
        };
        table.panel_mut().set_date_range(start, end)?;
        table.apply_filters();
    }

    if let Some(rows) = args.rows {
        table.set_rows_per_page(rows)?;
    }
    if let Some(page) = args.page {
        table.set_page(page);
    }
    for column in &args.sort {
        table.toggle_sort(column)?;
    }

    Ok(table)
}

// ============================================================================
// Commands
// ============================================================================

fn view(args: &ViewArgs) -> Result<String> {
    let table = build_table(&args.table, load_rows(&args.table)?)?;
    let page = table.page();
    match args.format {
        OutputFormat::Text => Ok(render_page(&page, args.width)),
        OutputFormat::Json => Ok(format!("{}\n", serde_json::to_string_pretty(&page)?)),
    }
}

fn export(args: &ExportArgs) -> Result<String> {
    let table = build_table(&args.table, load_rows(&args.table)?)?;
    let format = match args.format {
        FileFormat::Csv => ExportFormat::Csv,
        FileFormat::Xlsx => ExportFormat::Xlsx,
    };
    match table.export(format)? {
        ExportOutcome::File(file) => {
            let path = file
                .write_to(&args.out)
                .with_context(|| format!("failed to write into {}", args.out.display()))?;
            Ok(format!("Exported {} rows to {}\n", file.row_count, path.display()))
        }
        ExportOutcome::NoData(notice) => {
            log::warn!("{}", notice.text);
            Ok(format!("{}\n", notice))
        }
    }
}

fn gate(args: &GateArgs) -> Result<String> {
    let user = match &args.user {
        Some(path) => {
            let text = std::fs::read_to_string(path)
                .with_context(|| format!("failed to read {}", path.display()))?;
            Some(AuthUser::from_json(&text)?)
        }
        None => None,
    };
    let gate = PermissionGate::for_permission(args.permission.as_deref())
        .redirect_to(args.redirect.as_str())?;
    let decision = gate.decide(user.as_ref(), args.loading);

    Ok(match args.format {
        OutputFormat::Json => format!("{}\n", serde_json::to_string(&decision)?),
        OutputFormat::Text => match decision {
            Decision::Loading => "loading\n".to_string(),
            Decision::Render => "render\n".to_string(),
            Decision::Redirect(route) => format!("redirect {}\n", route),
        },
    })
}
