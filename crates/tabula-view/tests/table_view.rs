//! End-to-end behavior of a table view over JSON rows.

use std::sync::{Arc, Mutex};

use serde_json::json;
use tabula_seeker::Row;
use tabula_view::{
    Column, DataTable, ExportField, ExportFormat, ExportOutcome, FilterConfig, NoticeLevel,
    QueryParams, TableConfig,
};

fn to_rows(values: Vec<serde_json::Value>) -> Vec<Row> {
    values
        .into_iter()
        .filter_map(|v| v.as_object().cloned())
        .collect()
}

fn users() -> Vec<Row> {
    to_rows(vec![
        json!({"name": "Bob", "role": "admin", "email": "bob@example.com", "createdAt": "2024-01-10T08:00:00Z"}),
        json!({"name": "Ann", "role": "admin", "email": "ann@example.com", "createdAt": "2024-02-01"}),
        json!({"name": "Cid", "role": "editor", "email": null, "createdAt": "not a date"}),
        json!({"name": "O'Brien", "role": "Editor", "email": "ob@example.com"}),
    ])
}

fn users_table(params: &str) -> DataTable<Row> {
    DataTable::builder(vec![
        Column::field("Name", "name"),
        Column::field("Role", "role").sorting_key("role"),
        Column::<Row>::compute("Contact", |r| {
            r.get("email")
                .and_then(|v| v.as_str())
                .unwrap_or("-")
                .to_string()
        })
        .key("contact"),
    ])
    .rows(users())
    .search_fields(["name", "email"])
    .filter(FilterConfig::new("Role", "role"))
    .export_fields(vec![ExportField::new("name"), ExportField::new("role")])
    .params(QueryParams::parse(params))
    .build()
    .unwrap()
}

fn names(table: &DataTable<Row>) -> Vec<String> {
    table.page().column(0).map(String::from).collect()
}

#[test]
fn admins_sorted_by_name() {
    let mut table = users_table("?role=admin");
    table.toggle_sort("name").unwrap();
    assert_eq!(names(&table), vec!["Ann", "Bob"]);
}

#[test]
fn search_ignores_punctuation() {
    let mut table = users_table("");
    table.set_search("obrien");
    assert_eq!(names(&table), vec!["O'Brien"]);

    table.set_search("O'Brien");
    assert_eq!(names(&table), vec!["O'Brien"]);
}

#[test]
fn filter_matches_case_insensitively() {
    let table = users_table("role=EDITOR");
    assert_eq!(names(&table), vec!["Cid", "O'Brien"]);
}

#[test]
fn date_range_excludes_missing_and_unparseable_dates() {
    let table = users_table("startDate=2024-01-01&endDate=2024-01-31");
    assert_eq!(names(&table), vec!["Bob"]);

    let open_ended = users_table("startDate=2024-01-15");
    assert_eq!(names(&open_ended), vec!["Ann"]);
}

#[test]
fn url_round_trip_of_search_page_rows() {
    let rows: Vec<Row> = (0..60)
        .filter_map(|i| json!({"name": format!("john {i}")}).as_object().cloned())
        .collect();
    let table = DataTable::builder(vec![Column::field("Name", "name")])
        .rows(rows)
        .search_fields(["name"])
        .params(QueryParams::parse("?search=john&page=2&rows=20"))
        .build()
        .unwrap();

    let state = table.state();
    assert_eq!(state.search_term, "john");
    assert_eq!(state.current_page, 2);
    assert_eq!(state.rows_per_page, 20);
    assert_eq!(table.params().to_string(), "?search=john&page=2&rows=20");
}

#[test]
fn interaction_is_pushed_to_subscriber() {
    let mut table = users_table("tab=people");
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    table.subscribe(move |params| sink.lock().unwrap().push(params.to_string()));

    table.set_search("ann");
    table.open_filters();
    table.panel_mut().select("role", "Admin").unwrap();
    table.apply_filters();
    table.clear_filters();

    assert_eq!(
        *seen.lock().unwrap(),
        vec![
            "?search=ann&tab=people".to_string(),
            "?search=ann&role=admin&tab=people".to_string(),
            "?search=ann&tab=people".to_string(),
        ]
    );
}

#[test]
fn computed_column_renders_row() {
    let table = users_table("");
    let contacts: Vec<_> = table.page().column(2).map(String::from).collect();
    assert_eq!(
        contacts,
        vec!["bob@example.com", "ann@example.com", "-", "ob@example.com"]
    );
}

#[test]
fn empty_export_yields_notice_only() {
    let mut table = users_table("");
    table.set_search("zzz");
    match table.export(ExportFormat::Csv).unwrap() {
        ExportOutcome::NoData(notice) => {
            assert_eq!(notice.level, NoticeLevel::Warning);
            assert_eq!(notice.text, "No data to export");
        }
        ExportOutcome::File(file) => panic!("unexpected file {}", file.file_name),
    }
}

#[test]
fn export_writes_fixed_file_name() {
    let table = users_table("role=admin");
    let outcome = table.export(ExportFormat::Csv).unwrap();
    let file = outcome.file().unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = file.write_to(dir.path()).unwrap();
    assert!(path.ends_with("data.csv"));
    assert_eq!(
        std::fs::read_to_string(path).unwrap(),
        "name,role\nBob,admin\nAnn,admin\n"
    );
}

#[test]
fn table_from_config_file() {
    let config = TableConfig::from_yaml(
        r#"
columns:
  - { label: Name, field: name }
filters:
  - { label: Role, filterField: role }
searchFields: [name]
rowsPerPageOptions: [2, 4]
"#,
    )
    .unwrap();
    let table = config
        .builder::<Row>()
        .unwrap()
        .rows(users())
        .params(QueryParams::parse("page=2"))
        .build()
        .unwrap();

    let page = table.page();
    assert_eq!(page.showing(), "Showing 3-4 of 4");
    assert_eq!(page.query, "page=2");

    let options: Vec<_> = table
        .filter_options()
        .into_iter()
        .flat_map(|(_, opts)| opts.into_iter().map(|o| o.label))
        .collect();
    assert_eq!(options, vec!["admin", "editor"]);
}
