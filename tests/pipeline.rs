//! Backfill + convert over a scraper output folder, through the public API.

use std::path::Path;

use rformat_lib::cli::{execute, Command};
use rformat_lib::models::config::FormatterConfig;
use rformat_lib::utils::terminal::TerminalPrinter;
use rformat_lib::AppState;
use serde_json::{json, Value};

fn write(path: &Path, value: Value) {
    std::fs::write(path, value.to_string()).unwrap();
}

fn read(path: &Path) -> Value {
    serde_json::from_str(&std::fs::read_to_string(path).unwrap()).unwrap()
}

#[test]
fn prepare_folder_produces_uniform_r_arrays() {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("data/to_transform");
    std::fs::create_dir_all(&input).unwrap();

    write(
        &input.join("all_products_04_03_2023_09_10.json"),
        json!({
            "112": {"date": "2023-03-04T09:10:00.123456", "sku": "A", "price": 12.5},
            "113": {"date": "2023-03-04T09:10:01.5", "sku": "B", "price": 8.0},
        }),
    );
    write(
        &input.join("all_products_05_03_2023_09_10.json"),
        json!({
            "112": {"date": "2023-03-05T09:10:00.9", "sku": "A", "price": 11.0, "deal": "2x1"},
        }),
    );
    std::fs::write(input.join(".DS_Store"), [0u8, 1, 2]).unwrap();

    let mut state = AppState::new(
        root.path(),
        FormatterConfig::default(),
        TerminalPrinter::new(Vec::<u8>::new()),
    );
    let mut out: Vec<u8> = Vec::new();
    execute(
        &Command::Prepare {
            folder: input.clone(),
            into: Some("data3".into()),
        },
        &mut state,
        &mut out,
    )
    .unwrap();

    // Inputs were backfilled in place and stay dictionaries.
    let backfilled = read(&input.join("all_products_04_03_2023_09_10.json"));
    assert_eq!(backfilled["112"]["deal"], Value::Null);
    assert_eq!(backfilled["113"]["date"], json!("2023-03-04T09:10:01.5"));

    let out_dir = root.path().join("R_analysis/R_formatted_data/data3");
    let first = read(&out_dir.join("R_all_products_04_03_2023_09_10.json"));
    assert_eq!(
        first,
        json!([
            {"date": "2023-03-04T09:10:00", "sku": "A", "price": 12.5, "deal": null},
            {"date": "2023-03-04T09:10:01", "sku": "B", "price": 8.0, "deal": null},
        ])
    );

    let second = read(&out_dir.join("R_all_products_05_03_2023_09_10.json"));
    assert_eq!(
        second,
        json!([{"date": "2023-03-05T09:10:00", "sku": "A", "price": 11.0, "deal": "2x1"}])
    );

    assert!(!out_dir.join("R_.DS_Store").exists());
    assert!(out.is_empty());
}

#[test]
fn vars_then_backfill_agree() {
    let root = tempfile::tempdir().unwrap();
    let input = root.path().join("in");
    std::fs::create_dir_all(&input).unwrap();
    write(&input.join("a.json"), json!({"1": {"sku": "A"}}));
    write(&input.join("b.json"), json!({"1": {"sku": "B", "price": 5}}));

    let mut state = AppState::new(
        root.path(),
        FormatterConfig::default(),
        TerminalPrinter::new(Vec::<u8>::new()),
    );

    let mut listed: Vec<u8> = Vec::new();
    execute(&Command::Vars { folder: input.clone() }, &mut state, &mut listed).unwrap();
    assert_eq!(String::from_utf8(listed).unwrap(), "sku\nprice\n");

    execute(&Command::Backfill { folder: input.clone() }, &mut state, &mut Vec::<u8>::new()).unwrap();
    assert_eq!(read(&input.join("a.json")), json!({"1": {"sku": "A", "price": null}}));
}
