use keyed_subtract::ingestion::csv::{ingest_csv_from_path, read_rows_from_path};
use keyed_subtract::processing::{SubtractOptions, subtract, subtract_datasets};
use keyed_subtract::row::SampleRow;
use keyed_subtract::types::{DataType, Field, Schema, Value};

fn stock_schema() -> Schema {
    Schema::new(vec![
        Field::new("sku", DataType::Utf8),
        Field::new("on_hand", DataType::Int64),
        Field::new("weight_kg", DataType::Float64),
        Field::new("discontinued", DataType::Bool),
    ])
}

#[test]
fn subtract_csv_datasets_by_sku() {
    let schema = stock_schema();
    let opening = ingest_csv_from_path("tests/fixtures/stock_opening.csv", &schema).unwrap();
    let sold = ingest_csv_from_path("tests/fixtures/stock_sold.csv", &schema).unwrap();

    let left = subtract_datasets(&opening, &sold, "sku", &SubtractOptions::default()).unwrap();

    assert_eq!(left.schema, schema);
    assert_eq!(
        left.rows,
        vec![
            // no sale: unchanged
            vec![
                Value::Utf8("apple".to_string()),
                Value::Int64(120),
                Value::Float64(30.5),
                Value::Bool(false),
            ],
            vec![
                Value::Utf8("pear".to_string()),
                Value::Int64(50),
                Value::Float64(15.0),
                Value::Bool(false),
            ],
            // null weight in the subtrahend keeps the minuend weight; bool is never subtracted
            vec![
                Value::Utf8("plum".to_string()),
                Value::Int64(0),
                Value::Float64(9.0),
                Value::Bool(true),
            ],
            // null on_hand stays null
            vec![
                Value::Utf8("fig".to_string()),
                Value::Null,
                Value::Float64(4.25),
                Value::Bool(false),
            ],
        ]
    );
}

#[test]
fn subtract_typed_rows_loaded_from_csv() {
    let opening: Vec<SampleRow> = read_rows_from_path("tests/fixtures/opening_rows.csv").unwrap();
    let sold: Vec<SampleRow> = read_rows_from_path("tests/fixtures/sold_rows.csv").unwrap();

    assert_eq!(
        subtract(&opening, &sold),
        vec![
            SampleRow::new("a", 10, 0),
            SampleRow::new("b", 18, 3),
            SampleRow::new("c", 27, 0),
        ]
    );
}

#[test]
fn unmatched_subtrahend_rows_do_not_appear_in_output() {
    let schema = stock_schema();
    let opening = ingest_csv_from_path("tests/fixtures/stock_opening.csv", &schema).unwrap();
    let sold = ingest_csv_from_path("tests/fixtures/stock_sold.csv", &schema).unwrap();

    let left = subtract_datasets(&opening, &sold, "sku", &SubtractOptions::default()).unwrap();
    assert_eq!(left.row_count(), opening.row_count());
    assert!(
        left.rows
            .iter()
            .all(|row| row[0] != Value::Utf8("kiwi".to_string()))
    );
}
