// Reshape pipeline example
// Author: Gabriel Demetrios Lafis

use std::rc::Rc;

use anyhow::Result;
use rust_table_stream_engine::{
    data::{DataSet, TableRef, Value},
    processing::{cat, AggregateFunction, Reducers, TableExt},
    row,
    utils::{init_logging, Config},
};

fn main() -> Result<()> {
    // Load configuration if one is given, defaults otherwise
    let config = match std::env::args().nth(1) {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };
    init_logging(config.log_level_filter())?;

    // Readings from two sites with different layouts
    let north: TableRef = Rc::new(DataSet::from_rows(
        ["site", "day", "temp", "humidity"],
        vec![
            row!["north", 1, 12.5, 80],
            row!["north", 2, 14.0, 75],
            row!["north", 2, 13.0, Value::Null],
        ],
    ));
    let south: TableRef = Rc::new(DataSet::from_rows(
        ["site", "day", "temp", "wind"],
        vec![row!["south", 1, 21.0, 5], row!["south", 2, 19.5, 9]],
    ));

    let readings = cat(vec![north, south], Value::Null);
    println!("Combined readings:");
    print_dataset(&readings.collect_rows()?);

    // Report duplicate measurements before reshaping
    let duplicates = readings.clone().duplicates(["site", "day"]).collect_rows()?;
    println!("\nDuplicate site/day readings: {}", duplicates.len());

    // Unpivot measurements into variable/value rows
    let molten = readings.melt(config.melt_options().with_key(["site", "day"]));
    println!("\nMolten readings:");
    print_dataset(&molten.collect_rows()?);

    // Pivot back, averaging repeated measurements
    let reducers = Reducers::new()
        .with_aggregate("temp", AggregateFunction::Mean)
        .with_aggregate("humidity", AggregateFunction::Max);
    let wide = molten
        .recast(config.recast_options().with_key(["site", "day"]).with_reducers(reducers))
        .collect_rows()?;
    println!("\nRecast readings:");
    print_dataset(&wide);

    Ok(())
}

// Helper function to print a dataset
fn print_dataset(dataset: &DataSet) {
    println!("{}", dataset.header.fields.join(" | "));
    println!("{}", vec!["----"; dataset.header.len()].join("-+-"));

    for row in &dataset.data {
        let cells: Vec<String> = row
            .values
            .iter()
            .map(|value| match value {
                Value::Null => "NULL".to_string(),
                Value::Float(f) => format!("{:.1}", f),
                other => other.to_string(),
            })
            .collect();
        println!("{}", cells.join(" | "));
    }
}
