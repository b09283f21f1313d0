use std::io;
use std::io::prelude::*;

use tracing::{event, Level};
use tracing_subscriber::prelude::*;

use sevenseg::{count_unique_len_outputs, parse_records, sum_outputs, Record};

fn part1(records: &[Record]) {
    println!("Day 8 part 1: {}", count_unique_len_outputs(records));
}

fn part2(records: &[Record]) -> Result<(), String> {
    match sum_outputs(records) {
        Ok(total) => {
            println!("Day 8 part 2: {}", total);
            Ok(())
        }
        Err((i, e)) => Err(format!("failed to decode record {}: {}", i + 1, e)),
    }
}

fn run() -> Result<(), String> {
    let fmt_layer = tracing_subscriber::fmt::layer().with_target(true);
    let filter_layer = match tracing_subscriber::EnvFilter::try_from_default_env()
        .or_else(|_| tracing_subscriber::EnvFilter::try_new("info"))
    {
        Err(e) => {
            eprintln!("{}", e);
            std::process::exit(1);
        }
        Ok(layer) => layer,
    };

    tracing_subscriber::registry()
        .with(filter_layer)
        .with(fmt_layer)
        .init();

    let mut input = String::new();
    if let Err(e) = io::stdin().read_to_string(&mut input) {
        return Err(format!("failed to read input: {}", e));
    }
    let records = match parse_records(&input) {
        Ok(records) => records,
        Err(e) => {
            return Err(format!("failed to parse puzzle input: {}", e));
        }
    };
    event!(Level::INFO, "There are {} displays in the input.", records.len());
    part1(&records);
    part2(&records)
}

fn main() {
    if let Err(e) = run() {
        eprintln!("{}", e);
        std::process::exit(1);
    }
}
