use std::path::Path;
use std::process;

use gen1_scraper::config::DEFAULT_OUT_DIR;
use gen1_scraper::verify::{verify, Dataset};

fn main() {
    println!("Loading data...");
    let data = match Dataset::load(Path::new(DEFAULT_OUT_DIR)) {
        Ok(data) => data,
        Err(e) => {
            eprintln!("Error: {:#}", e);
            process::exit(1);
        }
    };

    let report = verify(&data);
    report.print();
    if !report.passed() {
        process::exit(1);
    }
}
