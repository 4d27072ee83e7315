use rowdedup_core::{DedupOptions, Keep};
use rowdedup_formats::{open_dataset, save_dataset};
use std::io;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let input_file = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/tmp/test_dataset.csv".to_string());
    let keep: Keep = std::env::args()
        .nth(2)
        .unwrap_or_else(|| "first".to_string())
        .parse()?;
    let output_file = format!("{}.deduped.jsonl", input_file);

    println!("Input: {}", input_file);
    println!("Output: {}", output_file);
    println!("Keep: {}\n", keep);

    let mut dataset = open_dataset(&input_file)?;
    println!("Read {} rows\n", dataset.len());

    let options = DedupOptions::default().with_keep(keep);
    let report = rowdedup_core::run(&mut dataset, &options, &mut io::stdout())?;

    save_dataset(&dataset, &output_file)?;

    println!("\nRemoved {} of {} rows", report.removed(), report.rows_before);
    println!("Wrote {} rows to {}", report.rows_after, output_file);

    Ok(())
}
