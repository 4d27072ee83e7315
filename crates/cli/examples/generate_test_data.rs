use rowdedup_core::{Dataset, Value};
use rowdedup_formats::save_dataset;

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let output_file = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "/tmp/test_dataset.csv".to_string());

    println!("Generating test dataset: {}\n", output_file);

    let mut dataset = Dataset::new(["id", "name", "city", "score"])?;

    let people = [
        (1, "Ada", Some("London"), Some(91.5)),
        (2, "Grace", Some("New York"), Some(88.0)),
        (3, "Linus", None, Some(75.25)),
        (4, "Barbara", Some("Boston"), None),
        (5, "Ken", Some("Murray Hill"), Some(80.0)),
    ];

    println!("Adding unique rows...");
    for (id, name, city, score) in people {
        dataset.push_row(vec![
            Value::Int(id),
            name.into(),
            city.into(),
            score.into(),
        ])?;
    }

    // Exact duplicates, including rows whose only difference from each
    // other would be a missing value
    println!("Adding exact duplicates...");
    for index in [0, 2, 2, 3, 0] {
        let row = dataset.rows()[index].clone();
        dataset.push_row(row)?;
    }

    // Same name and city as row 1 but a different score: unique as a
    // whole row, duplicate under --subset name,city
    println!("Adding subset-only duplicates...");
    dataset.push_row(vec![
        Value::Int(6),
        "Grace".into(),
        "New York".into(),
        Value::Float(90.0),
    ])?;

    save_dataset(&dataset, &output_file)?;

    println!("\nGenerated test dataset with {} rows", dataset.len());
    println!("  - Exact duplicates: 5");
    println!("  - Subset duplicates on name,city: 1 more");
    println!("\nRun deduplication with:");
    println!("  cargo run --example dedupe_file {}", output_file);
    println!("  rowdedup dedup -i {} --subset name,city --dry-run", output_file);

    Ok(())
}
