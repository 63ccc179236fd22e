use tracing_subscriber::EnvFilter;

use vetstock::{BatchRecord, ItemRecord, SimulationClock, SimulationConfig};

fn seed_items() -> Vec<ItemRecord> {
    let record = |name: &str, min, max, buffer, target, shelf| ItemRecord {
        item_name: name.to_string(),
        min_daily_usage: min,
        max_daily_usage: max,
        buffer_days: buffer,
        target_days: target,
        standard_shelf_life_months: shelf,
    };
    vec![
        record("Amoxicillin 250mg", 2, 6, 3, 14, 18),
        record("Rabies Vaccine", 0, 3, 5, 30, 12),
        record("Syringe 5ml", 4, 10, 4, 21, 36),
        record("Surgical Gloves (pair)", 6, 15, 3, 14, 24),
    ]
}

fn seed_batches() -> Vec<BatchRecord> {
    let record = |id, name: &str, qty, expiry: Option<&str>| BatchRecord {
        batch_id: id,
        item_name: name.to_string(),
        quantity_on_hand: qty,
        expiry_date: expiry.map(str::to_string),
    };
    vec![
        record(1, "Amoxicillin 250mg", 40, Some("2024-04-10")),
        record(2, "Amoxicillin 250mg", 60, Some("2024-09-01")),
        record(3, "Rabies Vaccine", 25, Some("2024-03-25")),
        record(4, "Syringe 5ml", 120, Some("2026-01-01")),
        record(5, "Syringe 5ml", 30, None), // lot with a smudged label
        record(6, "Surgical Gloves (pair)", 90, Some("2025-06-15")),
    ]
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Veterinary Inventory Simulation ===");

    let start = chrono::NaiveDate::from_ymd_opt(2024, 3, 1).expect("valid start date");
    let config = SimulationConfig::new(start).with_seed(2024);

    let (mut clock, warnings) = SimulationClock::load(config, seed_items(), seed_batches());
    for warning in &warnings {
        println!("warning: {warning}");
    }
    if !clock.is_ready() {
        eprintln!("Simulation failed to initialize.");
        return;
    }

    println!("Simulating one week from {start}...");
    for report in clock.advance_one_week() {
        for warning in &report.warnings {
            println!("warning (day {}): {warning}", report.day);
        }
    }

    println!(
        "\n--- Status at end of day {} ({}) ---",
        clock.day_count(),
        clock.current_date().expect("clock is ready")
    );
    for row in clock.status_report() {
        println!(
            "{:<24} qoh {:>4}  rop {:>4}  {:?}  nearing-expiry {}  expired {}  earliest {}",
            row.item_name,
            row.total_qoh,
            row.reorder_point
                .map_or_else(|| "?".to_string(), |r| r.to_string()),
            row.stock_status,
            row.nearing_expiry_batches,
            row.expired_batches,
            row.earliest_expiry
                .map_or_else(|| "-".to_string(), |d| d.to_string()),
        );
    }

    let suggestions = clock.reorder_suggestions();
    if suggestions.is_empty() {
        println!("\nNo items need reordering.");
    } else {
        println!("\n--- Reorder suggestions ---");
        for suggestion in &suggestions {
            println!(
                "{:<24} order {} units",
                suggestion.item_name, suggestion.recommended_qty
            );
        }
        // Receive the first suggestion to show replenishment in action.
        let name = suggestions[0].item_name.clone();
        match clock.receive_order(&name) {
            Ok(_) => println!(
                "Received order for '{}'; on hand now {}.",
                name,
                clock
                    .ledger()
                    .map_or(0, |ledger| ledger.total_on_hand(&name))
            ),
            Err(e) => eprintln!("Order failed: {e}"),
        }
    }

    println!("\n--- 7-day trend (total on hand per day) ---");
    for (item, series) in clock.history_series() {
        let points: Vec<String> = series.iter().map(|&(_, qoh)| qoh.to_string()).collect();
        println!("{:<24} {}", item, points.join(" -> "));
    }

    println!("\nSimulation complete.");
}
