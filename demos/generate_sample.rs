use std::env;
use std::fs::{create_dir_all, File};
use std::io::{self, stdout, Write};
use std::path::Path;

use chrono::{Days, NaiveDate};
use rand::seq::IndexedRandom;
use rand::Rng;
use rust_decimal::Decimal;

const PROBABILITY_INVALID: f64 = 0.02;
const PROBABILITY_REPEAT_ORDER: f64 = 0.01;

const COMPANIES: [&str; 5] = ["SF Express", "YTO Express", "ZTO Express", "JD Logistics", "Cainiao"];
const STATUSES: [&str; 4] = ["Delivered", "In Transit", "Exported", "Pending"];
const ITEMS: [&str; 12] = [
    "USB-C Cable", "Desk Lamp", "Phone Case", "Bluetooth Speaker", "Notebook Set", "Water Bottle",
    "Mechanical Keyboard", "Wireless Mouse", "Tea Sampler", "Travel Adapter", "LED Strip", "Backpack"
];

struct GeneratorConfig {
    num_records: usize,
    days: u64,
    output_path: String
}

impl GeneratorConfig {
    fn from_args() -> Self {
        let args: Vec<String> = env::args().collect();
        let num_records = args.get(1).and_then(|s| s.parse().ok()).unwrap_or(100_000);
        let days = args.get(2).and_then(|s| s.parse().ok()).unwrap_or(365);

        Self {
            num_records,
            days,
            output_path: "samples/stress_test.csv".to_string()
        }
    }
}

fn main() -> io::Result<()> {
    let config = GeneratorConfig::from_args();

    println!(
        "Generating {} purchases over {} days in {}...",
        config.num_records, config.days, config.output_path
    );

    if let Some(parent) = Path::new(&config.output_path).parent() {
        create_dir_all(parent)?;
    }

    let file = File::create(&config.output_path)?;
    let mut writer = io::BufWriter::new(file);

    writeln!(writer, "SN|date|tracking_number|companyName|itemName|quantity|itemPrice|exportStatus|orderId")?;

    let mut rng = rand::rng();
    let start = NaiveDate::from_ymd_opt(2025, 1, 1).unwrap_or_default();

    for sn in 1..=config.num_records {
        let roll: f64 = rng.random();

        if roll < PROBABILITY_INVALID {
            generate_invalid_record(&mut writer, &mut rng, sn)?;
        } else if roll < PROBABILITY_INVALID + PROBABILITY_REPEAT_ORDER && sn > 1 {
            //NOTE: Re-uses an earlier order id to exercise replacement on import
            let order = rng.random_range(1..sn);
            generate_purchase(&mut writer, &mut rng, sn, start, config.days, order)?;
        } else {
            generate_purchase(&mut writer, &mut rng, sn, start, config.days, sn)?;
        }

        if sn % 10_000 == 0 {
            print!(".");
            stdout().flush()?;
        }
    }

    writer.flush()?;
    println!("\nGeneration complete.");

    Ok(())
}

fn generate_price<R: Rng>(rng: &mut R) -> Decimal {
    Decimal::new(rng.random_range(50..500_000), 2)
}

fn generate_purchase<W: Write, R: Rng>(writer: &mut W, rng: &mut R, sn: usize, start: NaiveDate, days: u64, order: usize) -> io::Result<()> {
    let date = start.checked_add_days(Days::new(rng.random_range(0..days.max(1)))).unwrap_or(start);
    let company = COMPANIES.choose(rng).copied().unwrap_or_default();
    let item = ITEMS.choose(rng).copied().unwrap_or_default();
    let status = STATUSES.choose(rng).copied().unwrap_or_default();
    let quantity = rng.random_range(1..=10);
    let price = generate_price(rng);

    writeln!(
        writer,
        "{sn}|{date}|SF{tracking:012}|{company}|{item}|{quantity}|{price}|{status}|ORD{order:08}",
        tracking = rng.random_range(0..1_000_000_000_000u64)
    )
}

fn generate_invalid_record<W: Write, R: Rng>(writer: &mut W, rng: &mut R, sn: usize) -> io::Result<()> {
    let invalid_types = [
        format!("{sn}|2025-13-01|SF1|SF Express|Cable|1|10.00|Delivered|BAD{sn:08}"),
        format!("{sn}|2025-06-01|SF1|SF Express|Cable|0|10.00|Delivered|BAD{sn:08}"),
        format!("{sn}|2025-06-01|SF1|SF Express|Cable|1|ten|Delivered|BAD{sn:08}"),
        format!("{sn}|2025-06-01||SF Express|Cable|1|10.00|Delivered|BAD{sn:08}"),
        format!("{sn}|2025-06-01|SF1|SF Express|Cable|1|10.00|Delivered"),
        format!("{sn}|2025-06-01|SF1|SF Express|Cable|1|10.00|Delivered|BAD{sn:08}|extra"),
        format!("x{sn}|2025-06-01|SF1|SF Express|Cable|1|10.00|Delivered|BAD{sn:08}"),
        "junk".to_string()
    ];

    match invalid_types.choose(rng) {
        Some(record) => writeln!(writer, "{record}"),
        None => Ok(())
    }
}
