use std::sync::Arc;

use arrow::array::{Float64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use chrono::NaiveDate;
use parquet::arrow::ArrowWriter;

/// Minimal deterministic PRNG (xoshiro256**)
struct SimpleRng {
    state: [u64; 4],
}

impl SimpleRng {
    fn new(seed: u64) -> Self {
        let mut s = [0u64; 4];
        let mut x = seed;
        for slot in &mut s {
            x = x.wrapping_mul(6364136223846793005).wrapping_add(1);
            *slot = x;
        }
        SimpleRng { state: s }
    }

    fn next_u64(&mut self) -> u64 {
        let result = (self.state[1].wrapping_mul(5))
            .rotate_left(7)
            .wrapping_mul(9);
        let t = self.state[1] << 17;
        self.state[2] ^= self.state[0];
        self.state[3] ^= self.state[1];
        self.state[1] ^= self.state[2];
        self.state[0] ^= self.state[3];
        self.state[2] ^= t;
        self.state[3] = self.state[3].rotate_left(45);
        result
    }

    fn next_f64(&mut self) -> f64 {
        (self.next_u64() >> 11) as f64 / (1u64 << 53) as f64
    }

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }
}

fn main() {
    let mut rng = SimpleRng::new(42);

    // Daily valuations: 2024-01-01 through 2024-03-31.
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    let end = NaiveDate::from_ymd_opt(2024, 3, 31).unwrap();
    let dates: Vec<NaiveDate> = start.iter_days().take_while(|d| *d <= end).collect();

    // Starting market value per (portfolio, security type).
    let base_mv: Vec<(&str, &str, f64)> = vec![
        ("Global Equity", "Equity", 1_250_000.0),
        ("Global Equity", "Cash", 85_000.0),
        ("Nordic Bond", "Fixed Income", 900_000.0),
        ("Nordic Bond", "Cash", 40_000.0),
        ("Balanced", "Equity", 400_000.0),
        ("Balanced", "Fixed Income", 450_000.0),
        ("Balanced", "Cash", 25_000.0),
    ];

    // Collect all rows
    let mut all_date: Vec<String> = Vec::new();
    let mut all_portfolio: Vec<String> = Vec::new();
    let mut all_sec_type: Vec<String> = Vec::new();
    let mut all_mv: Vec<f64> = Vec::new();

    for &(portfolio, sec_type, base) in &base_mv {
        // Random walk with a small upward drift, one observation per day.
        let mut mv = base;
        for date in &dates {
            mv *= 1.0 + rng.gauss(0.0004, 0.006);
            all_date.push(date.format("%Y-%m-%d").to_string());
            all_portfolio.push(portfolio.to_string());
            all_sec_type.push(sec_type.to_string());
            all_mv.push((mv * 100.0).round() / 100.0);
        }
    }

    // Build Arrow arrays
    let date_array = StringArray::from(all_date.iter().map(|s| s.as_str()).collect::<Vec<_>>());
    let portfolio_array = StringArray::from(
        all_portfolio.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
    );
    let sec_type_array = StringArray::from(
        all_sec_type.iter().map(|s| s.as_str()).collect::<Vec<_>>(),
    );
    let all_mv_len = all_mv.len();
    let mv_array = Float64Array::from(all_mv);

    let schema = Arc::new(Schema::new(vec![
        Field::new("valuation_date", DataType::Utf8, false),
        Field::new("portfolio", DataType::Utf8, false),
        Field::new("security_type", DataType::Utf8, false),
        Field::new("market_value", DataType::Float64, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(date_array),
            Arc::new(portfolio_array),
            Arc::new(sec_type_array),
            Arc::new(mv_array),
        ],
    )
    .expect("Failed to create RecordBatch");

    // Write Parquet
    let output_path = "portfolio_valuations.parquet";
    let file = std::fs::File::create(output_path).expect("Failed to create output file");
    let mut writer = ArrowWriter::try_new(file, schema, None).expect("Failed to create writer");
    writer.write(&batch).expect("Failed to write batch");
    writer.close().expect("Failed to close writer");

    println!(
        "Wrote {} valuations ({} days, {} portfolio/security pairs) to {output_path}",
        all_mv_len,
        dates.len(),
        base_mv.len()
    );
}
