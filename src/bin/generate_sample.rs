use std::io::ErrorKind;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;
use rusqlite::{Connection, params};

const DB_PATH: &str = "cleaned_data.db";
const PARQUET_PATH: &str = "sample_pension.parquet";

const INDICATORS: [&str; 4] = [
    "Pension assets (% of GDP)",
    "Replacement rate (%)",
    "Coverage rate (%)",
    "Contribution rate (%)",
];

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

    fn uniform(&mut self, lo: f64, hi: f64) -> f64 {
        lo + (hi - lo) * self.next_f64()
    }
}

struct Row {
    country: String,
    year: Option<i64>,
    values: [Option<f64>; 4],
}

/// Every Nth year of every other country is written without a Year.
const MISSING_YEAR_EVERY: usize = 9;

/// Each country drifts from its own baseline; ~3% of values are missing and
/// a handful of rows lose their Year.
fn generate_rows(rng: &mut SimpleRng) -> Vec<Row> {
    let countries = [
        ("Australia", [110.0, 40.0, 72.0, 11.0]),
        ("Canada", [85.0, 45.0, 65.0, 9.9]),
        ("France", [10.0, 60.0, 90.0, 27.0]),
        ("Germany", [8.0, 43.0, 80.0, 18.6]),
        ("Japan", [30.0, 38.0, 55.0, 18.3]),
        ("Netherlands", [170.0, 80.0, 88.0, 24.0]),
        ("United States", [120.0, 39.0, 48.0, 12.4]),
    ];

    let mut rows = Vec::new();
    for (c, (country, base)) in countries.into_iter().enumerate() {
        let mut level = base;
        for (n, year) in (2000..=2022).enumerate() {
            let mut values = [None; 4];
            for (i, v) in values.iter_mut().enumerate() {
                level[i] *= 1.0 + rng.uniform(-0.02, 0.035);
                if rng.next_f64() > 0.03 {
                    *v = Some((level[i] * 100.0).round() / 100.0);
                }
            }
            let drop_year = c % 2 == 0 && n % MISSING_YEAR_EVERY == MISSING_YEAR_EVERY - 1;
            let year = if drop_year { None } else { Some(year) };
            rows.push(Row {
                country: country.to_string(),
                year,
                values,
            });
        }
    }
    rows
}

fn write_sqlite(rows: &[Row]) -> Result<()> {
    match std::fs::remove_file(DB_PATH) {
        Ok(()) => {}
        Err(e) if e.kind() == ErrorKind::NotFound => {}
        Err(e) => return Err(e).with_context(|| format!("removing old {DB_PATH}")),
    }
    let mut conn = Connection::open(DB_PATH).context("creating database")?;

    let columns: Vec<String> = INDICATORS.iter().map(|i| format!("\"{i}\" REAL")).collect();
    conn.execute_batch(&format!(
        "CREATE TABLE pension_data (Country TEXT, Year REAL, {});",
        columns.join(", ")
    ))?;

    let tx = conn.transaction()?;
    {
        let mut stmt = tx.prepare("INSERT INTO pension_data VALUES (?1, ?2, ?3, ?4, ?5, ?6)")?;
        for row in rows {
            stmt.execute(params![
                row.country,
                row.year,
                row.values[0],
                row.values[1],
                row.values[2],
                row.values[3],
            ])?;
        }
    }
    tx.commit()?;
    Ok(())
}

fn write_parquet(rows: &[Row]) -> Result<()> {
    let mut fields = vec![
        Field::new("Country", DataType::Utf8, false),
        Field::new("Year", DataType::Int64, true),
    ];
    fields.extend(INDICATORS.iter().map(|i| Field::new(*i, DataType::Float64, true)));
    let schema = Arc::new(Schema::new(fields));

    let mut arrays: Vec<Arc<dyn arrow::array::Array>> = vec![
        Arc::new(StringArray::from(
            rows.iter().map(|r| r.country.as_str()).collect::<Vec<_>>(),
        )),
        Arc::new(Int64Array::from(rows.iter().map(|r| r.year).collect::<Vec<_>>())),
    ];
    for i in 0..INDICATORS.len() {
        arrays.push(Arc::new(Float64Array::from(
            rows.iter().map(|r| r.values[i]).collect::<Vec<_>>(),
        )));
    }

    let batch = RecordBatch::try_new(schema.clone(), arrays).context("building record batch")?;
    let file = std::fs::File::create(PARQUET_PATH).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None)?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let rows = generate_rows(&mut rng);

    write_sqlite(&rows)?;
    write_parquet(&rows)?;

    let without_year = rows.iter().filter(|r| r.year.is_none()).count();
    println!(
        "Wrote {} rows ({without_year} without Year) to {DB_PATH} and {PARQUET_PATH}",
        rows.len()
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn some_rows_have_no_year() {
        let rows = generate_rows(&mut SimpleRng::new(42));
        let without_year = rows.iter().filter(|r| r.year.is_none()).count();
        assert!(without_year > 0);
        assert!(without_year < rows.len() / 10);
    }

    #[test]
    fn every_country_keeps_usable_years() {
        let rows = generate_rows(&mut SimpleRng::new(42));
        let countries: std::collections::BTreeSet<_> =
            rows.iter().map(|r| r.country.as_str()).collect();
        for country in countries {
            assert!(rows.iter().any(|r| r.country == country && r.year.is_some()));
        }
    }
}
