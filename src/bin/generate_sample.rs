use std::path::Path;
use std::sync::Arc;

use anyhow::{Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

/// Launch sites with their share of traffic and base success probability.
const SITES: [(&str, f64, f64); 4] = [
    ("CCAFS LC-40", 0.45, 0.73),
    ("KSC LC-39A", 0.25, 0.77),
    ("VAFB SLC-4E", 0.18, 0.60),
    ("CCAFS SLC-40", 0.12, 0.57),
];

/// Booster categories in flight order: (name, first flight, max payload kg, success bias).
const BOOSTERS: [(&str, u32, f64, f64); 5] = [
    ("v1.0", 1, 700.0, -0.5),
    ("v1.1", 6, 4_500.0, -0.35),
    ("FT", 21, 9_600.0, 0.15),
    ("B4", 42, 9_600.0, 0.1),
    ("B5", 52, 9_600.0, 0.25),
];

const N_LAUNCHES: u32 = 56;

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

    /// Pick an index according to `weights` (need not sum to 1).
    fn weighted(&mut self, weights: &[f64]) -> usize {
        let total: f64 = weights.iter().sum();
        let mut r = self.next_f64() * total;
        for (i, w) in weights.iter().enumerate() {
            if r < *w {
                return i;
            }
            r -= w;
        }
        weights.len() - 1
    }
}

struct Launch {
    flight_number: i64,
    site: &'static str,
    class: i64,
    payload_mass_kg: f64,
    booster_version: String,
    booster_category: &'static str,
}

fn generate(rng: &mut SimpleRng) -> Vec<Launch> {
    let site_weights: Vec<f64> = SITES.iter().map(|s| s.1).collect();

    (1..=N_LAUNCHES)
        .map(|flight| {
            let (site, _, base_rate) = SITES[rng.weighted(&site_weights)];
            let (category, _, max_payload, bias) = BOOSTERS
                .iter()
                .rev()
                .find(|b| flight >= b.1)
                .copied()
                .unwrap_or(BOOSTERS[0]);

            // Payload rounded to the nearest 10 kg, early flights carry little.
            let payload = (rng.next_f64() * max_payload / 10.0).round() * 10.0;
            let p_success = (base_rate + bias).clamp(0.05, 0.95);
            let class = i64::from(rng.next_f64() < p_success);

            Launch {
                flight_number: i64::from(flight),
                site,
                class,
                payload_mass_kg: payload,
                booster_version: format!("F9 {category} B{:04}", 1000 + flight),
                booster_category: category,
            }
        })
        .collect()
}

fn write_csv(path: &Path, launches: &[Launch]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record([
        "Flight Number",
        "Launch Site",
        "class",
        "Payload Mass (kg)",
        "Booster Version",
        "Booster Version Category",
    ])?;
    for l in launches {
        writer.write_record([
            l.flight_number.to_string(),
            l.site.to_string(),
            l.class.to_string(),
            format!("{:.1}", l.payload_mass_kg),
            l.booster_version.clone(),
            l.booster_category.to_string(),
        ])?;
    }
    writer.flush().context("flushing CSV file")?;
    Ok(())
}

fn write_parquet(path: &Path, launches: &[Launch]) -> Result<()> {
    let schema = Arc::new(Schema::new(vec![
        Field::new("Flight Number", DataType::Int64, false),
        Field::new("Launch Site", DataType::Utf8, false),
        Field::new("class", DataType::Int64, false),
        Field::new("Payload Mass (kg)", DataType::Float64, false),
        Field::new("Booster Version", DataType::Utf8, false),
        Field::new("Booster Version Category", DataType::Utf8, false),
    ]));

    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from_iter_values(launches.iter().map(|l| l.flight_number))),
            Arc::new(StringArray::from_iter_values(launches.iter().map(|l| l.site))),
            Arc::new(Int64Array::from_iter_values(launches.iter().map(|l| l.class))),
            Arc::new(Float64Array::from_iter_values(launches.iter().map(|l| l.payload_mass_kg))),
            Arc::new(StringArray::from_iter_values(
                launches.iter().map(|l| l.booster_version.as_str()),
            )),
            Arc::new(StringArray::from_iter_values(
                launches.iter().map(|l| l.booster_category),
            )),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch).context("writing parquet batch")?;
    writer.close().context("closing parquet writer")?;
    Ok(())
}

fn main() -> Result<()> {
    let mut rng = SimpleRng::new(42);
    let launches = generate(&mut rng);

    let csv_path = Path::new("spacex_launch_dash.csv");
    let parquet_path = Path::new("spacex_launch_dash.parquet");
    write_csv(csv_path, &launches)?;
    write_parquet(parquet_path, &launches)?;

    let successes: i64 = launches.iter().map(|l| l.class).sum();
    println!(
        "Wrote {} launches ({} successful) to {} and {}",
        launches.len(),
        successes,
        csv_path.display(),
        parquet_path.display()
    );
    Ok(())
}
