//! Writes a deterministic synthetic salary dataset for trying the dashboard.
//!
//! Usage: `generate_sample [OUTPUT]` where OUTPUT ends in `.csv` (default
//! `dados-imersao-final.csv`) or `.parquet`.

use std::path::Path;
use std::sync::Arc;

use anyhow::{bail, Context, Result};
use arrow::array::{Float64Array, Int64Array, StringArray};
use arrow::datatypes::{DataType, Field, Schema};
use arrow::record_batch::RecordBatch;
use parquet::arrow::ArrowWriter;

const HEADERS: [&str; 8] = [
    "ano",
    "senioridade",
    "contrato",
    "tamanho_empresa",
    "cargo",
    "usd",
    "remoto",
    "residencia_iso3",
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

    /// Box-Muller transform for normal distribution
    fn gauss(&mut self, mean: f64, std_dev: f64) -> f64 {
        let u1 = self.next_f64().max(1e-15);
        let u2 = self.next_f64();
        let z = (-2.0 * u1.ln()).sqrt() * (2.0 * std::f64::consts::PI * u2).cos();
        mean + std_dev * z
    }

    /// Pick from `(item, weight)` pairs.
    fn weighted<'a, T>(&mut self, choices: &'a [(T, f64)]) -> &'a T {
        let total: f64 = choices.iter().map(|(_, w)| w).sum();
        let mut target = self.next_f64() * total;
        for (item, weight) in choices {
            if target < *weight {
                return item;
            }
            target -= weight;
        }
        &choices[choices.len() - 1].0
    }
}

struct Row {
    year: i64,
    seniority: &'static str,
    contract: &'static str,
    size: &'static str,
    title: &'static str,
    usd: f64,
    remote: &'static str,
    country: &'static str,
}

fn generate(n: usize, rng: &mut SimpleRng) -> Vec<Row> {
    let years = [(2020i64, 0.05), (2021, 0.1), (2022, 0.25), (2023, 0.35), (2024, 0.25)];
    let seniority = [("junior", 0.2, 0.6), ("pleno", 0.3, 0.85), ("senior", 0.4, 1.15), ("executivo", 0.1, 1.6)];
    let contracts = [("integral", 0.93), ("contrato", 0.03), ("parcial", 0.02), ("freelancer", 0.02)];
    let sizes = [("pequena", 0.1), ("media", 0.75), ("grande", 0.15)];
    let titles = [
        ("Data Scientist", 0.25, 150_000.0),
        ("Data Engineer", 0.25, 145_000.0),
        ("Data Analyst", 0.2, 105_000.0),
        ("Machine Learning Engineer", 0.15, 180_000.0),
        ("Analytics Engineer", 0.05, 150_000.0),
        ("Research Scientist", 0.04, 190_000.0),
        ("Data Architect", 0.03, 165_000.0),
        ("Business Intelligence Analyst", 0.03, 95_000.0),
    ];
    let remote = [("presencial", 0.5), ("remoto", 0.4), ("hibrido", 0.1)];
    let countries = [
        ("USA", 0.8, 1.0),
        ("GBR", 0.05, 0.65),
        ("CAN", 0.05, 0.8),
        ("DEU", 0.03, 0.7),
        ("ESP", 0.02, 0.45),
        ("IND", 0.02, 0.25),
        ("BRA", 0.02, 0.3),
        ("FRA", 0.01, 0.6),
    ];

    let pairs = |xs: &[(&'static str, f64, f64)]| -> Vec<((&'static str, f64), f64)> {
        xs.iter().map(|&(name, w, m)| ((name, m), w)).collect()
    };
    let seniority = pairs(&seniority);
    let titles = pairs(&titles);
    let countries = pairs(&countries);

    (0..n)
        .map(|_| {
            let &(level, level_factor) = rng.weighted(&seniority);
            let &(title, base) = rng.weighted(&titles);
            let &(country, country_factor) = rng.weighted(&countries);
            let usd = rng
                .gauss(base * level_factor * country_factor, 0.18 * base)
                .max(15_000.0)
                .round();
            Row {
                year: *rng.weighted(&years),
                seniority: level,
                contract: *rng.weighted(&contracts),
                size: *rng.weighted(&sizes),
                title,
                usd,
                remote: *rng.weighted(&remote),
                country,
            }
        })
        .collect()
}

fn write_csv(path: &Path, rows: &[Row]) -> Result<()> {
    let mut writer = csv::Writer::from_path(path).context("creating CSV file")?;
    writer.write_record(HEADERS)?;
    for r in rows {
        writer.write_record([
            r.year.to_string(),
            r.seniority.to_string(),
            r.contract.to_string(),
            r.size.to_string(),
            r.title.to_string(),
            r.usd.to_string(),
            r.remote.to_string(),
            r.country.to_string(),
        ])?;
    }
    writer.flush()?;
    Ok(())
}

fn write_parquet(path: &Path, rows: &[Row]) -> Result<()> {
    let text = |name: &str| Field::new(name, DataType::Utf8, false);
    let schema = Arc::new(Schema::new(vec![
        Field::new(HEADERS[0], DataType::Int64, false),
        text(HEADERS[1]),
        text(HEADERS[2]),
        text(HEADERS[3]),
        text(HEADERS[4]),
        Field::new(HEADERS[5], DataType::Float64, false),
        text(HEADERS[6]),
        text(HEADERS[7]),
    ]));

    let strings = |f: fn(&Row) -> &'static str| StringArray::from(rows.iter().map(f).collect::<Vec<_>>());
    let batch = RecordBatch::try_new(
        schema.clone(),
        vec![
            Arc::new(Int64Array::from(rows.iter().map(|r| r.year).collect::<Vec<_>>())),
            Arc::new(strings(|r| r.seniority)),
            Arc::new(strings(|r| r.contract)),
            Arc::new(strings(|r| r.size)),
            Arc::new(strings(|r| r.title)),
            Arc::new(Float64Array::from(rows.iter().map(|r| r.usd).collect::<Vec<_>>())),
            Arc::new(strings(|r| r.remote)),
            Arc::new(strings(|r| r.country)),
        ],
    )
    .context("building record batch")?;

    let file = std::fs::File::create(path).context("creating parquet file")?;
    let mut writer = ArrowWriter::try_new(file, schema, None).context("creating parquet writer")?;
    writer.write(&batch)?;
    writer.close()?;
    Ok(())
}

fn main() -> Result<()> {
    let output = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "dados-imersao-final.csv".to_string());
    let path = Path::new(&output);

    let mut rng = SimpleRng::new(42);
    let rows = generate(2_000, &mut rng);

    match path.extension().and_then(|e| e.to_str()) {
        Some("csv") => write_csv(path, &rows)?,
        Some("parquet") | Some("pq") => write_parquet(path, &rows)?,
        _ => bail!("output must end in .csv or .parquet: {output}"),
    }

    println!("Wrote {} salary records to {output}", rows.len());
    Ok(())
}
