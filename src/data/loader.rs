use std::collections::{HashMap, HashSet};
use std::fs::File;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex, OnceLock, PoisonError};

use arrow::array::{Array, ArrayRef, AsArray};
use arrow::datatypes::{DataType, Float32Type, Float64Type, Int16Type, Int32Type, Int64Type};
use parquet::arrow::arrow_reader::ParquetRecordBatchReaderBuilder;
use serde_json::{Map, Value as JsonValue};

use super::model::{SalaryDataset, SalaryRecord};
use crate::error::DataUnavailable;

// ---------------------------------------------------------------------------
// Memoized source: load once, share for the process lifetime
// ---------------------------------------------------------------------------

/// Datasets already parsed by this process, keyed by the configured path.
static LOADED: OnceLock<Mutex<HashMap<PathBuf, Arc<SalaryDataset>>>> = OnceLock::new();

/// A dataset file that is parsed at most once per process.
///
/// The first successful [`load`](Self::load) of a path is cached process-wide;
/// later calls, from this or any other `DatasetSource` with the same path,
/// return the same `Arc` without touching the file system. Failures are not
/// cached.
#[derive(Debug, Clone)]
pub struct DatasetSource {
    path: PathBuf,
}

impl DatasetSource {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Result<Arc<SalaryDataset>, DataUnavailable> {
        // Held across the parse so concurrent callers never read the file twice.
        let mut loaded = LOADED
            .get_or_init(Default::default)
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        if let Some(dataset) = loaded.get(&self.path) {
            return Ok(Arc::clone(dataset));
        }

        let dataset = Arc::new(load_file(&self.path)?);
        if dataset.is_empty() {
            log::warn!("{} has a header but no records", self.path.display());
        } else {
            log::info!(
                "Loaded {} salary records from {}",
                dataset.len(),
                self.path.display()
            );
        }
        loaded.insert(self.path.clone(), Arc::clone(&dataset));
        Ok(dataset)
    }
}

// ---------------------------------------------------------------------------
// Public entry-point
// ---------------------------------------------------------------------------

/// Load a salary dataset from a file.  Dispatch by extension.
///
/// Supported formats:
/// * `.csv`     – header row, one record per line
/// * `.json`    – `[{ "ano": 2023, "cargo": "...", ... }, ...]`
/// * `.parquet` – one column per field, Arrow-typed
pub fn load_file(path: &Path) -> Result<SalaryDataset, DataUnavailable> {
    let ext = path
        .extension()
        .and_then(|e| e.to_str())
        .unwrap_or("")
        .to_ascii_lowercase();

    match ext.as_str() {
        "csv" => load_csv(path),
        "json" => load_json(path),
        "parquet" | "pq" => load_parquet(path),
        other => Err(DataUnavailable::UnsupportedFormat(other.to_string())),
    }
}

fn open(path: &Path) -> Result<File, DataUnavailable> {
    File::open(path).map_err(|source| DataUnavailable::Io {
        path: path.to_path_buf(),
        source,
    })
}

// ---------------------------------------------------------------------------
// Schema: required columns and the header names accepted for each
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum SourceColumn {
    Year,
    Seniority,
    ContractType,
    CompanySize,
    JobTitle,
    SalaryUsd,
    RemoteType,
    Country,
}

impl SourceColumn {
    const ALL: [SourceColumn; 8] = [
        SourceColumn::Year,
        SourceColumn::Seniority,
        SourceColumn::ContractType,
        SourceColumn::CompanySize,
        SourceColumn::JobTitle,
        SourceColumn::SalaryUsd,
        SourceColumn::RemoteType,
        SourceColumn::Country,
    ];

    fn name(self) -> &'static str {
        match self {
            SourceColumn::Year => "year",
            SourceColumn::Seniority => "seniority_level",
            SourceColumn::ContractType => "contract_type",
            SourceColumn::CompanySize => "company_size",
            SourceColumn::JobTitle => "job_title",
            SourceColumn::SalaryUsd => "salary_usd",
            SourceColumn::RemoteType => "remote_type",
            SourceColumn::Country => "residence_country_code",
        }
    }

    /// Header names recognised for this column, original dataset first.
    fn accepted_headers(self) -> &'static [&'static str] {
        match self {
            SourceColumn::Year => &["ano", "year", "work_year"],
            SourceColumn::Seniority => &["senioridade", "seniority_level", "experience_level"],
            SourceColumn::ContractType => &["contrato", "contract_type", "employment_type"],
            SourceColumn::CompanySize => &["tamanho_empresa", "company_size"],
            SourceColumn::JobTitle => &["cargo", "job_title"],
            SourceColumn::SalaryUsd => &["usd", "salary_usd", "salary_in_usd"],
            SourceColumn::RemoteType => &["remoto", "remote_type"],
            SourceColumn::Country => &["residencia_iso3", "residence_country_code"],
        }
    }

    fn missing(self) -> DataUnavailable {
        DataUnavailable::MissingColumn {
            column: self.name(),
            accepted: self.accepted_headers().join(", "),
        }
    }

    /// Position of this column among `headers`.
    fn locate<'h>(self, headers: impl Iterator<Item = &'h str> + Clone) -> Result<usize, DataUnavailable> {
        self.accepted_headers()
            .iter()
            .find_map(|name| headers.clone().position(|h| h.trim() == *name))
            .ok_or_else(|| self.missing())
    }
}

/// Column positions resolved once per file, indexed like `SourceColumn::ALL`.
#[derive(Debug, Clone, Copy)]
struct ColumnIndex([usize; 8]);

impl ColumnIndex {
    fn resolve<'h>(headers: impl Iterator<Item = &'h str> + Clone) -> Result<Self, DataUnavailable> {
        let mut positions = [0usize; 8];
        for (slot, col) in positions.iter_mut().zip(SourceColumn::ALL) {
            *slot = col.locate(headers.clone())?;
        }
        Ok(ColumnIndex(positions))
    }

    fn get(&self, col: SourceColumn) -> usize {
        self.0[col as usize]
    }
}

// ---------------------------------------------------------------------------
// Cell conversion shared by all formats
// ---------------------------------------------------------------------------

/// A raw cell before it is typed into a `SalaryRecord` field.
#[derive(Debug, Clone, PartialEq)]
enum RawCell<'a> {
    Missing,
    Text(&'a str),
    Integer(i64),
    Float(f64),
    Unsupported(String),
}

/// Turns raw rows into records, interning repeated strings.
#[derive(Default)]
struct RecordBuilder {
    interned: HashSet<Arc<str>>,
    records: Vec<SalaryRecord>,
}

impl RecordBuilder {
    fn intern(&mut self, s: &str) -> Arc<str> {
        if let Some(existing) = self.interned.get(s) {
            return Arc::clone(existing);
        }
        let arc: Arc<str> = Arc::from(s);
        self.interned.insert(Arc::clone(&arc));
        arc
    }

    /// Build one record. `row` is the 1-based data row used in errors.
    fn push<'a>(
        &mut self,
        row: usize,
        cell: impl Fn(SourceColumn) -> RawCell<'a>,
    ) -> Result<(), DataUnavailable> {
        let year = parse_year(row, cell(SourceColumn::Year))?;
        let salary_usd = parse_salary(row, cell(SourceColumn::SalaryUsd))?;
        let mut text = |col: SourceColumn| -> Result<Arc<str>, DataUnavailable> {
            let value = parse_text(row, col, cell(col))?;
            Ok(self.intern(&value))
        };

        let record = SalaryRecord {
            year,
            seniority_level: text(SourceColumn::Seniority)?,
            contract_type: text(SourceColumn::ContractType)?,
            company_size: text(SourceColumn::CompanySize)?,
            job_title: text(SourceColumn::JobTitle)?,
            salary_usd,
            remote_type: text(SourceColumn::RemoteType)?,
            residence_country_code: text(SourceColumn::Country)?,
        };
        self.records.push(record);
        Ok(())
    }

    fn finish(self) -> SalaryDataset {
        SalaryDataset::from_records(self.records)
    }
}

fn malformed(row: usize, col: SourceColumn, reason: impl Into<String>) -> DataUnavailable {
    DataUnavailable::Malformed {
        row,
        column: col.name(),
        reason: reason.into(),
    }
}

/// `f` as an `i64` when it is a whole number inside the `i64` range.
fn integral_year(f: f64) -> Option<i64> {
    // `i64::MAX as f64` rounds up to 2^63, hence the exclusive upper bound.
    let in_range = f >= i64::MIN as f64 && f < i64::MAX as f64;
    (f.is_finite() && f.fract() == 0.0 && in_range).then_some(f as i64)
}

fn parse_year(row: usize, cell: RawCell<'_>) -> Result<i64, DataUnavailable> {
    let col = SourceColumn::Year;
    match cell {
        RawCell::Integer(i) => Ok(i),
        RawCell::Float(f) => {
            integral_year(f).ok_or_else(|| malformed(row, col, format!("{f} is not an integer year")))
        }
        RawCell::Text(s) => {
            let s = s.trim();
            if let Ok(i) = s.parse::<i64>() {
                return Ok(i);
            }
            s.parse::<f64>()
                .ok()
                .and_then(integral_year)
                .ok_or_else(|| malformed(row, col, format!("'{s}' is not an integer year")))
        }
        RawCell::Missing => Err(malformed(row, col, "missing value")),
        RawCell::Unsupported(ty) => Err(malformed(row, col, format!("unsupported cell type {ty}"))),
    }
}

fn parse_salary(row: usize, cell: RawCell<'_>) -> Result<f64, DataUnavailable> {
    let col = SourceColumn::SalaryUsd;
    let value = match cell {
        RawCell::Integer(i) => i as f64,
        RawCell::Float(f) => f,
        RawCell::Text(s) => s
            .trim()
            .parse::<f64>()
            .map_err(|_| malformed(row, col, format!("'{}' is not a number", s.trim())))?,
        RawCell::Missing => return Err(malformed(row, col, "missing value")),
        RawCell::Unsupported(ty) => {
            return Err(malformed(row, col, format!("unsupported cell type {ty}")))
        }
    };
    if !value.is_finite() || value < 0.0 {
        return Err(malformed(row, col, format!("{value} is not a valid salary")));
    }
    Ok(value)
}

fn parse_text(row: usize, col: SourceColumn, cell: RawCell<'_>) -> Result<String, DataUnavailable> {
    let value = match cell {
        RawCell::Text(s) => s.trim().to_string(),
        RawCell::Integer(i) => i.to_string(),
        RawCell::Float(f) => f.to_string(),
        RawCell::Missing => String::new(),
        RawCell::Unsupported(ty) => {
            return Err(malformed(row, col, format!("unsupported cell type {ty}")))
        }
    };
    if value.is_empty() {
        return Err(malformed(row, col, "missing value"));
    }
    Ok(value)
}

// ---------------------------------------------------------------------------
// CSV loader
// ---------------------------------------------------------------------------

/// CSV layout: header row with column names, one record per line.
/// Extra columns are ignored.
fn load_csv(path: &Path) -> Result<SalaryDataset, DataUnavailable> {
    let mut reader = csv::Reader::from_reader(open(path)?);
    let headers = reader.headers()?.clone();
    let names: Vec<&str> = headers.iter().collect();
    let index = ColumnIndex::resolve(names.iter().copied())?;

    let mut builder = RecordBuilder::default();
    for (row_no, result) in reader.records().enumerate() {
        let record = result?;
        builder.push(row_no + 1, |col| match record.get(index.get(col)) {
            Some(value) if !value.trim().is_empty() => RawCell::Text(value),
            _ => RawCell::Missing,
        })?;
    }

    Ok(builder.finish())
}

// ---------------------------------------------------------------------------
// JSON loader
// ---------------------------------------------------------------------------

/// Expected JSON schema (records-oriented, `df.to_json(orient='records')`):
///
/// ```json
/// [
///   { "ano": 2023, "senioridade": "senior", "cargo": "Data Scientist", "usd": 150000, ... },
///   ...
/// ]
/// ```
fn load_json(path: &Path) -> Result<SalaryDataset, DataUnavailable> {
    let root: JsonValue = serde_json::from_reader(std::io::BufReader::new(open(path)?))?;
    let records = root
        .as_array()
        .ok_or_else(|| DataUnavailable::Layout("expected a top-level JSON array".to_string()))?;

    let objects = records
        .iter()
        .enumerate()
        .map(|(i, rec)| {
            rec.as_object()
                .ok_or_else(|| DataUnavailable::Layout(format!("row {} is not a JSON object", i + 1)))
        })
        .collect::<Result<Vec<_>, _>>()?;

    // A column absent from every object is a schema problem, not a bad cell.
    for col in SourceColumn::ALL {
        let present = objects.iter().any(|obj| json_field(obj, col).is_some());
        if !objects.is_empty() && !present {
            return Err(col.missing());
        }
    }

    let mut builder = RecordBuilder::default();
    for (i, obj) in objects.iter().enumerate() {
        builder.push(i + 1, |col| match json_field(obj, col) {
            None | Some(JsonValue::Null) => RawCell::Missing,
            Some(JsonValue::String(s)) => RawCell::Text(s),
            Some(JsonValue::Number(n)) => match n.as_i64() {
                Some(i) => RawCell::Integer(i),
                None => n.as_f64().map_or(RawCell::Unsupported(n.to_string()), RawCell::Float),
            },
            Some(other) => RawCell::Unsupported(json_kind(other).to_string()),
        })?;
    }

    Ok(builder.finish())
}

fn json_field(obj: &Map<String, JsonValue>, col: SourceColumn) -> Option<&JsonValue> {
    col.accepted_headers().iter().find_map(|name| obj.get(*name))
}

fn json_kind(val: &JsonValue) -> &'static str {
    match val {
        JsonValue::Null => "null",
        JsonValue::Bool(_) => "bool",
        JsonValue::Number(_) => "number",
        JsonValue::String(_) => "string",
        JsonValue::Array(_) => "array",
        JsonValue::Object(_) => "object",
    }
}

// ---------------------------------------------------------------------------
// Parquet loader
// ---------------------------------------------------------------------------

/// Load a Parquet file with one column per field.
///
/// Integer columns may be Int16/32/64, salary may be integer or float,
/// text columns Utf8 or LargeUtf8. Works with files written by both
/// **Pandas** (`df.to_parquet()`) and **Polars** (`df.write_parquet()`).
fn load_parquet(path: &Path) -> Result<SalaryDataset, DataUnavailable> {
    let builder = ParquetRecordBatchReaderBuilder::try_new(open(path)?)?;
    let schema = Arc::clone(builder.schema());
    let names: Vec<&str> = schema.fields().iter().map(|f| f.name().as_str()).collect();
    let index = ColumnIndex::resolve(names.iter().copied())?;
    let reader = builder.build()?;

    let mut records = RecordBuilder::default();
    let mut row_no = 0usize;

    for batch_result in reader {
        let batch = batch_result?;
        let columns: Vec<&ArrayRef> = SourceColumn::ALL
            .iter()
            .map(|col| batch.column(index.get(*col)))
            .collect();

        for row in 0..batch.num_rows() {
            row_no += 1;
            records.push(row_no, |col| arrow_cell(columns[col as usize], row))?;
        }
    }

    Ok(records.finish())
}

/// Extract a single cell from an Arrow column at a given row.
fn arrow_cell(col: &ArrayRef, row: usize) -> RawCell<'_> {
    if col.is_null(row) {
        return RawCell::Missing;
    }
    let cell = match col.data_type() {
        DataType::Utf8 => col.as_string_opt::<i32>().map(|a| RawCell::Text(a.value(row))),
        DataType::LargeUtf8 => col.as_string_opt::<i64>().map(|a| RawCell::Text(a.value(row))),
        DataType::Int16 => col
            .as_primitive_opt::<Int16Type>()
            .map(|a| RawCell::Integer(i64::from(a.value(row)))),
        DataType::Int32 => col
            .as_primitive_opt::<Int32Type>()
            .map(|a| RawCell::Integer(i64::from(a.value(row)))),
        DataType::Int64 => col
            .as_primitive_opt::<Int64Type>()
            .map(|a| RawCell::Integer(a.value(row))),
        DataType::Float32 => col
            .as_primitive_opt::<Float32Type>()
            .map(|a| RawCell::Float(f64::from(a.value(row)))),
        DataType::Float64 => col
            .as_primitive_opt::<Float64Type>()
            .map(|a| RawCell::Float(a.value(row))),
        _ => None,
    };
    cell.unwrap_or_else(|| RawCell::Unsupported(format!("{:?}", col.data_type())))
}
