use crate::config::InputConfig;
use crate::error::DataLoadError;
use crate::types::School;
use calamine::{open_workbook_auto, Data, Reader};
use csv::ReaderBuilder;
use once_cell::sync::OnceCell;
use std::borrow::Cow;
use std::fs::File;
use std::path::Path;
use std::sync::Arc;

pub const COL_SCHOOL_NAME: &str = "School Name";
pub const COL_STATE: &str = "State";
pub const COL_LGA_NAME: &str = "Local Government Area Name";
pub const COL_LATITUDE: &str = "Latitude";
pub const COL_LONGITUDE: &str = "Longitude";

/// The school sheet, read at most once for the life of the process.
pub struct Dataset {
    input: InputConfig,
    schools: OnceCell<Arc<[School]>>,
}

impl Dataset {
    pub fn new(input: InputConfig) -> Self {
        Self {
            input,
            schools: OnceCell::new(),
        }
    }

    /// Returns the cached rows, reading the resource on first use.
    ///
    /// A failed read leaves the cell empty, so the error surfaces again on
    /// the next call rather than being cached.
    pub fn load_schools(&self) -> Result<Arc<[School]>, DataLoadError> {
        self.schools
            .get_or_try_init(|| read_schools(&self.input).map(Arc::from))
            .cloned()
    }
}

pub fn read_schools(input: &InputConfig) -> Result<Vec<School>, DataLoadError> {
    tracing::info!("Fetching school location data from {:?}", input.path);

    let extension = input.path.extension()
        .and_then(|e| e.to_str())
        .map(|s| s.to_lowercase())
        .ok_or_else(|| DataLoadError::UnsupportedFormat(format!("{:?} has no extension", input.path)))?;

    let schools = match extension.as_str() {
        "csv" => load_csv(&input.path)?,
        "xlsx" | "xlsm" | "xlsb" | "xls" | "ods" => load_workbook(&input.path, &input.sheet)?,
        _ => return Err(DataLoadError::UnsupportedFormat(extension)),
    };

    tracing::info!("Loaded {} schools", schools.len());
    Ok(schools)
}

fn load_csv(path: &Path) -> Result<Vec<School>, DataLoadError> {
    let file = File::open(path).map_err(|source| DataLoadError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    let mut rdr = ReaderBuilder::new().from_reader(file);
    let headers = rdr.headers()?.clone();
    let columns = Columns::locate(&headers.iter().collect::<Vec<_>>())?;

    let mut schools = Vec::new();
    for (i, result) in rdr.records().enumerate() {
        let record = result?;
        let cell = |idx: usize| match record.get(idx) {
            Some(s) if !s.is_empty() => Cell::Text(Cow::Borrowed(s)),
            _ => Cell::Empty,
        };
        // Header is sheet row 1
        if let Some(school) = columns.parse_row(i + 2, cell)? {
            schools.push(school);
        }
    }

    Ok(schools)
}

fn load_workbook(path: &Path, sheet: &str) -> Result<Vec<School>, DataLoadError> {
    let workbook_err = |source| DataLoadError::Workbook {
        path: path.to_path_buf(),
        source,
    };

    let mut workbook = open_workbook_auto(path).map_err(workbook_err)?;
    if !workbook.sheet_names().iter().any(|name| name == sheet) {
        return Err(DataLoadError::SheetNotFound(sheet.to_string()));
    }
    let range = workbook.worksheet_range(sheet).map_err(workbook_err)?;

    let mut rows = range.rows();
    let headers: Vec<String> = rows.next()
        .map(|row| row.iter().map(|c| c.to_string()).collect())
        .unwrap_or_default();
    let columns = Columns::locate(&headers)?;

    let mut schools = Vec::new();
    for (i, row) in rows.enumerate() {
        let cell = |idx: usize| match row.get(idx) {
            Some(Data::String(s)) if !s.is_empty() => Cell::Text(Cow::Borrowed(s.as_str())),
            Some(Data::Float(f)) => Cell::Number(*f),
            Some(Data::Int(n)) => Cell::Number(*n as f64),
            Some(Data::String(_)) | Some(Data::Empty) | None => Cell::Empty,
            Some(other) => Cell::Text(Cow::Owned(other.to_string())),
        };
        if let Some(school) = columns.parse_row(i + 2, cell)? {
            schools.push(school);
        }
    }

    Ok(schools)
}

enum Cell<'a> {
    Text(Cow<'a, str>),
    Number(f64),
    Empty,
}

impl Cell<'_> {
    /// Cell contents as written; grouping keys are compared verbatim.
    fn text(&self) -> String {
        match self {
            Cell::Text(s) => s.to_string(),
            Cell::Number(n) => n.to_string(),
            Cell::Empty => String::new(),
        }
    }

    fn number(&self) -> Option<f64> {
        match self {
            Cell::Text(s) => s.trim().parse().ok(),
            Cell::Number(n) => Some(*n),
            Cell::Empty => None,
        }
    }
}

/// Position of each required column in the header row.
struct Columns {
    name: usize,
    state: usize,
    lga_name: usize,
    latitude: usize,
    longitude: usize,
}

impl Columns {
    fn locate<S: AsRef<str>>(headers: &[S]) -> Result<Self, DataLoadError> {
        let find = |column: &'static str| {
            headers.iter()
                .position(|h| h.as_ref() == column)
                .ok_or(DataLoadError::MissingColumn(column))
        };

        Ok(Self {
            name: find(COL_SCHOOL_NAME)?,
            state: find(COL_STATE)?,
            lga_name: find(COL_LGA_NAME)?,
            latitude: find(COL_LATITUDE)?,
            longitude: find(COL_LONGITUDE)?,
        })
    }

    /// `Ok(None)` for rows that cannot be placed on the map: an empty state,
    /// LGA, latitude or longitude cell. Whitespace-only keys are kept.
    fn parse_row<'a>(
        &self,
        row: usize,
        cell: impl Fn(usize) -> Cell<'a>,
    ) -> Result<Option<School>, DataLoadError> {
        let state = cell(self.state).text();
        let lga_name = cell(self.lga_name).text();
        if state.is_empty() || lga_name.is_empty() {
            tracing::warn!("Skipping row {}: blank {} or {}", row, COL_STATE, COL_LGA_NAME);
            return Ok(None);
        }

        let coordinate = |idx: usize, column: &'static str| {
            let value = cell(idx);
            if matches!(value, Cell::Empty) {
                return Ok(None);
            }
            value.number()
                .filter(|v| v.is_finite())
                .map(Some)
                .ok_or_else(|| DataLoadError::InvalidValue {
                    row,
                    column,
                    value: value.text(),
                })
        };

        let latitude = coordinate(self.latitude, COL_LATITUDE)?;
        let longitude = coordinate(self.longitude, COL_LONGITUDE)?;
        let (Some(latitude), Some(longitude)) = (latitude, longitude) else {
            tracing::warn!("Skipping row {}: blank {} or {}", row, COL_LATITUDE, COL_LONGITUDE);
            return Ok(None);
        };

        Ok(Some(School {
            name: cell(self.name).text(),
            state,
            lga_name,
            latitude,
            longitude,
        }))
    }
}
