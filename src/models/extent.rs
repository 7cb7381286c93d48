use serde::{Deserialize, Serialize};

/// One cleaned row of the NSIDC monthly extent CSV.
///
/// Columns are positional: `Year, Month, Data_Type, Region, Extent, Area`.
/// The file uses `-9999` for missing measurements; those values are kept as-is
/// and left for outlier detection to deal with.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtentRecord {
    pub year: i32,
    pub month: u32,
    pub data_type: String,
    pub region: String,
    /// Sea-ice extent in millions of square kilometers.
    pub extent: f64,
    /// Raw area column, not used by the projections.
    pub area: String,
}

/// The `{Year, Extent}` pair used for regression.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct YearExtent {
    pub year: i32,
    pub extent: f64,
}

impl YearExtent {
    pub fn new(year: i32, extent: f64) -> Self {
        Self { year, extent }
    }
}

/// Result of IQR outlier detection.
#[derive(Debug, Clone, PartialEq)]
pub struct OutlierReport {
    /// Rows strictly outside `[lower_bound, upper_bound]`, in input order.
    pub outliers: Vec<YearExtent>,
    pub lower_bound: f64,
    pub upper_bound: f64,
}

impl OutlierReport {
    pub fn within_bounds(&self, value: f64) -> bool {
        value >= self.lower_bound && value <= self.upper_bound
    }
}

/// Trend lines evaluated over the observed years followed by the future years.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub years: Vec<i32>,
    pub linear: Vec<f64>,
    pub polynomial: Vec<f64>,
    pub degree: usize,
}

impl Projection {
    /// Iterate `(year, linear, polynomial)` triples.
    pub fn rows(&self) -> impl Iterator<Item = (i32, f64, f64)> + '_ {
        self.years
            .iter()
            .zip(self.linear.iter().zip(self.polynomial.iter()))
            .map(|(&year, (&lin, &poly))| (year, lin, poly))
    }
}
