//! Polygon area in the shapefile's coordinate reference system.
//!
//! Projected shapefiles are measured as they are. Geographic shapefiles are
//! first reprojected to NAD83 / Canada Atlas Lambert (EPSG:3978) and then
//! measured in the plane, in square meters.

use geo::{Area, LineString, Polygon};
use proj4rs::proj::Proj;
use proj4rs::transform::transform;
use shapefile::{PolygonRing, Shape};

use super::ShapeError;

/// Longitude/latitude on WGS84, as found in geographic chart `.prj` files.
const GEOGRAPHIC_DEFS: &str = "+proj=longlat +datum=WGS84 +no_defs";

/// EPSG:3978, NAD83 / Canada Atlas Lambert.
pub const ATLAS_LAMBERT_DEFS: &str = "+proj=lcc +lat_0=49 +lon_0=-95 +lat_1=49 +lat_2=77 \
     +x_0=0 +y_0=0 +ellps=GRS80 +towgs84=0,0,0,0,0,0,0 +units=m +no_defs";

/// How coordinates of a shapefile are interpreted.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Crs {
    /// Longitude/latitude in degrees; reprojected to EPSG:3978 before measuring.
    Geographic,
    /// Planar coordinates; areas are in squared CRS units.
    Projected,
}

impl Crs {
    pub fn is_geographic(&self) -> bool {
        matches!(self, Self::Geographic)
    }
}

/// Classify a `.prj` WKT string by its root keyword.
pub fn detect_crs(wkt: &str) -> Result<Crs, ShapeError> {
    let root = wkt
        .trim_start()
        .split(['[', '('])
        .next()
        .unwrap_or_default()
        .trim()
        .to_ascii_uppercase();

    match root.as_str() {
        "GEOGCS" | "GEOGCRS" | "GEODCRS" => Ok(Crs::Geographic),
        "PROJCS" | "PROJCRS" => Ok(Crs::Projected),
        _ => Err(ShapeError::UnknownCrs(root)),
    }
}

/// Longitude/latitude to EPSG:3978 transformation.
pub struct AtlasProjection {
    source: Proj,
    target: Proj,
}

impl AtlasProjection {
    pub fn new() -> Result<Self, ShapeError> {
        let source = Proj::from_proj_string(GEOGRAPHIC_DEFS)
            .map_err(|e| ShapeError::Projection(e.to_string()))?;
        let target = Proj::from_proj_string(ATLAS_LAMBERT_DEFS)
            .map_err(|e| ShapeError::Projection(e.to_string()))?;
        Ok(Self { source, target })
    }

    /// Project one `(longitude, latitude)` pair in degrees to meters.
    pub fn project(&self, (lon, lat): (f64, f64)) -> Result<(f64, f64), ShapeError> {
        let mut point = (lon.to_radians(), lat.to_radians(), 0.0);
        transform(&self.source, &self.target, &mut point)
            .map_err(|e| ShapeError::Projection(e.to_string()))?;
        Ok((point.0, point.1))
    }

    fn project_ring(&self, coords: Vec<(f64, f64)>) -> Result<Vec<(f64, f64)>, ShapeError> {
        coords.into_iter().map(|xy| self.project(xy)).collect()
    }
}

/// Area of one shape. Non-polygon shapes have no area.
///
/// `projection` is required for geographic coordinates and `None` for
/// projected ones.
pub fn shape_area(shape: &Shape, projection: Option<&AtlasProjection>) -> Result<f64, ShapeError> {
    let rings: Vec<(bool, Vec<(f64, f64)>)> = match shape {
        Shape::Polygon(p) => p.rings().iter().map(|r| ring_xy(r, |pt| (pt.x, pt.y))).collect(),
        Shape::PolygonM(p) => p.rings().iter().map(|r| ring_xy(r, |pt| (pt.x, pt.y))).collect(),
        Shape::PolygonZ(p) => p.rings().iter().map(|r| ring_xy(r, |pt| (pt.x, pt.y))).collect(),
        _ => return Ok(0.0),
    };

    let rings = match projection {
        Some(projection) => rings
            .into_iter()
            .map(|(outer, coords)| Ok((outer, projection.project_ring(coords)?)))
            .collect::<Result<Vec<_>, ShapeError>>()?,
        None => rings,
    };

    Ok(rings_area(rings))
}

fn ring_xy<P, F>(ring: &PolygonRing<P>, xy: F) -> (bool, Vec<(f64, f64)>)
where
    F: Fn(&P) -> (f64, f64),
{
    let outer = matches!(ring, PolygonRing::Outer(_));
    (outer, ring.points().iter().map(xy).collect())
}

/// Outer rings add, holes subtract.
fn rings_area<I>(rings: I) -> f64
where
    I: IntoIterator<Item = (bool, Vec<(f64, f64)>)>,
{
    rings
        .into_iter()
        .map(|(outer, coords)| {
            let area = ring_area(coords);
            if outer { area } else { -area }
        })
        .sum()
}

/// Planar area of a closed ring, independent of its winding.
fn ring_area(coords: Vec<(f64, f64)>) -> f64 {
    if coords.len() < 3 {
        return 0.0;
    }
    Polygon::new(LineString::from(coords), vec![]).unsigned_area()
}
