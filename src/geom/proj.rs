use proj4rs::{proj::Proj as Proj4, transform::transform};

use crate::error::{Error, Result};

/// A resolved coordinate reference system.
struct Crs {
    proj: Proj4,
    geographic: bool,
}

impl Crs {
    /// Resolve an `EPSG:xxxx` code or a raw `+proj=` string.
    fn resolve(crs: &str) -> Result<Self> {
        let invalid = || Error::InvalidProjection { crs: crs.to_string() };
        let trimmed = crs.trim();

        let proj_string = if trimmed.starts_with("+proj=") {
            trimmed.to_string()
        } else {
            let code = trimmed
                .strip_prefix("EPSG:")
                .or_else(|| trimmed.strip_prefix("epsg:"))
                .and_then(|code| code.parse::<u32>().ok())
                .ok_or_else(invalid)?;
            epsg_proj4(code).ok_or_else(invalid)?
        };

        let geographic = ["+proj=longlat", "+proj=latlong", "+proj=lonlat", "+proj=latlon"]
            .iter()
            .any(|p| proj_string.contains(p));

        let proj = Proj4::from_proj_string(&proj_string).map_err(|_| invalid())?;
        Ok(Self { proj, geographic })
    }
}

/// PROJ.4 definitions for the EPSG codes this crate knows about.
fn epsg_proj4(code: u32) -> Option<String> {
    match code {
        4326 => Some("+proj=longlat +datum=WGS84 +no_defs +type=crs".into()),
        4269 => Some("+proj=longlat +datum=NAD83 +no_defs +type=crs".into()),
        3857 | 900913 => Some(
            "+proj=merc +a=6378137 +b=6378137 +lat_ts=0 +lon_0=0 +x_0=0 +y_0=0 +k=1 \
             +units=m +nadgrids=@null +no_defs +type=crs"
                .into(),
        ),
        32601..=32660 => Some(format!(
            "+proj=utm +zone={} +datum=WGS84 +units=m +no_defs +type=crs",
            code - 32600
        )),
        32701..=32760 => Some(format!(
            "+proj=utm +zone={} +south +datum=WGS84 +units=m +no_defs +type=crs",
            code - 32700
        )),
        _ => None,
    }
}

/// Converts coordinates between two reference systems.
///
/// Geographic systems take and return degrees; projected systems use their
/// native units (meters for every EPSG code resolved here).
pub struct CoordinateProjector {
    from: Crs,
    to: Crs,
}

impl std::fmt::Debug for CoordinateProjector {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoordinateProjector")
            .field("from_geographic", &self.from.geographic)
            .field("to_geographic", &self.to.geographic)
            .finish()
    }
}

impl CoordinateProjector {
    /// Build a projector, failing with `InvalidProjection` for unknown identifiers.
    pub fn new(from_crs: &str, to_crs: &str) -> Result<Self> {
        Ok(Self { from: Crs::resolve(from_crs)?, to: Crs::resolve(to_crs)? })
    }

    /// Project one coordinate pair.
    pub fn project(&self, x: f64, y: f64) -> Result<(f64, f64)> {
        let mut point = if self.from.geographic {
            (x.to_radians(), y.to_radians(), 0.0)
        } else {
            (x, y, 0.0)
        };

        transform(&self.from.proj, &self.to.proj, &mut point)
            .map_err(|e| Error::InvalidProjection { crs: format!("transform of ({x}, {y}) failed: {e:?}") })?;

        Ok(if self.to.geographic {
            (point.0.to_degrees(), point.1.to_degrees())
        } else {
            (point.0, point.1)
        })
    }
}

/// One-shot projection of `(x, y)` from `from_crs` to `to_crs`.
pub fn project(x: f64, y: f64, from_crs: &str, to_crs: &str) -> Result<(f64, f64)> {
    CoordinateProjector::new(from_crs, to_crs)?.project(x, y)
}
