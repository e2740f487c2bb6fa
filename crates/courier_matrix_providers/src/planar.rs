use crate::{matrix_error::MatrixError, travel_matrices::TravelMatrices};

/// Approximate length of one degree of latitude, in kilometers.
pub const KM_PER_DEGREE: f64 = 111.0;

pub const DEFAULT_SPEED_KMH: f64 = 50.0;

/// Scaled (north, east) offsets in km between two points.
/// Longitude degrees shrink with the cosine of the mean latitude.
fn scaled_offsets(from: geo_types::Point, to: geo_types::Point) -> (f64, f64) {
    let mean_lat = ((from.y() + to.y()) / 2.0).to_radians();
    let lat_diff = (to.y() - from.y()) * KM_PER_DEGREE;
    let lon_diff = (to.x() - from.x()) * KM_PER_DEGREE * mean_lat.cos();
    (lat_diff, lon_diff)
}

pub fn planar_distance<P>(from: P, to: P) -> f64
where
    P: Into<geo_types::Point>,
{
    let (lat_diff, lon_diff) = scaled_offsets(from.into(), to.into());
    (lat_diff * lat_diff + lon_diff * lon_diff).sqrt()
}

pub fn grid_distance<P>(from: P, to: P) -> f64
where
    P: Into<geo_types::Point>,
{
    let (lat_diff, lon_diff) = scaled_offsets(from.into(), to.into());
    lat_diff.abs() + lon_diff.abs()
}

/// Travel time in whole minutes, floored.
pub fn travel_minutes(distance_km: f64, speed_kmh: f64) -> f64 {
    (distance_km / speed_kmh * 60.0).floor()
}

pub fn planar_matrices<P>(points: &[P], speed_kmh: f64) -> Result<TravelMatrices, MatrixError>
where
    for<'a> &'a P: Into<geo_types::Point>,
{
    build_matrices(points, speed_kmh, planar_distance)
}

pub fn grid_matrices<P>(points: &[P], speed_kmh: f64) -> Result<TravelMatrices, MatrixError>
where
    for<'a> &'a P: Into<geo_types::Point>,
{
    build_matrices(points, speed_kmh, grid_distance)
}

fn build_matrices<P, F>(
    points: &[P],
    speed_kmh: f64,
    distance: F,
) -> Result<TravelMatrices, MatrixError>
where
    for<'a> &'a P: Into<geo_types::Point>,
    F: Fn(geo_types::Point, geo_types::Point) -> f64,
{
    let num_points = points.len();
    if num_points < 2 {
        return Err(MatrixError::NotEnoughLocations(num_points));
    }

    if !(speed_kmh.is_finite() && speed_kmh > 0.0) {
        return Err(MatrixError::InvalidSpeed(speed_kmh));
    }

    let points: Vec<geo_types::Point> = points.iter().map(|point| point.into()).collect();
    if let Some(index) = points
        .iter()
        .position(|point| !(point.x().is_finite() && point.y().is_finite()))
    {
        return Err(MatrixError::InvalidCoordinate { index });
    }

    let mut distances: Vec<f64> = vec![0.0; num_points * num_points];
    let mut times: Vec<f64> = vec![0.0; num_points * num_points];

    for (i, &from) in points.iter().enumerate() {
        for (j, &to) in points.iter().enumerate().skip(i + 1) {
            let d = distance(from, to);
            let t = travel_minutes(d, speed_kmh);

            distances[i * num_points + j] = d;
            distances[j * num_points + i] = d;
            times[i * num_points + j] = t;
            times[j * num_points + i] = t;
        }
    }

    Ok(TravelMatrices {
        distances,
        times,
        costs: None,
    })
}
