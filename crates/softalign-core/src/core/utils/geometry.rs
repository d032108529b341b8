use nalgebra::{Point3, Vector3};

pub fn centroid(points: &[Point3<f64>]) -> Option<Point3<f64>> {
    if points.is_empty() {
        return None;
    }
    let sum: Vector3<f64> = points.iter().map(|p| p.coords).sum();
    Some(Point3::from(sum / points.len() as f64))
}

/// Translates `points` so that `origin` maps to the coordinate origin.
pub fn center_on(points: &[Point3<f64>], origin: &Point3<f64>) -> Vec<Point3<f64>> {
    points.iter().map(|p| Point3::from(p - origin)).collect()
}

pub fn gather(points: &[Point3<f64>], indices: &[usize]) -> Vec<Point3<f64>> {
    indices.iter().map(|&i| points[i]).collect()
}

pub fn squared_distances(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Vec<f64> {
    coords1
        .iter()
        .zip(coords2.iter())
        .map(|(p1, p2)| (p1 - p2).norm_squared())
        .collect()
}

pub fn calculate_rmsd(coords1: &[Point3<f64>], coords2: &[Point3<f64>]) -> Option<f64> {
    if coords1.len() != coords2.len() || coords1.is_empty() {
        return None;
    }
    let n = coords1.len() as f64;
    let squared_dist_sum: f64 = squared_distances(coords1, coords2).iter().sum();
    Some((squared_dist_sum / n).sqrt())
}
