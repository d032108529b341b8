use crate::core::transform::RigidTransform;
use nalgebra::Point3;
use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

/// Everything needed to reproduce the superposition outside this crate.
///
/// The rotation and translation act on mobile coordinates that have already
/// been shifted to the mobile alpha-carbon centroid; the result lives in the
/// reference frame centered at the reference centroid. The full mapping is
/// `x_ref = R * (x - c_mobile) + t + c_reference`.
#[derive(Debug, Clone, Copy)]
pub struct TransformationReport<'a> {
    pub mobile_name: &'a str,
    pub reference_name: &'a str,
    pub transform: &'a RigidTransform,
    pub mobile_centroid: &'a Point3<f64>,
    pub reference_centroid: &'a Point3<f64>,
}

impl TransformationReport<'_> {
    pub fn write_to(&self, writer: &mut impl Write) -> io::Result<()> {
        let t = &self.transform.translation;
        let r = &self.transform.rotation;
        let (cm, cr) = (self.mobile_centroid, self.reference_centroid);

        writeln!(
            writer,
            "# Transformation matrix for {} -> {}",
            self.mobile_name, self.reference_name
        )?;
        writeln!(
            writer,
            "# This matrix should be applied to the CENTERED coordinates of the mobile protein."
        )?;
        writeln!(
            writer,
            "# Mobile centroid:    {:.8}, {:.8}, {:.8}",
            cm.x, cm.y, cm.z
        )?;
        writeln!(
            writer,
            "# Reference centroid: {:.8}, {:.8}, {:.8}",
            cr.x, cr.y, cr.z
        )?;
        writeln!(
            writer,
            "# x_ref = u * (x_mobile - mobile_centroid) + t + reference_centroid"
        )?;
        writeln!(
            writer,
            "t[0] = {:.8}, t[1] = {:.8}, t[2] = {:.8}",
            t[0], t[1], t[2]
        )?;
        for i in 0..3 {
            writeln!(
                writer,
                "u[{i}][0] = {:.8}, u[{i}][1] = {:.8}, u[{i}][2] = {:.8}",
                r[(i, 0)],
                r[(i, 1)],
                r[(i, 2)]
            )?;
        }
        Ok(())
    }

    pub fn write_to_path<P: AsRef<Path>>(&self, path: P) -> io::Result<()> {
        let mut writer = BufWriter::new(File::create(path)?);
        self.write_to(&mut writer)?;
        writer.flush()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use nalgebra::{Matrix3, Vector3};

    fn render(transform: &RigidTransform) -> String {
        let report = TransformationReport {
            mobile_name: "mobile.pdb",
            reference_name: "ref.pdb",
            transform,
            mobile_centroid: &Point3::new(1.0, 2.0, 3.0),
            reference_centroid: &Point3::new(-1.0, 0.5, 0.0),
        };
        let mut out = Vec::new();
        report.write_to(&mut out).unwrap();
        String::from_utf8(out).unwrap()
    }

    #[test]
    fn report_states_centering_convention_and_names() {
        let text = render(&RigidTransform::identity());
        assert!(text.starts_with("# Transformation matrix for mobile.pdb -> ref.pdb\n"));
        assert!(text.contains("CENTERED coordinates of the mobile protein"));
        assert!(text.contains("# Mobile centroid:    1.00000000, 2.00000000, 3.00000000"));
        assert!(text.contains("# Reference centroid: -1.00000000, 0.50000000, 0.00000000"));
    }

    #[test]
    fn report_lists_translation_then_rotation_rows() {
        let transform = RigidTransform {
            rotation: Matrix3::new(0.0, -1.0, 0.0, 1.0, 0.0, 0.0, 0.0, 0.0, 1.0),
            translation: Vector3::new(1.5, -2.25, 0.125),
        };
        let text = render(&transform);
        let data: Vec<&str> = text.lines().filter(|l| !l.starts_with('#')).collect();
        assert_eq!(
            data,
            vec![
                "t[0] = 1.50000000, t[1] = -2.25000000, t[2] = 0.12500000",
                "u[0][0] = 0.00000000, u[0][1] = -1.00000000, u[0][2] = 0.00000000",
                "u[1][0] = 1.00000000, u[1][1] = 0.00000000, u[1][2] = 0.00000000",
                "u[2][0] = 0.00000000, u[2][1] = 0.00000000, u[2][2] = 1.00000000",
            ]
        );
    }

    #[test]
    fn write_to_path_creates_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("matrix.txt");
        let transform = RigidTransform::identity();
        let report = TransformationReport {
            mobile_name: "a",
            reference_name: "b",
            transform: &transform,
            mobile_centroid: &Point3::origin(),
            reference_centroid: &Point3::origin(),
        };
        report.write_to_path(&path).unwrap();
        let content = std::fs::read_to_string(&path).unwrap();
        assert_eq!(content.lines().count(), 9);
    }
}
