//! Rotation matrix checks for coordinate transforms
//!
//! Transforms hold nine direction cosines in row order. A usable rotation
//! must be orthonormal with a determinant of +1, checked to a tolerance.

use nalgebra::{Matrix3, Vector3};
use serde::Serialize;

/// Measured properties of a 3x3 rotation candidate
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RotationCheck {
    /// Euclidean norm of each row
    pub row_norms: [f64; 3],
    /// Row dot products in the order (0,1), (0,2), (1,2)
    pub dots: [f64; 3],
    pub determinant: f64,
    /// Largest element of |R Rᵀ - I|
    pub max_deviation: f64,
}

impl RotationCheck {
    /// Measure the nine cosines given in row order
    pub fn of(cosines: &[f64; 9]) -> Self {
        let m = Matrix3::from_row_slice(cosines);
        let gram = m * m.transpose();
        let deviation = gram - Matrix3::identity();

        Self {
            row_norms: [0, 1, 2].map(|i| m.row(i).norm()),
            dots: [(0, 1), (0, 2), (1, 2)].map(|(i, j)| m.row(i).dot(&m.row(j))),
            determinant: m.determinant(),
            max_deviation: deviation.abs().max(),
        }
    }

    /// True for a proper rotation within `tolerance`
    pub fn is_valid(&self, tolerance: f64) -> bool {
        self.max_deviation <= tolerance && (self.determinant - 1.0).abs() <= tolerance
    }
}

/// Convert cosines given as angles in degrees
pub fn from_degrees(angles: &[f64; 9]) -> [f64; 9] {
    angles.map(|a| a.to_radians().cos())
}

/// Convert cosines to angles in degrees
pub fn to_degrees(cosines: &[f64; 9]) -> [f64; 9] {
    cosines.map(|c| c.clamp(-1.0, 1.0).acos().to_degrees())
}

/// Complete a rotation given by its first two rows
///
/// The third row is the cross product of the first two, giving a
/// right-handed set.
pub fn complete_rows(rows: &[f64; 6]) -> [f64; 9] {
    let a = Vector3::new(rows[0], rows[1], rows[2]);
    let b = Vector3::new(rows[3], rows[4], rows[5]);
    let c = a.cross(&b);
    [rows[0], rows[1], rows[2], rows[3], rows[4], rows[5], c.x, c.y, c.z]
}

/// Result of forcing a matrix to be a proper rotation
#[derive(Debug, Clone, PartialEq)]
pub struct Orthonormalised {
    pub cosines: [f64; 9],
    /// Any element moved by more than 1e-12
    pub changed: bool,
    /// The third row was negated to fix a left-handed input
    pub reflected: bool,
}

/// Gram-Schmidt orthonormalisation of the rows
///
/// Returns `None` when the rows are degenerate (zero length or linearly
/// dependent), as no rotation can be recovered.
///
/// ```rust
/// # use idate_deck::rotation::orthonormalise;
/// let fixed = orthonormalise(&[2.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0]).unwrap();
/// assert_eq!(fixed.cosines[0], 1.0);
/// assert!(fixed.changed);
/// ```
pub fn orthonormalise(cosines: &[f64; 9]) -> Option<Orthonormalised> {
    let rows = [0, 1, 2].map(|i| Vector3::new(cosines[3 * i], cosines[3 * i + 1], cosines[3 * i + 2]));

    let e0 = unit(rows[0])?;
    let e1 = unit(rows[1] - e0 * rows[1].dot(&e0))?;
    let mut e2 = unit(rows[2] - e0 * rows[2].dot(&e0) - e1 * rows[2].dot(&e1))?;

    let reflected = e0.cross(&e1).dot(&e2) < 0.0;
    if reflected {
        e2 = -e2;
    }

    let fixed = [e0.x, e0.y, e0.z, e1.x, e1.y, e1.z, e2.x, e2.y, e2.z];
    let changed = fixed
        .iter()
        .zip(cosines.iter())
        .any(|(a, b)| (a - b).abs() > 1e-12);

    Some(Orthonormalised {
        cosines: fixed,
        changed,
        reflected,
    })
}

fn unit(v: Vector3<f64>) -> Option<Vector3<f64>> {
    let n = v.norm();
    (n > 1e-10).then(|| v / n)
}

#[cfg(test)]
mod rotation_tests {
    use super::*;

    const IDENTITY: [f64; 9] = [1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

    #[test]
    fn identity_is_valid() {
        let check = RotationCheck::of(&IDENTITY);
        assert!(check.is_valid(1e-6));
        assert_eq!(check.row_norms, [1.0, 1.0, 1.0]);
        assert_eq!(check.dots, [0.0, 0.0, 0.0]);
    }

    #[test]
    fn stretched_row_is_invalid() {
        let check = RotationCheck::of(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, 1.1]);
        assert!(!check.is_valid(1e-6));
        assert!((check.row_norms[2] - 1.1).abs() < 1e-12);
        assert!((check.determinant - 1.1).abs() < 1e-12);
    }

    #[test]
    fn reflection_is_invalid() {
        let check = RotationCheck::of(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, -1.0]);
        assert!(check.max_deviation < 1e-12);
        assert!(!check.is_valid(1e-6));
    }

    #[test]
    fn degrees_round_trip() {
        let angles = [0.0, 90.0, 90.0, 90.0, 0.0, 90.0, 90.0, 90.0, 0.0];
        let cosines = from_degrees(&angles);
        assert!(RotationCheck::of(&cosines).is_valid(1e-9));
        let back = to_degrees(&cosines);
        for (a, b) in angles.iter().zip(back.iter()) {
            assert!((a - b).abs() < 1e-9);
        }
    }

    #[test]
    fn orthonormalise_fixes_left_handed() {
        let fixed = orthonormalise(&[1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 0.0, 0.0, -1.0]).unwrap();
        assert!(fixed.reflected);
        assert!(RotationCheck::of(&fixed.cosines).is_valid(1e-12));
    }

    #[test]
    fn orthonormalise_rejects_degenerate() {
        assert!(orthonormalise(&[1.0, 0.0, 0.0, 2.0, 0.0, 0.0, 0.0, 0.0, 1.0]).is_none());
    }

    #[test]
    fn third_row_from_cross_product() {
        let full = complete_rows(&[0.0, 1.0, 0.0, -1.0, 0.0, 0.0]);
        assert_eq!(&full[6..], &[0.0, 0.0, 1.0]);
        assert!(RotationCheck::of(&full).is_valid(1e-12));
    }

    #[test]
    fn orthonormalise_leaves_identity() {
        let fixed = orthonormalise(&IDENTITY).unwrap();
        assert!(!fixed.changed);
        assert!(!fixed.reflected);
    }
}
