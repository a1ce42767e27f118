use serde::Serialize;

use crate::rotation;

/// `[*]TRn o1 o2 o3 [xx' yx' ... zz' [m]]`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TransformCard {
    pub id: u32,
    /// `*TR`, rotation entries are angles in degrees
    pub degrees: bool,
    pub displacement: [f64; 3],
    /// Nine rotation entries as written, `None` for a pure translation
    pub rotation: Option<[f64; 9]>,
    /// Displacement convention, 1 or -1
    pub reference: i32,
}

impl TransformCard {
    /// Rotation as direction cosines, converting from degrees if needed
    pub fn cosines(&self) -> Option<[f64; 9]> {
        self.rotation.map(|r| match self.degrees {
            true => rotation::from_degrees(&r),
            false => r,
        })
    }
}
