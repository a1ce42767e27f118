use serde::Serialize;

/// Surface boundary condition prefix
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub enum Boundary {
    #[default]
    None,
    /// `*` prefix
    Reflecting,
    /// `+` prefix
    White,
}

/// Optional integer between the surface number and mnemonic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SurfaceLink {
    /// Positive: coordinate transform number
    Transform(u32),
    /// Negative: periodic partner surface
    Periodic(u32),
}

/// Broad shape family of a surface
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum SurfaceFamily {
    Plane,
    Sphere,
    Cylinder,
    Cone,
    Quadric,
    Torus,
    PointDefined,
    Macrobody,
}

/// Every accepted surface mnemonic
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum SurfaceKind {
    P,
    Px,
    Py,
    Pz,
    So,
    S,
    Sx,
    Sy,
    Sz,
    /// `c/x`
    OffsetCx,
    /// `c/y`
    OffsetCy,
    /// `c/z`
    OffsetCz,
    Cx,
    Cy,
    Cz,
    /// `k/x`
    OffsetKx,
    /// `k/y`
    OffsetKy,
    /// `k/z`
    OffsetKz,
    Kx,
    Ky,
    Kz,
    Sq,
    Gq,
    Tx,
    Ty,
    Tz,
    X,
    Y,
    Z,
    Box,
    Rpp,
    Sph,
    Rcc,
    Rhp,
    Hex,
    Rec,
    Trc,
    Ell,
    Wed,
    Arb,
}

// (kind, mnemonic, accepted parameter counts, facets)
static SURFACES: [(SurfaceKind, &str, &[usize], u8); 40] = [
    (SurfaceKind::P, "p", &[4, 9], 0),
    (SurfaceKind::Px, "px", &[1], 0),
    (SurfaceKind::Py, "py", &[1], 0),
    (SurfaceKind::Pz, "pz", &[1], 0),
    (SurfaceKind::So, "so", &[1], 0),
    (SurfaceKind::S, "s", &[4], 0),
    (SurfaceKind::Sx, "sx", &[2], 0),
    (SurfaceKind::Sy, "sy", &[2], 0),
    (SurfaceKind::Sz, "sz", &[2], 0),
    (SurfaceKind::OffsetCx, "c/x", &[3], 0),
    (SurfaceKind::OffsetCy, "c/y", &[3], 0),
    (SurfaceKind::OffsetCz, "c/z", &[3], 0),
    (SurfaceKind::Cx, "cx", &[1], 0),
    (SurfaceKind::Cy, "cy", &[1], 0),
    (SurfaceKind::Cz, "cz", &[1], 0),
    (SurfaceKind::OffsetKx, "k/x", &[4, 5], 0),
    (SurfaceKind::OffsetKy, "k/y", &[4, 5], 0),
    (SurfaceKind::OffsetKz, "k/z", &[4, 5], 0),
    (SurfaceKind::Kx, "kx", &[2, 3], 0),
    (SurfaceKind::Ky, "ky", &[2, 3], 0),
    (SurfaceKind::Kz, "kz", &[2, 3], 0),
    (SurfaceKind::Sq, "sq", &[10], 0),
    (SurfaceKind::Gq, "gq", &[10], 0),
    (SurfaceKind::Tx, "tx", &[6], 0),
    (SurfaceKind::Ty, "ty", &[6], 0),
    (SurfaceKind::Tz, "tz", &[6], 0),
    (SurfaceKind::X, "x", &[2, 4, 6], 0),
    (SurfaceKind::Y, "y", &[2, 4, 6], 0),
    (SurfaceKind::Z, "z", &[2, 4, 6], 0),
    (SurfaceKind::Box, "box", &[9, 12], 6),
    (SurfaceKind::Rpp, "rpp", &[6], 6),
    (SurfaceKind::Sph, "sph", &[4], 0),
    (SurfaceKind::Rcc, "rcc", &[7], 3),
    (SurfaceKind::Rhp, "rhp", &[9, 15], 8),
    (SurfaceKind::Hex, "hex", &[9, 15], 8),
    (SurfaceKind::Rec, "rec", &[10, 12], 3),
    (SurfaceKind::Trc, "trc", &[8], 3),
    (SurfaceKind::Ell, "ell", &[7], 0),
    (SurfaceKind::Wed, "wed", &[12], 5),
    (SurfaceKind::Arb, "arb", &[30], 6),
];

impl SurfaceKind {
    fn entry(&self) -> &'static (SurfaceKind, &'static str, &'static [usize], u8) {
        // every variant has exactly one table row
        SURFACES
            .iter()
            .find(|s| s.0 == *self)
            .unwrap_or(&SURFACES[0])
    }

    /// Look up a mnemonic, ignoring case
    pub fn from_mnemonic(s: &str) -> Option<Self> {
        let s = s.to_lowercase();
        SURFACES.iter().find(|e| e.1 == s).map(|e| e.0)
    }

    pub fn mnemonic(&self) -> &'static str {
        self.entry().1
    }

    /// Accepted numbers of parameters
    pub fn arity(&self) -> &'static [usize] {
        self.entry().2
    }

    /// Number of addressable facets, 0 when facets are not allowed
    pub fn facets(&self) -> u8 {
        self.entry().3
    }

    pub fn family(&self) -> SurfaceFamily {
        use SurfaceKind::*;
        match self {
            P | Px | Py | Pz => SurfaceFamily::Plane,
            So | S | Sx | Sy | Sz => SurfaceFamily::Sphere,
            OffsetCx | OffsetCy | OffsetCz | Cx | Cy | Cz => SurfaceFamily::Cylinder,
            OffsetKx | OffsetKy | OffsetKz | Kx | Ky | Kz => SurfaceFamily::Cone,
            Sq | Gq => SurfaceFamily::Quadric,
            Tx | Ty | Tz => SurfaceFamily::Torus,
            X | Y | Z => SurfaceFamily::PointDefined,
            _ => SurfaceFamily::Macrobody,
        }
    }

    pub fn is_macrobody(&self) -> bool {
        self.family() == SurfaceFamily::Macrobody
    }
}

/// Surface card: `[*|+]j [n] mnemonic params`
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SurfaceCard {
    pub id: u32,
    pub boundary: Boundary,
    pub link: Option<SurfaceLink>,
    pub kind: SurfaceKind,
    pub params: Vec<f64>,
}

impl SurfaceCard {
    pub fn transform(&self) -> Option<u32> {
        match self.link {
            Some(SurfaceLink::Transform(n)) => Some(n),
            _ => None,
        }
    }

    pub fn periodic(&self) -> Option<u32> {
        match self.link {
            Some(SurfaceLink::Periodic(n)) => Some(n),
            _ => None,
        }
    }
}
