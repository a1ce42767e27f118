use std::collections::BTreeSet;
use std::fmt;

use serde::Serialize;

use crate::format::f;

/// Side of a surface a region lies on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize)]
pub enum Sense {
    Negative,
    Positive,
}

impl Sense {
    pub fn opposite(&self) -> Self {
        match self {
            Self::Negative => Self::Positive,
            Self::Positive => Self::Negative,
        }
    }
}

/// Signed surface in a cell geometry, optionally naming a macrobody facet
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub struct SurfaceRef {
    pub id: u32,
    pub facet: Option<u8>,
    pub sense: Sense,
}

impl fmt::Display for SurfaceRef {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.sense == Sense::Negative {
            write!(f, "-")?;
        }
        write!(f, "{}", self.id)?;
        if let Some(facet) = self.facet {
            write!(f, ".{facet}")?;
        }
        Ok(())
    }
}

/// Boolean region expression of a cell
///
/// Juxtaposition is intersection, `:` is union, and `#` is complement.
/// Intersection binds tighter than union.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum Geometry {
    Surface(SurfaceRef),
    /// `#n`, everything outside cell `n`
    CellComplement(u32),
    /// `#( ... )`
    Complement(Box<Geometry>),
    Intersection(Vec<Geometry>),
    Union(Vec<Geometry>),
}

impl Geometry {
    /// Depth-first visit of every node
    pub fn visit<F: FnMut(&Geometry)>(&self, f: &mut F) {
        f(self);
        match self {
            Self::Complement(inner) => inner.visit(f),
            Self::Intersection(items) | Self::Union(items) => {
                items.iter().for_each(|g| g.visit(f))
            }
            Self::Surface(_) | Self::CellComplement(_) => (),
        }
    }

    /// Every signed surface in order of appearance
    pub fn surface_refs(&self) -> Vec<SurfaceRef> {
        let mut refs = Vec::new();
        self.visit(&mut |g| {
            if let Self::Surface(s) = g {
                refs.push(*s);
            }
        });
        refs
    }

    /// Set of referenced surface numbers
    pub fn surfaces(&self) -> BTreeSet<u32> {
        self.surface_refs().into_iter().map(|s| s.id).collect()
    }

    /// Cells named by `#n` complements
    pub fn cell_complements(&self) -> BTreeSet<u32> {
        let mut cells = BTreeSet::new();
        self.visit(&mut |g| {
            if let Self::CellComplement(n) = g {
                cells.insert(*n);
            }
        });
        cells
    }
}

impl fmt::Display for Geometry {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            Self::Surface(s) => write!(f, "{s}"),
            Self::CellComplement(n) => write!(f, "#{n}"),
            Self::Complement(inner) => write!(f, "#({inner})"),
            Self::Intersection(items) => {
                let parts: Vec<String> = items
                    .iter()
                    .map(|g| match g {
                        Self::Union(_) => f!("({g})"),
                        _ => g.to_string(),
                    })
                    .collect();
                write!(f, "{}", parts.join(" "))
            }
            Self::Union(items) => {
                let parts: Vec<String> = items.iter().map(|g| g.to_string()).collect();
                write!(f, "{}", parts.join(" : "))
            }
        }
    }
}
