use serde::Serialize;

use crate::error::ParseError;
use crate::format::f;
use crate::parsers::check_expansion;

/// Value of a cell `fill` (or `*fill`) parameter
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Fill {
    /// `*fill`, transform rotations given in degrees
    pub degrees: bool,
    pub spec: FillSpec,
}

impl Fill {
    /// Every universe named by the fill
    pub fn universes(&self) -> Vec<u32> {
        match &self.spec {
            FillSpec::Single { universe, .. } => vec![*universe],
            FillSpec::Array(array) => array.universes.clone(),
        }
    }

    /// Transform card referenced by a single fill, if any
    pub fn transform_id(&self) -> Option<u32> {
        match &self.spec {
            FillSpec::Single {
                transform: Some(FillTransform::Id(id)),
                ..
            } => Some(*id),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FillSpec {
    /// `fill=u` or `fill=u (tr)`
    Single {
        universe: u32,
        transform: Option<FillTransform>,
    },
    /// `fill=i1:i2 j1:j2 k1:k2 u u u ...` on a lattice cell
    Array(FillArray),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub enum FillTransform {
    Id(u32),
    Inline(Vec<f64>),
}

/// Lattice fill array, entries ordered with `i` varying fastest
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct FillArray {
    /// Inclusive index ranges for i, j, k
    pub ranges: [(i64, i64); 3],
    pub universes: Vec<u32>,
}

impl FillArray {
    /// Number of indices along each axis, `None` when a range is too wide
    /// to count
    pub fn checked_extents(&self) -> Option<[usize; 3]> {
        let mut extents = [0; 3];
        for (n, (lo, hi)) in extents.iter_mut().zip(self.ranges) {
            if hi >= lo {
                *n = usize::try_from(hi.checked_sub(lo)?.checked_add(1)?).ok()?;
            }
        }
        Some(extents)
    }

    /// Entries the declaration calls for, `None` on overflow
    pub fn checked_required(&self) -> Option<usize> {
        self.checked_extents()?
            .iter()
            .try_fold(1usize, |total, n| total.checked_mul(*n))
    }

    /// Number of indices along each axis, saturating at `usize::MAX`
    pub fn extents(&self) -> [usize; 3] {
        self.checked_extents().unwrap_or([usize::MAX; 3])
    }

    /// Number of entries the declaration calls for, saturating at
    /// `usize::MAX`
    pub fn required(&self) -> usize {
        self.checked_required().unwrap_or(usize::MAX)
    }

    /// Number of entries actually given
    pub fn provided(&self) -> usize {
        self.universes.len()
    }

    /// Require exactly the declared number of entries
    ///
    /// ```rust
    /// # use idate_deck::{FillArray, ParseError};
    /// let array = FillArray { ranges: [(-1, 1), (-1, 1), (0, 0)], universes: vec![1; 8] };
    /// assert_eq!(
    ///     array.check(),
    ///     Err(ParseError::FillArrayLengthMismatch { required: 9, provided: 8 })
    /// );
    /// ```
    pub fn check(&self) -> Result<(), ParseError> {
        match self.required() == self.provided() {
            true => Ok(()),
            false => Err(ParseError::FillArrayLengthMismatch {
                required: self.required(),
                provided: self.provided(),
            }),
        }
    }

    /// Entries given minus entries required
    pub fn delta(&self) -> i64 {
        let provided = i64::try_from(self.provided()).unwrap_or(i64::MAX);
        let required = i64::try_from(self.required()).unwrap_or(i64::MAX);
        provided.saturating_sub(required)
    }

    /// Index declaration as written, e.g. `-1:1 -1:1 0:0`
    pub fn declaration(&self) -> String {
        self.ranges
            .iter()
            .map(|(lo, hi)| f!("{lo}:{hi}"))
            .collect::<Vec<_>>()
            .join(" ")
    }

    /// Universe at lattice index (i, j, k)
    pub fn get(&self, i: i64, j: i64, k: i64) -> Option<u32> {
        let [ni, nj, nk] = self.checked_extents()?;
        let mut offsets = [0usize; 3];
        for ((offset, (index, (lo, _))), n) in offsets
            .iter_mut()
            .zip([i, j, k].into_iter().zip(self.ranges))
            .zip([ni, nj, nk])
        {
            let d = usize::try_from(index.checked_sub(lo)?).ok()?;
            if d >= n {
                return None;
            }
            *offset = d;
        }
        let [di, dj, dk] = offsets;
        let index = (dk * nj + dj) * ni + di;
        self.universes.get(index).copied()
    }
}

/// Expand `nR` repeat shorthand in a list of integers
///
/// `U nR` stands for `n` further copies of `U`, so `7 2R` gives `7 7 7`. A
/// bare `R` repeats once. Expansion stops with an error past
/// [MAX_EXPANDED_VALUES](crate::MAX_EXPANDED_VALUES) entries.
///
/// ```rust
/// # use idate_deck::expand_run_length;
/// assert_eq!(expand_run_length(&["1", "2r", "3"]).unwrap(), vec![1, 1, 1, 3]);
/// assert!(expand_run_length(&["2r", "3"]).is_err());
/// assert!(expand_run_length(&["1", "4000000000r"]).is_err());
/// ```
pub fn expand_run_length<S: AsRef<str>>(tokens: &[S]) -> Result<Vec<u32>, ParseError> {
    let mut values: Vec<u32> = Vec::with_capacity(tokens.len());

    for token in tokens {
        let token = token.as_ref();
        if let Some(n) = crate::parsers::repeat_count(token, 'r') {
            let last = *values
                .last()
                .ok_or_else(|| ParseError::RunLengthWithoutPredecessor(token.to_string()))?;
            check_expansion(token, values.len(), n)?;
            values.extend(std::iter::repeat(last).take(n));
        } else {
            let v = token
                .parse::<u32>()
                .map_err(|_| ParseError::bad("fill", f!("\"{token}\" is not a universe number")))?;
            values.push(v);
        }
    }

    Ok(values)
}
