//! Diagnostics shared by every stage of the engine
//!
//! Each problem found in a deck is described by a [Diagnostic] carrying a
//! [Severity], the [Pass] that found it, a stable [Code], and the lines of the
//! deck it relates to.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Inclusive range of 1-based physical line numbers
#[derive(
    Debug, Default, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
pub struct Span {
    /// First physical line
    pub first: usize,
    /// Last physical line
    pub last: usize,
}

impl Span {
    /// Span over `first..=last`
    pub fn new(first: usize, last: usize) -> Self {
        Self {
            first: first.min(last),
            last: first.max(last),
        }
    }

    /// Span of a single line
    pub fn line(n: usize) -> Self {
        Self { first: n, last: n }
    }

    /// Smallest span covering both
    pub fn merge(self, other: Span) -> Self {
        Self {
            first: self.first.min(other.first),
            last: self.last.max(other.last),
        }
    }

    /// Number of physical lines covered
    pub fn len(&self) -> usize {
        self.last + 1 - self.first
    }

    /// Always false, a span covers at least one line
    pub fn is_empty(&self) -> bool {
        false
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        if self.first == self.last {
            write!(f, "{}", self.first)
        } else {
            write!(f, "{}-{}", self.first, self.last)
        }
    }
}

/// Location of a diagnostic, including the file when known
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SourceSpan {
    pub file: Option<String>,
    pub first_line: usize,
    pub last_line: usize,
}

/// How serious a diagnostic is
///
/// Ordering follows seriousness, so `Severity::Fatal` is the maximum.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Recommendation,
    Info,
    Warning,
    Error,
    Fatal,
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        let s = match self {
            Self::Recommendation => "recommendation",
            Self::Info => "info",
            Self::Warning => "warning",
            Self::Error => "error",
            Self::Fatal => "fatal",
        };
        write!(f, "{s}")
    }
}

/// The stage that produced a diagnostic
///
/// Variants are declared in execution order. Reports list the passes in this
/// order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Pass {
    Lexical,
    Parse,
    Symbols,
    CrossReference,
    Unused,
    UniverseCycle,
    Lattice,
    Transform,
    Materials,
    ThermalScattering,
    Library,
    Physics,
    EnergyCutoff,
    Tally,
    Importance,
    Editor,
}

impl fmt::Display for Pass {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// Stable identifier for every kind of diagnostic
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Code {
    // lexical structure
    MissingBlockSeparator,
    ExtraBlockSeparator,
    EmptyBlock,
    EmptyTitle,
    TabCharacter,
    LineTooLong,
    IllegalContinuation,

    // card parsing
    MalformedCard,
    UnknownMnemonic,
    BadParameter,
    WrongArity,
    RunLengthWithoutPredecessor,
    FillArrayLengthMismatch,

    // symbols and references
    DuplicateId,
    UndefinedReference,
    UnusedEntity,
    NoMaterials,

    // universes and lattices
    UniverseCycle,
    NestingDepth,
    InvalidLatticeType,
    LatticeWithMaterial,
    LatticeWithoutFill,
    LatticeWithoutUniverse,
    LatticeSurfaceCount,

    // transforms
    NonOrthonormalTransform,

    // materials and data libraries
    ZeroFraction,
    MixedFractionTypes,
    UnclassifiedMaterial,
    MissingThermalScattering,
    SuggestedThermalScattering,
    UnmatchedThermalScattering,
    ThermalTemperatureMismatch,
    MixedLibraries,

    // physics and energy
    DisabledPhotonProduction,
    DisabledElectronProduction,
    PhotonuclearDisabled,
    UntransportedParticle,
    SourceAboveEmax,
    SourceNearEmax,
    SourceBelowCutoff,
    CutoffAboveEmax,
    ProblemClassTemplate,

    // tallies
    MissingParticleDesignator,
    DxtranDetectorMismatch,
    OrphanTallyOption,
    InvalidTallyType,
    InvalidMeshTallyNumber,
    RedundantTally,
    TallyParticleNotTransported,

    // importances
    MissingImportance,
    ImportanceCountMismatch,
    ConflictingImportance,
    ImportanceRatio,

    // editor
    ReferenceBroken,
    OrthonormalisedInput,
}

impl fmt::Display for Code {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{self:?}")
    }
}

/// A single finding about a deck
///
/// Built with [Diagnostic::new] and the chained `at`, `in_file`, `with_hint`,
/// and `with_data` helpers.
///
/// ```rust
/// # use idate_deck::{Code, Diagnostic, Pass, Severity, Span};
/// let d = Diagnostic::new(
///     Severity::Error,
///     Pass::CrossReference,
///     Code::UndefinedReference,
///     "cell 1 references undefined surface 2",
/// )
/// .at(Span::line(3));
///
/// assert_eq!(
///     d.to_string(),
///     "error[UndefinedReference] line 3: cell 1 references undefined surface 2"
/// );
/// ```
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub pass: Pass,
    pub code: Code,
    pub message: String,
    /// Deck file the lines belong to, when read from disk
    #[serde(skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fix_hint: Option<String>,
    /// Structured details, such as computed values or suggestions
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<serde_json::Value>,
}

impl Diagnostic {
    pub fn new(severity: Severity, pass: Pass, code: Code, message: impl Into<String>) -> Self {
        Self {
            severity,
            pass,
            code,
            message: message.into(),
            file: None,
            span: None,
            fix_hint: None,
            data: None,
        }
    }

    /// Attach the lines this diagnostic refers to
    pub fn at(mut self, span: Span) -> Self {
        self.span = Some(span);
        self
    }

    /// Attach an optional span
    pub fn at_opt(mut self, span: Option<Span>) -> Self {
        self.span = span;
        self
    }

    /// Attach the name of the deck file
    pub fn in_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }

    /// Attach a suggested fix
    pub fn with_hint(mut self, hint: impl Into<String>) -> Self {
        self.fix_hint = Some(hint.into());
        self
    }

    /// Attach structured details
    pub fn with_data(mut self, data: serde_json::Value) -> Self {
        self.data = Some(data);
        self
    }

    /// Full location, combining file and lines
    pub fn source_span(&self) -> Option<SourceSpan> {
        self.span.map(|s| SourceSpan {
            file: self.file.clone(),
            first_line: s.first,
            last_line: s.last,
        })
    }

    /// Sort key within a pass: ascending line, unlocated first, then most
    /// severe first
    pub fn ordering_key(&self) -> (Option<usize>, std::cmp::Reverse<Severity>) {
        (self.span.map(|s| s.first), std::cmp::Reverse(self.severity))
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "{}[{}]", self.severity, self.code)?;
        match (&self.file, &self.span) {
            (Some(file), Some(span)) => write!(f, " {file}:{span}")?,
            (Some(file), None) => write!(f, " {file}")?,
            (None, Some(span)) => write!(f, " line {span}")?,
            (None, None) => (),
        }
        write!(f, ": {}", self.message)?;
        if let Some(hint) = &self.fix_hint {
            write!(f, "\n    hint: {hint}")?;
        }
        Ok(())
    }
}

/// Stable sort of one pass worth of diagnostics into report order
pub fn sort_diagnostics(diagnostics: &mut [Diagnostic]) {
    diagnostics.sort_by_key(|d| d.ordering_key());
}
