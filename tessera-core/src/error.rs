//! Error types for the Tessera core library.
//!
//! Defines the error enums exposed by the public API, their stable error
//! codes, and a convenient result alias.

use std::{fmt, sync::Arc};

use thiserror::Error;

use crate::grid::Position;

macro_rules! define_error_codes {
    (
        $(#[$enum_meta:meta])*
        enum $CodeTy:ident for $ErrTy:ident {
            $(
                $(#[$variant_meta:meta])*
                $CodeVariant:ident => $ErrVariant:ident $( { $($pattern:tt)* } )? => $code:expr
            ),+ $(,)?
        }
    ) => {
        $(#[$enum_meta])*
        #[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
        #[non_exhaustive]
        pub enum $CodeTy {
            $(
                $(#[$variant_meta])*
                $CodeVariant,
            )+
        }

        impl $CodeTy {
            /// Return the stable machine-readable representation of this error code.
            #[must_use]
            pub const fn as_str(self) -> &'static str {
                match self {
                    $(Self::$CodeVariant => $code,)+
                }
            }
        }

        impl fmt::Display for $CodeTy {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl $ErrTy {
            #[doc = concat!(
                "Retrieve the stable [`",
                stringify!($CodeTy),
                "`] for this error."
            )]
            #[must_use]
            pub const fn code(&self) -> $CodeTy {
                match self {
                    $(Self::$ErrVariant $( { $($pattern)* } )? => $CodeTy::$CodeVariant,)+
                }
            }
        }
    };
}

/// An error produced by an [`crate::EdgeWeight`] collaborator.
#[non_exhaustive]
#[derive(Clone, Debug, Eq, Error, PartialEq)]
pub enum WeightError {
    /// The collaborator could not produce a dissimilarity for the pair.
    #[error("edge weight unavailable: {reason}")]
    Unavailable {
        /// Explanation supplied by the collaborator.
        reason: Arc<str>,
    },
}

/// An error produced by a [`crate::ColorGenerator`] collaborator.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum PaletteError {
    /// Every distinct color the generator can produce has been issued.
    #[error("palette exhausted after issuing {issued} colors")]
    Exhausted {
        /// Number of colors handed out before exhaustion.
        issued: u64,
    },
}

/// Structural failures raised by [`crate::WeightedForest`] lookups.
#[non_exhaustive]
#[derive(Clone, Copy, Debug, Eq, Error, PartialEq)]
pub enum ForestError {
    /// The pixel id was never registered in the forest.
    #[error("pixel id {index} is not registered in a forest of {node_count} nodes")]
    UnregisteredPixel {
        /// Requested pixel id.
        index: usize,
        /// Number of nodes held by the forest.
        node_count: usize,
    },
    /// Following parent links from the pixel never reached a root.
    #[error("parent chain starting at pixel {pixel} does not terminate at a root")]
    ParentCycle {
        /// Pixel whose lookup revealed the cycle.
        pixel: Position,
    },
}

define_error_codes! {
    /// Stable codes describing [`ForestError`] variants.
    enum ForestErrorCode for ForestError {
        /// The pixel id was never registered in the forest.
        UnregisteredPixel => UnregisteredPixel { .. } => "FOREST_UNREGISTERED_PIXEL",
        /// Following parent links never reached a root.
        ParentCycle => ParentCycle { .. } => "FOREST_PARENT_CYCLE",
    }
}

/// Error type produced when configuring or running [`crate::Segmenter`].
#[non_exhaustive]
#[derive(Clone, Debug, Error, PartialEq)]
pub enum SegmentationError {
    /// The input grid contained no rows or no columns.
    #[error("color grid must contain at least one row and one column")]
    EmptyGrid,
    /// A row's length differed from the first row's.
    #[error("row {row} has {got} columns but row 0 has {expected}")]
    RaggedRows {
        /// Index of the offending row.
        row: usize,
        /// Column count of the first row.
        expected: usize,
        /// Column count of the offending row.
        got: usize,
    },
    /// The grid dimensions overflow the addressable pixel count.
    #[error("a {rows}x{cols} grid exceeds the addressable pixel count")]
    GridTooLarge {
        /// Requested row count.
        rows: usize,
        /// Requested column count.
        cols: usize,
    },
    /// Granularity must be finite and non-negative.
    #[error("granularity must be finite and non-negative (got {got})")]
    InvalidGranularity {
        /// The rejected granularity.
        got: f64,
    },
    /// The edge-weight collaborator produced a negative or non-finite weight.
    #[error("invalid edge weight {weight} between {first} and {second}")]
    InvalidEdgeWeight {
        /// First endpoint of the edge.
        first: Position,
        /// Second endpoint of the edge.
        second: Position,
        /// Rejected weight value.
        weight: f64,
    },
    /// The edge-weight collaborator failed.
    #[error("edge weight between {first} and {second} failed: {error}")]
    EdgeWeight {
        /// First endpoint of the edge.
        first: Position,
        /// Second endpoint of the edge.
        second: Position,
        #[source]
        /// Underlying collaborator error.
        error: WeightError,
    },
    /// The color generator failed.
    #[error("color generator failed after {issued} regions were colored: {error}")]
    Palette {
        /// Number of regions already colored when the generator failed.
        issued: usize,
        #[source]
        /// Underlying collaborator error.
        error: PaletteError,
    },
    /// A forest invariant was violated while segmenting.
    #[error("forest invariant violated: {error}")]
    Forest {
        #[source]
        /// Underlying structural failure.
        error: ForestError,
    },
}

define_error_codes! {
    /// Stable codes describing [`SegmentationError`] variants.
    enum SegmentationErrorCode for SegmentationError {
        /// The input grid contained no rows or no columns.
        EmptyGrid => EmptyGrid => "TESSERA_EMPTY_GRID",
        /// A row's length differed from the first row's.
        RaggedRows => RaggedRows { .. } => "TESSERA_RAGGED_ROWS",
        /// The grid dimensions overflow the addressable pixel count.
        GridTooLarge => GridTooLarge { .. } => "TESSERA_GRID_TOO_LARGE",
        /// Granularity must be finite and non-negative.
        InvalidGranularity => InvalidGranularity { .. } => "TESSERA_INVALID_GRANULARITY",
        /// The edge-weight collaborator produced an invalid weight.
        InvalidEdgeWeight => InvalidEdgeWeight { .. } => "TESSERA_INVALID_EDGE_WEIGHT",
        /// The edge-weight collaborator failed.
        EdgeWeightFailure => EdgeWeight { .. } => "TESSERA_EDGE_WEIGHT_FAILURE",
        /// The color generator failed.
        PaletteFailure => Palette { .. } => "TESSERA_PALETTE_FAILURE",
        /// A forest invariant was violated.
        ForestInvariant => Forest { .. } => "TESSERA_FOREST_INVARIANT",
    }
}

impl SegmentationError {
    /// Retrieve the inner [`ForestErrorCode`] when the error is a forest defect.
    #[must_use]
    pub const fn forest_code(&self) -> Option<ForestErrorCode> {
        match self {
            Self::Forest { error } => Some(error.code()),
            _ => None,
        }
    }
}

impl From<ForestError> for SegmentationError {
    fn from(error: ForestError) -> Self {
        Self::Forest { error }
    }
}

/// Convenient alias for results returned by the core API.
pub type Result<T> = core::result::Result<T, SegmentationError>;
