//! Tessera core library.
//!
//! Segments a color grid into regions of similar, spatially contiguous pixels
//! using a weighted disjoint-set forest over pixel adjacency edges.
#![cfg_attr(docsrs, feature(doc_cfg))]

mod builder;
mod color;
mod edge;
mod error;
mod forest;
mod grid;
mod palette;
mod result;
mod segmenter;
mod weight;

#[cfg(test)]
mod test_utils;

#[cfg(feature = "random-palette")]
pub use crate::palette::RandomPalette;
pub use crate::{
    builder::{Connectivity, SegmenterBuilder},
    color::{Rgb, RgbEuclidean},
    edge::GridEdge,
    error::{
        ForestError, ForestErrorCode, PaletteError, Result, SegmentationError,
        SegmentationErrorCode, WeightError,
    },
    forest::{ForestNode, UnionOutcome, WeightedForest},
    grid::{ColorGrid, Pixel, PixelId, Position},
    palette::{ColorGenerator, CountingPalette, SequentialPalette},
    result::{RegionId, Segmentation},
    segmenter::Segmenter,
    weight::{ColorDistance, EdgeWeight},
};
