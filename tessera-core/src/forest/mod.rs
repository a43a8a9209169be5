//! Weighted disjoint-set forest over the pixels of a grid.
//!
//! Each pixel owns one [`ForestNode`] in an arena indexed by [`PixelId`].
//! Parent links are arena indices, so the forest never holds references into
//! itself. Only roots carry authoritative `size`, `internal_distance` and
//! `color` values; those fields on non-root nodes are stale.
//!
//! Unions attach the smaller component beneath the larger, which keeps trees
//! logarithmically shallow. [`WeightedForest::find`] additionally compresses
//! the path it walks, which changes no root and no root's bookkeeping.

use tracing::trace;

use crate::{
    Result,
    builder::Connectivity,
    edge::{GridEdge, build_edges},
    error::{ForestError, SegmentationError},
    grid::{ColorGrid, PixelId, Position, checked_area},
    palette::ColorGenerator,
    weight::EdgeWeight,
};

/// Bookkeeping for one pixel.
#[derive(Clone, Debug, PartialEq)]
pub struct ForestNode<C> {
    pixel: PixelId,
    parent: Option<PixelId>,
    size: usize,
    internal_distance: f64,
    color: Option<C>,
}

impl<C> ForestNode<C> {
    const fn singleton(pixel: PixelId) -> Self {
        Self {
            pixel,
            parent: None,
            size: 1,
            internal_distance: 0.0,
            color: None,
        }
    }

    /// Returns the pixel that owns this node.
    #[must_use]
    #[rustfmt::skip]
    pub fn pixel(&self) -> PixelId { self.pixel }

    /// Returns the parent pixel, or `None` for a root.
    #[must_use]
    #[rustfmt::skip]
    pub fn parent(&self) -> Option<PixelId> { self.parent }

    /// Returns whether this node is the root of its component.
    #[must_use]
    pub fn is_root(&self) -> bool {
        self.parent.is_none()
    }

    /// Component pixel count. Authoritative on roots only.
    #[must_use]
    #[rustfmt::skip]
    pub fn size(&self) -> usize { self.size }

    /// Largest edge weight merged into the component. Authoritative on roots
    /// only.
    #[must_use]
    #[rustfmt::skip]
    pub fn internal_distance(&self) -> f64 { self.internal_distance }

    /// Representative color, once assigned. Meaningful on roots only.
    #[must_use]
    pub fn color(&self) -> Option<&C> {
        self.color.as_ref()
    }
}

/// Result of a [`WeightedForest::union`] call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum UnionOutcome {
    /// Both pixels already shared `root`; nothing changed.
    AlreadyJoined {
        /// Shared root.
        root: PixelId,
    },
    /// The component rooted at `absorbed` was attached beneath `root`.
    Merged {
        /// Surviving root.
        root: PixelId,
        /// Former root now pointing at `root`.
        absorbed: PixelId,
    },
}

/// Disjoint-set forest tracking component size and internal dissimilarity.
///
/// # Examples
/// ```
/// use tessera_core::{PixelId, UnionOutcome, WeightedForest};
///
/// let mut forest = WeightedForest::<u32>::new(1, 3)?;
/// let (a, b, c) = (PixelId::new(0), PixelId::new(1), PixelId::new(2));
/// forest.union(a, b, 2.0)?;
/// assert_eq!(forest.find(a), forest.find(b));
/// assert_ne!(forest.find(a), forest.find(c));
///
/// let root = forest.find(b).expect("registered pixel");
/// let node = forest.node(root).expect("root is registered");
/// assert_eq!((node.size(), node.internal_distance()), (2, 2.0));
/// assert!(matches!(forest.union(b, a, 9.0)?, UnionOutcome::AlreadyJoined { .. }));
/// # Ok::<(), Box<dyn std::error::Error>>(())
/// ```
#[derive(Clone, Debug)]
pub struct WeightedForest<C> {
    rows: usize,
    cols: usize,
    nodes: Vec<ForestNode<C>>,
    edges: Vec<GridEdge>,
    components: usize,
}

impl<C> WeightedForest<C> {
    /// Creates an edge-free forest with one singleton node per pixel of a
    /// `rows x cols` grid.
    ///
    /// # Errors
    /// Returns [`SegmentationError::EmptyGrid`] or
    /// [`SegmentationError::GridTooLarge`] for unusable dimensions.
    pub fn new(rows: usize, cols: usize) -> Result<Self> {
        let len = checked_area(rows, cols)?;
        Ok(Self {
            rows,
            cols,
            nodes: (0..len).map(|index| ForestNode::singleton(PixelId::new(index))).collect(),
            edges: Vec::new(),
            components: len,
        })
    }

    /// Creates one node per pixel of `grid` and materialises its sorted,
    /// deduplicated adjacency edges.
    ///
    /// # Errors
    /// Propagates edge-weight failures from the collaborator and rejects
    /// negative or non-finite weights.
    pub fn from_grid<P, W>(
        grid: &ColorGrid<P>,
        weigher: &W,
        connectivity: Connectivity,
    ) -> Result<Self>
    where
        W: EdgeWeight<P> + ?Sized,
    {
        let mut forest = Self::new(grid.rows(), grid.cols())?;
        forest.edges = build_edges(grid, weigher, connectivity)?;
        Ok(forest)
    }

    /// Returns the number of registered pixels.
    #[must_use]
    #[rustfmt::skip]
    pub fn len(&self) -> usize { self.nodes.len() }

    /// Always `false`: forests hold at least one node.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// Returns the number of components (roots) currently in the forest.
    #[must_use]
    #[rustfmt::skip]
    pub fn component_count(&self) -> usize { self.components }

    /// Returns the materialised adjacency edges in processing order.
    #[must_use]
    #[rustfmt::skip]
    pub fn edges(&self) -> &[GridEdge] { &self.edges }

    /// Removes and returns the adjacency edges, leaving none behind.
    pub fn take_edges(&mut self) -> Vec<GridEdge> {
        std::mem::take(&mut self.edges)
    }

    /// Maps a position to its pixel id, or `None` when outside the grid.
    #[must_use]
    pub fn id_of(&self, position: Position) -> Option<PixelId> {
        (position.row() < self.rows && position.col() < self.cols)
            .then(|| PixelId::new(position.row() * self.cols + position.col()))
    }

    /// Maps a pixel id to its position, or `None` when unregistered.
    #[must_use]
    pub fn position_of(&self, id: PixelId) -> Option<Position> {
        (id.index() < self.nodes.len())
            .then(|| Position::new(id.index() / self.cols, id.index() % self.cols))
    }

    /// Returns the node registered for `id`, or `None` when unregistered.
    #[must_use]
    pub fn node(&self, id: PixelId) -> Option<&ForestNode<C>> {
        self.nodes.get(id.index())
    }

    /// Returns the root of the component containing `id`, or `None` when the
    /// pixel was never registered (or its parent chain is corrupt). A miss
    /// leaves the forest untouched.
    pub fn find(&mut self, id: PixelId) -> Option<PixelId> {
        self.try_find(id).ok()
    }

    /// Returns the root of the component containing `id`.
    ///
    /// # Errors
    /// Returns [`ForestError::UnregisteredPixel`] for unknown ids and
    /// [`ForestError::ParentCycle`] when the parent chain does not reach a
    /// root within `len()` steps.
    pub fn try_find(&mut self, id: PixelId) -> core::result::Result<PixelId, ForestError> {
        let root = self.locate_root(id)?;
        self.compress(id, root);
        Ok(root)
    }

    /// Merges the components containing `a` and `b` through an edge of
    /// `weight`.
    ///
    /// The smaller component is attached beneath the larger; on equal sizes
    /// `b`'s root is attached beneath `a`'s. The survivor's size becomes the
    /// sum of both and its internal distance becomes the maximum of its own
    /// previous value and `weight`.
    ///
    /// # Errors
    /// Returns [`ForestError::UnregisteredPixel`] when either pixel is
    /// unknown, before any state changes.
    pub fn union(
        &mut self,
        a: PixelId,
        b: PixelId,
        weight: f64,
    ) -> core::result::Result<UnionOutcome, ForestError> {
        let root_a = self.try_find(a)?;
        let root_b = self.try_find(b)?;
        if root_a == root_b {
            return Ok(UnionOutcome::AlreadyJoined { root: root_a });
        }

        let size_a = self.root_node(root_a)?.size;
        let size_b = self.root_node(root_b)?.size;
        let (survivor, absorbed) = if size_a >= size_b {
            (root_a, root_b)
        } else {
            (root_b, root_a)
        };

        let size = size_a.saturating_add(size_b);
        self.node_mut(absorbed)?.parent = Some(survivor);
        let node = self.node_mut(survivor)?;
        node.size = size;
        node.internal_distance = node.internal_distance.max(weight);
        self.components = self.components.saturating_sub(1);
        trace!(
            root = survivor.index(),
            absorbed = absorbed.index(),
            size,
            "components merged"
        );
        Ok(UnionOutcome::Merged {
            root: survivor,
            absorbed,
        })
    }

    /// Returns the representative color of the component containing `id`,
    /// drawing a fresh one from `palette` the first time the component is
    /// asked for.
    ///
    /// # Errors
    /// Returns [`SegmentationError::Forest`] for lookup failures and
    /// [`SegmentationError::Palette`] when the generator fails; `issued` is
    /// the number of components colored so far.
    pub fn color_of<G>(&mut self, id: PixelId, palette: &mut G, issued: usize) -> Result<C>
    where
        C: Clone,
        G: ColorGenerator<C> + ?Sized,
    {
        let root = self.try_find(id)?;
        let node = self.node_mut(root)?;
        if let Some(color) = &node.color {
            return Ok(color.clone());
        }
        let color = palette
            .next_color()
            .map_err(|error| SegmentationError::Palette { issued, error })?;
        node.color = Some(color.clone());
        Ok(color)
    }

    fn locate_root(&self, id: PixelId) -> core::result::Result<PixelId, ForestError> {
        let mut current = self.node(id).ok_or_else(|| self.unregistered(id))?;
        // A well-formed chain visits each node at most once.
        for _ in 0..self.nodes.len() {
            let Some(parent) = current.parent else {
                return Ok(current.pixel);
            };
            current = self.node(parent).ok_or_else(|| self.unregistered(parent))?;
        }
        Err(ForestError::ParentCycle {
            pixel: self.position_or_origin(id),
        })
    }

    fn compress(&mut self, mut id: PixelId, root: PixelId) {
        while id != root {
            let Some(node) = self.nodes.get_mut(id.index()) else {
                return;
            };
            let Some(parent) = node.parent else {
                return;
            };
            node.parent = Some(root);
            id = parent;
        }
    }

    fn root_node(&self, id: PixelId) -> core::result::Result<&ForestNode<C>, ForestError> {
        self.node(id).ok_or_else(|| self.unregistered(id))
    }

    fn node_mut(&mut self, id: PixelId) -> core::result::Result<&mut ForestNode<C>, ForestError> {
        let node_count = self.nodes.len();
        self.nodes
            .get_mut(id.index())
            .ok_or(ForestError::UnregisteredPixel {
                index: id.index(),
                node_count,
            })
    }

    fn unregistered(&self, id: PixelId) -> ForestError {
        ForestError::UnregisteredPixel {
            index: id.index(),
            node_count: self.nodes.len(),
        }
    }

    fn position_or_origin(&self, id: PixelId) -> Position {
        self.position_of(id).unwrap_or(Position::new(0, 0))
    }
}

#[cfg(test)]
impl<C> WeightedForest<C> {
    /// Rewires a parent link directly, bypassing union bookkeeping.
    pub(crate) fn force_parent(&mut self, child: PixelId, parent: PixelId) {
        if let Some(node) = self.nodes.get_mut(child.index()) {
            node.parent = Some(parent);
        }
    }
}

#[cfg(test)]
mod property;
