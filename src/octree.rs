// octree.rs
//
// Copyright (c) 2026  Douglas Lau
//
//! Octree color quantization
use crate::color::{Color, Palette};
use crate::error::{Error, Result};

/// Maximum tree depth (one level per channel bit)
pub const MAX_DEPTH: usize = 8;

/// Node handle
type NodeId = u32;

/// Root node handle
const ROOT: NodeId = 0;

/// Octree node
#[derive(Clone, Debug, Default)]
struct Node {
    /// Sum of all colors routed to this node
    color: Color,
    /// Number of pixels (non-zero for leaves only)
    pixel_count: u64,
    /// Palette index, assigned when the palette is made
    palette_index: u8,
    /// Child nodes, by branch selector
    children: [Option<NodeId>; 8],
}

/// Octree palette builder
///
/// Nodes live in one table and refer to their children by handle.  Every
/// internal node is also registered by depth, in creation order, so that
/// reduction can walk the tree bottom-up without parent links.
#[derive(Clone, Debug)]
pub struct Octree {
    /// Table of nodes
    nodes: Vec<Node>,
    /// Internal node handles for each depth
    levels: [Vec<NodeId>; MAX_DEPTH],
    /// Palette made by the last reduction
    palette: Palette,
}

/// Get the branch selector of a color at one depth
fn branch(rgb: [u8; 3], depth: usize) -> usize {
    let mask = 0b1000_0000 >> depth;
    let mut index = 0;
    if rgb[0] & mask != 0 {
        index |= 0b100;
    }
    if rgb[1] & mask != 0 {
        index |= 0b010;
    }
    if rgb[2] & mask != 0 {
        index |= 0b001;
    }
    index
}

impl Node {
    /// Check if node is a leaf
    fn is_leaf(&self) -> bool {
        self.pixel_count > 0
    }

    /// Get the first present child
    fn any_child(&self) -> Option<NodeId> {
        self.children.iter().flatten().next().copied()
    }
}

impl Default for Octree {
    fn default() -> Self {
        Self::new()
    }
}

impl Octree {
    /// Create an empty octree
    pub fn new() -> Self {
        let mut tree = Octree {
            nodes: Vec::new(),
            levels: Default::default(),
            palette: Palette::default(),
        };
        tree.push_node(0);
        tree
    }

    /// Push a new node at a depth
    fn push_node(&mut self, depth: usize) -> NodeId {
        let id = self.nodes.len() as NodeId;
        self.nodes.push(Node::default());
        if depth < MAX_DEPTH {
            self.levels[depth].push(id);
        }
        id
    }

    fn node(&self, id: NodeId) -> &Node {
        &self.nodes[id as usize]
    }

    fn node_mut(&mut self, id: NodeId) -> &mut Node {
        &mut self.nodes[id as usize]
    }

    /// Check whether any color has been inserted
    pub fn is_empty(&self) -> bool {
        self.node(ROOT).any_child().is_none() && !self.node(ROOT).is_leaf()
    }

    /// Insert one color
    pub fn insert(&mut self, rgb: [u8; 3]) {
        let mut id = ROOT;
        for depth in 0..MAX_DEPTH {
            let b = branch(rgb, depth);
            id = match self.node(id).children[b] {
                Some(child) => child,
                None => {
                    let child = self.push_node(depth + 1);
                    self.node_mut(id).children[b] = Some(child);
                    child
                }
            };
        }
        let leaf = self.node_mut(id);
        leaf.color += Color::from(rgb);
        leaf.pixel_count += 1;
    }

    /// Get leaf handles in traversal order
    fn leaves(&self) -> Vec<NodeId> {
        let mut leaves = Vec::new();
        let mut stack = vec![ROOT];
        while let Some(id) = stack.pop() {
            let node = self.node(id);
            if node.is_leaf() {
                leaves.push(id);
            } else {
                stack.extend(node.children.iter().rev().flatten());
            }
        }
        leaves
    }

    /// Merge all children of a node into it.
    ///
    /// Returns the reduction in leaf count.
    fn merge_children(&mut self, id: NodeId) -> usize {
        let children = std::mem::take(&mut self.node_mut(id).children);
        let mut n_merged = 0;
        for child in children.iter().flatten() {
            let c = self.node(*child);
            let (color, count) = (c.color, c.pixel_count);
            let node = self.node_mut(id);
            node.color += color;
            node.pixel_count += count;
            n_merged += 1;
        }
        n_merged.max(1) - 1
    }

    /// Reduce the tree to at most `target` leaves and make the palette.
    ///
    /// Depths are merged from deepest to shallowest, nodes within a depth
    /// in the order they were created.  Reduction stops as soon as the
    /// leaf count reaches the target.
    pub fn reduce(&mut self, target: usize) -> Result<&Palette> {
        if self.is_empty() {
            return Err(Error::EmptyImage);
        }
        let target = target.clamp(1, usize::from(u8::MAX) + 1);
        let mut leaf_count = self.leaves().len();
        'depths: for depth in (0..MAX_DEPTH).rev() {
            let level = std::mem::take(&mut self.levels[depth]);
            for id in level {
                if leaf_count <= target {
                    break 'depths;
                }
                leaf_count -= self.merge_children(id);
            }
        }
        let mut palette = Palette::default();
        for id in self.leaves().into_iter().take(target) {
            let node = self.node(id);
            let clr = node.color.normalized(node.pixel_count);
            let idx = palette.push(clr) as u8;
            self.node_mut(id).palette_index = idx;
        }
        debug!("octree: {} leaves -> {} colors", leaf_count, palette.len());
        self.palette = palette;
        Ok(&self.palette)
    }

    /// Get the palette made by the last reduction
    pub fn palette(&self) -> &Palette {
        &self.palette
    }

    /// Look up the palette index of a color.
    ///
    /// When a branch is missing, descent continues through the first
    /// present child, so some leaf is always found.
    pub fn lookup(&self, rgb: [u8; 3]) -> Result<u8> {
        if self.palette.is_empty() {
            return Err(Error::QuantizerNotBuilt);
        }
        let mut id = ROOT;
        let mut depth = 0;
        loop {
            let node = self.node(id);
            if node.is_leaf() {
                return Ok(node.palette_index);
            }
            let exact = if depth < MAX_DEPTH {
                node.children[branch(rgb, depth)]
            } else {
                None
            };
            id = exact
                .or_else(|| node.any_child())
                .ok_or(Error::QuantizerNotBuilt)?;
            depth += 1;
        }
    }
}
