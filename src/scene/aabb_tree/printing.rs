use std::fmt::{self, Display};

use super::{AabbTree, Intersectable};

/// Shape of a built tree.
#[derive(Clone, Debug, PartialEq)]
pub struct TreeStatistics {
    pub leaf_count: usize,
    /// Nodes with two children
    pub internal_node_count: usize,
    pub min_leaf_depth: usize,
    pub max_leaf_depth: usize,
    pub mean_leaf_depth: f64,
}

impl TreeStatistics {
    fn new_leaf(depth: usize) -> Self {
        TreeStatistics {
            leaf_count: 1,
            internal_node_count: 0,
            min_leaf_depth: depth,
            max_leaf_depth: depth,
            mean_leaf_depth: depth as f64,
        }
    }

    fn merge(&self, other: &Self) -> Self {
        let leaf_count = self.leaf_count + other.leaf_count;
        TreeStatistics {
            leaf_count,
            internal_node_count: self.internal_node_count + other.internal_node_count,
            min_leaf_depth: self.min_leaf_depth.min(other.min_leaf_depth),
            max_leaf_depth: self.max_leaf_depth.max(other.max_leaf_depth),
            mean_leaf_depth: (self.mean_leaf_depth * self.leaf_count as f64
                + other.mean_leaf_depth * other.leaf_count as f64)
                / leaf_count as f64,
        }
    }
}

impl Display for TreeStatistics {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} leaves, {} internal nodes; leaf depth {} - {}; avg {:.1}",
            self.leaf_count,
            self.internal_node_count,
            self.min_leaf_depth,
            self.max_leaf_depth,
            self.mean_leaf_depth
        )
    }
}

impl AabbTree {
    /// Leaf depths are counted from this node, nested trees included.
    pub fn statistics(&self) -> TreeStatistics {
        self.statistics_recursive(0)
    }

    fn statistics_recursive(&self, depth: usize) -> TreeStatistics {
        let child_statistics = |child: &Intersectable| match child {
            Intersectable::Triangle(_) => TreeStatistics::new_leaf(depth),
            Intersectable::Tree(subtree) => subtree.statistics_recursive(depth + 1),
        };

        match &self.right {
            None => child_statistics(&self.left),
            Some(right) => {
                let mut ret = child_statistics(&self.left).merge(&child_statistics(right));
                ret.internal_node_count += 1;
                ret
            }
        }
    }

    /// Writes an indented dump of the tree, one node or leaf per line.
    pub fn print_tree(&self, out: &mut impl fmt::Write) -> fmt::Result {
        self.print_recursive(out, 0)
    }

    fn print_recursive(&self, out: &mut impl fmt::Write, indent: usize) -> fmt::Result {
        writeln!(
            out,
            "{}- {} {} ({} leaves): {:?}-{:?}",
            "  ".repeat(indent),
            if self.is_leaf_wrapper() { "L" } else { "I" },
            self.depth,
            self.num_leaves,
            self.bounding_box.min,
            self.bounding_box.max,
        )?;

        for child in std::iter::once(&self.left).chain(&self.right) {
            match child {
                Intersectable::Tree(subtree) => subtree.print_recursive(out, indent + 1)?,
                Intersectable::Triangle(triangle) => {
                    let t = triangle.triangle();
                    writeln!(
                        out,
                        "{}face {}: {:?}, {:?}, {:?}",
                        "  ".repeat(indent + 1),
                        triangle.face().index(),
                        t[0],
                        t[1],
                        t[2]
                    )?
                }
            }
        }

        Ok(())
    }
}
