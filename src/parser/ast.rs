//! Diagram tree: outer shapes and the decorations nested in them.
use crate::classifier::GeometricObject;
use crate::region::RegionId;
use crate::types::BoundingBox;
use serde::Serialize;
use std::fmt;

#[derive(Clone, Debug, PartialEq, Serialize)]
pub struct AstNode {
    pub region: RegionId,
    pub bounds: BoundingBox,
    /// `None` until the region is recognised.
    pub object: Option<GeometricObject>,
    pub children: Vec<AstNode>,
}

impl AstNode {
    pub fn new(region: RegionId, bounds: BoundingBox, object: Option<GeometricObject>) -> Self {
        Self {
            region,
            bounds,
            object,
            children: Vec::new(),
        }
    }

    pub fn is_recognized(&self) -> bool {
        self.object.is_some()
    }

    fn find_mut(&mut self, id: RegionId) -> Option<&mut AstNode> {
        if self.region == id {
            return Some(self);
        }
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    fn find(&self, id: RegionId) -> Option<&AstNode> {
        if self.region == id {
            return Some(self);
        }
        self.children.iter().find_map(|c| c.find(id))
    }

    fn prune(&mut self) {
        self.children.retain(AstNode::is_recognized);
        for child in &mut self.children {
            child.prune();
        }
    }

    fn write_html(&self, out: &mut String) {
        out.push_str("<li>");
        out.push_str(&self.label());
        if !self.children.is_empty() {
            out.push_str("<ul>");
            for child in &self.children {
                child.write_html(out);
            }
            out.push_str("</ul>");
        }
        out.push_str("</li>");
    }

    fn label(&self) -> String {
        match &self.object {
            Some(object) => format!("{} {}", self.region, object),
            None => format!("{} unrecognized {}", self.region, self.bounds),
        }
    }

    fn write_indented(&self, f: &mut fmt::Formatter<'_>, depth: usize) -> fmt::Result {
        writeln!(f, "{:indent$}{}", "", self.label(), indent = depth * 2)?;
        for child in &self.children {
            child.write_indented(f, depth + 1)?;
        }
        Ok(())
    }
}

/// Root of the diagram tree.
#[derive(Clone, Debug, Default, PartialEq, Serialize)]
pub struct DiagramAst {
    pub children: Vec<AstNode>,
}

impl DiagramAst {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn find(&self, id: RegionId) -> Option<&AstNode> {
        self.children.iter().find_map(|c| c.find(id))
    }

    pub fn find_mut(&mut self, id: RegionId) -> Option<&mut AstNode> {
        self.children.iter_mut().find_map(|c| c.find_mut(id))
    }

    /// Removes every unrecognised node together with its subtree.
    pub fn prune(&mut self) {
        self.children.retain(AstNode::is_recognized);
        for child in &mut self.children {
            child.prune();
        }
    }

    pub fn node_count(&self) -> usize {
        self.iter().count()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Depth-first, parents before children.
    pub fn iter(&self) -> AstIter<'_> {
        AstIter {
            stack: self.children.iter().rev().collect(),
        }
    }

    /// Nested `<ul>/<li>` rendering.
    pub fn to_html(&self) -> String {
        let mut out = String::from("<ul>");
        for child in &self.children {
            child.write_html(&mut out);
        }
        out.push_str("</ul>");
        out
    }
}

pub struct AstIter<'a> {
    stack: Vec<&'a AstNode>,
}

impl<'a> Iterator for AstIter<'a> {
    type Item = &'a AstNode;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

impl fmt::Display for DiagramAst {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        writeln!(f, "DiagramAst")?;
        for child in &self.children {
            child.write_indented(f, 1)?;
        }
        Ok(())
    }
}
