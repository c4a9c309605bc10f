//! Nested rendering of overlapping annotations.
//!
//! Annotation ranges may cross each other, which a tree cannot express. The
//! renderer cuts the text at every annotation boundary into elementary
//! intervals, nests the annotations active on each interval, and opens or
//! closes wrappers only where that nesting changes. A logical annotation may
//! therefore come out as several sibling fragments; group them by
//! [`AnnotationId`] (see [`fragments`]) when identity matters.
//!
//! Nesting order on each interval, outermost first:
//!
//! 1. a range that strictly contains another wraps it
//! 2. otherwise (crossing or identical ranges) [`KindPriority`] decides,
//!    `ruby > highlight > lemma` by default. A range counts with the best
//!    priority among itself and the ranges it contains, so a ruby is never
//!    cut by a highlight crossing it.
//! 3. earlier `cp_begin`, then later `cp_end`
//!
//! # Example
//!
//! ```rust
//! use glosstrack::render::{render, render_plain};
//! use glosstrack::text::{AnnotatedText, AnnotationData};
//!
//! let text = AnnotatedText::new("漢字です")
//!     .add_annotation(0, 2, AnnotationData::Ruby("かんじ".into()))?;
//! let tree = render(&text);
//! assert_eq!(render_plain(&tree), "漢字です");
//! # Ok::<(), glosstrack::AnnoError>(())
//! ```

pub mod html;

use std::cmp::Ordering;
use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::text::{AnnotatedText, Annotation, AnnotationId, AnnotationKind};

/// One node of a render tree
#[derive(Debug, Clone, PartialEq)]
pub enum RenderNode<'a> {
    /// A visible character and its code-point index
    Char { index: usize, ch: char },
    /// A newline character, rendered as a line break
    Break { index: usize },
    /// One fragment of an annotation wrapping `[cp_begin, cp_end)`
    Wrap {
        annotation: &'a Annotation,
        cp_begin: usize,
        cp_end: usize,
        children: Vec<RenderNode<'a>>,
    },
}

/// Tie-break order for annotations with identical ranges, outermost first.
///
/// Kinds not listed nest inside all listed kinds, ordered by name.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct KindPriority(Vec<AnnotationKind>);

impl KindPriority {
    #[must_use]
    pub fn new(order: Vec<AnnotationKind>) -> Self {
        Self(order)
    }

    fn rank(&self, kind: &AnnotationKind) -> usize {
        self.0
            .iter()
            .position(|k| k == kind)
            .unwrap_or(self.0.len())
    }
}

impl Default for KindPriority {
    fn default() -> Self {
        Self(vec![
            AnnotationKind::Ruby,
            AnnotationKind::Highlight,
            AnnotationKind::Lemma,
        ])
    }
}

/// Builds render trees. Holds no state between calls; render each revision
/// afresh.
#[derive(Debug, Clone, Default)]
pub struct Renderer {
    priority: KindPriority,
}

impl Renderer {
    #[must_use]
    pub fn new(priority: KindPriority) -> Self {
        Self { priority }
    }

    /// Render `text` into a forest of nodes in code-point order.
    ///
    /// Every character appears exactly once. Empty-range annotations cover
    /// no characters and produce no nodes.
    #[must_use]
    pub fn render<'a>(&self, text: &'a AnnotatedText) -> Vec<RenderNode<'a>> {
        let visible: Vec<&Annotation> = text
            .annotations()
            .iter()
            .filter(|a| a.cp_begin < a.cp_end)
            .collect();

        let mut breakpoints: Vec<usize> = visible
            .iter()
            .flat_map(|a| [a.cp_begin, a.cp_end])
            .chain([0, text.len()])
            .collect();
        breakpoints.sort_unstable();
        breakpoints.dedup();

        let chars = text.text().chars();
        let mut builder = TreeBuilder::default();
        for window in breakpoints.windows(2) {
            let (lo, hi) = (window[0], window[1]);
            let active: Vec<&Annotation> = visible
                .iter()
                .copied()
                .filter(|a| a.cp_begin <= lo && a.cp_end >= hi)
                .collect();
            builder.enter(&self.stack_order(active), lo);
            for (index, &ch) in chars.iter().enumerate().take(hi).skip(lo) {
                builder.push(if ch == '\n' {
                    RenderNode::Break { index }
                } else {
                    RenderNode::Char { index, ch }
                });
            }
        }
        builder.finish(text.len())
    }

    /// Order the annotations active on one interval, outermost first.
    ///
    /// Repeatedly takes the best annotation that no remaining one strictly
    /// contains. Strict containment is acyclic, so there is always one.
    fn stack_order<'a>(&self, mut active: Vec<&'a Annotation>) -> Vec<&'a Annotation> {
        let mut stack = Vec::with_capacity(active.len());
        while !active.is_empty() {
            let pick = (0..active.len())
                .filter(|&i| !active.iter().any(|o| o.strictly_contains(active[i])))
                .min_by(|&i, &j| self.nesting_order(active[i], active[j], &active));
            let Some(pick) = pick else { break };
            stack.push(active.remove(pick));
        }
        stack
    }

    /// Best rank among `a` and the remaining annotations it contains
    fn guard_rank(&self, a: &Annotation, active: &[&Annotation]) -> usize {
        active
            .iter()
            .filter(|o| a.strictly_contains(o))
            .map(|o| self.priority.rank(&o.kind()))
            .fold(self.priority.rank(&a.kind()), usize::min)
    }

    fn nesting_order(&self, a: &Annotation, b: &Annotation, active: &[&Annotation]) -> Ordering {
        let (ka, kb) = (a.kind(), b.kind());
        self.guard_rank(a, active)
            .cmp(&self.guard_rank(b, active))
            .then(a.cp_begin.cmp(&b.cp_begin))
            .then(b.cp_end.cmp(&a.cp_end))
            .then_with(|| self.priority.rank(&ka).cmp(&self.priority.rank(&kb)))
            .then_with(|| ka.as_str().cmp(kb.as_str()))
            .then_with(|| a.id.cmp(&b.id))
    }
}

/// Render with the default kind priority
#[must_use]
pub fn render(text: &AnnotatedText) -> Vec<RenderNode<'_>> {
    Renderer::default().render(text)
}

struct Frame<'a> {
    annotation: &'a Annotation,
    cp_begin: usize,
    children: Vec<RenderNode<'a>>,
}

#[derive(Default)]
struct TreeBuilder<'a> {
    roots: Vec<RenderNode<'a>>,
    open: Vec<Frame<'a>>,
}

impl<'a> TreeBuilder<'a> {
    /// Make `path` (outermost first) the open wrapper chain at `at`, keeping
    /// the longest prefix that is already open.
    fn enter(&mut self, path: &[&'a Annotation], at: usize) {
        let shared = self
            .open
            .iter()
            .zip(path)
            .take_while(|(frame, a)| frame.annotation.id == a.id)
            .count();
        while self.open.len() > shared {
            self.close(at);
        }
        for &annotation in &path[shared..] {
            self.open.push(Frame {
                annotation,
                cp_begin: at,
                children: Vec::new(),
            });
        }
    }

    fn push(&mut self, node: RenderNode<'a>) {
        match self.open.last_mut() {
            Some(frame) => frame.children.push(node),
            None => self.roots.push(node),
        }
    }

    fn close(&mut self, at: usize) {
        if let Some(frame) = self.open.pop() {
            self.push(RenderNode::Wrap {
                annotation: frame.annotation,
                cp_begin: frame.cp_begin,
                cp_end: at,
                children: frame.children,
            });
        }
    }

    fn finish(mut self, at: usize) -> Vec<RenderNode<'a>> {
        while !self.open.is_empty() {
            self.close(at);
        }
        self.roots
    }
}

/// Concatenate the leaves back into text (breaks become `\n`)
#[must_use]
pub fn render_plain(nodes: &[RenderNode<'_>]) -> String {
    fn walk(nodes: &[RenderNode<'_>], out: &mut String) {
        for node in nodes {
            match node {
                RenderNode::Char { ch, .. } => out.push(*ch),
                RenderNode::Break { .. } => out.push('\n'),
                RenderNode::Wrap { children, .. } => walk(children, out),
            }
        }
    }

    let mut out = String::new();
    walk(nodes, &mut out);
    out
}

/// Fragment ranges per annotation, in document order
#[must_use]
pub fn fragments(nodes: &[RenderNode<'_>]) -> HashMap<AnnotationId, Vec<(usize, usize)>> {
    fn walk(nodes: &[RenderNode<'_>], out: &mut HashMap<AnnotationId, Vec<(usize, usize)>>) {
        for node in nodes {
            if let RenderNode::Wrap {
                annotation,
                cp_begin,
                cp_end,
                children,
            } = node
            {
                out.entry(annotation.id).or_default().push((*cp_begin, *cp_end));
                walk(children, out);
            }
        }
    }

    let mut out = HashMap::new();
    walk(nodes, &mut out);
    out
}
