//! Turning a name lookup into exactly one node.

use crate::document::{Document, NodeId};
use crate::error::SessionError;

/// Something that can pick one entry out of a list of descriptions.
///
/// The console implementation prints the list and blocks on an index prompt;
/// tests substitute a canned answer.
pub trait Chooser {
    /// Return the 0-based index of the chosen description.
    ///
    /// Only called with two or more descriptions. Implementations must not
    /// return an index outside the list.
    fn choose(&mut self, descriptions: &[String]) -> Result<usize, SessionError>;
}

/// Reduce a candidate set to a single node.
///
/// - no candidates: `Ok(None)`, without asking anything;
/// - one candidate: that node, without asking anything;
/// - several: the chooser picks among their descriptions, in order.
pub fn resolve<C>(doc: &Document, candidates: &[NodeId], chooser: &mut C) -> Result<Option<NodeId>, SessionError>
where
    C: Chooser + ?Sized,
{
    match candidates {
        [] => Ok(None),
        [only] => Ok(Some(*only)),
        _ => {
            let descriptions: Vec<String> = candidates.iter().map(|id| describe(doc, *id)).collect();
            let index = chooser.choose(&descriptions)?;
            Ok(candidates.get(index).copied())
        }
    }
}

/// One-line description of an element: its name, its parent's name and its
/// text content when the first child is text.
pub fn describe(doc: &Document, node: NodeId) -> String {
    let mut line = format!("Element \"{}\"", doc.name(node).unwrap_or_default());
    if let Some(parent) = doc.parent(node).and_then(|p| doc.name(p)) {
        line.push_str(&format!(" with parent \"{}\"", parent));
    }
    if let Some(text) = doc.first_text(node) {
        line.push_str(&format!(" and content \"{}\"", text));
    }
    line.push('.');
    line
}
