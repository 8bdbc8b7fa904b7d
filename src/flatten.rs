use indexmap::IndexMap;
use thiserror::Error;

use crate::tree::TreeValue;

/// Substituted for a translation entry the API left empty.
pub const MISSING_TRANSLATION: &str = "-";

/// The flattened form of a localization tree: parallel vectors of dotted key
/// paths and leaf values, in depth-first traversal order.
///
/// Index `i` of `keys` and index `i` of `values` describe the same leaf, and
/// the same index in a translation response describes that leaf's
/// translation. Everything downstream relies on this positional contract.
#[derive(Debug, Clone, PartialEq, Default)]
pub struct FlatPairs {
    pub keys: Vec<String>,
    pub values: Vec<String>,
}

impl FlatPairs {
    pub fn len(&self) -> usize {
        self.keys.len()
    }

    pub fn is_empty(&self) -> bool {
        self.keys.is_empty()
    }
}

#[derive(Debug, Error, PartialEq)]
pub enum FlattenError {
    #[error("expected {expected} translations, got {actual}")]
    LengthMismatch { expected: usize, actual: usize },
    #[error("key path '{path}' passes through a leaf value")]
    PathThroughLeaf { path: String },
}

/// Reduce a tree to its flattened form, depth-first and in key order.
pub fn flatten(tree: &TreeValue) -> FlatPairs {
    let mut pairs = FlatPairs::default();
    let mut ancestors = Vec::new();
    collect(tree, &mut ancestors, &mut pairs);
    pairs
}

fn collect(value: &TreeValue, ancestors: &mut Vec<String>, out: &mut FlatPairs) {
    match value {
        TreeValue::Node(entries) => {
            for (key, child) in entries {
                ancestors.push(key.clone());
                collect(child, ancestors, out);
                ancestors.pop();
            }
        }
        TreeValue::Leaf(text) => {
            out.keys.push(ancestors.join("."));
            out.values.push(text.clone());
        }
    }
}

/// Rebuild a tree from dotted key paths and the translations aligned with
/// them, creating intermediate nodes as needed.
///
/// The two slices must have equal length; a mismatch means the translation
/// response does not line up with the source file and no tree is produced.
/// A `None` entry within a correct-length response becomes
/// [`MISSING_TRANSLATION`] so one dropped string never blocks the rest of
/// the file.
pub fn reconstruct(
    keys: &[String],
    translations: &[Option<String>],
) -> Result<TreeValue, FlattenError> {
    if keys.len() != translations.len() {
        return Err(FlattenError::LengthMismatch {
            expected: keys.len(),
            actual: translations.len(),
        });
    }

    let mut root = IndexMap::new();
    for (key, translation) in keys.iter().zip(translations) {
        let text = translation
            .clone()
            .unwrap_or_else(|| MISSING_TRANSLATION.to_string());
        insert(&mut root, key, text)?;
    }
    Ok(TreeValue::Node(root))
}

fn insert(
    root: &mut IndexMap<String, TreeValue>,
    path: &str,
    text: String,
) -> Result<(), FlattenError> {
    let steps: Vec<&str> = path.split('.').collect();
    let (leaf_key, parents) = steps
        .split_last()
        .expect("split always yields at least one step");

    let mut node = root;
    for step in parents {
        let entry = node
            .entry((*step).to_string())
            .or_insert_with(|| TreeValue::Node(IndexMap::new()));
        node = match entry {
            TreeValue::Node(children) => children,
            TreeValue::Leaf(_) => {
                return Err(FlattenError::PathThroughLeaf {
                    path: path.to_string(),
                })
            }
        };
    }
    node.insert((*leaf_key).to_string(), TreeValue::Leaf(text));
    Ok(())
}
