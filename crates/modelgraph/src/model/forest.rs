//! Parent/children adjacency over the generalization hierarchy
//!
//! Built once per model and used by every flattening pass. Construction
//! enforces the forest shape: one parent per child and no cycles.

use indexmap::{IndexMap, IndexSet};

use crate::core::ValidationError;

use super::association::GeneralizationDef;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct InheritanceForest {
    parents: IndexMap<String, String>,
    children: IndexMap<String, Vec<String>>,
}

impl InheritanceForest {
    /// Build the forest; children keep generalization declaration order
    pub fn build<'a, I>(generalizations: I) -> Result<Self, ValidationError>
    where
        I: IntoIterator<Item = &'a GeneralizationDef>,
    {
        let mut forest = Self::default();

        for generalization in generalizations {
            if let Some(existing) = forest.parents.get(&generalization.child) {
                if existing == &generalization.parent {
                    continue;
                }
                return Err(ValidationError::MultipleParents {
                    child: generalization.child.clone(),
                    first: existing.clone(),
                    second: generalization.parent.clone(),
                });
            }
            forest
                .parents
                .insert(generalization.child.clone(), generalization.parent.clone());
            forest
                .children
                .entry(generalization.parent.clone())
                .or_default()
                .push(generalization.child.clone());
        }

        forest.check_acyclic()?;
        Ok(forest)
    }

    fn check_acyclic(&self) -> Result<(), ValidationError> {
        for start in self.parents.keys() {
            let mut seen: IndexSet<&str> = IndexSet::new();
            let mut current = start.as_str();
            seen.insert(current);
            while let Some(parent) = self.parents.get(current) {
                if !seen.insert(parent.as_str()) {
                    return Err(ValidationError::GeneralizationCycle {
                        class: parent.clone(),
                    });
                }
                current = parent.as_str();
            }
        }
        Ok(())
    }

    pub fn parent(&self, class: &str) -> Option<&str> {
        self.parents.get(class).map(String::as_str)
    }

    pub fn children(&self, class: &str) -> &[String] {
        self.children.get(class).map(Vec::as_slice).unwrap_or(&[])
    }

    /// Ancestors from nearest to the root
    pub fn ancestors(&self, class: &str) -> Vec<&str> {
        let mut ancestors = Vec::new();
        let mut current = class;
        while let Some(parent) = self.parent(current) {
            ancestors.push(parent);
            current = parent;
        }
        ancestors
    }

    /// All descendants in depth-first preorder, excluding `class` itself
    pub fn descendants(&self, class: &str) -> Vec<&str> {
        let mut result = Vec::new();
        let mut stack: Vec<&str> = self.children(class).iter().rev().map(String::as_str).collect();
        while let Some(next) = stack.pop() {
            result.push(next);
            stack.extend(self.children(next).iter().rev().map(String::as_str));
        }
        result
    }

    /// `class` followed by its descendants
    pub fn subtree<'a>(&'a self, class: &'a str) -> Vec<&'a str> {
        let mut result = Vec::with_capacity(1);
        result.push(class);
        result.extend(self.descendants(class));
        result
    }

    pub fn is_descendant_of(&self, class: &str, ancestor: &str) -> bool {
        self.ancestors(class).contains(&ancestor)
    }

    pub fn generalization_count(&self) -> usize {
        self.parents.len()
    }
}
