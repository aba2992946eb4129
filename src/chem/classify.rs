use std::collections::BTreeSet;

use crate::chem::elements::metal_oxide_elements;
use crate::chem::formula::parse_formula;
use crate::error::ParseError;

/// Decides whether a formula is a "clean" metal oxide: it contains oxygen
/// and every element is drawn from the allowed set.
#[derive(Debug, Clone)]
pub struct MetalOxideClassifier {
    allowed: BTreeSet<String>,
}

impl Default for MetalOxideClassifier {
    fn default() -> Self {
        Self::new(metal_oxide_elements())
    }
}

impl MetalOxideClassifier {
    pub fn new(allowed: BTreeSet<String>) -> Self {
        Self { allowed }
    }

    pub fn allowed(&self) -> &BTreeSet<String> {
        &self.allowed
    }

    pub fn is_metal_oxide(&self, formula: &str) -> Result<bool, ParseError> {
        let composition = parse_formula(formula)?;
        if !composition.contains("O") {
            return Ok(false);
        }
        let all_allowed = composition.elements().all(|el| self.allowed.contains(el));
        Ok(all_allowed)
    }
}

/// Classify with the built-in metals ∪ {As, P, O} set.
pub fn is_metal_oxide(formula: &str) -> Result<bool, ParseError> {
    MetalOxideClassifier::default().is_metal_oxide(formula)
}
