/// Chemistry layer: element tables, formula parsing, oxide classification.
///
/// ```text
///   "Fe2O3"
///      │
///      ▼
///   ┌─────────┐
///   │ formula  │  parse → Composition { Fe: 2, O: 3 }
///   └─────────┘
///      │
///      ▼
///   ┌──────────┐
///   │ classify  │  O present && elements ⊆ metals ∪ {As, P, O}
///   └──────────┘
/// ```

pub mod classify;
pub mod elements;
pub mod formula;
