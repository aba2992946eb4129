use std::collections::BTreeSet;

/// All element symbols, ordered by atomic number.
pub const ELEMENTS: [&str; 118] = [
    // --- Period 1 ---
    "H", "He",
    // --- Period 2 ---
    "Li", "Be", "B", "C", "N", "O", "F", "Ne",
    // --- Period 3 ---
    "Na", "Mg", "Al", "Si", "P", "S", "Cl", "Ar",
    // --- Period 4 ---
    "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co", "Ni", "Cu", "Zn", "Ga", "Ge",
    "As", "Se", "Br", "Kr",
    // --- Period 5 ---
    "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh", "Pd", "Ag", "Cd", "In", "Sn",
    "Sb", "Te", "I", "Xe",
    // --- Period 6 ---
    "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm", "Eu", "Gd", "Tb", "Dy", "Ho", "Er",
    "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os", "Ir", "Pt", "Au", "Hg", "Tl", "Pb",
    "Bi", "Po", "At", "Rn",
    // --- Period 7 ---
    "Fr", "Ra", "Ac", "Th", "Pa", "U", "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm",
    "Md", "No", "Lr", "Rf", "Db", "Sg", "Bh", "Hs", "Mt", "Ds", "Rg", "Cn", "Nh", "Fl",
    "Mc", "Lv", "Ts", "Og",
];

/// Elements treated as metals when classifying oxides.
///
/// Alkali, alkaline-earth, transition, post-transition, lanthanide and
/// actinide metals, plus Ge and Sb. Si, B, As and Te are excluded.
pub const METALS: &[&str] = &[
    "Li", "Be", "Na", "Mg", "Al", "K", "Ca", "Sc", "Ti", "V", "Cr", "Mn", "Fe", "Co",
    "Ni", "Cu", "Zn", "Ga", "Ge", "Rb", "Sr", "Y", "Zr", "Nb", "Mo", "Tc", "Ru", "Rh",
    "Pd", "Ag", "Cd", "In", "Sn", "Sb", "Cs", "Ba", "La", "Ce", "Pr", "Nd", "Pm", "Sm",
    "Eu", "Gd", "Tb", "Dy", "Ho", "Er", "Tm", "Yb", "Lu", "Hf", "Ta", "W", "Re", "Os",
    "Ir", "Pt", "Au", "Hg", "Tl", "Pb", "Bi", "Po", "Fr", "Ra", "Ac", "Th", "Pa", "U",
    "Np", "Pu", "Am", "Cm", "Bk", "Cf", "Es", "Fm", "Md", "No", "Lr",
];

/// Non-metals that may still appear in an accepted metal oxide.
pub const OXIDE_EXTRAS: &[&str] = &["As", "P", "O"];

/// Substrings marking common O-containing complex anions
/// (nitrates, phosphates, sulfates, carbonates).
pub const COMMON_COMPLEX: &[&str] = &[
    "NO3", "NO2", //
    "PO2", "PO3", "PO4", "PO5", //
    "SO4", "SO3", "SO2", //
    "CO3",
];

pub fn is_element(symbol: &str) -> bool {
    ELEMENTS.contains(&symbol)
}

/// `METALS ∪ {As, P, O}`: every element allowed in a metal oxide.
pub fn metal_oxide_elements() -> BTreeSet<String> {
    METALS
        .iter()
        .chain(OXIDE_EXTRAS)
        .map(|s| s.to_string())
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_metals_are_elements() {
        for m in METALS {
            assert!(is_element(m), "{m} is not an element");
        }
    }

    #[test]
    fn test_metal_oxide_elements() {
        let allowed = metal_oxide_elements();
        assert!(allowed.contains("Fe"));
        assert!(allowed.contains("O"));
        assert!(allowed.contains("As"));
        assert!(allowed.contains("P"));
        assert!(!allowed.contains("Si"));
        assert!(!allowed.contains("N"));
        assert!(!allowed.contains("S"));
    }

    #[test]
    fn test_no_duplicate_symbols() {
        let unique: BTreeSet<_> = ELEMENTS.iter().collect();
        assert_eq!(unique.len(), ELEMENTS.len());
        let metals: BTreeSet<_> = METALS.iter().collect();
        assert_eq!(metals.len(), METALS.len());
    }
}
