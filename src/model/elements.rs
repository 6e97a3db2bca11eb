//! Per-element covalent radii and CPK colors.
//!
//! Radii are in angstroms; colors are standard CPK in 0-1 RGB. Element
//! symbols are matched case-insensitively against the common uppercase
//! forms produced by structure parsers.

/// Covalent radius in angstroms for an element symbol.
///
/// Falls back to a generic 0.8 for unknown elements so that unrecognized
/// heteroatoms still render at a plausible size.
#[must_use]
pub fn element_covalent_radius(element: &str) -> f32 {
    match normalize(element).as_str() {
        "H" => 0.37,
        "C" => 0.77,
        "N" => 0.75,
        "O" => 0.73,
        "F" => 0.71,
        "NA" => 1.54,
        "MG" => 1.30,
        "P" => 1.06,
        "S" => 1.02,
        "CL" => 0.99,
        "K" => 1.96,
        "CA" => 1.74,
        "MN" => 1.39,
        "FE" => 1.25,
        "CO" => 1.26,
        "NI" => 1.21,
        "CU" => 1.38,
        "ZN" => 1.31,
        "SE" => 1.16,
        "BR" => 1.14,
        "I" => 1.33,
        _ => 0.8,
    }
}

/// Standard CPK color for an element symbol (RGB, 0-1 range).
///
/// Unknown elements fall back to a neutral pink so they remain visible
/// without colliding with the carbon gray.
#[must_use]
pub fn element_color(element: &str) -> [f32; 3] {
    match normalize(element).as_str() {
        "H" => [1.0, 1.0, 1.0],
        "C" => [0.3, 0.3, 0.3],
        "N" => [0.19, 0.31, 0.97],
        "O" => [1.0, 0.05, 0.05],
        "F" | "CL" => [0.12, 0.94, 0.12],
        "NA" => [0.67, 0.36, 0.95],
        "MG" => [0.54, 1.0, 0.0],
        "P" => [1.0, 0.5, 0.0],
        "S" => [1.0, 1.0, 0.19],
        "K" => [0.56, 0.25, 0.83],
        "CA" => [0.24, 1.0, 0.0],
        "MN" => [0.61, 0.48, 0.78],
        "FE" => [0.88, 0.4, 0.2],
        "CO" => [0.94, 0.56, 0.63],
        "NI" => [0.31, 0.82, 0.31],
        "CU" => [0.78, 0.5, 0.2],
        "ZN" => [0.49, 0.5, 0.69],
        "SE" => [1.0, 0.63, 0.0],
        "BR" => [0.65, 0.16, 0.16],
        "I" => [0.58, 0.0, 0.58],
        _ => [1.0, 0.41, 0.71],
    }
}

fn normalize(element: &str) -> String {
    element.trim().to_uppercase()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn known_elements_have_distinct_colors() {
        assert_ne!(element_color("C"), element_color("N"));
        assert_ne!(element_color("N"), element_color("O"));
    }

    #[test]
    fn lookup_is_case_insensitive() {
        assert_eq!(element_color("fe"), element_color("FE"));
        assert_eq!(
            element_covalent_radius("zn"),
            element_covalent_radius("ZN")
        );
    }

    #[test]
    fn unknown_element_gets_fallbacks() {
        assert_eq!(element_covalent_radius("XX"), 0.8);
        assert_eq!(element_color("XX"), [1.0, 0.41, 0.71]);
    }
}
