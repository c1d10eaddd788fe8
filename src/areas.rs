const AREA_COLORS: [(&str, &str); 5] = [
    ("Presidência", "#1E3A8A"),
    ("Projetos", "#0EA5E9"),
    ("Comercial", "#F59E0B"),
    ("Marketing", "#EC4899"),
    ("Gestão de Pessoas", "#10B981"),
];

pub const DEFAULT_AREA_COLOR: &str = "#6B7280";

/// Hex color used to tag an area; unknown areas are gray.
pub fn cores_areas(area: &str) -> &'static str {
    AREA_COLORS
        .iter()
        .find(|(name, _)| *name == area)
        .map(|(_, color)| *color)
        .unwrap_or(DEFAULT_AREA_COLOR)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn named_areas_have_fixed_colors() {
        assert_eq!(cores_areas("Presidência"), "#1E3A8A");
        assert_eq!(cores_areas("Projetos"), "#0EA5E9");
        assert_eq!(cores_areas("Comercial"), "#F59E0B");
        assert_eq!(cores_areas("Marketing"), "#EC4899");
        assert_eq!(cores_areas("Gestão de Pessoas"), "#10B981");
    }

    #[test]
    fn unknown_areas_are_gray() {
        assert_eq!(cores_areas(""), "#6B7280");
        assert_eq!(cores_areas("Financeiro"), "#6B7280");
        assert_eq!(cores_areas("marketing"), "#6B7280");
    }
}
