//! Template archetype inference from hole geometry and name hints.

use crate::template::{Hole, TemplateType};
use crate::util::math::aspect_ratio;

/// Filename keywords checked in order; the first substring hit wins.
const KEYWORDS: &[(&str, TemplateType)] = &[
    ("photostrip", TemplateType::Strip),
    ("strip", TemplateType::Strip),
    ("card", TemplateType::Card),
    ("collage", TemplateType::Collage),
    ("grid", TemplateType::Collage),
    ("solo", TemplateType::Solo),
    ("single", TemplateType::Solo),
];

/// Mean aspect ratio range treated as square enough for a card layout.
const CARD_ASPECT_RANGE: (f32, f32) = (0.8, 1.2);

/// Returns the template type named by a keyword in `name`, if any.
pub fn type_from_name(name: &str) -> Option<TemplateType> {
    let lower = name.to_lowercase();
    KEYWORDS
        .iter()
        .find(|(keyword, _)| lower.contains(keyword))
        .map(|&(_, ty)| ty)
}

/// Mean `width / height` over the holes, 0 for an empty slice.
pub fn mean_aspect_ratio(holes: &[Hole]) -> f32 {
    if holes.is_empty() {
        return 0.0;
    }
    let sum: f32 = holes.iter().map(|h| aspect_ratio(h.width, h.height)).sum();
    sum / holes.len() as f32
}

/// Classifies a template, preferring a name keyword over hole geometry.
pub fn classify(holes: &[Hole], name: Option<&str>) -> TemplateType {
    if let Some(ty) = name.and_then(type_from_name) {
        return ty;
    }
    classify_by_geometry(holes)
}

/// Classifies a template from hole count and shape alone.
pub fn classify_by_geometry(holes: &[Hole]) -> TemplateType {
    match holes.len() {
        1 => TemplateType::Solo,
        4 => {
            let ratio = mean_aspect_ratio(holes);
            if (CARD_ASPECT_RANGE.0..=CARD_ASPECT_RANGE.1).contains(&ratio) {
                TemplateType::Card
            } else {
                TemplateType::Collage
            }
        }
        6 => TemplateType::Strip,
        n if n <= 2 => TemplateType::Solo,
        n if n <= 4 => TemplateType::Collage,
        _ => TemplateType::Strip,
    }
}
