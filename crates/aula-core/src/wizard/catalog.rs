//! Static option lists offered by the wizard.
//!
//! Methodologies and accessibility options are stored in the wizard state by
//! id; the request builder sends display names. Ids that are not in the
//! catalog (e.g. restored from an older draft) pass through verbatim.

/// An option with a stable id and a display label.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogEntry {
    pub id: &'static str,
    pub label: &'static str,
}

const fn entry(id: &'static str, label: &'static str) -> CatalogEntry {
    CatalogEntry { id, label }
}

pub const GRADES: &[&str] = &[
    "Early childhood",
    "1st grade",
    "2nd grade",
    "3rd grade",
    "4th grade",
    "5th grade",
    "6th grade",
    "7th grade",
    "8th grade",
    "9th grade",
    "1st year (high school)",
    "2nd year (high school)",
    "3rd year (high school)",
];

pub const SUBJECTS: &[&str] = &[
    "Portuguese",
    "Mathematics",
    "Science",
    "History",
    "Geography",
    "Art",
    "Physical Education",
    "English",
    "Biology",
    "Chemistry",
    "Physics",
    "Philosophy",
    "Sociology",
];

pub const METHODOLOGIES: &[CatalogEntry] = &[
    entry("active_learning", "Active learning"),
    entry("project_based", "Project-based learning"),
    entry("flipped_classroom", "Flipped classroom"),
    entry("gamification", "Gamification"),
    entry("problem_based", "Problem-based learning"),
    entry("inquiry_based", "Inquiry-based learning"),
    entry("cooperative_learning", "Cooperative learning"),
    entry("rotation_stations", "Station rotation"),
    entry("expository", "Dialogued lecture"),
];

pub const ACCESSIBILITY_OPTIONS: &[CatalogEntry] = &[
    entry("visual_impairment", "Adapted for visual impairment"),
    entry("hearing_impairment", "Adapted for hearing impairment"),
    entry("adhd", "ADHD-friendly pacing"),
    entry("autism", "Autism-friendly structure"),
    entry("dyslexia", "Dyslexia-friendly text"),
    entry("intellectual_disability", "Simplified for intellectual disability"),
    entry("large_print", "Large print"),
];

fn label_for<'a>(entries: &[CatalogEntry], id: &'a str) -> &'a str {
    entries
        .iter()
        .find(|e| e.id == id)
        .map_or(id, |e| e.label)
}

pub fn methodology_name(id: &str) -> &str {
    label_for(METHODOLOGIES, id)
}

pub fn accessibility_label(id: &str) -> &str {
    label_for(ACCESSIBILITY_OPTIONS, id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_ids_map_to_labels() {
        assert_eq!(methodology_name("gamification"), "Gamification");
        assert_eq!(accessibility_label("large_print"), "Large print");
    }

    #[test]
    fn test_unknown_ids_pass_through() {
        assert_eq!(methodology_name("montessori"), "montessori");
    }

    #[test]
    fn test_ids_are_unique() {
        for list in [METHODOLOGIES, ACCESSIBILITY_OPTIONS] {
            let mut ids: Vec<&str> = list.iter().map(|e| e.id).collect();
            ids.sort_unstable();
            ids.dedup();
            assert_eq!(ids.len(), list.len());
        }
    }
}
