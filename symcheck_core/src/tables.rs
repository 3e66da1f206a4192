//! Built-in remedy and specialty tables.

use crate::lookup::LookupTable;

/// Specialty recommended when no table entry matches a disease.
pub const DEFAULT_SPECIALTY: &str = "General Physician";

/// Remedies offered for diseases without a dedicated entry.
pub const GENERIC_REMEDIES: [&str; 4] = [
    "Get plenty of rest",
    "Stay well hydrated",
    "Eat light, balanced meals",
    "Consult a doctor if symptoms persist or worsen",
];

const REMEDIES: &[(&str, &[&str])] = &[
    (
        "Flu",
        &[
            "Drink warm fluids",
            "Take proper rest",
            "Steam inhalation",
            "Gargle with salt water",
        ],
    ),
    (
        "Cold",
        &[
            "Stay hydrated",
            "Drink ginger tea",
            "Use nasal spray",
            "Rest well",
        ],
    ),
    (
        "Common Cold",
        &[
            "Stay hydrated",
            "Drink ginger tea",
            "Use saline nasal drops",
            "Rest well",
        ],
    ),
    (
        "Dengue",
        &[
            "Drink plenty of fluids",
            "Papaya leaf juice (consult doctor)",
            "Take rest",
            "Avoid painkillers without prescription",
        ],
    ),
    (
        "Migraine",
        &[
            "Rest in dark quiet room",
            "Apply cold compress",
            "Stay hydrated",
            "Avoid loud noise",
        ],
    ),
    (
        "Typhoid",
        &[
            "Drink boiled water",
            "Eat light foods",
            "Take prescribed antibiotics",
            "Maintain hygiene",
        ],
    ),
    (
        "Malaria",
        &[
            "Take prescribed antimalarials",
            "Drink plenty of fluids",
            "Use mosquito nets",
            "Rest until fever subsides",
        ],
    ),
    (
        "Pneumonia",
        &[
            "Complete prescribed antibiotics",
            "Drink warm fluids",
            "Use a humidifier",
            "Rest and avoid exertion",
        ],
    ),
    (
        "Bronchial Asthma",
        &[
            "Keep inhaler within reach",
            "Avoid smoke and dust",
            "Practice slow breathing exercises",
            "Sit upright during attacks",
        ],
    ),
    (
        "Allergy",
        &[
            "Avoid known allergens",
            "Rinse nose with saline",
            "Keep windows closed on high pollen days",
            "Wash bedding in hot water",
        ],
    ),
    (
        "Hepatitis A",
        &[
            "Avoid alcohol",
            "Eat small frequent meals",
            "Rest as much as possible",
            "Wash hands thoroughly",
        ],
    ),
    (
        "Fatigue Syndrome",
        &[
            "Keep a regular sleep schedule",
            "Pace daily activities",
            "Limit caffeine",
            "Try gentle stretching",
        ],
    ),
    (
        "Muscle Pain",
        &[
            "Apply warm compress",
            "Gently stretch the muscle",
            "Rest the affected area",
            "Massage with light pressure",
        ],
    ),
];

const SPECIALTIES: &[(&str, &str)] = &[
    ("Flu", "General Physician"),
    ("Cold", "General Physician"),
    ("Common Cold", "General Physician"),
    ("Fatigue Syndrome", "General Physician"),
    ("Dengue", "Infectious Disease Specialist"),
    ("Malaria", "Infectious Disease Specialist"),
    ("Typhoid", "Infectious Disease Specialist"),
    ("Migraine", "Neurologist"),
    ("Bronchial Asthma", "Pulmonologist"),
    ("Pneumonia", "Pulmonologist"),
    ("Allergy", "Allergist"),
    ("Hepatitis A", "Gastroenterologist"),
    ("Muscle Pain", "Orthopedist"),
];

fn owned(items: &[&str]) -> Vec<String> {
    items.iter().map(ToString::to_string).collect()
}

/// Disease → home remedies, falling back to [`GENERIC_REMEDIES`].
#[must_use]
pub fn default_remedy_table() -> LookupTable<Vec<String>> {
    LookupTable::new(
        REMEDIES
            .iter()
            .map(|(disease, remedies)| ((*disease).to_string(), owned(remedies)))
            .collect(),
        owned(&GENERIC_REMEDIES),
    )
}

/// Disease → doctor specialty, falling back to [`DEFAULT_SPECIALTY`].
#[must_use]
pub fn default_specialty_table() -> LookupTable<String> {
    LookupTable::new(
        SPECIALTIES
            .iter()
            .map(|(disease, specialty)| ((*disease).to_string(), (*specialty).to_string()))
            .collect(),
        DEFAULT_SPECIALTY.to_string(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unknown_disease_gets_exactly_the_generic_remedies() {
        let table = default_remedy_table();
        assert_eq!(table.get("Zebra Fever Syndrome X"), &owned(&GENERIC_REMEDIES));
        assert!(!table.get("Zebra Fever Syndrome X").is_empty());
    }

    #[test]
    fn known_disease_remedies() {
        let table = default_remedy_table();
        assert_eq!(table.get("flu")[0], "Drink warm fluids");
        assert_eq!(table.get("Dengue").len(), 4);
    }

    #[test]
    fn specialty_fallback() {
        let table = default_specialty_table();
        assert_eq!(table.get("Migraine"), "Neurologist");
        assert_eq!(table.get("chronic migraine"), "Neurologist");
        assert_eq!(table.get("Unknown"), DEFAULT_SPECIALTY);
    }

    #[test]
    fn every_remedy_list_is_non_empty() {
        assert!(REMEDIES.iter().all(|(_, r)| !r.is_empty()));
    }
}
