//! Filename-derived display categories
//!
//! A category is a pure function of the file name against an ordered keyword
//! table; the first matching keyword wins and unmatched names fall back to
//! [`Category::Other`]. Categories are a client-side display convenience and
//! are never persisted server-side, so they are recomputed wherever shown
//! instead of being cached on the document.

use std::fmt;

/// Ordered (keywords, category) table; first match wins
///
/// "report" alone is intentionally not a keyword: only names carrying
/// "medical" or "record" classify as Medical Reports.
const KEYWORD_TABLE: &[(&[&str], Category)] = &[
    (&["medical", "record"], Category::MedicalReports),
    (&["insurance"], Category::Insurance),
    (&["lab", "test"], Category::LabResults),
    (&["therapy", "plan"], Category::TherapyPlans),
    (&["prescription", "rx"], Category::Prescriptions),
    (&["xray", "x-ray", "scan", "mri", "imaging"], Category::Imaging),
    (&["invoice", "bill", "receipt"], Category::Billing),
    (&["consent"], Category::ConsentForms),
];

/// Display category derived from a document's file name
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    MedicalReports,
    Insurance,
    LabResults,
    TherapyPlans,
    Prescriptions,
    Imaging,
    Billing,
    ConsentForms,
    /// Default for names matching no keyword
    Other,
}

impl Category {
    /// Classify a file name; total and deterministic
    pub fn classify(file_name: &str) -> Self {
        let lowered = file_name.to_lowercase();
        for (keywords, category) in KEYWORD_TABLE {
            if keywords.iter().any(|kw| lowered.contains(kw)) {
                return *category;
            }
        }
        Self::Other
    }

    /// Human-readable label
    pub fn label(&self) -> &'static str {
        match self {
            Self::MedicalReports => "Medical Reports",
            Self::Insurance => "Insurance",
            Self::LabResults => "Lab Results",
            Self::TherapyPlans => "Therapy Plans",
            Self::Prescriptions => "Prescriptions",
            Self::Imaging => "Imaging",
            Self::Billing => "Billing",
            Self::ConsentForms => "Consent Forms",
            Self::Other => "Other",
        }
    }

    /// Parse a label back into a category (case-insensitive)
    pub fn from_label(label: &str) -> Option<Self> {
        let wanted = label.trim().to_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|c| c.label().to_lowercase() == wanted)
    }

    /// All categories in display order
    pub fn all() -> &'static [Category] {
        &[
            Self::MedicalReports,
            Self::Insurance,
            Self::LabResults,
            Self::TherapyPlans,
            Self::Prescriptions,
            Self::Imaging,
            Self::Billing,
            Self::ConsentForms,
            Self::Other,
        ]
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Category filter applied to the document list
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CategoryFilter {
    /// Sentinel: show every document
    #[default]
    All,
    /// Show only documents classifying to the given category
    Only(Category),
}

impl CategoryFilter {
    /// Whether a document with the given file name passes the filter
    pub fn matches(&self, file_name: &str) -> bool {
        match self {
            Self::All => true,
            Self::Only(category) => Category::classify(file_name) == *category,
        }
    }

    /// Parse a filter from user input; "all" (or empty) means no filter
    pub fn parse(input: &str) -> Option<Self> {
        let trimmed = input.trim();
        if trimmed.is_empty() || trimmed.eq_ignore_ascii_case("all") {
            return Some(Self::All);
        }
        Category::from_label(trimmed).map(Self::Only)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_keyword_classification() {
        assert_eq!(Category::classify("medical-report.pdf"), Category::MedicalReports);
        assert_eq!(Category::classify("patient-record-2024.pdf"), Category::MedicalReports);
        assert_eq!(Category::classify("insurance-card.png"), Category::Insurance);
        assert_eq!(Category::classify("lab-panel.pdf"), Category::LabResults);
        assert_eq!(Category::classify("blood-test.csv"), Category::LabResults);
        assert_eq!(Category::classify("therapy-notes.docx"), Category::TherapyPlans);
        assert_eq!(Category::classify("care-plan.pdf"), Category::TherapyPlans);
        assert_eq!(Category::classify("rx-refill.pdf"), Category::Prescriptions);
        assert_eq!(Category::classify("chest-xray.jpeg"), Category::Imaging);
        assert_eq!(Category::classify("invoice-march.pdf"), Category::Billing);
        assert_eq!(Category::classify("consent-form.pdf"), Category::ConsentForms);
    }

    #[test]
    fn test_plain_report_is_other() {
        // "report" alone carries no keyword; only "medical"/"record" do
        assert_eq!(Category::classify("report.pdf"), Category::Other);
        assert_eq!(Category::classify("notes.txt"), Category::Other);
        assert_eq!(Category::classify(""), Category::Other);
    }

    #[test]
    fn test_first_match_wins() {
        // "medical" appears before "test" in the table
        assert_eq!(Category::classify("medical-test.pdf"), Category::MedicalReports);
        // "lab" appears before "plan"
        assert_eq!(Category::classify("lab-plan.pdf"), Category::LabResults);
    }

    #[test]
    fn test_case_insensitive_and_deterministic() {
        assert_eq!(Category::classify("MEDICAL-Report.PDF"), Category::MedicalReports);
        for _ in 0..3 {
            assert_eq!(Category::classify("Lab-Results.pdf"), Category::LabResults);
        }
    }

    #[test]
    fn test_label_round_trip() {
        for category in Category::all() {
            assert_eq!(Category::from_label(category.label()), Some(*category));
        }
        assert_eq!(Category::from_label("no such thing"), None);
    }

    #[test]
    fn test_filter_matching() {
        assert!(CategoryFilter::All.matches("anything.bin"));
        let labs = CategoryFilter::Only(Category::LabResults);
        assert!(labs.matches("lab-panel.pdf"));
        assert!(!labs.matches("consent.pdf"));
    }

    #[test]
    fn test_filter_parsing() {
        assert_eq!(CategoryFilter::parse("all"), Some(CategoryFilter::All));
        assert_eq!(CategoryFilter::parse(""), Some(CategoryFilter::All));
        assert_eq!(
            CategoryFilter::parse("Lab Results"),
            Some(CategoryFilter::Only(Category::LabResults))
        );
        assert_eq!(CategoryFilter::parse("bogus"), None);
    }
}
