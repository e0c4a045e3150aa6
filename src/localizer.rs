// Localized result message construction

use crate::types::{DetectionReport, LanguageCode};

// Placeholders for fields the service omitted; the second one mirrors the
// service's own fallback wording.
const UNKNOWN_DISEASE: &str = "unknown";
const NO_INFO: &str = "No info available";

/// Build the display string for a detection report in the selected language.
///
/// The recognized set is closed: `hi` and `te` get native templates, every
/// other code (including unrecognized ones) falls back to English. Absent
/// report fields are substituted with placeholders; this never fails.
pub fn localize(report: &DetectionReport, lang: &LanguageCode) -> String {
    let disease = report.disease.as_deref().unwrap_or(UNKNOWN_DISEASE);
    let info = report.info.as_deref().unwrap_or(NO_INFO);

    match lang.as_str() {
        "hi" => format!("रोग का पता चला: {}. {}", disease, info),
        "te" => format!("వ్యాధి గుర్తించబడింది: {}. {}", disease, info),
        _ => format!("Disease detected: {}. {}", disease, info),
    }
}
