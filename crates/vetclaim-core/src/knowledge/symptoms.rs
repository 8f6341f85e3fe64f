//! Screening questions asked before suggesting presumptive conditions.
//!
//! The symptom id doubles as a match term: a presumptive condition is
//! suggested when its lowercased name contains the id of a symptom the
//! veteran answered yes to.

pub const PRESUMPTIVE_SYMPTOM_QUESTIONS: &[(&str, &str)] = &[
    (
        "asthma",
        "Do you have difficulty breathing, wheezing, or shortness of breath, especially after activity?",
    ),
    (
        "rhinitis",
        "Do you experience seasonal allergies, sneezing, a chronic runny nose, or congestion?",
    ),
    (
        "sinusitis",
        "Do you suffer from frequent sinus infections, facial pressure, or headaches?",
    ),
    (
        "copd",
        "Do you have a chronic cough, produce a lot of mucus, or feel constantly short of breath?",
    ),
    (
        "gastrointestinal cancer",
        "Are you experiencing unexplained stomach pain, changes in bowel habits, or digestive issues?",
    ),
    (
        "melanoma",
        "Have you noticed any new, unusual, or changing moles or spots on your skin?",
    ),
];

pub fn question_for(symptom_id: &str) -> Option<&'static str> {
    PRESUMPTIVE_SYMPTOM_QUESTIONS
        .iter()
        .find(|(id, _)| id.eq_ignore_ascii_case(symptom_id))
        .map(|(_, question)| *question)
}

/// Logging guidance shown next to a condition's symptom tracker.
pub fn logging_tip(condition: &str) -> &'static str {
    match condition {
        "Radiculopathy" => "For nerve pain, be descriptive about the type and frequency of your symptoms. The VA distinguishes between mild, moderate, and severe nerve issues, so describe the sensation and where it occurs.",
        "Irritable Bowel Syndrome (IBS)" => "The VA rates IBS on the severity of abdominal distress, diarrhea, and constipation. Show that symptoms are frequent and severe enough to interfere with daily life.",
        "Gastroesophageal Reflux Disease (GERD)" => "Document the frequency and severity of heartburn, regurgitation, and any difficulty swallowing. Note if symptoms are worse at night or disrupt your sleep.",
        _ => "For any condition, document the frequency, duration, and severity of your symptoms and, most importantly, their impact on your daily life and ability to work.",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_question_lookup() {
        assert!(question_for("copd").is_some_and(|q| q.contains("chronic cough")));
        assert!(question_for("COPD").is_some());
        assert!(question_for("tinnitus").is_none());
    }

    #[test]
    fn test_logging_tip_falls_back() {
        assert!(logging_tip("Radiculopathy").contains("nerve"));
        assert!(logging_tip("Tinnitus").contains("frequency, duration, and severity"));
    }
}
