//! Claim support document templates.

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[cfg_attr(feature = "ts", derive(ts_rs::TS))]
#[cfg_attr(feature = "ts", ts(export))]
#[serde(rename_all = "camelCase")]
pub enum TemplateId {
    Personal,
    Nexus,
    Buddy,
    ClaimStatement,
    Adl,
    Secondary,
    Reconsideration,
    AppealCover,
    WorkImpact,
    Tdiu,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DocumentTemplate {
    pub id: TemplateId,
    pub title: &'static str,
    pub description: &'static str,
    /// What the generated draft should be, appended to the shared prompt.
    pub instruction: &'static str,
}

pub const DOCUMENT_TEMPLATES: &[DocumentTemplate] = &[
    DocumentTemplate {
        id: TemplateId::Personal,
        title: "Personal Statement",
        description: "Your own detailed account of your condition and its impact.",
        instruction: "Generate a draft Personal Statement (for VA Form 21-4138) in the veteran's own voice, covering the in-service event, current symptoms, and how the condition affects work and personal life.",
    },
    DocumentTemplate {
        id: TemplateId::Nexus,
        title: "Nexus Letter",
        description: "A letter from a medical professional linking your condition to your service.",
        instruction: "Generate a draft Nexus Letter for a medical professional to review and sign, stating that the condition is at least as likely as not related to military service.",
    },
    DocumentTemplate {
        id: TemplateId::Buddy,
        title: "Buddy/Lay Statement",
        description: "A statement from someone who knows you, supporting your claim.",
        instruction: "Generate a draft Buddy/Lay Statement (for VA Form 21-10210) written by someone who has observed the veteran's symptoms.",
    },
    DocumentTemplate {
        id: TemplateId::ClaimStatement,
        title: "VA Claim Statement (Short Form)",
        description: "A concise statement for VA Form 21-4138.",
        instruction: "Generate a concise VA Claim Statement for VA Form 21-4138.",
    },
    DocumentTemplate {
        id: TemplateId::Adl,
        title: "Activities of Daily Living (ADLs)",
        description: "Describes how your condition affects daily tasks.",
        instruction: "Generate an Activities of Daily Living (ADLs) Impact Statement describing how the condition limits everyday tasks.",
    },
    DocumentTemplate {
        id: TemplateId::Secondary,
        title: "Secondary Condition Statement",
        description: "Explains how one condition caused another.",
        instruction: "Generate a Secondary Condition Statement explaining how the primary service-connected condition caused or aggravated this condition.",
    },
    DocumentTemplate {
        id: TemplateId::Reconsideration,
        title: "Higher-Level Review Request",
        description: "Challenge a low rating or denial.",
        instruction: "Generate a draft request for a Higher-Level Review, identifying the errors in the prior decision.",
    },
    DocumentTemplate {
        id: TemplateId::AppealCover,
        title: "Appeal Cover Letter",
        description: "A cover letter for a Notice of Disagreement.",
        instruction: "Generate a formal Appeal Cover Letter for a Notice of Disagreement (NOD).",
    },
    DocumentTemplate {
        id: TemplateId::WorkImpact,
        title: "Work Impact Statement",
        description: "Details how your condition affects your job performance.",
        instruction: "Generate a detailed Work Impact Statement covering missed work, reduced productivity, and accommodations.",
    },
    DocumentTemplate {
        id: TemplateId::Tdiu,
        title: "TDIU Support Statement",
        description: "Supports a claim for Total Disability based on Individual Unemployability.",
        instruction: "Generate a support statement for a TDIU application explaining why the veteran cannot maintain substantially gainful employment.",
    },
];

impl TemplateId {
    pub fn template(self) -> &'static DocumentTemplate {
        DOCUMENT_TEMPLATES
            .iter()
            .find(|t| t.id == self)
            .unwrap_or(&DOCUMENT_TEMPLATES[0])
    }

    pub fn title(self) -> &'static str {
        self.template().title
    }

    /// Free members may generate this template.
    pub fn is_free(self) -> bool {
        self == TemplateId::Personal
    }

    pub fn as_str(self) -> &'static str {
        match self {
            TemplateId::Personal => "personal",
            TemplateId::Nexus => "nexus",
            TemplateId::Buddy => "buddy",
            TemplateId::ClaimStatement => "claimStatement",
            TemplateId::Adl => "adl",
            TemplateId::Secondary => "secondary",
            TemplateId::Reconsideration => "reconsideration",
            TemplateId::AppealCover => "appealCover",
            TemplateId::WorkImpact => "workImpact",
            TemplateId::Tdiu => "tdiu",
        }
    }

    pub fn parse(s: &str) -> Option<Self> {
        DOCUMENT_TEMPLATES
            .iter()
            .map(|t| t.id)
            .find(|id| id.as_str().eq_ignore_ascii_case(s))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_id_has_a_template() {
        assert_eq!(DOCUMENT_TEMPLATES.len(), 10);
        for t in DOCUMENT_TEMPLATES {
            assert_eq!(t.id.template().title, t.title);
            assert_eq!(TemplateId::parse(t.id.as_str()), Some(t.id));
        }
    }

    #[test]
    fn test_parse_is_case_insensitive() {
        assert_eq!(TemplateId::parse("claimstatement"), Some(TemplateId::ClaimStatement));
        assert_eq!(TemplateId::parse("bogus"), None);
    }

    #[test]
    fn test_serde_names_match_as_str() {
        let json = serde_json::to_string(&TemplateId::AppealCover).expect("serialize template id");
        assert_eq!(json, "\"appealCover\"");
    }

    #[test]
    fn test_only_personal_is_free() {
        assert!(TemplateId::Personal.is_free());
        assert!(!TemplateId::Nexus.is_free());
    }
}
