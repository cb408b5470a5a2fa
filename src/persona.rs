//! Expert personas and their fixed system instructions

use serde::{Deserialize, Serialize};
use std::fmt;

const PHYSICAL_THERAPIST_INSTRUCTION: &str = concat!(
    "あなたは理学療法士です。お客様の健康維持のため、",
    "適切なアドバイスで、身体的なサポートを提案し、",
    "リハビリテーションに関する専門家です。",
    "専門用語を使用せず、日本語で中学生でも理解できるように",
    "分かりやすく説明してください。",
    "200文字以内で回答してください。",
);

const NUTRITIONIST_INSTRUCTION: &str = concat!(
    "あなたは管理栄養士です。お客様の健康維持のため、",
    "適切なアドバイスで、栄養バランスの取れた食事プランを提案し、",
    "健康的なライフスタイルに関する専門家です。",
    "専門用語を使用せず、日本語で中学生でも理解できるように",
    "分かりやすく説明してください。",
    "200文字以内で回答してください。",
);

/// The closed set of selectable experts
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PersonaId {
    PhysicalTherapist,
    Nutritionist,
}

impl PersonaId {
    /// All personas, in the order the page lists them
    pub const ALL: [PersonaId; 2] = [PersonaId::PhysicalTherapist, PersonaId::Nutritionist];

    /// Stable identifier used on the wire
    pub fn slug(self) -> &'static str {
        match self {
            PersonaId::PhysicalTherapist => "physical_therapist",
            PersonaId::Nutritionist => "nutritionist",
        }
    }

    /// Name shown to the user
    pub fn label(self) -> &'static str {
        match self {
            PersonaId::PhysicalTherapist => "理学療法士",
            PersonaId::Nutritionist => "管理栄養士",
        }
    }
}

impl fmt::Display for PersonaId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.slug())
    }
}

/// System instruction for a persona
pub fn instruction_for(persona: PersonaId) -> &'static str {
    match persona {
        PersonaId::PhysicalTherapist => PHYSICAL_THERAPIST_INSTRUCTION,
        PersonaId::Nutritionist => NUTRITIONIST_INSTRUCTION,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_every_persona_has_distinct_instruction() {
        let pt = instruction_for(PersonaId::PhysicalTherapist);
        let nu = instruction_for(PersonaId::Nutritionist);
        assert_ne!(pt, nu);
        assert!(pt.starts_with("あなたは理学療法士です。"));
        assert!(nu.starts_with("あなたは管理栄養士です。"));
    }

    #[test]
    fn test_instructions_carry_register_and_length_target() {
        for persona in PersonaId::ALL {
            let instruction = instruction_for(persona);
            assert!(instruction.contains("専門用語を使用せず"));
            assert!(instruction.contains("200文字以内で回答してください。"));
        }
    }

    #[test]
    fn test_slug_matches_serde() {
        for persona in PersonaId::ALL {
            let json = serde_json::to_value(persona).unwrap();
            assert_eq!(json, persona.slug());
            let back: PersonaId = serde_json::from_value(json).unwrap();
            assert_eq!(back, persona);
        }
    }

    #[test]
    fn test_unknown_slug_rejected() {
        assert!(serde_json::from_str::<PersonaId>("\"chef\"").is_err());
    }
}
