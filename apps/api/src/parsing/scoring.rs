use crate::models::resume::ParsedResume;

/// Weight each recovered field contributes to the confidence score.
#[derive(Debug, Clone)]
pub struct ConfidenceWeights {
    pub email: f64,
    pub name: f64,
    pub experience: f64,
    pub education: f64,
    pub skills: f64,
}

impl Default for ConfidenceWeights {
    fn default() -> Self {
        Self {
            email: 1.0,
            name: 1.0,
            experience: 2.0,
            education: 1.0,
            skills: 1.0,
        }
    }
}

impl ConfidenceWeights {
    fn total(&self) -> f64 {
        self.email + self.name + self.experience + self.education + self.skills
    }
}

/// Weighted coverage ratio of the recovered fields, in [0, 1].
/// Only meaningful for results produced without the primary source.
pub fn score_confidence(resume: &ParsedResume, weights: &ConfidenceWeights) -> f64 {
    let possible = weights.total();
    if possible <= 0.0 {
        return 0.0;
    }

    let info = &resume.personal_info;
    let achieved = [
        (!info.email.is_empty(), weights.email),
        (!info.name.is_empty(), weights.name),
        (!resume.experience.is_empty(), weights.experience),
        (!resume.education.is_empty(), weights.education),
        (!resume.skills.is_empty(), weights.skills),
    ]
    .iter()
    .filter(|(present, _)| *present)
    .map(|(_, weight)| weight)
    .sum::<f64>();

    (achieved / possible).clamp(0.0, 1.0)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::resume::{EducationEntry, ExperienceEntry, PersonalInfo, SkillSet};

    #[test]
    fn test_empty_resume_scores_zero() {
        let score = score_confidence(&ParsedResume::default(), &ConfidenceWeights::default());
        assert_eq!(score, 0.0);
    }

    #[test]
    fn test_full_resume_scores_one() {
        let resume = ParsedResume {
            personal_info: PersonalInfo {
                name: "Jane Doe".into(),
                email: "jane@x.com".into(),
                ..Default::default()
            },
            experience: vec![ExperienceEntry::default()],
            education: vec![EducationEntry::default()],
            skills: ["Go"].into_iter().collect::<SkillSet>(),
            ..Default::default()
        };
        assert_eq!(score_confidence(&resume, &ConfidenceWeights::default()), 1.0);
    }

    #[test]
    fn test_experience_counts_double() {
        let resume = ParsedResume {
            experience: vec![ExperienceEntry::default()],
            ..Default::default()
        };
        let score = score_confidence(&resume, &ConfidenceWeights::default());
        assert!((score - 2.0 / 6.0).abs() < 1e-9);
    }

    #[test]
    fn test_zero_weights_do_not_divide_by_zero() {
        let weights = ConfidenceWeights {
            email: 0.0,
            name: 0.0,
            experience: 0.0,
            education: 0.0,
            skills: 0.0,
        };
        assert_eq!(score_confidence(&ParsedResume::default(), &weights), 0.0);
    }
}
