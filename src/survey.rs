use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkInfo {
    pub field: Option<String>,
    pub has_job: Option<String>,
    pub experience: Option<String>,
    pub is_manager: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EducationInfo {
    pub is_student: Option<String>,
    pub current_course: Option<String>,
    pub recent_course: Option<String>,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Activities {
    pub leisure: Vec<String>,
    pub hobbies: Vec<String>,
    pub sports: Vec<String>,
    pub travel: Vec<String>,
}

/// Background survey answers, as collected by the survey form.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SurveyData {
    pub work: WorkInfo,
    pub education: EducationInfo,
    pub living: Option<String>,
    pub activities: Activities,
    pub self_assessment: Option<String>,
}

impl SurveyData {
    /// Every selected answer in survey order: work field, living situation,
    /// student status, then activity picks. Blank and repeated entries are skipped.
    pub fn selected_answers(&self) -> Vec<String> {
        let singles = [
            self.work.field.as_deref(),
            self.living.as_deref(),
            self.education.is_student.as_deref(),
        ];
        let activities = [
            &self.activities.leisure,
            &self.activities.hobbies,
            &self.activities.sports,
            &self.activities.travel,
        ];

        let mut out: Vec<String> = Vec::new();
        let candidates = singles
            .into_iter()
            .flatten()
            .chain(activities.into_iter().flatten().map(String::as_str));
        for answer in candidates {
            let answer = answer.trim();
            if !answer.is_empty() && !out.iter().any(|a| a == answer) {
                out.push(answer.to_string());
            }
        }
        out
    }

    /// One-line profile for prompts and exports.
    pub fn profile_summary(&self) -> String {
        let or_blank = |v: &Option<String>| v.clone().unwrap_or_else(|| "not answered".to_string());

        let mut work = format!("Work: {}", or_blank(&self.work.field));
        if self.work.has_job.as_deref().is_some_and(is_yes) {
            if let Some(experience) = &self.work.experience {
                work.push_str(&format!(", experience: {experience}"));
            }
            if self.work.is_manager.as_deref().is_some_and(is_yes) {
                work.push_str(", manager");
            }
        }

        let mut education = format!("Student: {}", or_blank(&self.education.is_student));
        if let Some(course) = &self.education.current_course {
            education.push_str(&format!(", current course: {course}"));
        } else if let Some(course) = &self.education.recent_course {
            education.push_str(&format!(", recent course: {course}"));
        }

        let mut parts = vec![work, education, format!("Living: {}", or_blank(&self.living))];

        let groups = [
            ("Leisure", &self.activities.leisure),
            ("Hobbies", &self.activities.hobbies),
            ("Sports", &self.activities.sports),
        ];
        let activity: Vec<String> = groups
            .iter()
            .filter(|(_, items)| !items.is_empty())
            .map(|(label, items)| {
                let shown: Vec<&str> = items.iter().take(3).map(String::as_str).collect();
                format!("{label}: {}", shown.join(", "))
            })
            .collect();
        if !activity.is_empty() {
            parts.push(activity.join(" | "));
        }

        parts.join(" / ")
    }
}

fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_lowercase().as_str(), "yes" | "y" | "예" | "네")
}
