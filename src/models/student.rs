use serde::{Deserialize, Serialize};

use super::section::UserName;

/// Response from `/api/students/{id}/details/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentDetails {
    pub user: UserName,
    pub course: Course,
    pub section: StudentSection,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Course {
    pub id: i64,
    pub name: String,
}

/// The student's enrolled section, carrying only its mentor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StudentSection {
    pub mentor: SectionMentor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionMentor {
    pub user: UserName,
}

impl StudentDetails {
    pub fn mentor_name(&self) -> String {
        self.section.mentor.user.full_name()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_student_details() {
        let json = r#"{
            "user": {"first_name": "Demo", "last_name": "Student"},
            "course": {"id": 3, "name": "CS70"},
            "section": {"mentor": {"user": {"first_name": "Demo", "last_name": "Mentor"}}}
        }"#;
        let details: StudentDetails =
            serde_json::from_str(json).expect("Failed to parse student details");
        assert_eq!(details.user.full_name(), "Demo Student");
        assert_eq!(details.course.id, 3);
        assert_eq!(details.mentor_name(), "Demo Mentor");
    }
}
