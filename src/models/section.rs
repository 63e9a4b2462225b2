use serde::{Deserialize, Serialize};

/// Name fields of a backend user record. The backend nests these under a
/// `user` key on students and mentors alike.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserName {
    #[serde(default)]
    pub first_name: String,
    #[serde(default)]
    pub last_name: String,
}

impl UserName {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }

    /// "Last, First" for list display.
    pub fn display_name(&self) -> String {
        format!("{}, {}", self.last_name, self.first_name)
    }
}

/// Response from `/api/sections/{id}/details/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SectionDetails {
    pub mentor: Mentor,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Mentor {
    pub course: MentorCourse,
    pub user: UserName,
}

/// Course as nested inside a mentor record (name only).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MentorCourse {
    pub name: String,
}

/// One roster entry from `/api/sections/{id}/students/`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RosterStudent {
    pub id: i64,
    pub user: UserName,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_section_details() {
        let json = r#"{"mentor":{"course":{"name":"CS70"},"user":{"first_name":"Demo","last_name":"Mentor"}}}"#;
        let details: SectionDetails =
            serde_json::from_str(json).expect("Failed to parse section details");
        assert_eq!(details.mentor.course.name, "CS70");
        assert_eq!(details.mentor.user.full_name(), "Demo Mentor");
    }

    #[test]
    fn test_parse_roster() {
        let json = r#"[{"id":1,"user":{"first_name":"A","last_name":"B"}},{"id":2,"user":{"first_name":"C","last_name":"D"}}]"#;
        let roster: Vec<RosterStudent> = serde_json::from_str(json).expect("Failed to parse roster");
        assert_eq!(roster.len(), 2);
        assert_eq!(roster[0].id, 1);
        assert_eq!(roster[1].user.display_name(), "D, C");
    }
}
