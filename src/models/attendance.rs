use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

/// Attendance outcome for one student on one date.
///
/// The wire codes (`PR`, `EX`, `UN`) are a compatibility contract with
/// the backend and must not be renamed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Presence {
    Present,
    Excused,
    Unexcused,
}

impl Presence {
    /// Wire code sent to and received from the backend.
    pub fn code(&self) -> &'static str {
        match self {
            Presence::Present => "PR",
            Presence::Excused => "EX",
            Presence::Unexcused => "UN",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code {
            "PR" => Some(Presence::Present),
            "EX" => Some(Presence::Excused),
            "UN" => Some(Presence::Unexcused),
            _ => None,
        }
    }
}

impl std::fmt::Display for Presence {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Presence::Present => write!(f, "Present"),
            Presence::Excused => write!(f, "Excused absence"),
            Presence::Unexcused => write!(f, "Unexcused absence"),
        }
    }
}

/// One attendance record as returned by `/api/students/{id}/attendances/`.
///
/// The backend may send a presence code outside the three known values
/// (historically an empty string for "not yet taken"), so the raw code is
/// kept and interpreted on access.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attendance {
    pub id: i64,
    pub date: String,
    #[serde(default)]
    pub presence: String,
}

impl Attendance {
    /// Attendance dates are ISO `YYYY-MM-DD` strings.
    pub fn parsed_date(&self) -> Option<NaiveDate> {
        NaiveDate::parse_from_str(&self.date, "%Y-%m-%d").ok()
    }

    pub fn status(&self) -> Option<Presence> {
        Presence::from_code(&self.presence)
    }

    /// Presence label for display; unknown codes show as "-".
    pub fn status_label(&self) -> String {
        match self.status() {
            Some(p) => p.to_string(),
            None => "-".to_string(),
        }
    }
}

/// Sort attendance records by date ascending. The backend's order is not
/// guaranteed. Records with unparseable dates sort first.
pub fn sort_by_date(attendances: &mut [Attendance]) {
    attendances.sort_by_key(Attendance::parsed_date);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn att(id: i64, date: &str, presence: &str) -> Attendance {
        Attendance {
            id,
            date: date.to_string(),
            presence: presence.to_string(),
        }
    }

    #[test]
    fn test_presence_codes_round_trip() {
        for p in [Presence::Present, Presence::Excused, Presence::Unexcused] {
            assert_eq!(Presence::from_code(p.code()), Some(p));
        }
        assert_eq!(Presence::from_code(""), None);
        assert_eq!(Presence::from_code("XX"), None);
        // Codes are case-sensitive on the wire
        assert_eq!(Presence::from_code("pr"), None);
    }

    #[test]
    fn test_parse_attendance_json() {
        let json = r#"[{"id":5,"date":"2024-03-02","presence":"PR"},{"id":6,"date":"2024-01-10","presence":"UN"}]"#;
        let list: Vec<Attendance> = serde_json::from_str(json).expect("Failed to parse attendances");
        assert_eq!(list.len(), 2);
        assert_eq!(list[0].id, 5);
        assert_eq!(list[0].status(), Some(Presence::Present));
        assert_eq!(list[1].status(), Some(Presence::Unexcused));
    }

    #[test]
    fn test_parse_attendance_ignores_extra_fields() {
        // The backend nests the owning student in each record; only the
        // fields the view needs are kept.
        let json = r#"{"id":1,"date":"2022-01-01","presence":"","student":{"id":9,"user":{"id":3}}}"#;
        let a: Attendance = serde_json::from_str(json).expect("Failed to parse attendance");
        assert_eq!(a.id, 1);
        assert_eq!(a.status(), None);
        assert_eq!(a.status_label(), "-");
    }

    #[test]
    fn test_sort_by_date_ascending() {
        let mut list = vec![
            att(5, "2024-03-02", "PR"),
            att(6, "2024-01-10", "UN"),
            att(7, "2024-02-20", "EX"),
        ];
        sort_by_date(&mut list);
        let ids: Vec<i64> = list.iter().map(|a| a.id).collect();
        assert_eq!(ids, vec![6, 7, 5]);
    }

    #[test]
    fn test_sort_by_date_unparseable_first() {
        let mut list = vec![att(1, "2024-06-01", "PR"), att(2, "not-a-date", "PR")];
        sort_by_date(&mut list);
        assert_eq!(list[0].id, 2);
        assert_eq!(list[1].id, 1);
    }
}
