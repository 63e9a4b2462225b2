//! Application state management for sectiondesk.
//!
//! This module contains the core `App` struct that manages all
//! application state: the current screen, the per-screen data slots
//! filled by background fetches, and the two edit operations the UI
//! supports (dropping a student, changing an attendance mark).

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, warn};

use crate::api::ApiClient;
use crate::auth::CookieStore;
use crate::config::Config;
use crate::models::{Attendance, Presence, RosterStudent, SectionDetails, StudentDetails};

// ============================================================================
// Constants
// ============================================================================

/// Buffer size for the background fetch message channel.
/// Each screen issues two fetches, so 16 leaves plenty of headroom.
const CHANNEL_BUFFER_SIZE: usize = 16;

/// Number of items to scroll on page up/down.
pub const PAGE_SCROLL_SIZE: usize = 10;

// ============================================================================
// UI State Types
// ============================================================================

/// Which screen is on display.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Screen {
    Roster,
    Student,
}

/// Overall application state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    Normal,
    ShowingHelp,
    ConfirmingQuit,
    Quitting,
}

// ============================================================================
// Background Fetch Results
// ============================================================================

/// Results from spawned fetch tasks, sent through an MPSC channel back to
/// the main loop. Each variant carries the identifier the fetch was keyed
/// by, so results that arrive after the user has navigated away can be
/// recognized and dropped.
enum FetchResult {
    SectionDetails(i64, SectionDetails),
    SectionStudents(i64, Vec<RosterStudent>),
    StudentDetails(i64, StudentDetails),
    StudentAttendances(i64, Vec<Attendance>),
}

// ============================================================================
// Main Application Struct
// ============================================================================

/// Main application state container
pub struct App {
    // Core services
    pub api: ApiClient,
    pub cookies: CookieStore,

    // UI state
    pub state: AppState,
    pub screen: Screen,

    // Roster screen slots. The section metadata and the student list are
    // fetched independently and arrive in either order; each slot renders
    // on its own as soon as it is filled.
    pub section_id: i64,
    pub section: Option<SectionDetails>,
    pub students: Vec<RosterStudent>,
    pub roster_selection: usize,

    // Student screen slots, keyed by the student opened from the roster.
    pub student_id: Option<i64>,
    pub student: Option<StudentDetails>,
    pub attendances: Vec<Attendance>,
    pub attendance_selection: usize,

    // Background fetch channel
    fetch_rx: mpsc::Receiver<FetchResult>,
    fetch_tx: mpsc::Sender<FetchResult>,
}

impl App {
    /// Create a new application instance for the given section.
    pub fn new(config: &Config, section_id: i64) -> Result<Self> {
        let api = ApiClient::new(config.resolved_base_url())?;

        let mut cookies = CookieStore::new(config.cookies_path()?);
        match cookies.load() {
            Ok(found) => debug!(found, "Cookie store loaded"),
            Err(e) => warn!(error = %e, "Failed to read cookie file"),
        }

        let (tx, rx) = mpsc::channel(CHANNEL_BUFFER_SIZE);

        Ok(Self {
            api,
            cookies,

            state: AppState::Normal,
            screen: Screen::Roster,

            section_id,
            section: None,
            students: Vec::new(),
            roster_selection: 0,

            student_id: None,
            student: None,
            attendances: Vec::new(),
            attendance_selection: 0,

            fetch_rx: rx,
            fetch_tx: tx,
        })
    }

    // =========================================================================
    // Screen Loading
    // =========================================================================

    /// Load the roster screen: two independent fetches, racing. Whichever
    /// completes first fills its slot first; neither waits for the other.
    pub fn load_roster(&mut self) {
        let section_id = self.section_id;
        self.section = None;
        self.students.clear();
        self.roster_selection = 0;

        info!(section_id, "Loading roster");

        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            match api.fetch_section_details(section_id).await {
                Ok(details) => {
                    Self::send_result(&tx, FetchResult::SectionDetails(section_id, details)).await;
                }
                Err(e) => warn!(error = %e, section_id, "Section details fetch failed"),
            }
        });

        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            match api.fetch_section_students(section_id).await {
                Ok(students) => {
                    Self::send_result(&tx, FetchResult::SectionStudents(section_id, students)).await;
                }
                Err(e) => warn!(error = %e, section_id, "Roster fetch failed"),
            }
        });
    }

    /// Open the detail screen for the student selected on the roster.
    pub fn open_selected_student(&mut self) {
        let Some(student) = self.students.get(self.roster_selection) else {
            return;
        };
        let student_id = student.id;

        self.screen = Screen::Student;
        self.student_id = Some(student_id);

        info!(student_id, "Opening student detail");
        self.load_student(student_id);
    }

    /// Load the student screen: two independent fetches, racing, same as
    /// the roster pair.
    fn load_student(&mut self, student_id: i64) {
        self.student = None;
        self.attendances.clear();
        self.attendance_selection = 0;

        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            match api.fetch_student_details(student_id).await {
                Ok(details) => {
                    Self::send_result(&tx, FetchResult::StudentDetails(student_id, details)).await;
                }
                Err(e) => warn!(error = %e, student_id, "Student details fetch failed"),
            }
        });

        let api = self.api.clone();
        let tx = self.fetch_tx.clone();
        tokio::spawn(async move {
            match api.fetch_student_attendances(student_id).await {
                Ok(attendances) => {
                    Self::send_result(&tx, FetchResult::StudentAttendances(student_id, attendances))
                        .await;
                }
                Err(e) => warn!(error = %e, student_id, "Attendances fetch failed"),
            }
        });
    }

    /// Return from the student screen to the roster. The roster list is
    /// kept as-is; it is the source of truth for who appears.
    pub fn back_to_roster(&mut self) {
        self.screen = Screen::Roster;
        self.student_id = None;
        self.student = None;
        self.attendances.clear();
        self.attendance_selection = 0;
    }

    /// Re-fetch the current screen's data.
    pub fn refresh_current_screen(&mut self) {
        match self.screen {
            Screen::Roster => self.load_roster(),
            Screen::Student => {
                if let Some(student_id) = self.student_id {
                    self.load_student(student_id);
                }
            }
        }
    }

    /// Helper to send fetch results, logging any channel errors
    async fn send_result(tx: &mpsc::Sender<FetchResult>, result: FetchResult) {
        if tx.send(result).await.is_err() {
            warn!("Failed to send fetch result - channel closed");
        }
    }

    /// Check for completed background fetches and process results
    pub fn check_background_tasks(&mut self) {
        while let Ok(result) = self.fetch_rx.try_recv() {
            self.process_fetch_result(result);
        }
    }

    /// Process a single fetch result. Results keyed by an identifier that
    /// no longer matches the current screen are stale (the user navigated
    /// away before the fetch resolved) and are dropped.
    fn process_fetch_result(&mut self, result: FetchResult) {
        match result {
            FetchResult::SectionDetails(section_id, details) => {
                if section_id == self.section_id {
                    self.section = Some(details);
                } else {
                    debug!(section_id, "Dropping stale section details");
                }
            }
            FetchResult::SectionStudents(section_id, students) => {
                if section_id == self.section_id {
                    self.students = students;
                    self.roster_selection = Self::clamp_selection(
                        self.roster_selection,
                        self.students.len(),
                    );
                } else {
                    debug!(section_id, "Dropping stale roster");
                }
            }
            FetchResult::StudentDetails(student_id, details) => {
                if self.student_id == Some(student_id) {
                    self.student = Some(details);
                } else {
                    debug!(student_id, "Dropping stale student details");
                }
            }
            FetchResult::StudentAttendances(student_id, attendances) => {
                if self.student_id == Some(student_id) {
                    self.attendances = attendances;
                    self.attendance_selection = Self::clamp_selection(
                        self.attendance_selection,
                        self.attendances.len(),
                    );
                } else {
                    debug!(student_id, "Dropping stale attendances");
                }
            }
        }
    }

    // =========================================================================
    // Edit Operations
    // =========================================================================

    /// Drop the selected student: the roster updates instantly, then the
    /// PATCH goes out fire-and-forget. The remote outcome is not observed;
    /// a failure is logged and the local removal stands.
    pub fn drop_selected_student(&mut self) {
        let Some(student) = self.students.get(self.roster_selection) else {
            return;
        };
        let student_id = student.id;

        self.students = Self::remove_student(&self.students, student_id);
        self.roster_selection = Self::clamp_selection(self.roster_selection, self.students.len());
        info!(student_id, "Dropped student from roster");

        let api = self.api.clone();
        let token = self.cookies.csrf_token();
        tokio::spawn(async move {
            if let Err(e) = api.drop_student(student_id, &token).await {
                warn!(error = %e, student_id, "Drop request failed");
            }
        });
    }

    /// Set the selected attendance record's presence: the list updates
    /// instantly, then the PUT goes out fire-and-forget. Never reverted.
    pub fn set_selected_presence(&mut self, presence: Presence) {
        let Some(student_id) = self.student_id else {
            return;
        };
        let Some(attendance) = self.attendances.get(self.attendance_selection) else {
            return;
        };
        let attendance_id = attendance.id;

        self.attendances = Self::apply_presence(&self.attendances, attendance_id, presence);
        info!(attendance_id, presence = presence.code(), "Updated attendance");

        let api = self.api.clone();
        let token = self.cookies.csrf_token();
        tokio::spawn(async move {
            if let Err(e) = api
                .update_attendance(student_id, attendance_id, presence, &token)
                .await
            {
                warn!(error = %e, attendance_id, "Attendance update failed");
            }
        });
    }

    /// Produce a new list excluding the given student, preserving the
    /// relative order of everyone else.
    fn remove_student(students: &[RosterStudent], student_id: i64) -> Vec<RosterStudent> {
        students
            .iter()
            .filter(|s| s.id != student_id)
            .cloned()
            .collect()
    }

    /// Replace the presence of the matching record, leaving the rest
    /// untouched. An id with no matching record is a no-op, not an error.
    fn apply_presence(
        attendances: &[Attendance],
        attendance_id: i64,
        presence: Presence,
    ) -> Vec<Attendance> {
        attendances
            .iter()
            .map(|a| {
                if a.id == attendance_id {
                    Attendance {
                        presence: presence.code().to_string(),
                        ..a.clone()
                    }
                } else {
                    a.clone()
                }
            })
            .collect()
    }

    // =========================================================================
    // List Navigation
    // =========================================================================

    fn current_list_len(&self) -> usize {
        match self.screen {
            Screen::Roster => self.students.len(),
            Screen::Student => self.attendances.len(),
        }
    }

    fn current_selection_mut(&mut self) -> &mut usize {
        match self.screen {
            Screen::Roster => &mut self.roster_selection,
            Screen::Student => &mut self.attendance_selection,
        }
    }

    pub fn select_next(&mut self) {
        let len = self.current_list_len();
        let selection = self.current_selection_mut();
        if *selection + 1 < len {
            *selection += 1;
        }
    }

    pub fn select_prev(&mut self) {
        let selection = self.current_selection_mut();
        *selection = selection.saturating_sub(1);
    }

    pub fn page_down(&mut self) {
        let len = self.current_list_len();
        let selection = self.current_selection_mut();
        *selection = (*selection + PAGE_SCROLL_SIZE).min(len.saturating_sub(1));
    }

    pub fn page_up(&mut self) {
        let selection = self.current_selection_mut();
        *selection = selection.saturating_sub(PAGE_SCROLL_SIZE);
    }

    fn clamp_selection(selection: usize, len: usize) -> usize {
        selection.min(len.saturating_sub(1))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UserName;

    fn student(id: i64, first: &str, last: &str) -> RosterStudent {
        RosterStudent {
            id,
            user: UserName {
                first_name: first.to_string(),
                last_name: last.to_string(),
            },
        }
    }

    fn att(id: i64, date: &str, presence: &str) -> Attendance {
        Attendance {
            id,
            date: date.to_string(),
            presence: presence.to_string(),
        }
    }

    fn test_app() -> App {
        let config = Config {
            cookies_file: Some(std::path::PathBuf::from("/nonexistent/cookies.txt")),
            ..Config::default()
        };
        let mut app = App::new(&config, 7).expect("Failed to build app");
        app.students = vec![student(1, "A", "B"), student(2, "C", "D"), student(3, "E", "F")];
        app
    }

    #[test]
    fn test_remove_student_preserves_order() {
        let list = vec![student(1, "A", "B"), student(2, "C", "D"), student(3, "E", "F")];
        let remaining = App::remove_student(&list, 2);
        let ids: Vec<i64> = remaining.iter().map(|s| s.id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[test]
    fn test_remove_unknown_student_is_noop() {
        let list = vec![student(1, "A", "B"), student(2, "C", "D")];
        let remaining = App::remove_student(&list, 99);
        assert_eq!(remaining, list);
    }

    #[test]
    fn test_apply_presence_updates_only_match() {
        let list = vec![att(5, "2024-03-02", "PR"), att(6, "2024-01-10", "UN")];
        let updated = App::apply_presence(&list, 6, Presence::Excused);
        assert_eq!(updated[0], list[0]);
        assert_eq!(updated[1].presence, "EX");
        assert_eq!(updated[1].id, 6);
        assert_eq!(updated[1].date, "2024-01-10");
    }

    #[test]
    fn test_apply_presence_unknown_id_is_noop() {
        let list = vec![att(5, "2024-03-02", "PR"), att(6, "2024-01-10", "UN")];
        let updated = App::apply_presence(&list, 99, Presence::Present);
        assert_eq!(updated, list);
    }

    #[test]
    fn test_stale_student_results_are_dropped() {
        let mut app = test_app();
        app.screen = Screen::Student;
        app.student_id = Some(1);

        // A fetch for student 2 resolving now must not touch student 1's view
        app.process_fetch_result(FetchResult::StudentAttendances(
            2,
            vec![att(9, "2024-05-01", "PR")],
        ));
        assert!(app.attendances.is_empty());

        app.process_fetch_result(FetchResult::StudentAttendances(
            1,
            vec![att(9, "2024-05-01", "PR")],
        ));
        assert_eq!(app.attendances.len(), 1);
    }

    #[test]
    fn test_results_after_back_navigation_are_dropped() {
        let mut app = test_app();
        app.screen = Screen::Student;
        app.student_id = Some(1);
        app.back_to_roster();

        app.process_fetch_result(FetchResult::StudentDetails(
            1,
            serde_json::from_str(
                r#"{"user":{"first_name":"A","last_name":"B"},
                    "course":{"id":3,"name":"CS70"},
                    "section":{"mentor":{"user":{"first_name":"M","last_name":"N"}}}}"#,
            )
            .expect("Failed to parse fixture"),
        ));
        assert!(app.student.is_none());
    }

    #[test]
    fn test_section_results_fill_slots_independently() {
        let mut app = test_app();
        app.students.clear();

        // Roster arrives before the metadata; the list renders on its own
        app.process_fetch_result(FetchResult::SectionStudents(7, vec![student(1, "A", "B")]));
        assert_eq!(app.students.len(), 1);
        assert!(app.section.is_none());

        let details: SectionDetails = serde_json::from_str(
            r#"{"mentor":{"course":{"name":"CS70"},"user":{"first_name":"M","last_name":"N"}}}"#,
        )
        .expect("Failed to parse fixture");
        app.process_fetch_result(FetchResult::SectionDetails(7, details));
        assert!(app.section.is_some());
    }

    #[test]
    fn test_drop_clamps_selection() {
        let mut app = test_app();
        app.roster_selection = 2;
        app.students = App::remove_student(&app.students, 3);
        app.roster_selection = App::clamp_selection(app.roster_selection, app.students.len());
        assert_eq!(app.roster_selection, 1);
    }

    #[test]
    fn test_selection_navigation_bounds() {
        let mut app = test_app();
        app.select_prev();
        assert_eq!(app.roster_selection, 0);
        app.select_next();
        app.select_next();
        app.select_next(); // Already at the end
        assert_eq!(app.roster_selection, 2);
        app.page_up();
        assert_eq!(app.roster_selection, 0);
        app.page_down();
        assert_eq!(app.roster_selection, 2);
    }
}
