//! Data models for the section management backend.
//!
//! This module contains the structures hydrated from API responses:
//!
//! - `SectionDetails`, `RosterStudent`: the roster screen
//! - `StudentDetails`, `Attendance`, `Presence`: the student screen
//!
//! All of these are read models owned by the backend; the client never
//! creates or deletes them, it only displays them and pushes small field
//! edits back.

pub mod attendance;
pub mod section;
pub mod student;

pub use attendance::{sort_by_date, Attendance, Presence};
pub use section::{RosterStudent, SectionDetails, UserName};
pub use student::StudentDetails;
