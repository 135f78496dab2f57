use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    /// 选课状态
    #[ts(export, export_to = "enrollment.ts")]
    pub enum EnrollmentStatus("enrollment status") {
        Active => "active",
        Dropped => "dropped",
        Completed => "completed",
    }
}

impl EnrollmentStatus {
    /// 允许的状态迁移：active -> dropped / completed
    pub fn can_transition_to(&self, target: EnrollmentStatus) -> bool {
        matches!(
            (self, target),
            (EnrollmentStatus::Active, EnrollmentStatus::Dropped)
                | (EnrollmentStatus::Active, EnrollmentStatus::Completed)
        )
    }
}

crate::define_string_enum! {
    /// 出勤状态
    #[ts(export, export_to = "enrollment.ts")]
    pub enum AttendanceStatus("attendance status") {
        Present => "present",
        Absent => "absent",
        Late => "late",
        Excused => "excused",
    }
}

// 出勤记录（只追加）
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct AttendanceEntry {
    pub date: chrono::NaiveDate,
    pub status: AttendanceStatus,
    pub note: Option<String>,
    pub recorded_by: i64,
    pub recorded_at: chrono::DateTime<chrono::Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "enrollment.ts")]
pub struct Enrollment {
    pub id: i64,
    pub class_id: i64,
    pub student_id: i64,
    pub status: EnrollmentStatus,
    pub attendance: Vec<AttendanceEntry>,
    pub enrolled_at: chrono::DateTime<chrono::Utc>,
    pub dropped_at: Option<chrono::DateTime<chrono::Utc>>,
    pub completed_at: Option<chrono::DateTime<chrono::Utc>>,
    pub updated_at: chrono::DateTime<chrono::Utc>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_only_active_enrollments_transition() {
        use EnrollmentStatus::*;
        assert!(Active.can_transition_to(Dropped));
        assert!(Active.can_transition_to(Completed));
        assert!(!Active.can_transition_to(Active));
        assert!(!Dropped.can_transition_to(Completed));
        assert!(!Dropped.can_transition_to(Active));
        assert!(!Completed.can_transition_to(Dropped));
    }
}
