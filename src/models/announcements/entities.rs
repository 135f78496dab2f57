use crate::models::users::entities::UserRole;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use ts_rs::TS;

crate::define_string_enum! {
    /// 公告受众类型
    #[ts(export, export_to = "announcement.ts")]
    pub enum TargetAudience("target audience") {
        All => "all",
        Class => "class",
        Role => "role",
    }
}

crate::define_string_enum! {
    /// 公告优先级
    #[ts(export, export_to = "announcement.ts")]
    pub enum Priority("priority") {
        Low => "low",
        Normal => "normal",
        High => "high",
        Urgent => "urgent",
    }
}

/// 解析后的受众，供推送定位使用
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Audience {
    All,
    Class(i64),
    Role(UserRole),
}

impl Audience {
    /// 由受众类型与可选目标组合出受众；缺少目标时报错
    pub fn resolve(
        target: TargetAudience,
        class_id: Option<i64>,
        role: Option<UserRole>,
    ) -> Result<Self, String> {
        match target {
            TargetAudience::All => Ok(Audience::All),
            TargetAudience::Class => class_id
                .map(Audience::Class)
                .ok_or_else(|| "target_class_id is required when target_audience is class".into()),
            TargetAudience::Role => role
                .map(Audience::Role)
                .ok_or_else(|| "target_role is required when target_audience is role".into()),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, TS)]
#[ts(export, export_to = "announcement.ts")]
pub struct Announcement {
    pub id: i64,
    pub author_id: i64,
    pub title: String,
    pub content: String,
    pub target_audience: TargetAudience,
    pub target_class_id: Option<i64>,
    pub target_role: Option<UserRole>,
    pub priority: Priority,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Announcement {
    pub fn audience(&self) -> Result<Audience, String> {
        Audience::resolve(self.target_audience, self.target_class_id, self.target_role)
    }

    /// 在给定时刻是否处于有效期内（两端缺省视为不限）
    pub fn is_active_at(&self, at: DateTime<Utc>) -> bool {
        self.valid_from.is_none_or(|from| from <= at)
            && self.valid_until.is_none_or(|until| at <= until)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_audience_requires_matching_target() {
        assert_eq!(
            Audience::resolve(TargetAudience::Class, Some(4), None),
            Ok(Audience::Class(4))
        );
        assert!(Audience::resolve(TargetAudience::Class, None, Some(UserRole::Student)).is_err());
        assert!(Audience::resolve(TargetAudience::Role, Some(4), None).is_err());
        assert_eq!(
            Audience::resolve(TargetAudience::All, Some(4), None),
            Ok(Audience::All)
        );
    }

    #[test]
    fn test_validity_window() {
        let now = Utc::now();
        let mut a = Announcement {
            id: 1,
            author_id: 1,
            title: "Exam".into(),
            content: "Friday".into(),
            target_audience: TargetAudience::All,
            target_class_id: None,
            target_role: None,
            priority: Priority::Normal,
            valid_from: None,
            valid_until: None,
            created_at: now,
            updated_at: now,
        };
        assert!(a.is_active_at(now));

        a.valid_until = Some(now - chrono::Duration::minutes(1));
        assert!(!a.is_active_at(now));

        a.valid_until = None;
        a.valid_from = Some(now + chrono::Duration::minutes(1));
        assert!(!a.is_active_at(now));
    }
}
