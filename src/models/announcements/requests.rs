use super::entities::{Announcement, Priority, TargetAudience};
use crate::models::common::{PaginationQuery, deserialize_option_bool};
use crate::models::users::entities::UserRole;
use chrono::{DateTime, Utc};
use serde::Deserialize;
use ts_rs::TS;

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "announcement.ts")]
pub struct CreateAnnouncementRequest {
    pub title: String,
    pub content: String,
    pub target_audience: TargetAudience,
    pub target_class_id: Option<i64>,
    pub target_role: Option<UserRole>,
    pub priority: Option<Priority>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
}

#[derive(Debug, Default, Deserialize, TS)]
#[ts(export, export_to = "announcement.ts")]
pub struct UpdateAnnouncementRequest {
    pub title: Option<String>,
    pub content: Option<String>,
    pub target_audience: Option<TargetAudience>,
    pub target_class_id: Option<i64>,
    pub target_role: Option<UserRole>,
    pub priority: Option<Priority>,
    pub valid_from: Option<DateTime<Utc>>,
    pub valid_until: Option<DateTime<Utc>>,
}

impl UpdateAnnouncementRequest {
    /// 合并到已有公告上；受众类型变化时清除不再适用的目标字段
    pub fn apply_to(self, mut announcement: Announcement) -> Announcement {
        if let Some(title) = self.title {
            announcement.title = title;
        }
        if let Some(content) = self.content {
            announcement.content = content;
        }
        if let Some(target) = self.target_audience {
            announcement.target_audience = target;
        }
        if let Some(class_id) = self.target_class_id {
            announcement.target_class_id = Some(class_id);
        }
        if let Some(role) = self.target_role {
            announcement.target_role = Some(role);
        }
        if let Some(priority) = self.priority {
            announcement.priority = priority;
        }
        if let Some(from) = self.valid_from {
            announcement.valid_from = Some(from);
        }
        if let Some(until) = self.valid_until {
            announcement.valid_until = Some(until);
        }
        let (class_id, role) = normalize_targets(
            announcement.target_audience,
            announcement.target_class_id,
            announcement.target_role,
        );
        announcement.target_class_id = class_id;
        announcement.target_role = role;
        announcement
    }
}

/// 只保留与受众类型匹配的目标字段
pub fn normalize_targets(
    target: TargetAudience,
    class_id: Option<i64>,
    role: Option<UserRole>,
) -> (Option<i64>, Option<UserRole>) {
    match target {
        TargetAudience::All => (None, None),
        TargetAudience::Class => (class_id, None),
        TargetAudience::Role => (None, role),
    }
}

/// 有效期两端都给出时，开始时间不能晚于结束时间
pub fn validate_window(
    valid_from: Option<DateTime<Utc>>,
    valid_until: Option<DateTime<Utc>>,
) -> Result<(), String> {
    match (valid_from, valid_until) {
        (Some(from), Some(until)) if from > until => {
            Err("valid_from must not be later than valid_until".to_string())
        }
        _ => Ok(()),
    }
}

#[derive(Debug, Deserialize, TS)]
#[ts(export, export_to = "announcement.ts")]
pub struct AnnouncementQueryParams {
    #[serde(flatten)]
    #[ts(flatten)]
    pub pagination: PaginationQuery,
    #[serde(default, deserialize_with = "deserialize_option_bool")]
    pub include_expired: Option<bool>,
    pub priority: Option<Priority>,
}

/// 公告可见性：全体、本角色、所在班级、本人发布
#[derive(Debug, Clone)]
pub struct AnnouncementViewer {
    pub user_id: i64,
    pub role: UserRole,
    pub class_ids: Vec<i64>,
}

impl AnnouncementViewer {
    /// 与存储层列表过滤使用同一规则
    pub fn can_see(&self, announcement: &Announcement) -> bool {
        if announcement.author_id == self.user_id {
            return true;
        }
        match announcement.target_audience {
            TargetAudience::All => true,
            TargetAudience::Role => announcement.target_role == Some(self.role),
            TargetAudience::Class => announcement
                .target_class_id
                .is_some_and(|id| self.class_ids.contains(&id)),
        }
    }
}

// 公告列表查询参数（用于存储层）
#[derive(Debug, Clone, Default)]
pub struct AnnouncementListQuery {
    pub page: Option<i64>,
    pub size: Option<i64>,
    pub priority: Option<Priority>,
    /// None 表示不过滤可见性（管理员）
    pub viewer: Option<AnnouncementViewer>,
    /// Some(t) 时只返回 t 时刻有效的公告
    pub active_at: Option<DateTime<Utc>>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::announcements::entities::Audience;

    fn class_announcement() -> Announcement {
        let now = Utc::now();
        Announcement {
            id: 3,
            author_id: 2,
            title: "Field trip".into(),
            content: "Bring lunch".into(),
            target_audience: TargetAudience::Class,
            target_class_id: Some(11),
            target_role: None,
            priority: Priority::High,
            valid_from: None,
            valid_until: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_switching_audience_clears_stale_target() {
        let update = UpdateAnnouncementRequest {
            target_audience: Some(TargetAudience::Role),
            target_role: Some(UserRole::Teacher),
            ..Default::default()
        };
        let updated = update.apply_to(class_announcement());
        assert_eq!(updated.target_class_id, None);
        assert_eq!(updated.audience(), Ok(Audience::Role(UserRole::Teacher)));
    }

    #[test]
    fn test_switching_to_role_without_role_is_invalid() {
        let update = UpdateAnnouncementRequest {
            target_audience: Some(TargetAudience::Role),
            ..Default::default()
        };
        assert!(update.apply_to(class_announcement()).audience().is_err());
    }

    #[test]
    fn test_viewer_visibility() {
        let announcement = class_announcement();
        let member = AnnouncementViewer {
            user_id: 9,
            role: UserRole::Student,
            class_ids: vec![11],
        };
        let outsider = AnnouncementViewer {
            user_id: 10,
            role: UserRole::Student,
            class_ids: vec![12],
        };
        let author = AnnouncementViewer {
            user_id: 2,
            role: UserRole::Teacher,
            class_ids: Vec::new(),
        };
        assert!(member.can_see(&announcement));
        assert!(!outsider.can_see(&announcement));
        assert!(author.can_see(&announcement));
    }

    #[test]
    fn test_window_validation() {
        let now = Utc::now();
        assert!(validate_window(Some(now), Some(now + chrono::Duration::days(1))).is_ok());
        assert!(validate_window(Some(now), Some(now - chrono::Duration::days(1))).is_err());
        assert!(validate_window(None, Some(now)).is_ok());
    }
}
