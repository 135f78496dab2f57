//! 访问控制策略
//!
//! 所有归属与角色规则集中在 [`authorize`]，服务层只需描述「谁」对「什么」做「何种操作」。
//! 管理员始终放行。

use crate::errors::PortalError;
use crate::models::{
    announcements::entities::Announcement,
    classes::entities::Class,
    content_items::entities::ContentItem,
    enrollments::entities::{Enrollment, EnrollmentStatus},
    messages::entities::Message,
    notifications::entities::Notification,
    users::entities::{User, UserRole},
};

/// 发起操作的用户
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub user_id: i64,
    pub role: UserRole,
}

impl Actor {
    pub fn new(user_id: i64, role: UserRole) -> Self {
        Self { user_id, role }
    }

    pub fn is_admin(&self) -> bool {
        self.role == UserRole::Admin
    }

    pub fn is_teacher(&self) -> bool {
        self.role == UserRole::Teacher
    }

    fn owns_class(&self, class: &Class) -> bool {
        self.is_teacher() && class.teacher_id == self.user_id
    }
}

impl From<&User> for Actor {
    fn from(user: &User) -> Self {
        Self::new(user.id, user.role)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Action {
    Read,
    Create,
    Update,
    Delete,
}

/// 受保护的资源
#[derive(Debug, Clone, Copy)]
pub enum Resource<'a> {
    /// 用户目录（列表）
    UserDirectory,
    /// 单个用户的资料与偏好
    User { id: i64 },
    /// 用户的角色与状态
    UserPrivileges { id: i64 },
    /// 为指定教师新建班级
    NewClass { teacher_id: i64 },
    Class(&'a Class),
    ClassRoster(&'a Class),
    NewEnrollment { class: &'a Class, student_id: i64 },
    Enrollment { enrollment: &'a Enrollment, class: &'a Class },
    Attendance { class: &'a Class },
    /// 新建内容；挂在班级下时需为该班级教师
    NewContentItem { class: Option<&'a Class> },
    ContentItem(&'a ContentItem),
    ContentModule { class: &'a Class },
    Message(&'a Message),
    /// 新建公告；班级公告需为该班级教师
    NewAnnouncement { class: Option<&'a Class> },
    Announcement(&'a Announcement),
    Notification(&'a Notification),
}

/// 判断 actor 是否可以对 resource 执行 action
pub fn authorize(actor: &Actor, resource: Resource<'_>, action: Action) -> Result<(), PortalError> {
    if actor.is_admin() || is_allowed(actor, resource, action) {
        Ok(())
    } else {
        Err(PortalError::authorization(format!(
            "{:?} {} is not allowed to {:?} {}",
            actor.role,
            actor.user_id,
            action,
            describe(resource)
        )))
    }
}

fn is_allowed(actor: &Actor, resource: Resource<'_>, action: Action) -> bool {
    use Action::*;

    match (resource, action) {
        (Resource::UserDirectory, _) => false,
        (Resource::User { id }, Read) => id == actor.user_id || actor.is_teacher(),
        (Resource::User { id }, Update) => id == actor.user_id,
        (Resource::User { .. }, _) => false,
        (Resource::UserPrivileges { .. }, _) => false,

        (Resource::NewClass { teacher_id }, Create) => {
            actor.is_teacher() && teacher_id == actor.user_id
        }
        (Resource::NewClass { .. }, _) => false,
        (Resource::Class(_), Read) => true,
        (Resource::Class(class), Update | Delete) => actor.owns_class(class),
        (Resource::Class(_), Create) => false,
        (Resource::ClassRoster(class), Read) => actor.owns_class(class),
        (Resource::ClassRoster(_), _) => false,

        (Resource::NewEnrollment { class, student_id }, Create) => {
            (actor.role == UserRole::Student && student_id == actor.user_id)
                || actor.owns_class(class)
        }
        (Resource::NewEnrollment { .. }, _) => false,
        (Resource::Enrollment { enrollment, class }, Read | Update) => {
            enrollment.student_id == actor.user_id || actor.owns_class(class)
        }
        (Resource::Enrollment { .. }, _) => false,
        (Resource::Attendance { class }, Read | Create) => actor.owns_class(class),
        (Resource::Attendance { .. }, _) => false,

        (Resource::NewContentItem { class }, Create) => {
            actor.is_teacher() && class.is_none_or(|c| actor.owns_class(c))
        }
        (Resource::NewContentItem { .. }, _) => false,
        (Resource::ContentItem(item), Read) => {
            item.author_id == actor.user_id || item.is_published()
        }
        (Resource::ContentItem(item), Update | Delete) => item.author_id == actor.user_id,
        (Resource::ContentItem(_), Create) => false,

        (Resource::ContentModule { .. }, Read) => true,
        (Resource::ContentModule { class }, _) => actor.owns_class(class),

        (Resource::Message(message), Read | Delete) => message.involves(actor.user_id),
        (Resource::Message(message), Update) => message.recipient_id == actor.user_id,
        (Resource::Message(_), Create) => true,

        (Resource::NewAnnouncement { class }, Create) => {
            actor.is_teacher() && class.is_none_or(|c| actor.owns_class(c))
        }
        (Resource::NewAnnouncement { .. }, _) => false,
        (Resource::Announcement(_), Read) => true,
        (Resource::Announcement(a), Update | Delete) => a.author_id == actor.user_id,
        (Resource::Announcement(_), Create) => false,

        (Resource::Notification(n), Read | Update | Delete) => n.user_id == actor.user_id,
        (Resource::Notification(_), Create) => false,
    }
}

fn describe(resource: Resource<'_>) -> String {
    match resource {
        Resource::UserDirectory => "the user directory".to_string(),
        Resource::User { id } => format!("user {id}"),
        Resource::UserPrivileges { id } => format!("role/status of user {id}"),
        Resource::NewClass { teacher_id } => format!("a class for teacher {teacher_id}"),
        Resource::Class(c) => format!("class {}", c.id),
        Resource::ClassRoster(c) => format!("roster of class {}", c.id),
        Resource::NewEnrollment { class, student_id } => {
            format!("enrollment of student {student_id} in class {}", class.id)
        }
        Resource::Enrollment { enrollment, .. } => format!("enrollment {}", enrollment.id),
        Resource::Attendance { class } => format!("attendance in class {}", class.id),
        Resource::NewContentItem { .. } => "a content item".to_string(),
        Resource::ContentItem(item) => format!("content item {}", item.id),
        Resource::ContentModule { class } => format!("modules of class {}", class.id),
        Resource::Message(m) => format!("message {}", m.id),
        Resource::NewAnnouncement { .. } => "an announcement".to_string(),
        Resource::Announcement(a) => format!("announcement {}", a.id),
        Resource::Notification(n) => format!("notification {}", n.id),
    }
}

/// 选课状态变更：学生只能退课；状态机只允许 active -> dropped / completed
pub fn check_enrollment_transition(
    actor: &Actor,
    enrollment: &Enrollment,
    class: &Class,
    target: EnrollmentStatus,
) -> Result<(), PortalError> {
    authorize(actor, Resource::Enrollment { enrollment, class }, Action::Update)?;

    let privileged = actor.is_admin() || actor.owns_class(class);
    if !privileged && target != EnrollmentStatus::Dropped {
        return Err(PortalError::authorization(
            "Students may only drop their own enrollment",
        ));
    }

    if !enrollment.status.can_transition_to(target) {
        return Err(PortalError::validation(format!(
            "Cannot change enrollment status from {} to {}",
            enrollment.status, target
        )));
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::classes::entities::ClassStatus;
    use crate::models::content_items::entities::{ContentStatus, ContentType};
    use chrono::Utc;

    const ADMIN: Actor = Actor { user_id: 1, role: UserRole::Admin };
    const OWNER: Actor = Actor { user_id: 2, role: UserRole::Teacher };
    const OTHER_TEACHER: Actor = Actor { user_id: 3, role: UserRole::Teacher };
    const STUDENT: Actor = Actor { user_id: 4, role: UserRole::Student };
    const OTHER_STUDENT: Actor = Actor { user_id: 5, role: UserRole::Student };

    fn class() -> Class {
        let now = Utc::now();
        Class {
            id: 10,
            name: "Biology".into(),
            description: None,
            subject: Some("science".into()),
            teacher_id: OWNER.user_id,
            capacity: 30,
            enrollment_count: 1,
            status: ClassStatus::Active,
            schedule: None,
            start_date: None,
            end_date: None,
            created_at: now,
            updated_at: now,
        }
    }

    fn enrollment(status: EnrollmentStatus) -> Enrollment {
        let now = Utc::now();
        Enrollment {
            id: 20,
            class_id: 10,
            student_id: STUDENT.user_id,
            status,
            attendance: vec![],
            enrolled_at: now,
            dropped_at: None,
            completed_at: None,
            updated_at: now,
        }
    }

    fn draft_item() -> ContentItem {
        let now = Utc::now();
        ContentItem {
            id: 30,
            title: "Cells".into(),
            description: None,
            content_type: ContentType::Lesson,
            content: "...".into(),
            class_id: Some(10),
            author_id: OWNER.user_id,
            status: ContentStatus::Draft,
            version: 1,
            previous_versions: vec![],
            tags: vec![],
            published_at: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_admin_is_always_allowed() {
        let c = class();
        assert!(authorize(&ADMIN, Resource::UserDirectory, Action::Read).is_ok());
        assert!(authorize(&ADMIN, Resource::Class(&c), Action::Delete).is_ok());
        assert!(authorize(&ADMIN, Resource::UserPrivileges { id: 9 }, Action::Update).is_ok());
    }

    #[test]
    fn test_class_ownership() {
        let c = class();
        assert!(authorize(&OWNER, Resource::Class(&c), Action::Update).is_ok());
        assert!(authorize(&OTHER_TEACHER, Resource::Class(&c), Action::Update).is_err());
        assert!(authorize(&STUDENT, Resource::Class(&c), Action::Read).is_ok());
        assert!(authorize(&STUDENT, Resource::ClassRoster(&c), Action::Read).is_err());
        assert!(
            authorize(&OTHER_TEACHER, Resource::NewClass { teacher_id: 2 }, Action::Create)
                .is_err()
        );
    }

    #[test]
    fn test_enrollment_creation_rules() {
        let c = class();
        let own = Resource::NewEnrollment { class: &c, student_id: STUDENT.user_id };
        assert!(authorize(&STUDENT, own, Action::Create).is_ok());
        assert!(authorize(&OTHER_STUDENT, own, Action::Create).is_err());
        assert!(authorize(&OWNER, own, Action::Create).is_ok());
        assert!(authorize(&OTHER_TEACHER, own, Action::Create).is_err());
    }

    #[test]
    fn test_student_may_only_drop() {
        let c = class();
        let e = enrollment(EnrollmentStatus::Active);
        assert!(check_enrollment_transition(&STUDENT, &e, &c, EnrollmentStatus::Dropped).is_ok());
        let err = check_enrollment_transition(&STUDENT, &e, &c, EnrollmentStatus::Completed)
            .expect_err("students cannot complete");
        assert_eq!(err.code(), "E012");
        assert!(
            check_enrollment_transition(&OTHER_STUDENT, &e, &c, EnrollmentStatus::Dropped)
                .is_err()
        );
        assert!(check_enrollment_transition(&OWNER, &e, &c, EnrollmentStatus::Completed).is_ok());
    }

    #[test]
    fn test_state_machine_applies_to_everyone() {
        let c = class();
        let dropped = enrollment(EnrollmentStatus::Dropped);
        let err = check_enrollment_transition(&ADMIN, &dropped, &c, EnrollmentStatus::Completed)
            .expect_err("dropped is terminal");
        assert_eq!(err.code(), "E007");
    }

    #[test]
    fn test_draft_content_is_private_to_author() {
        let mut item = draft_item();
        assert!(authorize(&STUDENT, Resource::ContentItem(&item), Action::Read).is_err());
        assert!(authorize(&OWNER, Resource::ContentItem(&item), Action::Read).is_ok());
        item.status = ContentStatus::Published;
        assert!(authorize(&STUDENT, Resource::ContentItem(&item), Action::Read).is_ok());
        assert!(authorize(&STUDENT, Resource::ContentItem(&item), Action::Update).is_err());
    }

    #[test]
    fn test_message_access() {
        let now = Utc::now();
        let m = Message {
            id: 40,
            sender_id: STUDENT.user_id,
            recipient_id: OWNER.user_id,
            subject: "Question".into(),
            content: "Is the lab open?".into(),
            is_read: false,
            read_at: None,
            created_at: now,
        };
        assert!(authorize(&STUDENT, Resource::Message(&m), Action::Read).is_ok());
        assert!(authorize(&STUDENT, Resource::Message(&m), Action::Update).is_err());
        assert!(authorize(&OWNER, Resource::Message(&m), Action::Update).is_ok());
        assert!(authorize(&OTHER_STUDENT, Resource::Message(&m), Action::Read).is_err());
    }

    #[test]
    fn test_students_cannot_announce() {
        assert!(
            authorize(&STUDENT, Resource::NewAnnouncement { class: None }, Action::Create)
                .is_err()
        );
        let c = class();
        assert!(
            authorize(
                &OTHER_TEACHER,
                Resource::NewAnnouncement { class: Some(&c) },
                Action::Create
            )
            .is_err()
        );
        assert!(
            authorize(&OWNER, Resource::NewAnnouncement { class: Some(&c) }, Action::Create)
                .is_ok()
        );
    }
}
