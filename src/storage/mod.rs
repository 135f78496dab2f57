use std::sync::Arc;

use crate::models::{
    announcements::{
        entities::Announcement,
        requests::{AnnouncementListQuery, CreateAnnouncementRequest, UpdateAnnouncementRequest},
        responses::AnnouncementListResponse,
    },
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::ClassListResponse,
    },
    content_items::{
        entities::ContentItem,
        requests::{ContentItemListQuery, CreateContentItemRequest, UpdateContentItemRequest},
        responses::ContentItemListResponse,
    },
    content_modules::{
        entities::ContentModule,
        requests::{
            ContentModuleListQuery, CreateContentModuleRequest, UpdateContentModuleRequest,
        },
        responses::ContentModuleListResponse,
    },
    enrollments::{
        entities::{AttendanceEntry, Enrollment, EnrollmentStatus},
        requests::EnrollmentListQuery,
        responses::EnrollmentListResponse,
    },
    messages::{
        entities::Message,
        requests::{MessageListQuery, SendMessageRequest},
        responses::MessageListResponse,
    },
    notifications::{
        entities::Notification,
        requests::{CreateNotificationRequest, NotificationListQuery},
        responses::NotificationListResponse,
    },
    users::{
        entities::{User, UserPreferences, UserRole},
        requests::{CreateUserRequest, UpdateUserRequest, UserListQuery},
        responses::UserListResponse,
    },
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户管理方法
    // 创建用户（password 字段已是哈希值）
    async fn create_user(&self, user: CreateUserRequest) -> Result<User>;
    // 通过ID获取用户信息
    async fn get_user_by_id(&self, id: i64) -> Result<Option<User>>;
    // 通过用户名获取用户信息
    async fn get_user_by_username(&self, username: &str) -> Result<Option<User>>;
    // 通过邮箱获取用户信息
    async fn get_user_by_email(&self, email: &str) -> Result<Option<User>>;
    // 通过用户名或邮箱获取用户信息
    async fn get_user_by_username_or_email(&self, identifier: &str) -> Result<Option<User>>;
    // 列出用户
    async fn list_users_with_pagination(&self, query: UserListQuery) -> Result<UserListResponse>;
    // 更新用户信息
    async fn update_user(&self, id: i64, update: UpdateUserRequest) -> Result<Option<User>>;
    // 更新偏好设置
    async fn update_user_preferences(
        &self,
        id: i64,
        preferences: UserPreferences,
    ) -> Result<Option<User>>;
    // 更新用户最后登录时间
    async fn update_last_login(&self, id: i64) -> Result<bool>;
    // 统计用户数量
    async fn count_users(&self) -> Result<u64>;
    // 活跃用户 ID（可按角色过滤），用于公告通知
    async fn list_active_user_ids(&self, role: Option<UserRole>) -> Result<Vec<i64>>;

    /// 班级管理方法
    // 创建班级（teacher_id 由服务层确定）
    async fn create_class(&self, teacher_id: i64, class: CreateClassRequest) -> Result<Class>;
    // 通过ID获取班级信息
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    // 列出班级
    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse>;
    // 更新班级信息；容量不能低于当前选课人数
    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>>;
    // 删除班级
    async fn delete_class(&self, class_id: i64) -> Result<bool>;
    // 班级的 active 学生
    async fn list_class_students(&self, class_id: i64) -> Result<Vec<User>>;
    // 班级成员 ID：教师 + active 学生
    async fn list_class_member_ids(&self, class_id: i64) -> Result<Vec<i64>>;
    // 用户关联的班级 ID（教师所授 + 学生 active 选课）
    async fn list_user_class_ids(&self, user_id: i64) -> Result<Vec<i64>>;

    /// 选课管理方法
    // 选课（事务内检查容量并重算人数）
    async fn enroll_student(&self, class_id: i64, student_id: i64) -> Result<Enrollment>;
    // 通过ID获取选课记录
    async fn get_enrollment_by_id(&self, id: i64) -> Result<Option<Enrollment>>;
    // 列出选课记录
    async fn list_enrollments_with_pagination(
        &self,
        query: EnrollmentListQuery,
    ) -> Result<EnrollmentListResponse>;
    // 变更选课状态（事务内重算人数）
    async fn update_enrollment_status(
        &self,
        id: i64,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>>;
    // 追加出勤记录
    async fn record_attendance(
        &self,
        id: i64,
        entry: AttendanceEntry,
    ) -> Result<Option<Enrollment>>;

    /// 教学内容方法
    async fn create_content_item(
        &self,
        author_id: i64,
        req: CreateContentItemRequest,
    ) -> Result<ContentItem>;
    async fn get_content_item_by_id(&self, id: i64) -> Result<Option<ContentItem>>;
    async fn list_content_items_with_pagination(
        &self,
        query: ContentItemListQuery,
    ) -> Result<ContentItemListResponse>;
    // 更新内容；携带正文时生成新版本
    async fn update_content_item(
        &self,
        id: i64,
        editor_id: i64,
        update: UpdateContentItemRequest,
    ) -> Result<Option<ContentItem>>;
    async fn delete_content_item(&self, id: i64) -> Result<bool>;

    /// 课程模块方法
    async fn create_content_module(
        &self,
        created_by: i64,
        req: CreateContentModuleRequest,
    ) -> Result<ContentModule>;
    async fn get_content_module_by_id(&self, id: i64) -> Result<Option<ContentModule>>;
    async fn list_content_modules_with_pagination(
        &self,
        query: ContentModuleListQuery,
    ) -> Result<ContentModuleListResponse>;
    async fn update_content_module(
        &self,
        id: i64,
        update: UpdateContentModuleRequest,
    ) -> Result<Option<ContentModule>>;
    async fn add_content_module_item(
        &self,
        id: i64,
        content_item_id: i64,
        position: Option<usize>,
    ) -> Result<Option<ContentModule>>;
    async fn remove_content_module_item(
        &self,
        id: i64,
        content_item_id: i64,
    ) -> Result<Option<ContentModule>>;
    async fn delete_content_module(&self, id: i64) -> Result<bool>;

    /// 私信方法
    async fn create_message(&self, sender_id: i64, req: SendMessageRequest) -> Result<Message>;
    async fn get_message_by_id(&self, id: i64) -> Result<Option<Message>>;
    async fn list_messages_with_pagination(
        &self,
        query: MessageListQuery,
    ) -> Result<MessageListResponse>;
    async fn mark_message_read(&self, id: i64) -> Result<Option<Message>>;
    async fn delete_message(&self, id: i64) -> Result<bool>;

    /// 公告方法
    async fn create_announcement(
        &self,
        author_id: i64,
        req: CreateAnnouncementRequest,
    ) -> Result<Announcement>;
    async fn get_announcement_by_id(&self, id: i64) -> Result<Option<Announcement>>;
    async fn list_announcements_with_pagination(
        &self,
        query: AnnouncementListQuery,
    ) -> Result<AnnouncementListResponse>;
    async fn update_announcement(
        &self,
        id: i64,
        update: UpdateAnnouncementRequest,
    ) -> Result<Option<Announcement>>;
    async fn delete_announcement(&self, id: i64) -> Result<bool>;

    /// 通知方法
    async fn create_notification(&self, req: CreateNotificationRequest) -> Result<Notification>;
    async fn create_notifications_batch(
        &self,
        reqs: Vec<CreateNotificationRequest>,
    ) -> Result<Vec<Notification>>;
    async fn get_notification_by_id(&self, id: i64) -> Result<Option<Notification>>;
    async fn list_user_notifications_with_pagination(
        &self,
        user_id: i64,
        query: NotificationListQuery,
    ) -> Result<NotificationListResponse>;
    async fn get_unread_notification_count(&self, user_id: i64) -> Result<i64>;
    async fn mark_notification_read(&self, id: i64) -> Result<bool>;
    async fn mark_all_notifications_read(&self, user_id: i64) -> Result<i64>;
    async fn delete_notification(&self, id: i64) -> Result<bool>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
