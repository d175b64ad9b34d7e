use serde::{Deserialize, Serialize};

pub mod date;
pub mod protocol;
pub mod stats;

pub use date::Timestamp;

// =========================================================
// 常量定义 (Constants)
// =========================================================

pub const HEADER_AUTHORIZATION: &str = "Authorization";
pub const HEADER_CONTENT_TYPE: &str = "Content-Type";
pub const CONTENT_TYPE_JSON: &str = "application/json";

// =========================================================
// 领域模型 (Domain Models)
// =========================================================

/// 用户角色
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Manager,
    #[default]
    Employee,
}

impl Role {
    pub fn as_str(&self) -> &'static str {
        match self {
            Role::Manager => "manager",
            Role::Employee => "employee",
        }
    }

    /// 解析 `<select>` 的取值，未知值返回 None
    pub fn from_value(value: &str) -> Option<Self> {
        match value {
            "manager" => Some(Role::Manager),
            "employee" => Some(Role::Employee),
            _ => None,
        }
    }
}

/// 后端签发的用户信息（客户端只读缓存）
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "UserWire")]
pub struct User {
    pub id: String,
    pub name: String,
    pub email: String,
    pub role: Role,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manager_name: Option<String>,
}

impl User {
    pub fn is_manager(&self) -> bool {
        self.role == Role::Manager
    }

    /// 头像用的姓名首字母，如 "Jane Doe" -> "JD"
    pub fn initials(&self) -> String {
        stats::initials(&self.name)
    }
}

/// 反馈情感倾向
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum Sentiment {
    #[default]
    Positive,
    Neutral,
    Negative,
}

impl Sentiment {
    pub const ALL: [Sentiment; 3] = [Sentiment::Positive, Sentiment::Neutral, Sentiment::Negative];

    pub fn as_str(&self) -> &'static str {
        match self {
            Sentiment::Positive => "positive",
            Sentiment::Neutral => "neutral",
            Sentiment::Negative => "negative",
        }
    }

    /// 表单选项上的文字
    pub fn label(&self) -> &'static str {
        match self {
            Sentiment::Positive => "Positive",
            Sentiment::Neutral => "Neutral",
            Sentiment::Negative => "Needs Improvement",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Sentiment::Positive => "😊",
            Sentiment::Neutral => "😐",
            Sentiment::Negative => "😔",
        }
    }

    /// 徽章样式
    pub fn badge_class(&self) -> &'static str {
        match self {
            Sentiment::Positive => "text-green-600 bg-green-100",
            Sentiment::Neutral => "text-yellow-600 bg-yellow-100",
            Sentiment::Negative => "text-red-600 bg-red-100",
        }
    }

    /// 单选卡片选中时的边框样式
    pub fn selected_class(&self) -> &'static str {
        match self {
            Sentiment::Positive => "border-green-500 ring-2 ring-green-500 bg-green-50",
            Sentiment::Neutral => "border-yellow-500 ring-2 ring-yellow-500 bg-yellow-50",
            Sentiment::Negative => "border-red-500 ring-2 ring-red-500 bg-red-50",
        }
    }
}

/// 经理给员工的一条反馈
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "FeedbackWire")]
pub struct Feedback {
    pub id: String,
    pub manager_id: String,
    pub employee_id: String,
    pub strengths: String,
    pub improvements: String,
    pub sentiment: Sentiment,
    pub created_at: Timestamp,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub updated_at: Option<Timestamp>,
    #[serde(default)]
    pub acknowledged: bool,
}

impl Feedback {
    /// 员工确认已读。只能从 false 变为 true，没有反向操作。
    pub fn acknowledge(&mut self) {
        self.acknowledged = true;
    }

    pub fn is_updated(&self) -> bool {
        self.updated_at.is_some()
    }
}

// =========================================================
// 线格式 (Wire Formats)
// =========================================================

// 注册接口写入 `managerId`，团队查询按 `manager_id` 过滤，
// 同一条记录可能两种拼写都带，此时以 snake_case 为准。

#[derive(Deserialize)]
struct UserWire {
    id: String,
    name: String,
    email: String,
    role: Role,
    #[serde(default)]
    manager_id: Option<String>,
    #[serde(default, rename = "managerId")]
    manager_id_camel: Option<String>,
    #[serde(default)]
    manager_name: Option<String>,
    #[serde(default, rename = "managerName")]
    manager_name_camel: Option<String>,
}

impl From<UserWire> for User {
    fn from(wire: UserWire) -> Self {
        Self {
            id: wire.id,
            name: wire.name,
            email: wire.email,
            role: wire.role,
            manager_id: wire.manager_id.or(wire.manager_id_camel),
            manager_name: wire.manager_name.or(wire.manager_name_camel),
        }
    }
}

#[derive(Deserialize)]
struct FeedbackWire {
    id: String,
    #[serde(default)]
    manager_id: Option<String>,
    #[serde(default, rename = "managerId")]
    manager_id_camel: Option<String>,
    employee_id: String,
    strengths: String,
    improvements: String,
    sentiment: Sentiment,
    created_at: Timestamp,
    #[serde(default)]
    updated_at: Option<Timestamp>,
    #[serde(default)]
    acknowledged: bool,
}

impl TryFrom<FeedbackWire> for Feedback {
    type Error = String;

    fn try_from(wire: FeedbackWire) -> Result<Self, Self::Error> {
        let manager_id = wire
            .manager_id
            .or(wire.manager_id_camel)
            .ok_or_else(|| format!("feedback {} has no manager_id", wire.id))?;
        Ok(Self {
            id: wire.id,
            manager_id,
            employee_id: wire.employee_id,
            strengths: wire.strengths,
            improvements: wire.improvements,
            sentiment: wire.sentiment,
            created_at: wire.created_at,
            updated_at: wire.updated_at,
            acknowledged: wire.acknowledged,
        })
    }
}

// =========================================================
// 请求体 (Request Payloads)
// =========================================================

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegisterRequest {
    pub name: String,
    pub email: String,
    pub password: String,
    pub role: Role,
    // 仅员工携带
    #[serde(rename = "managerId", skip_serializing_if = "Option::is_none")]
    pub manager_id: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CreateFeedbackRequest {
    pub employee_id: String,
    pub strengths: String,
    pub improvements: String,
    pub sentiment: Sentiment,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct UpdateFeedbackRequest {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub strengths: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub improvements: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sentiment: Option<Sentiment>,
}

// =========================================================
// 响应体 (Response Payloads)
// =========================================================

/// 登录 / 刷新令牌的响应
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthResponse {
    pub user: User,
    pub token: String,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ManagerDashboard {
    #[serde(default)]
    pub employees: Vec<User>,
    #[serde(default)]
    pub feedbacks: Vec<Feedback>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageResponse {
    pub msg: String,
}

/// 反馈写操作的响应
///
/// 不同后端版本返回完整对象、`{"id": ..}` 或 `{"msg": ..}`。
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum FeedbackReply {
    Feedback(Feedback),
    Created { id: String },
    Message { msg: String },
}

impl FeedbackReply {
    pub fn into_feedback(self) -> Option<Feedback> {
        match self {
            FeedbackReply::Feedback(feedback) => Some(feedback),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn user_accepts_both_manager_field_spellings() {
        let snake: User = serde_json::from_value(json!({
            "id": "e1", "name": "Eve", "email": "eve@corp.io",
            "role": "employee", "manager_id": "m1", "manager_name": "Max"
        }))
        .unwrap();
        let camel: User = serde_json::from_value(json!({
            "id": "e1", "name": "Eve", "email": "eve@corp.io",
            "role": "employee", "managerId": "m1", "managerName": "Max"
        }))
        .unwrap();

        assert_eq!(snake, camel);
        assert_eq!(snake.manager_id.as_deref(), Some("m1"));
        assert!(!snake.is_manager());
    }

    #[test]
    fn user_with_both_manager_spellings_decodes() {
        let team: Vec<User> = serde_json::from_value(json!([
            {"id": "e1", "name": "Eve", "email": "eve@corp.io", "role": "employee",
             "manager_id": "m1"},
            {"id": "e2", "name": "Eli", "email": "eli@corp.io", "role": "employee",
             "managerId": "m1", "manager_id": "m1",
             "managerName": "Max", "manager_name": "Max"}
        ]))
        .unwrap();

        assert_eq!(team.len(), 2);
        assert_eq!(team[1].manager_id.as_deref(), Some("m1"));
        assert_eq!(team[1].manager_name.as_deref(), Some("Max"));
    }

    #[test]
    fn snake_case_manager_wins_when_spellings_disagree() {
        let user: User = serde_json::from_value(json!({
            "id": "e1", "name": "Eve", "email": "eve@corp.io", "role": "employee",
            "managerId": "old", "manager_id": "m2"
        }))
        .unwrap();
        assert_eq!(user.manager_id.as_deref(), Some("m2"));

        let cached = serde_json::to_string(&user).unwrap();
        assert_eq!(serde_json::from_str::<User>(&cached).unwrap(), user);
    }

    #[test]
    fn feedback_manager_field_spellings() {
        let both: Feedback = serde_json::from_value(json!({
            "id": "f1", "manager_id": "m1", "managerId": "m1", "employee_id": "e1",
            "strengths": "s", "improvements": "i", "sentiment": "positive",
            "created_at": "2024-03-15T10:20:30"
        }))
        .unwrap();
        assert_eq!(both.manager_id, "m1");

        let missing = serde_json::from_value::<Feedback>(json!({
            "id": "f2", "employee_id": "e1", "strengths": "s", "improvements": "i",
            "sentiment": "positive", "created_at": "2024-03-15T10:20:30"
        }));
        assert!(missing.is_err());
    }

    #[test]
    fn feedback_without_updated_at_is_not_marked_updated() {
        let feedback: Feedback = serde_json::from_value(json!({
            "id": "f1", "manager_id": "m1", "employee_id": "e1",
            "strengths": "ships", "improvements": "docs",
            "sentiment": "neutral", "created_at": "2024-03-15T10:20:30.123456",
            "acknowledged": false
        }))
        .unwrap();

        assert_eq!(feedback.sentiment, Sentiment::Neutral);
        assert!(!feedback.is_updated());
    }

    #[test]
    fn acknowledge_is_one_way() {
        let mut feedback: Feedback = serde_json::from_value(json!({
            "id": "f1", "manager_id": "m1", "employee_id": "e1",
            "strengths": "", "improvements": "", "sentiment": "positive",
            "created_at": "2024-03-15T10:20:30", "acknowledged": false
        }))
        .unwrap();

        feedback.acknowledge();
        feedback.acknowledge();
        assert!(feedback.acknowledged);
    }

    #[test]
    fn register_request_omits_manager_for_managers() {
        let req = RegisterRequest {
            name: "Max".into(),
            email: "max@corp.io".into(),
            password: "secret1".into(),
            role: Role::Manager,
            manager_id: None,
        };
        let value = serde_json::to_value(&req).unwrap();
        assert_eq!(value["role"], "manager");
        assert!(value.get("managerId").is_none());
    }

    #[test]
    fn feedback_reply_shapes() {
        let created: FeedbackReply = serde_json::from_value(json!({"id": "f9"})).unwrap();
        assert_eq!(created, FeedbackReply::Created { id: "f9".into() });

        let msg: FeedbackReply = serde_json::from_value(json!({"msg": "Acknowledged"})).unwrap();
        assert!(msg.into_feedback().is_none());
    }
}
