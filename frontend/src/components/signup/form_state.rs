//! 注册表单状态
//!
//! `FormState` 持有表单 signal，`SignupDraft` 是提交瞬间的快照，
//! 校验逻辑只依赖快照，便于脱离 DOM 测试。

use feedback_portal_shared::{RegisterRequest, Role};
use leptos::prelude::*;

/// 密码最短长度
pub const MIN_PASSWORD_LEN: usize = 6;

/// 表单状态结构体
#[derive(Clone, Copy)]
pub struct FormState {
    pub name: RwSignal<String>,
    pub email: RwSignal<String>,
    pub role: RwSignal<Role>,
    pub manager_id: RwSignal<String>,
    pub password: RwSignal<String>,
    pub confirm_password: RwSignal<String>,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            name: RwSignal::new(String::new()),
            email: RwSignal::new(String::new()),
            role: RwSignal::new(Role::Employee),
            manager_id: RwSignal::new(String::new()),
            password: RwSignal::new(String::new()),
            confirm_password: RwSignal::new(String::new()),
        }
    }

    /// 切换角色；切到经理时清空已选经理
    pub fn set_role(&self, role: Role) {
        self.role.set(role);
        if role == Role::Manager {
            self.manager_id.set(String::new());
        }
    }

    /// 读取当前表单快照
    pub fn draft(&self) -> SignupDraft {
        SignupDraft {
            name: self.name.get_untracked(),
            email: self.email.get_untracked(),
            role: self.role.get_untracked(),
            manager_id: self.manager_id.get_untracked(),
            password: self.password.get_untracked(),
            confirm_password: self.confirm_password.get_untracked(),
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

/// 表单快照
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SignupDraft {
    pub name: String,
    pub email: String,
    pub role: Role,
    pub manager_id: String,
    pub password: String,
    pub confirm_password: String,
}

impl SignupDraft {
    /// 按顺序校验，返回第一条失败信息；通过时转换为注册请求
    pub fn validate(&self) -> Result<RegisterRequest, String> {
        if self.name.trim().is_empty() {
            return Err("Name is required".into());
        }
        if self.email.trim().is_empty() {
            return Err("Email is required".into());
        }
        if !is_valid_email(&self.email) {
            return Err("Please enter a valid email address".into());
        }
        if self.password.chars().count() < MIN_PASSWORD_LEN {
            return Err(format!(
                "Password must be at least {} characters long",
                MIN_PASSWORD_LEN
            ));
        }
        if self.password != self.confirm_password {
            return Err("Passwords do not match".into());
        }
        if self.role == Role::Employee && self.manager_id.is_empty() {
            return Err("Please select a manager".into());
        }

        Ok(RegisterRequest {
            name: self.name.trim().to_string(),
            email: self.email.trim().to_string(),
            password: self.password.clone(),
            role: self.role,
            manager_id: match self.role {
                Role::Employee => Some(self.manager_id.clone()),
                Role::Manager => None,
            },
        })
    }
}

/// `local@domain.tld` 形式，不含空白，仅一个 `@`
pub fn is_valid_email(email: &str) -> bool {
    if email.chars().any(char::is_whitespace) {
        return false;
    }
    let Some((local, domain)) = email.split_once('@') else {
        return false;
    };
    if local.is_empty() || domain.contains('@') {
        return false;
    }
    domain
        .char_indices()
        .any(|(i, c)| c == '.' && i > 0 && i + 1 < domain.len())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn valid_employee() -> SignupDraft {
        SignupDraft {
            name: "  Eve Adams ".into(),
            email: "eve@corp.io".into(),
            role: Role::Employee,
            manager_id: "m1".into(),
            password: "secret1".into(),
            confirm_password: "secret1".into(),
        }
    }

    #[test]
    fn email_shape() {
        assert!(is_valid_email("a@b.co"));
        assert!(is_valid_email("first.last@mail.corp.io"));
        assert!(!is_valid_email("a@b"));
        assert!(!is_valid_email("a@.io"));
        assert!(!is_valid_email("a@b."));
        assert!(!is_valid_email("@b.io"));
        assert!(!is_valid_email("a@@b.io"));
        assert!(!is_valid_email("a b@c.io"));
        assert!(!is_valid_email(" a@b.io"));
    }

    #[test]
    fn first_failure_wins() {
        let blank = SignupDraft::default();
        assert_eq!(blank.validate().unwrap_err(), "Name is required");

        let mut draft = valid_employee();
        draft.email = "   ".into();
        draft.password = "x".into();
        assert_eq!(draft.validate().unwrap_err(), "Email is required");

        draft.email = "not-an-email".into();
        assert_eq!(
            draft.validate().unwrap_err(),
            "Please enter a valid email address"
        );

        draft.email = "eve@corp.io".into();
        assert_eq!(
            draft.validate().unwrap_err(),
            "Password must be at least 6 characters long"
        );

        draft.password = "secret1".into();
        draft.confirm_password = "secret2".into();
        assert_eq!(draft.validate().unwrap_err(), "Passwords do not match");

        draft.confirm_password = "secret1".into();
        draft.manager_id.clear();
        assert_eq!(draft.validate().unwrap_err(), "Please select a manager");
    }

    #[test]
    fn employee_request_is_trimmed_and_carries_manager() {
        let req = valid_employee().validate().unwrap();
        assert_eq!(req.name, "Eve Adams");
        assert_eq!(req.email, "eve@corp.io");
        assert_eq!(req.role, Role::Employee);
        assert_eq!(req.manager_id.as_deref(), Some("m1"));
    }

    #[test]
    fn manager_needs_no_manager() {
        let mut draft = valid_employee();
        draft.role = Role::Manager;
        draft.manager_id.clear();

        let req = draft.validate().unwrap();
        assert_eq!(req.role, Role::Manager);
        assert_eq!(req.manager_id, None);
    }
}
