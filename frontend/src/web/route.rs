//! 路由定义模块 - 领域模型
//!
//! 这是纯粹的业务逻辑层，不依赖于 DOM 或 web_sys。
//! 定义了应用的所有路由、路径参数及守卫规则。

use std::fmt::Display;

/// 应用路由枚举
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum AppRoute {
    /// 登录页面 (默认路由)
    #[default]
    Login,
    /// 注册页面
    Signup,
    /// 首页：按角色渲染经理 / 员工面板 (需要认证)
    Dashboard,
    /// 为员工新建反馈 (需要认证)
    NewFeedback { employee_id: String },
    /// 编辑已有反馈 (需要认证)
    EditFeedback { feedback_id: String },
    /// 员工的反馈历史 (需要认证)
    FeedbackHistory { employee_id: String },
    /// 页面未找到
    NotFound,
}

/// 守卫结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GuardDecision {
    Allow,
    Redirect(AppRoute),
}

impl AppRoute {
    /// 将 URL path 解析为路由枚举
    pub fn from_path(path: &str) -> Self {
        let segments: Vec<&str> = path.split('/').filter(|s| !s.is_empty()).collect();
        match segments.as_slice() {
            [] => Self::Dashboard,
            ["login"] => Self::Login,
            ["signup"] => Self::Signup,
            ["feedback", "new", id] => Self::NewFeedback {
                employee_id: id.to_string(),
            },
            ["feedback", "edit", id] => Self::EditFeedback {
                feedback_id: id.to_string(),
            },
            ["feedback", "history", id] => Self::FeedbackHistory {
                employee_id: id.to_string(),
            },
            _ => Self::NotFound,
        }
    }

    /// 获取路由对应的 URL path
    pub fn to_path(&self) -> String {
        match self {
            Self::Login => "/login".to_string(),
            Self::Signup => "/signup".to_string(),
            Self::Dashboard => "/".to_string(),
            Self::NewFeedback { employee_id } => format!("/feedback/new/{}", employee_id),
            Self::EditFeedback { feedback_id } => format!("/feedback/edit/{}", feedback_id),
            Self::FeedbackHistory { employee_id } => format!("/feedback/history/{}", employee_id),
            Self::NotFound => "/404".to_string(),
        }
    }

    /// **核心守卫逻辑：定义该路由是否需要认证**
    pub fn requires_auth(&self) -> bool {
        matches!(
            self,
            Self::Dashboard
                | Self::NewFeedback { .. }
                | Self::EditFeedback { .. }
                | Self::FeedbackHistory { .. }
        )
    }

    /// 定义已认证用户是否应该离开此路由（登录 / 注册页）
    pub fn should_redirect_when_authenticated(&self) -> bool {
        matches!(self, Self::Login | Self::Signup)
    }

    /// 获取认证失败时的重定向目标
    pub fn auth_failure_redirect() -> Self {
        Self::Login
    }

    /// 获取认证成功时的重定向目标（从登录页）
    pub fn auth_success_redirect() -> Self {
        Self::Dashboard
    }

    /// 对目标路由执行守卫
    pub fn guard(&self, is_authenticated: bool) -> GuardDecision {
        if self.requires_auth() && !is_authenticated {
            GuardDecision::Redirect(Self::auth_failure_redirect())
        } else if self.should_redirect_when_authenticated() && is_authenticated {
            GuardDecision::Redirect(Self::auth_success_redirect())
        } else {
            GuardDecision::Allow
        }
    }
}

/// 未登录也可停留的路径；401 时若已在这些页面则不再跳转
pub fn is_public_path(path: &str) -> bool {
    AppRoute::from_path(path).should_redirect_when_authenticated()
}

impl Display for AppRoute {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.to_path())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_parameterised_paths() {
        assert_eq!(AppRoute::from_path("/"), AppRoute::Dashboard);
        assert_eq!(AppRoute::from_path("/login/"), AppRoute::Login);
        assert_eq!(
            AppRoute::from_path("/feedback/new/e42"),
            AppRoute::NewFeedback {
                employee_id: "e42".into()
            }
        );
        assert_eq!(
            AppRoute::from_path("/feedback/edit/f7"),
            AppRoute::EditFeedback {
                feedback_id: "f7".into()
            }
        );
        assert_eq!(AppRoute::from_path("/feedback/new"), AppRoute::NotFound);
        assert_eq!(AppRoute::from_path("/nope"), AppRoute::NotFound);
    }

    #[test]
    fn paths_round_trip() {
        let route = AppRoute::FeedbackHistory {
            employee_id: "e1".into(),
        };
        assert_eq!(AppRoute::from_path(&route.to_path()), route);
        assert_eq!(AppRoute::Dashboard.to_string(), "/");
    }

    #[test]
    fn guarded_routes_send_anonymous_viewers_to_login() {
        for path in ["/", "/feedback/new/e1", "/feedback/edit/f1", "/feedback/history/e1"] {
            assert_eq!(
                AppRoute::from_path(path).guard(false),
                GuardDecision::Redirect(AppRoute::Login),
                "{path}"
            );
            assert_eq!(AppRoute::from_path(path).guard(true), GuardDecision::Allow);
        }
    }

    #[test]
    fn signed_in_viewers_leave_login_and_signup() {
        assert_eq!(
            AppRoute::Login.guard(true),
            GuardDecision::Redirect(AppRoute::Dashboard)
        );
        assert_eq!(
            AppRoute::Signup.guard(true),
            GuardDecision::Redirect(AppRoute::Dashboard)
        );
        assert_eq!(AppRoute::Signup.guard(false), GuardDecision::Allow);
        assert_eq!(AppRoute::NotFound.guard(false), GuardDecision::Allow);
    }

    #[test]
    fn public_paths() {
        assert!(is_public_path("/login"));
        assert!(is_public_path("/signup"));
        assert!(!is_public_path("/"));
        assert!(!is_public_path("/feedback/history/e1"));
    }
}
