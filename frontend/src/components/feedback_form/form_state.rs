//! 反馈表单状态

use feedback_portal_shared::{CreateFeedbackRequest, Feedback, Sentiment, UpdateFeedbackRequest};
use leptos::prelude::*;

/// 新建或编辑
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FormMode {
    New { employee_id: String },
    Edit { feedback_id: String },
}

impl FormMode {
    pub fn is_edit(&self) -> bool {
        matches!(self, FormMode::Edit { .. })
    }
}

#[derive(Clone, Copy)]
pub struct FormState {
    pub strengths: RwSignal<String>,
    pub improvements: RwSignal<String>,
    pub sentiment: RwSignal<Sentiment>,
}

impl FormState {
    pub fn new() -> Self {
        Self {
            strengths: RwSignal::new(String::new()),
            improvements: RwSignal::new(String::new()),
            sentiment: RwSignal::new(Sentiment::Positive),
        }
    }

    /// 用已有反馈预填
    pub fn fill(&self, feedback: &Feedback) {
        self.strengths.set(feedback.strengths.clone());
        self.improvements.set(feedback.improvements.clone());
        self.sentiment.set(feedback.sentiment);
    }

    pub fn draft(&self) -> FeedbackDraft {
        FeedbackDraft {
            strengths: self.strengths.get_untracked(),
            improvements: self.improvements.get_untracked(),
            sentiment: self.sentiment.get_untracked(),
        }
    }
}

impl Default for FormState {
    fn default() -> Self {
        Self::new()
    }
}

/// 提交瞬间的表单快照
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedbackDraft {
    pub strengths: String,
    pub improvements: String,
    pub sentiment: Sentiment,
}

impl FeedbackDraft {
    /// 两段文字都不能为空白
    pub fn check(&self) -> Result<(), String> {
        if self.strengths.trim().is_empty() || self.improvements.trim().is_empty() {
            return Err("Please fill in both strengths and areas for improvement".into());
        }
        Ok(())
    }

    pub fn to_create(&self, employee_id: &str) -> CreateFeedbackRequest {
        CreateFeedbackRequest {
            employee_id: employee_id.to_string(),
            strengths: self.strengths.clone(),
            improvements: self.improvements.clone(),
            sentiment: self.sentiment,
        }
    }

    /// 编辑时整体提交三项
    pub fn to_update(&self) -> UpdateFeedbackRequest {
        UpdateFeedbackRequest {
            strengths: Some(self.strengths.clone()),
            improvements: Some(self.improvements.clone()),
            sentiment: Some(self.sentiment),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn blank_text_is_rejected() {
        let mut draft = FeedbackDraft {
            strengths: "great reviews".into(),
            improvements: "  \n".into(),
            sentiment: Sentiment::Neutral,
        };
        assert!(draft.check().is_err());

        draft.improvements = "time boxing".into();
        assert_eq!(draft.check(), Ok(()));
    }

    #[test]
    fn builds_requests() {
        let draft = FeedbackDraft {
            strengths: "mentoring".into(),
            improvements: "docs".into(),
            sentiment: Sentiment::Negative,
        };

        let create = draft.to_create("e7");
        assert_eq!(create.employee_id, "e7");
        assert_eq!(create.sentiment, Sentiment::Negative);

        let update = draft.to_update();
        assert_eq!(update.strengths.as_deref(), Some("mentoring"));
        assert_eq!(update.sentiment, Some(Sentiment::Negative));
    }
}
