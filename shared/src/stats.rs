//! 列表派生计算
//!
//! 排序、按员工过滤、情感统计。数据量很小，全部是线性扫描。

use crate::{Feedback, Sentiment};

/// 按创建时间倒序（最新在前）
pub fn sort_newest_first(feedbacks: &mut [Feedback]) {
    feedbacks.sort_by(|a, b| b.created_at.cmp(&a.created_at));
}

/// 某员工收到的反馈，最新在前
pub fn for_employee(feedbacks: &[Feedback], employee_id: &str) -> Vec<Feedback> {
    let mut list: Vec<Feedback> = feedbacks
        .iter()
        .filter(|f| f.employee_id == employee_id)
        .cloned()
        .collect();
    sort_newest_first(&mut list);
    list
}

pub fn latest_for_employee<'a>(feedbacks: &'a [Feedback], employee_id: &str) -> Option<&'a Feedback> {
    feedbacks
        .iter()
        .filter(|f| f.employee_id == employee_id)
        .max_by_key(|f| f.created_at)
}

pub fn count_for_employee(feedbacks: &[Feedback], employee_id: &str) -> usize {
    feedbacks.iter().filter(|f| f.employee_id == employee_id).count()
}

/// 情感分布
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SentimentStats {
    pub total: usize,
    pub positive: usize,
    pub neutral: usize,
    pub negative: usize,
}

impl SentimentStats {
    pub fn from_feedbacks(feedbacks: &[Feedback]) -> Self {
        feedbacks.iter().fold(Self::default(), |mut stats, f| {
            stats.total += 1;
            match f.sentiment {
                Sentiment::Positive => stats.positive += 1,
                Sentiment::Neutral => stats.neutral += 1,
                Sentiment::Negative => stats.negative += 1,
            }
            stats
        })
    }
}

/// 已读统计
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AcknowledgementStats {
    pub total: usize,
    pub acknowledged: usize,
    pub unacknowledged: usize,
}

impl AcknowledgementStats {
    pub fn from_feedbacks(feedbacks: &[Feedback]) -> Self {
        let acknowledged = feedbacks.iter().filter(|f| f.acknowledged).count();
        Self {
            total: feedbacks.len(),
            acknowledged,
            unacknowledged: feedbacks.len() - acknowledged,
        }
    }
}

/// 每个单词的首字母，连续空格忽略
pub fn initials(name: &str) -> String {
    name.split_whitespace()
        .filter_map(|word| word.chars().next())
        .collect()
}

/// 历史页标题："0 feedbacks" / "1 feedback" / "3 feedbacks"
pub fn feedback_count_label(count: usize) -> String {
    if count == 1 {
        "1 feedback".to_string()
    } else {
        format!("{count} feedbacks")
    }
}

/// 团队列表行：只有多于一条时用复数，"0 feedback" / "1 feedback" / "3 feedbacks"
pub fn member_feedback_count_label(count: usize) -> String {
    if count > 1 {
        format!("{count} feedbacks")
    } else {
        format!("{count} feedback")
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Timestamp;

    fn feedback(id: &str, employee: &str, created: &str, sentiment: Sentiment, ack: bool) -> Feedback {
        Feedback {
            id: id.to_string(),
            manager_id: "m1".to_string(),
            employee_id: employee.to_string(),
            strengths: String::new(),
            improvements: String::new(),
            sentiment,
            created_at: Timestamp::parse(created).unwrap(),
            updated_at: None,
            acknowledged: ack,
        }
    }

    fn sample() -> Vec<Feedback> {
        vec![
            feedback("a", "e1", "2024-01-01T09:00:00", Sentiment::Positive, true),
            feedback("b", "e2", "2024-03-01T09:00:00", Sentiment::Negative, false),
            feedback("c", "e1", "2024-02-01T09:00:00.250", Sentiment::Neutral, false),
            feedback("d", "e1", "2023-12-24T18:30:00", Sentiment::Positive, false),
        ]
    }

    #[test]
    fn sorts_descending_by_creation() {
        let mut list = sample();
        sort_newest_first(&mut list);
        let ids: Vec<_> = list.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["b", "c", "a", "d"]);
    }

    #[test]
    fn filters_by_employee_and_keeps_order() {
        let list = for_employee(&sample(), "e1");
        let ids: Vec<_> = list.iter().map(|f| f.id.as_str()).collect();
        assert_eq!(ids, ["c", "a", "d"]);
        assert!(for_employee(&sample(), "nobody").is_empty());
    }

    #[test]
    fn latest_per_employee() {
        let all = sample();
        assert_eq!(latest_for_employee(&all, "e1").map(|f| f.id.as_str()), Some("c"));
        assert_eq!(count_for_employee(&all, "e1"), 3);
        assert!(latest_for_employee(&all, "e3").is_none());
    }

    #[test]
    fn aggregates() {
        let all = sample();
        assert_eq!(
            SentimentStats::from_feedbacks(&all),
            SentimentStats {
                total: 4,
                positive: 2,
                neutral: 1,
                negative: 1
            }
        );
        let ack = AcknowledgementStats::from_feedbacks(&all);
        assert_eq!((ack.total, ack.acknowledged, ack.unacknowledged), (4, 1, 3));
        assert_eq!(SentimentStats::from_feedbacks(&[]), SentimentStats::default());
    }

    #[test]
    fn labels() {
        assert_eq!(initials("Ada  King Lovelace"), "AKL");
        assert_eq!(initials(""), "");
        assert_eq!(feedback_count_label(0), "0 feedbacks");
        assert_eq!(feedback_count_label(1), "1 feedback");
        assert_eq!(feedback_count_label(2), "2 feedbacks");
    }

    #[test]
    fn member_row_label_is_singular_for_empty_rows() {
        assert_eq!(member_feedback_count_label(0), "0 feedback");
        assert_eq!(member_feedback_count_label(1), "1 feedback");
        assert_eq!(member_feedback_count_label(4), "4 feedbacks");
    }
}
