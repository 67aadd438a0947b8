use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Scheduling bucket for a task. Tapping the timing chip advances it
/// through the cycle later -> today -> week -> later.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Timing {
    Today,
    Week,
    #[default]
    Later,
}

impl Timing {
    pub fn cycle(self) -> Self {
        match self {
            Self::Later => Self::Today,
            Self::Today => Self::Week,
            Self::Week => Self::Later,
        }
    }

    pub fn as_keyword(&self) -> &'static str {
        match self {
            Self::Today => "today",
            Self::Week => "week",
            Self::Later => "later",
        }
    }
}

/// View predicate over the task list. Never persisted on tasks.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum TimingFilter {
    #[default]
    All,
    Today,
    Week,
    Later,
}

impl TimingFilter {
    pub fn matches(self, timing: Timing) -> bool {
        match self {
            Self::All => true,
            Self::Today => timing == Timing::Today,
            Self::Week => timing == Timing::Week,
            Self::Later => timing == Timing::Later,
        }
    }

    pub fn from_keyword(s: &str) -> Option<Self> {
        match s {
            "all" => Some(Self::All),
            "today" => Some(Self::Today),
            "week" => Some(Self::Week),
            "later" => Some(Self::Later),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: Uuid,
    pub text: String,
    /// Category id. Resolved through the category store's fallback rule,
    /// never assumed to be one of the seeded four.
    pub category: String,
    pub timing: Timing,
    pub completed: bool,
    pub created: DateTime<Utc>,
}

impl Task {
    /// An empty task awaiting its first edit, as created by the add button.
    pub fn new(category: impl Into<String>) -> Self {
        Self::from_extracted(String::new(), category)
    }

    /// A task produced by the extraction pipeline: fresh time-ordered id,
    /// default timing, not completed.
    pub fn from_extracted(text: impl Into<String>, category: impl Into<String>) -> Self {
        Self {
            id: Uuid::now_v7(),
            text: text.into(),
            category: category.into(),
            timing: Timing::default(),
            completed: false,
            created: Utc::now(),
        }
    }

    pub fn is_active(&self) -> bool {
        !self.completed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cycle_has_length_three() {
        for timing in [Timing::Today, Timing::Week, Timing::Later] {
            assert_eq!(timing.cycle().cycle().cycle(), timing);
        }
        assert_eq!(Timing::Later.cycle(), Timing::Today);
        assert_eq!(Timing::Today.cycle(), Timing::Week);
        assert_eq!(Timing::Week.cycle(), Timing::Later);
    }

    #[test]
    fn new_task_defaults() {
        let task = Task::new("home");
        assert_eq!(task.text, "");
        assert_eq!(task.category, "home");
        assert_eq!(task.timing, Timing::Later);
        assert!(task.is_active());
    }

    #[test]
    fn timing_serializes_lowercase() {
        assert_eq!(serde_json::to_string(&Timing::Later).unwrap(), "\"later\"");
        let parsed: Timing = serde_json::from_str("\"today\"").unwrap();
        assert_eq!(parsed, Timing::Today);
    }

    #[test]
    fn filter_all_matches_every_timing() {
        for timing in [Timing::Today, Timing::Week, Timing::Later] {
            assert!(TimingFilter::All.matches(timing));
        }
        assert!(!TimingFilter::Today.matches(Timing::Week));
        assert_eq!(TimingFilter::from_keyword("week"), Some(TimingFilter::Week));
        assert_eq!(TimingFilter::from_keyword("someday"), None);
    }
}
