pub mod openai;

use std::time::Duration;

use serde::Deserialize;
use thiserror::Error;

use crate::core::task::Task;

/// How long a failure notice stays on screen before the fallback list
/// replaces it. Presentation dwell, not a correctness requirement.
pub const ERROR_NOTICE_DWELL: Duration = Duration::from_millis(1000);

/// One item of the classifier's structured answer.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
pub struct ExtractedTask {
    pub text: String,
    pub category: String,
}

/// The exact JSON shape the classifier's textual answer must parse as.
#[derive(Debug, Deserialize)]
pub struct ClassifyResponse {
    pub tasks: Vec<ExtractedTask>,
}

#[derive(Debug, Error)]
pub enum ClassifyError {
    #[error("no credential configured")]
    MissingCredential,
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),
    #[error("service returned {status}: {body}")]
    Status { status: u16, body: String },
    #[error("malformed response: {0}")]
    Malformed(String),
}

/// Seam between the pipeline and the classification transport, so the
/// pipeline's degradation rules can be exercised without a network.
#[allow(async_fn_in_trait)]
pub trait Classifier {
    async fn classify(&self, transcript: &str) -> Result<Vec<ExtractedTask>, ClassifyError>;
}

/// How a transcript became a task list.
#[derive(Debug)]
pub enum Extraction {
    /// The classification service produced the list.
    Classified(Vec<Task>),
    /// No credential configured; the demonstration list stands in. This is
    /// the expected unconfigured state, not an error.
    Fallback(Vec<Task>),
    /// The call failed; the demonstration list stands in after a transient
    /// notice.
    Recovered { error: String, tasks: Vec<Task> },
}

impl Extraction {
    pub fn into_tasks(self) -> Vec<Task> {
        match self {
            Self::Classified(tasks) | Self::Fallback(tasks) => tasks,
            Self::Recovered { tasks, .. } => tasks,
        }
    }
}

/// Turn a transcript into task records. There is no failure path: every
/// problem degrades to the fixed demonstration list, so voice-to-task
/// conversion always produces *some* list.
///
/// Categories outside the four legal ids pass through unvalidated; the
/// category store's fallback rule is the safety net.
pub async fn extract<C: Classifier>(classifier: &C, transcript: &str) -> Extraction {
    match classifier.classify(transcript).await {
        Ok(items) => {
            log::info!("classifier returned {} tasks", items.len());
            let tasks = items
                .into_iter()
                .map(|item| Task::from_extracted(item.text, item.category))
                .collect();
            Extraction::Classified(tasks)
        }
        Err(ClassifyError::MissingCredential) => {
            log::info!("no credential configured, using demonstration tasks");
            Extraction::Fallback(fallback_tasks())
        }
        Err(e) => {
            log::warn!("classification failed: {}", e);
            Extraction::Recovered {
                error: e.to_string(),
                tasks: fallback_tasks(),
            }
        }
    }
}

/// The literal demonstration list: 3 work, 3 home, 2 personal.
const FALLBACK: [(&str, &str); 8] = [
    ("会議の資料を準備する", "work"),
    ("牛乳を買いに行く", "home"),
    ("ジムに行く", "personal"),
    (
        "クライアントに送るプレゼン資料を完成させて、上司に確認してもらってから最終版を提出する",
        "work",
    ),
    (
        "スーパーで今週の食材をまとめ買いして、帰りに薬局で洗剤とシャンプーも買ってくる",
        "home",
    ),
    (
        "英語の勉強を1時間やって、それから読みかけの本を30ページ読み進める",
        "personal",
    ),
    ("メールを返信する", "work"),
    ("部屋を掃除する", "home"),
];

/// Fresh task records for the demonstration list, all later/incomplete.
pub fn fallback_tasks() -> Vec<Task> {
    FALLBACK
        .iter()
        .map(|(text, category)| Task::from_extracted(*text, *category))
        .collect()
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{Classifier, ClassifyError, ExtractedTask};

    /// Scripted classifier for pipeline and controller tests.
    pub(crate) enum StubClassifier {
        Ok(Vec<ExtractedTask>),
        NoCredential,
        Failing,
    }

    impl Classifier for StubClassifier {
        async fn classify(
            &self,
            _transcript: &str,
        ) -> Result<Vec<ExtractedTask>, ClassifyError> {
            match self {
                Self::Ok(items) => Ok(items.clone()),
                Self::NoCredential => Err(ClassifyError::MissingCredential),
                Self::Failing => Err(ClassifyError::Status {
                    status: 500,
                    body: "boom".to_string(),
                }),
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::testing::StubClassifier;
    use super::*;
    use crate::core::task::Timing;

    fn category_count(tasks: &[Task], id: &str) -> usize {
        tasks.iter().filter(|t| t.category == id).count()
    }

    #[test]
    fn fallback_list_shape() {
        let tasks = fallback_tasks();
        assert_eq!(tasks.len(), 8);
        assert_eq!(category_count(&tasks, "work"), 3);
        assert_eq!(category_count(&tasks, "home"), 3);
        assert_eq!(category_count(&tasks, "personal"), 2);
        assert_eq!(category_count(&tasks, "other"), 0);
        for task in &tasks {
            assert_eq!(task.timing, Timing::Later);
            assert!(!task.completed);
        }
    }

    #[tokio::test]
    async fn no_credential_yields_fallback_regardless_of_transcript() {
        let classifier = StubClassifier::NoCredential;
        let extraction = extract(&classifier, "会議の準備をする").await;
        let Extraction::Fallback(tasks) = extraction else {
            panic!("expected fallback");
        };
        let expected: Vec<&str> = FALLBACK.iter().map(|(text, _)| *text).collect();
        let got: Vec<&str> = tasks.iter().map(|t| t.text.as_str()).collect();
        assert_eq!(got, expected);
    }

    #[tokio::test]
    async fn service_failure_recovers_with_fallback() {
        let classifier = StubClassifier::Failing;
        let extraction = extract(&classifier, "whatever").await;
        match extraction {
            Extraction::Recovered { error, tasks } => {
                assert!(error.contains("500"));
                assert_eq!(tasks.len(), 8);
            }
            other => panic!("expected recovery, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn classified_items_map_to_fresh_later_tasks() {
        let classifier = StubClassifier::Ok(vec![
            ExtractedTask {
                text: "メールを返信する".to_string(),
                category: "work".to_string(),
            },
            ExtractedTask {
                text: "stretch".to_string(),
                // not one of the legal four; passes through unvalidated
                category: "fitness".to_string(),
            },
        ]);
        let tasks = extract(&classifier, "text").await.into_tasks();
        assert_eq!(tasks.len(), 2);
        assert_ne!(tasks[0].id, tasks[1].id);
        assert_eq!(tasks[1].category, "fitness");
        for task in &tasks {
            assert_eq!(task.timing, Timing::Later);
            assert!(!task.completed);
        }
    }
}
