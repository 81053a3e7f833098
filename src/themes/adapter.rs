use crate::catalog::{catalog, OpenQuestion};
use crate::comparison::latest_per_participant;
use crate::config::{ClassifierConfig, ClassifierSettings};
use crate::core::{CohortId, Phase, ResponseSet};
use crate::themes::anonymize::QuoteBatch;
use crate::themes::classifier::{parse_reply, ClassifierError, ClassifierRequest, ThemeClassifier};
use crate::themes::command::classifier_from_config;
use crate::themes::summary::{ThemeStatus, ThemeSummary};
use std::io;
use std::sync::Arc;
use tokio::runtime::{Builder, Runtime};
use tokio::sync::Semaphore;
use tokio::time::timeout;
use tracing::{debug, info_span, warn};

/// Turns a cohort's free-text answers into theme summaries.
///
/// Owns a small tokio runtime. Calls run on the blocking pool, at most
/// `max_concurrent_requests` at a time, each bounded by `timeout`. Any
/// classifier failure degrades to an empty summary; nothing here fails the
/// caller.
///
/// The adapter blocks on its own runtime, so it must be driven from
/// synchronous code.
pub struct ThemeClassifierAdapter {
    classifier: Arc<dyn ThemeClassifier>,
    settings: ClassifierSettings,
    runtime: Option<Runtime>,
}

impl std::fmt::Debug for ThemeClassifierAdapter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ThemeClassifierAdapter")
            .field("classifier", &self.classifier.name())
            .field("settings", &self.settings)
            .finish()
    }
}

enum Pending {
    Ready(ThemeSummary),
    Send {
        request: ClassifierRequest,
        quote_count: usize,
    },
}

impl ThemeClassifierAdapter {
    pub fn new(
        classifier: Arc<dyn ThemeClassifier>,
        settings: ClassifierSettings,
    ) -> io::Result<Self> {
        let runtime = Builder::new_multi_thread()
            .worker_threads(settings.concurrency().min(4))
            .thread_name("readiness-themes")
            .enable_time()
            .build()?;
        Ok(Self {
            classifier,
            settings,
            runtime: Some(runtime),
        })
    }

    /// Adapter for the backend configured in `[classifier]`.
    pub fn from_config(config: &ClassifierConfig) -> io::Result<Self> {
        Self::new(classifier_from_config(config), config.settings())
    }

    pub fn settings(&self) -> ClassifierSettings {
        self.settings
    }

    /// Summary for one question.
    pub fn summarize(
        &self,
        cohort_id: &CohortId,
        question: &OpenQuestion,
        sets: &[ResponseSet],
    ) -> ThemeSummary {
        self.summarize_questions(cohort_id, &[question], sets)
            .pop()
            .unwrap_or_else(|| {
                ThemeSummary::empty(
                    cohort_id.clone(),
                    question.phase,
                    question.id,
                    0,
                    ThemeStatus::Unavailable,
                )
            })
    }

    /// Summaries for every open question of `phase`, in catalog order.
    pub fn summarize_phase(
        &self,
        cohort_id: &CohortId,
        phase: Phase,
        sets: &[ResponseSet],
    ) -> Vec<ThemeSummary> {
        let questions: Vec<&OpenQuestion> = catalog().open_questions(phase).collect();
        self.summarize_questions(cohort_id, &questions, sets)
    }

    /// One summary per question, in the order given.
    pub fn summarize_questions(
        &self,
        cohort_id: &CohortId,
        questions: &[&OpenQuestion],
        sets: &[ResponseSet],
    ) -> Vec<ThemeSummary> {
        let _span = info_span!(
            "theme_classification",
            cohort = %cohort_id,
            classifier = self.classifier.name()
        )
        .entered();

        let pending: Vec<Pending> = questions
            .iter()
            .map(|question| self.prepare(cohort_id, question, sets))
            .collect();

        let Some(runtime) = self.runtime.as_ref() else {
            return pending
                .into_iter()
                .map(|p| match p {
                    Pending::Ready(summary) => summary,
                    Pending::Send {
                        request,
                        quote_count,
                    } => degrade(
                        &request,
                        quote_count,
                        ClassifierError::Unavailable("runtime shut down".into()),
                    ),
                })
                .collect();
        };

        runtime.block_on(self.dispatch(pending))
    }

    fn prepare(&self, cohort_id: &CohortId, question: &OpenQuestion, sets: &[ResponseSet]) -> Pending {
        let in_cohort = move || sets.iter().filter(move |s| s.cohort_id() == cohort_id);
        let selected = latest_per_participant(in_cohort(), question.phase);
        let batch = QuoteBatch::collect(selected.into_values(), question.id);

        if batch.is_empty() {
            debug!(question = %question.id, "No answers to classify");
            return Pending::Ready(ThemeSummary::empty(
                cohort_id.clone(),
                question.phase,
                question.id,
                0,
                ThemeStatus::NoResponses,
            ));
        }

        let quote_count = batch.len();
        let request = match catalog().followed_up(question) {
            Some(earlier) => {
                let answered = latest_per_participant(in_cohort(), earlier.phase);
                let context = QuoteBatch::collect(answered.into_values(), earlier.id);
                debug!(
                    question = %question.id,
                    context = context.len(),
                    "Quoting earlier answers as context"
                );
                ClassifierRequest::reflecting(
                    cohort_id.clone(),
                    question,
                    batch.quotes,
                    context.quotes,
                    self.settings.max_themes,
                )
            }
            None => ClassifierRequest::new(
                cohort_id.clone(),
                question,
                batch.quotes,
                self.settings.max_themes,
            ),
        };
        Pending::Send {
            request,
            quote_count,
        }
    }

    async fn dispatch(&self, pending: Vec<Pending>) -> Vec<ThemeSummary> {
        let semaphore = Arc::new(Semaphore::new(self.settings.concurrency()));

        // Each task is paired with the summary reported if the task itself fails.
        let handles: Vec<_> = pending
            .into_iter()
            .map(|p| match p {
                Pending::Ready(summary) => {
                    let fallback = summary.clone();
                    (tokio::spawn(async move { summary }), fallback)
                }
                Pending::Send {
                    request,
                    quote_count,
                } => {
                    let fallback = ThemeSummary::empty(
                        request.cohort_id.clone(),
                        request.phase,
                        request.question_id,
                        quote_count,
                        ThemeStatus::Unavailable,
                    );
                    let classifier = Arc::clone(&self.classifier);
                    let semaphore = Arc::clone(&semaphore);
                    let settings = self.settings;
                    let task = tokio::spawn(async move {
                        let reply = call(classifier, semaphore, &request, settings).await;
                        into_summary(&request, quote_count, reply, settings.max_themes)
                    });
                    (task, fallback)
                }
            })
            .collect();

        let mut summaries = Vec::with_capacity(handles.len());
        for (handle, fallback) in handles {
            match handle.await {
                Ok(summary) => summaries.push(summary),
                Err(err) => {
                    warn!(
                        cohort = %fallback.cohort_id,
                        question = %fallback.question,
                        error = %err,
                        "Theme classification task failed"
                    );
                    summaries.push(fallback);
                }
            }
        }
        summaries
    }
}

impl Drop for ThemeClassifierAdapter {
    fn drop(&mut self) {
        // A hung classifier call must not block the caller.
        if let Some(runtime) = self.runtime.take() {
            runtime.shutdown_background();
        }
    }
}

async fn call(
    classifier: Arc<dyn ThemeClassifier>,
    semaphore: Arc<Semaphore>,
    request: &ClassifierRequest,
    settings: ClassifierSettings,
) -> Result<String, ClassifierError> {
    let permit = match timeout(settings.timeout, semaphore.acquire_owned()).await {
        Ok(Ok(permit)) => permit,
        Ok(Err(closed)) => return Err(ClassifierError::Unavailable(closed.to_string())),
        Err(_) => return Err(ClassifierError::TimedOut(settings.timeout)),
    };

    let request = request.clone();
    // The permit travels with the call so a timed-out call still counts
    // against the limit until it returns.
    let handle = tokio::task::spawn_blocking(move || {
        let _permit = permit;
        classifier.classify(&request)
    });

    match timeout(settings.timeout, handle).await {
        Ok(Ok(reply)) => reply,
        Ok(Err(join)) => Err(ClassifierError::Unavailable(join.to_string())),
        Err(_) => Err(ClassifierError::TimedOut(settings.timeout)),
    }
}

fn into_summary(
    request: &ClassifierRequest,
    quote_count: usize,
    reply: Result<String, ClassifierError>,
    max_themes: usize,
) -> ThemeSummary {
    match reply.and_then(|text| parse_reply(&text, quote_count, max_themes)) {
        Ok(themes) => {
            debug!(question = %request.question_id, themes = themes.len(), "Themes classified");
            ThemeSummary {
                cohort_id: request.cohort_id.clone(),
                phase: request.phase,
                question: request.question_id,
                themes,
                total_quotes: quote_count,
                status: ThemeStatus::Classified,
            }
        }
        Err(err) => degrade(request, quote_count, err),
    }
}

fn degrade(request: &ClassifierRequest, quote_count: usize, err: ClassifierError) -> ThemeSummary {
    let status = match err {
        ClassifierError::Unavailable(_) => ThemeStatus::Unavailable,
        ClassifierError::Malformed(_) => ThemeStatus::Malformed,
        ClassifierError::TimedOut(_) => ThemeStatus::TimedOut,
    };
    warn!(
        cohort = %request.cohort_id,
        question = %request.question_id,
        error = %err,
        "Theme classification degraded to an empty summary"
    );
    ThemeSummary::empty(
        request.cohort_id.clone(),
        request.phase,
        request.question_id,
        quote_count,
        status,
    )
}
