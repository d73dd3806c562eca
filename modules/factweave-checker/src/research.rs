//! Web research for one statement: statement search, context search, and
//! speaker background, compiled into [`ResearchData`].
//!
//! Every step fails soft. A search that errors leaves a marker string in the
//! findings and simply contributes no source; research never aborts a check.

use std::sync::Arc;

use tracing::{info, warn};

use ai_client::Completion;
use factweave_common::{truncate_chars, EvidenceSource, ResearchData, SourceKind, StatementInput};
use search_client::{SearchClient, Wikipedia};

use crate::prompts;

/// Speaker background is kept short; it sets credibility, not evidence.
const MAX_SPEAKER_CHARS: usize = 500;
/// Per-source cap when compiling evidence for the report.
const MAX_SOURCE_CHARS: usize = 1000;

pub struct Researcher {
    model: Arc<dyn Completion>,
    search: SearchClient,
    wikipedia: Option<Wikipedia>,
    max_search_chars: usize,
}

impl Researcher {
    pub fn new(
        model: Arc<dyn Completion>,
        search: SearchClient,
        wikipedia: Option<Wikipedia>,
        max_search_chars: usize,
    ) -> Self {
        Self {
            model,
            search,
            wikipedia,
            max_search_chars,
        }
    }

    /// Run the full research pass. Infallible: each failed step is recorded
    /// in the findings text and excluded from the compiled sources.
    pub async fn research(&self, input: &StatementInput) -> ResearchData {
        info!(speaker = %input.speaker, "Starting research");

        let statement_findings = self.search_statement(input).await;
        let context_findings = self.search_context(input).await;
        let speaker_info = self.research_speaker(&input.speaker).await;

        let sources = compile_sources(&statement_findings, &context_findings, &speaker_info);

        let statement_text = step_text(&statement_findings, "Statement search failed");
        let context_text = step_text(&context_findings, "Context search failed");
        let speaker_text = step_text(&speaker_info, "Speaker research failed");

        let mut research = ResearchData {
            statement: input.statement.clone(),
            speaker: input.speaker.clone(),
            context: input.background.clone(),
            statement_findings: statement_text,
            context_findings: context_text,
            speaker_info: speaker_text,
            sources,
            summary: String::new(),
        };
        research.summary = self.generate_summary(&research).await;

        info!(
            sources = research.sources.len(),
            "Research completed"
        );
        research
    }

    async fn search_statement(&self, input: &StatementInput) -> Result<String, String> {
        let query = format!(
            "\"{}\" {} fact check verification",
            input.statement, input.speaker
        );
        info!(%query, "Searching for statement");

        match self.search.search_text(&query).await {
            Ok(text) => Ok(truncate_chars(&text, self.max_search_chars).to_string()),
            Err(e) => {
                warn!(error = %e, "Statement search failed");
                Err(e.to_string())
            }
        }
    }

    async fn search_context(&self, input: &StatementInput) -> Result<String, String> {
        let mut parts = vec![input.statement.clone()];
        for key in ["when", "where"] {
            if let Some(value) = input.background.get(key) {
                parts.push(value.clone());
            }
        }
        parts.push("background context".to_string());
        let query = parts.join(" ");
        info!(%query, "Searching for context");

        match self.search.search_text(&query).await {
            Ok(text) => Ok(truncate_chars(&text, self.max_search_chars).to_string()),
            Err(e) => {
                warn!(error = %e, "Context search failed");
                Err(e.to_string())
            }
        }
    }

    /// Wikipedia summary when enabled, web search otherwise.
    async fn research_speaker(&self, speaker: &str) -> Result<String, String> {
        if let Some(ref wikipedia) = self.wikipedia {
            info!(speaker, "Researching speaker via Wikipedia");
            match wikipedia.summary(speaker).await {
                Ok(Some(extract)) => {
                    return Ok(truncate_chars(&extract, MAX_SPEAKER_CHARS).to_string())
                }
                Ok(None) => return Ok("No Wikipedia information found".to_string()),
                Err(e) => {
                    warn!(error = %e, "Wikipedia lookup failed, trying web search");
                }
            }
        }

        let query = format!("\"{speaker}\" biography background political history");
        match self.search.search_text(&query).await {
            Ok(text) => Ok(truncate_chars(&text, MAX_SPEAKER_CHARS).to_string()),
            Err(e) => {
                warn!(error = %e, "Speaker research failed");
                Err(e.to_string())
            }
        }
    }

    async fn generate_summary(&self, research: &ResearchData) -> String {
        let user = prompts::summary_input(
            research,
            &research.statement_findings,
            &research.context_findings,
            &research.speaker_info,
        );

        info!("Generating research summary");
        match self
            .model
            .complete(prompts::RESEARCH_SUMMARY_SYSTEM, &user)
            .await
        {
            Ok(summary) => summary,
            Err(e) => {
                warn!(error = %e, "Summary generation failed");
                format!("Failed to generate summary: {e}")
            }
        }
    }
}

fn step_text(step: &Result<String, String>, label: &str) -> String {
    match step {
        Ok(text) => text.clone(),
        Err(e) => format!("{label}: {e}"),
    }
}

/// Sources only include steps that succeeded and found something.
fn compile_sources(
    statement_findings: &Result<String, String>,
    context_findings: &Result<String, String>,
    speaker_info: &Result<String, String>,
) -> Vec<EvidenceSource> {
    let mut sources = Vec::new();

    if let Ok(content) = statement_findings {
        if !content.trim().is_empty() {
            sources.push(EvidenceSource {
                kind: SourceKind::StatementSearch,
                content: truncate_chars(content, MAX_SOURCE_CHARS).to_string(),
                description: "Web search results for the statement and fact-checking".to_string(),
            });
        }
    }

    if let Ok(content) = context_findings {
        if !content.trim().is_empty() {
            sources.push(EvidenceSource {
                kind: SourceKind::ContextSearch,
                content: truncate_chars(content, MAX_SOURCE_CHARS).to_string(),
                description: "Background and contextual information".to_string(),
            });
        }
    }

    if let Ok(content) = speaker_info {
        if !content.trim().is_empty() {
            sources.push(EvidenceSource {
                kind: SourceKind::SpeakerResearch,
                content: truncate_chars(content, MAX_SOURCE_CHARS).to_string(),
                description: "Information about the speaker's background and credibility"
                    .to_string(),
            });
        }
    }

    sources
}

#[cfg(test)]
mod tests {
    use super::*;

    use std::sync::Mutex;
    use std::time::Duration;

    use async_trait::async_trait;
    use serde_json::Value;

    use search_client::{RateLimiter, SearchBackend, SearchHit};

    /// Backend that records every query and returns no hits.
    struct RecordingBackend {
        queries: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl SearchBackend for RecordingBackend {
        async fn search(&self, query: &str) -> search_client::Result<Vec<SearchHit>> {
            self.queries.lock().unwrap().push(query.to_string());
            Ok(Vec::new())
        }

        fn name(&self) -> &'static str {
            "recording"
        }
    }

    struct SummaryModel;

    #[async_trait]
    impl Completion for SummaryModel {
        async fn complete(&self, _system: &str, _user: &str) -> anyhow::Result<String> {
            Ok("summary".to_string())
        }

        async fn extract_value(
            &self,
            _system: &str,
            _user: &str,
            _schema_name: &str,
            _schema: Value,
        ) -> anyhow::Result<Value> {
            anyhow::bail!("not used")
        }

        fn name(&self) -> &str {
            "summary"
        }
    }

    #[tokio::test]
    async fn research_issues_the_three_query_shapes() {
        let queries = Arc::new(Mutex::new(Vec::new()));
        let backend = Arc::new(RecordingBackend {
            queries: Arc::clone(&queries),
        });
        let search = SearchClient::from_backend(backend, Arc::new(RateLimiter::new(Duration::ZERO)));
        let researcher = Researcher::new(Arc::new(SummaryModel), search, None, 1500);

        let input = StatementInput::new("The earth is flat", "Jane Doe")
            .with_background("when", "2024")
            .with_background("where", "a rally");
        researcher.research(&input).await;

        let queries = queries.lock().unwrap();
        assert_eq!(queries.len(), 3);
        assert_eq!(
            queries[0],
            "\"The earth is flat\" Jane Doe fact check verification"
        );
        assert!(queries[1].contains("2024"));
        assert!(queries[1].contains("a rally"));
        assert!(queries[1].ends_with("background context"));
        assert_eq!(
            queries[2],
            "\"Jane Doe\" biography background political history"
        );
    }

    #[test]
    fn failed_steps_are_excluded_from_sources() {
        let sources = compile_sources(
            &Ok("statement evidence".to_string()),
            &Err("timeout".to_string()),
            &Ok("speaker bio".to_string()),
        );
        assert_eq!(sources.len(), 2);
        assert_eq!(sources[0].kind, SourceKind::StatementSearch);
        assert_eq!(sources[1].kind, SourceKind::SpeakerResearch);
    }

    #[test]
    fn empty_findings_produce_no_source() {
        let sources = compile_sources(
            &Ok("   ".to_string()),
            &Ok(String::new()),
            &Err("down".to_string()),
        );
        assert!(sources.is_empty());
    }

    #[test]
    fn source_content_is_capped() {
        let long = "x".repeat(5000);
        let sources = compile_sources(&Ok(long), &Err(String::new()), &Err(String::new()));
        assert_eq!(sources[0].content.len(), 1000);
    }
}
