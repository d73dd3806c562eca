//! The fact-check orchestrator: research, persona analyses, aggregation,
//! and (optionally) cross-agent synthesis.

use std::sync::Arc;

use chrono::Utc;
use tracing::info;

use ai_client::Completion;
use factweave_common::{excerpt, FactCheckReport, StatementInput};

use crate::agents;
use crate::research::Researcher;
use crate::synthesis;
use crate::verdict;

/// Report excerpts stay short; the full source text lives in research logs.
const SOURCE_EXCERPT_CHARS: usize = 200;

pub struct FactChecker {
    model: Arc<dyn Completion>,
    researcher: Researcher,
}

impl FactChecker {
    pub fn new(model: Arc<dyn Completion>, researcher: Researcher) -> Self {
        Self { model, researcher }
    }

    /// Fact-check one statement end to end. Never errors: every stage fails
    /// soft, and a statement nothing can be said about comes back
    /// UNVERIFIABLE with zero confidence rather than as an `Err`.
    pub async fn check(&self, input: &StatementInput, extended: bool) -> FactCheckReport {
        info!(speaker = %input.speaker, "Starting fact-check");

        let mut research = self.researcher.research(input).await;
        let analyses = agents::run_all(self.model.as_ref(), &research).await;
        let (overall_verdict, confidence) = verdict::aggregate(&analyses);

        let synthesis = if extended {
            Some(synthesis::synthesize(self.model.as_ref(), &research, &analyses).await)
        } else {
            None
        };

        for source in &mut research.sources {
            source.content = excerpt(&source.content, SOURCE_EXCERPT_CHARS);
        }

        info!(
            verdict = %overall_verdict,
            confidence,
            "Fact-check completed"
        );

        FactCheckReport {
            statement: input.statement.clone(),
            speaker: input.speaker.clone(),
            context: input.background.clone(),
            checked_at: Utc::now(),
            research_summary: research.summary,
            sources: research.sources,
            agent_analyses: analyses,
            overall_verdict,
            confidence,
            synthesis,
        }
    }
}
