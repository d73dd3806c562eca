//! The persona agents: four perspectives that each turn the research into a
//! structured [`AgentAnalysis`].
//!
//! Models do not always honour the output contract, so parsing degrades in
//! stages: schema-constrained extraction, then salvaging JSON out of a plain
//! completion, then wrapping the raw text. An agent that fails entirely still
//! yields an analysis, with zero confidence and an UNVERIFIABLE verdict.

use futures::future::join_all;
use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, warn};

use ai_client::{extract, Completion};
use factweave_common::{salvage, AgentAnalysis, Evidence, ResearchData, Verdict};

use crate::prompts;

#[derive(Debug, Clone, Copy)]
pub struct AgentSpec {
    pub name: &'static str,
    pub perspective: &'static str,
    system: &'static str,
}

/// The standard roster. Order is the order analyses appear in the report.
pub fn roster() -> Vec<AgentSpec> {
    vec![
        AgentSpec {
            name: "factchecker",
            perspective: "Professional fact-checker validating against verified sources",
            system: prompts::FACTCHECKER_SYSTEM,
        },
        AgentSpec {
            name: "nerd",
            perspective: "Data scientist examining statistics and methodology",
            system: prompts::NERD_SYSTEM,
        },
        AgentSpec {
            name: "skeptic",
            perspective: "Critical analyst uncovering manipulation and hidden agendas",
            system: prompts::SKEPTIC_SYSTEM,
        },
        AgentSpec {
            name: "joe",
            perspective: "Regular person using common sense",
            system: prompts::JOE_SYSTEM,
        },
    ]
}

/// What the model is asked to emit. Verdict arrives as a string so that a
/// model inventing "MOSTLY TRUE" degrades to lenient parsing instead of a
/// deserialization error.
#[derive(Debug, Deserialize, JsonSchema)]
struct AgentWire {
    analysis: String,
    confidence: f32,
    key_findings: Vec<String>,
    supporting_evidence: Vec<Evidence>,
    verdict: String,
    reasoning: String,
}

/// Permissive variant used when salvaging JSON from a plain completion.
#[derive(Debug, Default, Deserialize)]
struct LenientWire {
    #[serde(default)]
    analysis: String,
    #[serde(default, alias = "confidence_score")]
    confidence: Option<f32>,
    #[serde(default)]
    key_findings: Vec<String>,
    #[serde(default)]
    supporting_evidence: Vec<Evidence>,
    #[serde(default)]
    verdict: String,
    #[serde(default)]
    reasoning: String,
}

impl AgentSpec {
    /// Run this persona over the research. Infallible by construction.
    pub async fn analyze(&self, model: &dyn Completion, research: &ResearchData) -> AgentAnalysis {
        info!(agent = self.name, "Running agent analysis");
        let user = prompts::analysis_input(research);

        match extract::<AgentWire>(model, self.system, &user).await {
            Ok(wire) => self.from_wire(wire),
            Err(extract_err) => {
                warn!(agent = self.name, error = %extract_err, "Structured extraction failed, salvaging");
                match model.complete(self.system, &user).await {
                    Ok(text) => self.salvage(&text),
                    Err(e) => {
                        warn!(agent = self.name, error = %e, "Agent analysis failed");
                        self.error_analysis(&e.to_string())
                    }
                }
            }
        }
    }

    fn from_wire(&self, wire: AgentWire) -> AgentAnalysis {
        let verdict = Verdict::parse_lenient(&wire.verdict).unwrap_or(Verdict::Unverifiable);
        AgentAnalysis {
            agent_name: self.name.to_string(),
            perspective: self.perspective.to_string(),
            analysis: wire.analysis,
            confidence: wire.confidence.clamp(0.0, 1.0),
            key_findings: wire.key_findings,
            supporting_evidence: wire.supporting_evidence,
            verdict,
            reasoning: wire.reasoning,
        }
    }

    /// Pull whatever JSON is buried in the completion; failing that, keep
    /// the text itself as the analysis.
    fn salvage(&self, text: &str) -> AgentAnalysis {
        if let Some(value) = salvage::extract_json_object(text) {
            if let Ok(wire) = serde_json::from_value::<LenientWire>(value) {
                let verdict = Verdict::parse_lenient(&wire.verdict).unwrap_or(Verdict::Unverifiable);
                return AgentAnalysis {
                    agent_name: self.name.to_string(),
                    perspective: self.perspective.to_string(),
                    analysis: if wire.analysis.is_empty() {
                        text.to_string()
                    } else {
                        wire.analysis
                    },
                    confidence: wire.confidence.unwrap_or(0.5).clamp(0.0, 1.0),
                    key_findings: wire.key_findings,
                    supporting_evidence: wire.supporting_evidence,
                    verdict,
                    reasoning: wire.reasoning,
                };
            }
        }

        AgentAnalysis {
            agent_name: self.name.to_string(),
            perspective: self.perspective.to_string(),
            analysis: text.to_string(),
            confidence: 0.5,
            key_findings: vec!["Unable to parse structured response".to_string()],
            supporting_evidence: vec![],
            verdict: Verdict::Unverifiable,
            reasoning: "Response could not be parsed into structured format".to_string(),
        }
    }

    fn error_analysis(&self, error: &str) -> AgentAnalysis {
        AgentAnalysis {
            agent_name: self.name.to_string(),
            perspective: format!("Error in {} analysis", self.name),
            analysis: format!("Analysis failed due to error: {error}"),
            confidence: 0.0,
            key_findings: vec![format!("Agent {} encountered an error", self.name)],
            supporting_evidence: vec![],
            verdict: Verdict::Unverifiable,
            reasoning: format!("Error occurred during analysis: {error}"),
        }
    }
}

/// Run every roster agent concurrently over the same research.
pub async fn run_all(model: &dyn Completion, research: &ResearchData) -> Vec<AgentAnalysis> {
    let analyses = join_all(
        roster()
            .into_iter()
            .map(|agent| async move { agent.analyze(model, research).await }),
    )
    .await;

    info!(count = analyses.len(), "Completed agent analyses");
    analyses
}

#[cfg(test)]
mod tests {
    use super::*;
    use async_trait::async_trait;
    use serde_json::{json, Value};

    /// Stub model: structured extraction fails, plain completion returns a
    /// canned response.
    struct TextOnlyModel {
        response: String,
    }

    #[async_trait]
    impl Completion for TextOnlyModel {
        async fn complete(&self, _system: &str, _user: &str) -> anyhow::Result<String> {
            Ok(self.response.clone())
        }

        async fn extract_value(
            &self,
            _system: &str,
            _user: &str,
            _schema_name: &str,
            _schema: Value,
        ) -> anyhow::Result<Value> {
            anyhow::bail!("structured output unsupported")
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct StructuredModel {
        value: Value,
    }

    #[async_trait]
    impl Completion for StructuredModel {
        async fn complete(&self, _system: &str, _user: &str) -> anyhow::Result<String> {
            anyhow::bail!("not used")
        }

        async fn extract_value(
            &self,
            _system: &str,
            _user: &str,
            _schema_name: &str,
            _schema: Value,
        ) -> anyhow::Result<Value> {
            Ok(self.value.clone())
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    struct FailingModel;

    #[async_trait]
    impl Completion for FailingModel {
        async fn complete(&self, _system: &str, _user: &str) -> anyhow::Result<String> {
            anyhow::bail!("connection refused")
        }

        async fn extract_value(
            &self,
            _system: &str,
            _user: &str,
            _schema_name: &str,
            _schema: Value,
        ) -> anyhow::Result<Value> {
            anyhow::bail!("connection refused")
        }

        fn name(&self) -> &str {
            "stub"
        }
    }

    fn research() -> ResearchData {
        ResearchData {
            statement: "The budget doubled".to_string(),
            speaker: "Someone".to_string(),
            context: Default::default(),
            statement_findings: String::new(),
            context_findings: String::new(),
            speaker_info: String::new(),
            sources: vec![],
            summary: "summary".to_string(),
        }
    }

    #[tokio::test]
    async fn structured_output_maps_to_analysis() {
        let model = StructuredModel {
            value: json!({
                "analysis": "Checked the numbers",
                "confidence": 0.9,
                "key_findings": ["budget grew 40%"],
                "supporting_evidence": [{"source": "report", "excerpt": "grew by 40%"}],
                "verdict": "MISLEADING",
                "reasoning": "Growth was real but not a doubling"
            }),
        };
        let spec = &roster()[0];
        let analysis = spec.analyze(&model, &research()).await;
        assert_eq!(analysis.agent_name, "factchecker");
        assert_eq!(analysis.verdict, Verdict::Misleading);
        assert_eq!(analysis.supporting_evidence.len(), 1);
    }

    #[tokio::test]
    async fn out_of_range_confidence_is_clamped() {
        let model = StructuredModel {
            value: json!({
                "analysis": "a",
                "confidence": 3.5,
                "key_findings": [],
                "supporting_evidence": [],
                "verdict": "TRUE",
                "reasoning": "r"
            }),
        };
        let analysis = roster()[1].analyze(&model, &research()).await;
        assert_eq!(analysis.confidence, 1.0);
    }

    #[tokio::test]
    async fn salvages_json_from_prose_completion() {
        let model = TextOnlyModel {
            response: "Here is my take:\n{\"analysis\": \"looks off\", \"confidence_score\": 0.7, \"verdict\": \"partially true\"}"
                .to_string(),
        };
        let analysis = roster()[2].analyze(&model, &research()).await;
        assert_eq!(analysis.verdict, Verdict::PartiallyTrue);
        assert_eq!(analysis.confidence, 0.7);
        assert_eq!(analysis.analysis, "looks off");
    }

    #[tokio::test]
    async fn unparseable_completion_keeps_text_as_analysis() {
        let model = TextOnlyModel {
            response: "I simply cannot say.".to_string(),
        };
        let analysis = roster()[3].analyze(&model, &research()).await;
        assert_eq!(analysis.verdict, Verdict::Unverifiable);
        assert_eq!(analysis.confidence, 0.5);
        assert!(analysis.analysis.contains("cannot say"));
    }

    #[tokio::test]
    async fn transport_failure_yields_zero_confidence() {
        let analysis = roster()[0].analyze(&FailingModel, &research()).await;
        assert_eq!(analysis.confidence, 0.0);
        assert_eq!(analysis.verdict, Verdict::Unverifiable);
        assert!(analysis.analysis.contains("connection refused"));
    }

    #[tokio::test]
    async fn run_all_returns_one_analysis_per_agent() {
        let analyses = run_all(&FailingModel, &research()).await;
        assert_eq!(analyses.len(), 4);
        let names: Vec<&str> = analyses.iter().map(|a| a.agent_name.as_str()).collect();
        assert_eq!(names, vec!["factchecker", "nerd", "skeptic", "joe"]);
    }
}
