//! Extended evaluation: synthesize the persona analyses into a consensus
//! view with disagreements and follow-up questions.

use schemars::JsonSchema;
use serde::Deserialize;
use tracing::{info, warn};

use ai_client::{extract, Completion};
use factweave_common::{AgentAnalysis, ResearchData, Synthesis, Verdict};

use crate::prompts;
use crate::verdict;

const MAX_FOLLOW_UPS: usize = 3;

/// Where a verdict sits on the agree/disagree axis, for consensus scoring.
fn sentiment(verdict: Verdict) -> f32 {
    match verdict {
        Verdict::True => 1.0,
        Verdict::PartiallyTrue => 0.5,
        Verdict::Unverifiable => 0.0,
        Verdict::Misleading => -0.5,
        Verdict::False => -1.0,
    }
}

/// Agreement level across agent verdicts, 0.0 to 1.0.
/// Variance of the verdict sentiments, inverted and normalized by the
/// widest possible spread. Fewer than two analyses trivially agree.
pub fn consensus(analyses: &[AgentAnalysis]) -> f32 {
    if analyses.len() < 2 {
        return 1.0;
    }

    let sentiments: Vec<f32> = analyses.iter().map(|a| sentiment(a.verdict)).collect();
    let mean = sentiments.iter().sum::<f32>() / sentiments.len() as f32;
    let variance =
        sentiments.iter().map(|s| (s - mean).powi(2)).sum::<f32>() / sentiments.len() as f32;

    1.0 - (variance / 4.0).min(1.0)
}

/// Every pair of agents whose verdicts differ, rendered for the report.
pub fn disagreements(analyses: &[AgentAnalysis]) -> Vec<String> {
    let mut out = Vec::new();
    for (i, a) in analyses.iter().enumerate() {
        for b in &analyses[i + 1..] {
            if a.verdict != b.verdict {
                out.push(format!(
                    "{} says {} but {} says {}",
                    a.agent_name, a.verdict, b.agent_name, b.verdict
                ));
            }
        }
    }
    out
}

#[derive(Debug, Deserialize, JsonSchema)]
struct SynthesisWire {
    summary: String,
    verdict: String,
    follow_ups: Vec<String>,
}

/// Synthesize the analyses with the LLM. Infallible: if the model call
/// fails, the synthesis falls back to the aggregate verdict with a stub
/// summary, so an extended check still produces a report.
pub async fn synthesize(
    model: &dyn Completion,
    research: &ResearchData,
    analyses: &[AgentAnalysis],
) -> Synthesis {
    let consensus = consensus(analyses);
    let avg_confidence = if analyses.is_empty() {
        0.5
    } else {
        analyses.iter().map(|a| a.confidence).sum::<f32>() / analyses.len() as f32
    };
    // Strong consensus lifts confidence, disagreement halves it.
    let confidence = avg_confidence * (0.5 + 0.5 * consensus);

    let perspectives = serde_json::to_string_pretty(analyses).unwrap_or_default();
    let user = format!(
        "Statement: \"{}\"\n\nMultiple agents have analyzed this statement:\n\n{}",
        research.statement, perspectives
    );

    info!("Synthesizing agent perspectives");
    let (summary, verdict, follow_ups) =
        match extract::<SynthesisWire>(model, prompts::SYNTHESIS_SYSTEM, &user).await {
            Ok(wire) => {
                let verdict = Verdict::parse_lenient(&wire.verdict).unwrap_or(Verdict::Unverifiable);
                (wire.summary, verdict, dedupe_follow_ups(wire.follow_ups))
            }
            Err(e) => {
                warn!(error = %e, "Synthesis failed, falling back to aggregate verdict");
                let (verdict, _) = verdict::aggregate(analyses);
                (
                    format!("Synthesis unavailable: {e}"),
                    verdict,
                    Vec::new(),
                )
            }
        };

    Synthesis {
        summary,
        verdict,
        confidence,
        consensus,
        key_disagreements: disagreements(analyses),
        follow_ups,
    }
}

fn dedupe_follow_ups(follow_ups: Vec<String>) -> Vec<String> {
    let mut seen = Vec::new();
    for f in follow_ups {
        let trimmed = f.trim().to_string();
        if !trimmed.is_empty() && !seen.contains(&trimmed) {
            seen.push(trimmed);
        }
        if seen.len() == MAX_FOLLOW_UPS {
            break;
        }
    }
    seen
}
