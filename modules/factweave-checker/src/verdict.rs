//! Aggregating agent verdicts into one overall assessment.

use factweave_common::{AgentAnalysis, Verdict};

/// Overall verdict and confidence across agent analyses.
///
/// Each scorable verdict is weighted by its agent's confidence before
/// averaging; UNVERIFIABLE verdicts contribute no score but still drag the
/// overall confidence down through the confidence mean. No scorable verdicts
/// at all means the statement stays UNVERIFIABLE.
pub fn aggregate(analyses: &[AgentAnalysis]) -> (Verdict, f32) {
    if analyses.is_empty() {
        return (Verdict::Unverifiable, 0.0);
    }

    let weighted: Vec<f32> = analyses
        .iter()
        .filter_map(|a| a.verdict.score().map(|s| s * a.confidence))
        .collect();

    let verdict = if weighted.is_empty() {
        Verdict::Unverifiable
    } else {
        let avg = weighted.iter().sum::<f32>() / weighted.len() as f32;
        Verdict::from_score(avg)
    };

    let confidence = analyses.iter().map(|a| a.confidence).sum::<f32>() / analyses.len() as f32;

    (verdict, confidence)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn analysis(name: &str, verdict: Verdict, confidence: f32) -> AgentAnalysis {
        AgentAnalysis {
            agent_name: name.to_string(),
            perspective: String::new(),
            analysis: String::new(),
            confidence,
            key_findings: vec![],
            supporting_evidence: vec![],
            verdict,
            reasoning: String::new(),
        }
    }

    #[test]
    fn empty_analyses_are_unverifiable() {
        assert_eq!(aggregate(&[]), (Verdict::Unverifiable, 0.0));
    }

    #[test]
    fn unanimous_confident_truth() {
        let analyses = vec![
            analysis("a", Verdict::True, 0.9),
            analysis("b", Verdict::True, 0.95),
        ];
        let (verdict, confidence) = aggregate(&analyses);
        assert_eq!(verdict, Verdict::True);
        assert!((confidence - 0.925).abs() < 1e-6);
    }

    #[test]
    fn low_confidence_drags_a_true_verdict_down() {
        // TRUE at 0.4 confidence weighs in at 0.4, down in the MISLEADING band.
        let analyses = vec![analysis("a", Verdict::True, 0.4)];
        let (verdict, _) = aggregate(&analyses);
        assert_eq!(verdict, Verdict::Misleading);
    }

    #[test]
    fn unverifiable_agents_lower_confidence_but_not_verdict() {
        let analyses = vec![
            analysis("a", Verdict::True, 1.0),
            analysis("b", Verdict::Unverifiable, 0.0),
        ];
        let (verdict, confidence) = aggregate(&analyses);
        assert_eq!(verdict, Verdict::True);
        assert!((confidence - 0.5).abs() < 1e-6);
    }

    #[test]
    fn all_unverifiable_stays_unverifiable() {
        let analyses = vec![
            analysis("a", Verdict::Unverifiable, 0.8),
            analysis("b", Verdict::Unverifiable, 0.6),
        ];
        let (verdict, confidence) = aggregate(&analyses);
        assert_eq!(verdict, Verdict::Unverifiable);
        assert!((confidence - 0.7).abs() < 1e-6);
    }

    #[test]
    fn mixed_verdicts_land_in_the_middle_bands() {
        let analyses = vec![
            analysis("a", Verdict::True, 1.0),
            analysis("b", Verdict::False, 1.0),
        ];
        // Weighted scores 1.0 and 0.0 average to 0.5.
        let (verdict, _) = aggregate(&analyses);
        assert_eq!(verdict, Verdict::PartiallyTrue);
    }
}
