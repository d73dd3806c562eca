use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use schemars::JsonSchema;
use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Verdicts
// ---------------------------------------------------------------------------

/// The five-way verdict every agent (and the overall report) lands on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, JsonSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Verdict {
    True,
    PartiallyTrue,
    Misleading,
    False,
    Unverifiable,
}

impl Verdict {
    /// Numeric weight used when averaging agent verdicts.
    /// Unverifiable carries no weight and is excluded from the mean.
    pub fn score(self) -> Option<f32> {
        match self {
            Verdict::True => Some(1.0),
            Verdict::PartiallyTrue => Some(0.6),
            Verdict::Misleading => Some(0.3),
            Verdict::False => Some(0.0),
            Verdict::Unverifiable => None,
        }
    }

    /// Map an averaged score back onto a verdict.
    pub fn from_score(score: f32) -> Self {
        if score >= 0.8 {
            Verdict::True
        } else if score >= 0.5 {
            Verdict::PartiallyTrue
        } else if score >= 0.2 {
            Verdict::Misleading
        } else {
            Verdict::False
        }
    }

    /// Parse a verdict from free-form LLM output. Accepts the wire form
    /// ("PARTIALLY_TRUE") and a few common spellings; anything else is None.
    pub fn parse_lenient(s: &str) -> Option<Self> {
        let normalized = s.trim().to_uppercase().replace([' ', '-'], "_");
        match normalized.as_str() {
            "TRUE" => Some(Verdict::True),
            "PARTIALLY_TRUE" | "PARTLY_TRUE" | "MOSTLY_TRUE" => Some(Verdict::PartiallyTrue),
            "MISLEADING" | "SELECTIVE_TRUTH" => Some(Verdict::Misleading),
            "FALSE" | "LIE" => Some(Verdict::False),
            "UNVERIFIABLE" | "UNKNOWN" => Some(Verdict::Unverifiable),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Verdict::True => "TRUE",
            Verdict::PartiallyTrue => "PARTIALLY_TRUE",
            Verdict::Misleading => "MISLEADING",
            Verdict::False => "FALSE",
            Verdict::Unverifiable => "UNVERIFIABLE",
        }
    }
}

impl fmt::Display for Verdict {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Fact-check inputs and research
// ---------------------------------------------------------------------------

/// A statement to fact-check, with who said it and in what setting.
/// `background` carries free-form context pairs, typically "where" and "when".
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StatementInput {
    pub statement: String,
    pub speaker: String,
    #[serde(default)]
    pub background: BTreeMap<String, String>,
}

impl StatementInput {
    pub fn new(statement: impl Into<String>, speaker: impl Into<String>) -> Self {
        Self {
            statement: statement.into(),
            speaker: speaker.into(),
            background: BTreeMap::new(),
        }
    }

    pub fn with_background(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.background.insert(key.into(), value.into());
        self
    }
}

/// Which research step produced a piece of evidence.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceKind {
    StatementSearch,
    ContextSearch,
    SpeakerResearch,
}

/// A block of research findings attributed to one research step.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EvidenceSource {
    pub kind: SourceKind,
    pub content: String,
    pub description: String,
}

/// Everything the research step gathered for one statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ResearchData {
    pub statement: String,
    pub speaker: String,
    pub context: BTreeMap<String, String>,
    pub statement_findings: String,
    pub context_findings: String,
    pub speaker_info: String,
    pub sources: Vec<EvidenceSource>,
    pub summary: String,
}

// ---------------------------------------------------------------------------
// Agent output
// ---------------------------------------------------------------------------

/// One quote backing an agent's analysis.
#[derive(Debug, Clone, Serialize, Deserialize, JsonSchema)]
pub struct Evidence {
    pub source: String,
    pub excerpt: String,
}

/// The structured analysis every persona agent produces.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentAnalysis {
    pub agent_name: String,
    pub perspective: String,
    pub analysis: String,
    /// 0.0 to 1.0, clamped at construction.
    pub confidence: f32,
    pub key_findings: Vec<String>,
    pub supporting_evidence: Vec<Evidence>,
    pub verdict: Verdict,
    pub reasoning: String,
}

// ---------------------------------------------------------------------------
// Synthesis and final report
// ---------------------------------------------------------------------------

/// Cross-agent synthesis: what the perspectives agree on and where they split.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Synthesis {
    pub summary: String,
    pub verdict: Verdict,
    pub confidence: f32,
    /// 0.0 (no agreement) to 1.0 (full agreement) across agent verdicts.
    pub consensus: f32,
    pub key_disagreements: Vec<String>,
    pub follow_ups: Vec<String>,
}

/// The complete fact-check output for one statement.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FactCheckReport {
    pub statement: String,
    pub speaker: String,
    pub context: BTreeMap<String, String>,
    pub checked_at: DateTime<Utc>,
    pub research_summary: String,
    pub sources: Vec<EvidenceSource>,
    pub agent_analyses: Vec<AgentAnalysis>,
    pub overall_verdict: Verdict,
    pub confidence: f32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub synthesis: Option<Synthesis>,
}

// ---------------------------------------------------------------------------
// Ranked lists
// ---------------------------------------------------------------------------

/// List categories with dedicated prompt templates. Anything else falls
/// through to a generic template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Category {
    Movies,
    Sports,
    Music,
    Games,
    Other(String),
}

impl FromStr for Category {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "movies" | "films" | "cinema" | "movie" | "film" => Category::Movies,
            "sports" | "athletes" | "sporting" | "sport" => Category::Sports,
            "music" | "albums" | "songs" | "artists" | "album" => Category::Music,
            "games" | "video games" | "gaming" | "game" => Category::Games,
            other => Category::Other(other.to_string()),
        })
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Category::Movies => f.write_str("movies"),
            Category::Sports => f.write_str("sports"),
            Category::Music => f.write_str("music"),
            Category::Games => f.write_str("games"),
            Category::Other(s) => f.write_str(s),
        }
    }
}

/// Time scope for a ranked list: all-time or a single decade.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TimePeriod {
    AllTime,
    Decade(u16),
}

impl TimePeriod {
    /// Human phrasing used inside prompts: "of all time" / "from the 1990s".
    pub fn phrase(self) -> String {
        match self {
            TimePeriod::AllTime => "of all time".to_string(),
            TimePeriod::Decade(d) => format!("from the {d}s"),
        }
    }
}

impl FromStr for TimePeriod {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        if s.eq_ignore_ascii_case("all_time") || s.eq_ignore_ascii_case("all-time") {
            return Ok(TimePeriod::AllTime);
        }
        // "1990s", "2010s"
        if let Some(years) = s.strip_suffix('s') {
            if years.len() == 4 {
                if let Ok(decade) = years.parse::<u16>() {
                    if decade % 10 == 0 {
                        return Ok(TimePeriod::Decade(decade));
                    }
                }
            }
        }
        Err(format!("unrecognized time period: {s} (expected all_time or a decade like 1990s)"))
    }
}

impl fmt::Display for TimePeriod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TimePeriod::AllTime => f.write_str("all_time"),
            TimePeriod::Decade(d) => write!(f, "{d}s"),
        }
    }
}

/// Outcome of image URL enrichment for one list item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum ImageStatus {
    /// Existing URL checked and alive.
    Valid,
    /// Existing URL was broken and a live replacement was found.
    Replaced,
    /// No URL existed; a live one was found.
    Found,
    /// A candidate was found but failed validation.
    Failed,
    /// No candidate found at all.
    NotFound,
    #[default]
    Unchecked,
}

/// One entry of a generated ranked list. Optional fields vary by category
/// (movies carry runtime and awards, sports carry accolades, and so on).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedItem {
    pub title: String,
    pub creator: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub year: Option<i32>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub genres: Vec<String>,
    /// 1-based position in the list; 1 is the top entry.
    pub rank: u32,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub estimated_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub accolades: Vec<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub image_url: Option<String>,
    #[serde(default)]
    pub image_status: ImageStatus,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Truncate to at most `max` bytes without splitting a UTF-8 character.
pub fn truncate_chars(s: &str, max: usize) -> &str {
    if s.len() <= max {
        return s;
    }
    let mut end = max;
    while !s.is_char_boundary(end) {
        end -= 1;
    }
    &s[..end]
}

/// Truncate and mark with an ellipsis, for report excerpts.
pub fn excerpt(s: &str, max: usize) -> String {
    if s.len() <= max {
        s.to_string()
    } else {
        format!("{}...", truncate_chars(s, max))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn verdict_scores_match_thresholds() {
        assert_eq!(Verdict::True.score(), Some(1.0));
        assert_eq!(Verdict::PartiallyTrue.score(), Some(0.6));
        assert_eq!(Verdict::Misleading.score(), Some(0.3));
        assert_eq!(Verdict::False.score(), Some(0.0));
        assert_eq!(Verdict::Unverifiable.score(), None);

        assert_eq!(Verdict::from_score(0.85), Verdict::True);
        assert_eq!(Verdict::from_score(0.6), Verdict::PartiallyTrue);
        assert_eq!(Verdict::from_score(0.3), Verdict::Misleading);
        assert_eq!(Verdict::from_score(0.1), Verdict::False);
    }

    #[test]
    fn verdict_roundtrips_through_score() {
        for v in [Verdict::True, Verdict::PartiallyTrue, Verdict::Misleading, Verdict::False] {
            assert_eq!(Verdict::from_score(v.score().unwrap()), v);
        }
    }

    #[test]
    fn verdict_lenient_parsing() {
        assert_eq!(Verdict::parse_lenient("partially true"), Some(Verdict::PartiallyTrue));
        assert_eq!(Verdict::parse_lenient("FALSE"), Some(Verdict::False));
        assert_eq!(Verdict::parse_lenient("  true "), Some(Verdict::True));
        assert_eq!(Verdict::parse_lenient("banana"), None);
    }

    #[test]
    fn verdict_wire_form_is_screaming_snake() {
        let json = serde_json::to_string(&Verdict::PartiallyTrue).unwrap();
        assert_eq!(json, "\"PARTIALLY_TRUE\"");
        let back: Verdict = serde_json::from_str("\"UNVERIFIABLE\"").unwrap();
        assert_eq!(back, Verdict::Unverifiable);
    }

    #[test]
    fn category_aliases() {
        assert_eq!("films".parse::<Category>().unwrap(), Category::Movies);
        assert_eq!("Athletes".parse::<Category>().unwrap(), Category::Sports);
        assert_eq!("albums".parse::<Category>().unwrap(), Category::Music);
        assert_eq!("gaming".parse::<Category>().unwrap(), Category::Games);
        assert_eq!(
            "books".parse::<Category>().unwrap(),
            Category::Other("books".to_string())
        );
    }

    #[test]
    fn time_period_parsing() {
        assert_eq!("all_time".parse::<TimePeriod>().unwrap(), TimePeriod::AllTime);
        assert_eq!("1990s".parse::<TimePeriod>().unwrap(), TimePeriod::Decade(1990));
        assert_eq!("2010s".parse::<TimePeriod>().unwrap(), TimePeriod::Decade(2010));
        assert!("1994s".parse::<TimePeriod>().is_err());
        assert!("recently".parse::<TimePeriod>().is_err());

        assert_eq!(TimePeriod::AllTime.phrase(), "of all time");
        assert_eq!(TimePeriod::Decade(1990).phrase(), "from the 1990s");
    }

    #[test]
    fn truncate_respects_char_boundaries() {
        let s = "caf\u{e9} au lait";
        let t = truncate_chars(s, 4);
        // 'é' is two bytes starting at index 3; cutting at 4 must back off.
        assert_eq!(t, "caf");
        assert_eq!(truncate_chars("short", 100), "short");
    }

    #[test]
    fn excerpt_marks_truncation() {
        assert_eq!(excerpt("abc", 10), "abc");
        assert_eq!(excerpt("abcdefghij", 5), "abcde...");
    }
}
