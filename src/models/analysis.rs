use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use super::user::Profile;

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Dimension {
    Documentation,
    Structure,
    Activity,
    Organization,
    Impact,
    Technical,
}

impl Dimension {
    pub const ALL: [Dimension; 6] = [
        Dimension::Documentation,
        Dimension::Structure,
        Dimension::Activity,
        Dimension::Organization,
        Dimension::Impact,
        Dimension::Technical,
    ];
}

impl std::fmt::Display for Dimension {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Dimension::Documentation => write!(f, "Documentation"),
            Dimension::Structure => write!(f, "Structure"),
            Dimension::Activity => write!(f, "Activity"),
            Dimension::Organization => write!(f, "Organization"),
            Dimension::Impact => write!(f, "Impact"),
            Dimension::Technical => write!(f, "Technical Depth"),
        }
    }
}

/// One 0-100 value per dimension.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct DimensionScores {
    pub documentation: u8,
    pub structure: u8,
    pub activity: u8,
    pub organization: u8,
    pub impact: u8,
    pub technical: u8,
}

impl DimensionScores {
    pub fn get(&self, dimension: Dimension) -> u8 {
        match dimension {
            Dimension::Documentation => self.documentation,
            Dimension::Structure => self.structure,
            Dimension::Activity => self.activity,
            Dimension::Organization => self.organization,
            Dimension::Impact => self.impact,
            Dimension::Technical => self.technical,
        }
    }

    pub fn set(&mut self, dimension: Dimension, value: u8) {
        let slot = match dimension {
            Dimension::Documentation => &mut self.documentation,
            Dimension::Structure => &mut self.structure,
            Dimension::Activity => &mut self.activity,
            Dimension::Organization => &mut self.organization,
            Dimension::Impact => &mut self.impact,
            Dimension::Technical => &mut self.technical,
        };
        *slot = value;
    }

    pub fn iter(&self) -> impl Iterator<Item = (Dimension, u8)> + '_ {
        Dimension::ALL.into_iter().map(move |d| (d, self.get(d)))
    }

    pub fn total(&self) -> u32 {
        self.iter().map(|(_, v)| v as u32).sum()
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct DimensionWeights {
    pub documentation: f64,
    pub structure: f64,
    pub activity: f64,
    pub organization: f64,
    pub impact: f64,
    pub technical: f64,
}

impl DimensionWeights {
    pub fn get(&self, dimension: Dimension) -> f64 {
        match dimension {
            Dimension::Documentation => self.documentation,
            Dimension::Structure => self.structure,
            Dimension::Activity => self.activity,
            Dimension::Organization => self.organization,
            Dimension::Impact => self.impact,
            Dimension::Technical => self.technical,
        }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum RatingTier {
    Excellent,
    Strong,
    Average,
    Weak,
    Critical,
}

impl RatingTier {
    pub fn label(&self) -> &'static str {
        match self {
            RatingTier::Excellent => "Excellent",
            RatingTier::Strong => "Strong",
            RatingTier::Average => "Average",
            RatingTier::Weak => "Weak",
            RatingTier::Critical => "Critical",
        }
    }

    pub fn description(&self) -> &'static str {
        match self {
            RatingTier::Excellent => "Outstanding portfolio, ready for top-tier opportunities",
            RatingTier::Strong => "Good foundation with minor improvements needed",
            RatingTier::Average => "Decent but needs significant work to stand out",
            RatingTier::Weak => "Major gaps identified, prioritize improvements",
            RatingTier::Critical => "Portfolio requires substantial overhaul",
        }
    }

    pub fn color(&self) -> &'static str {
        match self {
            RatingTier::Excellent => "#10B981",
            RatingTier::Strong => "#3B82F6",
            RatingTier::Average => "#F59E0B",
            RatingTier::Weak => "#EF4444",
            RatingTier::Critical => "#DC2626",
        }
    }
}

impl std::fmt::Display for RatingTier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.label())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Rating {
    pub tier: RatingTier,
    pub label: String,
    pub description: String,
    pub color: String,
}

impl From<RatingTier> for Rating {
    fn from(tier: RatingTier) -> Self {
        Self {
            tier,
            label: tier.label().to_string(),
            description: tier.description().to_string(),
            color: tier.color().to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreBreakdown {
    pub raw: DimensionScores,
    pub weighted: DimensionScores,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ScoreResult {
    pub overall: u8,
    pub rating: Rating,
    pub dimensions: DimensionScores,
    pub breakdown: ScoreBreakdown,
    pub weights: DimensionWeights,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Critical,
    High,
    Medium,
    Low,
}

/// Variant order is the sort rank: critical first, low last.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    Critical,
    High,
    Medium,
    Low,
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Critical => write!(f, "critical"),
            Severity::High => write!(f, "high"),
            Severity::Medium => write!(f, "medium"),
            Severity::Low => write!(f, "low"),
        }
    }
}

impl std::fmt::Display for Priority {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Priority::Critical => write!(f, "critical"),
            Priority::High => write!(f, "high"),
            Priority::Medium => write!(f, "medium"),
            Priority::Low => write!(f, "low"),
        }
    }
}

/// Expected payoff of acting on a recommendation.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub enum ImpactLevel {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Insight {
    pub category: String,
    pub title: String,
    pub description: String,
    pub icon: String,
}

impl Insight {
    pub fn new(category: &str, title: &str, description: impl Into<String>, icon: &str) -> Self {
        Self {
            category: category.to_string(),
            title: title.to_string(),
            description: description.into(),
            icon: icon.to_string(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RedFlag {
    #[serde(flatten)]
    pub insight: Insight,
    pub severity: Severity,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Recommendation {
    #[serde(flatten)]
    pub insight: Insight,
    pub priority: Priority,
    pub impact: ImpactLevel,
    pub action: Option<String>,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "kebab-case")]
pub enum ActivityTrend {
    Increasing,
    Decreasing,
    Stable,
    NoData,
}

impl std::fmt::Display for ActivityTrend {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ActivityTrend::Increasing => write!(f, "increasing"),
            ActivityTrend::Decreasing => write!(f, "decreasing"),
            ActivityTrend::Stable => write!(f, "stable"),
            ActivityTrend::NoData => write!(f, "no-data"),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct WeeklyCount {
    pub week: NaiveDate,
    pub commits: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DayCount {
    pub day: String,
    pub count: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CommitPatterns {
    pub total_commits: u32,
    pub average_per_week: f64,
    pub most_active_day: Option<String>,
    pub activity_trend: ActivityTrend,
    pub weekly_data: Vec<WeeklyCount>,
    pub day_of_week_distribution: Vec<DayCount>,
}

impl CommitPatterns {
    pub fn no_data() -> Self {
        Self {
            total_commits: 0,
            average_per_week: 0.0,
            most_active_day: None,
            activity_trend: ActivityTrend::NoData,
            weekly_data: Vec::new(),
            day_of_week_distribution: Vec::new(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LanguageShare {
    pub name: String,
    pub count: u32,
    pub percentage: u32,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct LanguageAnalysis {
    pub total_languages: usize,
    pub primary_language: Option<String>,
    pub distribution: Vec<LanguageShare>,
    /// Saturating count-based proxy, ten points per language.
    pub diversity_score: u8,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum BadgeKind {
    Success,
    Warning,
    Info,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Badge {
    pub kind: BadgeKind,
    pub text: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RepositoryInsight {
    pub name: String,
    pub url: String,
    pub stars: u32,
    pub forks: u32,
    pub language: Option<String>,
    pub updated_at: DateTime<Utc>,
    pub score: u8,
    pub insights: Vec<Badge>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct AnalysisResult {
    pub strengths: Vec<Insight>,
    pub red_flags: Vec<RedFlag>,
    pub recommendations: Vec<Recommendation>,
    pub commit_patterns: CommitPatterns,
    pub language_analysis: LanguageAnalysis,
    pub repository_insights: Vec<RepositoryInsight>,
    pub generated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PortfolioStats {
    pub total_repos: usize,
    pub original_repos: usize,
    pub total_stars: u64,
    pub total_forks: u64,
    pub languages: usize,
}

/// Everything the serving layer caches for one account.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct ProfileReport {
    pub profile: Profile,
    pub scores: ScoreResult,
    pub analysis: AnalysisResult,
    pub stats: PortfolioStats,
    pub analyzed_at: DateTime<Utc>,
    pub analysis_duration_ms: u64,
}
