//! Rule tables for strengths, red flags and recommendations.
//!
//! Each table is evaluated in full and in declaration order. Truncation
//! (strengths) and priority sorting (recommendations) run as separate passes
//! afterwards, so the order of a table is part of its output contract.

use chrono::{DateTime, Duration, Months, Utc};

use crate::models::{
    count_since, DimensionScores, ImpactLevel, Insight, Priority, Recommendation, RedFlag,
    Repository, Severity, UserData,
};

pub const MAX_STRENGTHS: usize = 5;
pub const POPULAR_REPO_STARS: u32 = 50;

/// Everything a rule may look at.
pub struct InsightContext<'a> {
    pub scores: &'a DimensionScores,
    pub data: &'a UserData,
    pub now: DateTime<Utc>,
}

impl<'a> InsightContext<'a> {
    pub fn new(scores: &'a DimensionScores, data: &'a UserData, now: DateTime<Utc>) -> Self {
        Self { scores, data, now }
    }

    fn commits_since_days(&self, days: i64) -> usize {
        count_since(&self.data.commits, self.now - Duration::days(days))
    }

    fn commits_last_six_months(&self) -> usize {
        let since = self
            .now
            .checked_sub_months(Months::new(6))
            .unwrap_or(DateTime::<Utc>::MIN_UTC);
        count_since(&self.data.commits, since)
    }

    fn repos_without_readme(&self) -> usize {
        self.data.repo_details.iter().filter(|d| !d.readme.exists).count()
    }

    fn repos_without_description(&self) -> usize {
        self.data.repositories.iter().filter(|r| !r.has_description()).count()
    }

    fn repos_without_topics(&self) -> usize {
        self.data.repositories.iter().filter(|r| r.topics.is_empty()).count()
    }

    /// First repository with the highest star count.
    fn most_starred(&self) -> Option<&'a Repository> {
        self.data
            .repositories
            .iter()
            .reduce(|best, r| if r.stars > best.stars { r } else { best })
    }
}

/// A predicate paired with the record it produces when it holds.
pub struct Rule<T> {
    pub name: &'static str,
    pub applies: fn(&InsightContext<'_>) -> bool,
    pub build: fn(&InsightContext<'_>) -> T,
}

pub fn evaluate<T>(rules: &[Rule<T>], ctx: &InsightContext<'_>) -> Vec<T> {
    rules
        .iter()
        .filter(|rule| (rule.applies)(ctx))
        .map(|rule| {
            tracing::trace!("Rule matched: {}", rule.name);
            (rule.build)(ctx)
        })
        .collect()
}

pub fn generate_strengths(ctx: &InsightContext<'_>) -> Vec<Insight> {
    let mut strengths = evaluate(STRENGTH_RULES, ctx);
    strengths.truncate(MAX_STRENGTHS);
    strengths
}

pub fn generate_red_flags(ctx: &InsightContext<'_>) -> Vec<RedFlag> {
    evaluate(RED_FLAG_RULES, ctx)
}

pub fn generate_recommendations(ctx: &InsightContext<'_>) -> Vec<Recommendation> {
    let mut recommendations = evaluate(RECOMMENDATION_RULES, ctx);
    // Stable: equal priorities keep table order.
    recommendations.sort_by_key(|r| r.priority);
    recommendations
}

/// Compact count for prose: 1.2M, 3.4K, 999.
pub fn format_count(n: u64) -> String {
    if n >= 1_000_000 {
        format!("{:.1}M", n as f64 / 1_000_000.0)
    } else if n >= 1_000 {
        format!("{:.1}K", n as f64 / 1_000.0)
    } else {
        n.to_string()
    }
}

// ---------------------------------------------------------------------------
// Strengths
// ---------------------------------------------------------------------------

pub static STRENGTH_RULES: &[Rule<Insight>] = &[
    Rule {
        name: "documentation",
        applies: |ctx| ctx.scores.documentation >= 80,
        build: |_| {
            Insight::new(
                "Documentation",
                "Excellent Documentation",
                "Your repositories have comprehensive READMEs with clear instructions. Recruiters value developers who can communicate effectively.",
                "document-text",
            )
        },
    },
    Rule {
        name: "structure",
        applies: |ctx| ctx.scores.structure >= 80,
        build: |_| {
            Insight::new(
                "Structure",
                "Professional Code Organization",
                "Your projects follow industry best practices with proper structure, configuration files, and CI/CD setup.",
                "code-bracket",
            )
        },
    },
    Rule {
        name: "activity",
        applies: |ctx| ctx.scores.activity >= 80,
        build: |ctx| {
            Insight::new(
                "Activity",
                "Consistent Development Activity",
                format!(
                    "You've maintained excellent commit consistency with {} commits in the last 30 days. This shows dedication and reliability.",
                    ctx.commits_since_days(30)
                ),
                "clock",
            )
        },
    },
    Rule {
        name: "organization",
        applies: |ctx| ctx.scores.organization >= 80,
        build: |ctx| {
            Insight::new(
                "Organization",
                "Well-Organized Repository Portfolio",
                format!(
                    "{} original repositories with proper descriptions, topics, and licenses demonstrate attention to detail.",
                    ctx.data.original_repo_count()
                ),
                "folder",
            )
        },
    },
    Rule {
        name: "impact",
        applies: |ctx| ctx.scores.impact >= 70,
        build: |ctx| {
            Insight::new(
                "Impact",
                "Community Recognition",
                format!(
                    "Your projects have earned {} stars and {} forks, showing real-world value and adoption.",
                    format_count(ctx.data.total_stars()),
                    format_count(ctx.data.total_forks())
                ),
                "star",
            )
        },
    },
    Rule {
        name: "technical",
        applies: |ctx| ctx.scores.technical >= 80,
        build: |ctx| {
            Insight::new(
                "Technical",
                "Diverse Technical Skills",
                format!(
                    "Proficiency in {} programming languages shows adaptability and a broad technical foundation.",
                    ctx.data.languages.len()
                ),
                "cpu-chip",
            )
        },
    },
    Rule {
        name: "profile-readme",
        applies: |ctx| ctx.data.profile.has_profile_readme,
        build: |_| {
            Insight::new(
                "Profile",
                "Professional GitHub Profile",
                "Your profile README creates a strong first impression and showcases your personality and skills effectively.",
                "user",
            )
        },
    },
    Rule {
        name: "popular-repository",
        applies: |ctx| ctx.most_starred().is_some_and(|r| r.stars >= POPULAR_REPO_STARS),
        build: |ctx| {
            let (name, stars) = ctx
                .most_starred()
                .map(|r| (r.name.as_str(), r.stars))
                .unwrap_or_default();
            Insight::new(
                "Project",
                "Notable Open Source Project",
                format!(
                    "\"{}\" has gained significant traction with {} stars, demonstrating your ability to build useful tools.",
                    name,
                    format_count(stars as u64)
                ),
                "trophy",
            )
        },
    },
];

// ---------------------------------------------------------------------------
// Red flags
// ---------------------------------------------------------------------------

fn red_flag(severity: Severity, insight: Insight) -> RedFlag {
    RedFlag { insight, severity }
}

pub static RED_FLAG_RULES: &[Rule<RedFlag>] = &[
    Rule {
        name: "missing-readmes",
        applies: |ctx| ctx.scores.documentation < 50 && ctx.repos_without_readme() > 0,
        build: |ctx| {
            red_flag(
                Severity::High,
                Insight::new(
                    "Documentation",
                    "Missing README Files",
                    format!(
                        "{} of your repositories lack README files. This makes it difficult for recruiters to understand your projects.",
                        ctx.repos_without_readme()
                    ),
                    "exclamation-triangle",
                ),
            )
        },
    },
    Rule {
        name: "no-recent-activity",
        applies: |ctx| ctx.scores.activity < 40 && ctx.commits_last_six_months() == 0,
        build: |_| {
            red_flag(
                Severity::High,
                Insight::new(
                    "Activity",
                    "No Recent Activity",
                    "No commits in the last 6 months. Inactive profiles may signal a lack of current coding practice or interest.",
                    "pause-circle",
                ),
            )
        },
    },
    Rule {
        name: "low-commit-activity",
        applies: |ctx| {
            let recent = ctx.commits_last_six_months();
            ctx.scores.activity < 40 && recent > 0 && recent < 10
        },
        build: |_| {
            red_flag(
                Severity::Medium,
                Insight::new(
                    "Activity",
                    "Low Commit Activity",
                    "Sparse commit history suggests inconsistent development practices. Aim for regular, meaningful commits.",
                    "chart-bar",
                ),
            )
        },
    },
    Rule {
        name: "forks-only",
        applies: |ctx| {
            ctx.scores.organization < 40 && ctx.data.repositories.iter().all(|r| r.fork)
        },
        build: |_| {
            red_flag(
                Severity::Critical,
                Insight::new(
                    "Originality",
                    "No Original Projects",
                    "All your repositories are forks. Recruiters want to see your original work and problem-solving abilities.",
                    "document-duplicate",
                ),
            )
        },
    },
    Rule {
        name: "missing-descriptions",
        applies: |ctx| {
            ctx.scores.organization < 40
                && ctx.repos_without_description() as f64
                    > ctx.data.repositories.len() as f64 * 0.5
        },
        build: |ctx| {
            red_flag(
                Severity::Medium,
                Insight::new(
                    "Organization",
                    "Missing Repository Descriptions",
                    format!(
                        "{} repositories lack descriptions. Clear descriptions help recruiters quickly understand your work.",
                        ctx.repos_without_description()
                    ),
                    "annotation",
                ),
            )
        },
    },
    Rule {
        name: "limited-engagement",
        applies: |ctx| ctx.scores.impact < 30 && ctx.data.repositories.len() > 5,
        build: |_| {
            red_flag(
                Severity::Low,
                Insight::new(
                    "Impact",
                    "Limited Community Engagement",
                    "Despite having multiple repositories, there's minimal community engagement. Consider promoting your projects or contributing to popular open-source projects.",
                    "users",
                ),
            )
        },
    },
    Rule {
        name: "missing-profile-readme",
        applies: |ctx| !ctx.data.profile.has_profile_readme,
        build: |_| {
            red_flag(
                Severity::Medium,
                Insight::new(
                    "Profile",
                    "Missing Profile README",
                    "A profile README is your first impression. Without one, you're missing an opportunity to introduce yourself to recruiters.",
                    "identification",
                ),
            )
        },
    },
    Rule {
        name: "inconsistent-structure",
        applies: |ctx| ctx.scores.structure < 40,
        build: |_| {
            red_flag(
                Severity::Medium,
                Insight::new(
                    "Structure",
                    "Inconsistent Project Structure",
                    "Some projects lack standard configuration files like .gitignore or package.json. These are expected in professional projects.",
                    "wrench",
                ),
            )
        },
    },
];

// ---------------------------------------------------------------------------
// Recommendations
// ---------------------------------------------------------------------------

fn recommendation(
    priority: Priority,
    impact: ImpactLevel,
    insight: Insight,
    action: Option<String>,
) -> Recommendation {
    Recommendation { insight, priority, impact, action }
}

pub static RECOMMENDATION_RULES: &[Rule<Recommendation>] = &[
    Rule {
        name: "add-readmes",
        applies: |ctx| ctx.scores.documentation < 70 && ctx.repos_without_readme() > 0,
        build: |ctx| {
            let priority = if ctx.scores.documentation < 40 {
                Priority::High
            } else {
                Priority::Medium
            };
            recommendation(
                priority,
                ImpactLevel::High,
                Insight::new(
                    "Documentation",
                    "Add README Files",
                    format!(
                        "Create README.md files for your top {} repositories. Include: project description, installation steps, usage examples, and screenshots.",
                        ctx.repos_without_readme().min(3)
                    ),
                    "document-add",
                ),
                Some("Start with your most starred repository".to_string()),
            )
        },
    },
    Rule {
        name: "code-comments",
        applies: |ctx| ctx.scores.documentation < 70,
        build: |_| {
            recommendation(
                Priority::Medium,
                ImpactLevel::Medium,
                Insight::new(
                    "Documentation",
                    "Improve Code Comments",
                    "Add inline comments to complex code sections and create documentation for public APIs. This shows you care about maintainability.",
                    "chat-alt-2",
                ),
                None,
            )
        },
    },
    Rule {
        name: "profile-readme",
        applies: |ctx| !ctx.data.profile.has_profile_readme,
        build: |ctx| {
            recommendation(
                Priority::High,
                ImpactLevel::High,
                Insight::new(
                    "Profile",
                    "Create a Profile README",
                    "Create a special repository named after your username and add a README.md. Introduce yourself, showcase your skills, and add contact information.",
                    "user-add",
                ),
                Some(format!("Create repository: {}", ctx.data.profile.username)),
            )
        },
    },
    Rule {
        name: "commit-habits",
        applies: |ctx| ctx.scores.activity < 60,
        build: |_| {
            recommendation(
                Priority::High,
                ImpactLevel::High,
                Insight::new(
                    "Activity",
                    "Establish Consistent Commit Habits",
                    "Aim for at least 3-5 commits per week across your projects. Regular activity signals reliability and ongoing skill development.",
                    "calendar",
                ),
                Some("Set a weekly coding schedule".to_string()),
            )
        },
    },
    Rule {
        name: "descriptions",
        applies: |ctx| ctx.scores.organization < 60 && ctx.repos_without_description() > 0,
        build: |ctx| {
            recommendation(
                Priority::Medium,
                ImpactLevel::Medium,
                Insight::new(
                    "Organization",
                    "Add Repository Descriptions",
                    "Add clear, concise descriptions to all repositories. Include: what it does, technologies used, and current status.",
                    "tag",
                ),
                Some(format!("Update {} repositories", ctx.repos_without_description())),
            )
        },
    },
    Rule {
        name: "topics",
        applies: |ctx| ctx.scores.organization < 60 && ctx.repos_without_topics() > 0,
        build: |_| {
            recommendation(
                Priority::Low,
                ImpactLevel::Low,
                Insight::new(
                    "Organization",
                    "Add Repository Topics",
                    "Tag your repositories with relevant topics (languages, frameworks, domains) to improve discoverability.",
                    "hashtag",
                ),
                Some("Add 3-5 topics per repository".to_string()),
            )
        },
    },
    Rule {
        name: "gitignore",
        applies: |ctx| ctx.scores.structure < 60,
        build: |_| {
            recommendation(
                Priority::Medium,
                ImpactLevel::Medium,
                Insight::new(
                    "Structure",
                    "Add .gitignore Files",
                    "Ensure all repositories have appropriate .gitignore files. This keeps repositories clean and professional.",
                    "shield",
                ),
                Some("Use gitignore.io for language-specific templates".to_string()),
            )
        },
    },
    Rule {
        name: "ci-cd",
        applies: |ctx| ctx.scores.structure < 60,
        build: |_| {
            recommendation(
                Priority::Low,
                ImpactLevel::Medium,
                Insight::new(
                    "Structure",
                    "Set Up CI/CD",
                    "Add GitHub Actions workflows for automated testing and deployment. This demonstrates DevOps awareness.",
                    "play-circle",
                ),
                Some("Start with a simple test workflow".to_string()),
            )
        },
    },
    Rule {
        name: "share-projects",
        applies: |ctx| ctx.scores.impact < 50,
        build: |_| {
            recommendation(
                Priority::Medium,
                ImpactLevel::High,
                Insight::new(
                    "Impact",
                    "Share Your Projects",
                    "Share your best projects on social media, developer forums, or with your network. Create demo videos or write blog posts about them.",
                    "share",
                ),
                Some("Post on Twitter, LinkedIn, or Dev.to".to_string()),
            )
        },
    },
    Rule {
        name: "diversify-stack",
        applies: |ctx| ctx.scores.technical < 60,
        build: |_| {
            recommendation(
                Priority::Low,
                ImpactLevel::Medium,
                Insight::new(
                    "Technical",
                    "Diversify Your Tech Stack",
                    "Experiment with new languages or frameworks. Contributing to projects in different tech stacks broadens your appeal.",
                    "beaker",
                ),
                Some("Try one new technology this month".to_string()),
            )
        },
    },
];
