use std::fmt::Write as _;
use std::process::ExitCode;

use clap::{Parser, ValueEnum};
use tracing_subscriber::EnvFilter;

use gitsoar::analysis::format_count;
use gitsoar::models::ProfileReport;
use gitsoar::{AnalysisPipeline, Config, FetchConfig, GitHubClient, GitHubCollector};

#[derive(Parser, Debug)]
#[command(name = "gitsoar")]
#[command(version = "0.1.0")]
#[command(about = "Score GitHub portfolios and explain what drives the score")]
struct Args {
    /// GitHub usernames or profile URLs to analyze
    #[arg(required = true)]
    inputs: Vec<String>,

    /// Output format
    #[arg(short, long, value_enum, default_value_t = Format::Text)]
    format: Format,

    /// Output file (defaults to stdout)
    #[arg(short, long)]
    output: Option<String>,

    /// Maximum repositories to fetch per account
    #[arg(long)]
    max_repos: Option<u32>,

    /// Number of top repositories inspected in detail
    #[arg(long)]
    detail_repos: Option<usize>,

    /// Hide progress bars
    #[arg(long)]
    no_progress: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
enum Format {
    Text,
    Json,
    Markdown,
}

#[tokio::main]
async fn main() -> anyhow::Result<ExitCode> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::from_default_env()
                .add_directive("gitsoar=info".parse()?)
                .add_directive("reqwest=warn".parse()?),
        )
        .init();

    dotenvy::dotenv().ok();

    let args = Args::parse();
    let config = Config::from_env();

    let mut fetch_config = FetchConfig::from(&config);
    if let Some(max_repos) = args.max_repos {
        fetch_config.max_repos = max_repos;
    }
    if let Some(detail_repos) = args.detail_repos {
        fetch_config.detail_repos = detail_repos;
    }
    fetch_config.show_progress = !args.no_progress;

    let github = GitHubClient::new(config.github_token.as_deref())?;
    let collector = GitHubCollector::new(github, fetch_config);
    let pipeline = AnalysisPipeline::new(collector, config.cache_ttl);

    let mut rendered = Vec::new();
    let mut failures = 0;

    for input in &args.inputs {
        match pipeline.analyze(input).await {
            Ok(outcome) => {
                if outcome.cached {
                    tracing::info!("Reusing analysis of {}", outcome.report.profile.username);
                }
                rendered.push(render(&outcome.report, args.format)?);
            }
            Err(e) => {
                tracing::debug!("Analysis of {:?} failed: {:?}", input, e);
                eprintln!("{}: {}", input, e.user_message());
                failures += 1;
            }
        }
    }

    if !rendered.is_empty() {
        let output = if args.format == Format::Json && rendered.len() > 1 {
            format!("[\n{}\n]", rendered.join(",\n"))
        } else {
            rendered.join("\n")
        };

        if let Some(ref path) = args.output {
            std::fs::write(path, &output)?;
            tracing::info!("Output written to: {}", path);
        } else {
            println!("{}", output);
        }
    }

    Ok(if failures > 0 { ExitCode::FAILURE } else { ExitCode::SUCCESS })
}

fn render(report: &ProfileReport, format: Format) -> anyhow::Result<String> {
    Ok(match format {
        Format::Json => serde_json::to_string_pretty(report)?,
        Format::Markdown => format_markdown(report)?,
        Format::Text => format_text(report)?,
    })
}

fn format_text(report: &ProfileReport) -> Result<String, std::fmt::Error> {
    let mut output = String::new();
    let profile = &report.profile;
    let scores = &report.scores;

    writeln!(output, "\n=== Portfolio Analysis: {} ===\n", profile.username)?;

    if let Some(ref name) = profile.name {
        writeln!(output, "Name: {}", name)?;
    }
    if let Some(ref bio) = profile.bio {
        writeln!(output, "Bio: {}", bio)?;
    }

    writeln!(
        output,
        "Repositories: {} ({} original), {} stars, {} forks",
        report.stats.total_repos,
        report.stats.original_repos,
        format_count(report.stats.total_stars),
        format_count(report.stats.total_forks)
    )?;
    writeln!(
        output,
        "Overall: {}/100 ({}) - {}\n",
        scores.overall, scores.rating.label, scores.rating.description
    )?;

    writeln!(output, "Dimensions:")?;
    for (dimension, score) in scores.dimensions.iter() {
        writeln!(
            output,
            "  {:<14} {:>3}/100  (weighted {})",
            dimension.to_string(),
            score,
            scores.breakdown.weighted.get(dimension)
        )?;
    }

    if !report.analysis.strengths.is_empty() {
        writeln!(output, "\nStrengths:")?;
        for strength in &report.analysis.strengths {
            writeln!(output, "  + {}: {}", strength.title, strength.description)?;
        }
    }

    if !report.analysis.red_flags.is_empty() {
        writeln!(output, "\nRed Flags:")?;
        for flag in &report.analysis.red_flags {
            writeln!(
                output,
                "  ! [{}] {}: {}",
                flag.severity, flag.insight.title, flag.insight.description
            )?;
        }
    }

    if !report.analysis.recommendations.is_empty() {
        writeln!(output, "\nRecommendations:")?;
        for rec in &report.analysis.recommendations {
            writeln!(output, "  - [{}] {}", rec.priority, rec.insight.title)?;
            if let Some(ref action) = rec.action {
                writeln!(output, "      {}", action)?;
            }
        }
    }

    let patterns = &report.analysis.commit_patterns;
    writeln!(
        output,
        "\nCommits sampled: {} ({:.1}/week, trend {})",
        patterns.total_commits, patterns.average_per_week, patterns.activity_trend
    )?;
    if let Some(ref day) = patterns.most_active_day {
        writeln!(output, "Most active day: {}", day)?;
    }

    let languages = &report.analysis.language_analysis;
    if !languages.distribution.is_empty() {
        let shares: Vec<String> = languages
            .distribution
            .iter()
            .map(|l| format!("{} {}%", l.name, l.percentage))
            .collect();
        writeln!(output, "Languages: {}", shares.join(", "))?;
    }

    writeln!(
        output,
        "\nAnalyzed on: {} ({} ms)",
        report.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC"),
        report.analysis_duration_ms
    )?;

    Ok(output)
}

fn format_markdown(report: &ProfileReport) -> Result<String, std::fmt::Error> {
    let mut output = String::new();
    let profile = &report.profile;
    let scores = &report.scores;

    writeln!(output, "# Portfolio Analysis: {}\n", profile.username)?;

    if let Some(ref name) = profile.name {
        writeln!(output, "**Name:** {}\n", name)?;
    }
    if let Some(ref bio) = profile.bio {
        writeln!(output, "> {}\n", bio)?;
    }

    writeln!(
        output,
        "**Overall:** {}/100 · {} · {}\n",
        scores.overall, scores.rating.label, scores.rating.description
    )?;

    writeln!(output, "## Summary\n")?;
    writeln!(output, "| Metric | Value |\n|--------|-------|")?;
    writeln!(output, "| Repositories | {} |", report.stats.total_repos)?;
    writeln!(output, "| Original Repositories | {} |", report.stats.original_repos)?;
    writeln!(output, "| Stars | {} |", format_count(report.stats.total_stars))?;
    writeln!(output, "| Forks | {} |", format_count(report.stats.total_forks))?;
    writeln!(output, "| Languages | {} |", report.stats.languages)?;

    writeln!(output, "\n## Dimensions\n")?;
    writeln!(output, "| Dimension | Score | Weight | Weighted |")?;
    writeln!(output, "|-----------|-------|--------|----------|")?;
    for (dimension, score) in scores.dimensions.iter() {
        writeln!(
            output,
            "| {} | {}/100 | {:.0}% | {} |",
            dimension,
            score,
            scores.weights.get(dimension) * 100.0,
            scores.breakdown.weighted.get(dimension)
        )?;
    }

    if !report.analysis.strengths.is_empty() {
        writeln!(output, "\n## Strengths\n")?;
        for strength in &report.analysis.strengths {
            writeln!(output, "- {} **{}**: {}", strength.icon, strength.title, strength.description)?;
        }
    }

    if !report.analysis.red_flags.is_empty() {
        writeln!(output, "\n## Red Flags\n")?;
        for flag in &report.analysis.red_flags {
            writeln!(
                output,
                "- **{}** ({}): {}",
                flag.insight.title, flag.severity, flag.insight.description
            )?;
        }
    }

    if !report.analysis.recommendations.is_empty() {
        writeln!(output, "\n## Recommendations\n")?;
        writeln!(output, "| Priority | Recommendation | Action |")?;
        writeln!(output, "|----------|----------------|--------|")?;
        for rec in &report.analysis.recommendations {
            writeln!(
                output,
                "| {} | {} | {} |",
                rec.priority,
                rec.insight.title,
                rec.action.as_deref().unwrap_or("")
            )?;
        }
    }

    if !report.analysis.repository_insights.is_empty() {
        writeln!(output, "\n## Top Repositories\n")?;
        writeln!(output, "| Repository | Stars | Score | Notes |")?;
        writeln!(output, "|------------|-------|-------|-------|")?;
        for repo in &report.analysis.repository_insights {
            let notes: Vec<&str> = repo.insights.iter().map(|b| b.text.as_str()).collect();
            writeln!(
                output,
                "| [{}]({}) | {} | {}/100 | {} |",
                repo.name,
                repo.url,
                repo.stars,
                repo.score,
                notes.join(", ")
            )?;
        }
    }

    writeln!(
        output,
        "\n---\n*Analyzed on {}*",
        report.analyzed_at.format("%Y-%m-%d %H:%M:%S UTC")
    )?;

    Ok(output)
}
