//! Command line front end for the review sentiment dashboard
//!
//! ```bash
//! review-sentiment analyze --text "Arrived broken, very disappointed"
//! review-sentiment analyze --sample positive
//! review-sentiment analyze            # one review per line from stdin
//! review-sentiment insights --top 20
//! ```

use anyhow::{Context, Result};
use clap::{Parser, Subcommand, ValueEnum};
use review_sentiment::classifier::classify_many;
use review_sentiment::{
    Classification, CorpusSentiment, Dashboard, DashboardConfig, DashboardError, Insights, SentimentLabel,
};
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

const BAR_WIDTH: usize = 40;

#[derive(Parser)]
#[command(name = "review-sentiment")]
#[command(version)]
#[command(about = "Classify product reviews and browse sentiment insights", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Installation root holding models/ and data/ (defaults to the current directory)
    #[arg(short, long)]
    root: Option<PathBuf>,

    /// Log level
    #[arg(short, long, default_value = "warn")]
    log_level: String,
}

#[derive(Subcommand)]
enum Commands {
    /// Classify review text
    Analyze {
        /// Review text; repeat for several reviews
        #[arg(short, long, conflicts_with = "sample")]
        text: Vec<String>,

        /// Classify one of the canned sample reviews
        #[arg(short, long)]
        sample: Option<SampleChoice>,
    },

    /// Show aggregate statistics over the historical reviews
    Insights {
        /// Number of word cloud terms to list
        #[arg(short, long)]
        top: Option<usize>,
    },

    /// List the canned sample reviews
    Samples,
}

#[derive(Clone, Copy, ValueEnum)]
enum SampleChoice {
    Positive,
    Neutral,
    Negative,
}

impl From<SampleChoice> for SentimentLabel {
    fn from(choice: SampleChoice) -> Self {
        match choice {
            SampleChoice::Positive => SentimentLabel::Positive,
            SampleChoice::Neutral => SentimentLabel::Neutral,
            SampleChoice::Negative => SentimentLabel::Negative,
        }
    }
}

fn main() -> Result<()> {
    let Cli { command, root, log_level } = Cli::parse();

    let log_level = match log_level.as_str() {
        "trace" => Level::TRACE,
        "debug" => Level::DEBUG,
        "info" => Level::INFO,
        "error" => Level::ERROR,
        _ => Level::WARN,
    };
    let subscriber = FmtSubscriber::builder()
        .with_max_level(log_level)
        .with_target(false)
        .with_writer(io::stderr)
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    match command {
        Commands::Samples => print_samples(),
        Commands::Analyze { text, sample } => {
            let dashboard: Dashboard = load_dashboard(root, None)?;
            if let Some(choice) = sample {
                let label: SentimentLabel = choice.into();
                run_analyze(&dashboard, &[label.sample_review()]);
            } else if !text.is_empty() {
                let texts: Vec<&str> = text.iter().map(String::as_str).collect();
                run_analyze(&dashboard, &texts);
            } else {
                run_session(&dashboard)?;
            }
        }
        Commands::Insights { top } => {
            let dashboard: Dashboard = load_dashboard(root, top)?;
            run_insights(&dashboard)?;
        }
    }

    Ok(())
}

/// Reads config and loads artifact and corpus. Failure here ends the process.
fn load_dashboard(root: Option<PathBuf>, top_terms: Option<usize>) -> Result<Dashboard> {
    let root: PathBuf = match root {
        Some(root) => root,
        None => std::env::current_dir().context("cannot determine the current directory")?,
    };
    let mut config: DashboardConfig = DashboardConfig::from_root(&root)?;
    if let Some(top) = top_terms {
        config.word_cloud_terms = top.max(1);
    }
    Dashboard::load(config).with_context(|| format!("failed to start from {}", root.display()))
}

fn print_samples() {
    for label in SentimentLabel::ALL.iter().rev() {
        println!("{} {}", label.icon(), label);
        println!("    {}", label.sample_review());
    }
}

fn run_analyze(dashboard: &Dashboard, texts: &[&str]) {
    let classifier = dashboard.classifier();
    for (text, result) in texts.iter().zip(classify_many(&classifier, texts)) {
        println!("Review: {}", text);
        print_result(result);
    }
}

/// One review per line; a failed line is reported and the session goes on
fn run_session(dashboard: &Dashboard) -> Result<()> {
    let classifier = dashboard.classifier();
    let stdin = io::stdin();
    let mut stdout = io::stdout();

    print!("review> ");
    stdout.flush()?;
    for line in stdin.lock().lines() {
        let line: String = line?;
        match classifier.classify(&line) {
            Err(e) if !e.is_recoverable() => return Err(e.into()),
            result => print_result(result),
        }
        print!("review> ");
        stdout.flush()?;
    }
    println!();
    Ok(())
}

fn print_result(result: review_sentiment::Result<Classification>) {
    match result {
        Ok(classification) => println!("  {} {}", classification.icon(), classification.display()),
        Err(DashboardError::EmptyInput) => println!("  ⚠ {}", DashboardError::EmptyInput),
        Err(e) => println!("  ✖ {}", e),
    }
}

fn run_insights(dashboard: &Dashboard) -> Result<()> {
    let insights: Insights = match dashboard.insights() {
        Ok(Some(insights)) => insights,
        Ok(None) => {
            println!("Load a dataset with sentiment labels to see insights here.");
            return Ok(());
        }
        Err(e @ DashboardError::Corpus(_)) => {
            println!("  ✖ {}", e);
            return Ok(());
        }
        Err(e) => return Err(e.into()),
    };

    println!("Overview");
    println!("  Total Reviews: {}", insights.total_reviews);
    println!("  Positive:      {}", insights.count(CorpusSentiment::Positive));
    println!("  Negative:      {}", insights.count(CorpusSentiment::Negative));

    println!();
    println!("Reviews by Sentiment");
    for bar in insights.bar_chart(BAR_WIDTH) {
        println!("  {}", bar);
    }

    println!();
    println!("Word Cloud");
    match &insights.word_cloud {
        Some(terms) if !terms.is_empty() => {
            for (term, count) in terms {
                println!("  {:<20} {}", term, count);
            }
        }
        _ => println!("  Not enough text for a word cloud."),
    }
    Ok(())
}
