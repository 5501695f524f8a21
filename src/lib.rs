pub mod classifier;
pub mod config;
pub mod corpus;
pub mod error;
pub mod insights;
pub mod model;
pub mod preprocessing;
pub mod sentiment;
pub mod wordcloud;

use tracing::warn;

#[cfg(test)]
mod test_support;

pub use classifier::ClassifierService;
pub use config::DashboardConfig;
pub use corpus::{Corpus, CorpusNotice, ReviewRecord};
pub use error::{DashboardError, Result};
pub use insights::Insights;
pub use model::{ClassifierArtifact, LinearClassifier, SentimentModel};
pub use preprocessing::TfidfVectorizer;
pub use sentiment::{Classification, CorpusSentiment, ReviewText, SentimentLabel};

/// Dashboard
/// Loads the classifier artifact and the review corpus once and lends them
/// out for the lifetime of the process
pub struct Dashboard {
    config: DashboardConfig,
    artifact: ClassifierArtifact,
    /// An unreadable corpus is kept as its error so classification still works
    corpus: std::result::Result<Corpus, DashboardError>,
}

impl Dashboard {
    /// Load
    /// A bad artifact is fatal. A missing or unreadable corpus only disables insights.
    pub fn load(config: DashboardConfig) -> Result<Self> {
        let artifact: ClassifierArtifact =
            ClassifierArtifact::load(&config.vectorizer_file(), &config.model_file())?;
        let corpus = Corpus::load(&config.corpus_file());
        if let Err(e) = &corpus {
            warn!(error = %e, "corpus unavailable, insights disabled");
        }
        Ok(Self { config, artifact, corpus })
    }

    pub fn classifier(&self) -> ClassifierService<'_, ClassifierArtifact> {
        ClassifierService::new(&self.artifact)
    }

    pub fn corpus(&self) -> std::result::Result<&Corpus, &DashboardError> {
        self.corpus.as_ref()
    }

    pub fn config(&self) -> &DashboardConfig {
        &self.config
    }

    /// Insights
    /// Fails with `Corpus` when the corpus file could not be read at load time
    pub fn insights(&self) -> Result<Option<Insights>> {
        match &self.corpus {
            Ok(corpus) => Insights::from_corpus(corpus, self.config.word_cloud_terms),
            Err(e) => Err(DashboardError::Corpus(e.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::path::Path;
    use tempfile::TempDir;
    use crate::test_support::fixture_artifact;

    fn install(root: &Path, corpus: Option<&str>) -> DashboardConfig {
        let config: DashboardConfig = DashboardConfig::from_root(root).unwrap();
        std::fs::create_dir_all(root.join("models")).unwrap();
        fixture_artifact().save(&config.vectorizer_file(), &config.model_file()).unwrap();
        if let Some(contents) = corpus {
            std::fs::create_dir_all(root.join("data")).unwrap();
            std::fs::write(config.corpus_file(), contents).unwrap();
        }
        config
    }

    #[test]
    fn it_makes_a_prediction() {
        let dir: TempDir = TempDir::new().unwrap();
        let config: DashboardConfig = install(dir.path(), None);
        let dashboard: Dashboard = Dashboard::load(config).unwrap();
        let classifier = dashboard.classifier();

        let positive: Classification = classifier
            .classify("Great product! Exactly what I needed. Fast delivery.")
            .unwrap();
        assert_eq!(positive.label, SentimentLabel::Positive);

        let negative: Classification = classifier.classify("Terrible experience. Broke after one day.").unwrap();
        assert_eq!(negative.label, SentimentLabel::Negative);

        assert!(matches!(classifier.classify("  "), Err(DashboardError::EmptyInput)));
    }

    #[test]
    fn it_runs_without_a_corpus() {
        let dir: TempDir = TempDir::new().unwrap();
        let dashboard: Dashboard = Dashboard::load(install(dir.path(), None)).unwrap();

        let corpus: &Corpus = dashboard.corpus().unwrap();
        assert!(corpus.is_empty());
        assert!(matches!(corpus.notices(), [CorpusNotice::MissingFile(_)]));
        assert_eq!(dashboard.insights().unwrap(), None);
    }

    #[test]
    fn it_builds_insights_from_the_installed_corpus() {
        let dir: TempDir = TempDir::new().unwrap();
        let config: DashboardConfig =
            install(dir.path(), Some("sentiment,review_body\n1,Great<br />product\n0,Bad item\n,Unlabelled\n"));
        let dashboard: Dashboard = Dashboard::load(config).unwrap();

        assert_eq!(dashboard.corpus().unwrap().concatenated_text(), "Great product Bad item Unlabelled");
        let insights: Insights = dashboard.insights().unwrap().unwrap();
        assert_eq!(insights.total_reviews, 2);
        assert_eq!(insights.count(CorpusSentiment::Positive), 1);
        assert_eq!(insights.count(CorpusSentiment::Negative), 1);
        assert!(insights.word_cloud.is_some());
    }

    #[test]
    fn it_keeps_classifying_when_the_corpus_is_unreadable() {
        let dir: TempDir = TempDir::new().unwrap();
        let config: DashboardConfig = install(dir.path(), None);
        std::fs::create_dir_all(dir.path().join("data")).unwrap();
        std::fs::write(config.corpus_file(), b"sentiment,review_b\xf6dy\n1,ok\n").unwrap();

        let dashboard: Dashboard = Dashboard::load(config).unwrap();
        assert!(dashboard.corpus().is_err());
        assert!(matches!(dashboard.insights(), Err(DashboardError::Corpus(_))));

        let negative: Classification = dashboard.classifier().classify("Terrible experience. Broke after one day.").unwrap();
        assert_eq!(negative.label, SentimentLabel::Negative);
    }

    #[test]
    fn it_refuses_to_start_without_artifacts() {
        let dir: TempDir = TempDir::new().unwrap();
        let config: DashboardConfig = DashboardConfig::from_root(dir.path()).unwrap();
        let err: DashboardError = match Dashboard::load(config) {
            Err(e) => e,
            Ok(_) => panic!("loaded without artifacts"),
        };
        assert!(matches!(err, DashboardError::ArtifactLoad { .. }));
    }
}
