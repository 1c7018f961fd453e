//! Topic scraping and report assembly: scrape search pages, analyze each
//! topic with the LLM, and fold the results into a structured report.

#[cfg(test)]
mod tests;

use std::collections::BTreeMap;
use std::fmt;
use std::time::Duration;

use anyhow::Result;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use tokio::time::sleep;
use tracing::{debug, info, warn};

use crate::config::{Config, Secrets};
use crate::llm::{GroqClient, prompts};
use crate::scraper::headlines::{clean_html_to_text, extract_headlines, extract_reddit_titles};
use crate::scraper::{UnlockerClient, news_search_url, reddit_search_url};
use crate::{BrieflyError, Result as BrieflyResult};

pub const MAX_TOPICS: usize = 3;

/// Which sources to scrape for a report
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SourceType {
    News,
    Reddit,
    Both,
}

impl SourceType {
    #[inline]
    pub fn includes_news(self) -> bool {
        matches!(self, Self::News | Self::Both)
    }

    #[inline]
    pub fn includes_reddit(self) -> bool {
        matches!(self, Self::Reddit | Self::Both)
    }
}

impl fmt::Display for SourceType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::News => "news",
            Self::Reddit => "reddit",
            Self::Both => "both",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum TopicListError {
    #[error("Topic cannot be blank")]
    Blank,
    #[error("Topic \"{0}\" is already in the list")]
    Duplicate(String),
    #[error("Topic list is full (max {MAX_TOPICS} topics)")]
    Full,
    #[error("At least one topic is required")]
    Empty,
}

/// Bounded list of search topics: at most [`MAX_TOPICS`], trimmed,
/// non-blank, and unique.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TopicList {
    topics: Vec<String>,
}

impl TopicList {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a list from raw user input, validating every entry.
    #[inline]
    pub fn from_topics<I, S>(topics: I) -> Result<Self, TopicListError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let mut list = Self::new();
        for topic in topics {
            list.add(topic.as_ref())?;
        }
        if list.is_empty() {
            return Err(TopicListError::Empty);
        }
        Ok(list)
    }

    #[inline]
    pub fn add(&mut self, topic: &str) -> Result<(), TopicListError> {
        let topic = topic.trim();
        if topic.is_empty() {
            return Err(TopicListError::Blank);
        }
        if self.topics.iter().any(|existing| existing == topic) {
            return Err(TopicListError::Duplicate(topic.to_string()));
        }
        if self.topics.len() >= MAX_TOPICS {
            return Err(TopicListError::Full);
        }
        self.topics.push(topic.to_string());
        Ok(())
    }

    #[inline]
    pub fn topics(&self) -> &[String] {
        &self.topics
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.topics.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.topics.is_empty()
    }
}

/// Per-source scrape results: one analysis and one raw-headline block per
/// topic, plus bookkeeping about how the scrape went.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SourceAnalysis {
    pub analysis: BTreeMap<String, String>,
    pub raw_headlines: BTreeMap<String, String>,
    pub metadata: ScrapeMetadata,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ScrapeMetadata {
    pub total_topics: usize,
    pub successful_scrapes: usize,
    pub scraping_method: String,
}

impl SourceAnalysis {
    /// The analysis text for a topic, if the scrape for it actually
    /// produced content rather than an error or placeholder.
    #[inline]
    pub fn topic_content(&self, topic: &str) -> Option<&str> {
        self.analysis
            .get(topic)
            .map(String::as_str)
            .filter(|text| !is_failure_text(text))
    }

    #[inline]
    pub fn has_data(&self) -> bool {
        self.metadata.successful_scrapes > 0
    }
}

fn is_failure_text(text: &str) -> bool {
    text.starts_with("Error analyzing ")
        || text.starts_with("No headlines found for topic:")
        || text.starts_with("No posts found for topic:")
}

/// Raw scrape output carried alongside the report for debugging
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct RawData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub news: Option<SourceAnalysis>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub reddit: Option<SourceAnalysis>,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct ReportMetadata {
    pub total_topics: usize,
    pub sources_used: SourceType,
    pub has_news_data: bool,
    pub has_reddit_data: bool,
    pub analysis_generated: bool,
}

/// Full structured report returned by `/generate-news-summary`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct SummaryReport {
    pub topics: Vec<String>,
    pub source_type: SourceType,
    pub timestamp: DateTime<Utc>,
    pub summary: String,
    pub individual_topics: BTreeMap<String, String>,
    pub raw_data: RawData,
    pub metadata: ReportMetadata,
}

/// Combined summary returned by `/quick-summary`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct QuickSummary {
    pub topics: Vec<String>,
    pub source_type: SourceType,
    pub timestamp: DateTime<Utc>,
    pub summary: String,
}

/// Orchestrates the scrape → analyze → report pipeline.
pub struct Summarizer {
    unlocker: UnlockerClient,
    groq: GroqClient,
    max_tokens_topic: u32,
    max_tokens_report: u32,
    topic_delay: Duration,
}

impl Summarizer {
    #[inline]
    pub fn new(config: &Config, secrets: &Secrets) -> BrieflyResult<Self> {
        let brightdata_key = secrets
            .require_brightdata()
            .map_err(|e| BrieflyError::Config(e.to_string()))?;
        let unlocker = UnlockerClient::new(&config.scraper, brightdata_key)
            .map_err(|e| BrieflyError::Scrape(e.to_string()))?;
        let groq = GroqClient::new(&config.groq, secrets.groq_api_key.clone())
            .map_err(|e| BrieflyError::Llm(e.to_string()))?;

        Ok(Self {
            unlocker,
            groq,
            max_tokens_topic: config.groq.max_tokens_topic,
            max_tokens_report: config.groq.max_tokens_report,
            topic_delay: Duration::from_millis(config.scraper.topic_delay_ms),
        })
    }

    /// Scrape Google News for each topic and analyze the headlines.
    ///
    /// Failures are recorded per topic and never abort the other topics.
    #[inline]
    pub async fn scrape_news(&self, topics: &TopicList) -> SourceAnalysis {
        self.scrape_source(topics, Source::News).await
    }

    /// Scrape Reddit search pages for each topic and analyze post titles.
    #[inline]
    pub async fn scrape_reddit(&self, topics: &TopicList) -> SourceAnalysis {
        self.scrape_source(topics, Source::Reddit).await
    }

    async fn scrape_source(&self, topics: &TopicList, source: Source) -> SourceAnalysis {
        let mut analysis = BTreeMap::new();
        let mut raw_headlines = BTreeMap::new();

        for topic in topics.topics() {
            let result = self.scrape_topic(topic, source).await;
            match result {
                Ok((headlines, summary)) => {
                    raw_headlines.insert(topic.clone(), headlines);
                    analysis.insert(topic.clone(), summary);
                }
                Err(e) => {
                    warn!("Error scraping {} for topic '{}': {}", source, topic, e);
                    raw_headlines.insert(topic.clone(), String::new());
                    analysis.insert(topic.clone(), format!("Error analyzing {topic}: {e}"));
                }
            }

            // Politeness delay on top of the per-request rate limit
            sleep(self.topic_delay).await;
        }

        let successful_scrapes = analysis
            .values()
            .filter(|text| !is_failure_text(text))
            .count();

        SourceAnalysis {
            analysis,
            raw_headlines,
            metadata: ScrapeMetadata {
                total_topics: topics.len(),
                successful_scrapes,
                scraping_method: "brightdata".to_string(),
            },
        }
    }

    async fn scrape_topic(&self, topic: &str, source: Source) -> Result<(String, String)> {
        let url = match source {
            Source::News => news_search_url(topic),
            Source::Reddit => reddit_search_url(topic),
        };

        debug!("Scraping {} for topic '{}': {}", source, topic, url);
        let html = self.unlocker.fetch(&url).await?;
        let clean_text = clean_html_to_text(&html);
        let headlines = match source {
            Source::News => extract_headlines(&clean_text),
            Source::Reddit => extract_reddit_titles(&clean_text),
        };

        if headlines.trim().is_empty() {
            let placeholder = match source {
                Source::News => format!("No headlines found for topic: {topic}"),
                Source::Reddit => format!("No posts found for topic: {topic}"),
            };
            return Ok((headlines, placeholder));
        }

        let summary = self.groq.complete(
            prompts::HEADLINE_ANALYSIS_SYSTEM,
            &prompts::headline_analysis_user(&headlines),
            self.max_tokens_topic,
        )?;

        Ok((headlines, summary))
    }

    /// Run the full pipeline and assemble a structured report.
    ///
    /// Scraping is best-effort per source; only when no source yields any
    /// usable content does this return [`BrieflyError::NoData`].
    #[inline]
    pub async fn generate_report(
        &self,
        topics: &TopicList,
        source_type: SourceType,
    ) -> BrieflyResult<SummaryReport> {
        let (news, reddit) = self.scrape_all(topics, source_type).await;

        let has_news_data = news.as_ref().is_some_and(SourceAnalysis::has_data);
        let has_reddit_data = reddit.as_ref().is_some_and(SourceAnalysis::has_data);

        let summary = self
            .combined_summary(topics, news.as_ref(), reddit.as_ref())?
            .unwrap_or_else(|| {
                "Summary generation failed. Please check the logs for more details.".to_string()
            });

        let mut individual_topics = BTreeMap::new();
        for topic in topics.topics() {
            let analysis = self.analyze_topic(topic, news.as_ref(), reddit.as_ref());
            individual_topics.insert(topic.clone(), analysis);
        }

        info!(
            "Generated report for {} topics (news: {}, reddit: {})",
            topics.len(),
            has_news_data,
            has_reddit_data
        );

        Ok(SummaryReport {
            topics: topics.topics().to_vec(),
            source_type,
            timestamp: Utc::now(),
            summary,
            individual_topics,
            raw_data: RawData {
                news,
                reddit,
            },
            metadata: ReportMetadata {
                total_topics: topics.len(),
                sources_used: source_type,
                has_news_data,
                has_reddit_data,
                analysis_generated: true,
            },
        })
    }

    /// Run the pipeline but return only the combined summary.
    #[inline]
    pub async fn quick_summary(
        &self,
        topics: &TopicList,
        source_type: SourceType,
    ) -> BrieflyResult<QuickSummary> {
        let (news, reddit) = self.scrape_all(topics, source_type).await;

        let summary = self
            .combined_summary(topics, news.as_ref(), reddit.as_ref())?
            .unwrap_or_else(|| {
                "Summary generation failed. Please check the logs for more details.".to_string()
            });

        Ok(QuickSummary {
            topics: topics.topics().to_vec(),
            source_type,
            timestamp: Utc::now(),
            summary,
        })
    }

    async fn scrape_all(
        &self,
        topics: &TopicList,
        source_type: SourceType,
    ) -> (Option<SourceAnalysis>, Option<SourceAnalysis>) {
        let news = if source_type.includes_news() {
            Some(self.scrape_news(topics).await)
        } else {
            None
        };

        let reddit = if source_type.includes_reddit() {
            Some(self.scrape_reddit(topics).await)
        } else {
            None
        };

        (news, reddit)
    }

    /// Combined multi-topic summary, or `Err(NoData)` when no source
    /// produced content for any topic.
    fn combined_summary(
        &self,
        topics: &TopicList,
        news: Option<&SourceAnalysis>,
        reddit: Option<&SourceAnalysis>,
    ) -> BrieflyResult<Option<String>> {
        let blocks: Vec<prompts::TopicBlock<'_>> = topics
            .topics()
            .iter()
            .map(|topic| prompts::TopicBlock {
                topic,
                news_analysis: news.and_then(|source| source.topic_content(topic)),
                reddit_analysis: reddit.and_then(|source| source.topic_content(topic)),
            })
            .collect();

        let Some(user_prompt) = prompts::combined_report_user(&blocks) else {
            return Err(BrieflyError::NoData(
                "No data could be retrieved for the specified topics and sources".to_string(),
            ));
        };

        match self.groq.complete(
            prompts::COMBINED_REPORT_SYSTEM,
            &user_prompt,
            self.max_tokens_report,
        ) {
            Ok(summary) => Ok(Some(summary)),
            Err(e) => {
                warn!("Summary generation error: {}", e);
                Ok(None)
            }
        }
    }

    /// Focused per-topic analysis combining whatever sources succeeded.
    fn analyze_topic(
        &self,
        topic: &str,
        news: Option<&SourceAnalysis>,
        reddit: Option<&SourceAnalysis>,
    ) -> String {
        let topic_news = news.and_then(|source| source.topic_content(topic));
        let topic_reddit = reddit.and_then(|source| source.topic_content(topic));

        if topic_news.is_none() && topic_reddit.is_none() {
            return format!("No data available for topic: {topic}");
        }

        let mut content = format!("Topic: {topic}\n\n");
        if let Some(news_text) = topic_news {
            content.push_str("News Analysis:\n");
            content.push_str(news_text);
            content.push_str("\n\n");
        }
        if let Some(reddit_text) = topic_reddit {
            content.push_str("Reddit Analysis:\n");
            content.push_str(reddit_text);
            content.push_str("\n\n");
        }

        match self.groq.complete(
            prompts::HEADLINE_ANALYSIS_SYSTEM,
            &prompts::headline_analysis_user(&content),
            self.max_tokens_topic,
        ) {
            Ok(analysis) => analysis,
            Err(e) => {
                warn!("Individual topic analysis error for {}: {}", topic, e);
                format!("Analysis failed for topic: {topic}")
            }
        }
    }
}

#[derive(Debug, Clone, Copy)]
enum Source {
    News,
    Reddit,
}

impl fmt::Display for Source {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::News => f.write_str("news"),
            Self::Reddit => f.write_str("reddit"),
        }
    }
}
