use super::*;
use crate::config::{GroqConfig, ScraperConfig};
use serde_json::json;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

fn test_config(server: &MockServer) -> Config {
    Config {
        groq: GroqConfig {
            api_base: server.uri(),
            timeout_seconds: 5,
            ..GroqConfig::default()
        },
        scraper: ScraperConfig {
            endpoint: format!("{}/request", server.uri()),
            rate_limit_ms: 10,
            topic_delay_ms: 10,
            timeout_seconds: 5,
            max_retries: 1,
            ..ScraperConfig::default()
        },
        ..Config::default()
    }
}

fn test_secrets() -> Secrets {
    Secrets {
        groq_api_key: "gsk_test".to_string(),
        brightdata_api_key: Some("bd_test".to_string()),
    }
}

async fn mount_groq(server: &MockServer, content: &str) {
    Mock::given(method("POST"))
        .and(path("/chat/completions"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "choices": [{
                "index": 0,
                "message": { "role": "assistant", "content": content },
                "finish_reason": "stop"
            }]
        })))
        .mount(server)
        .await;
}

#[test]
fn topic_list_enforces_bounds() {
    let mut list = TopicList::new();
    list.add("ai").expect("first topic");
    list.add("  climate  ").expect("second topic, trimmed");
    list.add("space").expect("third topic");

    assert_eq!(list.topics(), ["ai", "climate", "space"]);
    assert_eq!(list.add("economy"), Err(TopicListError::Full));
    assert_eq!(list.add("   "), Err(TopicListError::Blank));
    assert_eq!(
        list.add("climate"),
        Err(TopicListError::Duplicate("climate".to_string()))
    );
}

#[test]
fn topic_list_rejects_empty_input() {
    assert_eq!(
        TopicList::from_topics(Vec::<String>::new()),
        Err(TopicListError::Empty)
    );
}

#[test]
fn source_type_serializes_lowercase() {
    assert_eq!(
        serde_json::to_string(&SourceType::News).expect("serialize"),
        "\"news\""
    );
    assert_eq!(
        serde_json::from_str::<SourceType>("\"both\"").expect("parse"),
        SourceType::Both
    );
    assert_eq!(SourceType::Reddit.to_string(), "reddit");
}

#[test]
fn source_type_scope_flags() {
    assert!(SourceType::Both.includes_news());
    assert!(SourceType::Both.includes_reddit());
    assert!(!SourceType::News.includes_reddit());
    assert!(!SourceType::Reddit.includes_news());
}

#[test]
fn report_json_roundtrip() {
    let report = SummaryReport {
        topics: vec!["ai".to_string()],
        source_type: SourceType::News,
        timestamp: Utc::now(),
        summary: "## Summary\n- something happened".to_string(),
        individual_topics: BTreeMap::from([("ai".to_string(), "analysis".to_string())]),
        raw_data: RawData {
            news: Some(SourceAnalysis {
                analysis: BTreeMap::from([("ai".to_string(), "analysis".to_string())]),
                raw_headlines: BTreeMap::from([("ai".to_string(), "headline".to_string())]),
                metadata: ScrapeMetadata {
                    total_topics: 1,
                    successful_scrapes: 1,
                    scraping_method: "brightdata".to_string(),
                },
            }),
            reddit: None,
        },
        metadata: ReportMetadata {
            total_topics: 1,
            sources_used: SourceType::News,
            has_news_data: true,
            has_reddit_data: false,
            analysis_generated: true,
        },
    };

    let json = serde_json::to_string(&report).expect("serialize");
    let parsed: SummaryReport = serde_json::from_str(&json).expect("parse");
    assert_eq!(report, parsed);
}

#[test]
fn failure_text_is_not_topic_content() {
    let source = SourceAnalysis {
        analysis: BTreeMap::from([
            ("ai".to_string(), "real analysis".to_string()),
            (
                "climate".to_string(),
                "No headlines found for topic: climate".to_string(),
            ),
            (
                "space".to_string(),
                "Error analyzing space: connection reset".to_string(),
            ),
        ]),
        raw_headlines: BTreeMap::new(),
        metadata: ScrapeMetadata {
            total_topics: 3,
            successful_scrapes: 1,
            scraping_method: "brightdata".to_string(),
        },
    };

    assert_eq!(source.topic_content("ai"), Some("real analysis"));
    assert_eq!(source.topic_content("climate"), None);
    assert_eq!(source.topic_content("space"), None);
    assert_eq!(source.topic_content("missing"), None);
    assert!(source.has_data());
}

#[tokio::test]
async fn generate_report_end_to_end() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/request"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body>\
             <h3>AI breakthrough announced</h3><span>Tech Daily</span><a>More</a>\
             </body></html>",
        ))
        .mount(&server)
        .await;
    mount_groq(&server, "mock analysis").await;

    let topics = TopicList::from_topics(["ai"]).expect("topics");
    let summarizer =
        Summarizer::new(&test_config(&server), &test_secrets()).expect("summarizer");

    let report = summarizer
        .generate_report(&topics, SourceType::News)
        .await
        .expect("report should generate");

    assert_eq!(report.topics, ["ai"]);
    assert_eq!(report.source_type, SourceType::News);
    assert_eq!(report.summary, "mock analysis");
    assert_eq!(report.individual_topics["ai"], "mock analysis");
    assert!(report.metadata.has_news_data);
    assert!(!report.metadata.has_reddit_data);

    let news = report.raw_data.news.as_ref().expect("news raw data");
    assert_eq!(news.metadata.successful_scrapes, 1);
    assert!(news.raw_headlines["ai"].contains("AI breakthrough announced"));
    assert!(report.raw_data.reddit.is_none());
}

#[tokio::test]
async fn empty_pages_produce_no_data_error() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/request"))
        .respond_with(ResponseTemplate::new(200).set_body_string("<html><body>More</body></html>"))
        .mount(&server)
        .await;

    let topics = TopicList::from_topics(["ai"]).expect("topics");
    let summarizer =
        Summarizer::new(&test_config(&server), &test_secrets()).expect("summarizer");

    let result = summarizer.generate_report(&topics, SourceType::News).await;
    assert!(matches!(result, Err(BrieflyError::NoData(_))));
}

#[tokio::test]
async fn scrape_failure_degrades_to_error_entry() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/request"))
        .respond_with(ResponseTemplate::new(403))
        .mount(&server)
        .await;

    let topics = TopicList::from_topics(["ai"]).expect("topics");
    let summarizer =
        Summarizer::new(&test_config(&server), &test_secrets()).expect("summarizer");

    let news = summarizer.scrape_news(&topics).await;
    assert_eq!(news.metadata.successful_scrapes, 0);
    assert!(news.analysis["ai"].starts_with("Error analyzing ai:"));
    assert!(!news.has_data());
}

#[tokio::test]
async fn quick_summary_returns_combined_text_only() {
    let server = MockServer::start().await;

    Mock::given(method("POST"))
        .and(path("/request"))
        .respond_with(ResponseTemplate::new(200).set_body_string(
            "<html><body><h3>Rocket launch succeeds</h3><a>More</a></body></html>",
        ))
        .mount(&server)
        .await;
    mount_groq(&server, "combined summary").await;

    let topics = TopicList::from_topics(["space"]).expect("topics");
    let summarizer =
        Summarizer::new(&test_config(&server), &test_secrets()).expect("summarizer");

    let quick = summarizer
        .quick_summary(&topics, SourceType::News)
        .await
        .expect("quick summary");

    assert_eq!(quick.topics, ["space"]);
    assert_eq!(quick.summary, "combined summary");
}
