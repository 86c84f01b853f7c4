//! Reports over a freshly mirrored blog

use blog_mirror::config::Config;
use blog_mirror::crawler::mirror;
use blog_mirror::output::{compare_urls, count_html_files, EXPECTED_URLS_FILE, ROOT_LABEL};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

#[tokio::test]
async fn test_reports_over_mirror() {
    let server = MockServer::start().await;
    let base = server.uri();
    let output = TempDir::new().unwrap();

    let landing = format!(
        r#"<h3 class="post-title"><a href="{base}/2021/05/first.html">First</a></h3>
<h3 class="post-title"><a href="{base}/2021/06/second.html">Second</a></h3>"#
    );
    for (route, body) in [
        ("/", landing),
        ("/2021/05/first.html", "<p>first</p>".to_string()),
        ("/2021/06/second.html", "<p>second</p>".to_string()),
    ] {
        Mock::given(method("GET"))
            .and(path(route))
            .respond_with(ResponseTemplate::new(200).set_body_string(body))
            .mount(&server)
            .await;
    }

    let mut config = Config::default();
    config.crawler.min_delay_ms = 0;
    config.crawler.max_delay_ms = 0;
    config.output.directory = output.path().to_string_lossy().into_owned();

    let stats = mirror(config, &format!("{}/", base)).await.unwrap();
    assert_eq!(stats.posts_stored, 2);

    let address = server.address();
    let root = output
        .path()
        .join(format!("{}:{}", address.ip(), address.port()));

    let counts = count_html_files(&root).unwrap();
    assert_eq!(counts.total, 3);
    assert_eq!(counts.by_dir.get(ROOT_LABEL), Some(&1));
    assert_eq!(counts.by_dir.get("2021/05"), Some(&1));
    assert_eq!(counts.by_dir.get("2021/06"), Some(&1));

    let expected = vec![
        format!("{}/2021/05/first.html", base),
        format!("{}/2021/06/second.html", base),
        format!("{}/2021/07/third.html", base),
    ];
    std::fs::write(root.join(EXPECTED_URLS_FILE), serde_json::to_vec(&expected).unwrap()).unwrap();

    let comparison = compare_urls(&root).unwrap().unwrap();
    assert_eq!(comparison.missing, vec![format!("{}/2021/07/third.html", base)]);
    assert!(comparison.extra.is_empty());
    assert_eq!(comparison.processed_count, 2);
}
