//! End-to-end mirror runs against a mock blog

use blog_mirror::config::Config;
use blog_mirror::crawler::Coordinator;
use blog_mirror::state::PageState;
use std::path::{Path, PathBuf};
use tempfile::TempDir;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const POST_PATH: &str = "/2020/01/example.html";
const ARCHIVE_PATH: &str = "/2020/";
const IMAGE_PATH: &str = "/blogger_img/a/b/w400-h300/photo";

/// Creates a configuration that treats the mock server as the image service
fn create_test_config(output_dir: &Path) -> Config {
    let mut config = Config::default();
    config.crawler.min_delay_ms = 0;
    config.crawler.max_delay_ms = 0;
    config.http.timeout_secs = 5;
    config.http.connect_timeout_secs = 2;
    config.output.directory = output_dir.to_string_lossy().into_owned();
    config.images.optimized_hosts = vec!["127.0.0.1".to_string()];
    config
}

/// Output root of the mock blog (`<output>/<host:port>`)
fn mirror_root(output_dir: &Path, server: &MockServer) -> PathBuf {
    let address = server.address();
    output_dir.join(format!("{}:{}", address.ip(), address.port()))
}

fn landing_page(base: &str) -> String {
    format!(
        r#"<html><body>
<div class="post">
  <h3 class="post-title"><a href="{base}{POST_PATH}">Example post</a></h3>
</div>
<div id="archive"><a href="{base}{ARCHIVE_PATH}">2020</a></div>
<a class="blog-pager-older-link" href="{base}/search?updated-max=2020-01-01">Older Posts</a>
</body></html>"#
    )
}

fn post_page(base: &str, extra: &str) -> String {
    format!(
        r#"<html><body><h3 class="post-title">Example post</h3>
<div class="post-body"><img src="{base}{IMAGE_PATH}" alt="photo">{extra}</div>
</body></html>"#
    )
}

async fn mount_page(server: &MockServer, route: &str, body: String, expected: u64) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_string(body))
        .expect(expected)
        .mount(server)
        .await;
}

async fn mount_image(server: &MockServer, expected: u64) {
    Mock::given(method("GET"))
        .and(path(IMAGE_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_bytes(b"\xff\xd8jpeg".to_vec()))
        .expect(expected)
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_mirror_blog_end_to_end() {
    let server = MockServer::start().await;
    let base = server.uri();
    let output = TempDir::new().unwrap();

    mount_page(&server, "/", landing_page(&base), 1).await;
    mount_page(&server, ARCHIVE_PATH, landing_page(&base), 1).await;
    mount_page(&server, "/search", "<html><body>No more posts</body></html>".to_string(), 1).await;
    mount_page(&server, POST_PATH, post_page(&base, ""), 1).await;
    mount_image(&server, 1).await;

    let config = create_test_config(output.path());
    let mut coordinator = Coordinator::new(config, &format!("{}/", base)).unwrap();
    let stats = coordinator.run().await;

    assert_eq!(stats.pages_visited, 3);
    assert_eq!(stats.posts_stored, 1);
    assert_eq!(stats.images_downloaded, 1);

    let root = mirror_root(output.path(), &server);
    assert!(root.join("index.html").exists());

    let processed: Vec<String> =
        serde_json::from_slice(&std::fs::read(root.join("processed_urls.json")).unwrap()).unwrap();
    assert_eq!(processed, vec![format!("{}{}", base, POST_PATH)]);

    let post = std::fs::read_to_string(root.join("2020/01/example.html")).unwrap();
    assert!(post.contains(r#"src="/images/a/b/photo.jpg""#));
    assert!(post.contains(r#"<h3 class="post-title">Example post</h3>"#));
    assert!(!post.contains(IMAGE_PATH));

    assert_eq!(
        std::fs::read(root.join("images/a/b/photo.jpg")).unwrap(),
        b"\xff\xd8jpeg"
    );
}

#[tokio::test]
async fn test_landing_page_saved_verbatim() {
    let server = MockServer::start().await;
    let base = server.uri();
    let output = TempDir::new().unwrap();
    let landing = landing_page(&base);

    mount_page(&server, "/", landing.clone(), 1).await;
    mount_page(&server, POST_PATH, post_page(&base, ""), 1).await;
    mount_image(&server, 1).await;

    let config = create_test_config(output.path());
    Coordinator::new(config, &format!("{}/", base))
        .unwrap()
        .run()
        .await;

    let saved =
        std::fs::read_to_string(mirror_root(output.path(), &server).join("index.html")).unwrap();
    assert_eq!(saved, landing);
}

#[tokio::test]
async fn test_rerun_fetches_nothing_new() {
    let server = MockServer::start().await;
    let base = server.uri();
    let output = TempDir::new().unwrap();

    // Listing pages are crawled on every run; posts and images only once
    mount_page(&server, "/", landing_page(&base), 2).await;
    mount_page(&server, ARCHIVE_PATH, landing_page(&base), 2).await;
    mount_page(&server, "/search", String::new(), 2).await;
    mount_page(&server, POST_PATH, post_page(&base, ""), 1).await;
    mount_image(&server, 1).await;

    let root_url = format!("{}/", base);

    let first = Coordinator::new(create_test_config(output.path()), &root_url)
        .unwrap()
        .run()
        .await;
    assert_eq!(first.posts_stored, 1);

    let root = mirror_root(output.path(), &server);
    let post_before = std::fs::read(root.join("2020/01/example.html")).unwrap();

    let mut resumed = Coordinator::new(create_test_config(output.path()), &root_url).unwrap();
    assert_eq!(resumed.processed().len(), 1);

    let second = resumed.run().await;
    assert_eq!(second.posts_stored, 0);
    assert_eq!(second.images_downloaded, 0);

    assert_eq!(std::fs::read(root.join("2020/01/example.html")).unwrap(), post_before);
    let processed: Vec<String> =
        serde_json::from_slice(&std::fs::read(root.join("processed_urls.json")).unwrap()).unwrap();
    assert_eq!(processed.len(), 1);
}

#[tokio::test]
async fn test_failed_post_retried_on_next_run() {
    let server = MockServer::start().await;
    let base = server.uri();
    let output = TempDir::new().unwrap();
    let root_url = format!("{}/", base);

    mount_page(&server, "/", landing_page(&base), 2).await;
    Mock::given(method("GET"))
        .and(path(POST_PATH))
        .respond_with(ResponseTemplate::new(503))
        .up_to_n_times(2)
        .mount(&server)
        .await;

    let first = Coordinator::new(create_test_config(output.path()), &root_url)
        .unwrap()
        .run()
        .await;
    assert_eq!(first.posts_failed, 1);

    let root = mirror_root(output.path(), &server);
    assert!(!root.join("2020/01/example.html").exists());

    // The post now answers normally
    mount_page(&server, POST_PATH, post_page(&base, ""), 1).await;
    mount_image(&server, 1).await;

    let second = Coordinator::new(create_test_config(output.path()), &root_url)
        .unwrap()
        .run()
        .await;
    assert_eq!(second.posts_stored, 1);
    assert!(root.join("2020/01/example.html").exists());
}

#[tokio::test]
async fn test_denylisted_image_left_untouched() {
    let server = MockServer::start().await;
    let base = server.uri();
    let output = TempDir::new().unwrap();
    let tracker = format!("{}/tracker/pixel.gif", base);

    mount_page(&server, "/", landing_page(&base), 1).await;
    mount_page(
        &server,
        POST_PATH,
        post_page(&base, &format!(r#"<img src="{}" width="1">"#, tracker)),
        1,
    )
    .await;
    mount_image(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/tracker/pixel.gif"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    let mut config = create_test_config(output.path());
    config.images.denylist = vec![format!("{}/tracker", base)];

    Coordinator::new(config, &format!("{}/", base))
        .unwrap()
        .run()
        .await;

    let post = std::fs::read_to_string(
        mirror_root(output.path(), &server).join("2020/01/example.html"),
    )
    .unwrap();
    assert!(post.contains(&format!(r#"src="{}""#, tracker)));
    assert!(post.contains(r#"src="/images/a/b/photo.jpg""#));
}

#[tokio::test]
async fn test_denylist_ignores_tracker_scheme() {
    let server = MockServer::start().await;
    let base = server.uri();
    let output = TempDir::new().unwrap();
    let address = server.address();
    let relative = format!("//{}:{}/tracker/pixel.gif", address.ip(), address.port());

    mount_page(&server, "/", landing_page(&base), 1).await;
    mount_page(
        &server,
        POST_PATH,
        post_page(&base, &format!(r#"<img src="{}" width="1">"#, relative)),
        1,
    )
    .await;
    mount_image(&server, 1).await;
    Mock::given(method("GET"))
        .and(path("/tracker/pixel.gif"))
        .respond_with(ResponseTemplate::new(200))
        .expect(0)
        .mount(&server)
        .await;

    // Entry written with the other scheme than the one the blog is served on
    let mut config = create_test_config(output.path());
    config.images.denylist = vec![format!("https:{}", relative.trim_end_matches("/pixel.gif"))];

    Coordinator::new(config, &format!("{}/", base))
        .unwrap()
        .run()
        .await;

    let post = std::fs::read_to_string(
        mirror_root(output.path(), &server).join("2020/01/example.html"),
    )
    .unwrap();
    assert!(post.contains(&format!(r#"src="{}""#, relative)));
    assert!(post.contains(r#"src="/images/a/b/photo.jpg""#));
}

#[tokio::test]
async fn test_out_of_domain_pages_discarded() {
    let server = MockServer::start().await;
    let base = server.uri();
    let output = TempDir::new().unwrap();

    let foreign = format!("http://mirror.invalid/?from={}/2020/", base);
    let landing = format!(r#"<html><body><a href="{}">elsewhere</a></body></html>"#, foreign);
    mount_page(&server, "/", landing, 1).await;

    let mut coordinator =
        Coordinator::new(create_test_config(output.path()), &format!("{}/", base)).unwrap();
    let stats = coordinator.run().await;

    assert_eq!(stats.pages_visited, 1);
    assert_eq!(stats.pages_discarded, 1);
    let foreign = url::Url::parse(&foreign).unwrap();
    assert_eq!(coordinator.frontier().state(&foreign), Some(PageState::Discarded));
}

#[tokio::test]
async fn test_unreachable_blog_finishes_cleanly() {
    let output = TempDir::new().unwrap();
    let mut config = create_test_config(output.path());
    config.http.connect_timeout_secs = 1;

    let mut coordinator = Coordinator::new(config, "http://127.0.0.1:9/").unwrap();
    let stats = coordinator.run().await;

    assert_eq!(stats.pages_failed, 1);
    assert!(coordinator.processed().is_empty());
    assert!(coordinator.frontier().is_empty());
}
