// End-to-end crawls against a mock HTTP server

use sitegraph_core::{CrawlOptions, Crawler};
use sitegraph_scanner::HttpFetcher;
use wiremock::{
    Mock, MockServer, ResponseTemplate,
    matchers::{method, path},
};

async fn mount_html(server: &MockServer, route: &str, html: String) {
    Mock::given(method("GET"))
        .and(path(route))
        .respond_with(ResponseTemplate::new(200).set_body_raw(html, "text/html"))
        .mount(server)
        .await;
}

#[tokio::test]
async fn test_http_crawl_two_layers() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    mount_html(
        &mock_server,
        "/",
        r#"<html><body>
            <a href="/page1">Page 1</a>
            <a href="/page2">Page 2</a>
            <a href="/page1#intro">Page 1 again</a>
        </body></html>"#
            .to_string(),
    )
    .await;
    mount_html(
        &mock_server,
        "/page1",
        r#"<html><body><a href="/page3">3</a><a href="/">home</a></body></html>"#.to_string(),
    )
    .await;
    // /page2 is not mounted, so the mock server answers 404

    let crawler = Crawler::new(
        HttpFetcher::new().unwrap(),
        CrawlOptions::default().with_max_depth(2),
    );
    let report = crawler.crawl(&format!("{}/", base)).await.unwrap();
    let g = &report.graph;

    assert_eq!(g.node_count(), 4);
    assert_eq!(g.edge_count(), 3);
    assert_eq!(
        g.children(&format!("{}/", base)),
        vec![format!("{}/page1", base), format!("{}/page2", base)]
    );
    assert_eq!(g.depth_of(&format!("{}/page3", base)), Some(2));

    assert_eq!(report.pages_fetched, 2);
    assert_eq!(report.failures.len(), 1);
    assert_eq!(report.failures[0].url, format!("{}/page2", base));
}

#[tokio::test]
async fn test_http_crawl_follows_redirect_for_host_context() {
    let mock_server = MockServer::start().await;
    let base = mock_server.uri();

    Mock::given(method("GET"))
        .and(path("/start"))
        .respond_with(
            ResponseTemplate::new(302).insert_header("location", format!("{}/landing", base).as_str()),
        )
        .mount(&mock_server)
        .await;
    mount_html(
        &mock_server,
        "/landing",
        r#"<a href="/about">About</a>"#.to_string(),
    )
    .await;

    let crawler = Crawler::new(
        HttpFetcher::new().unwrap(),
        CrawlOptions::default().with_max_depth(1),
    );
    let report = crawler.crawl(&format!("{}/start", base)).await.unwrap();

    // the node keeps the queued URL, the link resolves against the final host
    assert!(report.graph.contains(&format!("{}/start", base)));
    assert_eq!(
        report.graph.children(&format!("{}/start", base)),
        vec![format!("{}/about", base)]
    );
}
