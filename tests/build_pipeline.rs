//! Build pipeline against real artifact files on disk.

use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

use blog_platform::build::BuildError;
use blog_platform::config::PlatformConfig;
use blog_platform::lifecycle::{start_build_pipeline, Shutdown};
use blog_platform::ssr::{OrchestratorState, RenderContext, TemplateEngine};

mod common;

const TEMPLATE: &str = "<html><head></head><body><!--vue-ssr-outlet--></body></html>";

fn config_in(dir: &Path) -> PlatformConfig {
    let mut config = PlatformConfig::default();
    config.build.client.artifact = dir.join("client.json").to_string_lossy().into_owned();
    config.build.server.artifact = dir.join("server.json").to_string_lossy().into_owned();
    config.build.poll_interval_ms = 50;
    config
}

fn write_bundle(dir: &Path, markup: &str) {
    let bundle = serde_json::json!({ "entry": "main.js", "files": { "main.js": markup } });
    std::fs::write(dir.join("server.json"), bundle.to_string()).unwrap();
}

fn write_manifest(dir: &Path) {
    std::fs::write(
        dir.join("client.json"),
        r#"{"publicPath":"/dist/","initial":["app.js"]}"#,
    )
    .unwrap();
}

fn render(handle: &blog_platform::RendererHandle) -> String {
    let active = handle.current().expect("renderer published");
    active
        .renderer
        .render_to_string(&RenderContext {
            title: "t".into(),
            url: "/about".into(),
        })
        .unwrap()
}

#[tokio::test]
async fn existing_artifacts_make_the_renderer_ready() {
    let dir = tempfile::tempdir().unwrap();
    write_manifest(dir.path());
    write_bundle(dir.path(), "<p>first</p>");

    let shutdown = Shutdown::new();
    let engine = Arc::new(TemplateEngine::new(TEMPLATE).unwrap());
    let pipeline = start_build_pipeline(&config_in(dir.path()), engine, &shutdown).unwrap();
    let handle = pipeline.handle();

    let active = tokio::time::timeout(Duration::from_secs(5), handle.ready())
        .await
        .expect("renderer never became ready");
    assert_eq!(active.generation, 1);
    assert_eq!(handle.state(), OrchestratorState::Ready);
    assert!(render(&handle).contains("<p>first</p>"));

    shutdown.trigger();
}

#[tokio::test]
async fn rewrites_rebuild_and_broken_rewrites_are_ignored() {
    let dir = tempfile::tempdir().unwrap();
    let shutdown = Shutdown::new();
    let engine = Arc::new(TemplateEngine::new(TEMPLATE).unwrap());
    let pipeline = start_build_pipeline(&config_in(dir.path()), engine, &shutdown).unwrap();
    let handle = pipeline.handle();
    assert!(handle.current().is_none());

    write_manifest(dir.path());
    write_bundle(dir.path(), "<p>v1</p>");
    tokio::time::timeout(Duration::from_secs(5), handle.ready())
        .await
        .expect("renderer never became ready");
    let first = handle.generation();

    std::fs::write(dir.path().join("server.json"), "{ half-written").unwrap();
    tokio::time::sleep(Duration::from_millis(300)).await;
    assert_eq!(handle.generation(), first);
    assert!(render(&handle).contains("<p>v1</p>"));

    write_bundle(dir.path(), "<p>v2</p>");
    assert!(
        common::eventually(Duration::from_secs(5), || render(&handle).contains("<p>v2</p>")).await,
        "rewritten bundle never published"
    );
    assert!(handle.generation() > first);

    shutdown.trigger();
}

#[cfg(unix)]
#[tokio::test]
async fn bundler_exit_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let mut config = config_in(dir.path());
    config.build.client.command = Some(vec!["false".into()]);

    let shutdown = Shutdown::new();
    let engine = Arc::new(TemplateEngine::new(TEMPLATE).unwrap());
    let mut pipeline = start_build_pipeline(&config, engine, &shutdown).unwrap();

    let result = tokio::time::timeout(Duration::from_secs(5), pipeline.wait_for_failure())
        .await
        .expect("bundler exit not reported");
    assert!(matches!(result, Err(BuildError::BundlerExited { .. })));

    shutdown.trigger();
}
