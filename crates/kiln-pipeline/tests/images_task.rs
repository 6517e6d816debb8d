use std::fs;
use std::path::Path;

use tempfile::TempDir;

use kiln_cache::DiskCache;
use kiln_pipeline::{tasks, PipelineConfig, PipelineError};
use kiln_test_utils::{broken_png, sample_jpeg, sample_png, sample_svg, write_tree};

fn site_config(root: &Path, optimize: bool) -> PipelineConfig {
    let mut config = PipelineConfig::default();
    config.optimize_images = optimize;
    config.cache_dir = root.join("cache");
    config.images.src = format!("{}/app/images/**/*", root.display());
    config.images.dest = root.join("dist/images");
    config
}

async fn open_cache(config: &PipelineConfig) -> DiskCache {
    let cache = DiskCache::new(&config.cache_dir);
    cache.init().await.unwrap();
    cache
}

#[tokio::test]
async fn test_example_site_lands_in_dist_images() {
    let dir = TempDir::new().unwrap();
    write_tree(
        dir.path(),
        &[
            ("app/images/a.png", &sample_png()),
            ("app/images/b.jpg", &sample_jpeg()),
        ],
    );
    let config = site_config(dir.path(), true);
    let cache = open_cache(&config).await;

    let report = tasks::images::run(&config, &cache).await.unwrap();

    assert_eq!(report.files, 2);
    assert_eq!(report.optimized, 2);
    assert_eq!(report.copied, 0);
    assert!(dir.path().join("dist/images/a.png").is_file());
    assert!(dir.path().join("dist/images/b.jpg").is_file());
}

#[tokio::test]
async fn test_copy_mode_preserves_every_byte() {
    let dir = TempDir::new().unwrap();
    let png = sample_png();
    let jpeg = sample_jpeg();
    let svg = sample_svg();
    write_tree(
        dir.path(),
        &[
            ("app/images/a.png", &png),
            ("app/images/nested/b.jpg", &jpeg),
            ("app/images/c.svg", &svg),
        ],
    );
    let config = site_config(dir.path(), false);
    let cache = open_cache(&config).await;

    let report = tasks::images::run(&config, &cache).await.unwrap();

    assert_eq!(report.files, 3);
    assert_eq!(report.optimized, 0);
    assert_eq!(report.copied, 3);
    assert_eq!(fs::read(dir.path().join("dist/images/a.png")).unwrap(), png);
    assert_eq!(
        fs::read(dir.path().join("dist/images/nested/b.jpg")).unwrap(),
        jpeg
    );
    assert_eq!(fs::read(dir.path().join("dist/images/c.svg")).unwrap(), svg);
    // Copy mode never touches the cache
    assert_eq!(report.cache.misses, 0);
    assert_eq!(report.cache.entry_count, 0);
}

#[tokio::test]
async fn test_optimizing_twice_is_idempotent() {
    let dir = TempDir::new().unwrap();
    write_tree(
        dir.path(),
        &[
            ("app/images/a.png", &sample_png()),
            ("app/images/b.jpg", &sample_jpeg()),
        ],
    );
    let config = site_config(dir.path(), true);
    let cache = open_cache(&config).await;

    let first = tasks::images::run(&config, &cache).await.unwrap();
    let a1 = fs::read(dir.path().join("dist/images/a.png")).unwrap();
    let b1 = fs::read(dir.path().join("dist/images/b.jpg")).unwrap();

    let second = tasks::images::run(&config, &cache).await.unwrap();
    let a2 = fs::read(dir.path().join("dist/images/a.png")).unwrap();
    let b2 = fs::read(dir.path().join("dist/images/b.jpg")).unwrap();

    assert_eq!(a1, a2);
    assert_eq!(b1, b2);
    assert_eq!(first.cache.misses, 2);
    assert_eq!(first.cache.hits, 0);
    assert_eq!(second.cache.hits, 2);
    assert_eq!(second.cache.misses, 2);
}

#[tokio::test]
async fn test_cache_survives_a_fresh_process() {
    let dir = TempDir::new().unwrap();
    write_tree(dir.path(), &[("app/images/a.png", &sample_png())]);
    let config = site_config(dir.path(), true);

    let first_cache = open_cache(&config).await;
    tasks::images::run(&config, &first_cache).await.unwrap();
    drop(first_cache);

    let second_cache = open_cache(&config).await;
    let report = tasks::images::run(&config, &second_cache).await.unwrap();

    assert_eq!(report.cache.hits, 1);
    assert_eq!(report.cache.misses, 0);
}

#[tokio::test]
async fn test_clearing_the_cache_forces_recompression() {
    let dir = TempDir::new().unwrap();
    write_tree(
        dir.path(),
        &[
            ("app/images/a.png", &sample_png()),
            ("app/images/b.jpg", &sample_jpeg()),
        ],
    );
    let config = site_config(dir.path(), true);
    let cache = open_cache(&config).await;

    let first = tasks::images::run(&config, &cache).await.unwrap();
    let a1 = fs::read(dir.path().join("dist/images/a.png")).unwrap();

    let cleared = tasks::clear_cache::run(&cache).await.unwrap();
    assert_eq!(cleared.entries_removed, 2);

    let second = tasks::images::run(&config, &cache).await.unwrap();
    let a2 = fs::read(dir.path().join("dist/images/a.png")).unwrap();

    // Every file went through the codec again, to the same result
    assert_eq!(first.cache.misses, 2);
    assert_eq!(second.cache.misses, 4);
    assert_eq!(second.cache.hits, 0);
    assert_eq!(a1, a2);
}

#[tokio::test]
async fn test_clearing_an_empty_cache_still_completes() {
    let dir = TempDir::new().unwrap();
    let config = site_config(dir.path(), true);
    let cache = open_cache(&config).await;

    let report = tasks::clear_cache::run(&cache).await.unwrap();

    assert_eq!(report.entries_removed, 0);
    assert_eq!(report.summary(), "removed 0 cache entries");
}

#[tokio::test]
async fn test_svg_is_copied_even_when_optimizing() {
    let dir = TempDir::new().unwrap();
    let svg = sample_svg();
    write_tree(dir.path(), &[("app/images/logo.svg", &svg)]);
    let config = site_config(dir.path(), true);
    let cache = open_cache(&config).await;

    let report = tasks::images::run(&config, &cache).await.unwrap();

    assert_eq!(report.optimized, 0);
    assert_eq!(report.copied, 1);
    assert_eq!(fs::read(dir.path().join("dist/images/logo.svg")).unwrap(), svg);
}

#[tokio::test]
async fn test_undecodable_image_fails_the_task() {
    let dir = TempDir::new().unwrap();
    write_tree(dir.path(), &[("app/images/bad.png", &broken_png())]);
    let config = site_config(dir.path(), true);
    let cache = open_cache(&config).await;

    let err = tasks::images::run(&config, &cache).await.unwrap_err();

    assert!(matches!(err, PipelineError::Image { .. }));
    assert!(err.to_string().contains("bad.png"));
}

#[tokio::test]
async fn test_empty_source_set_writes_nothing() {
    let dir = TempDir::new().unwrap();
    let config = site_config(dir.path(), true);
    let cache = open_cache(&config).await;

    let report = tasks::images::run(&config, &cache).await.unwrap();

    assert_eq!(report.files, 0);
    assert!(!dir.path().join("dist").exists());
}
