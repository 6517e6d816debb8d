//! Source file discovery
//!
//! Tasks select their inputs with a glob pattern and mirror the
//! matched layout under a destination directory. The mirrored part is
//! everything below the pattern's static prefix, so `app/images/**/*`
//! routes `app/images/icons/a.png` to `<dest>/icons/a.png`.

use std::path::{Path, PathBuf};

use kiln_asset::AssetPath;

use crate::error::PipelineError;

/// One matched source file and where it lands
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AssetRoute {
    /// Matched source file
    pub source: PathBuf,
    /// Layout below the pattern's static prefix
    pub relative: AssetPath,
    /// Destination path mirroring that layout
    pub output: PathBuf,
}

/// Expand `pattern` and route every matched file under `dest`
///
/// Directories matched by the pattern are skipped. Matches come back
/// in the alphabetical order the glob walk produces.
///
/// # Errors
/// Returns error if the pattern is malformed, a matched directory
/// cannot be read, or a matched path does not form a clean relative
/// route.
pub fn collect_routes(pattern: &str, dest: &Path) -> Result<Vec<AssetRoute>, PipelineError> {
    let prefix = static_prefix(pattern);
    let matches = glob::glob(pattern).map_err(|source| PipelineError::Pattern {
        pattern: pattern.to_owned(),
        source,
    })?;

    let mut routes = Vec::new();
    for entry in matches {
        let path = entry?;
        if !path.is_file() {
            continue;
        }

        let below = path.strip_prefix(&prefix).unwrap_or(&path);
        let relative = AssetPath::from_path(below).map_err(|source| PipelineError::Route {
            path: path.clone(),
            source,
        })?;
        let output = relative.below(dest);
        routes.push(AssetRoute {
            source: path,
            relative,
            output,
        });
    }
    Ok(routes)
}

/// Literal directory part of a glob pattern, up to the first segment
/// containing a metacharacter
fn static_prefix(pattern: &str) -> PathBuf {
    let stem = match pattern.find(['*', '?', '[']) {
        Some(meta) => &pattern[..meta],
        None => pattern,
    };
    match stem.rfind('/') {
        Some(separator) => PathBuf::from(&stem[..=separator]),
        None => PathBuf::new(),
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use super::*;

    fn touch(path: &Path) {
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, b"x").unwrap();
    }

    #[test]
    fn static_prefix_stops_at_first_metacharacter() {
        assert_eq!(static_prefix("app/images/**/*"), PathBuf::from("app/images/"));
        assert_eq!(static_prefix("app/pages/**/*.md"), PathBuf::from("app/pages/"));
        assert_eq!(static_prefix("app/i*/all"), PathBuf::from("app/"));
        assert_eq!(static_prefix("*.png"), PathBuf::new());
        assert_eq!(static_prefix("plain/file.txt"), PathBuf::from("plain/"));
    }

    #[test]
    fn routes_mirror_nested_layout() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("app/images/a.png"));
        touch(&root.join("app/images/icons/b.jpg"));

        let pattern = format!("{}/app/images/**/*", root.display());
        let routes = collect_routes(&pattern, Path::new("dist/images")).unwrap();

        assert_eq!(routes.len(), 2);
        assert_eq!(routes[0].relative.to_string(), "a.png");
        assert_eq!(routes[0].output, PathBuf::from("dist/images/a.png"));
        assert_eq!(routes[1].relative.to_string(), "icons/b.jpg");
        assert_eq!(routes[1].output, PathBuf::from("dist/images/icons/b.jpg"));
    }

    #[test]
    fn directories_are_skipped() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path();
        touch(&root.join("app/images/icons/a.png"));

        let pattern = format!("{}/app/images/**/*", root.display());
        let routes = collect_routes(&pattern, Path::new("out")).unwrap();

        // The icons/ directory itself matches the pattern but routes
        // only carry files
        assert_eq!(routes.len(), 1);
        assert_eq!(routes[0].relative.to_string(), "icons/a.png");
    }

    #[test]
    fn no_matches_is_empty_not_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let pattern = format!("{}/nothing/**/*", dir.path().display());
        let routes = collect_routes(&pattern, Path::new("out")).unwrap();
        assert!(routes.is_empty());
    }

    #[test]
    fn malformed_pattern_is_rejected() {
        let err = collect_routes("app/[images/**", Path::new("out")).unwrap_err();
        assert!(matches!(err, PipelineError::Pattern { .. }));
    }
}
