//! Target resolution: filesystem path → component identifier

use std::path::{Path, PathBuf};

use thiserror::Error;

use lwcp_core::prelude::*;

use crate::services::ModuleResolver;

/// Why a path cannot be previewed
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ResolveFailure {
    #[error("no such file or directory: {0}")]
    NotFound(PathBuf),

    #[error("not a component: {0}")]
    Unsupported(PathBuf),
}

impl From<ResolveFailure> for Error {
    fn from(failure: ResolveFailure) -> Self {
        match failure {
            ResolveFailure::NotFound(path) => Error::path_not_found(path),
            ResolveFailure::Unsupported(path) => Error::unsupported_component(path),
        }
    }
}

/// Strip the leading slash from URI-style Windows paths (`/c:/proj` → `c:/proj`)
pub fn normalize_drive_path(path: &Path) -> PathBuf {
    let Some(text) = path.to_str() else {
        return path.to_path_buf();
    };

    let bytes = text.as_bytes();
    let has_drive_slash =
        bytes.len() >= 3 && bytes[0] == b'/' && bytes[1].is_ascii_alphabetic() && bytes[2] == b':';
    if has_drive_slash {
        PathBuf::from(&text[1..])
    } else {
        path.to_path_buf()
    }
}

/// Resolve `path` to a component identifier such as `c/foo`
pub fn resolve<R>(resolver: &R, path: &Path) -> std::result::Result<String, ResolveFailure>
where
    R: ModuleResolver + ?Sized,
{
    let path = normalize_drive_path(path);

    let metadata = match std::fs::metadata(&path) {
        Ok(metadata) => metadata,
        Err(e) => {
            debug!("Cannot stat {:?}: {}", path, e);
            return Err(ResolveFailure::NotFound(path));
        }
    };

    let component = if metadata.is_dir() {
        resolver.module_from_directory(&path)
    } else {
        resolver.module_from_file(&path)
    };

    match component {
        Some(name) if !name.trim().is_empty() => {
            debug!("Resolved {:?} to component {}", path, name);
            Ok(name)
        }
        _ => Err(ResolveFailure::Unsupported(path)),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::services::{MockModuleResolver, SfdxModuleResolver};
    use tempfile::tempdir;

    fn make_bundle(root: &Path, name: &str) -> PathBuf {
        let bundle = root.join("force-app/main/default/lwc").join(name);
        std::fs::create_dir_all(&bundle).unwrap();
        std::fs::write(bundle.join(format!("{}.js", name)), "").unwrap();
        bundle
    }

    #[test]
    fn test_resolve_file_and_directory() {
        let temp = tempdir().unwrap();
        let bundle = make_bundle(temp.path(), "foo");
        let resolver = SfdxModuleResolver::new();

        assert_eq!(resolve(&resolver, &bundle.join("foo.js")).unwrap(), "c/foo");
        assert_eq!(resolve(&resolver, &bundle).unwrap(), "c/foo");
    }

    #[test]
    fn test_resolve_missing_path() {
        let temp = tempdir().unwrap();
        let missing = temp.path().join("lwc/nope/nope.js");
        let failure = resolve(&SfdxModuleResolver::new(), &missing).unwrap_err();
        assert_eq!(failure, ResolveFailure::NotFound(missing));
        assert!(matches!(Error::from(failure), Error::PathNotFound { .. }));
    }

    #[test]
    fn test_resolve_unsupported_path() {
        let temp = tempdir().unwrap();
        let other = temp.path().join("README.md");
        std::fs::write(&other, "").unwrap();

        let failure = resolve(&SfdxModuleResolver::new(), &other).unwrap_err();
        assert!(matches!(failure, ResolveFailure::Unsupported(_)));
        assert!(matches!(
            Error::from(failure),
            Error::UnsupportedComponent { .. }
        ));
    }

    #[test]
    fn test_directory_uses_directory_lookup() {
        let temp = tempdir().unwrap();
        let mut resolver = MockModuleResolver::new();
        resolver
            .expect_module_from_directory()
            .times(1)
            .returning(|_| Some("c/dir".to_string()));
        resolver.expect_module_from_file().never();

        assert_eq!(resolve(&resolver, temp.path()).unwrap(), "c/dir");
    }

    #[test]
    fn test_blank_module_is_unsupported() {
        let temp = tempdir().unwrap();
        let mut resolver = MockModuleResolver::new();
        resolver
            .expect_module_from_directory()
            .returning(|_| Some("  ".to_string()));

        assert!(matches!(
            resolve(&resolver, temp.path()),
            Err(ResolveFailure::Unsupported(_))
        ));
    }

    #[test]
    fn test_normalize_drive_path() {
        assert_eq!(
            normalize_drive_path(Path::new("/c:/proj/lwc/foo")),
            PathBuf::from("c:/proj/lwc/foo")
        );
        assert_eq!(
            normalize_drive_path(Path::new("/home/me/lwc/foo")),
            PathBuf::from("/home/me/lwc/foo")
        );
        assert_eq!(normalize_drive_path(Path::new("/c")), PathBuf::from("/c"));
    }
}
