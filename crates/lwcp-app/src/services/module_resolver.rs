//! Component module lookup for Salesforce DX project layouts
//!
//! A Lightning Web Component lives in a bundle directory under an `lwc`
//! folder, with its main files named after the bundle:
//!
//! ```text
//! force-app/main/default/lwc/helloWorld/helloWorld.js
//! force-app/main/default/lwc/helloWorld/helloWorld.html
//! ```
//!
//! Both the bundle directory and any file directly inside it named after the
//! bundle resolve to the module `c/helloWorld`.

use std::path::Path;

use super::ModuleResolver;

/// Folder that holds component bundles
const LWC_FOLDER: &str = "lwc";

/// Namespace used for components in the default namespace
const DEFAULT_NAMESPACE: &str = "c";

#[derive(Debug, Clone, Default)]
pub struct SfdxModuleResolver {
    namespace: Option<String>,
}

impl SfdxModuleResolver {
    pub fn new() -> Self {
        Self::default()
    }

    /// Use `namespace` instead of the default `c`
    pub fn with_namespace(namespace: impl Into<String>) -> Self {
        Self {
            namespace: Some(namespace.into()),
        }
    }

    fn module_name(&self, bundle: &str) -> String {
        let namespace = self.namespace.as_deref().unwrap_or(DEFAULT_NAMESPACE);
        format!("{}/{}", namespace, bundle)
    }
}

fn file_name_str(path: &Path) -> Option<&str> {
    path.file_name().and_then(|name| name.to_str())
}

fn is_bundle_dir(dir: &Path) -> bool {
    dir.parent()
        .and_then(file_name_str)
        .is_some_and(|parent| parent == LWC_FOLDER)
}

impl ModuleResolver for SfdxModuleResolver {
    fn module_from_file(&self, path: &Path) -> Option<String> {
        let bundle_dir = path.parent()?;
        let bundle = file_name_str(bundle_dir)?;

        // `foo.js`, `foo.html`, `foo.js-meta.xml` all have the bundle name before the first dot
        let stem = file_name_str(path)?.split('.').next()?;
        if stem != bundle || !is_bundle_dir(bundle_dir) {
            return None;
        }
        Some(self.module_name(bundle))
    }

    fn module_from_directory(&self, path: &Path) -> Option<String> {
        if !is_bundle_dir(path) {
            return None;
        }
        file_name_str(path).map(|bundle| self.module_name(bundle))
    }
}
