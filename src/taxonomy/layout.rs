use std::collections::HashSet;

use once_cell::sync::Lazy;

use crate::models::ContentEntry;

static LAYOUT: Lazy<LayoutTaxonomy> = Lazy::new(LayoutTaxonomy::new);

/// Shared, lazily built vocabulary.
pub fn layout() -> &'static LayoutTaxonomy {
    &LAYOUT
}

/// Root-level file and directory names that signal a conventionally laid
/// out project. All lookups are case-insensitive.
pub struct LayoutTaxonomy {
    manifests: HashSet<&'static str>,
    source_dirs: HashSet<&'static str>,
    docs_dirs: HashSet<&'static str>,
    ci_dirs: HashSet<&'static str>,
    ci_files: HashSet<&'static str>,
}

impl LayoutTaxonomy {
    pub fn new() -> Self {
        let mut taxonomy = Self {
            manifests: HashSet::new(),
            source_dirs: HashSet::new(),
            docs_dirs: HashSet::new(),
            ci_dirs: HashSet::new(),
            ci_files: HashSet::new(),
        };

        taxonomy.init_manifests();
        taxonomy.init_directories();
        taxonomy.init_ci();

        taxonomy
    }

    fn init_manifests(&mut self) {
        self.manifests.extend([
            // JavaScript
            "package.json",
            // Python
            "requirements.txt",
            "pyproject.toml",
            "setup.py",
            // Rust
            "cargo.toml",
            // JVM
            "pom.xml",
            "build.gradle",
            // Ruby / PHP / Go
            "gemfile",
            "composer.json",
            "go.mod",
            // C / C++
            "cmakelists.txt",
        ]);
    }

    fn init_directories(&mut self) {
        self.source_dirs
            .extend(["src", "lib", "test", "tests", "spec", "app", "source"]);
        self.docs_dirs.extend(["docs", "documentation"]);
    }

    fn init_ci(&mut self) {
        self.ci_dirs.insert(".github");
        self.ci_files.extend([
            ".travis.yml",
            ".circleci",
            "jenkinsfile",
            "dockerfile",
            "docker-compose.yml",
        ]);
    }

    pub fn is_dependency_manifest(&self, name: &str) -> bool {
        self.manifests.contains(name.to_lowercase().as_str())
    }

    pub fn is_conventional_dir(&self, entry: &ContentEntry) -> bool {
        entry.is_dir() && self.source_dirs.contains(entry.name.to_lowercase().as_str())
    }

    pub fn is_docs_dir(&self, entry: &ContentEntry) -> bool {
        entry.is_dir() && self.docs_dirs.contains(entry.name.to_lowercase().as_str())
    }

    /// A `.github` directory, a CI config, or a container build file.
    /// The file list matches on name alone, so `.circleci` counts whether
    /// it is listed as a file or a directory.
    pub fn is_ci_signal(&self, entry: &ContentEntry) -> bool {
        let lower = entry.name.to_lowercase();
        (entry.is_dir() && self.ci_dirs.contains(lower.as_str()))
            || self.ci_files.contains(lower.as_str())
    }
}

impl Default for LayoutTaxonomy {
    fn default() -> Self {
        Self::new()
    }
}
