//! Gitignore-syntax pattern matching
//!
//! Compiles pattern lists into [`PatternMatcher`]s with gitignore
//! semantics: `*` and `?` stop at path separators, `**` crosses them,
//! a leading `!` negates, a trailing `/` anchors the pattern to
//! directories, patterns with an interior `/` are anchored to the root
//! while bare names match at any depth, and a matched directory also
//! matches everything beneath it. Evaluation is sequential with the last
//! matching pattern winning.
//!
//! An empty pattern list compiles to a matcher that matches nothing:
//! callers treat "no includes" as "include nothing", not "include
//! everything".

use crate::{Error, Result};
use globset::{Glob, GlobBuilder, GlobMatcher};
use std::path::Path;

struct CompiledPattern {
    /// Matches the path itself
    matcher: GlobMatcher,
    /// Matches paths beneath a matched directory
    contents: GlobMatcher,
    negated: bool,
    dir_only: bool,
}

/// A compiled, ordered gitignore-style pattern set.
pub struct PatternMatcher {
    patterns: Vec<CompiledPattern>,
}

impl PatternMatcher {
    /// Compile a list of gitignore-syntax patterns.
    ///
    /// Blank lines and `#` comment lines are skipped so ignore-file
    /// contents can be fed in directly.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Pattern`] for a pattern that does not compile to
    /// a valid glob.
    pub fn new<S: AsRef<str>>(patterns: &[S]) -> Result<Self> {
        let mut compiled = Vec::new();
        for raw in patterns {
            let line = raw.as_ref().trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            compiled.push(compile_pattern(line)?);
        }
        Ok(Self { patterns: compiled })
    }

    /// True when no patterns were compiled.
    pub fn is_empty(&self) -> bool {
        self.patterns.is_empty()
    }

    /// Whether the pattern set matches a relative file path.
    pub fn matches(&self, relative_path: &str) -> bool {
        self.evaluate(relative_path, false)
    }

    /// Whether the pattern set matches a relative path treated as a
    /// directory. Used to prune traversal before descending.
    pub fn matches_directory(&self, relative_path: &str) -> bool {
        let trimmed = relative_path.trim_end_matches('/');
        self.evaluate(trimmed, true)
    }

    fn evaluate(&self, path: &str, is_dir: bool) -> bool {
        let candidate = Path::new(path);
        let mut decision = None;
        for pattern in &self.patterns {
            let self_match = (is_dir || !pattern.dir_only) && pattern.matcher.is_match(candidate);
            let content_match = pattern.contents.is_match(candidate);
            if self_match || content_match {
                decision = Some(!pattern.negated);
            }
        }
        decision.unwrap_or(false)
    }
}

impl std::fmt::Debug for PatternMatcher {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("PatternMatcher")
            .field("patterns", &self.patterns.len())
            .finish()
    }
}

fn compile_pattern(line: &str) -> Result<CompiledPattern> {
    let (negated, body) = match line.strip_prefix('!') {
        Some(rest) => (true, rest),
        None => (false, line),
    };
    let (dir_only, body) = match body.strip_suffix('/') {
        Some(rest) => (true, rest),
        None => (false, body),
    };

    // An interior slash anchors the pattern to the root; a bare name
    // matches at any depth.
    let anchored_body = body.strip_prefix('/').unwrap_or(body);
    let glob_text = if anchored_body.contains('/') || body.starts_with('/') {
        anchored_body.to_string()
    } else {
        format!("**/{anchored_body}")
    };

    let matcher = build_glob(line, &glob_text)?.compile_matcher();
    let contents = build_glob(line, &format!("{glob_text}/**"))?.compile_matcher();

    Ok(CompiledPattern {
        matcher,
        contents,
        negated,
        dir_only,
    })
}

fn build_glob(original: &str, text: &str) -> Result<Glob> {
    GlobBuilder::new(text)
        .literal_separator(true)
        .build()
        .map_err(|e| Error::Pattern {
            pattern: original.to_string(),
            message: e.to_string(),
        })
}

/// Load a pattern file (`.gitignore` / `.claudeignore`) from a project
/// root. Returns `Ok(None)` when the file does not exist.
pub fn load_ignore_file(root: &Path, file_name: &str) -> Result<Option<PatternMatcher>> {
    let path = root.join(file_name);
    if !path.is_file() {
        return Ok(None);
    }
    let content = std::fs::read_to_string(&path)?;
    let lines: Vec<&str> = content.lines().collect();
    Ok(Some(PatternMatcher::new(&lines)?))
}
