//! Classpath normalizer (C7)
//!
//! Makes heterogeneous identifiers comparable when evaluating Java
//! retrieval: file paths and fully-qualified names both normalize to the
//! same dotted form, with optional method-name stripping. Pure function of
//! `(input, options)` — no I/O, no shared state.

use mcb_domain::entities::ClasspathNormalizerOptions;

/// Stateless normalizer, constructed once and shared by the evaluator.
#[derive(Debug, Default, Clone, Copy)]
pub struct ClasspathNormalizer;

impl ClasspathNormalizer {
    /// Construct a normalizer.
    pub fn new() -> Self {
        Self
    }

    /// Normalize a Java file path or fully-qualified name into a canonical
    /// dotted identifier, per spec rules:
    ///
    /// - `"src/main/java/com/x/Foo.java"` with `java_source_root =
    ///   "src/main/java"` normalizes to `"com.x.Foo"`.
    /// - A path not under the configured root falls back to a heuristic:
    ///   strip `.java`, then walk backward from the rightmost
    ///   capitalized path component through its preceding lowercase
    ///   (package-like) components.
    /// - `"com.x.Foo.doStuff"` with `ignore_method_names = true`
    ///   normalizes to `"com.x.Foo"`.
    /// - Case folding is applied last, only when `case_sensitive` is false.
    pub fn normalize(&self, input: &str, options: &ClasspathNormalizerOptions) -> String {
        let dotted = if input.contains('/') {
            self.path_to_fqn(input, &options.java_source_root)
        } else {
            strip_java_suffix(input).to_string()
        };

        let dotted = if options.ignore_method_names {
            strip_trailing_method(&dotted)
        } else {
            dotted
        };

        if options.case_sensitive {
            dotted
        } else {
            dotted.to_lowercase()
        }
    }

    fn path_to_fqn(&self, path: &str, source_root: &str) -> String {
        let normalized_path = path.replace('\\', "/");
        let root = source_root.trim_end_matches('/');
        if let Some(rest) = normalized_path
            .strip_prefix(root)
            .and_then(|r| r.strip_prefix('/'))
        {
            return strip_java_suffix(rest).replace('/', ".");
        }

        // Heuristic fallback: find the rightmost capitalized component and
        // walk backward through preceding lowercase package components.
        let stripped = strip_java_suffix(&normalized_path);
        let components: Vec<&str> = stripped.split('/').filter(|c| !c.is_empty()).collect();
        let Some(class_idx) = components
            .iter()
            .rposition(|c| c.chars().next().is_some_and(char::is_uppercase))
        else {
            return components.join(".");
        };

        let mut start = class_idx;
        while start > 0
            && components[start - 1]
                .chars()
                .next()
                .is_some_and(char::is_lowercase)
        {
            start -= 1;
        }

        components[start..=class_idx].join(".")
    }
}

fn strip_java_suffix(s: &str) -> &str {
    s.strip_suffix(".java").unwrap_or(s)
}

/// Drop a trailing method-name component (lowercase-initial) that follows a
/// class-name component (uppercase-initial) in a dotted identifier.
fn strip_trailing_method(dotted: &str) -> String {
    let components: Vec<&str> = dotted.split('.').collect();
    if components.len() < 2 {
        return dotted.to_string();
    }
    let last = components[components.len() - 1];
    let second_last = components[components.len() - 2];
    let last_is_method = last.chars().next().is_some_and(char::is_lowercase);
    let prev_is_class = second_last.chars().next().is_some_and(char::is_uppercase);
    if last_is_method && prev_is_class {
        components[..components.len() - 1].join(".")
    } else {
        dotted.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn opts(ignore_method_names: bool, case_sensitive: bool) -> ClasspathNormalizerOptions {
        ClasspathNormalizerOptions {
            java_source_root: "src/main/java".to_string(),
            ignore_method_names,
            case_sensitive,
        }
    }

    #[test]
    fn normalizes_path_under_source_root() {
        let n = ClasspathNormalizer::new();
        let out = n.normalize("src/main/java/com/x/Foo.java", &opts(false, true));
        assert_eq!(out, "com.x.Foo");
    }

    #[test]
    fn strips_method_name_when_requested() {
        let n = ClasspathNormalizer::new();
        let out = n.normalize("com.x.Foo.doStuff", &opts(true, true));
        assert_eq!(out, "com.x.Foo");
    }

    #[test]
    fn keeps_method_name_by_default() {
        let n = ClasspathNormalizer::new();
        let out = n.normalize("com.x.Foo.doStuff", &opts(false, true));
        assert_eq!(out, "com.x.Foo.doStuff");
    }

    #[test]
    fn falls_back_to_heuristic_outside_source_root() {
        let n = ClasspathNormalizer::new();
        let out = n.normalize("other/root/com/x/Foo.java", &opts(false, true));
        assert_eq!(out, "com.x.Foo");
    }

    #[test]
    fn case_insensitive_folds_to_lowercase() {
        let n = ClasspathNormalizer::new();
        let out = n.normalize("com.x.Foo", &opts(false, false));
        assert_eq!(out, "com.x.foo");
    }

    #[test]
    fn is_a_pure_function() {
        let n = ClasspathNormalizer::new();
        let options = opts(true, true);
        let a = n.normalize("src/main/java/com/x/Foo.java", &options);
        let b = n.normalize("src/main/java/com/x/Foo.java", &options);
        assert_eq!(a, b);
    }
}
