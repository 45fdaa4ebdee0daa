//! Programming language identifier

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// A programming language recognized by the parser and tokenizer.
///
/// Java is first-class (full AST parsing); every other language degrades to
/// the fallback regex/indentation parser and is tracked here only so config
/// and collection metadata have something typed to carry around.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Language {
    /// Java source, parsed via tree-sitter.
    Java,
    /// Python source, fallback parser only.
    Python,
    /// JavaScript/TypeScript source, fallback parser only.
    JavaScript,
    /// Any other language, fallback parser only.
    Other,
}

impl Language {
    /// Derive a [`Language`] from a file extension.
    pub fn from_extension(extension: &str) -> Self {
        match extension.to_lowercase().as_str() {
            "java" => Self::Java,
            "py" => Self::Python,
            "js" | "mjs" | "cjs" | "ts" | "tsx" => Self::JavaScript,
            _ => Self::Other,
        }
    }

    /// Whether this language is parsed with the full AST parser.
    pub fn is_first_class(&self) -> bool {
        matches!(self, Self::Java)
    }
}

impl fmt::Display for Language {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Java => "java",
            Self::Python => "python",
            Self::JavaScript => "javascript",
            Self::Other => "other",
        };
        f.write_str(s)
    }
}

impl FromStr for Language {
    type Err = std::convert::Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.to_lowercase().as_str() {
            "java" => Self::Java,
            "python" => Self::Python,
            "javascript" | "typescript" => Self::JavaScript,
            _ => Self::Other,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn recognizes_java_extension() {
        assert_eq!(Language::from_extension("java"), Language::Java);
        assert_eq!(Language::from_extension("JAVA"), Language::Java);
    }

    #[test]
    fn falls_back_to_other() {
        assert_eq!(Language::from_extension("xyz"), Language::Other);
    }

    #[test]
    fn display_roundtrips_through_from_str() {
        for lang in [
            Language::Java,
            Language::Python,
            Language::JavaScript,
            Language::Other,
        ] {
            assert_eq!(lang.to_string().parse::<Language>().unwrap(), lang);
        }
    }
}
