//! The bundled grammars and how inputs are mapped onto them.
//!
//! Each [`SupportedLanguage`] carries a static profile: its canonical name,
//! the other names it answers to, and the file extensions it claims. The
//! variant doubles as the [`LanguageAdapter`](crate::LanguageAdapter) for
//! its grammar, see [`crate::adapter`].

use std::fmt;
use std::path::Path;
use std::str::FromStr;

use thiserror::Error;

/// Languages shipped with a built-in adapter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SupportedLanguage {
    /// Rust (`.rs`).
    Rust,
    /// Python (`.py`, `.pyi`).
    Python,
    /// TypeScript and JavaScript, parsed with the TSX grammar.
    #[default]
    TypeScript,
}

struct Profile {
    name: &'static str,
    aliases: &'static [&'static str],
    extensions: &'static [&'static str],
}

const RUST: Profile = Profile {
    name: "rust",
    aliases: &["rs"],
    extensions: &["rs"],
};

const PYTHON: Profile = Profile {
    name: "python",
    aliases: &["py"],
    extensions: &["py", "pyi"],
};

const TYPESCRIPT: Profile = Profile {
    name: "typescript",
    aliases: &["ts", "javascript", "js"],
    extensions: &["ts", "tsx", "mts", "cts", "js", "jsx", "mjs", "cjs"],
};

impl SupportedLanguage {
    const fn profile(self) -> &'static Profile {
        match self {
            Self::Rust => &RUST,
            Self::Python => &PYTHON,
            Self::TypeScript => &TYPESCRIPT,
        }
    }

    /// Returns every bundled language.
    #[must_use]
    pub const fn all() -> &'static [Self] {
        &[Self::Rust, Self::Python, Self::TypeScript]
    }

    /// Returns the language claiming `ext`, ignoring ASCII case.
    ///
    /// ```
    /// use graft_syntax::SupportedLanguage;
    ///
    /// assert_eq!(
    ///     SupportedLanguage::from_extension("JSX"),
    ///     Some(SupportedLanguage::TypeScript)
    /// );
    /// assert_eq!(SupportedLanguage::from_extension("toml"), None);
    /// ```
    #[must_use]
    pub fn from_extension(ext: &str) -> Option<Self> {
        Self::all().iter().copied().find(|language| {
            language
                .profile()
                .extensions
                .iter()
                .any(|claimed| claimed.eq_ignore_ascii_case(ext))
        })
    }

    /// Returns the language claiming the extension of `path`.
    #[must_use]
    pub fn from_path(path: &Path) -> Option<Self> {
        Self::from_extension(path.extension()?.to_str()?)
    }

    /// Returns the canonical lower-case name.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        self.profile().name
    }

    pub(crate) fn bundled_grammar(self) -> tree_sitter::Language {
        match self {
            Self::Rust => tree_sitter_rust::LANGUAGE.into(),
            Self::Python => tree_sitter_python::LANGUAGE.into(),
            // TSX is a superset of plain JavaScript and JSX.
            Self::TypeScript => tree_sitter_typescript::LANGUAGE_TSX.into(),
        }
    }
}

impl fmt::Display for SupportedLanguage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A language name that no bundled grammar answers to.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
#[error("no bundled grammar is called '{name}'")]
pub struct UnknownLanguageName {
    name: String,
}

impl UnknownLanguageName {
    /// Returns the rejected name, trimmed and lower-cased.
    #[must_use]
    pub fn name(&self) -> &str {
        &self.name
    }
}

impl FromStr for SupportedLanguage {
    type Err = UnknownLanguageName;

    fn from_str(input: &str) -> Result<Self, Self::Err> {
        let name = input.trim().to_ascii_lowercase();
        Self::all()
            .iter()
            .copied()
            .find(|language| {
                let profile = language.profile();
                profile.name == name || profile.aliases.contains(&name.as_str())
            })
            .ok_or(UnknownLanguageName { name })
    }
}

#[cfg(test)]
mod tests {
    use rstest::rstest;

    use super::*;

    #[rstest]
    #[case("main.rs", Some(SupportedLanguage::Rust))]
    #[case("stubs/os.pyi", Some(SupportedLanguage::Python))]
    #[case("App.TSX", Some(SupportedLanguage::TypeScript))]
    #[case("server.cjs", Some(SupportedLanguage::TypeScript))]
    #[case("Cargo.toml", None)]
    #[case("Makefile", None)]
    fn paths_pick_a_grammar(#[case] path: &str, #[case] expected: Option<SupportedLanguage>) {
        assert_eq!(SupportedLanguage::from_path(Path::new(path)), expected);
    }

    #[test]
    fn every_language_parses_its_own_name() {
        for language in SupportedLanguage::all() {
            assert_eq!(language.to_string().parse(), Ok(*language));
        }
    }

    #[rstest]
    #[case(" JavaScript ", SupportedLanguage::TypeScript)]
    #[case("py", SupportedLanguage::Python)]
    fn aliases_are_accepted(#[case] input: &str, #[case] expected: SupportedLanguage) {
        assert_eq!(input.parse(), Ok(expected));
    }

    #[test]
    fn unknown_names_are_reported_normalised() {
        let err = " Go ".parse::<SupportedLanguage>().expect_err("go is not bundled");
        assert_eq!(err.name(), "go");
        assert_eq!(err.to_string(), "no bundled grammar is called 'go'");
    }
}
