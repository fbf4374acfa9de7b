//! Options for building and inspecting decks.

use std::path::{Path, PathBuf};

/// Options for [`build`](crate::build).
///
/// # Examples
///
/// ```rust
/// use powerbb::{BuildOptions, InspectOptions};
///
/// let build = BuildOptions::new().with_base_dir("assets").with_lenient(true);
/// assert!(build.lenient);
///
/// let inspect = InspectOptions::new().with_media_dir("out/media");
/// assert!(inspect.media_dir.is_some());
/// ```
#[derive(Debug, Clone, Default)]
pub struct BuildOptions {
    /// Directory image `src` paths are relative to; the current directory
    /// when unset
    pub base_dir: Option<PathBuf>,
    /// Clean up comments, fences and trailing commas before parsing JSON
    pub lenient: bool,
}

impl BuildOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_base_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.base_dir = Some(dir.into());
        self
    }

    #[inline]
    pub fn with_lenient(mut self, lenient: bool) -> Self {
        self.lenient = lenient;
        self
    }

    /// Resolve an image `src`; absolute paths are used as given.
    pub fn resolve_asset(&self, src: &str) -> PathBuf {
        match &self.base_dir {
            Some(base) => base.join(src),
            None => PathBuf::from(src),
        }
    }

    /// Default the base directory to the directory of `input`.
    pub(crate) fn for_input(&self, input: &Path) -> Self {
        let mut options = self.clone();
        if options.base_dir.is_none() {
            options.base_dir = input
                .parent()
                .filter(|p| !p.as_os_str().is_empty())
                .map(Path::to_path_buf);
        }
        options
    }
}

/// Options for [`inspect`](crate::inspect).
#[derive(Debug, Clone, Default)]
pub struct InspectOptions {
    /// Extract embedded images here and point `src` at the extracted files
    pub media_dir: Option<PathBuf>,
}

impl InspectOptions {
    #[inline]
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn with_media_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.media_dir = Some(dir.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_asset() {
        let options = BuildOptions::new();
        assert_eq!(options.resolve_asset("a.png"), PathBuf::from("a.png"));

        let options = options.with_base_dir("/decks");
        assert_eq!(options.resolve_asset("img/a.png"), PathBuf::from("/decks/img/a.png"));
        assert_eq!(options.resolve_asset("/abs/a.png"), PathBuf::from("/abs/a.png"));
    }

    #[test]
    fn test_for_input() {
        let options = BuildOptions::new().for_input(Path::new("decks/q3.json"));
        assert_eq!(options.base_dir, Some(PathBuf::from("decks")));

        let options = BuildOptions::new().for_input(Path::new("q3.json"));
        assert_eq!(options.base_dir, None);

        let options = BuildOptions::new()
            .with_base_dir("assets")
            .for_input(Path::new("decks/q3.json"));
        assert_eq!(options.base_dir, Some(PathBuf::from("assets")));
    }
}
