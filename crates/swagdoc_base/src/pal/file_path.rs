use relative_path::{Component, RelativePath, RelativePathBuf};
use std::path::Path;

/* 📖 # Why use RelativePathBuf for FilePath?

FilePath wraps RelativePathBuf so every path handed to the PAL is relative to the PAL's
base directory (the directory swagdoc was started in). Source locations from the
configuration and browser asset paths from HTTP requests both go through this type,
which keeps `/` as the separator on every platform.
*/

/// Type-safe wrapper for file paths relative to PAL base directory.
///
/// # Examples
///
/// ```
/// use swagdoc_base::FilePath;
///
/// let path1 = FilePath::from("src/api.js");
/// let path2 = FilePath::from(String::from("docs/api.yml"));
/// assert_eq!(path1.extension(), Some("js"));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct FilePath(RelativePathBuf);

impl FilePath {
    /// Returns the underlying RelativePathBuf as a reference.
    pub fn as_relative(&self) -> &RelativePath {
        &self.0
    }

    /// Returns the path as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }

    /// Converts to a regular Path for use with std::fs operations.
    /// This returns the relative path portion without a base directory.
    pub fn as_path(&self) -> &Path {
        Path::new(self.as_relative().as_str())
    }

    /// Returns the file extension without the leading dot, if any.
    pub fn extension(&self) -> Option<&str> {
        self.0.extension()
    }

    /// Appends a relative path to this one.
    pub fn join(&self, other: impl AsRef<str>) -> FilePath {
        Self(self.0.join(other.as_ref()))
    }

    /// Returns true if any component is `..`, i.e. the path may leave its base directory.
    pub fn escapes_base(&self) -> bool {
        self.0.components().any(|c| matches!(c, Component::ParentDir))
    }
}

impl From<&str> for FilePath {
    fn from(s: &str) -> Self {
        Self(RelativePathBuf::from(s))
    }
}

impl From<String> for FilePath {
    fn from(s: String) -> Self {
        Self(RelativePathBuf::from(s))
    }
}

impl From<RelativePathBuf> for FilePath {
    fn from(p: RelativePathBuf) -> Self {
        Self(p)
    }
}

impl From<&RelativePath> for FilePath {
    fn from(p: &RelativePath) -> Self {
        Self(p.to_relative_path_buf())
    }
}

impl From<&Path> for FilePath {
    fn from(p: &Path) -> Self {
        Self(RelativePathBuf::from(p.to_string_lossy().into_owned()))
    }
}

impl std::fmt::Display for FilePath {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl AsRef<RelativePath> for FilePath {
    fn as_ref(&self) -> &RelativePath {
        &self.0
    }
}
