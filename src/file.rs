//! Source files targeted by a settings tree.
//!
//! A `SourceFile` is owned by whoever is editing it (usually behind an `Rc`);
//! settings nodes only keep a `Weak` back-reference. Closing the file through
//! [`SourceFile::invalidate`] unbinds every node even while other strong
//! references are still alive.

use std::cell::Cell;
use std::path::{Path, PathBuf};
use std::rc::{Rc, Weak};

/// Extension → language id table used when no language is given explicitly
const LANGUAGE_EXTENSIONS: &[(&str, &str)] = &[
    ("c", "c"),
    ("h", "chdr"),
    ("cc", "cpp"),
    ("cpp", "cpp"),
    ("cxx", "cpp"),
    ("hpp", "cpp"),
    ("cs", "c-sharp"),
    ("css", "css"),
    ("go", "go"),
    ("html", "html"),
    ("java", "java"),
    ("js", "js"),
    ("json", "json"),
    ("md", "markdown"),
    ("py", "python3"),
    ("rb", "ruby"),
    ("rs", "rust"),
    ("sh", "sh"),
    ("toml", "toml"),
    ("ts", "typescript"),
    ("vala", "vala"),
    ("xml", "xml"),
    ("yaml", "yaml"),
    ("yml", "yaml"),
];

/// File names that carry their language without an extension
const LANGUAGE_FILE_NAMES: &[(&str, &str)] = &[
    ("Makefile", "makefile"),
    ("GNUmakefile", "makefile"),
    ("meson.build", "meson"),
    ("CMakeLists.txt", "cmake"),
];

/// A file being edited
#[derive(Debug)]
pub struct SourceFile {
    path: PathBuf,
    language: Option<String>,
    valid: Cell<bool>,
}

impl SourceFile {
    /// Create a file, detecting its language from the file name
    pub fn new(path: impl Into<PathBuf>) -> Rc<Self> {
        let path = normalize(path.into());
        let language = detect_language(&path);
        Rc::new(Self {
            path,
            language,
            valid: Cell::new(true),
        })
    }

    /// Create a file with an explicit language id (or none)
    pub fn with_language(path: impl Into<PathBuf>, language: Option<&str>) -> Rc<Self> {
        Rc::new(Self {
            path: normalize(path.into()),
            language: language.map(|l| l.to_ascii_lowercase()),
            valid: Cell::new(true),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Language identifier, if one could be determined
    pub fn language(&self) -> Option<&str> {
        self.language.as_deref()
    }

    /// Mark the file as closed. Settings nodes bound to it become unbound.
    pub fn invalidate(&self) {
        self.valid.set(false);
    }

    pub fn is_valid(&self) -> bool {
        self.valid.get()
    }
}

/// Non-owning reference from a settings node to its file
#[derive(Debug, Clone)]
pub(crate) struct FileRef(Weak<SourceFile>);

impl FileRef {
    pub(crate) fn new(file: &Rc<SourceFile>) -> Self {
        Self(Rc::downgrade(file))
    }

    /// The file, unless it was dropped or invalidated
    pub(crate) fn upgrade(&self) -> Option<Rc<SourceFile>> {
        self.0.upgrade().filter(|file| file.is_valid())
    }

    pub(crate) fn points_to(&self, file: &Rc<SourceFile>) -> bool {
        std::ptr::eq(self.0.as_ptr(), Rc::as_ptr(file))
    }
}

/// Detect a language id from a file name
pub fn detect_language(path: &Path) -> Option<String> {
    let file_name = path.file_name()?.to_str()?;
    if let Some((_, lang)) = LANGUAGE_FILE_NAMES.iter().find(|(name, _)| *name == file_name) {
        return Some(lang.to_string());
    }
    let ext = path.extension()?.to_str()?.to_ascii_lowercase();
    LANGUAGE_EXTENSIONS
        .iter()
        .find(|(e, _)| *e == ext)
        .map(|(_, lang)| lang.to_string())
}

fn normalize(path: PathBuf) -> PathBuf {
    // Files that do not exist yet (unsaved buffers) keep the path as given.
    dunce::canonicalize(&path).unwrap_or(path)
}
