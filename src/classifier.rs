/// Keywords that mark a directory as disposable. Matched as case-insensitive
/// substrings of the directory name.
pub const DEFAULT_KEYWORDS: &[&str] = &[
    "cache", "temp", "crash", "report", "dump", "crashes", "pending",
];

/// Decides whether a directory name looks like cache/temp/crash data.
#[derive(Debug, Clone)]
pub struct DirectoryClassifier {
    keywords: Vec<String>,
}

impl DirectoryClassifier {
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        Self {
            keywords: keywords
                .into_iter()
                .map(|k| k.as_ref().to_lowercase())
                .filter(|k| !k.is_empty())
                .collect(),
        }
    }

    pub fn keywords(&self) -> &[String] {
        &self.keywords
    }

    pub fn matches(&self, name: &str) -> bool {
        self.matched_keyword(name).is_some()
    }

    /// First keyword contained in `name`, if any.
    pub fn matched_keyword(&self, name: &str) -> Option<&str> {
        let name = name.to_lowercase();
        self.keywords
            .iter()
            .find(|k| name.contains(k.as_str()))
            .map(String::as_str)
    }
}

impl Default for DirectoryClassifier {
    fn default() -> Self {
        Self::new(DEFAULT_KEYWORDS)
    }
}
