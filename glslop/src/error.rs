use thiserror::Error;

/// glslop error type
#[derive(Debug, Error)]
pub enum Error {
    /// Type name not found in the type registry
    #[error("unknown type: {0}")]
    UnknownType(String),
    /// Section header that is not part of the script format
    #[error("line {line}: unrecognized section {section}")]
    UnknownSection {
        /// 1-based line number
        line: usize,
        /// Section header as written
        section: String,
    },
    /// Non-empty text before the first section header
    #[error("line {line}: extra text before first section: {text}")]
    TextBeforeSection {
        /// 1-based line number
        line: usize,
        /// Offending text
        text: String,
    },
    /// The script contains more than one `[snippet]` section
    #[error("line {line}: multiple [snippet] sections")]
    DuplicateSnippet {
        /// 1-based line number of the second section header
        line: usize,
    },
    /// A line could not be parsed in its section
    #[error("line {line}: parse error: {text}")]
    Syntax {
        /// 1-based line number
        line: usize,
        /// Offending line
        text: String,
    },
    /// A signature declares the same name twice
    #[error("line {line}: {name} is already declared in the signature")]
    DuplicateSignal {
        /// 1-based line number
        line: usize,
        /// Duplicated name
        name: String,
    },
    /// A test vector refers to a name that is not part of the signature
    #[error("line {line}: {name} is not declared in the signature")]
    UndeclaredSignal {
        /// 1-based line number
        line: usize,
        /// Unknown name
        name: String,
    },
    /// Unrecognized value for a named option
    #[error("unknown {kind}: {value}")]
    UnknownOption {
        /// Option being parsed
        kind: &'static str,
        /// Value as written
        value: String,
    },
    /// I/O error while reading a script
    #[error("i/o error: {0}")]
    Io(#[from] std::io::Error),
}

/// glslop Result
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a new [Syntax](#variant.Syntax) error
    ///
    /// # Parameters
    ///
    /// * `line`: 1-based line number
    /// * `text`: contents of the line that failed to parse
    pub fn syntax(line: usize, text: &str) -> Self {
        Error::Syntax {
            line,
            text: text.to_owned(),
        }
    }

    /// Create a new [UnknownOption](#variant.UnknownOption) error
    pub fn unknown_option(kind: &'static str, value: &str) -> Self {
        Error::UnknownOption {
            kind,
            value: value.to_owned(),
        }
    }
}
