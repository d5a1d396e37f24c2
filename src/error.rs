/// The pointer position.
#[derive(Copy, Clone, Default, Debug, PartialEq, Eq)]
#[non_exhaustive]
pub struct Mark {
    /// The position index.
    pub index: u64,
    /// The position line.
    pub line: u64,
    /// The position column.
    pub column: u64,
}

impl std::fmt::Display for Mark {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "line {} column {}", self.line, self.column)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum EmitterError {
    #[error("{0}")]
    Problem(&'static str),
    #[error("cannot emit an alias in JSON mode without resolving the document first")]
    AliasInJsonMode,
    #[error(transparent)]
    Writer(#[from] WriterError),
}

#[derive(Debug, thiserror::Error)]
pub enum WriterError {
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ReaderError {
    #[error("{problem}")]
    Problem {
        problem: &'static str,
        offset: usize,
        value: i32,
    },
    #[error("input stream produced an invalid byte order marker")]
    InvalidBom,
    #[error("a NUL byte is not allowed in the input stream")]
    NulInStream { offset: usize },
    #[error("invalid UTF-8 byte at offset: {value:x}")]
    InvalidUtf8 { value: u8 },
    #[error("invalid UTF-16 unpaired surrogate: {value:x}")]
    InvalidUtf16 { value: u16 },
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

#[derive(Debug, thiserror::Error)]
pub enum ScannerError {
    #[error("{}:{}: {} {} ({}:{})", problem_mark.line, problem_mark.column, problem, context, context_mark.line, context_mark.column)]
    Problem {
        context: &'static str,
        context_mark: Mark,
        problem: &'static str,
        problem_mark: Mark,
    },
    #[error(transparent)]
    Reader(#[from] ReaderError),
}

#[derive(Debug, thiserror::Error)]
pub enum ParserError {
    #[error("no more tokens")]
    UnexpectedEof,
    #[error("{}:{}: {}", mark.line, mark.column, problem)]
    Problem { problem: &'static str, mark: Mark },
    #[error("{}:{}: {} {} ({}:{})", mark.line, mark.column, problem, context, context_mark.line, context_mark.column)]
    ProblemWithContext {
        context: &'static str,
        context_mark: Mark,
        problem: &'static str,
        mark: Mark,
    },
    #[error(transparent)]
    Scanner(#[from] ScannerError),
}

/// Errors raised while building a [`crate::Document`] from an event stream.
#[derive(Debug, thiserror::Error)]
pub enum ComposerError {
    #[error("{}:{}: {}", mark.line, mark.column, problem)]
    Problem { problem: &'static str, mark: Mark },
    #[error("{}:{}: {} {} ({}:{})", mark.line, mark.column, problem, context, context_mark.line, context_mark.column)]
    ProblemWithContext {
        context: &'static str,
        context_mark: Mark,
        problem: &'static str,
        mark: Mark,
    },
    #[error("{}:{}: found undefined alias", mark.line, mark.column)]
    UndefinedAlias { mark: Mark },
    #[error("{}:{}: found alias to anchor '{anchor}' that has not finished loading (cyclic reference)", mark.line, mark.column)]
    RecursiveAlias { anchor: String, mark: Mark },
    #[error("{}:{}: value of a merge key must be a mapping or a sequence of mappings", mark.line, mark.column)]
    BadMergeValue { mark: Mark },
    #[error("{}:{}: duplicate key in mapping (first seen at {}:{})", mark.line, mark.column, first_mark.line, first_mark.column)]
    DuplicateKey { first_mark: Mark, mark: Mark },
    #[error(transparent)]
    Parser(#[from] ParserError),
}

/// Errors raised while resolving a YAML path, JSON Pointer, or relative
/// JSON Pointer against a [`crate::Document`].
#[derive(Debug, thiserror::Error)]
pub enum PathError {
    #[error("no node at the given path")]
    NotFound,
    #[error("invalid pointer syntax: {problem}")]
    InvalidPointer { problem: &'static str },
    #[error("invalid sequence index in path segment: '{segment}'")]
    InvalidIndex { segment: String },
}
