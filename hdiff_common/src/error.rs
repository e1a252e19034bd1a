use thiserror::Error;

#[derive(Error, Debug)]
pub enum HdiffError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("File too big")]
    FileTooBig,

    #[error("File has size 0")]
    ZeroSize,

    #[error("This is a binary file")]
    IsBinary,

    #[error("Invalid configuration: {0}")]
    Config(String),
}

pub type Result<T> = std::result::Result<T, HdiffError>;

impl HdiffError {
    /// Message form used when a load failure is reported next to a file
    /// name instead of being propagated.
    pub fn report_message(&self) -> String {
        self.to_string()
    }
}
