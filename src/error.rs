use thiserror::Error;

#[derive(Error, Debug)]
pub enum SavError {
    #[error("not a valid SPSS system file: expected \"$FL2\" or \"$FL3\", found {found:?}")]
    NotValidFile { found: [u8; 4] },

    #[error("unexpected end of stream")]
    UnexpectedEof,

    #[error("I/O error: {0}")]
    Io(std::io::Error),

    #[error("malformed record: {0}")]
    Malformed(String),
}

impl From<std::io::Error> for SavError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            SavError::UnexpectedEof
        } else {
            SavError::Io(err)
        }
    }
}

pub type Result<T> = std::result::Result<T, SavError>;
