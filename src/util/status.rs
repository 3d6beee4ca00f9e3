use std::fmt;

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Code {
    Ok,
    Corruption,
    InvalidArgument,
    OutOfOrder,
}

#[derive(Debug, Clone)]
pub struct Status {
    code: Code,
    message: Option<String>,
}

impl Status {
    pub fn ok() -> Self {
        Status {
            code: Code::Ok,
            message: None,
        }
    }

    pub fn corruption(msg: impl Into<String>) -> Self {
        Status {
            code: Code::Corruption,
            message: Some(msg.into()),
        }
    }

    pub fn invalid_argument(msg: impl Into<String>) -> Self {
        Status {
            code: Code::InvalidArgument,
            message: Some(msg.into()),
        }
    }

    /// A key arrived that does not sort strictly after its predecessor.
    pub fn out_of_order(msg: impl Into<String>) -> Self {
        Status {
            code: Code::OutOfOrder,
            message: Some(msg.into()),
        }
    }

    pub fn is_ok(&self) -> bool {
        self.code == Code::Ok
    }

    pub fn is_corruption(&self) -> bool {
        self.code == Code::Corruption
    }

    pub fn is_invalid_argument(&self) -> bool {
        self.code == Code::InvalidArgument
    }

    pub fn is_out_of_order(&self) -> bool {
        self.code == Code::OutOfOrder
    }

    pub fn code(&self) -> &Code {
        &self.code
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.message {
            Some(msg) => write!(f, "{:?}: {}", self.code, msg),
            None => write!(f, "{:?}", self.code),
        }
    }
}

impl std::error::Error for Status {}

impl From<serde_json::Error> for Status {
    fn from(err: serde_json::Error) -> Self {
        Status::corruption(err.to_string())
    }
}

pub type Result<T> = std::result::Result<T, Status>;
