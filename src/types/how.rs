//! Array storage variants

/// How an array is represented in the input file
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum How {
    Internal,
    Constant,
    External,
}

impl How {
    /// Control-line keyword
    pub fn keyword(self) -> &'static str {
        match self {
            How::Internal => "INTERNAL",
            How::Constant => "CONSTANT",
            How::External => "OPEN/CLOSE",
        }
    }

    /// Case-insensitive lookup of a control-line keyword
    pub fn from_keyword(token: &str) -> Option<Self> {
        [How::Internal, How::Constant, How::External]
            .into_iter()
            .find(|how| token.eq_ignore_ascii_case(how.keyword()))
    }
}

/// A query answer that is per-layer for layered arrays
#[derive(Debug, Clone, PartialEq)]
pub enum PerLayer<T> {
    Single(T),
    Layered(Vec<T>),
}

impl<T> PerLayer<T> {
    pub fn single(&self) -> Option<&T> {
        match self {
            PerLayer::Single(v) => Some(v),
            PerLayer::Layered(_) => None,
        }
    }

    pub fn layers(&self) -> Option<&[T]> {
        match self {
            PerLayer::Single(_) => None,
            PerLayer::Layered(v) => Some(v),
        }
    }
}
