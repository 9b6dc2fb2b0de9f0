use crate::OpPtr;
use std::fmt::Display;

impl Display for OpPtr {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl OpPtr {
    pub(crate) fn new(index: usize) -> Self {
        Self(index)
    }

    pub(crate) fn index(&self) -> usize {
        self.0
    }
}

impl From<usize> for OpPtr {
    fn from(us: usize) -> Self {
        OpPtr(us)
    }
}
