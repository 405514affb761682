use std::fmt;
use std::fmt::{Display, Formatter};

/// A calendar month, used to label monthly aggregate rows.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Ord, PartialOrd, Hash)]
pub struct Month(pub i32, pub u32);

impl Month {
    pub fn year(self) -> i32 {
        self.0
    }
    pub fn month(self) -> u32 {
        self.1
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut Formatter<'_>) -> fmt::Result {
        write!(f, "{:04}-{:02}", self.0, self.1)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn displays_zero_padded() {
        assert_eq!(Month(2010, 3).to_string(), "2010-03");
    }

    #[test]
    fn orders_by_year_then_month() {
        assert!(Month(2010, 12) < Month(2011, 1));
    }
}
