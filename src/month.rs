use std::fmt::Display;

const NAMES: [&str; 12] = [
    "January",
    "February",
    "March",
    "April",
    "May",
    "June",
    "July",
    "August",
    "September",
    "October",
    "November",
    "December",
];

/// A calendar month, ordered January to December.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Month(u8);

impl Month {
    /// Returns the month with the given number, where 1 is January.
    ///
    /// # Examples
    ///
    /// ```
    /// # use monthly_sales::Month;
    /// assert_eq!(Month::from_number(3).unwrap().name(), "March");
    /// assert_eq!(Month::from_number(13), None);
    /// ```
    #[must_use]
    pub fn from_number(number: u8) -> Option<Self> {
        (1..=12).contains(&number).then_some(Self(number))
    }

    #[must_use]
    pub fn number(self) -> u8 {
        self.0
    }

    #[must_use]
    pub fn name(self) -> &'static str {
        NAMES[usize::from(self.0 - 1)]
    }
}

impl Display for Month {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}
