use chrono::NaiveDate;

/// Every calendar day from `first` through `last`, inclusive.
///
/// Empty when `last` precedes `first`.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DayRange {
    next: Option<NaiveDate>,
    last: NaiveDate,
}

impl DayRange {
    pub fn new(first: NaiveDate, last: NaiveDate) -> Self {
        DayRange {
            next: (first <= last).then_some(first),
            last,
        }
    }

    /// Days not yet yielded.
    pub fn remaining(&self) -> usize {
        self.next
            .map_or(0, |next| ((self.last - next).num_days() + 1) as usize)
    }
}

impl Iterator for DayRange {
    type Item = NaiveDate;

    fn next(&mut self) -> Option<NaiveDate> {
        let current = self.next?;
        self.next = current.succ_opt().filter(|day| *day <= self.last);
        Some(current)
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        let n = self.remaining();
        (n, Some(n))
    }
}

impl ExactSizeIterator for DayRange {}
