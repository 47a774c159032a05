use crate::journal::Journal;

/// Checks a whole journal, balance assertions included, against an external accounting tool.
///
/// Implementations decide how the journal reaches the tool; the verdict is `Ok(true)` when the
/// tool accepts it.  Failing to reach the tool at all is an `Err`.
pub trait Validator {
    type Error;

    fn validate(&self, journal: &Journal) -> Result<bool, Self::Error>;
}

impl<V: Validator + ?Sized> Validator for &V {
    type Error = V::Error;

    fn validate(&self, journal: &Journal) -> Result<bool, Self::Error> {
        (**self).validate(journal)
    }
}
