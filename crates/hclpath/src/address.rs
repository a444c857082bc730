//! dotted attribute addresses
//!
//! An address such as `resource.aws_instance.foo.ami` is split on `.` into segments. The last segment always names
//! an attribute, everything before it is a block address (see [crate::resolve]).
//!
//! There is no escaping and no syntax to tell a label apart from a nested block type. Segments are not validated,
//! `a..b` yields an empty middle segment which simply won't match anything later on.

#[derive(thiserror::Error, Debug, Clone, Copy, PartialEq, Eq)]
#[error("failed to parse address. address is empty")]
pub struct EmptyAddressError;

/// A parsed address, borrowing its segments from the input
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Address<'a> {
    segments: Vec<&'a str>,
}

impl<'a> Address<'a> {
    pub fn parse(address: &'a str) -> Result<Self, EmptyAddressError> {
        if address.is_empty() {
            return Err(EmptyAddressError);
        }

        Ok(Self {
            segments: address.split('.').collect(),
        })
    }

    pub fn segments(&self) -> &[&'a str] {
        &self.segments
    }

    /// Splits into the attribute name and the (possibly empty) block address in front of it
    pub fn split_attribute(&self) -> (&'a str, &[&'a str]) {
        match self.segments.split_last() {
            Some((attribute, block_address)) => (*attribute, block_address),
            // parse never produces an address without segments
            None => ("", &[]),
        }
    }
}
