//! Type markers for [`Id`](super::Id) so a ticket id cannot be
//! passed where a user id is expected.

mod private {
    pub trait Sealed {}
}

pub trait Marker: private::Sealed + Copy + Send + Sync + 'static {}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct TicketMarker;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct UserMarker;

#[cfg(test)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct AnyMarker;

impl private::Sealed for TicketMarker {}
impl private::Sealed for UserMarker {}
#[cfg(test)]
impl private::Sealed for AnyMarker {}

impl Marker for TicketMarker {}
impl Marker for UserMarker {}
#[cfg(test)]
impl Marker for AnyMarker {}
