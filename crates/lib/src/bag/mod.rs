//! Live attribute bags over a host record's JSON field.
//!
//! An [`AttributeBag`] decodes one field of a [`HostRecord`](crate::HostRecord)
//! into an ordered map (the snapshot) and writes the snapshot back into the
//! field after every mutation. Bulk transformations run against a
//! [`Collection`] built from the snapshot, and whatever state the collection
//! is left in becomes the new snapshot.

mod attributes;
pub use attributes::{AttributeBag, JsonFormat};

mod collection;
pub use collection::Collection;

mod delegate;

mod errors;
pub use errors::BagError;
