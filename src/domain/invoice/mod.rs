pub mod entities;
pub mod errors;
pub mod ports;
pub mod services;
pub mod value_objects;

#[cfg(test)]
pub(crate) mod testing;

pub use entities::{Invoice, InvoiceChanges, InvoiceDraft, NewInvoice};
pub use errors::{InvoiceError, PersistError};
pub use ports::{InvoiceRepository, PageCache};
pub use services::InvoiceService;
pub use value_objects::{Amount, CustomerId, InvoiceStatus, ValueObjectError};
