//! Data types shared by vendor sessions, operations and the tool layer:
//! - `vendor` - Vendor identifiers (VendorId)
//! - `fields` - Caller field selection with mandatory-field handling (FieldSelection)
//! - `query` - A single vendor API request (QueryRequest)
//! - `table` - Tabular vendor results (Table)

mod fields;
mod query;
mod table;
mod vendor;

pub use fields::FieldSelection;
pub use query::QueryRequest;
pub use table::Table;
pub use vendor::VendorId;
