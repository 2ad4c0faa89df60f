mod errors;
mod finding;
mod record;

pub use errors::MalformedRecord;
pub use finding::{Finding, Rule};
pub use record::{FieldMap, RawRecord, Record};
