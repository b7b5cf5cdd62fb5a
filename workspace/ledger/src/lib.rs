pub mod aggregate;
pub mod dates;
pub mod error;
pub mod export;

pub use aggregate::{
    aggregate_day, aggregate_range, DailyBreakdown, DayTotals, DriverTotals, RangeReport,
    RecordedDay,
};
pub use dates::{month_span, DateSpan};
pub use error::{LedgerError, Result};
pub use export::{delimited_table, export_filename};
