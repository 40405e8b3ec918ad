pub mod aggregation;
pub mod catalog;
pub mod etl;
pub mod pipeline;
pub mod range;
pub mod ranking;
pub mod report;
pub mod roster;
pub mod table;

pub use crate::domain::model::{Cell, CategoryReport, LoadSummary, OwnedItemRecord, Table};
pub use crate::domain::ports::{Pipeline, RecordSource, ReportPublisher, Storage};
pub use crate::utils::error::Result;
