pub mod dataset;
pub mod domain;
pub mod report;

pub use dataset::{write_table_csv, DatasetError, VisitDataset};
pub use domain::{Acuity, Dimension, Disposition, VisitRecord, Zone};
pub use report::{build_report, DashboardReport, ReportQuery};
