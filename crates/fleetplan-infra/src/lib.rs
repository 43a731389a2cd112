//! Infrastructure layer - workbook I/O and sheet/column detection

pub mod line_loader;
pub mod plan_files;
pub mod route_tables;
pub mod schema;
pub mod workbook;
pub mod xlsx_writer;

pub use workbook::Sheet;
