pub mod fields;
pub mod footer;
pub mod header;
pub mod table;

pub use footer::{Footer, FooterTone, DEFAULT_FOOTER};
pub use header::Header;
pub use table::{CellTone, TableCell, TableModel};
