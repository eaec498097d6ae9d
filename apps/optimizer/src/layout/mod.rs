// Page layout for the exported PDF: font measurement, line wrapping, pagination.
// Pure functions only; the renderer in `export` turns a PageLayout into bytes.

pub mod font_metrics;
pub mod paginate;

pub use font_metrics::{default_page_config, FontMetricTable, PageConfig, HELVETICA};
pub use paginate::{layout_text, PageLayout};
