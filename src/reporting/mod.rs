pub mod exporter;
pub mod formatter;
pub mod progress;

pub use exporter::{JsonFileExporter, ResultSink};
pub use formatter::format_campaign_summary;
pub use progress::CampaignProgress;
