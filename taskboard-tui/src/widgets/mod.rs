//! Reusable widget components.

pub mod detail;
pub mod field;
pub mod metric_card;

pub use detail::DetailPanel;
pub use field::FormFieldWidget;
pub use metric_card::MetricCard;
