mod company;
mod dashboard;
mod descriptor;
mod price;

pub use company::{CompanyRecord, COLUMN_NAMES};
pub use dashboard::{ChartPoint, ChartSeries, CompanyTableView, DashboardView, SymbolPanel};
pub use descriptor::{DescriptorEntry, DescriptorSet};
pub use price::PricePoint;
