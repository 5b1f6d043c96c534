pub mod dataset;
pub mod metrics;
pub mod parsing;

pub use self::dataset::*;
pub use self::metrics::*;
pub use self::parsing::*;
