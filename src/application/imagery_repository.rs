// Repository trait for remote imagery reductions
use crate::domain::location::{DateRange, Location};
use crate::domain::vegetation::ReducedFeature;
use async_trait::async_trait;

#[async_trait]
pub trait ImageryRepository: Send + Sync {
    /// Reduce every image of the collection in `range` to the mean band value at `location`.
    /// The reduction runs remotely as a single request; only the reduced rows come back,
    /// in the order the platform returns them.
    async fn reduce_time_series(
        &self,
        location: &Location,
        range: &DateRange,
    ) -> anyhow::Result<Vec<ReducedFeature>>;
}
