//! Aggregate → normalize → serialize
//!
//! Each stage takes an immutable sequence and returns a new one, so every
//! stage can be exercised on its own. Plans share the aggregated input and
//! are priced on the blocking pool in parallel.

use crate::aggregate::PriceAggregator;
use crate::config::Config;
use crate::error::Result;
use crate::holidays::HolidayCalendar;
use crate::levies::LevySchedule;
use crate::logging::get_logger;
use crate::normalize::{PriceNormalizer, PriceScale};
use crate::output::{RecordSink, Resolution, render_records};
use crate::tariff::{PlanId, TariffCalculator, TariffScheduleRegistry};
use crate::timezone::TimeZoneConverter;
use crate::types::{NormalizedRecord, PriceObservation};
use std::collections::BTreeMap;
use std::sync::Arc;
use tokio::task::JoinSet;

/// Records and rendered JSON of one plan at one resolution
#[derive(Debug, Clone)]
pub struct RenderedPlan {
    pub records: Vec<NormalizedRecord>,
    pub body: String,
}

/// Everything a run produced, keyed by plan and resolution
#[derive(Debug, Clone, Default)]
pub struct PipelineOutput {
    pub files: BTreeMap<(PlanId, Resolution), RenderedPlan>,
}

impl PipelineOutput {
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }

    pub fn get(&self, plan: PlanId, resolution: Resolution) -> Option<&RenderedPlan> {
        self.files.get(&(plan, resolution))
    }
}

/// Pricing pipeline over shared, read-only configuration
#[derive(Debug, Clone)]
pub struct Pipeline {
    aggregator: PriceAggregator,
    normalizer: PriceNormalizer,
    levies: Arc<LevySchedule>,
    scale: PriceScale,
}

impl Pipeline {
    pub fn new(
        converter: TimeZoneConverter,
        calendar: HolidayCalendar,
        registry: TariffScheduleRegistry,
        levies: LevySchedule,
        scale: PriceScale,
    ) -> Self {
        let calculator = TariffCalculator::new(Arc::new(registry));
        Self {
            aggregator: PriceAggregator::new(converter),
            normalizer: PriceNormalizer::new(converter, Arc::new(calendar), calculator),
            levies: Arc::new(levies),
            scale,
        }
    }

    /// Build the pipeline from validated configuration
    pub fn from_config(config: &Config) -> Result<Self> {
        config.validate()?;
        Ok(Self::new(
            config.converter()?,
            config.holiday_calendar(),
            config.tariff_registry()?,
            config.levy_schedule()?,
            config.pricing.scale(),
        ))
    }

    /// Stage 1: hourly averages of the observations
    pub fn aggregate(&self, observations: &[PriceObservation]) -> Result<Vec<PriceObservation>> {
        self.aggregator.aggregate_hourly(observations)
    }

    /// Stage 2: cost breakdown of each observation under `plan`
    pub fn normalize(
        &self,
        observations: &[PriceObservation],
        plan: PlanId,
    ) -> Result<Vec<NormalizedRecord>> {
        self.normalizer
            .normalize(observations, plan, &self.scale, &self.levies)
    }

    /// Stage 3: JSON rows of the records
    pub fn serialize(records: Vec<NormalizedRecord>) -> Result<RenderedPlan> {
        let body = render_records(&records)?;
        Ok(RenderedPlan { records, body })
    }

    /// Price one plan at every requested resolution
    pub fn run_plan(
        &self,
        quarter_hourly: &[PriceObservation],
        hourly: &[PriceObservation],
        plan: PlanId,
        resolutions: &[Resolution],
    ) -> Result<Vec<(Resolution, RenderedPlan)>> {
        resolutions
            .iter()
            .map(|&resolution| {
                let input = match resolution {
                    Resolution::QuarterHourly => quarter_hourly,
                    Resolution::Hourly => hourly,
                };
                let rendered = Self::serialize(self.normalize(input, plan)?)?;
                Ok((resolution, rendered))
            })
            .collect()
    }

    /// Run every plan in parallel. Empty input produces empty output.
    pub async fn run(
        &self,
        observations: Vec<PriceObservation>,
        plans: &[PlanId],
        resolutions: &[Resolution],
    ) -> Result<PipelineOutput> {
        let logger = get_logger("pipeline");
        if observations.is_empty() {
            logger.info("No price data available, nothing to normalize");
            return Ok(PipelineOutput::default());
        }

        let hourly = Arc::new(self.aggregate(&observations)?);
        let quarter_hourly = Arc::new(observations);
        logger.info(&format!(
            "Pricing {} observations ({} hours) for {} plans",
            quarter_hourly.len(),
            hourly.len(),
            plans.len()
        ));

        let mut tasks = JoinSet::new();
        for &plan in plans {
            let pipeline = self.clone();
            let quarter_hourly = Arc::clone(&quarter_hourly);
            let hourly = Arc::clone(&hourly);
            let resolutions = resolutions.to_vec();
            tasks.spawn_blocking(move || {
                pipeline
                    .run_plan(&quarter_hourly, &hourly, plan, &resolutions)
                    .map(|rendered| (plan, rendered))
            });
        }

        let mut output = PipelineOutput::default();
        while let Some(joined) = tasks.join_next().await {
            let (plan, rendered) = joined??;
            for (resolution, file) in rendered {
                output.files.insert((plan, resolution), file);
            }
        }
        Ok(output)
    }

    /// Hand every rendered file to `sink`; returns the number of files written
    pub async fn publish(output: &PipelineOutput, sink: &dyn RecordSink) -> Result<usize> {
        for ((plan, resolution), file) in &output.files {
            sink.write(&resolution.object_key(*plan), file.body.clone())
                .await?;
        }
        Ok(output.files.len())
    }
}
