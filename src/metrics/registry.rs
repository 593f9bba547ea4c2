// Prometheus registry holding every container metric, built once from the label universe

use prometheus::{CounterVec, Encoder, GaugeVec, Opts, Registry, TEXT_FORMAT, TextEncoder};
use std::collections::HashMap;
use tokio::sync::RwLock;

use super::definitions::{LabelScope, MetricId, MetricKind, MetricUpdate, UpdateOp};
use crate::labels::{LabelSet, LabelUniverse};

enum Series {
    Counter(CounterVec),
    Gauge(GaugeVec),
}

struct Registered {
    series: Series,
    label_names: Vec<String>,
}

/// Owns the counter/gauge state served to scrapers.
///
/// Label schemas are fixed at [`MetricRegistry::bootstrap`]. A collection cycle commits all of
/// its updates under one write guard and renders take the read guard, so a scrape always sees the
/// state of the last completed cycle.
pub struct MetricRegistry {
    registry: Registry,
    universe: LabelUniverse,
    metrics: HashMap<MetricId, Registered>,
    commit: RwLock<()>,
}

impl MetricRegistry {
    /// Build and register every metric against `universe`. Optionally registers the process
    /// collector (CPU, memory, fds of this exporter).
    pub fn bootstrap(
        universe: LabelUniverse,
        collect_default_metrics: bool,
    ) -> Result<Self, prometheus::Error> {
        let registry = Registry::new();
        let container_labels = universe.container_label_names();
        let network_labels = universe.network_label_names();

        let mut metrics = HashMap::with_capacity(MetricId::ALL.len());
        for id in MetricId::ALL {
            let label_names = match id.scope() {
                LabelScope::Container => container_labels.clone(),
                LabelScope::Network => network_labels.clone(),
            };
            let names: Vec<&str> = label_names.iter().map(String::as_str).collect();
            let opts = Opts::new(id.name(), id.help());
            let series = match id.kind() {
                MetricKind::Counter => {
                    let vec = CounterVec::new(opts, &names)?;
                    registry.register(Box::new(vec.clone()))?;
                    Series::Counter(vec)
                }
                MetricKind::Gauge => {
                    let vec = GaugeVec::new(opts, &names)?;
                    registry.register(Box::new(vec.clone()))?;
                    Series::Gauge(vec)
                }
            };
            metrics.insert(
                id,
                Registered {
                    series,
                    label_names,
                },
            );
        }

        if collect_default_metrics {
            register_process_collector(&registry)?;
        }

        tracing::info!(
            metrics = metrics.len(),
            labels = universe.len(),
            "Registered Prometheus metrics"
        );

        Ok(Self {
            registry,
            universe,
            metrics,
            commit: RwLock::new(()),
        })
    }

    pub fn universe(&self) -> &LabelUniverse {
        &self.universe
    }

    /// Label schema of a registered metric.
    pub fn label_names(&self, id: MetricId) -> &[String] {
        self.metrics
            .get(&id)
            .map(|m| m.label_names.as_slice())
            .unwrap_or_default()
    }

    /// Apply one cycle's updates atomically with respect to [`MetricRegistry::render`].
    pub async fn apply(&self, updates: &[MetricUpdate]) {
        if updates.is_empty() {
            return;
        }
        let _guard = self.commit.write().await;
        for update in updates {
            if let Err(e) = self.apply_one(update) {
                tracing::warn!(
                    error = %e,
                    metric = update.metric.name(),
                    operation = "apply_update",
                    "Metric update rejected"
                );
            }
        }
    }

    fn apply_one(&self, update: &MetricUpdate) -> Result<(), prometheus::Error> {
        let Some(registered) = self.metrics.get(&update.metric) else {
            return Ok(());
        };
        let values = label_values(&registered.label_names, &update.labels);
        match (&registered.series, update.op) {
            (Series::Counter(vec), UpdateOp::Increment(v)) => {
                vec.get_metric_with_label_values(&values)?.inc_by(v.max(0.0));
            }
            (Series::Gauge(vec), UpdateOp::Set(v)) => {
                vec.get_metric_with_label_values(&values)?.set(v);
            }
            (Series::Gauge(vec), UpdateOp::Increment(v)) => {
                vec.get_metric_with_label_values(&values)?.add(v);
            }
            (Series::Counter(_), UpdateOp::Set(_)) => {
                return Err(prometheus::Error::Msg(format!(
                    "cannot set counter {}",
                    update.metric.name()
                )));
            }
        }
        Ok(())
    }

    /// Current state in the Prometheus text exposition format.
    pub async fn render(&self) -> Result<String, prometheus::Error> {
        let families = {
            let _guard = self.commit.read().await;
            self.registry.gather()
        };
        let mut buffer = Vec::new();
        TextEncoder::new().encode(&families, &mut buffer)?;
        String::from_utf8(buffer).map_err(|e| prometheus::Error::Msg(e.to_string()))
    }

    pub fn content_type(&self) -> &'static str {
        TEXT_FORMAT
    }
}

/// Values in schema order; labels the container does not carry render as empty.
fn label_values<'a>(names: &[String], labels: &'a LabelSet) -> Vec<&'a str> {
    names
        .iter()
        .map(|n| labels.get(n).map(String::as_str).unwrap_or(""))
        .collect()
}

#[cfg(target_os = "linux")]
fn register_process_collector(registry: &Registry) -> Result<(), prometheus::Error> {
    let collector = prometheus::process_collector::ProcessCollector::for_self();
    registry.register(Box::new(collector))
}

#[cfg(not(target_os = "linux"))]
fn register_process_collector(_registry: &Registry) -> Result<(), prometheus::Error> {
    tracing::warn!("Process metrics are only available on Linux; skipping");
    Ok(())
}
