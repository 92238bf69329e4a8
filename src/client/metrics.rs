use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fs::File;
use std::io::Write;
use std::path::Path;
use std::time::{Duration, Instant};

use crate::error::Result;

/// One action round trip as seen by the client.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ActionMetric {
    pub action: String,
    pub started_at: String, // RFC 3339, local time
    pub latency_ms: u64,
    pub success: bool,
    pub failure_reason: Option<String>,
}

#[derive(Debug, Default, Serialize, Deserialize)]
pub struct ActionStats {
    pub total_actions: usize,
    pub failed_actions: usize,

    // Latency of successful actions (milliseconds)
    pub latency_min_ms: u64,
    pub latency_max_ms: u64,
    pub latency_p50_ms: u64,
    pub latency_p95_ms: u64,

    pub calls_per_action: HashMap<String, usize>,
    pub failure_reasons: HashMap<String, usize>,
}

#[derive(Debug)]
pub struct ActionMetrics {
    session_name: String,
    start_time: Instant,
    actions: Vec<ActionMetric>,
}

impl ActionMetrics {
    pub fn new(session_name: String) -> Self {
        Self {
            session_name,
            start_time: Instant::now(),
            actions: Vec::new(),
        }
    }

    pub fn record_action(&mut self, action: &str, latency: Duration, failure_reason: Option<String>) {
        self.actions.push(ActionMetric {
            action: action.to_string(),
            started_at: (chrono::Local::now()
                - chrono::Duration::milliseconds(latency.as_millis() as i64))
            .to_rfc3339(),
            latency_ms: latency.as_millis() as u64,
            success: failure_reason.is_none(),
            failure_reason,
        });
    }

    pub fn actions(&self) -> &[ActionMetric] {
        &self.actions
    }

    pub fn aggregate(&self) -> ActionStats {
        let mut stats = ActionStats {
            total_actions: self.actions.len(),
            failed_actions: self.actions.iter().filter(|a| !a.success).count(),
            ..Default::default()
        };

        let mut latencies: Vec<u64> = self
            .actions
            .iter()
            .filter(|a| a.success)
            .map(|a| a.latency_ms)
            .collect();
        latencies.sort_unstable();

        if let (Some(min), Some(max)) = (latencies.first(), latencies.last()) {
            stats.latency_min_ms = *min;
            stats.latency_max_ms = *max;
            stats.latency_p50_ms = percentile(&latencies, 50.0);
            stats.latency_p95_ms = percentile(&latencies, 95.0);
        }

        for metric in &self.actions {
            *stats
                .calls_per_action
                .entry(metric.action.clone())
                .or_insert(0) += 1;
            if let Some(reason) = &metric.failure_reason {
                *stats.failure_reasons.entry(reason.clone()).or_insert(0) += 1;
            }
        }

        stats
    }

    pub fn export_to_json<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let output = serde_json::json!({
            "session_name": self.session_name,
            "session_duration_secs": self.start_time.elapsed().as_secs(),
            "stats": self.aggregate(),
            "actions": self.actions,
        });

        let mut file = File::create(path)?;
        file.write_all(serde_json::to_string_pretty(&output)?.as_bytes())?;

        Ok(())
    }
}

fn percentile(sorted_data: &[u64], percentile: f64) -> u64 {
    if sorted_data.is_empty() {
        return 0;
    }

    let index = (percentile / 100.0 * (sorted_data.len() - 1) as f64).round() as usize;
    sorted_data[index.min(sorted_data.len() - 1)]
}
