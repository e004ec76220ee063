use crate::model::MetricSnapshot;
use std::fmt::Write;

/// Prometheus text exposition, one HELP/TYPE/sample triple per metric.
/// Names ending in `_total` are counters, everything else is a gauge.
pub fn text(snapshot: &MetricSnapshot, namespace: &str) -> String {
    let mut out = String::new();
    for (name, value) in snapshot {
        let full = if namespace.is_empty() {
            name.clone()
        } else {
            format!("{}_{}", namespace, name)
        };
        let kind = if name.ends_with("_total") {
            "counter"
        } else {
            "gauge"
        };
        let _ = writeln!(out, "# HELP {} Memory information field {}.", full, name);
        let _ = writeln!(out, "# TYPE {} {}", full, kind);
        let _ = writeln!(out, "{} {}", full, value);
    }
    out
}

pub fn json(snapshot: &MetricSnapshot) -> serde_json::Result<String> {
    serde_json::to_string(snapshot)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample() -> MetricSnapshot {
        MetricSnapshot::from([
            ("free_bytes".to_string(), 409600.0),
            ("swapped_in_pages_total".to_string(), 28672.0),
            ("total_bytes".to_string(), 17179869184.0),
        ])
    }

    #[test]
    fn test_text_types_follow_suffix() {
        let out = text(&sample(), "node_memory");
        assert!(out.contains("# TYPE node_memory_free_bytes gauge\n"));
        assert!(out.contains("# TYPE node_memory_swapped_in_pages_total counter\n"));
        assert!(out.contains("node_memory_total_bytes 17179869184\n"));
        assert!(out.contains(
            "# HELP node_memory_free_bytes Memory information field free_bytes.\n"
        ));
    }

    #[test]
    fn test_text_without_namespace() {
        let out = text(&sample(), "");
        assert!(out.contains("\nfree_bytes 409600\n"));
        assert_eq!(out.lines().count(), 9);
    }

    #[test]
    fn test_json_is_a_flat_object() {
        let out = json(&sample()).unwrap();
        let back: MetricSnapshot = serde_json::from_str(&out).unwrap();
        assert_eq!(back, sample());
    }
}
