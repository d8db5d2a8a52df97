//! Chart rendering capability seam.
//!
//! Rendering the hours-distribution image is an external collaborator: a
//! pure function from buckets to an encoded image. The backend only carries
//! the seam plus a disabled default so API responses keep a stable shape.

/// Renders an hours-by-project distribution into a base64-encoded image, or
/// `None` when rendering is unavailable or the input is empty.
pub trait ChartRenderer: Send + Sync {
    fn render(&self, buckets: &[(String, f64)]) -> Option<String>;
}

/// Default renderer that produces no chart.
pub struct DisabledChart;

impl ChartRenderer for DisabledChart {
    fn render(&self, _buckets: &[(String, f64)]) -> Option<String> {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::{ChartRenderer, DisabledChart};

    #[test]
    fn disabled_renderer_yields_no_chart() {
        let buckets = vec![("GREENFIELD".to_string(), 3.5)];
        assert!(DisabledChart.render(&buckets).is_none());
    }
}
