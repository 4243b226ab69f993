use serde::Serialize;

/// Display parameters appended to the visualization URL on refresh
pub const DISPLAY_PARAMS: &str = ":showVizHome=no&:embed=true&:device=desktop";

/// Embedded third-party visualization
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EmbeddedFrame {
    src: String,
    /// Bumped every time the frame is recreated
    generation: u64,
}

impl EmbeddedFrame {
    pub fn new(src: impl Into<String>) -> Self {
        Self {
            src: src.into(),
            generation: 0,
        }
    }

    pub fn src(&self) -> &str {
        &self.src
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    /// A fresh frame pointing at the cache-busted URL. The old frame is
    /// discarded by the caller rather than reloaded in place.
    pub fn refreshed(&self, timestamp_ms: i64) -> Self {
        Self {
            src: refresh_url(&self.src, timestamp_ms),
            generation: self.generation + 1,
        }
    }
}

fn base_url(src: &str) -> &str {
    src.split_once('?').map_or(src, |(base, _)| base)
}

/// Build the refresh URL: base + display parameters + `refresh=<timestamp>`
pub fn refresh_url(src: &str, timestamp_ms: i64) -> String {
    format!("{}?{}&refresh={}", base_url(src), DISPLAY_PARAMS, timestamp_ms)
}

#[cfg(test)]
mod tests {
    use super::*;

    const VIZ: &str = "https://public.tableau.com/views/Sales/Overview";

    #[test]
    fn refresh_url_without_existing_query() {
        assert_eq!(
            refresh_url(VIZ, 1_760_000_000_000),
            "https://public.tableau.com/views/Sales/Overview?:showVizHome=no&:embed=true&:device=desktop&refresh=1760000000000"
        );
    }

    #[test]
    fn refresh_url_drops_existing_query() {
        let src = format!("{}?:embed=y&refresh=1", VIZ);
        assert_eq!(
            refresh_url(&src, 42),
            format!("{}?{}&refresh=42", VIZ, DISPLAY_PARAMS)
        );
    }

    #[test]
    fn repeated_refresh_keeps_single_query() {
        let frame = EmbeddedFrame::new(VIZ).refreshed(1).refreshed(2);
        assert_eq!(frame.src().matches('?').count(), 1);
        assert!(frame.src().ends_with("&refresh=2"));
        assert_eq!(base_url(frame.src()), VIZ);
        assert_eq!(frame.generation(), 2);
    }
}
