use std::time::{Duration, Instant};

use log::{debug, info};

/// Logs how long a scope took when dropped.
pub struct PerfTimer {
    name: &'static str,
    start: Instant,
}

impl PerfTimer {
    #[inline]
    pub fn new(name: &'static str) -> Self {
        Self {
            name,
            start: Instant::now(),
        }
    }

    #[inline]
    pub fn elapsed(&self) -> Duration {
        self.start.elapsed()
    }
}

impl Drop for PerfTimer {
    fn drop(&mut self) {
        debug!("[PERF] {}: {}μs", self.name, self.elapsed().as_micros());
    }
}

/// Stage timings and counts for one render.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct RenderStats {
    pub scanline_time: Duration,
    pub raster_time: Duration,
    pub intersections: usize,
}

impl RenderStats {
    pub fn total(&self) -> Duration {
        self.scanline_time + self.raster_time
    }

    pub fn log_summary(&self) {
        info!(
            "scanlines {:.2?}, raster {:.2?}, total {:.2?} ({} intersections)",
            self.scanline_time,
            self.raster_time,
            self.total(),
            self.intersections
        );
    }
}

#[macro_export]
macro_rules! perf_scope {
    ($name:expr) => {
        let _timer = $crate::perf::PerfTimer::new($name);
    };
}
