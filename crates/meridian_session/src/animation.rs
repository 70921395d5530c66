use std::time::Duration;

use futures::{Stream, stream};
use meridian_routing::coordinate::Coordinate;

pub const DEFAULT_ANIMATION_DURATION: Duration = Duration::from_secs(5);

/// Paces a marker along a path so that a full run lasts `total_duration`.
#[derive(Debug, Copy, Clone)]
pub struct AnimationScheduler {
    total_duration: Duration,
}

impl Default for AnimationScheduler {
    fn default() -> Self {
        Self::new(DEFAULT_ANIMATION_DURATION)
    }
}

impl AnimationScheduler {
    pub fn new(total_duration: Duration) -> Self {
        Self { total_duration }
    }

    pub fn total_duration(&self) -> Duration {
        self.total_duration
    }

    pub fn step_duration(&self, points: usize) -> Duration {
        if points == 0 {
            return Duration::ZERO;
        }

        self.total_duration / u32::try_from(points).unwrap_or(u32::MAX)
    }

    /// Yields every point of `path` in order. A point is emitted as soon as it is polled
    /// for, the stream then waits one step before the next one, the last point included.
    ///
    /// Dropping the stream stops the playback.
    pub fn play(&self, path: Vec<Coordinate>) -> impl Stream<Item = Coordinate> + Send + 'static {
        let step = self.step_duration(path.len());

        stream::unfold(
            (path.into_iter(), false),
            move |(mut points, started)| async move {
                if started {
                    tokio::time::sleep(step).await;
                }

                let point = points.next()?;
                Some((point, (points, true)))
            },
        )
    }
}
