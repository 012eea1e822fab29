//! Per-frame renderer statistics.

/// Counters of the work submitted during one frame.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct FrameStats {
    /// Number of draw calls.
    pub calls: u64,
    /// Number of triangles drawn, instances included.
    pub triangles: u64,
    /// Number of line segments drawn.
    pub lines: u64,
    /// Number of points drawn.
    pub points: u64,
    /// Index of the frame these statistics belong to.
    pub frame: u64,
}

/// One indexed triangle draw: `index_count` indices over `instances` instances.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct IndexedDraw {
    pub index_count: u32,
    pub instances: u32,
}

impl IndexedDraw {
    /// A draw of a single instance.
    #[inline]
    pub fn single(index_count: u32) -> Self {
        IndexedDraw {
            index_count,
            instances: 1,
        }
    }
}

/// Accumulates [`FrameStats`] while a frame is being recorded.
///
/// The counters of the frame in progress are reset by
/// [`begin_frame`](Self::begin_frame). The last completed frame stays
/// available through [`last_frame`](Self::last_frame), which is what the
/// debug overlay displays.
#[derive(Clone, Debug, Default)]
pub struct RenderStats {
    current: FrameStats,
    last: FrameStats,
    frame: u64,
}

impl RenderStats {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts recording a new frame.
    pub fn begin_frame(&mut self) {
        self.frame += 1;
        self.current = FrameStats {
            frame: self.frame,
            ..FrameStats::default()
        };
    }

    /// Ends the frame in progress, making it the last completed frame.
    pub fn end_frame(&mut self) {
        self.last = self.current;
    }

    /// Records one indexed triangle draw covering `instances` instances.
    pub fn record_triangles(&mut self, index_count: u32, instances: u32) {
        self.current.calls += 1;
        self.current.triangles += (index_count / 3) as u64 * instances as u64;
    }

    /// Records `draw`.
    #[inline]
    pub fn record_draw(&mut self, draw: IndexedDraw) {
        self.record_triangles(draw.index_count, draw.instances);
    }

    /// Records one line-list draw of `segments` segments.
    pub fn record_lines(&mut self, segments: u32) {
        self.current.calls += 1;
        self.current.lines += segments as u64;
    }

    /// Records one point-list draw of `points` points.
    pub fn record_points(&mut self, points: u32) {
        self.current.calls += 1;
        self.current.points += points as u64;
    }

    /// Statistics of the frame in progress.
    #[inline]
    pub fn current(&self) -> &FrameStats {
        &self.current
    }

    /// Statistics of the last completed frame.
    #[inline]
    pub fn last_frame(&self) -> &FrameStats {
        &self.last
    }

    /// Number of frames started so far.
    #[inline]
    pub fn frame(&self) -> u64 {
        self.frame
    }
}
