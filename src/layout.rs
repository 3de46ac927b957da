//! Geometry of a sticky header and its content.
//!
//! This module is independent from the view tree: children are measured
//! through closures, so the arithmetic can be checked without any backend.
//!
//! The composite is always sized from its content. The header is either
//! stacked above the content, drawn over it (`overlap_headers`), or placed
//! beside it (side mode, when both `overlap_headers` and
//! `offset_from_headers` are set).
use cursive_core::{Vec2, With};

/// Configuration for a sticky header.
///
/// This is a plain value: views replace it wholesale on every change.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct StickyConfig {
    /// Draw the header over the content instead of above it.
    pub overlap_headers: bool,

    /// Shift the content right by the width of the header.
    ///
    /// Only has an effect together with `overlap_headers`.
    pub offset_from_headers: bool,

    /// Width to use for the header in side mode, instead of its measured width.
    pub header_width: Option<usize>,

    /// Extra space between the header and the content in side mode.
    pub content_left_offset: usize,

    /// Space kept free to the right of the content in side mode.
    pub content_right_offset: usize,
}

impl StickyConfig {
    /// Returns the default configuration: header stacked above the content.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the layout algorithm selected by this configuration.
    pub fn mode(&self) -> LayoutMode {
        if self.overlap_headers && self.offset_from_headers {
            LayoutMode::Side
        } else {
            LayoutMode::Normal
        }
    }

    /// Sets `overlap_headers`.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn overlap_headers(self, overlap: bool) -> Self {
        self.with(|s| s.overlap_headers = overlap)
    }

    /// Sets `offset_from_headers`.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn offset_from_headers(self, offset: bool) -> Self {
        self.with(|s| s.offset_from_headers = offset)
    }

    /// Sets a hardcoded header width.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn header_width(self, width: usize) -> Self {
        self.with(|s| s.header_width = Some(width))
    }

    /// Sets the left and right content offsets.
    ///
    /// Chainable variant.
    #[must_use]
    pub fn content_offsets(self, left: usize, right: usize) -> Self {
        self.with(|s| {
            s.content_left_offset = left;
            s.content_right_offset = right;
        })
    }
}

/// Layout algorithm for a sticky header.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LayoutMode {
    /// Header and content are measured independently.
    Normal,
    /// Header sits beside the content; it is measured first and the content
    /// gets the remaining width.
    Side,
}

/// Box constraints for measuring a view.
///
/// `min` never exceeds `max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Constraints {
    /// Smallest size allowed.
    pub min: Vec2,
    /// Largest size allowed.
    pub max: Vec2,
}

impl Constraints {
    /// Creates new constraints.
    ///
    /// `min` is capped by `max`.
    pub fn new<A, B>(min: A, max: B) -> Self
    where
        A: Into<Vec2>,
        B: Into<Vec2>,
    {
        let max = max.into();
        Constraints {
            min: Vec2::min(min, max),
            max,
        }
    }

    /// Constraints allowing anything between zero and `max`.
    pub fn loose<S: Into<Vec2>>(max: S) -> Self {
        Self::new(Vec2::zero(), max)
    }

    /// Constraints allowing exactly `size`.
    pub fn tight<S: Into<Vec2>>(size: S) -> Self {
        let size = size.into();
        Self::new(size, size)
    }

    /// Drops the minimum, keeping the maximum.
    pub fn loosen(self) -> Self {
        Self::loose(self.max)
    }

    /// Returns the size closest to `size` that satisfies these constraints.
    pub fn constrain<S: Into<Vec2>>(self, size: S) -> Vec2 {
        Vec2::min(Vec2::max(size, self.min), self.max)
    }
}

/// Result of measuring a sticky header and its content.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Measurement {
    /// Algorithm that produced this measurement.
    pub mode: LayoutMode,

    /// Size given to the header.
    ///
    /// In side mode, the width is the hardcoded header width if any.
    pub header_size: Vec2,

    /// Size given to the content.
    pub content_size: Vec2,

    /// Size of the whole composite.
    pub size: Vec2,

    /// Position of the content in the composite.
    pub content_offset: Vec2,
}

/// Position of the header for a given scroll state.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    /// Signed distance from the top of the viewport to the top of the composite.
    ///
    /// Negative once the composite top scrolled out of view.
    pub stuck_offset: isize,

    /// Position of the header in the composite.
    pub header_offset: Vec2,

    /// Normalized stuck offset, see [`stuck_amount`].
    pub stuck_amount: f32,
}

/// Measures both children and computes the composite geometry.
///
/// `measure_header` and `measure_content` return the size each child would
/// like under the given constraints; the result is clamped to them.
///
/// In side mode the header is measured first, since the space left for the
/// content depends on it.
pub fn measure<H, C>(
    config: &StickyConfig,
    constraints: Constraints,
    mut measure_header: H,
    mut measure_content: C,
) -> Measurement
where
    H: FnMut(Constraints) -> Vec2,
    C: FnMut(Constraints) -> Vec2,
{
    let mode = config.mode();
    let child_constraints = constraints.loosen();

    let (header_size, content_size, content_offset_x) = match mode {
        LayoutMode::Side => {
            let header = child_constraints.constrain(measure_header(child_constraints));
            let header_width = config.header_width.unwrap_or(header.x);

            let max_width = constraints
                .max
                .x
                .saturating_sub(header_width)
                .saturating_sub(config.content_left_offset)
                .saturating_sub(config.content_right_offset);
            let content_constraints =
                Constraints::new((header_width, 0), (max_width, constraints.max.y));
            let content = content_constraints.constrain(measure_content(content_constraints));

            (
                Vec2::new(header_width, header.y),
                content,
                header_width + config.content_left_offset,
            )
        }
        LayoutMode::Normal => {
            let header = child_constraints.constrain(measure_header(child_constraints));
            let content = child_constraints.constrain(measure_content(child_constraints));
            (header, content, 0)
        }
    };

    let height = if config.overlap_headers {
        content_size.y
    } else {
        header_size.y + content_size.y
    };
    let size = constraints.constrain((content_size.x, height));

    let content_offset_y = if config.overlap_headers {
        0
    } else {
        header_size.y
    };

    Measurement {
        mode,
        header_size,
        content_size,
        size,
        content_offset: Vec2::new(content_offset_x, content_offset_y),
    }
}

impl Measurement {
    /// Returns the header position for the given stuck offset.
    ///
    /// The header stays at the top while the composite is in view, then
    /// follows the viewport top, but never leaves the composite.
    pub fn header_offset(&self, stuck_offset: isize) -> Vec2 {
        let max_offset = self.size.y.saturating_sub(self.header_size.y);
        let max_offset = isize::try_from(max_offset).unwrap_or(isize::MAX);
        let y = stuck_offset.saturating_neg().clamp(0, max_offset);

        // `y` is in `[0, max_offset]`.
        Vec2::new(0, y as usize)
    }

    /// Computes the header placement for the given stuck offset.
    pub fn place(&self, stuck_offset: isize) -> Placement {
        Placement {
            stuck_offset,
            header_offset: self.header_offset(stuck_offset),
            stuck_amount: stuck_amount(stuck_offset, self.header_size.y),
        }
    }

    /// Returns the size to ask from the parent.
    ///
    /// In side mode this includes the header column and the space around the
    /// content, so a layout at this size gives the content the same width.
    pub fn required_size(&self, config: &StickyConfig) -> Vec2 {
        match self.mode {
            LayoutMode::Normal => self.size,
            LayoutMode::Side => {
                let width = self.content_offset.x
                    + self.content_size.x
                    + config.content_right_offset;
                Vec2::new(usize::max(width, self.size.x), self.size.y)
            }
        }
    }

    /// Returns the size of the band cleared behind the header.
    ///
    /// Above the content, it spans the whole width of the composite.
    pub fn header_area(&self) -> Vec2 {
        match self.mode {
            LayoutMode::Normal => Vec2::new(self.size.x, self.header_size.y),
            LayoutMode::Side => self.header_size,
        }
    }

    /// Checks if `point` lands on the content.
    pub fn content_contains(&self, point: Vec2) -> bool {
        area_contains(self.content_offset, self.content_size, point)
    }

    /// Checks if `point` lands on the header, when placed at `header_offset`.
    pub fn header_contains(&self, header_offset: Vec2, point: Vec2) -> bool {
        area_contains(header_offset, self.header_size, point)
    }
}

fn area_contains(offset: Vec2, size: Vec2, point: Vec2) -> bool {
    point.fits(offset) && point.strictly_lt(offset + size)
}

/// Normalizes a stuck offset by the header height.
///
/// The result is in `[-1, 1]`:
/// * `0` when the header just reached the top of the viewport.
/// * Positive while the composite is still below the top (not stuck yet).
/// * Negative once scrolling continued past the pin point.
///
/// A header with no height is never considered unstuck, and returns `0`.
pub fn stuck_amount(stuck_offset: isize, header_height: usize) -> f32 {
    if header_height == 0 {
        return 0.0;
    }

    let header_height = isize::try_from(header_height).unwrap_or(isize::MAX);
    stuck_offset.clamp(-header_height, header_height) as f32 / header_height as f32
}
