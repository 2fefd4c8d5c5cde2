//! Plot backend that records drawing primitives as serialisable items.
//!
//! The CLI has no renderer of its own; `plot` emits the display list as JSON
//! lines so any downstream tool can draw it.

use serde::Serialize;
use tsurara_core::{
    AxesStyle, Bar, BarFill, ColourBar, ConnectorLine, PlotBackend, PlotError, SelectionEllipse,
};

/// One drawing instruction.
#[derive(Clone, Debug, PartialEq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DisplayItem {
    /// Filled rectangle centred on `centre`.
    Bar {
        /// Owning cluster id.
        cluster: u64,
        /// Horizontal centre.
        centre: f64,
        /// Lower lambda edge.
        bottom: f64,
        /// Extent above `bottom`.
        height: f64,
        /// Horizontal extent.
        width: f64,
        /// Colour scale, or `None` for black.
        colour_map: Option<String>,
        /// Position on the colour scale.
        intensity: Option<f64>,
    },
    /// Black polyline.
    Line {
        /// x coordinates.
        xs: [f64; 2],
        /// y coordinates.
        ys: [f64; 2],
    },
    /// Unfilled ellipse around a selected cluster.
    Ellipse {
        /// Selected cluster id.
        cluster: u64,
        /// Centre point.
        centre: (f64, f64),
        /// Full width.
        width: f64,
        /// Full height.
        height: f64,
    },
    /// Colour legend.
    ColourBar {
        /// Colour scale name.
        colour_map: String,
        /// Value domain covered by the scale.
        domain: (f64, f64),
        /// Legend label.
        label: String,
    },
    /// Axis styling, always last.
    Axes {
        /// Label of the lambda axis.
        y_label: String,
        /// Whether lambda grows downwards.
        invert_y: bool,
        /// Whether the x axis is hidden.
        hide_x_axis: bool,
    },
}

/// Collects [`DisplayItem`]s in drawing order.
#[derive(Debug, Default)]
pub struct DisplayListBackend {
    items: Vec<DisplayItem>,
}

impl DisplayListBackend {
    /// Returns the recorded items.
    #[must_use]
    pub fn items(&self) -> &[DisplayItem] {
        &self.items
    }

    /// Consumes the backend, returning the recorded items.
    #[must_use]
    pub fn into_items(self) -> Vec<DisplayItem> {
        self.items
    }
}

impl PlotBackend for DisplayListBackend {
    fn draw_bar(&mut self, bar: &Bar, fill: BarFill<'_>) -> Result<(), PlotError> {
        let (colour_map, intensity) = match fill {
            BarFill::Mapped {
                colour_map,
                intensity,
            } => (Some(colour_map.to_owned()), Some(intensity)),
            BarFill::Black => (None, None),
        };
        self.items.push(DisplayItem::Bar {
            cluster: bar.cluster.get(),
            centre: bar.centre,
            bottom: bar.bottom,
            height: bar.height,
            width: bar.width,
            colour_map,
            intensity,
        });
        Ok(())
    }

    fn draw_line(&mut self, line: &ConnectorLine) -> Result<(), PlotError> {
        self.items.push(DisplayItem::Line {
            xs: line.xs,
            ys: line.ys,
        });
        Ok(())
    }

    fn draw_ellipse(&mut self, ellipse: &SelectionEllipse) -> Result<(), PlotError> {
        self.items.push(DisplayItem::Ellipse {
            cluster: ellipse.cluster.get(),
            centre: ellipse.centre,
            width: ellipse.width,
            height: ellipse.height,
        });
        Ok(())
    }

    fn draw_colour_bar(&mut self, colour_bar: &ColourBar) -> Result<(), PlotError> {
        self.items.push(DisplayItem::ColourBar {
            colour_map: colour_bar.colour_map.clone(),
            domain: colour_bar.domain,
            label: colour_bar.label.to_owned(),
        });
        Ok(())
    }

    fn finish(&mut self, axes: &AxesStyle) -> Result<(), PlotError> {
        self.items.push(DisplayItem::Axes {
            y_label: axes.y_label.to_owned(),
            invert_y: axes.invert_y,
            hide_x_axis: axes.hide_x_axis,
        });
        Ok(())
    }
}
