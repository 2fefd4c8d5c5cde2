//! Drives an external drawing backend through the icicle plot.
//!
//! The crate computes every piece of geometry itself; a [`PlotBackend`]
//! receives ready-to-draw primitives in painting order: bars, connector
//! lines, selection ellipses, then the colour bar. Rendering, colour lookup,
//! and axis styling stay with the backend.

mod colour;
mod overlay;

use tracing::{info, instrument};

pub use self::{
    colour::{ColourBar, ColourMap, WidthNormaliser},
    overlay::SelectionEllipse,
};
use crate::{
    error::PlotError,
    layout::{Bar, ConnectorLine, LayoutConfig, LayoutResult, compute_layout},
    selection::{ClusterSelection, select_with},
    stability::StabilityProvider,
    tree::CondensedTree,
};

/// Fill applied to an icicle bar.
#[derive(Clone, Copy, Debug, PartialEq)]
pub enum BarFill<'a> {
    /// Shade from `colour_map` at `intensity` in `[0, 1]`.
    Mapped {
        /// Name of the colour scale.
        colour_map: &'a str,
        /// Normalised bar width.
        intensity: f64,
    },
    /// Solid black.
    Black,
}

/// Axis conventions of the icicle plot, handed to [`PlotBackend::finish`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct AxesStyle {
    /// Label of the lambda axis.
    pub y_label: &'static str,
    /// Lambda grows downwards so the root sits at the top.
    pub invert_y: bool,
    /// Horizontal positions carry no meaning beyond ordering.
    pub hide_x_axis: bool,
}

impl Default for AxesStyle {
    fn default() -> Self {
        Self {
            y_label: "λ value",
            invert_y: true,
            hide_x_axis: true,
        }
    }
}

/// Receives drawing primitives for one icicle plot.
///
/// Every method may fail with [`PlotError::Backend`]; the first failure
/// aborts the plot.
pub trait PlotBackend {
    /// Draws one bar centred on `bar.centre`, spanning `bar.bottom` to
    /// `bar.bottom + bar.height`.
    ///
    /// # Errors
    /// Returns [`PlotError::Backend`] when the backend cannot draw.
    fn draw_bar(&mut self, bar: &Bar, fill: BarFill<'_>) -> Result<(), PlotError>;

    /// Draws a black connector line.
    ///
    /// # Errors
    /// Returns [`PlotError::Backend`] when the backend cannot draw.
    fn draw_line(&mut self, line: &ConnectorLine) -> Result<(), PlotError>;

    /// Outlines a selected cluster.
    ///
    /// # Errors
    /// Returns [`PlotError::Backend`] when the backend cannot draw.
    fn draw_ellipse(&mut self, ellipse: &SelectionEllipse) -> Result<(), PlotError>;

    /// Draws the colour legend.
    ///
    /// # Errors
    /// Returns [`PlotError::Backend`] when the backend cannot draw.
    fn draw_colour_bar(&mut self, colour_bar: &ColourBar) -> Result<(), PlotError>;

    /// Applies axis styling once every primitive has been drawn.
    ///
    /// # Errors
    /// Returns [`PlotError::Backend`] when the backend cannot finalise.
    fn finish(&mut self, _axes: &AxesStyle) -> Result<(), PlotError> {
        Ok(())
    }
}

/// Options for [`plot`].
#[derive(Clone, Debug, PartialEq)]
pub struct PlotOptions {
    /// Layout parameters.
    pub layout: LayoutConfig,
    /// Colour scale for bars.
    pub colour_map: ColourMap,
    /// Outline the clusters chosen by excess-of-mass selection.
    pub select_clusters: bool,
    /// Draw the colour legend when bars are colour mapped.
    pub colour_bar: bool,
}

impl Default for PlotOptions {
    fn default() -> Self {
        Self {
            layout: LayoutConfig::default(),
            colour_map: ColourMap::default(),
            select_clusters: false,
            colour_bar: true,
        }
    }
}

/// What was handed to the backend.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct PlotSummary {
    /// Layout the primitives were drawn from.
    pub layout: LayoutResult,
    /// Selection behind the ellipses, when requested.
    pub selection: Option<ClusterSelection>,
    /// Number of ellipses drawn.
    pub ellipses: usize,
    /// Whether a colour bar was drawn.
    pub colour_bar: bool,
}

/// Lays out `tree` and feeds the drawing primitives to `backend`.
///
/// `provider` scores clusters when [`PlotOptions::select_clusters`] is set.
///
/// # Errors
/// Returns [`PlotError::MissingBackend`] when `backend` is `None`, and
/// otherwise propagates layout, selection, and backend failures.
///
/// # Examples
/// ```
/// use tsurara_core::{CondensedTree, ExcessOfMass, PlotError, PlotOptions, plot};
///
/// let tree = CondensedTree::from_records(vec![(0, 1, 0.5, 1).into()])?;
/// let err = plot(&tree, &ExcessOfMass, None, &PlotOptions::default()).unwrap_err();
/// assert_eq!(err, PlotError::MissingBackend);
/// # Ok::<(), tsurara_core::TreeError>(())
/// ```
#[instrument(
    name = "core.plot",
    err,
    skip(tree, provider, backend, options),
    fields(
        clusters = tree.cluster_count(),
        select_clusters = options.select_clusters,
        colour_map = %options.colour_map,
    ),
)]
pub fn plot<P>(
    tree: &CondensedTree,
    provider: &P,
    backend: Option<&mut dyn PlotBackend>,
    options: &PlotOptions,
) -> Result<PlotSummary, PlotError>
where
    P: StabilityProvider + ?Sized,
{
    let backend = backend.ok_or(PlotError::MissingBackend)?;
    let layout = compute_layout(tree, &options.layout)?;

    let normaliser = WidthNormaliser::from_widths(&layout.bar_widths());
    let colour_map = options.colour_map.name();
    for bar in layout.bars() {
        let fill = colour_map.map_or(BarFill::Black, |name| BarFill::Mapped {
            colour_map: name,
            intensity: normaliser.normalise(bar.width),
        });
        backend.draw_bar(bar, fill)?;
    }
    for line in layout.lines() {
        backend.draw_line(line)?;
    }

    let selection = if options.select_clusters {
        Some(select_with(tree, provider)?)
    } else {
        None
    };
    let mut ellipses = 0;
    if let Some(selection) = &selection {
        for &cluster in selection.selected() {
            let Some(bounds) = layout.bounds(cluster) else {
                continue;
            };
            backend.draw_ellipse(&SelectionEllipse::around(cluster, bounds))?;
            ellipses += 1;
        }
    }

    let mut colour_bar = false;
    if let (true, Some(name)) = (options.colour_bar, colour_map) {
        let legend = ColourBar::new(name, &normaliser, options.layout.log_size());
        backend.draw_colour_bar(&legend)?;
        colour_bar = true;
    }
    backend.finish(&AxesStyle::default())?;

    info!(
        bars = layout.bars().len(),
        lines = layout.lines().len(),
        ellipses,
        colour_bar,
        "plot drawn"
    );
    Ok(PlotSummary {
        layout,
        selection,
        ellipses,
        colour_bar,
    })
}
