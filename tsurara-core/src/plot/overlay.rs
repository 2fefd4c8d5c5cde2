//! Ellipse annotations marking selected clusters.

use serde::Serialize;

use crate::{layout::ClusterBounds, tree::ClusterId};

const WIDTH_FACTOR: f64 = 2.0;
const HEIGHT_FACTOR: f64 = 1.2;

/// Outline drawn around a selected cluster's bounding box.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
pub struct SelectionEllipse {
    /// Cluster the ellipse marks.
    pub cluster: ClusterId,
    /// Centre of the ellipse, the midpoint of the cluster bounds.
    pub centre: (f64, f64),
    /// Full horizontal extent: twice the bounds width.
    pub width: f64,
    /// Full vertical extent: 1.2 times the bounds height.
    pub height: f64,
}

impl SelectionEllipse {
    /// Sizes an ellipse around `bounds`.
    ///
    /// # Examples
    /// ```
    /// use tsurara_core::{ClusterBounds, ClusterId, SelectionEllipse};
    ///
    /// let bounds = ClusterBounds { left: 0.0, right: 10.0, bottom: 1.0, top: 6.0 };
    /// let ellipse = SelectionEllipse::around(ClusterId::new(3), &bounds);
    /// assert_eq!(ellipse.centre, (5.0, 3.5));
    /// assert_eq!(ellipse.width, 20.0);
    /// assert_eq!(ellipse.height, 6.0);
    /// ```
    #[must_use]
    pub fn around(cluster: ClusterId, bounds: &ClusterBounds) -> Self {
        Self {
            cluster,
            centre: bounds.centre(),
            width: WIDTH_FACTOR * bounds.width(),
            height: HEIGHT_FACTOR * bounds.height(),
        }
    }
}
