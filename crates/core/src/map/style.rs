use geojson::{Feature, FeatureCollection};
use serde::{Serialize, Serializer, ser::SerializeStruct};
use std::{fmt, sync::Arc};

/// Leaflet-style path options.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Style {
    /// Stroke color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,

    /// Fill color.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_color: Option<String>,

    /// Fill opacity, 0 to 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub fill_opacity: Option<f64>,

    /// Stroke opacity, 0 to 1.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub opacity: Option<f64>,

    /// Stroke width in pixels.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub weight: Option<f64>,

    /// Stroke dash pattern, e.g. `5, 5`.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dash_array: Option<String>,
}

/// Computes a style for one feature.
pub type StyleCallback = Arc<dyn Fn(&Feature) -> Style + Send + Sync>;

/// A layer of GeoJSON features.
///
/// When serialized, the style callback is evaluated for every feature and the
/// results are written as `feature_styles`, in feature order.
#[derive(Clone)]
pub struct GeoJsonLayer {
    /// The features.
    pub data: FeatureCollection,

    /// A style applied to every feature without a callback.
    pub style: Option<Style>,

    style_callback: Option<StyleCallback>,
}

impl GeoJsonLayer {
    /// Creates an unstyled layer.
    pub fn new(data: FeatureCollection) -> GeoJsonLayer {
        GeoJsonLayer {
            data,
            style: None,
            style_callback: None,
        }
    }

    /// Sets one style for every feature.
    pub fn with_style(mut self, style: Style) -> GeoJsonLayer {
        self.style = Some(style);
        self
    }

    /// Sets a per-feature style callback.
    ///
    /// # Examples
    ///
    /// ```
    /// use eo_maxar::map::{GeoJsonLayer, Style};
    /// use geojson::FeatureCollection;
    ///
    /// let layer = GeoJsonLayer::new(FeatureCollection {
    ///     bbox: None,
    ///     features: vec![Default::default()],
    ///     foreign_members: None,
    /// })
    /// .with_style_callback(|_| Style {
    ///     color: Some("blue".to_string()),
    ///     ..Default::default()
    /// });
    /// assert_eq!(layer.feature_styles()[0].color.as_deref(), Some("blue"));
    /// ```
    pub fn with_style_callback<F>(mut self, callback: F) -> GeoJsonLayer
    where
        F: Fn(&Feature) -> Style + Send + Sync + 'static,
    {
        self.style_callback = Some(Arc::new(callback));
        self
    }

    /// Returns this layer's style callback, if it has one.
    pub fn style_callback(&self) -> Option<&StyleCallback> {
        self.style_callback.as_ref()
    }

    /// Returns the resolved style of every feature.
    pub fn feature_styles(&self) -> Vec<Style> {
        self.data
            .features
            .iter()
            .map(|feature| match &self.style_callback {
                Some(callback) => callback(feature),
                None => self.style.clone().unwrap_or_default(),
            })
            .collect()
    }
}

impl fmt::Debug for GeoJsonLayer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GeoJsonLayer")
            .field("data", &self.data)
            .field("style", &self.style)
            .field("style_callback", &self.style_callback.is_some())
            .finish()
    }
}

impl Serialize for GeoJsonLayer {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        let len = 1 + usize::from(self.style.is_some()) + usize::from(self.style_callback.is_some());
        let mut state = serializer.serialize_struct("GeoJsonLayer", len)?;
        state.serialize_field("data", &self.data)?;
        if let Some(style) = &self.style {
            state.serialize_field("style", style)?;
        }
        if self.style_callback.is_some() {
            state.serialize_field("feature_styles", &self.feature_styles())?;
        }
        state.end()
    }
}
